//! End-to-end tests for the admin gateways against an in-process stub of
//! the hosted backend (data tables, object storage, auth). The stub applies
//! each single-row write atomically and supports the filter subset the
//! clients use, which is enough to exercise the validation, reorder, and
//! cleanup paths over real HTTP.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use lacteos_server::{app, config::Config, state::AppState};

const TOKEN: &str = "test-token";

#[derive(Default)]
struct StubBackend {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    /// Row ids whose PATCH fails with a remote error.
    poison_patch: Mutex<HashSet<String>>,
    /// Tables whose next INSERT fails once.
    poison_insert: Mutex<HashSet<String>>,
}

impl StubBackend {
    fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables.lock().unwrap().insert(table.to_string(), rows);
    }

    fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn orders(&self, table: &str) -> Vec<i64> {
        self.rows(table)
            .iter()
            .map(|row| row["order_index"].as_i64().unwrap())
            .collect()
    }
}

fn matches(row: &Value, column: &str, condition: &str) -> bool {
    let actual = match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return false,
    };
    if let Some(expected) = condition.strip_prefix("eq.") {
        actual == expected
    } else if let Some(expected) = condition.strip_prefix("neq.") {
        actual != expected
    } else {
        true
    }
}

fn apply_filters(rows: Vec<Value>, params: &[(String, String)]) -> Vec<Value> {
    let mut rows: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            params.iter().all(|(key, value)| match key.as_str() {
                "select" | "order" | "limit" => true,
                column => matches(row, column, value),
            })
        })
        .collect();

    if let Some((_, spec)) = params.iter().find(|(key, _)| key == "order") {
        if let Some(column) = spec.split('.').next() {
            let column = column.to_string();
            rows.sort_by(|a, b| {
                let left = a[&column].as_f64().unwrap_or(f64::MAX);
                let right = b[&column].as_f64().unwrap_or(f64::MAX);
                left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    if let Some((_, limit)) = params.iter().find(|(key, _)| key == "limit") {
        if let Ok(limit) = limit.parse::<usize>() {
            rows.truncate(limit);
        }
    }

    rows
}

async fn rest_select(
    State(stub): State<Arc<StubBackend>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Value>> {
    Json(apply_filters(stub.rows(&table), &params))
}

async fn rest_insert(
    State(stub): State<Arc<StubBackend>>,
    Path(table): Path<String>,
    Json(mut record): Json<Value>,
) -> impl IntoResponse {
    if stub.poison_insert.lock().unwrap().remove(&table) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "duplicate key value"})),
        )
            .into_response();
    }
    if record.get("id").is_none() {
        record["id"] = json!(Uuid::new_v4().to_string());
    }
    stub.tables
        .lock()
        .unwrap()
        .entry(table)
        .or_default()
        .push(record);
    StatusCode::CREATED.into_response()
}

async fn rest_update(
    State(stub): State<Arc<StubBackend>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    Json(changes): Json<Value>,
) -> impl IntoResponse {
    let poisoned = {
        let poison = stub.poison_patch.lock().unwrap();
        params.iter().any(|(key, value)| {
            key == "id"
                && value
                    .strip_prefix("eq.")
                    .is_some_and(|id| poison.contains(id))
        })
    };
    if poisoned {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "forced write failure"})),
        )
            .into_response();
    }

    let mut tables = stub.tables.lock().unwrap();
    if let Some(rows) = tables.get_mut(&table) {
        for row in rows.iter_mut() {
            let hit = params.iter().all(|(key, value)| match key.as_str() {
                "select" | "order" | "limit" => true,
                column => matches(row, column, value),
            });
            if hit {
                if let Some(object) = changes.as_object() {
                    for (key, value) in object {
                        row[key] = value.clone();
                    }
                }
            }
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn rest_delete(
    State(stub): State<Arc<StubBackend>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> StatusCode {
    let mut tables = stub.tables.lock().unwrap();
    if let Some(rows) = tables.get_mut(&table) {
        rows.retain(|row| {
            !params.iter().all(|(key, value)| match key.as_str() {
                "select" | "order" | "limit" => true,
                column => matches(row, column, value),
            })
        });
    }
    StatusCode::NO_CONTENT
}

async fn auth_user(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Bearer {TOKEN}"));
    if authorized {
        Json(json!({"id": "admin-1", "email": "admin@lacteos.test"})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"msg": "invalid token"}))).into_response()
    }
}

async fn auth_token(Json(grant): Json<Value>) -> impl IntoResponse {
    if grant["password"] == json!("secreto") {
        Json(json!({"access_token": TOKEN, "token_type": "bearer", "expires_in": 3600}))
            .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error_description": "Invalid login credentials"})),
        )
            .into_response()
    }
}

async fn storage_upload(
    State(stub): State<Arc<StubBackend>>,
    Path((bucket, path)): Path<(String, String)>,
    body: Bytes,
) -> Json<Value> {
    stub.objects
        .lock()
        .unwrap()
        .insert(format!("{bucket}/{path}"), body.to_vec());
    Json(json!({"Key": format!("{bucket}/{path}")}))
}

async fn storage_remove(
    State(stub): State<Arc<StubBackend>>,
    Path((bucket, path)): Path<(String, String)>,
) -> StatusCode {
    stub.objects
        .lock()
        .unwrap()
        .remove(&format!("{bucket}/{path}"));
    StatusCode::OK
}

fn stub_router(stub: Arc<StubBackend>) -> Router {
    Router::new()
        .route(
            "/rest/v1/{table}",
            get(rest_select)
                .post(rest_insert)
                .patch(rest_update)
                .delete(rest_delete),
        )
        .route("/auth/v1/user", get(auth_user))
        .route("/auth/v1/token", post(auth_token))
        .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/storage/v1/object/{bucket}/{path}",
            post(storage_upload).delete(storage_remove),
        )
        .with_state(stub)
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

struct Ctx {
    stub: Arc<StubBackend>,
    api: String,
    client: reqwest::Client,
}

impl Ctx {
    async fn new() -> Self {
        let stub = Arc::new(StubBackend::default());
        let backend_url = spawn(stub_router(stub.clone())).await;

        let config = Config {
            port: 0,
            backend_url,
            anon_key: "anon".to_string(),
            service_key: "service".to_string(),
            redis_url: String::new(),
            board_ttl_seconds: 60,
        };
        let state = AppState::with_config(config).await;
        let api = spawn(app(state)).await;

        Self {
            stub,
            api,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api)
    }
}

fn category_row(id: &str, name: &str, order_index: i32) -> Value {
    json!({"id": id, "name": name, "order_index": order_index, "created_at": "2026-01-01T00:00:00Z"})
}

fn product_row(id: &str, category_id: &str, order_index: i32, is_featured: bool) -> Value {
    json!({
        "id": id,
        "category_id": category_id,
        "codigo": format!("P-{order_index}"),
        "name": format!("Producto {order_index}"),
        "price": 1.50,
        "order_index": order_index,
        "estado": "activo",
        "is_featured": is_featured,
        "created_at": "2026-01-01T00:00:00Z"
    })
}

fn video_row(id: &str, order_index: i32) -> Value {
    json!({
        "id": id,
        "name": format!("Video {order_index}"),
        "file_url": format!("http://blob.test/storage/v1/object/public/videos/{id}.mp4"),
        "order_index": order_index,
        "created_at": "2026-01-01T00:00:00Z"
    })
}

const GENERAL: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::test]
async fn admin_routes_reject_missing_token() {
    let ctx = Ctx::new().await;
    let response = ctx
        .client
        .get(ctx.url("/admin/categorias"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_exchanges_credentials_for_token() {
    let ctx = Ctx::new().await;

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/login"))
        .form(&[("email", "admin@lacteos.test"), ("password", "secreto")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["access_token"], json!(TOKEN));

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/login"))
        .form(&[("email", "admin@lacteos.test"), ("password", "nope")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"], json!("Credenciales inválidas"));
}

#[tokio::test]
async fn category_create_persists_and_rejects_duplicate_order() {
    let ctx = Ctx::new().await;
    ctx.stub
        .seed("categories", vec![category_row(GENERAL, "General", 1)]);

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/categorias"))
        .bearer_auth(TOKEN)
        .form(&[("name", "Quesos"), ("order_index", "2")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(ctx.stub.rows("categories").len(), 2);

    // Same order again: rejected before any write.
    let body: Value = ctx
        .client
        .post(ctx.url("/admin/categorias"))
        .bearer_auth(TOKEN)
        .form(&[("name", "Cremas"), ("order_index", "2")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(
        body["errors"]["order_index"],
        json!("Ese orden ya está usado por otra categoría")
    );
    assert_eq!(ctx.stub.rows("categories").len(), 2);
}

#[tokio::test]
async fn category_delete_reassigns_products_to_general() {
    let ctx = Ctx::new().await;
    let doomed = Uuid::new_v4().to_string();
    ctx.stub.seed(
        "categories",
        vec![
            category_row(GENERAL, "General", 1),
            category_row(&doomed, "Quesos", 2),
        ],
    );
    ctx.stub.seed(
        "products",
        vec![
            product_row(&Uuid::new_v4().to_string(), &doomed, 1, false),
            product_row(&Uuid::new_v4().to_string(), &doomed, 2, false),
        ],
    );

    let body: Value = ctx
        .client
        .delete(ctx.url(&format!("/admin/categorias/{doomed}")))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));

    let categories = ctx.stub.rows("categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["id"], json!(GENERAL));
    for product in ctx.stub.rows("products") {
        assert_eq!(product["category_id"], json!(GENERAL));
    }
}

#[tokio::test]
async fn general_category_cannot_be_deleted() {
    let ctx = Ctx::new().await;
    ctx.stub
        .seed("categories", vec![category_row(GENERAL, "General", 1)]);

    let body: Value = ctx
        .client
        .delete(ctx.url(&format!("/admin/categorias/{GENERAL}")))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(
        body["error"],
        json!("No se puede eliminar la categoría General")
    );
    assert_eq!(ctx.stub.rows("categories").len(), 1);
}

#[tokio::test]
async fn featured_cap_blocks_the_fifteenth() {
    let ctx = Ctx::new().await;
    let mut rows: Vec<Value> = (1..=14)
        .map(|i| product_row(&Uuid::new_v4().to_string(), GENERAL, i, true))
        .collect();
    let extra = Uuid::new_v4().to_string();
    rows.push(product_row(&extra, GENERAL, 15, false));
    let first = rows[0]["id"].as_str().unwrap().to_string();
    ctx.stub.seed("products", rows);

    let body: Value = ctx
        .client
        .post(ctx.url(&format!("/admin/productos/{extra}/destacado")))
        .bearer_auth(TOKEN)
        .json(&json!({"featured": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(
        body["errors"]["is_featured"],
        json!("Máximo 14 productos destacados")
    );
    let unchanged = ctx
        .stub
        .rows("products")
        .into_iter()
        .find(|row| row["id"] == json!(extra.clone()))
        .unwrap();
    assert_eq!(unchanged["is_featured"], json!(false));

    // Unsetting always goes through and frees a slot.
    let body: Value = ctx
        .client
        .post(ctx.url(&format!("/admin/productos/{first}/destacado")))
        .bearer_auth(TOKEN)
        .json(&json!({"featured": false}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));

    let featured = ctx
        .stub
        .rows("products")
        .iter()
        .filter(|row| row["is_featured"] == json!(true))
        .count();
    assert_eq!(featured, 13);
}

#[tokio::test]
async fn video_reorder_yields_contiguous_orders() {
    let ctx = Ctx::new().await;
    let ids: Vec<String> = (0..4).map(|_| Uuid::new_v4().to_string()).collect();
    ctx.stub.seed(
        "videos",
        ids.iter()
            .enumerate()
            .map(|(i, id)| video_row(id, i as i32 + 1))
            .collect(),
    );

    // Drag the first video onto the third slot.
    let body: Value = ctx
        .client
        .post(ctx.url("/admin/videos/reorder"))
        .bearer_auth(TOKEN)
        .json(&json!({"from": ids[0], "to": ids[2]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["applied"], json!(3));

    let mut orders = ctx.stub.orders("videos");
    orders.sort_unstable();
    assert_eq!(orders, vec![1, 2, 3, 4]);

    let moved = ctx
        .stub
        .rows("videos")
        .into_iter()
        .find(|row| row["id"] == json!(ids[0].clone()))
        .unwrap();
    assert_eq!(moved["order_index"], json!(3));
}

#[tokio::test]
async fn reorder_drop_on_self_is_a_noop() {
    let ctx = Ctx::new().await;
    let id = Uuid::new_v4().to_string();
    ctx.stub.seed("videos", vec![video_row(&id, 1)]);

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/videos/reorder"))
        .bearer_auth(TOKEN)
        .json(&json!({"from": id, "to": id}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["applied"], json!(0));
    assert_eq!(body["total"], json!(0));
}

#[tokio::test]
async fn reorder_partial_failure_reports_remote_truth() {
    let ctx = Ctx::new().await;
    let ids: Vec<String> = (0..4).map(|_| Uuid::new_v4().to_string()).collect();
    ctx.stub.seed(
        "videos",
        ids.iter()
            .enumerate()
            .map(|(i, id)| video_row(id, i as i32 + 1))
            .collect(),
    );
    // Dragging the first video to the end renumbers all four; the third
    // update is forced to fail.
    ctx.stub
        .poison_patch
        .lock()
        .unwrap()
        .insert(ids[3].clone());

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/videos/reorder"))
        .bearer_auth(TOKEN)
        .json(&json!({"from": ids[0], "to": ids[3]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"], json!("forced write failure"));
    let applied = body["applied"].as_u64().unwrap();
    let total = body["total"].as_u64().unwrap();
    assert!(applied < total);
    // The response carries the store's actual orders for reconciliation.
    assert_eq!(body["orders"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn product_reorder_stays_inside_its_category() {
    let ctx = Ctx::new().await;
    let other = Uuid::new_v4().to_string();
    let ids: Vec<String> = (0..3).map(|_| Uuid::new_v4().to_string()).collect();
    let mut rows: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| product_row(id, GENERAL, i as i32 + 1, false))
        .collect();
    rows.push(product_row(&other, &Uuid::new_v4().to_string(), 1, false));
    ctx.stub.seed("products", rows);

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/productos/reorder"))
        .bearer_auth(TOKEN)
        .json(&json!({"category_id": GENERAL, "from": ids[2], "to": ids[0]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));

    // The foreign category's product is untouched.
    let foreign = ctx
        .stub
        .rows("products")
        .into_iter()
        .find(|row| row["id"] == json!(other.clone()))
        .unwrap();
    assert_eq!(foreign["order_index"], json!(1));
}

#[tokio::test]
async fn video_upload_inserts_row_with_public_url() {
    let ctx = Ctx::new().await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Promo de quesos")
        .text("order_index", "1")
        .part(
            "file",
            reqwest::multipart::Part::bytes(vec![0u8; 64])
                .file_name("promo.mp4")
                .mime_str("video/mp4")
                .unwrap(),
        );

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/videos"))
        .bearer_auth(TOKEN)
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(true));

    let rows = ctx.stub.rows("videos");
    assert_eq!(rows.len(), 1);
    let url = rows[0]["file_url"].as_str().unwrap();
    assert!(url.contains("/storage/v1/object/public/videos/"));
    assert!(url.ends_with(".mp4"));
    assert_eq!(ctx.stub.objects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn video_upload_rejects_unsupported_extension() {
    let ctx = Ctx::new().await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Promo")
        .text("order_index", "1")
        .part(
            "file",
            reqwest::multipart::Part::bytes(vec![0u8; 64])
                .file_name("promo.avi")
                .mime_str("video/x-msvideo")
                .unwrap(),
        );

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/videos"))
        .bearer_auth(TOKEN)
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(
        body["errors"]["file"],
        json!("Formatos permitidos: mp4, webm, ogg, mov")
    );
    assert!(ctx.stub.rows("videos").is_empty());
    assert!(ctx.stub.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn gallery_insert_failure_cleans_up_uploaded_blob() {
    let ctx = Ctx::new().await;
    ctx.stub
        .poison_insert
        .lock()
        .unwrap()
        .insert("galeria".to_string());

    let form = reqwest::multipart::Form::new()
        .text("product", "Queso fresco")
        .text("price", "$3.50")
        .text("order_index", "1")
        .part(
            "file",
            reqwest::multipart::Part::bytes(vec![0u8; 64])
                .file_name("queso.png")
                .mime_str("image/png")
                .unwrap(),
        );

    let body: Value = ctx
        .client
        .post(ctx.url("/admin/galeria"))
        .bearer_auth(TOKEN)
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["errors"]["product"], json!("duplicate key value"));
    // The blob uploaded before the failed insert was removed again.
    assert!(ctx.stub.objects.lock().unwrap().is_empty());
    assert!(ctx.stub.rows("galeria").is_empty());
}

#[tokio::test]
async fn menu_board_groups_active_products_by_category() {
    let ctx = Ctx::new().await;
    let quesos = Uuid::new_v4().to_string();
    ctx.stub.seed(
        "categories",
        vec![
            category_row(GENERAL, "General", 1),
            category_row(&quesos, "Quesos", 2),
        ],
    );
    let mut inactive = product_row(&Uuid::new_v4().to_string(), &quesos, 2, false);
    inactive["estado"] = json!("inactivo");
    ctx.stub.seed(
        "products",
        vec![
            product_row(&Uuid::new_v4().to_string(), &quesos, 1, false),
            inactive,
            product_row(&Uuid::new_v4().to_string(), GENERAL, 1, false),
        ],
    );

    let body: Value = ctx
        .client
        .get(ctx.url("/tv/menu"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sections = body.as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["category"]["name"], json!("General"));
    assert_eq!(sections[1]["category"]["name"], json!("Quesos"));
    // The inactive product never reaches the board.
    assert_eq!(sections[1]["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn featured_board_is_capped_and_ordered() {
    let ctx = Ctx::new().await;
    let rows: Vec<Value> = (1..=16)
        .map(|i| {
            json!({
                "id": Uuid::new_v4().to_string(),
                "category_id": GENERAL,
                "name": format!("Producto {i}"),
                "price": 2.25,
                "order_index": 17 - i,
                "estado": if i == 16 { "inactivo" } else { "activo" },
                "is_featured": i != 15,
                "category_name": "General",
                "category_order": 1
            })
        })
        .collect();
    ctx.stub.seed("products_with_category", rows);

    let body: Value = ctx
        .client
        .get(ctx.url("/tv/productos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 14);
    let orders: Vec<i64> = rows
        .iter()
        .map(|row| row["order_index"].as_i64().unwrap())
        .collect();
    let mut sorted = orders.clone();
    sorted.sort_unstable();
    assert_eq!(orders, sorted);
}
