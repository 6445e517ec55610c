//! Product handlers.
//!
//! Order-index uniqueness is scoped to one category, so the uniqueness read
//! and the reorder commit both pin the category: a drag can never renumber
//! across categories. The featured flag carries a global cap enforced by
//! re-reading the live count right before the write rather than trusting
//! whatever the client last saw.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Form, Json,
};
use lacteos_store::{
    models::{Estado, FeaturedChange, NewProduct, Product, ProductChanges},
    Query,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    actions::{
        commit_drag, fetch_orders, remote_error, ActionResult, DeleteResult, ReorderRequest,
        ReorderResult,
    },
    cache::{ADMIN_PRODUCTS, PRODUCT_KEYS},
    error::AppError,
    state::AppState,
    validate::{validate_product, MAX_FEATURED},
};

fn scope_key(category_id: Uuid) -> String {
    format!("products:{category_id}")
}

#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub codigo: String,
    pub name: String,
    pub price: String,
    pub category_id: String,
    #[serde(default = "default_order")]
    pub order_index: String,
}

fn default_order() -> String {
    "1".to_string()
}

impl ProductForm {
    /// Uniqueness is checked inside one category, so validation needs the
    /// parsed category first. An unparsable id reads as "no category
    /// selected".
    fn category(&self) -> Option<Uuid> {
        self.category_id.trim().parse().ok()
    }
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, AppError> {
    if let Some(rows) = state.cache.get_json::<Vec<Product>>(ADMIN_PRODUCTS).await {
        return Ok(Json(rows));
    }
    let rows: Vec<Product> = state
        .data
        .select(Query::table("products").order("order_index.asc,name.asc"))
        .await?;
    state.cache.put_json(ADMIN_PRODUCTS, &rows).await;
    Ok(Json(rows))
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ProductForm>,
) -> Result<Json<ActionResult>, AppError> {
    let Some(category_id) = form.category() else {
        return Ok(Json(ActionResult::field(
            "category_id",
            "Selecciona una categoría",
        )));
    };
    let _guard = state.lock_scope(&scope_key(category_id)).await;

    let existing = fetch_orders(
        &state.data,
        Query::table("products").eq("category_id", category_id),
    )
    .await?;
    let errors = validate_product(
        &form.codigo,
        &form.name,
        &form.price,
        &form.category_id,
        &form.order_index,
        &existing,
    );
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let record = NewProduct {
        category_id,
        codigo: form.codigo.trim().to_string(),
        name: form.name.trim().to_string(),
        price: form.price.trim().parse().unwrap_or(0.0),
        order_index: form.order_index.trim().parse().unwrap_or(1),
        estado: Estado::Activo,
    };
    if let Err(e) = state.data.insert("products", &record).await {
        state.toasts.error("Error al crear", e.to_string());
        return Ok(Json(remote_error("codigo", e)));
    }

    state.cache.invalidate(&PRODUCT_KEYS).await;
    state.toasts.success("Producto creado", "El producto se creó correctamente.");
    info!("Product created: {}", record.codigo);
    Ok(Json(ActionResult::done()))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<ProductForm>,
) -> Result<Json<ActionResult>, AppError> {
    let Some(category_id) = form.category() else {
        return Ok(Json(ActionResult::field(
            "category_id",
            "Selecciona una categoría",
        )));
    };
    let _guard = state.lock_scope(&scope_key(category_id)).await;

    let existing = fetch_orders(
        &state.data,
        Query::table("products")
            .eq("category_id", category_id)
            .neq("id", id),
    )
    .await?;
    let errors = validate_product(
        &form.codigo,
        &form.name,
        &form.price,
        &form.category_id,
        &form.order_index,
        &existing,
    );
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let changes = ProductChanges {
        category_id,
        codigo: form.codigo.trim().to_string(),
        name: form.name.trim().to_string(),
        price: form.price.trim().parse().unwrap_or(0.0),
        order_index: form.order_index.trim().parse().unwrap_or(1),
    };
    if let Err(e) = state
        .data
        .update(Query::table("products").eq("id", id), &changes)
        .await
    {
        state.toasts.error("Error al guardar", e.to_string());
        return Ok(Json(remote_error("codigo", e)));
    }

    state.cache.invalidate(&PRODUCT_KEYS).await;
    state.toasts.success("Producto actualizado", "Los cambios se guardaron.");
    Ok(Json(ActionResult::done()))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, AppError> {
    if let Err(e) = state
        .data
        .delete(Query::table("products").eq("id", id))
        .await
    {
        state.toasts.error("Error al eliminar", e.to_string());
        return Ok(Json(DeleteResult::failed(e.to_string())));
    }

    state.cache.invalidate(&PRODUCT_KEYS).await;
    state.toasts.success("Producto eliminado", "El producto se eliminó correctamente.");
    Ok(Json(DeleteResult::done()))
}

#[derive(Debug, Deserialize)]
pub struct FeaturedForm {
    pub featured: bool,
}

/// Setting the flag re-reads the live featured count under the shared
/// `featured` lock; unsetting always goes through.
pub async fn featured_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(form): Json<FeaturedForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope("featured").await;

    if form.featured {
        let count = state
            .data
            .count(Query::table("products").select("id").eq("is_featured", true))
            .await?;
        if count >= MAX_FEATURED {
            return Ok(Json(ActionResult::field(
                "is_featured",
                format!("Máximo {MAX_FEATURED} productos destacados"),
            )));
        }
    }

    let change = FeaturedChange {
        is_featured: form.featured,
    };
    if let Err(e) = state
        .data
        .update(Query::table("products").eq("id", id), &change)
        .await
    {
        state.toasts.error("Error al guardar", e.to_string());
        return Ok(Json(remote_error("is_featured", e)));
    }

    state.cache.invalidate(&PRODUCT_KEYS).await;
    state.toasts.success(
        if form.featured { "Producto destacado" } else { "Destacado retirado" },
        "",
    );
    Ok(Json(ActionResult::done()))
}

/// Reordering is only offered inside one category's view, so the request
/// names the category and every row update is pinned to it.
#[derive(Debug, Deserialize)]
pub struct ProductReorderRequest {
    pub category_id: Uuid,
    pub from: Uuid,
    pub to: Uuid,
}

pub async fn reorder_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProductReorderRequest>,
) -> Result<Json<ReorderResult>, AppError> {
    let _guard = state.lock_scope(&scope_key(request.category_id)).await;

    let drop = ReorderRequest {
        from: request.from,
        to: request.to,
    };
    let result = commit_drag(
        &state,
        "products",
        Some(("category_id", request.category_id)),
        &drop,
    )
    .await?;
    if result.applied > 0 {
        state.cache.invalidate(&PRODUCT_KEYS).await;
    }
    if result.ok {
        state.toasts.success("Orden guardado", "El nuevo orden se aplicó.");
    } else {
        state
            .toasts
            .error("Orden incompleto", "Algunos productos no se actualizaron.");
    }
    Ok(Json(result))
}
