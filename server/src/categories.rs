//! Category handlers.
//!
//! Categories order the whole menu; their scope for order-index uniqueness
//! is the full table. Deleting a category never cascades: its products move
//! to the fixed General category first, and General itself is protected.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Form, Json,
};
use lacteos_store::{
    models::{
        Category, CategoryChanges, CategoryReassign, NewCategory, GENERAL_CATEGORY_ID,
    },
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
    cache::{ADMIN_CATEGORIES, PRODUCT_KEYS},
    error::AppError,
    state::AppState,
    validate::validate_category,
};

const SCOPE: &str = "categories";

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default = "default_order")]
    pub order_index: String,
}

fn default_order() -> String {
    "1".to_string()
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    if let Some(rows) = state.cache.get_json::<Vec<Category>>(ADMIN_CATEGORIES).await {
        return Ok(Json(rows));
    }
    let rows: Vec<Category> = state
        .data
        .select(Query::table("categories").order("order_index.asc"))
        .await?;
    state.cache.put_json(ADMIN_CATEGORIES, &rows).await;
    Ok(Json(rows))
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CategoryForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("categories")).await?;
    let errors = validate_category(&form.name, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let record = NewCategory {
        name: form.name.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
    };
    if let Err(e) = state.data.insert("categories", &record).await {
        state.toasts.error("Error al crear", e.to_string());
        return Ok(Json(remote_error("name", e)));
    }

    state.cache.invalidate(&PRODUCT_KEYS).await;
    state.toasts.success("Categoría creada", "La categoría se creó correctamente.");
    info!("Category created: {}", record.name);
    Ok(Json(ActionResult::done()))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<CategoryForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("categories").neq("id", id)).await?;
    let errors = validate_category(&form.name, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let changes = CategoryChanges {
        name: form.name.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
    };
    if let Err(e) = state
        .data
        .update(Query::table("categories").eq("id", id), &changes)
        .await
    {
        state.toasts.error("Error al guardar", e.to_string());
        return Ok(Json(remote_error("name", e)));
    }

    state.cache.invalidate(&PRODUCT_KEYS).await;
    state.toasts.success("Categoría actualizada", "Los cambios se guardaron.");
    Ok(Json(ActionResult::done()))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, AppError> {
    if id == GENERAL_CATEGORY_ID {
        return Ok(Json(DeleteResult::failed(
            "No se puede eliminar la categoría General",
        )));
    }

    let _guard = state.lock_scope(SCOPE).await;

    // Adopt the orphans before the category row goes away.
    let reassign = CategoryReassign {
        category_id: GENERAL_CATEGORY_ID,
    };
    if let Err(e) = state
        .data
        .update(Query::table("products").eq("category_id", id), &reassign)
        .await
    {
        state.toasts.error("Error al eliminar", e.to_string());
        return Ok(Json(DeleteResult::failed(e.to_string())));
    }

    if let Err(e) = state
        .data
        .delete(Query::table("categories").eq("id", id))
        .await
    {
        state.toasts.error("Error al eliminar", e.to_string());
        return Ok(Json(DeleteResult::failed(e.to_string())));
    }

    state.cache.invalidate(&PRODUCT_KEYS).await;
    state.toasts.success("Categoría eliminada", "Sus productos pasaron a General.");
    info!("Category {id} deleted, products moved to General");
    Ok(Json(DeleteResult::done()))
}

pub async fn reorder_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ReorderResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let result = commit_drag(&state, "categories", None, &request).await?;
    if result.applied > 0 {
        state.cache.invalidate(&PRODUCT_KEYS).await;
    }
    if result.ok {
        state.toasts.success("Orden guardado", "El nuevo orden se aplicó.");
    } else {
        state
            .toasts
            .error("Orden incompleto", "Algunas categorías no se actualizaron.");
    }
    Ok(Json(result))
}
