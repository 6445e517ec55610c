//! Gallery handlers.
//!
//! Same upload-then-insert discipline as videos, with the image bucket and
//! the gallery's own size and format rules. Remote failures land on the
//! `image` field for storage calls and on `product` for row writes.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Form, Json,
};
use lacteos_store::{
    models::{GalleryChanges, GalleryItem, ImageUrlRow, NewGalleryItem},
    storage::object_name,
    Query, GALLERY_BUCKET,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    actions::{
        commit_drag, fetch_orders, remote_error, ActionResult, DeleteResult, ReorderRequest,
        ReorderResult,
    },
    cache::{ADMIN_GALLERY, GALLERY_KEYS},
    error::AppError,
    state::AppState,
    validate::{check_image_file, validate_gallery},
};

const SCOPE: &str = "galeria";

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    if let Some(rows) = state.cache.get_json::<Vec<GalleryItem>>(ADMIN_GALLERY).await {
        return Ok(Json(rows));
    }
    let rows: Vec<GalleryItem> = state
        .data
        .select(Query::table("galeria").order("order_index.asc"))
        .await?;
    state.cache.put_json(ADMIN_GALLERY, &rows).await;
    Ok(Json(rows))
}

struct UploadForm {
    product: String,
    price: String,
    order_index: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm {
        product: String::new(),
        price: String::new(),
        order_index: "1".to_string(),
        file_name: String::new(),
        content_type: "application/octet-stream".to_string(),
        bytes: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::MalformedPayload)?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "product" => {
                form.product = field.text().await.map_err(|_| AppError::MalformedPayload)?;
            }
            "price" => {
                form.price = field.text().await.map_err(|_| AppError::MalformedPayload)?;
            }
            "order_index" => {
                form.order_index = field.text().await.map_err(|_| AppError::MalformedPayload)?;
            }
            "file" => {
                form.file_name = field.file_name().unwrap_or_default().to_string();
                if let Some(content_type) = field.content_type() {
                    form.content_type = content_type.to_string();
                }
                form.bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::MalformedPayload)?
                    .to_vec();
            }
            _ => {}
        }
    }

    Ok(form)
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ActionResult>, AppError> {
    let form = read_upload(multipart).await?;
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("galeria")).await?;
    let errors = validate_gallery(&form.product, &form.price, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let ext = match check_image_file(&form.file_name, form.bytes.len()) {
        Ok(ext) => ext,
        Err(message) => return Ok(Json(ActionResult::field("image", message))),
    };

    let path = format!("{}.{ext}", Uuid::new_v4());
    if let Err(e) = state
        .storage
        .upload(GALLERY_BUCKET, &path, &form.content_type, form.bytes)
        .await
    {
        state.toasts.error("Error al subir", e.to_string());
        return Ok(Json(remote_error("image", e)));
    }

    let record = NewGalleryItem {
        product: form.product.trim().to_string(),
        price: form.price.trim().to_string(),
        image_url: state.storage.public_url(GALLERY_BUCKET, &path),
        order_index: form.order_index.trim().parse().unwrap_or(1),
    };
    if let Err(e) = state.data.insert("galeria", &record).await {
        if let Err(cleanup) = state.storage.remove(GALLERY_BUCKET, &path).await {
            warn!("Orphaned gallery blob {path} left behind: {cleanup}");
        }
        state.toasts.error("Error al crear", e.to_string());
        return Ok(Json(remote_error("product", e)));
    }

    state.cache.invalidate(&GALLERY_KEYS).await;
    state.toasts.success("Imagen agregada", "La imagen se subió correctamente.");
    info!("Gallery item created: {}", record.product);
    Ok(Json(ActionResult::done()))
}

#[derive(Debug, Deserialize)]
pub struct GalleryForm {
    pub product: String,
    pub price: String,
    #[serde(default = "default_order")]
    pub order_index: String,
}

#[derive(Debug, Deserialize)]
pub struct GalleryUrlForm {
    pub product: String,
    pub price: String,
    #[serde(default = "default_order")]
    pub order_index: String,
    #[serde(default)]
    pub image_url: String,
}

fn default_order() -> String {
    "1".to_string()
}

/// Persists the row for an image the client uploaded directly.
pub async fn record_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<GalleryUrlForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("galeria")).await?;
    let errors = validate_gallery(&form.product, &form.price, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }
    if form.image_url.trim().is_empty() {
        return Ok(Json(ActionResult::field("image", "Falta la URL de la imagen.")));
    }

    let record = NewGalleryItem {
        product: form.product.trim().to_string(),
        price: form.price.trim().to_string(),
        image_url: form.image_url.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
    };
    if let Err(e) = state.data.insert("galeria", &record).await {
        state.toasts.error("Error al crear", e.to_string());
        return Ok(Json(remote_error("product", e)));
    }

    state.cache.invalidate(&GALLERY_KEYS).await;
    state.toasts.success("Imagen agregada", "La imagen se registró correctamente.");
    Ok(Json(ActionResult::done()))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<GalleryForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("galeria").neq("id", id)).await?;
    let errors = validate_gallery(&form.product, &form.price, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let changes = GalleryChanges {
        product: form.product.trim().to_string(),
        price: form.price.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
        image_url: None,
    };
    if let Err(e) = state
        .data
        .update(Query::table("galeria").eq("id", id), &changes)
        .await
    {
        state.toasts.error("Error al guardar", e.to_string());
        return Ok(Json(remote_error("product", e)));
    }

    state.cache.invalidate(&GALLERY_KEYS).await;
    state.toasts.success("Imagen actualizada", "Los cambios se guardaron.");
    Ok(Json(ActionResult::done()))
}

/// Replacement with a client-uploaded image, old blob removed best-effort
/// after the row points at the new URL.
pub async fn replace_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<GalleryUrlForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("galeria").neq("id", id)).await?;
    let errors = validate_gallery(&form.product, &form.price, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }
    if form.image_url.trim().is_empty() {
        return Ok(Json(ActionResult::field("image", "Falta la URL de la imagen.")));
    }

    let current: Vec<ImageUrlRow> = state
        .data
        .select(Query::table("galeria").select("image_url").eq("id", id).limit(1))
        .await?;
    let previous = current
        .first()
        .and_then(|row| object_name(&row.image_url))
        .map(str::to_string);

    let changes = GalleryChanges {
        product: form.product.trim().to_string(),
        price: form.price.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
        image_url: Some(form.image_url.trim().to_string()),
    };
    if let Err(e) = state
        .data
        .update(Query::table("galeria").eq("id", id), &changes)
        .await
    {
        state.toasts.error("Error al guardar", e.to_string());
        return Ok(Json(remote_error("product", e)));
    }

    if let Some(previous) = previous {
        if let Err(e) = state.storage.remove(GALLERY_BUCKET, &previous).await {
            warn!("Previous gallery blob {previous} left behind: {e}");
        }
    }

    state.cache.invalidate(&GALLERY_KEYS).await;
    state.toasts.success("Imagen actualizada", "La imagen se reemplazó.");
    Ok(Json(ActionResult::done()))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, AppError> {
    let current: Vec<ImageUrlRow> = state
        .data
        .select(Query::table("galeria").select("image_url").eq("id", id).limit(1))
        .await?;
    if let Some(name) = current.first().and_then(|row| object_name(&row.image_url)) {
        if let Err(e) = state.storage.remove(GALLERY_BUCKET, name).await {
            warn!("Gallery blob {name} left behind: {e}");
        }
    }

    if let Err(e) = state.data.delete(Query::table("galeria").eq("id", id)).await {
        state.toasts.error("Error al eliminar", e.to_string());
        return Ok(Json(DeleteResult::failed(e.to_string())));
    }

    state.cache.invalidate(&GALLERY_KEYS).await;
    state.toasts.success("Imagen eliminada", "La imagen se eliminó correctamente.");
    Ok(Json(DeleteResult::done()))
}

pub async fn reorder_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ReorderResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let result = commit_drag(&state, "galeria", None, &request).await?;
    if result.applied > 0 {
        state.cache.invalidate(&GALLERY_KEYS).await;
    }
    if result.ok {
        state.toasts.success("Orden guardado", "El nuevo orden se aplicó.");
    } else {
        state
            .toasts
            .error("Orden incompleto", "Algunas imágenes no se actualizaron.");
    }
    Ok(Json(result))
}
