//! Video handlers.
//!
//! Creation uploads the binary first and only then inserts the metadata row;
//! if that insert fails the fresh blob is deleted so storage does not
//! accumulate orphans. Replacement goes upload → row update → best-effort
//! delete of the previous blob, in that order, so the old file stays
//! retrievable until the new row is durable. Cleanup failures are logged and
//! swallowed: the row is the source of truth and a leftover blob is cheap.
//!
//! Large uploads can also happen directly from the browser against the
//! storage service; the `record` and `archivo` routes then only persist the
//! resulting URL.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Form, Json,
};
use lacteos_store::{
    models::{FileUrlRow, NewVideo, Video, VideoChanges},
    storage::object_name,
    Query, VIDEO_BUCKET,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    actions::{
        commit_drag, fetch_orders, remote_error, ActionResult, DeleteResult, ReorderRequest,
        ReorderResult,
    },
    cache::{ADMIN_VIDEOS, VIDEO_KEYS},
    error::AppError,
    state::AppState,
    validate::{check_video_file, validate_video},
};

const SCOPE: &str = "videos";

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Video>>, AppError> {
    if let Some(rows) = state.cache.get_json::<Vec<Video>>(ADMIN_VIDEOS).await {
        return Ok(Json(rows));
    }
    let rows: Vec<Video> = state
        .data
        .select(Query::table("videos").order("order_index.asc"))
        .await?;
    state.cache.put_json(ADMIN_VIDEOS, &rows).await;
    Ok(Json(rows))
}

struct UploadForm {
    name: String,
    order_index: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm {
        name: String::new(),
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
            "name" => {
                form.name = field.text().await.map_err(|_| AppError::MalformedPayload)?;
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

    let existing = fetch_orders(&state.data, Query::table("videos")).await?;
    let errors = validate_video(&form.name, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let ext = match check_video_file(&form.file_name, form.bytes.len()) {
        Ok(ext) => ext,
        Err(message) => return Ok(Json(ActionResult::field("file", message))),
    };

    let path = format!("{}.{ext}", Uuid::new_v4());
    if let Err(e) = state
        .storage
        .upload(VIDEO_BUCKET, &path, &form.content_type, form.bytes)
        .await
    {
        state.toasts.error("Error al subir", e.to_string());
        return Ok(Json(remote_error("file", e)));
    }

    let record = NewVideo {
        name: form.name.trim().to_string(),
        file_url: state.storage.public_url(VIDEO_BUCKET, &path),
        order_index: form.order_index.trim().parse().unwrap_or(1),
    };
    if let Err(e) = state.data.insert("videos", &record).await {
        // Do not leave the fresh blob orphaned; losing the cleanup is fine.
        if let Err(cleanup) = state.storage.remove(VIDEO_BUCKET, &path).await {
            warn!("Orphaned video blob {path} left behind: {cleanup}");
        }
        state.toasts.error("Error al crear", e.to_string());
        return Ok(Json(remote_error("name", e)));
    }

    state.cache.invalidate(&VIDEO_KEYS).await;
    state.toasts.success("Video creado", "El video se subió correctamente.");
    info!("Video created: {}", record.name);
    Ok(Json(ActionResult::done()))
}

#[derive(Debug, Deserialize)]
pub struct VideoForm {
    pub name: String,
    #[serde(default = "default_order")]
    pub order_index: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoUrlForm {
    pub name: String,
    #[serde(default = "default_order")]
    pub order_index: String,
    #[serde(default)]
    pub file_url: String,
}

fn default_order() -> String {
    "1".to_string()
}

/// Persists the row for a video whose binary the client uploaded directly.
pub async fn record_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<VideoUrlForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("videos")).await?;
    let errors = validate_video(&form.name, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }
    if form.file_url.trim().is_empty() {
        return Ok(Json(ActionResult::field("file", "Falta la URL del video.")));
    }

    let record = NewVideo {
        name: form.name.trim().to_string(),
        file_url: form.file_url.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
    };
    if let Err(e) = state.data.insert("videos", &record).await {
        state.toasts.error("Error al crear", e.to_string());
        return Ok(Json(remote_error("name", e)));
    }

    state.cache.invalidate(&VIDEO_KEYS).await;
    state.toasts.success("Video creado", "El video se registró correctamente.");
    Ok(Json(ActionResult::done()))
}

/// Metadata-only update; the file stays as it is.
pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<VideoForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("videos").neq("id", id)).await?;
    let errors = validate_video(&form.name, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }

    let changes = VideoChanges {
        name: form.name.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
        file_url: None,
    };
    if let Err(e) = state
        .data
        .update(Query::table("videos").eq("id", id), &changes)
        .await
    {
        state.toasts.error("Error al guardar", e.to_string());
        return Ok(Json(remote_error("name", e)));
    }

    state.cache.invalidate(&VIDEO_KEYS).await;
    state.toasts.success("Video actualizado", "Los cambios se guardaron.");
    Ok(Json(ActionResult::done()))
}

/// Replacement with a client-uploaded file: the row points at the new URL
/// first, then the previous blob is removed best-effort.
pub async fn replace_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<VideoUrlForm>,
) -> Result<Json<ActionResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let existing = fetch_orders(&state.data, Query::table("videos").neq("id", id)).await?;
    let errors = validate_video(&form.name, &form.order_index, &existing);
    if !errors.is_empty() {
        return Ok(Json(ActionResult::rejected(errors)));
    }
    if form.file_url.trim().is_empty() {
        return Ok(Json(ActionResult::field("file", "Falta la URL del video.")));
    }

    let current: Vec<FileUrlRow> = state
        .data
        .select(Query::table("videos").select("file_url").eq("id", id).limit(1))
        .await?;
    let previous = current
        .first()
        .and_then(|row| object_name(&row.file_url))
        .map(str::to_string);

    let changes = VideoChanges {
        name: form.name.trim().to_string(),
        order_index: form.order_index.trim().parse().unwrap_or(1),
        file_url: Some(form.file_url.trim().to_string()),
    };
    if let Err(e) = state
        .data
        .update(Query::table("videos").eq("id", id), &changes)
        .await
    {
        state.toasts.error("Error al guardar", e.to_string());
        return Ok(Json(remote_error("name", e)));
    }

    if let Some(previous) = previous {
        if let Err(e) = state.storage.remove(VIDEO_BUCKET, &previous).await {
            warn!("Previous video blob {previous} left behind: {e}");
        }
    }

    state.cache.invalidate(&VIDEO_KEYS).await;
    state.toasts.success("Video actualizado", "El archivo se reemplazó.");
    Ok(Json(ActionResult::done()))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, AppError> {
    let current: Vec<FileUrlRow> = state
        .data
        .select(Query::table("videos").select("file_url").eq("id", id).limit(1))
        .await?;
    if let Some(name) = current.first().and_then(|row| object_name(&row.file_url)) {
        if let Err(e) = state.storage.remove(VIDEO_BUCKET, name).await {
            warn!("Video blob {name} left behind: {e}");
        }
    }

    if let Err(e) = state.data.delete(Query::table("videos").eq("id", id)).await {
        state.toasts.error("Error al eliminar", e.to_string());
        return Ok(Json(DeleteResult::failed(e.to_string())));
    }

    state.cache.invalidate(&VIDEO_KEYS).await;
    state.toasts.success("Video eliminado", "El video se eliminó correctamente.");
    Ok(Json(DeleteResult::done()))
}

pub async fn reorder_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ReorderResult>, AppError> {
    let _guard = state.lock_scope(SCOPE).await;

    let result = commit_drag(&state, "videos", None, &request).await?;
    if result.applied > 0 {
        state.cache.invalidate(&VIDEO_KEYS).await;
    }
    if result.ok {
        state.toasts.success("Orden guardado", "El nuevo orden se aplicó.");
    } else {
        state
            .toasts
            .error("Orden incompleto", "Algunos videos no se actualizaron.");
    }
    Ok(Json(result))
}
