//! Shared plumbing for the admin mutation handlers.
//!
//! Every create/update answers an [`ActionResult`]: `{ "ok": true }` or
//! `{ "ok": false, "errors": { field: message } }`. Validation failures and
//! remote write failures both travel through the `errors` map so the form
//! can pin each message to its field; deletes and reorders have their own
//! smaller result shapes.

use lacteos_store::{models::OrderRow, DataClient, Query, StoreError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    reorder::{apply_plan, Coordinator, OrderedRow},
    state::AppState,
    validate::FieldErrors,
};

#[derive(Debug, Serialize)]
pub struct ActionResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ActionResult {
    pub fn done() -> Self {
        Self {
            ok: true,
            errors: None,
        }
    }

    pub fn rejected(errors: FieldErrors) -> Self {
        Self {
            ok: false,
            errors: Some(errors),
        }
    }

    /// Single message pinned to one field, used to surface a remote failure
    /// on its most relevant field.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, message.into());
        Self::rejected(errors)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteResult {
    pub fn done() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

/// One drop event: move `from` onto `to` within the scope's displayed list.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: Uuid,
    pub to: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ReorderResult {
    pub ok: bool,
    /// Updates that reached the remote store.
    pub applied: usize,
    /// Updates the commit plan contained.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Remote truth after a partial failure, re-fetched so the caller can
    /// reconcile instead of trusting its optimistic order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<OrderedRow>>,
}

impl ReorderResult {
    pub fn noop() -> Self {
        Self {
            ok: true,
            applied: 0,
            total: 0,
            error: None,
            orders: None,
        }
    }
}

/// Order indices currently in use within a scope. The query narrows the
/// projection to `order_index`; update callers add a `neq` on their own id.
pub async fn fetch_orders(data: &DataClient, query: Query) -> Result<Vec<i32>, AppError> {
    let rows: Vec<OrderRow> = data.select(query.select("order_index")).await?;
    Ok(rows.iter().map(|row| row.order_index).collect())
}

/// Runs one drop event end to end: load the scope's rows, drive the
/// coordinator, apply the plan sequentially, and on partial failure re-fetch
/// the scope so the response carries what the store actually holds.
///
/// The caller must already hold the scope lock.
pub async fn commit_drag(
    state: &AppState,
    table: &str,
    scope: Option<(&str, Uuid)>,
    request: &ReorderRequest,
) -> Result<ReorderResult, AppError> {
    let rows = fetch_scope(&state.data, table, scope).await?;

    let mut coordinator = Coordinator::new(rows);
    if !coordinator.begin_drag(request.from) {
        return Ok(ReorderResult::noop());
    }
    let plan = coordinator.drop_on(request.to);
    if plan.is_empty() {
        return Ok(ReorderResult::noop());
    }

    let outcome = apply_plan(&state.data, table, scope, &plan).await;
    coordinator.finish();

    match outcome {
        Ok(applied) => Ok(ReorderResult {
            ok: true,
            applied,
            total: plan.len(),
            error: None,
            orders: None,
        }),
        Err((applied, e)) => {
            let orders = fetch_scope(&state.data, table, scope).await.ok();
            Ok(ReorderResult {
                ok: false,
                applied,
                total: plan.len(),
                error: Some(e.to_string()),
                orders,
            })
        }
    }
}

async fn fetch_scope(
    data: &DataClient,
    table: &str,
    scope: Option<(&str, Uuid)>,
) -> Result<Vec<OrderedRow>, AppError> {
    let mut query = Query::table(table)
        .select("id,order_index")
        .order("order_index.asc");
    if let Some((column, value)) = scope {
        query = query.eq(column, value);
    }
    Ok(data.select(query).await?)
}

/// Maps a remote write failure onto its most relevant field.
pub fn remote_error(field: &'static str, e: StoreError) -> ActionResult {
    ActionResult::field(field, e.to_string())
}
