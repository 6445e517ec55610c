//! Data-service client.
//!
//! Speaks the hosted service's REST dialect: one resource path per table,
//! filters and projections as query parameters, single-row writes applied
//! atomically server-side. No multi-row transaction is available through
//! this surface; callers that need a read-then-write invariant serialize it
//! themselves.

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{remote_message, StoreError};

/// Filter/projection builder for one table access.
///
/// ```
/// use lacteos_store::Query;
///
/// let query = Query::table("products")
///     .select("order_index")
///     .eq("category_id", "8f9a7c1e-0000-0000-0000-000000000000")
///     .order("order_index.asc");
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) table: String,
    pub(crate) params: Vec<(String, String)>,
}

impl Query {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn neq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("neq.{}", value.to_string())));
        self
    }

    /// Raw order spec, e.g. `"order_index.asc"` or `"order_index.asc,name.asc"`.
    pub fn order(mut self, spec: &str) -> Self {
        self.params.push(("order".into(), spec.to_string()));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".into(), n.to_string()));
        self
    }
}

#[derive(Clone)]
pub struct DataClient {
    http: Client,
    base: String,
    key: String,
}

impl DataClient {
    pub fn new(base: &str, key: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }

    pub async fn select<T: DeserializeOwned>(&self, query: Query) -> Result<Vec<T>, StoreError> {
        let response = self
            .http
            .get(self.url(&query.table))
            .query(&query.params)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Number of rows matching the query. Callers narrow the projection to a
    /// single column so the payload stays small.
    pub async fn count(&self, query: Query) -> Result<usize, StoreError> {
        let rows: Vec<serde_json::Value> = self.select(query).await?;
        Ok(rows.len())
    }

    pub async fn insert<B: Serialize>(&self, table: &str, record: &B) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url(table))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn update<B: Serialize>(&self, query: Query, changes: &B) -> Result<(), StoreError> {
        let response = self
            .http
            .patch(self.url(&query.table))
            .query(&query.params)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(changes)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn delete(&self, query: Query) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.url(&query.table))
            .query(&query.params)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Remote(remote_message(status, &body)))
}
