use std::time::Duration;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    data::models::declaration_row_model::{DeclarationRowModel, ReceiptLogModel},
    entities::DatabaseConfig,
    errors::{DatabaseRejectedRequest, DatabaseRequestFailed},
};

use super::declarations_datasource::DeclarationsDatasource;

const DECLARATIONS_TABLE: &str = "declarations";
const RECEIPT_LOGS_TABLE: &str = "receipt_logs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosted Postgres tables, reached through the PostgREST interface under
/// `{url}/rest/v1/`.
pub struct DeclarationsRestDatasource {
    http: Client,
    base_url: String,
    api_key: String,
}

impl DeclarationsRestDatasource {
    pub fn new(config: &DatabaseConfig) -> Result<Self, ServerError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DatabaseRequestFailed::with_debug(DECLARATIONS_TABLE, &e))?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
    }

    async fn dispatch(
        &self,
        table: &str,
        request: RequestBuilder,
    ) -> Result<Response, ServerError> {
        request
            .send()
            .await
            .map_err(|e| DatabaseRequestFailed::with_debug(table, &e))
    }

    async fn ensure_success(
        &self,
        table: &str,
        response: Response,
    ) -> Result<Response, ServerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(table, %status, body = %body.chars().take(200).collect::<String>(), "request rejected");
        Err(DatabaseRejectedRequest::with_debug(table, status.as_u16(), &body))
    }

    async fn send(&self, table: &str, request: RequestBuilder) -> Result<Response, ServerError> {
        let response = self.dispatch(table, request).await?;
        self.ensure_success(table, response).await
    }

    async fn rows(&self, table: &str, response: Response) -> Result<Vec<Value>, ServerError> {
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| DatabaseRequestFailed::with_debug(table, &e))
    }
}

fn decode_row(v: Value) -> Option<DeclarationRowModel> {
    let id = v.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
    serde_json::from_value(v)
        .map_err(|e| warn!(id = %id, error = %e, "skipping unreadable declaration row"))
        .ok()
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

#[async_trait]
impl DeclarationsDatasource for DeclarationsRestDatasource {
    async fn insert(&self, row: &DeclarationRowModel) -> Result<bool, ServerError> {
        let request = self
            .request(Method::POST, DECLARATIONS_TABLE)
            .header("Prefer", "return=minimal")
            .json(row);
        let response = self.dispatch(DECLARATIONS_TABLE, request).await?;
        // PostgREST answers a primary-key clash with 409.
        if response.status() == StatusCode::CONFLICT {
            return Ok(false);
        }
        self.ensure_success(DECLARATIONS_TABLE, response)
            .await
            .map(|_| true)
    }

    async fn select_all(&self) -> Result<Vec<DeclarationRowModel>, ServerError> {
        let request = self
            .request(Method::GET, DECLARATIONS_TABLE)
            .query(&[("select", "*")]);
        let response = self.send(DECLARATIONS_TABLE, request).await?;
        Ok(self
            .rows(DECLARATIONS_TABLE, response)
            .await?
            .into_iter()
            .filter_map(decode_row)
            .collect())
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<DeclarationRowModel>, ServerError> {
        let request = self
            .request(Method::GET, DECLARATIONS_TABLE)
            .query(&[("select", "*")])
            .query(&id_filter(id));
        let response = self.send(DECLARATIONS_TABLE, request).await?;
        Ok(self
            .rows(DECLARATIONS_TABLE, response)
            .await?
            .into_iter()
            .next()
            .and_then(decode_row))
    }

    async fn upsert(&self, row: &DeclarationRowModel) -> Result<(), ServerError> {
        let request = self
            .request(Method::POST, DECLARATIONS_TABLE)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row);
        self.send(DECLARATIONS_TABLE, request).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> Result<bool, ServerError> {
        let request = self
            .request(Method::DELETE, DECLARATIONS_TABLE)
            .header("Prefer", "return=representation")
            .query(&id_filter(id));
        let response = self.send(DECLARATIONS_TABLE, request).await?;
        Ok(!self.rows(DECLARATIONS_TABLE, response).await?.is_empty())
    }

    async fn insert_receipt_log(&self, log: &ReceiptLogModel) -> Result<(), ServerError> {
        let request = self
            .request(Method::POST, RECEIPT_LOGS_TABLE)
            .header("Prefer", "return=minimal")
            .json(log);
        self.send(RECEIPT_LOGS_TABLE, request).await.map(|_| ())
    }
}
