use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::RwLock;

use crate::data::models::declaration_row_model::{DeclarationRowModel, ReceiptLogModel};

use super::declarations_datasource::DeclarationsDatasource;

/// Process-local store, for tests and dry runs.
#[derive(Default)]
pub struct DeclarationsMemoryDatasource {
    rows: RwLock<Vec<DeclarationRowModel>>,
    receipt_logs: RwLock<Vec<ReceiptLogModel>>,
}

impl DeclarationsMemoryDatasource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn receipt_logs(&self) -> Vec<ReceiptLogModel> {
        self.receipt_logs.read().await.clone()
    }
}

#[async_trait]
impl DeclarationsDatasource for DeclarationsMemoryDatasource {
    async fn insert(&self, row: &DeclarationRowModel) -> Result<bool, ServerError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id == row.id) {
            return Ok(false);
        }
        rows.push(row.clone());
        Ok(true)
    }

    async fn select_all(&self) -> Result<Vec<DeclarationRowModel>, ServerError> {
        Ok(self.rows.read().await.clone())
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<DeclarationRowModel>, ServerError> {
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn upsert(&self, row: &DeclarationRowModel) -> Result<(), ServerError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.id == row.id) {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, ServerError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }

    async fn insert_receipt_log(&self, log: &ReceiptLogModel) -> Result<(), ServerError> {
        self.receipt_logs.write().await.push(log.clone());
        Ok(())
    }
}
