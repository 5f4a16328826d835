use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::data::models::declaration_row_model::{DeclarationRowModel, ReceiptLogModel};

/// Storage backend for declaration rows and the receipt audit log.
#[async_trait]
pub trait DeclarationsDatasource: Send + Sync {
    /// `false` when the id is already taken; nothing is written then.
    async fn insert(&self, row: &DeclarationRowModel) -> Result<bool, ServerError>;

    /// Rows that cannot be read back are skipped.
    async fn select_all(&self) -> Result<Vec<DeclarationRowModel>, ServerError>;

    async fn select_by_id(&self, id: &str) -> Result<Option<DeclarationRowModel>, ServerError>;

    async fn upsert(&self, row: &DeclarationRowModel) -> Result<(), ServerError>;

    /// Whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, ServerError>;

    async fn insert_receipt_log(&self, log: &ReceiptLogModel) -> Result<(), ServerError>;
}

/// Lets callers keep a handle on a datasource they hand to the repository.
#[async_trait]
impl<T: DeclarationsDatasource + ?Sized> DeclarationsDatasource for Arc<T> {
    async fn insert(&self, row: &DeclarationRowModel) -> Result<bool, ServerError> {
        (**self).insert(row).await
    }

    async fn select_all(&self) -> Result<Vec<DeclarationRowModel>, ServerError> {
        (**self).select_all().await
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<DeclarationRowModel>, ServerError> {
        (**self).select_by_id(id).await
    }

    async fn upsert(&self, row: &DeclarationRowModel) -> Result<(), ServerError> {
        (**self).upsert(row).await
    }

    async fn delete(&self, id: &str) -> Result<bool, ServerError> {
        (**self).delete(id).await
    }

    async fn insert_receipt_log(&self, log: &ReceiptLogModel) -> Result<(), ServerError> {
        (**self).insert_receipt_log(log).await
    }
}
