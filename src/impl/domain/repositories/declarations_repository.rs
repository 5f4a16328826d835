use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;

use crate::entities::{Declaration, DeclarationPatch};

#[async_trait]
pub trait DeclarationsRepository: Send + Sync {
    /// Persists a new declaration and returns it as stored (scrubbed). `None`
    /// when its id is already taken.
    async fn save(&self, declaration: &Declaration) -> Result<Option<Declaration>, ServerError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Declaration>, ServerError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Declaration>, ServerError>;

    /// Fails with `DeclarationNotFound` when there is nothing to update. A new
    /// vehicle comes with a recomputed tax.
    async fn update(
        &self,
        id: &str,
        patch: DeclarationPatch,
        now: DateTime<Utc>,
    ) -> Result<Declaration, ServerError>;

    async fn delete(&self, id: &str) -> Result<bool, ServerError>;
}
