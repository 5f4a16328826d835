use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    data::{
        datasources::declarations_datasource::DeclarationsDatasource,
        models::declaration_row_model::{DeclarationRowModel, ReceiptLogModel},
    },
    domain::repositories::declarations_repository::DeclarationsRepository,
    entities::{Declaration, DeclarationPatch, PortalConfig},
    errors::{DeclarationNotFound, SerializationFailed},
};

/// Datasource-backed store with a session cache in front of it. Every write
/// goes through the hygiene scrub on its way to the row model.
pub(crate) struct DeclarationsRepositoryImpl<DS: DeclarationsDatasource> {
    datasource: DS,
    config: PortalConfig,
    cache: RwLock<HashMap<String, Declaration>>,
}

impl<DS: DeclarationsDatasource> DeclarationsRepositoryImpl<DS> {
    pub(crate) fn new(datasource: DS, config: PortalConfig) -> Self {
        Self {
            datasource,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Scrubbed row plus the declaration as it will read back.
    fn prepare(declaration: &Declaration) -> Result<(DeclarationRowModel, Declaration), ServerError> {
        let row = DeclarationRowModel::from_declaration(declaration)?;
        let stored = row.clone().into_declaration()?;
        Ok((row, stored))
    }

    async fn write_receipt_log(&self, stored: &Declaration) {
        let full_receipt_data = match serde_json::to_value(stored) {
            Ok(v) => v,
            Err(e) => {
                let e = SerializationFailed::with_debug("receipt log", &e);
                warn!(id = %stored.id, error = %e, "receipt log not written");
                return;
            }
        };
        let log = ReceiptLogModel {
            reference_number: stored.id.clone(),
            qr_code_content: self.config.verify_url(&stored.id),
            full_receipt_data,
            created_at: stored.created_at,
        };
        if let Err(e) = self.datasource.insert_receipt_log(&log).await {
            warn!(id = %stored.id, error = %e, "receipt log not written");
        }
    }
}

#[async_trait]
impl<DS: DeclarationsDatasource> DeclarationsRepository for DeclarationsRepositoryImpl<DS> {
    async fn save(&self, declaration: &Declaration) -> Result<Option<Declaration>, ServerError> {
        let (row, stored) = Self::prepare(declaration)?;

        // Cached before the write so the record is readable immediately.
        self.cache
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        match self.datasource.insert(&row).await {
            Ok(true) => {}
            Ok(false) => {
                self.cache.write().await.remove(&stored.id);
                debug!(id = %stored.id, "declaration id already taken");
                return Ok(None);
            }
            Err(e) => {
                self.cache.write().await.remove(&stored.id);
                return Err(e);
            }
        }

        self.write_receipt_log(&stored).await;
        info!(id = %stored.id, plate = %stored.vehicle.plate, "declaration saved");
        Ok(Some(stored))
    }

    async fn list(&self) -> Result<Vec<Declaration>, ServerError> {
        let mut declarations: Vec<Declaration> = self
            .datasource
            .select_all()
            .await?
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                row.into_declaration()
                    .map_err(|e| warn!(id = %id, error = %e, "skipping undecodable declaration"))
                    .ok()
            })
            .collect();
        declarations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = declarations.len(), "declarations listed");
        Ok(declarations)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Declaration>, ServerError> {
        if let Some(cached) = self.cache.read().await.get(id) {
            return Ok(Some(cached.clone()));
        }
        self.datasource
            .select_by_id(id)
            .await?
            .map(DeclarationRowModel::into_declaration)
            .transpose()
    }

    async fn update(
        &self,
        id: &str,
        patch: DeclarationPatch,
        now: DateTime<Utc>,
    ) -> Result<Declaration, ServerError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DeclarationNotFound::new(id))?;
        let (row, stored) =
            Self::prepare(&current.apply(patch, self.config.exchange_rate, now))?;

        self.cache
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        if let Err(e) = self.datasource.upsert(&row).await {
            // Next read goes back to the datasource.
            self.cache.write().await.remove(&stored.id);
            return Err(e);
        }
        info!(id = %stored.id, status = %stored.status, "declaration updated");
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServerError> {
        self.cache.write().await.remove(id);
        let removed = self.datasource.delete(id).await?;
        if removed {
            info!(id, "declaration deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::{
        data::datasources::declarations_memory_datasource::DeclarationsMemoryDatasource,
        domain::logic::declaration_generator::DeclarationGenerator,
        entities::DeclarationStatus,
    };

    fn repository() -> (
        Arc<DeclarationsMemoryDatasource>,
        DeclarationsRepositoryImpl<Arc<DeclarationsMemoryDatasource>>,
    ) {
        let ds = Arc::new(DeclarationsMemoryDatasource::new());
        let repo = DeclarationsRepositoryImpl::new(ds.clone(), PortalConfig::default());
        (ds, repo)
    }

    fn declaration(seq: u64) -> Declaration {
        DeclarationGenerator::new(2355.0).generate(seq)
    }

    #[tokio::test]
    async fn save_scrubs_and_writes_an_audit_row() {
        let (ds, repo) = repository();
        let mut d = declaration(1);
        d.vehicle.genre = Some("PERSONNE PHYSIQUE".to_string());

        let stored = repo.save(&d).await.unwrap().unwrap();
        assert_eq!(stored.vehicle.genre.as_deref(), Some("N/A"));

        let logs = ds.receipt_logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].reference_number, d.id);
        assert_eq!(
            logs[0].qr_code_content,
            format!("https://tax-portal-two.vercel.app/verify/{}", d.id)
        );
    }

    #[tokio::test]
    async fn taken_id_is_reported_and_not_cached() {
        let (ds, repo) = repository();
        let d = declaration(2);
        ds.insert(&DeclarationRowModel::from_declaration(&d).unwrap())
            .await
            .unwrap();
        let mut clash = declaration(3);
        clash.id = d.id.clone();

        assert!(repo.save(&clash).await.unwrap().is_none());
        let found = repo.find_by_id(&d.id).await.unwrap().unwrap();
        assert_eq!(found.vehicle.plate, d.vehicle.plate);
        assert!(ds.receipt_logs().await.is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (_, repo) = repository();
        for seq in [5, 40, 12] {
            repo.save(&declaration(seq)).await.unwrap();
        }
        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec![declaration(40).id, declaration(12).id, declaration(5).id]
        );
    }

    #[tokio::test]
    async fn list_skips_undecodable_rows() {
        let (ds, repo) = repository();
        repo.save(&declaration(1)).await.unwrap();
        let mut broken = DeclarationRowModel::from_declaration(&declaration(2)).unwrap();
        broken.tax = serde_json::json!({ "unexpected": true });
        ds.insert(&broken).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_merges_and_stamps() {
        let (_, repo) = repository();
        let d = declaration(4);
        repo.save(&d).await.unwrap();
        let now = d.created_at + Duration::hours(3);

        let updated = repo
            .update(
                &d.id,
                DeclarationPatch {
                    status: Some(DeclarationStatus::Annulee),
                    ..Default::default()
                },
                now,
            )
            .await
            .unwrap();
        assert_eq!(updated.status, DeclarationStatus::Annulee);
        assert_eq!(updated.updated_at, now);
        assert_eq!(updated.created_at, d.created_at);
        assert_eq!(updated.vehicle, d.vehicle);
    }

    #[tokio::test]
    async fn update_of_missing_declaration_fails() {
        let (_, repo) = repository();
        let result = repo
            .update("DECL-2026-B9ED77", DeclarationPatch::default(), Utc::now())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn delete_evicts_and_reports() {
        let (_, repo) = repository();
        let d = declaration(6);
        repo.save(&d).await.unwrap();
        assert!(repo.delete(&d.id).await.unwrap());
        assert!(repo.find_by_id(&d.id).await.unwrap().is_none());
        assert!(!repo.delete(&d.id).await.unwrap());
    }
}
