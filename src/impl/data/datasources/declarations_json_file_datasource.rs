use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    data::models::declaration_row_model::{DeclarationRowModel, ReceiptLogModel},
    errors::{ReadError, SerializationFailed, WriteError},
};

use super::declarations_datasource::DeclarationsDatasource;

/// On-disk layout: both tables in one JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    declarations: Vec<Value>,
    #[serde(default)]
    receipt_logs: Vec<Value>,
}

/// Single JSON document on disk, for offline use. A missing file reads as an
/// empty store and is created on first write.
pub struct DeclarationsJsonFileDatasource {
    path: PathBuf,
    // Serialises read-modify-write cycles.
    lock: Mutex<()>,
}

impl DeclarationsJsonFileDatasource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreDocument, ServerError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) if s.trim().is_empty() => Ok(StoreDocument::default()),
            Ok(s) => serde_json::from_str(&s).map_err(|e| ReadError::with_debug(&e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing, starting empty");
                Ok(StoreDocument::default())
            }
            Err(e) => Err(ReadError::with_debug(&e)),
        }
    }

    async fn save(&self, doc: &StoreDocument) -> Result<(), ServerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WriteError::with_debug(&e))?;
        }
        let content = serde_json::to_string_pretty(doc)
            .map_err(|e| SerializationFailed::with_debug("store document", &e))?;
        // Staged beside the store, then renamed over it.
        let staging = self.staging_path();
        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| WriteError::with_debug(&e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| WriteError::with_debug(&e))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn row_id(v: &Value) -> Option<&str> {
    v.get("id").and_then(Value::as_str)
}

fn to_value<T: serde::Serialize>(what: &str, v: &T) -> Result<Value, ServerError> {
    serde_json::to_value(v).map_err(|e| SerializationFailed::with_debug(what, &e))
}

fn decode_row(v: Value) -> Option<DeclarationRowModel> {
    let id = row_id(&v).unwrap_or("?").to_string();
    serde_json::from_value(v)
        .map_err(|e| warn!(id = %id, error = %e, "skipping unreadable declaration row"))
        .ok()
}

#[async_trait]
impl DeclarationsDatasource for DeclarationsJsonFileDatasource {
    async fn insert(&self, row: &DeclarationRowModel) -> Result<bool, ServerError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        if doc.declarations.iter().any(|v| row_id(v) == Some(&row.id)) {
            return Ok(false);
        }
        doc.declarations.push(to_value("declaration row", row)?);
        self.save(&doc).await?;
        Ok(true)
    }

    async fn select_all(&self) -> Result<Vec<DeclarationRowModel>, ServerError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await?
            .declarations
            .into_iter()
            .filter_map(decode_row)
            .collect())
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<DeclarationRowModel>, ServerError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await?
            .declarations
            .into_iter()
            .find(|v| row_id(v) == Some(id))
            .and_then(decode_row))
    }

    async fn upsert(&self, row: &DeclarationRowModel) -> Result<(), ServerError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let value = to_value("declaration row", row)?;
        match doc
            .declarations
            .iter_mut()
            .find(|v| row_id(v) == Some(&row.id))
        {
            Some(existing) => *existing = value,
            None => doc.declarations.push(value),
        }
        self.save(&doc).await
    }

    async fn delete(&self, id: &str) -> Result<bool, ServerError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let before = doc.declarations.len();
        doc.declarations.retain(|v| row_id(v) != Some(id));
        if doc.declarations.len() == before {
            return Ok(false);
        }
        self.save(&doc).await?;
        Ok(true)
    }

    async fn insert_receipt_log(&self, log: &ReceiptLogModel) -> Result<(), ServerError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        doc.receipt_logs.push(to_value("receipt log", log)?);
        self.save(&doc).await
    }
}
