//! JSON-file implementation of URL storage.
//!
//! The whole record set lives in memory and is written to disk as a pretty-printed
//! JSON array after every mutation. Each save goes to a temporary file in the same
//! directory that is then renamed over the target, so readers of the file never
//! observe a partial write.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::url_index::UrlIndex;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlStorage;
use crate::error::AppError;

/// File-backed storage.
///
/// Disk I/O happens while the exclusive lock is held, which serializes writers.
/// Every save rewrites the full file.
///
/// Once a write holds the lock, saving and updating the index run on a spawned
/// task that owns the guard. Dropping the calling future cannot stop that task
/// halfway, so the file and the index never disagree.
#[derive(Debug)]
pub struct FileUrlStorage {
    path: PathBuf,
    index: Arc<RwLock<UrlIndex>>,
}

impl FileUrlStorage {
    /// Opens storage at `path`, loading existing records if the file exists.
    ///
    /// Missing parent directories are created. An empty file is treated as an
    /// empty record set.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the path has no file name, the file cannot
    /// be read or parsed, or the stored records violate uniqueness.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        if path.file_name().is_none() {
            return Err(AppError::internal(
                "File storage path must name a file",
                json!({ "path": path.display().to_string() }),
            ));
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let records = load_records(&path).await?;
        debug!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            index: Arc::new(RwLock::new(UrlIndex::from_records(records)?)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }

    fn temp_path(&self) -> PathBuf {
        temp_path_for(&self.path)
    }

    /// Saves the index plus `records`, then adds `records` to the index.
    ///
    /// The index is only touched once the file is safely renamed.
    async fn commit(
        &self,
        mut index: OwnedRwLockWriteGuard<UrlIndex>,
        records: Vec<UrlRecord>,
    ) -> Result<(), AppError> {
        let path = self.path.clone();

        let task = tokio::spawn(async move {
            let mut snapshot = index.snapshot();
            snapshot.extend_from_slice(&records);
            persist(&path, &snapshot).await?;

            for record in records {
                index.insert(record);
            }
            Ok::<_, AppError>(())
        });

        task.await.map_err(|e| {
            AppError::internal(
                "File storage write task failed",
                json!({ "reason": e.to_string() }),
            )
        })?
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `records` to the temporary file and renames it over `path`.
async fn persist(path: &Path, records: &[UrlRecord]) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(records)?;
    let tmp = temp_path_for(path);

    let mut file = fs::File::create(&tmp).await?;
    file.write_all(&payload).await?;
    file.write_all(b"\n").await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn load_records(path: &Path) -> Result<Vec<UrlRecord>, AppError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl UrlStorage for FileUrlStorage {
    async fn insert(&self, record: &UrlRecord) -> Result<(), AppError> {
        let index = self.index.clone().write_owned().await;
        index.check(record)?;

        self.commit(index, vec![record.clone()]).await
    }

    async fn insert_batch(&self, records: &[UrlRecord]) -> Result<(), AppError> {
        let index = self.index.clone().write_owned().await;
        index.check_batch(records)?;

        self.commit(index, records.to_vec()).await
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.index.read().await.get_by_hash(hash).cloned())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, AppError> {
        Ok(self
            .index
            .read()
            .await
            .get_by_original_url(original_url)
            .cloned())
    }

    async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self.index.read().await.all_by_user(user_id))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
