use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::info;

use crate::error::IndexError;
use crate::index::VectorIndex;

/// The single on-disk index at a fixed path.
///
/// Saves go through `<path>.tmp` and a rename under the write lock, so a
/// concurrent load sees either the previous index or the new one.
pub struct IndexStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        let _guard = self.lock.read().await;
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Replace the persisted index with `index`.
    pub async fn save(&self, index: &VectorIndex) -> Result<(), IndexError> {
        let bytes = rmp_serde::to_vec_named(index)?;
        let tmp_path = tmp_path_for(&self.path);

        let _guard = self.lock.write().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| IndexError::io(parent, e))?;
        }
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| IndexError::io(&tmp_path, e))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(IndexError::io(&self.path, e));
        }

        info!(
            path = %self.path.display(),
            chunks = index.len(),
            bytes = bytes.len(),
            "Saved vector index"
        );
        Ok(())
    }

    /// Load the persisted index. [`IndexError::NotFound`] when none exists.
    pub async fn load(&self) -> Result<VectorIndex, IndexError> {
        let bytes = {
            let _guard = self.lock.read().await;
            match tokio::fs::read(&self.path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(IndexError::NotFound(self.path.clone()));
                }
                Err(e) => return Err(IndexError::io(&self.path, e)),
            }
        };

        rmp_serde::from_slice(&bytes).map_err(|e| IndexError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
