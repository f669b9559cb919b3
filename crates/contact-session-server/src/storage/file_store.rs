use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{is_valid_id, SessionRepository, StoreError};
use crate::models::Session;

/// One pretty-printed JSON file per session under `base_dir`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_dir: PathBuf,
}

impl FileSessionStore {
    /// Create the store, creating `base_dir` if it does not exist yet.
    pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: base_dir.clone(),
                source,
            })?;

        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Used by the readiness probe.
    pub async fn is_available(&self) -> bool {
        fs::metadata(&self.base_dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }

    fn temp_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{id}.json.tmp"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

#[async_trait]
impl SessionRepository for FileSessionStore {
    async fn read(&self, id: &str) -> Result<Option<Session>, StoreError> {
        if !is_valid_id(id) {
            debug!("Rejected malformed session id {:?}", id);
            return Ok(None);
        }

        let path = self.session_path(id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Unreadable session document, treating as missing"
                );
                Ok(None)
            }
        }
    }

    async fn write(&self, session: &Session) -> Result<(), StoreError> {
        if !is_valid_id(&session.id) {
            return Err(StoreError::InvalidId(session.id.clone()));
        }

        let json = serde_json::to_vec_pretty(session)?;
        let tmp_path = self.temp_path(&session.id);
        let path = self.session_path(&session.id);

        let mut tmp_file = fs::File::create(&tmp_path).await.map_err(io_error(&tmp_path))?;
        tmp_file.write_all(&json).await.map_err(io_error(&tmp_path))?;
        tmp_file.sync_all().await.map_err(io_error(&tmp_path))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path).await.map_err(io_error(&path))?;

        debug!(
            "Persisted session {} ({} contacts, {} bytes)",
            session.id,
            session.contacts.len(),
            json.len()
        );
        Ok(())
    }
}
