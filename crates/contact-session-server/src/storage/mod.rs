//! Session persistence (port + file-backed adapter)

mod file_store;
mod locks;

pub use file_store::FileSessionStore;
pub use locks::{SessionLockGuard, SessionLocks};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Session;

const MAX_ID_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid session id: {0:?}")]
    InvalidId(String),
}

/// Storage port for session documents.
///
/// `read` reports a missing *or* unparseable document as `Ok(None)`.
/// `write` must be atomic: readers see either the old or the new document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn read(&self, id: &str) -> Result<Option<Session>, StoreError>;
    async fn write(&self, session: &Session) -> Result<(), StoreError>;
}

/// Ids are used as file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(is_valid_id("3f2a9c1b"));
        assert!(is_valid_id("session_01-A"));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("../etc/passwd"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a.json"));
        assert!(!is_valid_id(&"a".repeat(65)));
    }
}
