use chrono::Utc;
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::session::{minutes_field, text_field};
use crate::models::{AddContactRequest, Contact, CreateSessionRequest, Session};
use crate::security::RateLimiter;
use crate::services::vcard::render_vcards;
use crate::storage::{SessionLocks, SessionRepository, StoreError};
use crate::utils::sanitise;

const ID_LEN: usize = 8;
const ID_ATTEMPTS: usize = 5;
const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Not found")]
    NotFound,

    #[error("Too many requests")]
    RateLimited,

    #[error("Session full")]
    SessionFull,

    #[error("Could not allocate a unique session id")]
    IdExhausted,

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Append task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Create/read/append/export over a [`SessionRepository`].
pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    locks: SessionLocks,
    rate_limiter: Arc<RateLimiter>,
    max_contacts: usize,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        rate_limiter: Arc<RateLimiter>,
        max_contacts: usize,
    ) -> Self {
        Self {
            repository,
            locks: SessionLocks::new(),
            rate_limiter,
            max_contacts,
        }
    }

    pub async fn create(&self, request: CreateSessionRequest) -> Result<Session, SessionError> {
        let (Some(raw_name), Some(minutes)) = (
            text_field(request.session_name.as_ref()),
            minutes_field(request.minutes.as_ref()),
        ) else {
            return Err(SessionError::InvalidInput("Missing fields"));
        };

        let name = sanitise(&raw_name);
        if name.is_empty() {
            return Err(SessionError::InvalidInput("Invalid input"));
        }

        let expires_at = expiry_from_now(minutes)
            .ok_or(SessionError::InvalidInput("Invalid duration"))?;
        let id = self.allocate_id().await?;

        let session = Session::new(id, name, expires_at);
        self.repository.write(&session).await?;

        info!(
            "Created session {} ({:?}, expires at {})",
            session.id, session.name, session.expires_at
        );
        Ok(session)
    }

    pub async fn get(&self, id: &str) -> Result<Session, SessionError> {
        self.repository
            .read(id)
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Checks run in order: rate limit, presence, sanitised content,
    /// existence, capacity. Only a fully valid contact changes state.
    pub async fn add_contact(
        &self,
        id: &str,
        client_ip: IpAddr,
        request: AddContactRequest,
    ) -> Result<Contact, SessionError> {
        if self.rate_limiter.check(client_ip) {
            return Err(SessionError::RateLimited);
        }

        let (Some(raw_name), Some(raw_phone)) = (
            text_field(request.name.as_ref()),
            text_field(request.phone.as_ref()),
        ) else {
            return Err(SessionError::InvalidInput("Name and phone required"));
        };

        let contact = Contact {
            name: sanitise(&raw_name),
            phone: sanitise(&raw_phone),
        };
        if contact.name.is_empty() || contact.phone.is_empty() {
            return Err(SessionError::InvalidInput("Invalid input"));
        }

        // The locked read-modify-write runs detached: dropping the request
        // future (client disconnect) must not cancel a half-done write.
        let repository = self.repository.clone();
        let locks = self.locks.clone();
        let max_contacts = self.max_contacts;
        let session_id = id.to_string();
        let stored = contact.clone();
        let task = tokio::spawn(async move {
            let _guard = locks.lock(&session_id).await;

            let mut session = repository
                .read(&session_id)
                .await?
                .ok_or(SessionError::NotFound)?;
            if session.contacts.len() >= max_contacts {
                warn!(
                    "Session {} is full ({} contacts)",
                    session_id,
                    session.contacts.len()
                );
                return Err(SessionError::SessionFull);
            }

            session.contacts.push(stored);
            repository.write(&session).await?;
            Ok(session.contacts.len())
        });
        let count = task.await??;

        debug!(
            "Added contact to session {} from {} (now {})",
            id, client_ip, count
        );
        Ok(contact)
    }

    pub async fn export_vcard(&self, id: &str) -> Result<String, SessionError> {
        let session = self.get(id).await?;
        info!(
            "Exporting {} contacts from session {}",
            session.contacts.len(),
            id
        );
        Ok(render_vcards(&session.contacts))
    }

    async fn allocate_id(&self) -> Result<String, SessionError> {
        for _ in 0..ID_ATTEMPTS {
            let id = new_session_id();
            if self.repository.read(&id).await?.is_none() {
                return Ok(id);
            }
            warn!("Session id collision on {}, retrying", id);
        }
        Err(SessionError::IdExhausted)
    }
}

/// Short opaque id: the first hex digits of a random v4 UUID.
pub fn new_session_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}

fn expiry_from_now(minutes: f64) -> Option<i64> {
    let ttl_ms = (minutes * MS_PER_MINUTE).round();
    if !ttl_ms.is_finite() || ttl_ms >= i64::MAX as f64 || ttl_ms <= i64::MIN as f64 {
        return None;
    }
    Utc::now().timestamp_millis().checked_add(ttl_ms as i64)
}
