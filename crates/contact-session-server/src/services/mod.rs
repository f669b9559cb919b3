pub mod session_service;
pub mod vcard;

pub use session_service::{SessionError, SessionService};
