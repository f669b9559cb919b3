use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::models::{
    AddContactRequest, AddContactResponse, CreateSessionRequest, CreateSessionResponse, Session,
};
use crate::security::ClientIp;
use crate::services::vcard::{attachment_disposition, VCARD_CONTENT_TYPE};
use crate::services::{SessionError, SessionService};
use crate::utils::error::ApiError;
use crate::utils::RequestBody;

/// POST /api/create
pub async fn create_session_handler(
    State(service): State<Arc<SessionService>>,
    RequestBody(request): RequestBody<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let session = service.create(request).await?;
    Ok(Json(CreateSessionResponse { id: session.id }))
}

/// GET /api/session/{id}
pub async fn get_session_handler(
    State(service): State<Arc<SessionService>>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(service.get(&id).await?))
}

/// POST /api/session/{id}/contact
pub async fn add_contact_handler(
    State(service): State<Arc<SessionService>>,
    Path(id): Path<String>,
    ClientIp(client_ip): ClientIp,
    RequestBody(request): RequestBody<AddContactRequest>,
) -> Result<Json<AddContactResponse>, ApiError> {
    service.add_contact(&id, client_ip, request).await?;
    Ok(Json(AddContactResponse { success: true }))
}

/// GET /api/session/{id}/contacts.vcf
///
/// A missing session answers with plain text rather than JSON.
pub async fn export_contacts_handler(
    State(service): State<Arc<SessionService>>,
    Path(id): Path<String>,
) -> Response {
    match service.export_vcard(&id).await {
        Ok(body) => {
            info!("Serving vCard export for session {} ({} bytes)", id, body.len());
            (
                [
                    (CONTENT_TYPE, VCARD_CONTENT_TYPE.to_string()),
                    (CONTENT_DISPOSITION, attachment_disposition()),
                ],
                body,
            )
                .into_response()
        }
        Err(SessionError::NotFound) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
