use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::utils::error::ApiError;

/// Request body accepted as JSON or urlencoded form.
///
/// The size cap (`DefaultBodyLimit`) applies to every content type. A body
/// with any other content type, or an empty JSON body, yields `T::default()`
/// so field validation reports what is missing.
#[derive(Debug)]
pub struct RequestBody<T>(pub T);

impl<S, T> FromRequest<S> for RequestBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| from_status(rejection.status(), rejection.body_text()))?;
            return Ok(RequestBody(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| from_status(rejection.status(), rejection.body_text()))?;

        let is_json = content_type.starts_with("application/json")
            || (content_type.starts_with("application/") && content_type.contains("+json"));
        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RequestBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(RequestBody)
            .map_err(|e| match e.classify() {
                Category::Data => ApiError::Unprocessable(format!("Unexpected body shape: {}", e)),
                _ => ApiError::BadRequest(format!("Malformed JSON body: {}", e)),
            })
    }
}

fn from_status(status: StatusCode, text: String) -> ApiError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(text),
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable(text),
        _ => ApiError::BadRequest(text),
    }
}
