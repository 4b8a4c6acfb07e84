//! JSON body extractor with uniform error bodies.
//!
//! Wraps [`axum::Json`] so that malformed bodies are answered with an
//! [`ErrorResponse`] carrying the `INVALID_JSON` code instead of axum's plain
//! text rejection. Validation of the decoded value is left to the service.

use catalog_core::ErrorResponse;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

/// JSON extractor that reports decoding failures as `400 INVALID_JSON`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

/// Rejection for [`JsonBody`].
#[derive(Debug)]
pub struct JsonBodyRejection(JsonRejection);

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        let error_response = ErrorResponse {
            code: "INVALID_JSON".to_string(),
            message: format!("Invalid JSON: {}", self.0.body_text()),
            details: None,
        };
        (status, Json(error_response)).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection)?;
        Ok(Self(value))
    }
}
