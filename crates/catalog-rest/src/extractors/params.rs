//! Path and query extractors with uniform error bodies.

use axum::{
    async_trait,
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::ErrorResponse;
use serde::de::DeserializeOwned;

/// Path parameters; parse failures become `400 INVALID_PARAMETER`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParam<T>(pub T);

/// Query string parameters; parse failures become `400 INVALID_PARAMETER`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

/// Rejection for [`PathParam`] and [`QueryParams`].
#[derive(Debug)]
pub enum ParamRejection {
    Path(PathRejection),
    Query(QueryRejection),
}

impl IntoResponse for ParamRejection {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::Path(rejection) => (rejection.status(), rejection.body_text()),
            Self::Query(rejection) => (rejection.status(), rejection.body_text()),
        };
        let error_response = ErrorResponse {
            code: "INVALID_PARAMETER".to_string(),
            message: detail,
            details: None,
        };
        (status, Json(error_response)).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(ParamRejection::Path)?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ParamRejection::Query)?;
        Ok(Self(value))
    }
}
