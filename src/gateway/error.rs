use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{FOLIO_STATUS_HEADER, FOLIO_STATUS_INVALID};
use crate::search::SearchError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("invalid request: {0}")]
    Search(#[from] SearchError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, folio_status) = match &self {
            GatewayError::InvalidRequest(_) | GatewayError::Search(_) => {
                (StatusCode::BAD_REQUEST, FOLIO_STATUS_INVALID)
            }
            GatewayError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let mut headers = HeaderMap::new();
        headers.insert(FOLIO_STATUS_HEADER, HeaderValue::from_static(folio_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
