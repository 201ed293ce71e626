use crate::i18n::ValidationError;
use crate::store::StoreError;
use crate::translation::ProviderError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Every way a request can fail.
///
/// The `Display` text is what clients see in the `Error` field. Provider and
/// store failures keep their cause as `source()` for logging only.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Server only accepts application/json data.")]
    UnsupportedMediaType,

    #[error("Request body is not valid JSON.")]
    MalformedBody,

    #[error("Request body missing at least one of the required attributes.")]
    MissingField,

    #[error("At least one attribute with invalid value of null")]
    NullField,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid pagination cursor.")]
    InvalidCursor,

    #[error("Translation provider failed to translate the text.")]
    Provider(#[from] ProviderError),

    #[error("Translation storage is unavailable.")]
    Store(#[source] StoreError),

    #[error("No translation with this translation_id exists.")]
    NotFound,

    #[error("Not acceptable.")]
    NotAcceptable,

    #[error("Method not allowed.")]
    MethodNotAllowed { allow: &'static str },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidCursor(_) => Self::InvalidCursor,
            other => Self::Store(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::MalformedBody
            | AppError::MissingField
            | AppError::NullField
            | AppError::Validation(_)
            | AppError::InvalidCursor => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            // 405 carries only the Allow header
            AppError::MethodNotAllowed { allow } => {
                return (status, [(header::ALLOW, *allow)]).into_response();
            }
            AppError::Provider(e) => error!("Translation provider error: {}", e),
            AppError::Store(e) => error!("Record store error: {}", e),
            _ => {}
        }

        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::UnsupportedMediaType.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(AppError::MissingField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NullField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Validation(ValidationError::TextEmpty).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotAcceptable.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            AppError::Provider(ProviderError::InvalidResponse("x".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Store(StoreError::Database(sqlx::Error::PoolClosed)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_has_single_error_key() {
        let response = AppError::Validation(ValidationError::SourceUnsupported).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 1);
        assert_eq!(
            object["Error"],
            "Source language is not supported or incorrect source language code provided."
        );
    }

    #[tokio::test]
    async fn test_provider_error_detail_not_leaked() {
        let err = AppError::Provider(ProviderError::InvalidResponse(
            "secret upstream payload".to_string(),
        ));
        let json = body_json(err.into_response()).await;

        let message = json["Error"].as_str().unwrap();
        assert!(!message.contains("secret upstream payload"));
        assert_eq!(message, "Translation provider failed to translate the text.");
    }

    #[tokio::test]
    async fn test_method_not_allowed_has_allow_header_and_empty_body() {
        let response = AppError::MethodNotAllowed { allow: "GET, POST" }.into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_invalid_cursor_store_error_maps_to_bad_request() {
        let err = AppError::from(StoreError::InvalidCursor("abc".to_string()));
        assert!(matches!(err, AppError::InvalidCursor));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
