//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fw_storage::StorageError;
use fw_wiki::TitleError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Title in the URL is not a valid page title.
    #[error("Page not found: {path}")]
    InvalidTitle {
        /// Raw title segment from the URL.
        path: String,
        /// Validation failure.
        #[source]
        source: TitleError,
    },

    /// Storage failure while saving a page.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Template rendering failure.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidTitle { .. } => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Template(_) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use fw_storage::StorageErrorKind;
    use fw_wiki::Title;

    use super::*;

    #[test]
    fn test_invalid_title_is_not_found() {
        let source = Title::parse("a.b").unwrap_err();
        let err = ServerError::InvalidTitle {
            path: "a.b".to_owned(),
            source,
        };

        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_panicked_task_is_reported_as_task_failure() {
        let handle: tokio::task::JoinHandle<()> =
            tokio::task::spawn_blocking(|| panic!("save exploded"));
        let join_err = handle.await.unwrap_err();
        let err = ServerError::from(join_err);

        assert!(matches!(err, ServerError::Task(_)));
        assert!(err.to_string().starts_with("Background task failed"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err = ServerError::from(StorageError::new(StorageErrorKind::PermissionDenied));

        assert_eq!(err.to_string(), "Permission denied");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
