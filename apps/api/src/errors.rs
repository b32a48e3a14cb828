use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::form::{EntryId, FormError, SectionKind};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The form is not ready for preview. Carries every failed check.
    #[error("Unprocessable entity: {}", .0.join("; "))]
    UnprocessableEntity(Vec<String>),

    /// The save payload broke one or more storage rules.
    #[error("Invalid resume: {}", .0.join("; "))]
    InvalidResume(Vec<String>),

    /// Add refused because the latest entry of the section is still blank.
    #[error("{kind} entry {entry_id} is still empty")]
    EmptyEntry { kind: SectionKind, entry_id: EntryId },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::NotFound { .. } => AppError::NotFound(err.to_string()),
            FormError::InvalidOperation(msg) => AppError::Validation(msg),
            FormError::RejectedEmptyAdd { kind, id } => AppError::EmptyEntry { kind, entry_id: id },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                errors.join("; "),
            ),
            AppError::InvalidResume(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.join("; "),
            ),
            AppError::EmptyEntry { kind, entry_id } => (
                StatusCode::CONFLICT,
                "EMPTY_ENTRY",
                format!("Fill in {kind} entry {entry_id} before adding another"),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        match &self {
            AppError::EmptyEntry { kind, entry_id } => {
                error["section"] = json!(kind);
                error["entry_id"] = json!(entry_id);
            }
            AppError::UnprocessableEntity(errors) | AppError::InvalidResume(errors) => {
                error["errors"] = json!(errors);
            }
            _ => {}
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_mapping() {
        let not_found: AppError = FormError::NotFound {
            kind: SectionKind::Project,
            id: 3,
        }
        .into();
        assert!(matches!(not_found, AppError::NotFound(ref m) if m == "No project entry with id 3"));

        let invalid: AppError = FormError::InvalidOperation("nope".to_string()).into();
        assert!(matches!(invalid, AppError::Validation(_)));
    }

    #[test]
    fn test_status_codes() {
        let empty = AppError::EmptyEntry {
            kind: SectionKind::Hobby,
            entry_id: 2,
        };
        assert_eq!(empty.into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_list_kept_in_envelope() {
        let response = AppError::UnprocessableEntity(vec![
            "Email is required".to_string(),
            "At least one Hobby is required".to_string(),
        ])
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["error"]["errors"],
            json!(["Email is required", "At least one Hobby is required"])
        );
        assert_eq!(
            body["error"]["message"],
            "Email is required; At least one Hobby is required"
        );

        let invalid = AppError::InvalidResume(vec!["Signature is required".to_string()]);
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
