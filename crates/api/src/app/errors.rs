use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use brigada_core::DomainError;
use brigada_infra::engine::WorkflowError;
use brigada_infra::store::StoreError;

pub fn workflow_error_to_response(err: WorkflowError) -> axum::response::Response {
    match err {
        WorkflowError::Domain(e) => domain_error_to_response(e),
        WorkflowError::Store(e) => store_error_to_response(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        e @ DomainError::InsufficientStock { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", e.to_string())
        }
        e @ DomainError::MissingAssignment => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "missing_assignment", e.to_string())
        }
        e @ DomainError::InsufficientCustody { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_custody", e.to_string())
        }
        e @ DomainError::MissingTransferSource { .. } => {
            json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_transfer_source",
                e.to_string(),
            )
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Connection(msg) | StoreError::Query(msg) | StoreError::Corrupt(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
