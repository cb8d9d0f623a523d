//! Shared handler plumbing: id parsing and the certificate-creation path
//! both document kinds go through.

use std::str::FromStr;

use axum::{http::StatusCode, response::IntoResponse, Json};

use brigada_auth::can_create_certificates;
use brigada_certificates::DocumentKind;
use brigada_core::DomainError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// Parse a path id, mapping failure to a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

/// Authorize, map the body, and run the certificate workflow.
pub async fn create_certificate(
    services: &AppServices,
    principal: &PrincipalContext,
    kind: DocumentKind,
    body: dto::CreateCertificateBody,
) -> axum::response::Response {
    if let Err(e) = can_create_certificates(principal.principal()) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let request = match body.into_domain() {
        Ok(request) => request,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let ctx = authz::acting_context(principal.principal());
    match services.create_certificate(kind, ctx, request).await {
        Ok(certificate) => (
            StatusCode::CREATED,
            Json(dto::CertificateResponse::from(&certificate)),
        )
            .into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

/// Fetch one certificate of the expected kind (the two lookup routes are
/// kind-scoped, so a mismatched kind is a 404).
pub async fn certificate_of_kind(
    services: &AppServices,
    kind: DocumentKind,
    raw_id: &str,
) -> axum::response::Response {
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.certificate(id).await {
        Ok(Some(certificate)) if certificate.kind == kind => {
            Json(dto::CertificateResponse::from(&certificate)).into_response()
        }
        Ok(_) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no {} certificate {raw_id}", kind.as_str()),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}
