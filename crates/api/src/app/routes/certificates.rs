use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::{get, post},
    Json, Router,
};

use brigada_certificates::DocumentKind;

use crate::app::dto;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/deliveries", post(create_delivery))
        .route("/deliveries/:id", get(get_delivery))
        .route("/receptions", post(create_reception))
        .route("/receptions/:id", get(get_reception))
}

pub async fn create_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateCertificateBody>,
) -> axum::response::Response {
    common::create_certificate(&services, &principal, DocumentKind::Delivery, body).await
}

pub async fn create_reception(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateCertificateBody>,
) -> axum::response::Response {
    common::create_certificate(&services, &principal, DocumentKind::Reception, body).await
}

pub async fn get_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::certificate_of_kind(&services, DocumentKind::Delivery, &id).await
}

pub async fn get_reception(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    common::certificate_of_kind(&services, DocumentKind::Reception, &id).await
}
