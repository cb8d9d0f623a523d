use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use brigada_core::MaterialId;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(get_material))
        .route("/:id/history", get(get_material_history))
}

pub async fn get_material(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MaterialId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.material(id).await {
        Ok(Some(material)) => Json(dto::MaterialResponse::from(&material)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no material {id}"),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_material_history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MaterialId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // A material with no movements yet still answers with an empty ledger,
    // but an unknown id is a 404.
    match services.material(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("no material {id}"),
            )
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    match services.material_history(id).await {
        Ok(entries) => Json(
            entries
                .iter()
                .map(dto::HistoryEntryResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
