use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use brigada_core::FirefighterId;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/:id/custody", get(get_custody))
}

pub async fn get_custody(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: FirefighterId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.firefighter(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("no firefighter {id}"),
            )
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    match services.custody_for(id).await {
        Ok(balances) => Json(
            balances
                .iter()
                .map(dto::CustodyResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
