use axum::{routing::get, Router};

pub mod certificates;
pub mod common;
pub mod firefighters;
pub mod materials;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/certificates", certificates::router())
        .nest("/materials", materials::router())
        .nest("/firefighters", firefighters::router())
}
