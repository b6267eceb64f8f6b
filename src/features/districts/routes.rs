use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::districts::handlers;
use crate::features::districts::services::DistrictService;

/// Create routes for the district directory
pub fn routes(service: Arc<DistrictService>) -> Router {
    Router::new()
        .route("/api/v1/districts", get(handlers::list_districts))
        .route("/api/v1/districts/{id}", get(handlers::get_district))
        .with_state(service)
}
