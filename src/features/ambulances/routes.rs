use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::ambulances::{handlers, services::AmbulanceService};

/// Create routes for the ambulance registry
pub fn routes(service: Arc<AmbulanceService>) -> Router {
    Router::new()
        .route(
            "/api/v1/ambulance",
            get(handlers::list_ambulances).post(handlers::create_ambulance),
        )
        .route(
            "/api/v1/ambulance/",
            get(handlers::list_ambulances).post(handlers::create_ambulance),
        )
        .route("/api/v1/ambulance/create/", post(handlers::create_ambulance))
        .route(
            "/api/v1/ambulance/{id}/",
            get(handlers::get_ambulance)
                .patch(handlers::update_ambulance)
                .delete(handlers::delete_ambulance),
        )
        .route(
            "/api/v1/ambulance/{id}/add_driver",
            post(handlers::add_driver),
        )
        .route(
            "/api/v1/ambulance/{id}/remove_driver",
            delete(handlers::remove_driver),
        )
        .with_state(service)
}
