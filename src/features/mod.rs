pub mod ambulances;
pub mod auth;
pub mod districts;
