//! District directory.
//!
//! Read-only reference data. Ambulances point at up to three districts
//! (primary, secondary, third) and display them by name.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/districts` | List districts (optional `search`) |
//! | GET | `/api/v1/districts/{id}` | Get district by id |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::DistrictService;
