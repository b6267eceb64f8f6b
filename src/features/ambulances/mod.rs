//! Ambulance registry.
//!
//! Vehicles with up to three service districts and a nested list of drivers.
//! Every route requires an authenticated caller.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/ambulance/` | List ambulances (paginated, filterable) |
//! | POST | `/api/v1/ambulance/create/` | Create an ambulance with drivers |
//! | GET | `/api/v1/ambulance/{id}/` | Ambulance detail with drivers |
//! | PATCH | `/api/v1/ambulance/{id}/` | Partial update |
//! | DELETE | `/api/v1/ambulance/{id}/` | Delete ambulance and drivers |
//! | POST | `/api/v1/ambulance/{id}/add_driver` | Attach a driver |
//! | DELETE | `/api/v1/ambulance/{id}/remove_driver` | Detach a driver |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgAmbulanceRepository;
pub use services::AmbulanceService;
