mod ambulance_service;

pub use ambulance_service::AmbulanceService;
