mod ambulance_dto;

pub use ambulance_dto::*;
