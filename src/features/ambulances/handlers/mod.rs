mod ambulance_handler;

pub use ambulance_handler::*;
