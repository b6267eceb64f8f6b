mod ambulance;
mod ambulance_driver;

pub use ambulance::{Ambulance, AmbulanceFields, AmbulanceType, NewAmbulance};
pub use ambulance_driver::{AmbulanceDriver, NewAmbulanceDriver};
