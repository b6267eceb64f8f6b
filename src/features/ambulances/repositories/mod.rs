mod ambulance_repository;
#[cfg(test)]
mod in_memory_ambulance_repository;
mod pg_ambulance_repository;

pub use ambulance_repository::*;
#[cfg(test)]
pub use in_memory_ambulance_repository::InMemoryAmbulanceRepository;
pub use pg_ambulance_repository::PgAmbulanceRepository;
