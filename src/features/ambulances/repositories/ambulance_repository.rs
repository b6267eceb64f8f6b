use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::ambulances::models::{
    Ambulance, AmbulanceDriver, AmbulanceFields, NewAmbulance, NewAmbulanceDriver,
};

/// Criteria for listing ambulances. All set criteria must match.
#[derive(Debug, Clone, Default)]
pub struct AmbulanceFilter {
    /// Case-insensitive substring of vehicle number or owner name
    pub search: Option<String>,
    /// District occupying any of the three slots
    pub district: Option<Uuid>,
    pub ambulance_type: Option<i32>,
    pub owner_phone_number: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Storage for ambulances and their drivers.
///
/// Ambulances are listed newest first; drivers oldest first.
#[async_trait]
pub trait AmbulanceRepository: Send + Sync {
    /// One page of matching ambulances and the total match count
    async fn list(&self, filter: &AmbulanceFilter) -> Result<(Vec<Ambulance>, i64)>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ambulance>>;

    /// Whether another ambulance already uses `vehicle_number`
    async fn vehicle_number_exists(
        &self,
        vehicle_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool>;

    /// Ids from `ids` that are not in the district directory
    async fn missing_districts(&self, ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// Insert an ambulance together with its initial drivers, all or nothing
    async fn insert(&self, ambulance: &NewAmbulance, drivers: &[NewAmbulanceDriver]) -> Result<()>;

    /// Overwrite all writable columns. Returns false when the ambulance does not exist.
    async fn update(&self, id: Uuid, fields: &AmbulanceFields) -> Result<bool>;

    /// Delete an ambulance and its drivers. Returns false when it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn list_drivers(&self, ambulance_id: Uuid) -> Result<Vec<AmbulanceDriver>>;

    /// Attach a driver. `None` when the ambulance does not exist.
    async fn insert_driver(
        &self,
        ambulance_id: Uuid,
        driver: &NewAmbulanceDriver,
    ) -> Result<Option<AmbulanceDriver>>;

    /// Detach `driver_id`, or the most recently added driver when `None`.
    /// Returns the removed driver, `None` when nothing matched.
    async fn delete_driver(
        &self,
        ambulance_id: Uuid,
        driver_id: Option<Uuid>,
    ) -> Result<Option<AmbulanceDriver>>;
}
