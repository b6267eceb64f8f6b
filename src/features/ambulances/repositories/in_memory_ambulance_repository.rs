use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::ambulance_repository::{AmbulanceFilter, AmbulanceRepository};
use crate::core::error::{AppError, Result};
use crate::features::ambulances::models::{
    Ambulance, AmbulanceDriver, AmbulanceFields, NewAmbulance, NewAmbulanceDriver,
};

#[derive(Default)]
struct State {
    districts: HashMap<Uuid, String>,
    ambulances: Vec<Ambulance>,
    drivers: Vec<AmbulanceDriver>,
    /// Logical clock so insertion order survives equal wall-clock timestamps
    ticks: i64,
}

impl State {
    fn tick(&mut self) -> chrono::DateTime<Utc> {
        self.ticks += 1;
        Utc::now() + Duration::microseconds(self.ticks)
    }

    fn district_name(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.districts.get(&id).cloned())
    }

    fn apply(&self, a: &mut Ambulance, f: &AmbulanceFields) {
        a.vehicle_number = f.vehicle_number.clone();
        a.owner_name = f.owner_name.clone();
        a.owner_phone_number = f.owner_phone_number.clone();
        a.owner_is_smart_phone = f.owner_is_smart_phone;
        a.primary_district_id = f.primary_district_id;
        a.primary_district_name = self.district_name(f.primary_district_id);
        a.secondary_district_id = f.secondary_district_id;
        a.secondary_district_name = self.district_name(f.secondary_district_id);
        a.third_district_id = f.third_district_id;
        a.third_district_name = self.district_name(f.third_district_id);
        a.has_oxygen = f.has_oxygen;
        a.has_ventilator = f.has_ventilator;
        a.has_suction_machine = f.has_suction_machine;
        a.has_defibrillator = f.has_defibrillator;
        a.insurance_valid_till_year = f.insurance_valid_till_year;
        a.ambulance_type = f.ambulance_type.code();
        a.price_per_km = f.price_per_km;
        a.has_free_service = f.has_free_service;
    }

    fn vehicle_number_taken(&self, vehicle_number: &str, exclude_id: Option<Uuid>) -> bool {
        self.ambulances
            .iter()
            .any(|a| a.vehicle_number == vehicle_number && Some(a.id) != exclude_id)
    }
}

fn duplicate_vehicle_number() -> AppError {
    AppError::field(
        "vehicle_number",
        "ambulance with this vehicle number already exists.",
    )
}

fn matches(a: &Ambulance, filter: &AmbulanceFilter) -> bool {
    if let Some(term) = &filter.search {
        let needle = term.to_lowercase();
        if !a.vehicle_number.to_lowercase().contains(&needle)
            && !a.owner_name.to_lowercase().contains(&needle)
        {
            return false;
        }
    }

    if let Some(district) = filter.district {
        let slots = [
            a.primary_district_id,
            a.secondary_district_id,
            a.third_district_id,
        ];
        if !slots.contains(&Some(district)) {
            return false;
        }
    }

    filter.ambulance_type.is_none_or(|t| a.ambulance_type == t)
        && filter
            .owner_phone_number
            .as_ref()
            .is_none_or(|p| &a.owner_phone_number == p)
}

/// Mutex-guarded ambulance storage for service and route tests
#[derive(Default)]
pub struct InMemoryAmbulanceRepository {
    state: Mutex<State>,
}

impl InMemoryAmbulanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a district to the directory and return its id
    pub fn seed_district(&self, name: &str) -> Uuid {
        let id = Uuid::now_v7();
        self.state
            .lock()
            .unwrap()
            .districts
            .insert(id, name.to_string());
        id
    }

    pub fn count_by_owner_phone(&self, phone: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .ambulances
            .iter()
            .filter(|a| a.owner_phone_number == phone)
            .count()
    }

    pub fn driver_count(&self, ambulance_id: Uuid) -> usize {
        self.state
            .lock()
            .unwrap()
            .drivers
            .iter()
            .filter(|d| d.ambulance_id == ambulance_id)
            .count()
    }

    pub fn total_driver_count(&self) -> usize {
        self.state.lock().unwrap().drivers.len()
    }
}

#[async_trait]
impl AmbulanceRepository for InMemoryAmbulanceRepository {
    async fn list(&self, filter: &AmbulanceFilter) -> Result<(Vec<Ambulance>, i64)> {
        let state = self.state.lock().unwrap();
        let mut matched: Vec<Ambulance> = state
            .ambulances
            .iter()
            .filter(|a| matches(a, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ambulance>> {
        let state = self.state.lock().unwrap();
        Ok(state.ambulances.iter().find(|a| a.id == id).cloned())
    }

    async fn vehicle_number_exists(
        &self,
        vehicle_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.vehicle_number_taken(vehicle_number, exclude_id))
    }

    async fn missing_districts(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let state = self.state.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.districts.contains_key(id))
            .collect())
    }

    async fn insert(&self, ambulance: &NewAmbulance, drivers: &[NewAmbulanceDriver]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.vehicle_number_taken(&ambulance.fields.vehicle_number, None) {
            return Err(duplicate_vehicle_number());
        }

        let now = state.tick();
        let mut row = Ambulance {
            id: ambulance.id,
            vehicle_number: String::new(),
            owner_name: String::new(),
            owner_phone_number: String::new(),
            owner_is_smart_phone: true,
            primary_district_id: None,
            primary_district_name: None,
            secondary_district_id: None,
            secondary_district_name: None,
            third_district_id: None,
            third_district_name: None,
            has_oxygen: false,
            has_ventilator: false,
            has_suction_machine: false,
            has_defibrillator: false,
            insurance_valid_till_year: 0,
            ambulance_type: 1,
            price_per_km: None,
            has_free_service: false,
            created_by: ambulance.created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        state.apply(&mut row, &ambulance.fields);
        state.ambulances.push(row);

        for driver in drivers {
            let at = state.tick();
            state.drivers.push(AmbulanceDriver {
                id: driver.id,
                ambulance_id: ambulance.id,
                name: driver.name.clone(),
                phone_number: driver.phone_number.clone(),
                is_smart_phone: driver.is_smart_phone,
                created_at: at,
                updated_at: at,
            });
        }

        Ok(())
    }

    async fn update(&self, id: Uuid, fields: &AmbulanceFields) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.vehicle_number_taken(&fields.vehicle_number, Some(id)) {
            return Err(duplicate_vehicle_number());
        }

        let Some(index) = state.ambulances.iter().position(|a| a.id == id) else {
            return Ok(false);
        };

        let mut row = state.ambulances[index].clone();
        state.apply(&mut row, fields);
        row.updated_at = state.tick();
        state.ambulances[index] = row;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.ambulances.len();
        state.ambulances.retain(|a| a.id != id);
        if state.ambulances.len() == before {
            return Ok(false);
        }
        state.drivers.retain(|d| d.ambulance_id != id);
        Ok(true)
    }

    async fn list_drivers(&self, ambulance_id: Uuid) -> Result<Vec<AmbulanceDriver>> {
        let state = self.state.lock().unwrap();
        let mut drivers: Vec<AmbulanceDriver> = state
            .drivers
            .iter()
            .filter(|d| d.ambulance_id == ambulance_id)
            .cloned()
            .collect();
        drivers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(drivers)
    }

    async fn insert_driver(
        &self,
        ambulance_id: Uuid,
        driver: &NewAmbulanceDriver,
    ) -> Result<Option<AmbulanceDriver>> {
        let mut state = self.state.lock().unwrap();
        if !state.ambulances.iter().any(|a| a.id == ambulance_id) {
            return Ok(None);
        }

        let at = state.tick();
        let row = AmbulanceDriver {
            id: driver.id,
            ambulance_id,
            name: driver.name.clone(),
            phone_number: driver.phone_number.clone(),
            is_smart_phone: driver.is_smart_phone,
            created_at: at,
            updated_at: at,
        };
        state.drivers.push(row.clone());
        Ok(Some(row))
    }

    async fn delete_driver(
        &self,
        ambulance_id: Uuid,
        driver_id: Option<Uuid>,
    ) -> Result<Option<AmbulanceDriver>> {
        let mut state = self.state.lock().unwrap();
        let target = state
            .drivers
            .iter()
            .enumerate()
            .filter(|(_, d)| d.ambulance_id == ambulance_id)
            .filter(|(_, d)| driver_id.is_none_or(|id| d.id == id))
            .max_by(|(_, a), (_, b)| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .map(|(index, _)| index);

        Ok(target.map(|index| state.drivers.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ambulances::models::AmbulanceType;

    fn new_ambulance(vehicle_number: &str) -> NewAmbulance {
        NewAmbulance {
            id: Uuid::now_v7(),
            fields: AmbulanceFields {
                vehicle_number: vehicle_number.to_string(),
                owner_name: "Manorama".to_string(),
                owner_phone_number: "8888888888".to_string(),
                owner_is_smart_phone: true,
                primary_district_id: None,
                secondary_district_id: None,
                third_district_id: None,
                has_oxygen: false,
                has_ventilator: false,
                has_suction_machine: false,
                has_defibrillator: false,
                insurance_valid_till_year: 2030,
                ambulance_type: AmbulanceType::Basic,
                price_per_km: None,
                has_free_service: true,
            },
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_vehicle_number() {
        let repo = InMemoryAmbulanceRepository::new();
        repo.insert(&new_ambulance("KL13AB1234"), &[]).await.unwrap();

        let err = repo
            .insert(&new_ambulance("KL13AB1234"), &[])
            .await
            .unwrap_err();
        match err {
            AppError::InvalidFields(errors) => assert!(errors.contains_key("vehicle_number")),
            other => panic!("expected field errors, got {:?}", other),
        }
        assert_eq!(repo.count_by_owner_phone("8888888888"), 1);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = InMemoryAmbulanceRepository::new();
        repo.insert(&new_ambulance("KL13AB1234"), &[]).await.unwrap();

        for term in ["%", "_", "KL13", "ab12"] {
            let filter = AmbulanceFilter {
                search: Some(term.to_string()),
                limit: 10,
                ..Default::default()
            };
            let (_, total) = repo.list(&filter).await.unwrap();
            let expected = if term.contains(['%', '_']) { 0 } else { 1 };
            assert_eq!(total, expected, "search {:?}", term);
        }
    }
}
