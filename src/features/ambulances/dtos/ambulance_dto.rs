use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::ambulances::models::{Ambulance, AmbulanceDriver, AmbulanceType};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_INSURANCE_YEAR, MIN_INSURANCE_YEAR};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::{normalize_vehicle_number, PHONE_NUMBER_REGEX, VEHICLE_NUMBER_REGEX};

fn default_true() -> bool {
    true
}

fn default_ambulance_type() -> i32 {
    AmbulanceType::default().code()
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Driver embedded in a create request, or the body of add_driver
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateDriverDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Sasi Kuttan")]
    pub name: String,

    #[validate(regex(path = *PHONE_NUMBER_REGEX, message = "Enter a valid phone number"))]
    #[schema(example = "9447011234")]
    pub phone_number: String,

    #[serde(default = "default_true")]
    pub is_smart_phone: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateAmbulanceDto {
    /// Registration number; whitespace and hyphens are stripped and letters uppercased
    #[validate(
        length(min = 1, max = 20),
        regex(path = *VEHICLE_NUMBER_REGEX, message = "Enter a valid vehicle number")
    )]
    #[schema(example = "KL13AB1234")]
    pub vehicle_number: String,

    #[validate(length(min = 1, max = 255))]
    pub owner_name: String,

    #[validate(regex(path = *PHONE_NUMBER_REGEX, message = "Enter a valid phone number"))]
    #[schema(example = "8888888888")]
    pub owner_phone_number: String,

    #[serde(default = "default_true")]
    pub owner_is_smart_phone: bool,

    pub primary_district: Option<Uuid>,
    pub secondary_district: Option<Uuid>,
    pub third_district: Option<Uuid>,

    #[serde(default)]
    pub has_oxygen: bool,
    #[serde(default)]
    pub has_ventilator: bool,
    #[serde(default)]
    pub has_suction_machine: bool,
    #[serde(default)]
    pub has_defibrillator: bool,

    #[validate(range(min = MIN_INSURANCE_YEAR, max = MAX_INSURANCE_YEAR))]
    #[schema(example = 2027)]
    pub insurance_valid_till_year: i32,

    /// 1 = Basic, 2 = Cardiac, 3 = Hearse
    #[serde(default = "default_ambulance_type")]
    #[schema(example = 1)]
    pub ambulance_type: i32,

    #[schema(value_type = Option<String>, example = "12.50")]
    pub price_per_km: Option<Decimal>,

    #[serde(default)]
    pub has_free_service: bool,

    #[serde(default)]
    #[validate(nested)]
    pub drivers: Vec<CreateDriverDto>,
}

impl CreateAmbulanceDto {
    pub fn normalize(&mut self) {
        self.vehicle_number = normalize_vehicle_number(&self.vehicle_number);
        self.owner_name = self.owner_name.trim().to_string();
        for driver in &mut self.drivers {
            driver.name = driver.name.trim().to_string();
        }
    }
}

impl CreateDriverDto {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
    }
}

/// Partial update. District and price fields accept `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAmbulanceDto {
    #[validate(
        length(min = 1, max = 20),
        regex(path = *VEHICLE_NUMBER_REGEX, message = "Enter a valid vehicle number")
    )]
    pub vehicle_number: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub owner_name: Option<String>,

    #[validate(regex(path = *PHONE_NUMBER_REGEX, message = "Enter a valid phone number"))]
    pub owner_phone_number: Option<String>,

    pub owner_is_smart_phone: Option<bool>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub primary_district: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub secondary_district: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub third_district: Option<Option<Uuid>>,

    pub has_oxygen: Option<bool>,
    pub has_ventilator: Option<bool>,
    pub has_suction_machine: Option<bool>,
    pub has_defibrillator: Option<bool>,

    #[validate(range(min = MIN_INSURANCE_YEAR, max = MAX_INSURANCE_YEAR))]
    pub insurance_valid_till_year: Option<i32>,

    pub ambulance_type: Option<i32>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub price_per_km: Option<Option<Decimal>>,

    pub has_free_service: Option<bool>,
}

impl UpdateAmbulanceDto {
    pub fn normalize(&mut self) {
        if let Some(vehicle_number) = self.vehicle_number.as_mut() {
            *vehicle_number = normalize_vehicle_number(vehicle_number);
        }
        if let Some(owner_name) = self.owner_name.as_mut() {
            *owner_name = owner_name.trim().to_string();
        }
    }
}

/// Optional body of remove_driver
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RemoveDriverDto {
    /// Driver to remove; the most recently added driver when omitted
    pub driver_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct AmbulanceQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Search in vehicle number or owner name
    pub search: Option<String>,

    /// Matches ambulances serving this district in any slot
    pub district: Option<Uuid>,

    /// Filter by ambulance type code
    pub ambulance_type: Option<i32>,

    /// Exact owner phone number
    pub owner_phone_number: Option<String>,
}

impl Default for AmbulanceQueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            search: None,
            district: None,
            ambulance_type: None,
            owner_phone_number: None,
        }
    }
}

impl AmbulanceQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Trimmed `search` term, `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AmbulanceDriverDto {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub is_smart_phone: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AmbulanceDriver> for AmbulanceDriverDto {
    fn from(d: AmbulanceDriver) -> Self {
        Self {
            id: d.id,
            name: d.name,
            phone_number: d.phone_number,
            is_smart_phone: d.is_smart_phone,
            created_at: d.created_at,
        }
    }
}

/// List entry. Districts are shown by name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AmbulanceSummaryDto {
    pub id: Uuid,
    pub vehicle_number: String,
    pub owner_name: String,
    pub owner_phone_number: String,
    pub owner_is_smart_phone: bool,
    pub primary_district: Option<String>,
    pub secondary_district: Option<String>,
    pub third_district: Option<String>,
    pub has_oxygen: bool,
    pub has_ventilator: bool,
    pub has_suction_machine: bool,
    pub has_defibrillator: bool,
    pub insurance_valid_till_year: i32,
    pub ambulance_type: i32,
    #[schema(value_type = Option<String>)]
    pub price_per_km: Option<Decimal>,
    pub has_free_service: bool,
}

impl From<Ambulance> for AmbulanceSummaryDto {
    fn from(a: Ambulance) -> Self {
        Self {
            id: a.id,
            vehicle_number: a.vehicle_number,
            owner_name: a.owner_name,
            owner_phone_number: a.owner_phone_number,
            owner_is_smart_phone: a.owner_is_smart_phone,
            primary_district: a.primary_district_name,
            secondary_district: a.secondary_district_name,
            third_district: a.third_district_name,
            has_oxygen: a.has_oxygen,
            has_ventilator: a.has_ventilator,
            has_suction_machine: a.has_suction_machine,
            has_defibrillator: a.has_defibrillator,
            insurance_valid_till_year: a.insurance_valid_till_year,
            ambulance_type: a.ambulance_type,
            price_per_km: a.price_per_km,
            has_free_service: a.has_free_service,
        }
    }
}

/// Full ambulance representation with its drivers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AmbulanceDetailDto {
    pub id: Uuid,
    pub vehicle_number: String,
    pub owner_name: String,
    pub owner_phone_number: String,
    pub owner_is_smart_phone: bool,
    /// District display names
    pub primary_district: Option<String>,
    pub secondary_district: Option<String>,
    pub third_district: Option<String>,
    /// District ids, as accepted on write
    pub primary_district_id: Option<Uuid>,
    pub secondary_district_id: Option<Uuid>,
    pub third_district_id: Option<Uuid>,
    pub has_oxygen: bool,
    pub has_ventilator: bool,
    pub has_suction_machine: bool,
    pub has_defibrillator: bool,
    pub insurance_valid_till_year: i32,
    pub ambulance_type: i32,
    pub ambulance_type_label: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price_per_km: Option<Decimal>,
    pub has_free_service: bool,
    pub drivers: Vec<AmbulanceDriverDto>,
    /// Account that registered the ambulance
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AmbulanceDetailDto {
    pub fn new(a: Ambulance, drivers: Vec<AmbulanceDriver>) -> Self {
        Self {
            id: a.id,
            vehicle_number: a.vehicle_number,
            owner_name: a.owner_name,
            owner_phone_number: a.owner_phone_number,
            owner_is_smart_phone: a.owner_is_smart_phone,
            primary_district: a.primary_district_name,
            secondary_district: a.secondary_district_name,
            third_district: a.third_district_name,
            primary_district_id: a.primary_district_id,
            secondary_district_id: a.secondary_district_id,
            third_district_id: a.third_district_id,
            has_oxygen: a.has_oxygen,
            has_ventilator: a.has_ventilator,
            has_suction_machine: a.has_suction_machine,
            has_defibrillator: a.has_defibrillator,
            insurance_valid_till_year: a.insurance_valid_till_year,
            ambulance_type: a.ambulance_type,
            ambulance_type_label: AmbulanceType::try_from(a.ambulance_type)
                .ok()
                .map(|t| t.label().to_string()),
            price_per_km: a.price_per_km,
            has_free_service: a.has_free_service,
            drivers: drivers.into_iter().map(Into::into).collect(),
            created_by: a.created_by,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::to_field_errors;

    fn valid_create() -> CreateAmbulanceDto {
        serde_json::from_value(serde_json::json!({
            "vehicle_number": "kl 13 ab 1234",
            "owner_name": "  Manorama ",
            "owner_phone_number": "8888888888",
            "insurance_valid_till_year": 2030,
            "has_free_service": true,
            "drivers": [
                { "name": "test", "phone_number": "8888888888", "is_smart_phone": true }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let dto = valid_create();
        assert!(dto.owner_is_smart_phone);
        assert_eq!(dto.ambulance_type, 1);
        assert!(!dto.has_oxygen);
        assert_eq!(dto.primary_district, None);
        assert_eq!(dto.price_per_km, None);
        assert_eq!(dto.drivers.len(), 1);
    }

    #[test]
    fn test_create_normalize_then_validate() {
        let mut dto = valid_create();
        assert!(dto.validate().is_err());

        dto.normalize();
        assert_eq!(dto.vehicle_number, "KL13AB1234");
        assert_eq!(dto.owner_name, "Manorama");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_reports_nested_driver_errors() {
        let mut dto = valid_create();
        dto.normalize();
        dto.insurance_valid_till_year = 1990;
        dto.drivers[0].phone_number = "12345".to_string();

        let errors = to_field_errors(&dto.validate().unwrap_err());
        assert!(errors.contains_key("insurance_valid_till_year"));
        assert_eq!(
            errors["drivers[0].phone_number"],
            vec!["Enter a valid phone number".to_string()]
        );
    }

    #[test]
    fn test_price_accepts_string_or_number() {
        let from_str: CreateAmbulanceDto = serde_json::from_value(serde_json::json!({
            "vehicle_number": "KL13AB1234",
            "owner_name": "Manorama",
            "owner_phone_number": "8888888888",
            "insurance_valid_till_year": 2030,
            "price_per_km": "12.50"
        }))
        .unwrap();
        assert_eq!(from_str.price_per_km, Some(Decimal::new(1250, 2)));

        let from_number: CreateAmbulanceDto = serde_json::from_value(serde_json::json!({
            "vehicle_number": "KL13AB1234",
            "owner_name": "Manorama",
            "owner_phone_number": "8888888888",
            "insurance_valid_till_year": 2030,
            "price_per_km": 12.5
        }))
        .unwrap();
        assert_eq!(from_number.price_per_km, Some(Decimal::new(125, 1)));
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let dto: UpdateAmbulanceDto = serde_json::from_value(serde_json::json!({
            "primary_district": null,
            "owner_name": "New Owner"
        }))
        .unwrap();

        assert_eq!(dto.primary_district, Some(None));
        assert_eq!(dto.secondary_district, None);
        assert_eq!(dto.price_per_km, None);
        assert_eq!(dto.owner_name.as_deref(), Some("New Owner"));
    }

    #[test]
    fn test_query_search_term() {
        let params = AmbulanceQueryParams {
            search: Some(" KL13 ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), Some("KL13".to_string()));
        assert_eq!(AmbulanceQueryParams::default().search_term(), None);

        let blank = AmbulanceQueryParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.search_term(), None);
        assert_eq!(AmbulanceQueryParams::default().pagination().limit(), 10);
    }
}
