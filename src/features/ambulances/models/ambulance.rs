use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of service an ambulance provides, stored as its integer code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AmbulanceType {
    #[default]
    Basic,
    Cardiac,
    Hearse,
}

impl AmbulanceType {
    pub const ALL: [AmbulanceType; 3] = [
        AmbulanceType::Basic,
        AmbulanceType::Cardiac,
        AmbulanceType::Hearse,
    ];

    pub fn code(self) -> i32 {
        match self {
            AmbulanceType::Basic => 1,
            AmbulanceType::Cardiac => 2,
            AmbulanceType::Hearse => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AmbulanceType::Basic => "Basic",
            AmbulanceType::Cardiac => "Cardiac",
            AmbulanceType::Hearse => "Hearse",
        }
    }
}

impl TryFrom<i32> for AmbulanceType {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        AmbulanceType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| format!("\"{}\" is not a valid choice.", code))
    }
}

/// Ambulance row joined with the display names of its districts
#[derive(Debug, Clone, FromRow)]
pub struct Ambulance {
    pub id: Uuid,
    pub vehicle_number: String,
    pub owner_name: String,
    pub owner_phone_number: String,
    pub owner_is_smart_phone: bool,
    pub primary_district_id: Option<Uuid>,
    pub primary_district_name: Option<String>,
    pub secondary_district_id: Option<Uuid>,
    pub secondary_district_name: Option<String>,
    pub third_district_id: Option<Uuid>,
    pub third_district_name: Option<String>,
    pub has_oxygen: bool,
    pub has_ventilator: bool,
    pub has_suction_machine: bool,
    pub has_defibrillator: bool,
    pub insurance_valid_till_year: i32,
    pub ambulance_type: i32,
    pub price_per_km: Option<Decimal>,
    pub has_free_service: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every writable ambulance column. Updates are applied by merging a patch
/// into the current values and writing the whole set back.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbulanceFields {
    pub vehicle_number: String,
    pub owner_name: String,
    pub owner_phone_number: String,
    pub owner_is_smart_phone: bool,
    pub primary_district_id: Option<Uuid>,
    pub secondary_district_id: Option<Uuid>,
    pub third_district_id: Option<Uuid>,
    pub has_oxygen: bool,
    pub has_ventilator: bool,
    pub has_suction_machine: bool,
    pub has_defibrillator: bool,
    pub insurance_valid_till_year: i32,
    pub ambulance_type: AmbulanceType,
    pub price_per_km: Option<Decimal>,
    pub has_free_service: bool,
}

impl AmbulanceFields {
    /// District references in slot order, skipping empty slots
    pub fn district_refs(&self) -> Vec<(&'static str, Uuid)> {
        [
            ("primary_district", self.primary_district_id),
            ("secondary_district", self.secondary_district_id),
            ("third_district", self.third_district_id),
        ]
        .into_iter()
        .filter_map(|(field, id)| id.map(|id| (field, id)))
        .collect()
    }
}

impl From<&Ambulance> for AmbulanceFields {
    fn from(a: &Ambulance) -> Self {
        Self {
            vehicle_number: a.vehicle_number.clone(),
            owner_name: a.owner_name.clone(),
            owner_phone_number: a.owner_phone_number.clone(),
            owner_is_smart_phone: a.owner_is_smart_phone,
            primary_district_id: a.primary_district_id,
            secondary_district_id: a.secondary_district_id,
            third_district_id: a.third_district_id,
            has_oxygen: a.has_oxygen,
            has_ventilator: a.has_ventilator,
            has_suction_machine: a.has_suction_machine,
            has_defibrillator: a.has_defibrillator,
            insurance_valid_till_year: a.insurance_valid_till_year,
            ambulance_type: AmbulanceType::try_from(a.ambulance_type).unwrap_or_default(),
            price_per_km: a.price_per_km,
            has_free_service: a.has_free_service,
        }
    }
}

/// Ambulance about to be inserted
#[derive(Debug, Clone)]
pub struct NewAmbulance {
    pub id: Uuid,
    pub fields: AmbulanceFields,
    pub created_by: Option<String>,
}
