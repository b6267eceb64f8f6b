use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Driver attached to exactly one ambulance
#[derive(Debug, Clone, FromRow)]
pub struct AmbulanceDriver {
    pub id: Uuid,
    pub ambulance_id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub is_smart_phone: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAmbulanceDriver {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub is_smart_phone: bool,
}
