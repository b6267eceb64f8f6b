use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::districts::models::District;

/// Query parameters for listing districts
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DistrictSearchQuery {
    /// Search by name or code (case-insensitive, partial match)
    #[param(example = "ernakulam")]
    pub search: Option<String>,
}

impl DistrictSearchQuery {
    /// LIKE pattern for the search term, `None` when no usable term was given
    pub fn pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistrictResponseDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

impl From<District> for DistrictResponseDto {
    fn from(district: District) -> Self {
        Self {
            id: district.id,
            code: district.code,
            name: district.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_search_pattern() {
        let query = DistrictSearchQuery {
            search: Some("  ErnaKulam ".to_string()),
        };
        assert_eq!(query.pattern(), Some("%ernakulam%".to_string()));

        let blank = DistrictSearchQuery {
            search: Some("   ".to_string()),
        };
        assert_eq!(blank.pattern(), None);
        assert_eq!(DistrictSearchQuery::default().pattern(), None);
    }

    #[test]
    fn test_district_response_from_model() {
        let id = Uuid::new_v4();
        let dto = DistrictResponseDto::from(District {
            id,
            code: "KL-EKM".to_string(),
            name: "Ernakulam".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });

        assert_eq!(dto.id, id);
        assert_eq!(dto.code, "KL-EKM");
        assert_eq!(dto.name, "Ernakulam");
    }
}
