use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::ambulances::{dtos as ambulances_dtos, handlers as ambulances_handlers};
use crate::features::auth;
use crate::features::districts::{dtos as districts_dtos, handlers as districts_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Ambulances
        ambulances_handlers::list_ambulances,
        ambulances_handlers::create_ambulance,
        ambulances_handlers::get_ambulance,
        ambulances_handlers::update_ambulance,
        ambulances_handlers::delete_ambulance,
        ambulances_handlers::add_driver,
        ambulances_handlers::remove_driver,
        // Districts
        districts_handlers::list_districts,
        districts_handlers::get_district,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Ambulances
            ambulances_dtos::CreateAmbulanceDto,
            ambulances_dtos::CreateDriverDto,
            ambulances_dtos::UpdateAmbulanceDto,
            ambulances_dtos::RemoveDriverDto,
            ambulances_dtos::AmbulanceQueryParams,
            ambulances_dtos::AmbulanceSummaryDto,
            ambulances_dtos::AmbulanceDetailDto,
            ambulances_dtos::AmbulanceDriverDto,
            ApiResponse<Vec<ambulances_dtos::AmbulanceSummaryDto>>,
            ApiResponse<ambulances_dtos::AmbulanceDetailDto>,
            ApiResponse<ambulances_dtos::AmbulanceDriverDto>,
            // Districts
            districts_dtos::DistrictResponseDto,
            ApiResponse<Vec<districts_dtos::DistrictResponseDto>>,
            ApiResponse<districts_dtos::DistrictResponseDto>,
        )
    ),
    tags(
        (name = "ambulances", description = "Ambulance registry and drivers"),
        (name = "districts", description = "District directory (read-only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Ambulance Registry API",
        version = "0.1.0",
        description = "API documentation for the ambulance registry",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Overrides OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
