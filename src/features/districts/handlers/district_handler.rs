use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::districts::dtos::{DistrictResponseDto, DistrictSearchQuery};
use crate::features::districts::services::DistrictService;
use crate::shared::types::{ApiResponse, Meta};

/// List districts
#[utoipa::path(
    get,
    path = "/api/v1/districts",
    params(DistrictSearchQuery),
    responses(
        (status = 200, description = "List of districts", body = ApiResponse<Vec<DistrictResponseDto>>),
        (status = 403, description = "Authentication required")
    ),
    tag = "districts",
    security(("bearer_auth" = []))
)]
pub async fn list_districts(
    _user: AuthenticatedUser,
    State(service): State<Arc<DistrictService>>,
    Query(query): Query<DistrictSearchQuery>,
) -> Result<Json<ApiResponse<Vec<DistrictResponseDto>>>> {
    let districts = service.list(query.pattern().as_deref()).await?;
    let total = districts.len() as i64;
    let dtos: Vec<DistrictResponseDto> = districts.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a district by id
#[utoipa::path(
    get,
    path = "/api/v1/districts/{id}",
    params(
        ("id" = Uuid, Path, description = "District ID")
    ),
    responses(
        (status = 200, description = "District details", body = ApiResponse<DistrictResponseDto>),
        (status = 403, description = "Authentication required"),
        (status = 404, description = "District not found")
    ),
    tag = "districts",
    security(("bearer_auth" = []))
)]
pub async fn get_district(
    _user: AuthenticatedUser,
    State(service): State<Arc<DistrictService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DistrictResponseDto>>> {
    let district = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(
        Some(district.into()),
        None,
        None,
    )))
}
