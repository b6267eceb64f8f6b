use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, OptionalJson};
use crate::features::ambulances::dtos::{
    AmbulanceDetailDto, AmbulanceDriverDto, AmbulanceQueryParams, AmbulanceSummaryDto,
    CreateAmbulanceDto, CreateDriverDto, RemoveDriverDto, UpdateAmbulanceDto,
};
use crate::features::ambulances::services::AmbulanceService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::{ApiResponse, Meta};

/// List ambulances with pagination and filters
#[utoipa::path(
    get,
    path = "/api/v1/ambulance/",
    params(AmbulanceQueryParams),
    responses(
        (status = 200, description = "Ambulances retrieved successfully", body = ApiResponse<Vec<AmbulanceSummaryDto>>),
        (status = 403, description = "Authentication required")
    ),
    tag = "ambulances",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_ambulances(
    _user: AuthenticatedUser,
    State(service): State<Arc<AmbulanceService>>,
    Query(params): Query<AmbulanceQueryParams>,
) -> Result<Json<ApiResponse<Vec<AmbulanceSummaryDto>>>> {
    let (ambulances, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(ambulances),
        None,
        Some(Meta { total }),
    )))
}

/// Register an ambulance, optionally with its drivers
#[utoipa::path(
    post,
    path = "/api/v1/ambulance/create/",
    request_body = CreateAmbulanceDto,
    responses(
        (status = 201, description = "Ambulance created successfully", body = ApiResponse<AmbulanceDetailDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Authentication required")
    ),
    tag = "ambulances",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ambulance(
    user: AuthenticatedUser,
    State(service): State<Arc<AmbulanceService>>,
    AppJson(dto): AppJson<CreateAmbulanceDto>,
) -> Result<(StatusCode, Json<ApiResponse<AmbulanceDetailDto>>)> {
    let ambulance = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ambulance),
            Some("Ambulance created successfully".to_string()),
            None,
        )),
    ))
}

/// Get an ambulance with its drivers
#[utoipa::path(
    get,
    path = "/api/v1/ambulance/{id}/",
    params(
        ("id" = Uuid, Path, description = "Ambulance ID")
    ),
    responses(
        (status = 200, description = "Ambulance retrieved successfully", body = ApiResponse<AmbulanceDetailDto>),
        (status = 404, description = "Ambulance not found"),
        (status = 403, description = "Authentication required")
    ),
    tag = "ambulances",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_ambulance(
    _user: AuthenticatedUser,
    State(service): State<Arc<AmbulanceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AmbulanceDetailDto>>> {
    let ambulance = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(ambulance), None, None)))
}

/// Partially update an ambulance
#[utoipa::path(
    patch,
    path = "/api/v1/ambulance/{id}/",
    params(
        ("id" = Uuid, Path, description = "Ambulance ID")
    ),
    request_body = UpdateAmbulanceDto,
    responses(
        (status = 200, description = "Ambulance updated successfully", body = ApiResponse<AmbulanceDetailDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Ambulance not found"),
        (status = 403, description = "Authentication required")
    ),
    tag = "ambulances",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_ambulance(
    _user: AuthenticatedUser,
    State(service): State<Arc<AmbulanceService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateAmbulanceDto>,
) -> Result<Json<ApiResponse<AmbulanceDetailDto>>> {
    let ambulance = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ambulance),
        Some("Ambulance updated successfully".to_string()),
        None,
    )))
}

/// Delete an ambulance and all of its drivers
#[utoipa::path(
    delete,
    path = "/api/v1/ambulance/{id}/",
    params(
        ("id" = Uuid, Path, description = "Ambulance ID")
    ),
    responses(
        (status = 204, description = "Ambulance deleted"),
        (status = 404, description = "Ambulance not found"),
        (status = 403, description = "Authentication required")
    ),
    tag = "ambulances",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_ambulance(
    _user: AuthenticatedUser,
    State(service): State<Arc<AmbulanceService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach a driver to an ambulance
#[utoipa::path(
    post,
    path = "/api/v1/ambulance/{id}/add_driver",
    params(
        ("id" = Uuid, Path, description = "Ambulance ID")
    ),
    request_body = CreateDriverDto,
    responses(
        (status = 201, description = "Driver added", body = ApiResponse<AmbulanceDriverDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Ambulance not found"),
        (status = 403, description = "Authentication required")
    ),
    tag = "ambulances",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_driver(
    _user: AuthenticatedUser,
    State(service): State<Arc<AmbulanceService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateDriverDto>,
) -> Result<(StatusCode, Json<ApiResponse<AmbulanceDriverDto>>)> {
    let driver = service.add_driver(id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(driver), None, None)),
    ))
}

/// Detach a driver. Without a body the most recently added driver is removed.
#[utoipa::path(
    delete,
    path = "/api/v1/ambulance/{id}/remove_driver",
    params(
        ("id" = Uuid, Path, description = "Ambulance ID")
    ),
    request_body(content = RemoveDriverDto, description = "Optional; omit to remove the most recently added driver"),
    responses(
        (status = 204, description = "Driver removed"),
        (status = 404, description = "Ambulance or driver not found"),
        (status = 403, description = "Authentication required")
    ),
    tag = "ambulances",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_driver(
    _user: AuthenticatedUser,
    State(service): State<Arc<AmbulanceService>>,
    Path(id): Path<Uuid>,
    OptionalJson(body): OptionalJson<RemoveDriverDto>,
) -> Result<StatusCode> {
    let driver_id = body.and_then(|b| b.driver_id);
    service.remove_driver(id, driver_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
