use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::ambulances::dtos::{
    AmbulanceDetailDto, AmbulanceDriverDto, AmbulanceQueryParams, AmbulanceSummaryDto,
    CreateAmbulanceDto, CreateDriverDto, UpdateAmbulanceDto,
};
use crate::features::ambulances::models::{
    Ambulance, AmbulanceFields, AmbulanceType, NewAmbulance, NewAmbulanceDriver,
};
use crate::features::ambulances::repositories::{AmbulanceFilter, AmbulanceRepository};
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::{PRICE_PER_KM_MAX_INTEGER_DIGITS, PRICE_PER_KM_SCALE};
use crate::shared::types::FieldErrors;
use crate::shared::validation::{push_field_error, to_field_errors};

fn validation_errors<T: Validate>(dto: &T) -> FieldErrors {
    dto.validate()
        .map(|_| FieldErrors::new())
        .unwrap_or_else(|e| to_field_errors(&e))
}

fn into_result(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(errors))
    }
}

fn parse_ambulance_type(code: i32, errors: &mut FieldErrors) -> AmbulanceType {
    AmbulanceType::try_from(code).unwrap_or_else(|message| {
        push_field_error(errors, "ambulance_type", message);
        AmbulanceType::default()
    })
}

/// Price must fit NUMERIC(7, 2), and is required unless the service is free
fn check_pricing(price: Option<Decimal>, has_free_service: bool, errors: &mut FieldErrors) {
    let Some(price) = price else {
        if !has_free_service {
            push_field_error(
                errors,
                "price_per_km",
                "This field is required unless the ambulance offers free service.",
            );
        }
        return;
    };

    if price.is_sign_negative() && !price.is_zero() {
        push_field_error(
            errors,
            "price_per_km",
            "Ensure this value is greater than or equal to 0.",
        );
    }

    if price.normalize().scale() > PRICE_PER_KM_SCALE {
        push_field_error(
            errors,
            "price_per_km",
            format!(
                "Ensure that there are no more than {} decimal places.",
                PRICE_PER_KM_SCALE
            ),
        );
    }

    let integer_limit = Decimal::from(10_i64.pow(PRICE_PER_KM_MAX_INTEGER_DIGITS));
    if price.abs().trunc() >= integer_limit {
        push_field_error(
            errors,
            "price_per_km",
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                PRICE_PER_KM_MAX_INTEGER_DIGITS
            ),
        );
    }
}

fn new_driver(dto: &CreateDriverDto) -> NewAmbulanceDriver {
    NewAmbulanceDriver {
        id: Uuid::now_v7(),
        name: dto.name.clone(),
        phone_number: dto.phone_number.clone(),
        is_smart_phone: dto.is_smart_phone,
    }
}

/// Ambulance registry operations on top of an [`AmbulanceRepository`]
pub struct AmbulanceService {
    repo: Arc<dyn AmbulanceRepository>,
}

impl AmbulanceService {
    pub fn new(repo: Arc<dyn AmbulanceRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        params: &AmbulanceQueryParams,
    ) -> Result<(Vec<AmbulanceSummaryDto>, i64)> {
        let pagination = params.pagination();
        let filter = AmbulanceFilter {
            search: params.search_term(),
            district: params.district,
            ambulance_type: params.ambulance_type,
            owner_phone_number: params
                .owner_phone_number
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from),
            limit: pagination.limit(),
            offset: pagination.offset(),
        };

        let (ambulances, total) = self.repo.list(&filter).await?;
        Ok((ambulances.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<AmbulanceDetailDto> {
        let ambulance = self.find(id).await?;
        self.detail(ambulance).await
    }

    pub async fn create(
        &self,
        mut dto: CreateAmbulanceDto,
        user: &AuthenticatedUser,
    ) -> Result<AmbulanceDetailDto> {
        dto.normalize();

        let mut errors = validation_errors(&dto);
        let ambulance_type = parse_ambulance_type(dto.ambulance_type, &mut errors);
        check_pricing(dto.price_per_km, dto.has_free_service, &mut errors);
        into_result(errors)?;

        let fields = AmbulanceFields {
            vehicle_number: dto.vehicle_number,
            owner_name: dto.owner_name,
            owner_phone_number: dto.owner_phone_number,
            owner_is_smart_phone: dto.owner_is_smart_phone,
            primary_district_id: dto.primary_district,
            secondary_district_id: dto.secondary_district,
            third_district_id: dto.third_district,
            has_oxygen: dto.has_oxygen,
            has_ventilator: dto.has_ventilator,
            has_suction_machine: dto.has_suction_machine,
            has_defibrillator: dto.has_defibrillator,
            insurance_valid_till_year: dto.insurance_valid_till_year,
            ambulance_type,
            price_per_km: dto.price_per_km,
            has_free_service: dto.has_free_service,
        };

        self.check_references(&fields, None).await?;

        let ambulance = NewAmbulance {
            id: Uuid::now_v7(),
            fields,
            created_by: Some(user.account_id.clone()),
        };
        let drivers: Vec<NewAmbulanceDriver> = dto.drivers.iter().map(new_driver).collect();

        self.repo.insert(&ambulance, &drivers).await?;

        tracing::info!(
            "Ambulance {} ({}) created by {} with {} driver(s)",
            ambulance.id,
            ambulance.fields.vehicle_number,
            user.account_id,
            drivers.len()
        );

        self.get(ambulance.id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        mut dto: UpdateAmbulanceDto,
    ) -> Result<AmbulanceDetailDto> {
        dto.normalize();
        let mut errors = validation_errors(&dto);

        let current = self.find(id).await?;
        let mut fields = AmbulanceFields::from(&current);

        if let Some(v) = dto.vehicle_number {
            fields.vehicle_number = v;
        }
        if let Some(v) = dto.owner_name {
            fields.owner_name = v;
        }
        if let Some(v) = dto.owner_phone_number {
            fields.owner_phone_number = v;
        }
        if let Some(v) = dto.owner_is_smart_phone {
            fields.owner_is_smart_phone = v;
        }
        if let Some(v) = dto.primary_district {
            fields.primary_district_id = v;
        }
        if let Some(v) = dto.secondary_district {
            fields.secondary_district_id = v;
        }
        if let Some(v) = dto.third_district {
            fields.third_district_id = v;
        }
        if let Some(v) = dto.has_oxygen {
            fields.has_oxygen = v;
        }
        if let Some(v) = dto.has_ventilator {
            fields.has_ventilator = v;
        }
        if let Some(v) = dto.has_suction_machine {
            fields.has_suction_machine = v;
        }
        if let Some(v) = dto.has_defibrillator {
            fields.has_defibrillator = v;
        }
        if let Some(v) = dto.insurance_valid_till_year {
            fields.insurance_valid_till_year = v;
        }
        if let Some(code) = dto.ambulance_type {
            fields.ambulance_type = parse_ambulance_type(code, &mut errors);
        }
        if let Some(v) = dto.price_per_km {
            fields.price_per_km = v;
        }
        if let Some(v) = dto.has_free_service {
            fields.has_free_service = v;
        }

        check_pricing(fields.price_per_km, fields.has_free_service, &mut errors);
        into_result(errors)?;

        self.check_references(&fields, Some(id)).await?;

        if !self.repo.update(id, &fields).await? {
            return Err(not_found(id));
        }

        tracing::info!("Ambulance {} updated", id);
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }

        tracing::info!("Ambulance {} deleted", id);
        Ok(())
    }

    pub async fn add_driver(
        &self,
        ambulance_id: Uuid,
        mut dto: CreateDriverDto,
    ) -> Result<AmbulanceDriverDto> {
        dto.normalize();
        into_result(validation_errors(&dto))?;

        let driver = self
            .repo
            .insert_driver(ambulance_id, &new_driver(&dto))
            .await?
            .ok_or_else(|| not_found(ambulance_id))?;

        tracing::info!("Driver {} added to ambulance {}", driver.id, ambulance_id);
        Ok(driver.into())
    }

    /// Remove `driver_id`, or the most recently added driver when `None`
    pub async fn remove_driver(&self, ambulance_id: Uuid, driver_id: Option<Uuid>) -> Result<()> {
        self.find(ambulance_id).await?;

        let driver = self
            .repo
            .delete_driver(ambulance_id, driver_id)
            .await?
            .ok_or_else(|| match driver_id {
                Some(id) => AppError::NotFound(format!(
                    "Driver {} not found for ambulance {}",
                    id, ambulance_id
                )),
                None => AppError::NotFound(format!(
                    "Ambulance {} has no drivers",
                    ambulance_id
                )),
            })?;

        tracing::info!(
            "Driver {} removed from ambulance {}",
            driver.id,
            ambulance_id
        );
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Ambulance> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn detail(&self, ambulance: Ambulance) -> Result<AmbulanceDetailDto> {
        let drivers = self.repo.list_drivers(ambulance.id).await?;
        Ok(AmbulanceDetailDto::new(ambulance, drivers))
    }

    /// District references must exist and the vehicle number must be free
    async fn check_references(
        &self,
        fields: &AmbulanceFields,
        exclude_id: Option<Uuid>,
    ) -> Result<()> {
        let mut errors = FieldErrors::new();

        let refs = fields.district_refs();
        let ids: Vec<Uuid> = refs.iter().map(|(_, id)| *id).collect();
        let missing = self.repo.missing_districts(&ids).await?;
        for (field, id) in refs {
            if missing.contains(&id) {
                push_field_error(
                    &mut errors,
                    field,
                    format!("Invalid pk \"{}\" - object does not exist.", id),
                );
            }
        }

        if self
            .repo
            .vehicle_number_exists(&fields.vehicle_number, exclude_id)
            .await?
        {
            push_field_error(
                &mut errors,
                "vehicle_number",
                "ambulance with this vehicle number already exists.",
            );
        }

        into_result(errors)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Ambulance {} not found", id))
}
