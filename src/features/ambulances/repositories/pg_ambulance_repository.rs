use std::borrow::Cow;
use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::ambulance_repository::{AmbulanceFilter, AmbulanceRepository};
use crate::core::error::{AppError, Result};
use crate::features::ambulances::models::{
    Ambulance, AmbulanceDriver, AmbulanceFields, NewAmbulance, NewAmbulanceDriver,
};

const VEHICLE_NUMBER_CONSTRAINT: &str = "ambulances_vehicle_number_key";

const SELECT_AMBULANCE: &str = r#"
    SELECT
        a.id, a.vehicle_number, a.owner_name, a.owner_phone_number, a.owner_is_smart_phone,
        a.primary_district_id, pd.name AS primary_district_name,
        a.secondary_district_id, sd.name AS secondary_district_name,
        a.third_district_id, td.name AS third_district_name,
        a.has_oxygen, a.has_ventilator, a.has_suction_machine, a.has_defibrillator,
        a.insurance_valid_till_year, a.ambulance_type, a.price_per_km, a.has_free_service,
        a.created_by, a.created_at, a.updated_at
    FROM ambulances a
    LEFT JOIN districts pd ON pd.id = a.primary_district_id
    LEFT JOIN districts sd ON sd.id = a.secondary_district_id
    LEFT JOIN districts td ON td.id = a.third_district_id
"#;

const DRIVER_COLUMNS: &str =
    "id, ambulance_id, name, phone_number, is_smart_phone, created_at, updated_at";

/// Map constraint violations to client-facing errors
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code() == Some(Cow::Borrowed("23505")) {
            if db_err.constraint() == Some(VEHICLE_NUMBER_CONSTRAINT) {
                return AppError::field(
                    "vehicle_number",
                    "ambulance with this vehicle number already exists.",
                );
            }
            return AppError::Conflict("Record already exists.".to_string());
        }

        if db_err.code() == Some(Cow::Borrowed("23503")) {
            return AppError::Validation("Referenced record does not exist.".to_string());
        }

        if db_err.code() == Some(Cow::Borrowed("23514")) {
            return AppError::Validation(format!(
                "Check constraint violated: {}",
                db_err.constraint().unwrap_or("unknown")
            ));
        }
    }

    tracing::error!("Ambulance query failed: {:?}", e);
    AppError::Database(e)
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23503")))
}

/// Substring ILIKE pattern matching `term` literally. Pair with `ESCAPE '\'`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Append `WHERE` clauses for every set criterion
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &AmbulanceFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        builder
            .push(" AND (a.vehicle_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR a.owner_name ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    if let Some(district) = filter.district {
        builder
            .push(" AND (a.primary_district_id = ")
            .push_bind(district)
            .push(" OR a.secondary_district_id = ")
            .push_bind(district)
            .push(" OR a.third_district_id = ")
            .push_bind(district)
            .push(")");
    }

    if let Some(ambulance_type) = filter.ambulance_type {
        builder
            .push(" AND a.ambulance_type = ")
            .push_bind(ambulance_type);
    }

    if let Some(phone) = &filter.owner_phone_number {
        builder
            .push(" AND a.owner_phone_number = ")
            .push_bind(phone.clone());
    }
}

/// PostgreSQL-backed ambulance storage
pub struct PgAmbulanceRepository {
    pool: PgPool,
}

impl PgAmbulanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AmbulanceRepository for PgAmbulanceRepository {
    async fn list(&self, filter: &AmbulanceFilter) -> Result<(Vec<Ambulance>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ambulances a");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT_AMBULANCE);
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let ambulances = query
            .build_query_as::<Ambulance>()
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok((ambulances, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ambulance>> {
        sqlx::query_as::<_, Ambulance>(&format!("{} WHERE a.id = $1", SELECT_AMBULANCE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn vehicle_number_exists(
        &self,
        vehicle_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM ambulances
                WHERE vehicle_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(vehicle_number)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    async fn missing_districts(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: HashSet<Uuid> =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM districts WHERE id = ANY($1)")
                .bind(ids.to_vec())
                .fetch_all(&self.pool)
                .await
                .map_err(handle_db_error)?
                .into_iter()
                .collect();

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    async fn insert(&self, ambulance: &NewAmbulance, drivers: &[NewAmbulanceDriver]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;
        let f = &ambulance.fields;

        sqlx::query(
            r#"
            INSERT INTO ambulances (
                id, vehicle_number, owner_name, owner_phone_number, owner_is_smart_phone,
                primary_district_id, secondary_district_id, third_district_id,
                has_oxygen, has_ventilator, has_suction_machine, has_defibrillator,
                insurance_valid_till_year, ambulance_type, price_per_km, has_free_service,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(ambulance.id)
        .bind(&f.vehicle_number)
        .bind(&f.owner_name)
        .bind(&f.owner_phone_number)
        .bind(f.owner_is_smart_phone)
        .bind(f.primary_district_id)
        .bind(f.secondary_district_id)
        .bind(f.third_district_id)
        .bind(f.has_oxygen)
        .bind(f.has_ventilator)
        .bind(f.has_suction_machine)
        .bind(f.has_defibrillator)
        .bind(f.insurance_valid_till_year)
        .bind(f.ambulance_type.code())
        .bind(f.price_per_km)
        .bind(f.has_free_service)
        .bind(&ambulance.created_by)
        .execute(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        // Ascending timestamps keep the "most recent driver" order stable
        for driver in drivers {
            sqlx::query(
                r#"
                INSERT INTO ambulance_drivers (id, ambulance_id, name, phone_number, is_smart_phone, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, clock_timestamp(), clock_timestamp())
                "#,
            )
            .bind(driver.id)
            .bind(ambulance.id)
            .bind(&driver.name)
            .bind(&driver.phone_number)
            .bind(driver.is_smart_phone)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?;
        }

        tx.commit().await.map_err(handle_db_error)?;
        Ok(())
    }

    async fn update(&self, id: Uuid, f: &AmbulanceFields) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE ambulances SET
                vehicle_number = $2,
                owner_name = $3,
                owner_phone_number = $4,
                owner_is_smart_phone = $5,
                primary_district_id = $6,
                secondary_district_id = $7,
                third_district_id = $8,
                has_oxygen = $9,
                has_ventilator = $10,
                has_suction_machine = $11,
                has_defibrillator = $12,
                insurance_valid_till_year = $13,
                ambulance_type = $14,
                price_per_km = $15,
                has_free_service = $16,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&f.vehicle_number)
        .bind(&f.owner_name)
        .bind(&f.owner_phone_number)
        .bind(f.owner_is_smart_phone)
        .bind(f.primary_district_id)
        .bind(f.secondary_district_id)
        .bind(f.third_district_id)
        .bind(f.has_oxygen)
        .bind(f.has_ventilator)
        .bind(f.has_suction_machine)
        .bind(f.has_defibrillator)
        .bind(f.insurance_valid_till_year)
        .bind(f.ambulance_type.code())
        .bind(f.price_per_km)
        .bind(f.has_free_service)
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        let drivers = sqlx::query("DELETE FROM ambulance_drivers WHERE ambulance_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        let result = sqlx::query("DELETE FROM ambulances WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(handle_db_error)?;
            return Ok(false);
        }

        tx.commit().await.map_err(handle_db_error)?;
        tracing::debug!(
            "Deleted ambulance {} with {} driver(s)",
            id,
            drivers.rows_affected()
        );
        Ok(true)
    }

    async fn list_drivers(&self, ambulance_id: Uuid) -> Result<Vec<AmbulanceDriver>> {
        sqlx::query_as::<_, AmbulanceDriver>(&format!(
            "SELECT {} FROM ambulance_drivers WHERE ambulance_id = $1 ORDER BY created_at ASC, id ASC",
            DRIVER_COLUMNS
        ))
        .bind(ambulance_id)
        .fetch_all(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    async fn insert_driver(
        &self,
        ambulance_id: Uuid,
        driver: &NewAmbulanceDriver,
    ) -> Result<Option<AmbulanceDriver>> {
        let inserted = sqlx::query_as::<_, AmbulanceDriver>(&format!(
            r#"
            INSERT INTO ambulance_drivers (id, ambulance_id, name, phone_number, is_smart_phone)
            SELECT $1, $2, $3, $4, $5
            WHERE EXISTS (SELECT 1 FROM ambulances WHERE id = $2)
            RETURNING {}
            "#,
            DRIVER_COLUMNS
        ))
        .bind(driver.id)
        .bind(ambulance_id)
        .bind(&driver.name)
        .bind(&driver.phone_number)
        .bind(driver.is_smart_phone)
        .fetch_optional(&self.pool)
        .await;

        match inserted {
            // Ambulance deleted between the EXISTS check and the insert
            Err(e) if is_foreign_key_violation(&e) => Ok(None),
            other => other.map_err(handle_db_error),
        }
    }

    async fn delete_driver(
        &self,
        ambulance_id: Uuid,
        driver_id: Option<Uuid>,
    ) -> Result<Option<AmbulanceDriver>> {
        sqlx::query_as::<_, AmbulanceDriver>(&format!(
            r#"
            DELETE FROM ambulance_drivers
            WHERE id = (
                SELECT id FROM ambulance_drivers
                WHERE ambulance_id = $1 AND ($2::uuid IS NULL OR id = $2)
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
            RETURNING {}
            "#,
            DRIVER_COLUMNS
        ))
        .bind(ambulance_id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)
    }
}
