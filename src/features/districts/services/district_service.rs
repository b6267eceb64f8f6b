use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::districts::models::District;

/// Read-only access to the district directory
pub struct DistrictService {
    pool: PgPool,
}

impl DistrictService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List districts ordered by name, optionally filtered by a LIKE pattern
    pub async fn list(&self, pattern: Option<&str>) -> Result<Vec<District>> {
        let districts = match pattern {
            Some(pattern) => {
                sqlx::query_as::<_, District>(
                    r#"
                    SELECT id, code, name, created_at, updated_at
                    FROM districts
                    WHERE LOWER(name) LIKE $1 OR LOWER(code) LIKE $1
                    ORDER BY name ASC
                    "#,
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, District>(
                    r#"
                    SELECT id, code, name, created_at, updated_at
                    FROM districts
                    ORDER BY name ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            tracing::error!("Failed to fetch districts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(districts)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<District> {
        sqlx::query_as::<_, District>(
            r#"
            SELECT id, code, name, created_at, updated_at
            FROM districts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch district {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("District with id {} not found", id)))
    }
}
