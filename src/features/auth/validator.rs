use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::{JwksClient, JwksError};

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    // Some providers carry a separate account id; fall back to `sub`
    #[serde(rename = "accountId", alias = "account_id", default)]
    account_id: Option<String>,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Unauthenticated(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Unauthenticated(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthenticated("Missing kid in token header".to_string()))?;

        let decoding_key = self.jwks_client.get_key(&kid).await.map_err(|e| match e {
            JwksError::KeyNotFound(kid) => {
                AppError::Unauthenticated(format!("Unknown signing key: {}", kid))
            }
            other => {
                tracing::warn!("Signing key lookup failed: {}", other);
                AppError::Internal(other.to_string())
            }
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Unauthenticated(e.to_string()))?
            .claims;

        Ok(AuthenticatedUser {
            account_id: claims.account_id.unwrap_or_else(|| claims.sub.clone()),
            sub: claims.sub,
        })
    }
}
