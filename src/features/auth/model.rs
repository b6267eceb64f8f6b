use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller identity established by the auth gate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub sub: String,
}
