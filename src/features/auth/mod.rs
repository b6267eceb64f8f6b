//! Auth gate: bearer JWT validation against the identity provider's JWKS.

mod jwks;
mod validator;

pub mod model;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
