use crate::features::auth::model::AuthenticatedUser;

use axum::{extract::Request, middleware::Next, response::Response, Router};

pub fn test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-account-id".to_string(),
        sub: "test-sub".to_string(),
    }
}

async fn inject_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(test_user());
    next.run(request).await
}

/// Wrap a feature router so every request carries [`test_user`],
/// standing in for the JWT auth gate
pub fn with_authenticated_user(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_user_middleware))
}
