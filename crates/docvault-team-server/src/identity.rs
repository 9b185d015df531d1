//! Identity middleware
//!
//! Authentication happens upstream. The identity service forwards the
//! authenticated user id in a trusted header, which is copied into the
//! request extensions for the vault routes.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use docvault_team::{AuthenticatedUserId, VaultError};

use crate::state::AppState;

/// Attach the forwarded user id, or reject the request
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user_id = request
        .headers()
        .get(state.config.identity_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    match user_id {
        Some(user_id) => {
            request.extensions_mut().insert(AuthenticatedUserId(user_id));
            next.run(request).await
        }
        None => {
            debug!(
                header = %state.config.identity_header,
                "Request without forwarded identity"
            );
            VaultError::Unauthenticated.into_response()
        }
    }
}
