//! services/api/src/web/middleware.rs
//!
//! Resolves the acting viewer for protected routes.
//!
//! Authentication itself happens at the external identity provider; the
//! gateway in front of this service forwards the verified user id in the
//! `x-user-id` header.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use opion_crm_core::ports::PortError;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::web::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Middleware that loads the caller's profile and builds their `Viewer`.
///
/// If valid, inserts the `Viewer` into request extensions for handlers to use.
/// If the header is missing, malformed, or names no profile, returns 401 Unauthorized.
pub async fn require_viewer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the user id asserted by the identity provider
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Load the stored profile for its role and company
    let profile = state.db.get_profile(user_id).await.map_err(|e| match e {
        PortError::NotFound(_) => {
            debug!("No profile for user {}", user_id);
            StatusCode::UNAUTHORIZED
        }
        other => {
            error!("Failed to load profile for {}: {:?}", user_id, other);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    })?;

    // 3. Insert the viewer and the profile into request extensions
    req.extensions_mut().insert(profile.to_viewer());
    req.extensions_mut().insert(profile);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}
