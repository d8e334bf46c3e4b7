//! services/api/src/web/companies.rs
//!
//! Tenant company administration for super admins, and the per-company user
//! list that also backs the assignee picker of a customer card.

use crate::error::{forbidden, port_error_response, HandlerError};
use crate::web::protocol::{CompanyRequest, CompanyResponse, ProfileResponse};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use opion_crm_core::domain::Viewer;
use opion_crm_core::{can_list_company_users, can_manage_companies};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

fn ensure_super_admin(viewer: &Viewer) -> Result<(), HandlerError> {
    if can_manage_companies(viewer) {
        Ok(())
    } else {
        Err(forbidden("Only super admins manage companies"))
    }
}

/// List every tenant company. Super admins only.
#[utoipa::path(
    get,
    path = "/companies",
    responses(
        (status = 200, description = "Companies sorted by name", body = [CompanyResponse]),
        (status = 403, description = "Caller is not a super admin")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn list_companies_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_super_admin(&viewer)?;

    let companies = app_state
        .db
        .list_companies()
        .await
        .map_err(|e| port_error_response("Failed to list companies", e))?;

    let body: Vec<CompanyResponse> = companies.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Create a tenant company. Super admins only.
#[utoipa::path(
    post,
    path = "/companies",
    request_body = CompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Missing name"),
        (status = 403, description = "Caller is not a super admin")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn create_company_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Json(req): Json<CompanyRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_super_admin(&viewer)?;

    let company = app_state
        .db
        .create_company(&req.name)
        .await
        .map_err(|e| port_error_response("Failed to create company", e))?;
    info!("Company {} created by {}", company.id, viewer.id);

    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}

/// Rename a tenant company. Super admins only.
#[utoipa::path(
    put,
    path = "/companies/{company_id}",
    request_body = CompanyRequest,
    responses(
        (status = 200, description = "Company renamed", body = CompanyResponse),
        (status = 400, description = "Missing name"),
        (status = 403, description = "Caller is not a super admin"),
        (status = 404, description = "No such company")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn update_company_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(company_id): Path<Uuid>,
    Json(req): Json<CompanyRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_super_admin(&viewer)?;

    let company = app_state
        .db
        .update_company(company_id, &req.name)
        .await
        .map_err(|e| port_error_response("Failed to rename company", e))?;
    info!("Company {} renamed by {}", company_id, viewer.id);

    Ok(Json(CompanyResponse::from(company)))
}

/// Delete a tenant company with its customer cards and reference lists.
/// Its users stay but are detached from it. Super admins only.
#[utoipa::path(
    delete,
    path = "/companies/{company_id}",
    responses(
        (status = 204, description = "Company deleted"),
        (status = 403, description = "Caller is not a super admin"),
        (status = 404, description = "No such company")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn delete_company_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_super_admin(&viewer)?;

    app_state
        .db
        .delete_company(company_id)
        .await
        .map_err(|e| port_error_response("Failed to delete company", e))?;
    info!("Company {} deleted by {}", company_id, viewer.id);

    Ok(StatusCode::NO_CONTENT)
}

/// List the users of a company.
///
/// Super admins see any company; company members see their own.
#[utoipa::path(
    get,
    path = "/companies/{company_id}/users",
    responses(
        (status = 200, description = "Users sorted by full name", body = [ProfileResponse]),
        (status = 403, description = "Caller may not see this company's users")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn list_company_users_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    if !can_list_company_users(&viewer, company_id) {
        return Err(forbidden("You do not have access to this company"));
    }

    let users = app_state
        .db
        .list_company_users(company_id)
        .await
        .map_err(|e| port_error_response("Failed to list users", e))?;

    let body: Vec<ProfileResponse> = users.into_iter().map(Into::into).collect();
    Ok(Json(body))
}
