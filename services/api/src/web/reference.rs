//! services/api/src/web/reference.rs
//!
//! Handlers for the company reference lists: sectors, countries and fairs.
//! Any company member can read them; only company admins change them.

use crate::error::{forbidden, port_error_response, HandlerError};
use crate::web::protocol::{ReferenceItemRequest, ReferenceItemResponse};
use crate::web::rest::ensure_company_access;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use opion_crm_core::domain::{ReferenceKind, Viewer};
use opion_crm_core::can_manage_reference_data;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

fn parse_kind(segment: &str) -> Result<ReferenceKind, HandlerError> {
    ReferenceKind::from_segment(segment)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown list '{}'", segment)))
}

/// List the sectors, countries or fairs of a company.
#[utoipa::path(
    get,
    path = "/companies/{company_id}/{kind}",
    responses(
        (status = 200, description = "Items sorted by name", body = [ReferenceItemResponse]),
        (status = 403, description = "Caller belongs to another company"),
        (status = 404, description = "Unknown list kind")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("kind" = String, Path, description = "`sectors`, `countries` or `fairs`."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn list_reference_items_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path((company_id, segment)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, HandlerError> {
    let kind = parse_kind(&segment)?;
    ensure_company_access(&viewer, company_id)?;

    let items = app_state
        .db
        .list_reference_items(kind, company_id)
        .await
        .map_err(|e| port_error_response("Failed to list items", e))?;

    let body: Vec<ReferenceItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Add a sector, country or fair. Company admins only.
#[utoipa::path(
    post,
    path = "/companies/{company_id}/{kind}",
    request_body = ReferenceItemRequest,
    responses(
        (status = 201, description = "Item created", body = ReferenceItemResponse),
        (status = 400, description = "Missing name"),
        (status = 403, description = "Caller may not manage this list")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("kind" = String, Path, description = "`sectors`, `countries` or `fairs`."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn create_reference_item_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path((company_id, segment)): Path<(Uuid, String)>,
    Json(req): Json<ReferenceItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let kind = parse_kind(&segment)?;
    ensure_company_access(&viewer, company_id)?;
    if !can_manage_reference_data(&viewer) {
        return Err(forbidden("Only company admins manage this list"));
    }

    let item = app_state
        .db
        .create_reference_item(kind, company_id, &req.name)
        .await
        .map_err(|e| port_error_response("Failed to create item", e))?;
    info!("{} entry {} created in company {}", segment, item.id, company_id);

    Ok((StatusCode::CREATED, Json(ReferenceItemResponse::from(item))))
}

/// Rename a sector, country or fair. Company admins only.
#[utoipa::path(
    put,
    path = "/companies/{company_id}/{kind}/{item_id}",
    request_body = ReferenceItemRequest,
    responses(
        (status = 200, description = "Item renamed", body = ReferenceItemResponse),
        (status = 400, description = "Missing name"),
        (status = 403, description = "Caller may not manage this list"),
        (status = 404, description = "No such item")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("kind" = String, Path, description = "`sectors`, `countries` or `fairs`."),
        ("item_id" = Uuid, Path, description = "The item to rename."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn update_reference_item_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path((company_id, segment, item_id)): Path<(Uuid, String, Uuid)>,
    Json(req): Json<ReferenceItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let kind = parse_kind(&segment)?;
    ensure_company_access(&viewer, company_id)?;
    if !can_manage_reference_data(&viewer) {
        return Err(forbidden("Only company admins manage this list"));
    }

    let item = app_state
        .db
        .update_reference_item(kind, company_id, item_id, &req.name)
        .await
        .map_err(|e| port_error_response("Failed to rename item", e))?;
    info!("{} entry {} renamed in company {}", segment, item_id, company_id);

    Ok(Json(ReferenceItemResponse::from(item)))
}

/// Remove a sector, country or fair. Company admins only.
#[utoipa::path(
    delete,
    path = "/companies/{company_id}/{kind}/{item_id}",
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Caller may not manage this list"),
        (status = 404, description = "No such item")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("kind" = String, Path, description = "`sectors`, `countries` or `fairs`."),
        ("item_id" = Uuid, Path, description = "The item to delete."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn delete_reference_item_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path((company_id, segment, item_id)): Path<(Uuid, String, Uuid)>,
) -> Result<impl IntoResponse, HandlerError> {
    let kind = parse_kind(&segment)?;
    ensure_company_access(&viewer, company_id)?;
    if !can_manage_reference_data(&viewer) {
        return Err(forbidden("Only company admins manage this list"));
    }

    app_state
        .db
        .delete_reference_item(kind, company_id, item_id)
        .await
        .map_err(|e| port_error_response("Failed to delete item", e))?;
    info!("{} entry {} deleted from company {}", segment, item_id, company_id);

    Ok(StatusCode::NO_CONTENT)
}
