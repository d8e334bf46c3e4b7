//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the customer (firma kartı) endpoints and the
//! master definition for the OpenAPI specification.
//!
//! Every list and detail response is produced by the core pipeline; handlers
//! only fetch a fresh snapshot, check company access, and serialise.

use crate::error::{forbidden, port_error_response, HandlerError};
use crate::web::protocol::{
    CompanyRequest, CompanyResponse, CustomerListResponse, CustomerPayload, CustomerResponse,
    CustomerRowResponse, CustomerStatus, ListCustomersQuery, PaginationResponse,
    PermissionResponse, ProfileResponse, ReferenceItemRequest, ReferenceItemResponse,
    StatsResponse,
};
use crate::web::{companies, reference};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use opion_crm_core::domain::{CustomerDraft, CustomerRecord, Profile, ReferenceKind, Role, Viewer};
use opion_crm_core::ports::PortError;
use opion_crm_core::{
    build_list_view, can_access_company, can_create, can_delete, can_edit, can_view,
    compute_stats, row_for, ListQuery, StatusFilter,
};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        me_handler,
        list_customers_handler,
        customer_stats_handler,
        create_customer_handler,
        get_customer_handler,
        update_customer_handler,
        delete_customer_handler,
        reference::list_reference_items_handler,
        reference::create_reference_item_handler,
        reference::update_reference_item_handler,
        reference::delete_reference_item_handler,
        companies::list_companies_handler,
        companies::create_company_handler,
        companies::update_company_handler,
        companies::delete_company_handler,
        companies::list_company_users_handler,
    ),
    components(
        schemas(
            CustomerListResponse,
            CustomerRowResponse,
            CustomerResponse,
            CustomerStatus,
            CustomerPayload,
            StatsResponse,
            PermissionResponse,
            PaginationResponse,
            ProfileResponse,
            ReferenceItemResponse,
            ReferenceItemRequest,
            CompanyResponse,
            CompanyRequest,
        )
    ),
    tags(
        (name = "Opion CRM API", description = "Tenant companies, their customer cards with fair status, and their reference data.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Access Helpers
//=========================================================================================

pub(crate) fn ensure_company_access(viewer: &Viewer, company_id: Uuid) -> Result<(), HandlerError> {
    if can_access_company(viewer, company_id) {
        Ok(())
    } else {
        Err(forbidden("You do not have access to this company"))
    }
}

/// Loads a record and hides it when it belongs to another company.
async fn load_customer(
    app_state: &AppState,
    viewer: &Viewer,
    customer_id: Uuid,
) -> Result<CustomerRecord, HandlerError> {
    let record = app_state
        .db
        .get_customer(customer_id)
        .await
        .map_err(|e| port_error_response("Failed to load customer", e))?;
    if !can_access_company(viewer, record.company_id) {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Customer {} not found", customer_id),
        ));
    }
    Ok(record)
}

/// Rejects sector, country and assignee ids that do not belong to `company_id`.
async fn ensure_links_in_company(
    app_state: &AppState,
    company_id: Uuid,
    draft: &CustomerDraft,
) -> Result<(), HandlerError> {
    let references = [
        (ReferenceKind::Sector, draft.sector_id),
        (ReferenceKind::Country, draft.country_id),
    ];
    for (kind, item_id) in references {
        let Some(item_id) = item_id else { continue };
        match app_state.db.get_reference_item(kind, company_id, item_id).await {
            Ok(_) => {}
            Err(PortError::NotFound(_)) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!("Unknown {} entry {}", kind.table_name(), item_id),
                ));
            }
            Err(e) => return Err(port_error_response("Failed to check references", e)),
        }
    }

    if let Some(user_id) = draft.assigned_user_id {
        match app_state.db.get_profile(user_id).await {
            Ok(profile) if profile.company_id == Some(company_id) => {}
            Ok(_) | Err(PortError::NotFound(_)) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!("User {} is not a member of this company", user_id),
                ));
            }
            Err(e) => return Err(port_error_response("Failed to check assignee", e)),
        }
    }
    Ok(())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Returns the profile of the calling user.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Unknown or missing user")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn me_handler(Extension(profile): Extension<Profile>) -> Json<ProfileResponse> {
    Json(profile.into())
}

/// List one page of a company's customer cards.
///
/// Stats always cover the whole company snapshot. The `all` filter lists every
/// company record; a specific status filter is limited to the caller's scope.
#[utoipa::path(
    get,
    path = "/companies/{company_id}/customers",
    responses(
        (status = 200, description = "One page of customer cards", body = CustomerListResponse),
        (status = 403, description = "Caller belongs to another company"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider."),
        ListCustomersQuery
    )
)]
pub async fn list_customers_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(company_id): Path<Uuid>,
    Query(params): Query<ListCustomersQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_company_access(&viewer, company_id)?;

    let records = app_state
        .db
        .list_customers(company_id)
        .await
        .map_err(|e| port_error_response("Failed to list customers", e))?;

    let query = ListQuery {
        status: params
            .status
            .as_deref()
            .map(StatusFilter::parse)
            .unwrap_or_default(),
        search: params.q,
        page: params.page.unwrap_or(1),
        page_size: app_state.config.page_size(params.page_size),
    };
    if query.status == StatusFilter::Unrecognized {
        debug!("Unrecognized status filter {:?}; returning no rows", params.status);
    }

    let page = build_list_view(&records, &viewer, &query);
    Ok(Json(CustomerListResponse::from(&page)))
}

/// Stats bar counts for a company.
#[utoipa::path(
    get,
    path = "/companies/{company_id}/customers/stats",
    responses(
        (status = 200, description = "Per-status counts", body = StatsResponse),
        (status = 403, description = "Caller belongs to another company")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn customer_stats_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_company_access(&viewer, company_id)?;

    let records = app_state
        .db
        .list_customers(company_id)
        .await
        .map_err(|e| port_error_response("Failed to load customer stats", e))?;

    Ok(Json(StatsResponse::from(compute_stats(&records, &viewer))))
}

/// Create a new customer card.
///
/// A company user's new card is assigned to themselves when no assignee is given.
#[utoipa::path(
    post,
    path = "/companies/{company_id}/customers",
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = CustomerRowResponse),
        (status = 400, description = "Missing name, or a sector, country or assignee from outside the company"),
        (status = 403, description = "Caller may not create customers here")
    ),
    params(
        ("company_id" = Uuid, Path, description = "The tenant company."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn create_customer_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_company_access(&viewer, company_id)?;
    if !can_create(&viewer) {
        return Err(forbidden("You may not create customers"));
    }

    let mut draft = CustomerDraft::from(payload);
    if viewer.role == Role::CompanyUser && draft.assigned_user_id.is_none() {
        draft.assigned_user_id = Some(viewer.id);
    }
    ensure_links_in_company(&app_state, company_id, &draft).await?;

    let record = app_state
        .db
        .create_customer(company_id, draft)
        .await
        .map_err(|e| port_error_response("Failed to create customer", e))?;
    info!("Customer {} created in company {} by {}", record.id, company_id, viewer.id);

    Ok((
        StatusCode::CREATED,
        Json(CustomerRowResponse::from(&row_for(&viewer, &record))),
    ))
}

/// Fetch one customer card.
#[utoipa::path(
    get,
    path = "/customers/{customer_id}",
    responses(
        (status = 200, description = "The customer card", body = CustomerRowResponse),
        (status = 403, description = "Caller may not view customers"),
        (status = 404, description = "No such customer in the caller's company")
    ),
    params(
        ("customer_id" = Uuid, Path, description = "The customer record."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn get_customer_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let record = load_customer(&app_state, &viewer, customer_id).await?;
    if !can_view(&viewer, &record) {
        return Err(forbidden("You may not view this customer"));
    }
    Ok(Json(CustomerRowResponse::from(&row_for(&viewer, &record))))
}

/// Replace the editable fields of a customer card.
///
/// Company users may only edit cards assigned to them and cannot reassign them.
#[utoipa::path(
    put,
    path = "/customers/{customer_id}",
    request_body = CustomerPayload,
    responses(
        (status = 200, description = "Customer updated", body = CustomerRowResponse),
        (status = 400, description = "Missing name, or a sector, country or assignee from outside the company"),
        (status = 403, description = "Caller may not edit this customer"),
        (status = 404, description = "No such customer in the caller's company")
    ),
    params(
        ("customer_id" = Uuid, Path, description = "The customer record."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn update_customer_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, HandlerError> {
    let record = load_customer(&app_state, &viewer, customer_id).await?;
    if !can_edit(&viewer, &record) {
        return Err(forbidden("You may not edit this customer"));
    }

    let mut update = CustomerDraft::from(payload);
    if viewer.role != Role::CompanyAdmin {
        update.assigned_user_id = record.assigned_user_id;
    }
    ensure_links_in_company(&app_state, record.company_id, &update).await?;

    let updated = app_state
        .db
        .update_customer(customer_id, update)
        .await
        .map_err(|e| port_error_response("Failed to update customer", e))?;
    info!("Customer {} updated by {}", customer_id, viewer.id);

    Ok(Json(CustomerRowResponse::from(&row_for(&viewer, &updated))))
}

/// Delete a customer card. Company admins only.
#[utoipa::path(
    delete,
    path = "/customers/{customer_id}",
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 403, description = "Caller may not delete this customer"),
        (status = 404, description = "No such customer in the caller's company")
    ),
    params(
        ("customer_id" = Uuid, Path, description = "The customer record."),
        ("x-user-id" = Uuid, Header, description = "The user id asserted by the identity provider.")
    )
)]
pub async fn delete_customer_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let record = load_customer(&app_state, &viewer, customer_id).await?;
    if !can_delete(&viewer, &record) {
        return Err(forbidden("You may not delete this customer"));
    }

    app_state
        .db
        .delete_customer(customer_id)
        .await
        .map_err(|e| port_error_response("Failed to delete customer", e))?;
    info!("Customer {} deleted by {}", customer_id, viewer.id);

    Ok(StatusCode::NO_CONTENT)
}
