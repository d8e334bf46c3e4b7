//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API
//! server, and their conversions from the core domain types.

use chrono::{DateTime, NaiveDate, Utc};
use opion_crm_core::domain::{
    Company, ContactInfo, CustomerDraft, CustomerRecord, Profile, ReferenceItem,
};
use opion_crm_core::{CustomerListPage, CustomerRow, CustomerStats, Permission, StatusCategory};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

/// Query string of the customer list endpoint.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCustomersQuery {
    /// `all`, `attending_fair`, `not_attending_fair`, `under_discussion` or `not_contacted`.
    pub status: Option<String>,
    /// 1-based page number; out of range values are clamped.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    /// Matches name, phone or contact person.
    pub q: Option<String>,
}

/// Body of the create and update customer endpoints.
#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct CustomerPayload {
    pub name: String,
    pub sector_id: Option<Uuid>,
    pub country_id: Option<Uuid>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub email_2: Option<String>,
    pub email_3: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub contact_person: Option<String>,
    pub notes: Option<String>,
    /// `true`, `false`, or null/absent for "not decided yet".
    pub attending_fair: Option<bool>,
    pub assigned_user_id: Option<Uuid>,
    pub last_contact_date: Option<NaiveDate>,
}

impl From<CustomerPayload> for CustomerDraft {
    fn from(payload: CustomerPayload) -> Self {
        CustomerDraft {
            name: payload.name,
            sector_id: payload.sector_id,
            country_id: payload.country_id,
            contact: ContactInfo {
                phone: payload.phone,
                email: payload.email,
                email_2: payload.email_2,
                email_3: payload.email_3,
                address: payload.address,
                website: payload.website,
                contact_person: payload.contact_person,
            },
            notes: payload.notes,
            attending_fair: payload.attending_fair.into(),
            assigned_user_id: payload.assigned_user_id,
            last_contact_date: payload.last_contact_date,
        }
    }
}

/// Body of the create and rename endpoints of sectors, countries and fairs.
#[derive(Deserialize, Debug, ToSchema)]
pub struct ReferenceItemRequest {
    pub name: String,
}

/// Body of the create and rename company endpoints.
#[derive(Deserialize, Debug, ToSchema)]
pub struct CompanyRequest {
    pub name: String,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    AttendingFair,
    NotAttendingFair,
    UnderDiscussion,
    NotContacted,
}

impl From<StatusCategory> for CustomerStatus {
    fn from(status: StatusCategory) -> Self {
        match status {
            StatusCategory::AttendingFair => CustomerStatus::AttendingFair,
            StatusCategory::NotAttendingFair => CustomerStatus::NotAttendingFair,
            StatusCategory::UnderDiscussion => CustomerStatus::UnderDiscussion,
            StatusCategory::NotContacted => CustomerStatus::NotContacted,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct StatsResponse {
    pub total: usize,
    pub attending_fair: usize,
    pub not_attending_fair: usize,
    pub under_discussion: usize,
    pub not_contacted: usize,
}

impl From<CustomerStats> for StatsResponse {
    fn from(stats: CustomerStats) -> Self {
        Self {
            total: stats.total,
            attending_fair: stats.attending_fair,
            not_attending_fair: stats.not_attending_fair,
            under_discussion: stats.under_discussion,
            not_contacted: stats.not_contacted,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct PermissionResponse {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl From<Permission> for PermissionResponse {
    fn from(p: Permission) -> Self {
        Self {
            can_view: p.can_view,
            can_edit: p.can_edit,
            can_delete: p.can_delete,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub sector_id: Option<Uuid>,
    pub country_id: Option<Uuid>,
    pub phone: Option<String>,
    pub emails: Vec<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub website_url: Option<String>,
    pub contact_person: Option<String>,
    pub notes: Option<String>,
    pub attending_fair: Option<bool>,
    pub assigned_user_id: Option<Uuid>,
    pub last_contact_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CustomerRecord> for CustomerResponse {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            id: record.id,
            company_id: record.company_id,
            name: record.name.clone(),
            sector_id: record.sector_id,
            country_id: record.country_id,
            phone: record.contact.phone.clone(),
            emails: record.contact.emails().map(str::to_string).collect(),
            address: record.contact.address.clone(),
            website: record.contact.website.clone(),
            website_url: record.contact.website_url(),
            contact_person: record.contact.contact_person.clone(),
            notes: record.notes.clone(),
            attending_fair: record.attending_fair.as_option(),
            assigned_user_id: record.assigned_user_id,
            last_contact_date: record.last_contact_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// One customer card: the record, its derived status and the allowed actions.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CustomerRowResponse {
    pub customer: CustomerResponse,
    pub status: CustomerStatus,
    pub status_label: String,
    pub permissions: PermissionResponse,
}

impl From<&CustomerRow<'_>> for CustomerRowResponse {
    fn from(row: &CustomerRow<'_>) -> Self {
        Self {
            customer: row.record.into(),
            status: row.status.into(),
            status_label: row.status.label().to_string(),
            permissions: row.permission.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct PaginationResponse {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Records matching the search and status filter, across all pages.
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CustomerListResponse {
    pub stats: StatsResponse,
    pub items: Vec<CustomerRowResponse>,
    pub pagination: PaginationResponse,
}

impl From<&CustomerListPage<'_>> for CustomerListResponse {
    fn from(page: &CustomerListPage<'_>) -> Self {
        Self {
            stats: page.stats.into(),
            items: page.rows.iter().map(CustomerRowResponse::from).collect(),
            pagination: PaginationResponse {
                current_page: page.current_page,
                total_pages: page.total_pages,
                page_size: page.page_size.get(),
                total_items: page.matching,
                has_next: page.has_next,
                has_previous: page.has_previous,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ReferenceItemResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReferenceItem> for ReferenceItemResponse {
    fn from(item: ReferenceItem) -> Self {
        Self {
            id: item.id,
            company_id: item.company_id,
            name: item.name,
            created_at: item.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub company_id: Option<Uuid>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role.to_string(),
            company_id: profile.company_id,
        }
    }
}
