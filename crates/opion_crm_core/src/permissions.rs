//! crates/opion_crm_core/src/permissions.rs
//!
//! Role-based checks deciding what a viewer may do with a customer record.
//!
//! Only `company_admin` and `company_user` are ever granted anything on customer
//! records. Every other role, including `super_admin` and unknown stored values,
//! gets `false`. A `super_admin` instead manages the tenant companies themselves.

use crate::domain::{CustomerRecord, Role, Viewer};
use uuid::Uuid;

/// The action eligibility of one viewer on one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permission {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

pub fn can_view(viewer: &Viewer, _record: &CustomerRecord) -> bool {
    is_company_member(viewer)
}

/// Admins edit everything; users edit only records assigned to them.
pub fn can_edit(viewer: &Viewer, record: &CustomerRecord) -> bool {
    match viewer.role {
        Role::CompanyAdmin => true,
        Role::CompanyUser => record.is_assigned_to(viewer.id),
        _ => false,
    }
}

pub fn can_delete(viewer: &Viewer, _record: &CustomerRecord) -> bool {
    viewer.role == Role::CompanyAdmin
}

pub fn permissions(viewer: &Viewer, record: &CustomerRecord) -> Permission {
    Permission {
        can_view: can_view(viewer, record),
        can_edit: can_edit(viewer, record),
        can_delete: can_delete(viewer, record),
    }
}

pub fn can_create(viewer: &Viewer) -> bool {
    is_company_member(viewer)
}

/// Sectors, countries and fairs are maintained by company admins only.
pub fn can_manage_reference_data(viewer: &Viewer) -> bool {
    viewer.role == Role::CompanyAdmin
}

/// A viewer only reaches data of the company on their own profile.
pub fn can_access_company(viewer: &Viewer, company_id: Uuid) -> bool {
    is_company_member(viewer) && viewer.company_id == Some(company_id)
}

/// Creating, renaming and deleting tenant companies.
pub fn can_manage_companies(viewer: &Viewer) -> bool {
    viewer.role == Role::SuperAdmin
}

/// The user list of a company feeds the assignee picker of its members and the
/// user administration of a super admin.
pub fn can_list_company_users(viewer: &Viewer, company_id: Uuid) -> bool {
    can_manage_companies(viewer) || can_access_company(viewer, company_id)
}

fn is_company_member(viewer: &Viewer) -> bool {
    matches!(viewer.role, Role::CompanyAdmin | Role::CompanyUser)
}
