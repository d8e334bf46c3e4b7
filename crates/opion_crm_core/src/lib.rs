pub mod domain;
pub mod paginator;
pub mod permissions;
pub mod ports;
pub mod stats;
pub mod status;
pub mod view;

pub use domain::{
    required_name, Company, ContactInfo, CustomerDraft, CustomerRecord, CustomerUpdate,
    FairAttendance, Profile, ReferenceItem, ReferenceKind, Role, Viewer,
};
pub use paginator::{get_page, total_pages, Paginator, DEFAULT_PAGE_SIZE};
pub use permissions::{
    can_access_company, can_create, can_delete, can_edit, can_list_company_users,
    can_manage_companies, can_manage_reference_data, can_view, permissions, Permission,
};
pub use ports::{CrmRepository, PortError, PortResult};
pub use stats::{compute_stats, filter_by_status, search, CustomerStats};
pub use status::{classify, StatusCategory, StatusFilter};
pub use view::{build_list_view, row_for, CustomerListPage, CustomerRow, ListQuery};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{ContactInfo, CustomerRecord, FairAttendance, Role, Viewer};
    use chrono::Utc;
    use uuid::Uuid;

    pub fn customer() -> CustomerRecord {
        let now = Utc::now();
        CustomerRecord {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "Test Firma".to_string(),
            sector_id: None,
            country_id: None,
            contact: ContactInfo::default(),
            notes: None,
            attending_fair: FairAttendance::Unset,
            assigned_user_id: None,
            last_contact_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn viewer(role: Role) -> Viewer {
        Viewer::new(Uuid::new_v4(), role, Some(Uuid::new_v4()))
    }
}
