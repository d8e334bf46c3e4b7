//! crates/opion_crm_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use crate::ports::{PortError, PortResult};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use uuid::Uuid;

//=========================================================================================
// Tenant Companies
//=========================================================================================

/// A tenant company. Every profile below `super_admin` and every piece of CRM
/// data belongs to exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trims a display name, failing with `Invalid` when nothing is left.
pub fn required_name(name: &str, what: &str) -> PortResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PortError::Invalid(format!("{} name is required", what)));
    }
    Ok(name.to_string())
}

//=========================================================================================
// Roles and the Acting Viewer
//=========================================================================================

/// The role stored on a user profile.
///
/// Any stored value outside the known set is kept as `Other` so that it can be
/// reported, but it is never granted anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    CompanyAdmin,
    CompanyUser,
    Other(String),
}

impl Role {
    /// Parses a stored role string. Never fails; unknown values become `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "super_admin" => Role::SuperAdmin,
            "company_admin" => Role::CompanyAdmin,
            "company_user" => Role::CompanyUser,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::CompanyAdmin => "company_admin",
            Role::CompanyUser => "company_user",
            Role::Other(value) => value.as_str(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The acting user for one evaluation. Passed explicitly into every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: Uuid,
    pub role: Role,
    pub company_id: Option<Uuid>,
}

impl Viewer {
    pub fn new(id: Uuid, role: Role, company_id: Option<Uuid>) -> Self {
        Self {
            id,
            role,
            company_id,
        }
    }
}

// Stored user profile, the source a Viewer is built from.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub company_id: Option<Uuid>,
}

impl Profile {
    pub fn to_viewer(&self) -> Viewer {
        Viewer::new(self.id, self.role.clone(), self.company_id)
    }
}

//=========================================================================================
// Customer Records (firma kartı)
//=========================================================================================

/// Whether a customer is attending the trade fair.
///
/// Storage conflates "absent" and "null"; both arrive here as `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FairAttendance {
    Attending,
    NotAttending,
    #[default]
    Unset,
}

impl FairAttendance {
    pub fn as_option(self) -> Option<bool> {
        match self {
            FairAttendance::Attending => Some(true),
            FairAttendance::NotAttending => Some(false),
            FairAttendance::Unset => None,
        }
    }
}

impl From<Option<bool>> for FairAttendance {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => FairAttendance::Attending,
            Some(false) => FairAttendance::NotAttending,
            None => FairAttendance::Unset,
        }
    }
}

/// Contact details of a customer company.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub email_2: Option<String>,
    pub email_3: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub contact_person: Option<String>,
}

impl ContactInfo {
    /// All configured email addresses, in order.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        [&self.email, &self.email_2, &self.email_3]
            .into_iter()
            .filter_map(|e| e.as_deref())
    }

    /// The website as a clickable URL; bare hosts get an `https://` prefix.
    pub fn website_url(&self) -> Option<String> {
        self.website.as_deref().map(|site| {
            if site.starts_with("http") {
                site.to_string()
            } else {
                format!("https://{}", site)
            }
        })
    }
}

/// A customer company entry belonging to one tenant company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub sector_id: Option<Uuid>,
    pub country_id: Option<Uuid>,
    pub contact: ContactInfo,
    pub notes: Option<String>,
    pub attending_fair: FairAttendance,
    pub assigned_user_id: Option<Uuid>,
    pub last_contact_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerRecord {
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_user_id == Some(user_id)
    }
}

//=========================================================================================
// Create / Update Payloads
//=========================================================================================

/// Input for a new customer record. Only `name` is required.
#[derive(Debug, Clone, Default)]
pub struct CustomerDraft {
    pub name: String,
    pub sector_id: Option<Uuid>,
    pub country_id: Option<Uuid>,
    pub contact: ContactInfo,
    pub notes: Option<String>,
    pub attending_fair: FairAttendance,
    pub assigned_user_id: Option<Uuid>,
    pub last_contact_date: Option<NaiveDate>,
}

impl CustomerDraft {
    /// Trims the name and turns blank optional text into `None`.
    ///
    /// Fails when the name is blank.
    pub fn normalized(mut self) -> PortResult<Self> {
        self.name = required_name(&self.name, "customer")?;
        self.notes = non_blank(self.notes);
        self.contact = normalize_contact(self.contact);
        Ok(self)
    }
}

/// Full replacement of the editable fields of an existing record.
pub type CustomerUpdate = CustomerDraft;

fn normalize_contact(contact: ContactInfo) -> ContactInfo {
    ContactInfo {
        phone: non_blank(contact.phone),
        email: non_blank(contact.email),
        email_2: non_blank(contact.email_2),
        email_3: non_blank(contact.email_3),
        address: non_blank(contact.address),
        website: non_blank(contact.website),
        contact_person: non_blank(contact.contact_person),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//=========================================================================================
// Company Reference Data
//=========================================================================================

/// The company-owned lookup lists a customer record can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Sector,
    Country,
    Fair,
}

impl ReferenceKind {
    /// Parses the plural path segment used by the HTTP routes.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "sectors" => Some(ReferenceKind::Sector),
            "countries" => Some(ReferenceKind::Country),
            "fairs" => Some(ReferenceKind::Fair),
            _ => None,
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            ReferenceKind::Sector => "sectors",
            ReferenceKind::Country => "countries",
            ReferenceKind::Fair => "fairs",
        }
    }
}

/// A sector, country or fair entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    pub id: Uuid,
    pub company_id: Uuid,
    pub kind: ReferenceKind,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_known_and_unknown() {
        assert_eq!(Role::parse("company_admin"), Role::CompanyAdmin);
        assert_eq!(Role::parse(" company_user "), Role::CompanyUser);
        assert_eq!(Role::parse("super_admin"), Role::SuperAdmin);
        assert_eq!(Role::parse("auditor"), Role::Other("auditor".to_string()));
        assert_eq!(Role::parse("auditor").as_str(), "auditor");
    }

    #[test]
    fn fair_attendance_from_option() {
        assert_eq!(FairAttendance::from(Some(true)), FairAttendance::Attending);
        assert_eq!(FairAttendance::from(Some(false)), FairAttendance::NotAttending);
        assert_eq!(FairAttendance::from(None), FairAttendance::Unset);
        assert_eq!(FairAttendance::Unset.as_option(), None);
    }

    #[test]
    fn draft_normalization_requires_name() {
        let draft = CustomerDraft {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(draft.normalized().is_err());
    }

    #[test]
    fn draft_normalization_clears_blank_fields() {
        let draft = CustomerDraft {
            name: "  ABC Teknoloji  ".to_string(),
            notes: Some("  ".to_string()),
            contact: ContactInfo {
                phone: Some(" +90 212 000 00 00 ".to_string()),
                email_2: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        let draft = draft.normalized().unwrap();
        assert_eq!(draft.name, "ABC Teknoloji");
        assert_eq!(draft.notes, None);
        assert_eq!(draft.contact.phone.as_deref(), Some("+90 212 000 00 00"));
        assert_eq!(draft.contact.email_2, None);
    }

    #[test]
    fn website_url_adds_scheme() {
        let contact = ContactInfo {
            website: Some("firma.com".to_string()),
            ..Default::default()
        };
        assert_eq!(contact.website_url().as_deref(), Some("https://firma.com"));

        let contact = ContactInfo {
            website: Some("http://firma.com".to_string()),
            ..Default::default()
        };
        assert_eq!(contact.website_url().as_deref(), Some("http://firma.com"));
    }

    #[test]
    fn emails_skip_missing_slots() {
        let contact = ContactInfo {
            email: Some("a@firma.com".to_string()),
            email_3: Some("c@firma.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            contact.emails().collect::<Vec<_>>(),
            vec!["a@firma.com", "c@firma.com"]
        );
    }

    #[test]
    fn required_name_trims_and_rejects_blank() {
        assert_eq!(required_name("  Fuarcılık A.Ş. ", "company").unwrap(), "Fuarcılık A.Ş.");
        assert!(matches!(required_name(" \t", "sector"), Err(PortError::Invalid(_))));
    }

    #[test]
    fn reference_kind_segments() {
        assert_eq!(ReferenceKind::from_segment("fairs"), Some(ReferenceKind::Fair));
        assert_eq!(ReferenceKind::from_segment("users"), None);
        assert_eq!(ReferenceKind::Country.table_name(), "countries");
    }
}
