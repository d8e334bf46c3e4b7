//! crates/opion_crm_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the backing store.

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{
    Company, CustomerDraft, CustomerRecord, CustomerUpdate, Profile, ReferenceItem, ReferenceKind,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., the database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Repository Port
//=========================================================================================

/// Access to the tenant data held by the external backend.
///
/// Every call returns a fresh snapshot; nothing is cached on this side.
#[async_trait]
pub trait CrmRepository: Send + Sync {
    // --- Tenant Companies ---
    /// All tenant companies, sorted by name.
    async fn list_companies(&self) -> PortResult<Vec<Company>>;

    async fn create_company(&self, name: &str) -> PortResult<Company>;

    async fn update_company(&self, company_id: Uuid, name: &str) -> PortResult<Company>;

    /// Deletes a company together with its customer records and reference lists.
    /// Its profiles are detached, not deleted.
    async fn delete_company(&self, company_id: Uuid) -> PortResult<()>;

    // --- Profiles ---
    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile>;

    /// The profiles attached to a company, sorted by full name.
    async fn list_company_users(&self, company_id: Uuid) -> PortResult<Vec<Profile>>;

    // --- Customer Records ---
    /// All customer records of a company, newest first.
    async fn list_customers(&self, company_id: Uuid) -> PortResult<Vec<CustomerRecord>>;

    async fn get_customer(&self, customer_id: Uuid) -> PortResult<CustomerRecord>;

    async fn create_customer(
        &self,
        company_id: Uuid,
        draft: CustomerDraft,
    ) -> PortResult<CustomerRecord>;

    async fn update_customer(
        &self,
        customer_id: Uuid,
        update: CustomerUpdate,
    ) -> PortResult<CustomerRecord>;

    async fn delete_customer(&self, customer_id: Uuid) -> PortResult<()>;

    // --- Reference Data (sectors, countries, fairs) ---
    async fn list_reference_items(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
    ) -> PortResult<Vec<ReferenceItem>>;

    async fn create_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        name: &str,
    ) -> PortResult<ReferenceItem>;

    /// Fetches one item, scoped to the owning company.
    async fn get_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
    ) -> PortResult<ReferenceItem>;

    /// Renames an item, scoped to the owning company.
    async fn update_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
        name: &str,
    ) -> PortResult<ReferenceItem>;

    /// Deletes an item, scoped to the owning company.
    async fn delete_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
    ) -> PortResult<()>;
}
