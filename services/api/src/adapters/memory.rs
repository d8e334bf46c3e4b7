//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `CrmRepository` port, used to run the
//! service without Postgres (tests, local demos).

use async_trait::async_trait;
use chrono::Utc;
use opion_crm_core::domain::{
    required_name, Company, CustomerDraft, CustomerRecord, CustomerUpdate, Profile, ReferenceItem,
    ReferenceKind,
};
use opion_crm_core::ports::{CrmRepository, PortError, PortResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    companies: Vec<Company>,
    profiles: HashMap<Uuid, Profile>,
    customers: Vec<CustomerRecord>,
    references: Vec<ReferenceItem>,
}

#[derive(Default)]
pub struct InMemoryAdapter {
    tables: RwLock<Tables>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.insert(profile.id, profile);
    }

    /// Stores a fully formed record as-is, keeping its timestamps.
    pub async fn insert_customer(&self, record: CustomerRecord) {
        self.tables.write().await.customers.push(record);
    }
}

#[async_trait]
impl CrmRepository for InMemoryAdapter {
    async fn list_companies(&self) -> PortResult<Vec<Company>> {
        let mut companies = self.tables.read().await.companies.clone();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn create_company(&self, name: &str) -> PortResult<Company> {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            name: required_name(name, "company")?,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.companies.push(company.clone());
        Ok(company)
    }

    async fn update_company(&self, company_id: Uuid, name: &str) -> PortResult<Company> {
        let name = required_name(name, "company")?;
        let mut tables = self.tables.write().await;
        let company = tables
            .companies
            .iter_mut()
            .find(|c| c.id == company_id)
            .ok_or_else(|| PortError::NotFound(format!("Company {} not found", company_id)))?;
        company.name = name;
        company.updated_at = Utc::now();
        Ok(company.clone())
    }

    async fn delete_company(&self, company_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.companies.len();
        tables.companies.retain(|c| c.id != company_id);
        if tables.companies.len() == before {
            return Err(PortError::NotFound(format!("Company {} not found", company_id)));
        }
        tables.customers.retain(|c| c.company_id != company_id);
        tables.references.retain(|item| item.company_id != company_id);
        tables
            .profiles
            .values_mut()
            .filter(|p| p.company_id == Some(company_id))
            .for_each(|p| p.company_id = None);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        self.tables
            .read()
            .await
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Profile {} not found", user_id)))
    }

    async fn list_company_users(&self, company_id: Uuid) -> PortResult<Vec<Profile>> {
        let mut users: Vec<Profile> = self
            .tables
            .read()
            .await
            .profiles
            .values()
            .filter(|p| p.company_id == Some(company_id))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name).then_with(|| a.email.cmp(&b.email)));
        Ok(users)
    }

    async fn list_customers(&self, company_id: Uuid) -> PortResult<Vec<CustomerRecord>> {
        let mut records: Vec<CustomerRecord> = self
            .tables
            .read()
            .await
            .customers
            .iter()
            .filter(|c| c.company_id == company_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn get_customer(&self, customer_id: Uuid) -> PortResult<CustomerRecord> {
        self.tables
            .read()
            .await
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Customer {} not found", customer_id)))
    }

    async fn create_customer(
        &self,
        company_id: Uuid,
        draft: CustomerDraft,
    ) -> PortResult<CustomerRecord> {
        let draft = draft.normalized()?;
        let now = Utc::now();
        let record = CustomerRecord {
            id: Uuid::new_v4(),
            company_id,
            name: draft.name,
            sector_id: draft.sector_id,
            country_id: draft.country_id,
            contact: draft.contact,
            notes: draft.notes,
            attending_fair: draft.attending_fair,
            assigned_user_id: draft.assigned_user_id,
            last_contact_date: draft.last_contact_date,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.customers.push(record.clone());
        Ok(record)
    }

    async fn update_customer(
        &self,
        customer_id: Uuid,
        update: CustomerUpdate,
    ) -> PortResult<CustomerRecord> {
        let update = update.normalized()?;
        let mut tables = self.tables.write().await;
        let record = tables
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| PortError::NotFound(format!("Customer {} not found", customer_id)))?;

        record.name = update.name;
        record.sector_id = update.sector_id;
        record.country_id = update.country_id;
        record.contact = update.contact;
        record.notes = update.notes;
        record.attending_fair = update.attending_fair;
        record.assigned_user_id = update.assigned_user_id;
        record.last_contact_date = update.last_contact_date;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_customer(&self, customer_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.customers.len();
        tables.customers.retain(|c| c.id != customer_id);
        if tables.customers.len() == before {
            return Err(PortError::NotFound(format!("Customer {} not found", customer_id)));
        }
        Ok(())
    }

    async fn list_reference_items(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
    ) -> PortResult<Vec<ReferenceItem>> {
        let mut items: Vec<ReferenceItem> = self
            .tables
            .read()
            .await
            .references
            .iter()
            .filter(|item| item.kind == kind && item.company_id == company_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn create_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        name: &str,
    ) -> PortResult<ReferenceItem> {
        let item = ReferenceItem {
            id: Uuid::new_v4(),
            company_id,
            kind,
            name: required_name(name, "item")?,
            created_at: Utc::now(),
        };
        self.tables.write().await.references.push(item.clone());
        Ok(item)
    }

    async fn get_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
    ) -> PortResult<ReferenceItem> {
        self.tables
            .read()
            .await
            .references
            .iter()
            .find(|item| item.id == item_id && item.kind == kind && item.company_id == company_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Item {} not found", item_id)))
    }

    async fn update_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
        name: &str,
    ) -> PortResult<ReferenceItem> {
        let name = required_name(name, "item")?;
        let mut tables = self.tables.write().await;
        let item = tables
            .references
            .iter_mut()
            .find(|item| item.id == item_id && item.kind == kind && item.company_id == company_id)
            .ok_or_else(|| PortError::NotFound(format!("Item {} not found", item_id)))?;
        item.name = name;
        Ok(item.clone())
    }

    async fn delete_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
    ) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.references.len();
        tables
            .references
            .retain(|item| !(item.id == item_id && item.kind == kind && item.company_id == company_id));
        if tables.references.len() == before {
            return Err(PortError::NotFound(format!("Item {} not found", item_id)));
        }
        Ok(())
    }
}
