//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CrmRepository` port from the `core` crate. It handles all interactions
//! with the Postgres database behind the CRM backend using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use opion_crm_core::domain::{
    required_name, Company, ContactInfo, CustomerDraft, CustomerRecord, CustomerUpdate, Profile,
    ReferenceItem, ReferenceKind, Role,
};
use opion_crm_core::ports::{CrmRepository, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `CrmRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

const CUSTOMER_COLUMNS: &str = "id, company_id, name, sector_id, country_id, phone, email, \
     email_2, email_3, address, website, contact_person, notes, attending_fair, \
     assigned_user_id, last_contact_date, created_at, updated_at";

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct CompanyRecord {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl CompanyRecord {
    fn to_domain(self) -> Company {
        Company {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ProfileRecord {
    id: Uuid,
    email: Option<String>,
    full_name: Option<String>,
    role: String,
    company_id: Option<Uuid>,
}
impl ProfileRecord {
    fn to_domain(self) -> Profile {
        Profile {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role: Role::parse(&self.role),
            company_id: self.company_id,
        }
    }
}

#[derive(FromRow)]
struct CustomerCompanyRecord {
    id: Uuid,
    company_id: Uuid,
    name: String,
    sector_id: Option<Uuid>,
    country_id: Option<Uuid>,
    phone: Option<String>,
    email: Option<String>,
    email_2: Option<String>,
    email_3: Option<String>,
    address: Option<String>,
    website: Option<String>,
    contact_person: Option<String>,
    notes: Option<String>,
    attending_fair: Option<bool>,
    assigned_user_id: Option<Uuid>,
    last_contact_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl CustomerCompanyRecord {
    fn to_domain(self) -> CustomerRecord {
        CustomerRecord {
            id: self.id,
            company_id: self.company_id,
            name: self.name,
            sector_id: self.sector_id,
            country_id: self.country_id,
            contact: ContactInfo {
                phone: self.phone,
                email: self.email,
                email_2: self.email_2,
                email_3: self.email_3,
                address: self.address,
                website: self.website,
                contact_person: self.contact_person,
            },
            notes: self.notes,
            // Null and missing collapse into `Unset` here, once.
            attending_fair: self.attending_fair.into(),
            assigned_user_id: self.assigned_user_id,
            last_contact_date: self.last_contact_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ReferenceRecord {
    id: Uuid,
    company_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}
impl ReferenceRecord {
    fn to_domain(self, kind: ReferenceKind) -> ReferenceItem {
        ReferenceItem {
            id: self.id,
            company_id: self.company_id,
            kind,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or_unexpected(what: String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        other => write_error(other),
    }
}

/// Writes that point at a missing sector, country, fair or profile are bad
/// input, not server faults.
fn write_error(e: sqlx::Error) -> PortError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() {
            return PortError::Invalid(format!("Unknown reference: {}", db.message()));
        }
    }
    unexpected(e)
}

//=========================================================================================
// `CrmRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl CrmRepository for DbAdapter {
    async fn list_companies(&self) -> PortResult<Vec<Company>> {
        let records = sqlx::query_as::<_, CompanyRecord>(
            "SELECT id, name, created_at, updated_at FROM companies ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_company(&self, name: &str) -> PortResult<Company> {
        let name = required_name(name, "company")?;
        let record = sqlx::query_as::<_, CompanyRecord>(
            "INSERT INTO companies (id, name) VALUES ($1, $2) RETURNING id, name, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn update_company(&self, company_id: Uuid, name: &str) -> PortResult<Company> {
        let name = required_name(name, "company")?;
        let record = sqlx::query_as::<_, CompanyRecord>(
            "UPDATE companies SET name = $2, updated_at = now() WHERE id = $1 \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(company_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(format!("Company {} not found", company_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_company(&self, company_id: Uuid) -> PortResult<()> {
        // Customer records and reference lists cascade; profiles are set to NULL.
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(company_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Company {} not found", company_id)));
        }
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            "SELECT id, email, full_name, role, company_id FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(format!("Profile {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn list_company_users(&self, company_id: Uuid) -> PortResult<Vec<Profile>> {
        let records = sqlx::query_as::<_, ProfileRecord>(
            "SELECT id, email, full_name, role, company_id FROM profiles \
             WHERE company_id = $1 ORDER BY full_name ASC NULLS LAST, email ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_customers(&self, company_id: Uuid) -> PortResult<Vec<CustomerRecord>> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer_companies WHERE company_id = $1 ORDER BY created_at DESC"
        );
        let records = sqlx::query_as::<_, CustomerCompanyRecord>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_customer(&self, customer_id: Uuid) -> PortResult<CustomerRecord> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customer_companies WHERE id = $1");
        let record = sqlx::query_as::<_, CustomerCompanyRecord>(&sql)
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_or_unexpected(format!("Customer {} not found", customer_id)))?;
        Ok(record.to_domain())
    }

    async fn create_customer(
        &self,
        company_id: Uuid,
        draft: CustomerDraft,
    ) -> PortResult<CustomerRecord> {
        let draft = draft.normalized()?;
        let sql = format!(
            "INSERT INTO customer_companies (id, company_id, name, sector_id, country_id, phone, \
             email, email_2, email_3, address, website, contact_person, notes, attending_fair, \
             assigned_user_id, last_contact_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        let record = sqlx::query_as::<_, CustomerCompanyRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(company_id)
            .bind(draft.name)
            .bind(draft.sector_id)
            .bind(draft.country_id)
            .bind(draft.contact.phone)
            .bind(draft.contact.email)
            .bind(draft.contact.email_2)
            .bind(draft.contact.email_3)
            .bind(draft.contact.address)
            .bind(draft.contact.website)
            .bind(draft.contact.contact_person)
            .bind(draft.notes)
            .bind(draft.attending_fair.as_option())
            .bind(draft.assigned_user_id)
            .bind(draft.last_contact_date)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)?;
        Ok(record.to_domain())
    }

    async fn update_customer(
        &self,
        customer_id: Uuid,
        update: CustomerUpdate,
    ) -> PortResult<CustomerRecord> {
        let update = update.normalized()?;
        let sql = format!(
            "UPDATE customer_companies SET name = $2, sector_id = $3, country_id = $4, phone = $5, \
             email = $6, email_2 = $7, email_3 = $8, address = $9, website = $10, \
             contact_person = $11, notes = $12, attending_fair = $13, assigned_user_id = $14, \
             last_contact_date = $15, updated_at = now() \
             WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"
        );
        let record = sqlx::query_as::<_, CustomerCompanyRecord>(&sql)
            .bind(customer_id)
            .bind(update.name)
            .bind(update.sector_id)
            .bind(update.country_id)
            .bind(update.contact.phone)
            .bind(update.contact.email)
            .bind(update.contact.email_2)
            .bind(update.contact.email_3)
            .bind(update.contact.address)
            .bind(update.contact.website)
            .bind(update.contact.contact_person)
            .bind(update.notes)
            .bind(update.attending_fair.as_option())
            .bind(update.assigned_user_id)
            .bind(update.last_contact_date)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_or_unexpected(format!("Customer {} not found", customer_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_customer(&self, customer_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM customer_companies WHERE id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Customer {} not found", customer_id)));
        }
        Ok(())
    }

    async fn list_reference_items(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
    ) -> PortResult<Vec<ReferenceItem>> {
        let sql = format!(
            "SELECT id, company_id, name, created_at FROM {} WHERE company_id = $1 ORDER BY name ASC",
            kind.table_name()
        );
        let records = sqlx::query_as::<_, ReferenceRecord>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain(kind)).collect())
    }

    async fn create_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        name: &str,
    ) -> PortResult<ReferenceItem> {
        let name = required_name(name, "item")?;
        let sql = format!(
            "INSERT INTO {} (id, company_id, name) VALUES ($1, $2, $3) \
             RETURNING id, company_id, name, created_at",
            kind.table_name()
        );
        let record = sqlx::query_as::<_, ReferenceRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(company_id)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain(kind))
    }

    async fn get_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
    ) -> PortResult<ReferenceItem> {
        let sql = format!(
            "SELECT id, company_id, name, created_at FROM {} WHERE id = $1 AND company_id = $2",
            kind.table_name()
        );
        let record = sqlx::query_as::<_, ReferenceRecord>(&sql)
            .bind(item_id)
            .bind(company_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_or_unexpected(format!("Item {} not found", item_id)))?;
        Ok(record.to_domain(kind))
    }

    async fn update_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
        name: &str,
    ) -> PortResult<ReferenceItem> {
        let name = required_name(name, "item")?;
        let sql = format!(
            "UPDATE {} SET name = $3 WHERE id = $1 AND company_id = $2 \
             RETURNING id, company_id, name, created_at",
            kind.table_name()
        );
        let record = sqlx::query_as::<_, ReferenceRecord>(&sql)
            .bind(item_id)
            .bind(company_id)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_or_unexpected(format!("Item {} not found", item_id)))?;
        Ok(record.to_domain(kind))
    }

    async fn delete_reference_item(
        &self,
        kind: ReferenceKind,
        company_id: Uuid,
        item_id: Uuid,
    ) -> PortResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND company_id = $2",
            kind.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(item_id)
            .bind(company_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Item {} not found", item_id)));
        }
        Ok(())
    }
}
