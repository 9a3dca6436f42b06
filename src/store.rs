use async_trait::async_trait;
use sqlx::PgPool;

use crate::model::{Contact, ContactPatch, NewContact};

const CONTACT_COLUMNS: &str = "id, name, phone, created_at, updated_at, deleted_at";

/// Persistence for contacts. Soft-deleted rows are invisible to every read.
#[async_trait]
pub trait ContactStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_all(&self) -> Result<Vec<Contact>, sqlx::Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, sqlx::Error>;

    async fn insert(&self, contact: NewContact) -> Result<Contact, sqlx::Error>;

    /// Returns `None` when `existing` was deleted before the update landed.
    async fn update_fields(
        &self,
        existing: &Contact,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, sqlx::Error>;

    async fn delete_by_id(&self, id: i64) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn find_all(&self) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE deleted_at IS NULL ORDER BY id"
        );

        sqlx::query_as::<_, Contact>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND deleted_at IS NULL"
        );

        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert(&self, contact: NewContact) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (name, phone, created_at, updated_at)
             VALUES ($1, $2, now(), now())
             RETURNING {CONTACT_COLUMNS}"
        );

        sqlx::query_as::<_, Contact>(&query)
            .bind(contact.name)
            .bind(contact.phone)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_fields(
        &self,
        existing: &Contact,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts
             SET name = COALESCE($2, name),
                 phone = COALESCE($3, phone),
                 updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {CONTACT_COLUMNS}"
        );

        sqlx::query_as::<_, Contact>(&query)
            .bind(existing.id)
            .bind(patch.name.as_deref())
            .bind(patch.phone.as_deref())
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contacts SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
pub use memory::MemoryContactStore;
