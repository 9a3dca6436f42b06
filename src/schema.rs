use sqlx::PgPool;

pub const CREATE_CONTACTS: &str = "
    CREATE TABLE IF NOT EXISTS contacts (
        id          BIGSERIAL PRIMARY KEY,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        deleted_at  TIMESTAMPTZ,
        name        TEXT NOT NULL DEFAULT '',
        phone       TEXT NOT NULL DEFAULT ''
    )";

pub const CREATE_CONTACTS_DELETED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_contacts_deleted_at ON contacts (deleted_at)";

/// Creates the `contacts` table and its soft-delete index when absent.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_CONTACTS).execute(pool).await?;
    sqlx::query(CREATE_CONTACTS_DELETED_AT_INDEX)
        .execute(pool)
        .await?;

    tracing::info!("contacts schema is ready");
    Ok(())
}
