use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Idempotent schema setup, run once at startup.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id               TEXT PRIMARY KEY,
            title            TEXT NOT NULL,
            company          TEXT NOT NULL,
            location         TEXT NOT NULL,
            description      TEXT NOT NULL,
            salary_min       REAL,
            salary_max       REAL,
            contract_type    TEXT NOT NULL,
            category         TEXT NOT NULL,
            posted_date      TEXT NOT NULL,
            apply_link       TEXT,
            source           TEXT NOT NULL,
            link_status      TEXT NOT NULL,
            full_description TEXT,
            processed        INTEGER NOT NULL DEFAULT 0,
            collected_at     TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_processed ON jobs (processed)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id               TEXT PRIMARY KEY,
            name             TEXT NOT NULL,
            title            TEXT,
            company          TEXT,
            location         TEXT,
            source_url       TEXT,
            email            TEXT,
            email_pattern    TEXT,
            email_confidence INTEGER,
            email_attempts   INTEGER NOT NULL DEFAULT 0,
            last_emailed_at  TEXT,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_contacts_identity ON contacts (LOWER(name), LOWER(COALESCE(company, '')))",
    )
    .execute(pool)
    .await?;

    info!("Database migrations applied");
    Ok(())
}
