use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use jobscout_common::{JobPosting, LinkStatus};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct JobRow {
    id: String,
    title: String,
    company: String,
    location: String,
    description: String,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    contract_type: String,
    category: String,
    posted_date: String,
    apply_link: Option<String>,
    source: String,
    link_status: String,
    full_description: Option<String>,
    processed: bool,
    collected_at: DateTime<Utc>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        JobPosting {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            description: row.description,
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            contract_type: row.contract_type,
            category: row.category,
            posted_date: row.posted_date,
            apply_link: row.apply_link,
            source: row.source,
            link_status: LinkStatus::parse(&row.link_status),
            full_description: row.full_description,
            processed: row.processed,
            collected_at: row.collected_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, title, company, location, description, salary_min, salary_max, \
     contract_type, category, posted_date, apply_link, source, link_status, \
     full_description, processed, collected_at";

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Persistent store of postings keyed by provider id. The sole mutation path
/// for `JobPosting` rows.
#[derive(Clone)]
pub struct JobRepo {
    pool: SqlitePool,
}

impl JobRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a posting unless its id already exists. Returns true when the
    /// row was inserted, false when the id collided. A collision never
    /// aborts the caller's batch.
    pub async fn insert_if_absent(&self, posting: &JobPosting) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO jobs
                (id, title, company, location, description, salary_min, salary_max,
                 contract_type, category, posted_date, apply_link, source, link_status,
                 full_description, processed, collected_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&posting.id)
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.location)
        .bind(&posting.description)
        .bind(posting.salary_min)
        .bind(posting.salary_max)
        .bind(&posting.contract_type)
        .bind(&posting.category)
        .bind(&posting.posted_date)
        .bind(&posting.apply_link)
        .bind(&posting.source)
        .bind(posting.link_status.as_str())
        .bind(&posting.full_description)
        .bind(posting.processed)
        .bind(posting.collected_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// All known posting ids, read in one bulk query.
    pub async fn list_ids(&self) -> Result<HashSet<String>> {
        let ids: Vec<(String,)> = sqlx::query_as("SELECT id FROM jobs")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Unprocessed postings in collection order, up to `limit`.
    pub async fn list_unprocessed(&self, limit: u32) -> Result<Vec<JobPosting>> {
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM jobs WHERE processed = 0 ORDER BY collected_at, id LIMIT ?1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    /// Commit the mutable fields of a posting: full description and the
    /// processed flag.
    pub async fn update(&self, posting: &JobPosting) -> Result<()> {
        sqlx::query("UPDATE jobs SET full_description = ?1, processed = ?2 WHERE id = ?3")
            .bind(&posting.full_description)
            .bind(posting.processed)
            .bind(&posting.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<JobPosting>> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM jobs WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(JobPosting::from))
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util;
    use jobscout_common::NOT_AVAILABLE;

    fn posting(id: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: "Backend Developer".to_string(),
            company: "Acme".to_string(),
            location: "Bengaluru".to_string(),
            description: "Build APIs".to_string(),
            salary_min: Some(50_000.0),
            salary_max: None,
            contract_type: NOT_AVAILABLE.to_string(),
            category: "IT Jobs".to_string(),
            posted_date: "2026-08-20T00:00:00Z".to_string(),
            apply_link: Some(format!("https://example.com/jobs/{id}")),
            source: "Adzuna".to_string(),
            link_status: LinkStatus::Found,
            full_description: None,
            processed: false,
            collected_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_then_duplicate_is_skipped() {
        let repo = JobRepo::new(test_util::pool().await);

        assert!(repo.insert_if_absent(&posting("j1")).await.unwrap());
        assert!(!repo.insert_if_absent(&posting("j1")).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_ids_returns_all_keys() {
        let repo = JobRepo::new(test_util::pool().await);
        repo.insert_if_absent(&posting("a")).await.unwrap();
        repo.insert_if_absent(&posting("b")).await.unwrap();

        let ids = repo.list_ids().await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
    }

    #[tokio::test]
    async fn update_marks_processed_and_stores_description() {
        let repo = JobRepo::new(test_util::pool().await);
        let mut p = posting("j2");
        repo.insert_if_absent(&p).await.unwrap();

        assert_eq!(repo.list_unprocessed(10).await.unwrap().len(), 1);

        p.full_description = Some("Full JD text".to_string());
        p.processed = true;
        repo.update(&p).await.unwrap();

        assert!(repo.list_unprocessed(10).await.unwrap().is_empty());
        let stored = repo.get("j2").await.unwrap().unwrap();
        assert!(stored.processed);
        assert_eq!(stored.full_description.as_deref(), Some("Full JD text"));
    }

    #[tokio::test]
    async fn round_trips_optional_and_enum_fields() {
        let repo = JobRepo::new(test_util::pool().await);
        let mut p = posting("j3");
        p.apply_link = None;
        p.link_status = LinkStatus::NotFound;
        repo.insert_if_absent(&p).await.unwrap();

        let stored = repo.get("j3").await.unwrap().unwrap();
        assert_eq!(stored.apply_link, None);
        assert_eq!(stored.link_status, LinkStatus::NotFound);
        assert_eq!(stored.salary_min, Some(50_000.0));
        assert_eq!(stored.salary_max, None);
    }
}
