use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use jobscout_common::{ContactRecord, Person};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: String,
    name: String,
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    source_url: Option<String>,
    email: Option<String>,
    email_pattern: Option<String>,
    email_confidence: Option<i64>,
    email_attempts: i64,
    last_emailed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRow> for ContactRecord {
    fn from(row: ContactRow) -> Self {
        ContactRecord {
            id: row.id,
            name: row.name,
            title: row.title,
            company: row.company,
            location: row.location,
            source_url: row.source_url,
            email: row.email,
            email_pattern: row.email_pattern,
            email_confidence: row.email_confidence,
            email_attempts: row.email_attempts,
            last_emailed_at: row.last_emailed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, title, company, location, source_url, email, \
     email_pattern, email_confidence, email_attempts, last_emailed_at, created_at, updated_at";

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Persistent store of discovered people. Identity for dedup is the
/// case-insensitive (name, company) pair; records are never deleted.
#[derive(Clone)]
pub struct ContactRepo {
    pool: SqlitePool,
}

impl ContactRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert-or-update keyed by (name, company). On a match, title,
    /// location and source URL are overwritten (last write wins); email
    /// placeholder fields are left untouched.
    pub async fn upsert(&self, person: &Person, source_url: &str) -> Result<ContactRecord> {
        let company = person.company.clone().unwrap_or_default();
        let now = Utc::now();

        if let Some(existing) = self.find_by_identity(&person.name, &company).await? {
            sqlx::query(
                "UPDATE contacts SET title = ?1, location = ?2, source_url = ?3, updated_at = ?4 WHERE id = ?5",
            )
            .bind(&person.title)
            .bind(&person.location)
            .bind(source_url)
            .bind(now)
            .bind(&existing.id)
            .execute(&self.pool)
            .await?;

            return Ok(ContactRecord {
                title: Some(person.title.clone()),
                location: person.location.clone(),
                source_url: Some(source_url.to_string()),
                updated_at: now,
                ..existing
            });
        }

        let record = ContactRecord {
            id: Uuid::new_v4().to_string(),
            name: person.name.clone(),
            title: Some(person.title.clone()),
            company: person.company.clone(),
            location: person.location.clone(),
            source_url: Some(source_url.to_string()),
            email: None,
            email_pattern: None,
            email_confidence: None,
            email_attempts: 0,
            last_emailed_at: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO contacts
                (id, name, title, company, location, source_url, email, email_pattern,
                 email_confidence, email_attempts, last_emailed_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.title)
        .bind(&record.company)
        .bind(&record.location)
        .bind(&record.source_url)
        .bind(&record.email)
        .bind(&record.email_pattern)
        .bind(record.email_confidence)
        .bind(record.email_attempts)
        .bind(record.last_emailed_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Case-insensitive lookup by (name, company). A person with no company
    /// matches only records with no company.
    pub async fn find_by_identity(
        &self,
        name: &str,
        company: &str,
    ) -> Result<Option<ContactRecord>> {
        let row: Option<ContactRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM contacts \
             WHERE LOWER(name) = LOWER(?1) AND LOWER(COALESCE(company, '')) = LOWER(?2)"
        ))
        .bind(name)
        .bind(company)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ContactRecord::from))
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util;

    fn person(name: &str, title: &str, company: &str) -> Person {
        Person {
            name: name.to_string(),
            title: title.to_string(),
            company: Some(company.to_string()),
            location: Some("Bengaluru".to_string()),
        }
    }

    #[tokio::test]
    async fn second_discovery_overwrites_mutable_fields() {
        let repo = ContactRepo::new(test_util::pool().await);

        let first = repo
            .upsert(&person("Jane Doe", "Tech Lead", "Acme"), "https://a.example/1")
            .await
            .unwrap();
        let second = repo
            .upsert(
                &person("Jane Doe", "Engineering Manager", "Acme"),
                "https://a.example/2",
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.title.as_deref(), Some("Engineering Manager"));
        assert_eq!(second.source_url.as_deref(), Some("https://a.example/2"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn identity_match_is_case_insensitive() {
        let repo = ContactRepo::new(test_util::pool().await);

        repo.upsert(&person("Jane Doe", "Tech Lead", "Acme"), "https://a.example")
            .await
            .unwrap();
        repo.upsert(&person("JANE DOE", "Staff Engineer", "acme"), "https://b.example")
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        let stored = repo.find_by_identity("jane doe", "ACME").await.unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some("Staff Engineer"));
    }

    #[tokio::test]
    async fn different_company_is_a_new_record() {
        let repo = ContactRepo::new(test_util::pool().await);

        repo.upsert(&person("Jane Doe", "Tech Lead", "Acme"), "https://a.example")
            .await
            .unwrap();
        repo.upsert(&person("Jane Doe", "Tech Lead", "Globex"), "https://b.example")
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn new_records_have_email_placeholders() {
        let repo = ContactRepo::new(test_util::pool().await);

        let record = repo
            .upsert(&person("Raj Patel", "Recruiter", "Acme"), "https://a.example")
            .await
            .unwrap();

        assert_eq!(record.email, None);
        assert_eq!(record.email_pattern, None);
        assert_eq!(record.email_confidence, None);
        assert_eq!(record.email_attempts, 0);
        assert_eq!(record.last_emailed_at, None);
    }
}
