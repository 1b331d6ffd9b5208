use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Cv;
use crate::auth::repo::unique_violation;
use crate::error::StoreError;

/// Persistence for CVs. `owner == None` means no ownership filter.
#[async_trait]
pub trait CvStore: Send + Sync {
    /// Newest first.
    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<Cv>, StoreError>;
    async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Cv>, StoreError>;
    async fn find_by_share_id(&self, share_id: &str) -> Result<Option<Cv>, StoreError>;
    /// A taken share id yields `StoreError::Duplicate("shareId")`.
    async fn insert(&self, cv: &Cv) -> Result<(), StoreError>;
    /// Replace the stored record with the same id; `None` if it no longer exists.
    async fn update(&self, cv: &Cv) -> Result<Option<Cv>, StoreError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, StoreError>;
}

const CV_COLUMNS: &str = "id, user_id, title, full_name, email, phone, summary, experience, \
                          education, skills, template, share_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgCvStore {
    db: PgPool,
}

impl PgCvStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CvStore for PgCvStore {
    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<Cv>, StoreError> {
        let rows = sqlx::query_as::<_, Cv>(&format!(
            r#"
            SELECT {CV_COLUMNS}
            FROM cvs
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Cv>, StoreError> {
        let row = sqlx::query_as::<_, Cv>(&format!(
            r#"
            SELECT {CV_COLUMNS}
            FROM cvs
            WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_share_id(&self, share_id: &str) -> Result<Option<Cv>, StoreError> {
        let row = sqlx::query_as::<_, Cv>(&format!(
            r#"
            SELECT {CV_COLUMNS}
            FROM cvs
            WHERE share_id = $1
            "#
        ))
        .bind(share_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, cv: &Cv) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO cvs (id, user_id, title, full_name, email, phone, summary, experience,
                             education, skills, template, share_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(cv.id)
        .bind(cv.user_id)
        .bind(&cv.title)
        .bind(&cv.full_name)
        .bind(&cv.email)
        .bind(&cv.phone)
        .bind(&cv.summary)
        .bind(&cv.experience)
        .bind(&cv.education)
        .bind(&cv.skills)
        .bind(&cv.template)
        .bind(&cv.share_id)
        .bind(cv.created_at)
        .bind(cv.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| unique_violation(e, "shareId"))?;
        Ok(())
    }

    async fn update(&self, cv: &Cv) -> Result<Option<Cv>, StoreError> {
        let row = sqlx::query_as::<_, Cv>(&format!(
            r#"
            UPDATE cvs
               SET title = $2, full_name = $3, email = $4, phone = $5, summary = $6,
                   experience = $7, education = $8, skills = $9, template = $10,
                   updated_at = $11
             WHERE id = $1
            RETURNING {CV_COLUMNS}
            "#
        ))
        .bind(cv.id)
        .bind(&cv.title)
        .bind(&cv.full_name)
        .bind(&cv.email)
        .bind(&cv.phone)
        .bind(&cv.summary)
        .bind(&cv.experience)
        .bind(&cv.education)
        .bind(&cv.skills)
        .bind(&cv.template)
        .bind(cv.updated_at)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            DELETE FROM cvs
            WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
