//! Persistence of analyses, one row per application.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE application_analyses (
//!     id                   BIGSERIAL PRIMARY KEY,
//!     application_id       BIGINT NOT NULL UNIQUE,
//!     job_id               BIGINT,
//!     education_level      TEXT NOT NULL,
//!     years_experience     TEXT NOT NULL,
//!     skills_match         TEXT NOT NULL,
//!     key_skills           TEXT[] NOT NULL DEFAULT '{}',
//!     missing_requirements TEXT[] NOT NULL DEFAULT '{}',
//!     overall_score        INTEGER NOT NULL,
//!     fallback             BOOLEAN NOT NULL DEFAULT FALSE,
//!     skill_breakdown      JSONB,
//!     narrative            JSONB,
//!     created_at           TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use crate::models::analysis::{AnalysisRow, ResumeAnalysis};

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn get(&self, application_id: i64) -> Result<Option<ResumeAnalysis>, sqlx::Error>;

    /// Writes the analysis for `application_id`. With `force_update` the old
    /// row is deleted first; otherwise an existing row is overwritten.
    async fn put(
        &self,
        application_id: i64,
        job_id: Option<i64>,
        analysis: &ResumeAnalysis,
        force_update: bool,
    ) -> Result<(), sqlx::Error>;
}

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INSERT_SQL: &str = r#"
    INSERT INTO application_analyses
        (application_id, job_id, education_level, years_experience, skills_match,
         key_skills, missing_requirements, overall_score, fallback, skill_breakdown,
         narrative)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
"#;

const UPSERT_SUFFIX: &str = r#"
    ON CONFLICT (application_id) DO UPDATE SET
        job_id = EXCLUDED.job_id,
        education_level = EXCLUDED.education_level,
        years_experience = EXCLUDED.years_experience,
        skills_match = EXCLUDED.skills_match,
        key_skills = EXCLUDED.key_skills,
        missing_requirements = EXCLUDED.missing_requirements,
        overall_score = EXCLUDED.overall_score,
        fallback = EXCLUDED.fallback,
        skill_breakdown = EXCLUDED.skill_breakdown,
        narrative = EXCLUDED.narrative,
        created_at = now()
"#;

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn get(&self, application_id: i64) -> Result<Option<ResumeAnalysis>, sqlx::Error> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT application_id, job_id, education_level, years_experience, skills_match,
                   key_skills, missing_requirements, overall_score, fallback,
                   skill_breakdown, narrative, created_at
            FROM application_analyses
            WHERE application_id = $1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ResumeAnalysis::from))
    }

    // The delete and insert are separate statements; a concurrent forced
    // update for the same application can fail on the unique constraint.
    async fn put(
        &self,
        application_id: i64,
        job_id: Option<i64>,
        analysis: &ResumeAnalysis,
        force_update: bool,
    ) -> Result<(), sqlx::Error> {
        let sql = if force_update {
            let deleted = sqlx::query("DELETE FROM application_analyses WHERE application_id = $1")
                .bind(application_id)
                .execute(&self.pool)
                .await?;
            debug!(
                "Deleted {} existing analysis row(s) for application {application_id}",
                deleted.rows_affected()
            );
            INSERT_SQL.to_string()
        } else {
            format!("{INSERT_SQL}{UPSERT_SUFFIX}")
        };

        sqlx::query(&sql)
            .bind(application_id)
            .bind(job_id)
            .bind(&analysis.education_level)
            .bind(&analysis.years_experience)
            .bind(analysis.skills_match.as_str())
            .bind(&analysis.key_skills)
            .bind(&analysis.missing_requirements)
            .bind(i32::from(analysis.overall_score))
            .bind(analysis.fallback)
            .bind(analysis.skill_breakdown.as_ref().map(Json))
            .bind(analysis.analysis.as_ref().map(Json))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
