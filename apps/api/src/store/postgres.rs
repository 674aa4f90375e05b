use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::job::JobRequirement;
use crate::models::resume::Resume;
use crate::models::skill::SkillSet;
use crate::store::Store;

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    filename: String,
    upload_date: DateTime<Utc>,
    skills: Json<SkillSet>,
    score: Option<f64>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            name: row.name,
            email: row.email,
            filename: row.filename,
            upload_date: row.upload_date,
            skills: row.skills.0,
            score: row.score,
        }
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    id: Uuid,
    title: String,
    description: String,
    required_skills: Json<SkillSet>,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for JobRequirement {
    fn from(row: JobRow) -> Self {
        JobRequirement {
            id: row.id,
            title: row.title,
            description: row.description,
            required_skills: row.required_skills.0,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed store. Skill sets are stored as JSONB arrays.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_resumes(&self) -> Result<Vec<Resume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes ORDER BY upload_date ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resume::from))
    }

    async fn insert_resume(&self, resume: &Resume) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO resumes (id, name, email, filename, upload_date, skills, score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(resume.id)
        .bind(&resume.name)
        .bind(&resume.email)
        .bind(&resume.filename)
        .bind(resume.upload_date)
        .bind(Json(&resume.skills))
        .bind(resume.score)
        .execute(&self.pool)
        .await?;

        info!("Inserted résumé {} ({})", resume.id, resume.filename);
        Ok(())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_resume_score(&self, id: Uuid, score: f64) -> Result<bool> {
        let result = sqlx::query("UPDATE resumes SET score = $1 WHERE id = $2")
            .bind(score)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_jobs(&self) -> Result<Vec<JobRequirement>> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM job_requirements ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobRequirement::from).collect())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRequirement>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM job_requirements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobRequirement::from))
    }

    async fn insert_job(&self, job: &JobRequirement) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_requirements (id, title, description, required_skills, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(Json(&job.required_skills))
        .bind(job.created_at)
        .execute(&self.pool)
        .await?;

        info!("Inserted job requirement {} ({})", job.id, job.title);
        Ok(())
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_requirements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
