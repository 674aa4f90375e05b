// Persistence collaborator: CRUD for résumés and job requirements.
// Handlers only ever see `Arc<dyn Store>`; the backend is picked at startup.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::JobRequirement;
use crate::models::resume::Resume;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Oldest upload first.
    async fn list_resumes(&self) -> Result<Vec<Resume>>;
    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>>;
    async fn insert_resume(&self, resume: &Resume) -> Result<()>;
    /// `false` when no such résumé existed.
    async fn delete_resume(&self, id: Uuid) -> Result<bool>;
    /// Overwrites the score. `false` when no such résumé exists.
    async fn set_resume_score(&self, id: Uuid, score: f64) -> Result<bool>;

    /// Oldest first.
    async fn list_jobs(&self) -> Result<Vec<JobRequirement>>;
    async fn get_job(&self, id: Uuid) -> Result<Option<JobRequirement>>;
    async fn insert_job(&self, job: &JobRequirement) -> Result<()>;
    async fn delete_job(&self, id: Uuid) -> Result<bool>;

    /// Short label for logs ("memory" | "postgres").
    fn backend(&self) -> &'static str;
}
