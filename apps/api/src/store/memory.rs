use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::job::JobRequirement;
use crate::models::resume::Resume;
use crate::models::skill::{Skill, SkillSet};
use crate::store::Store;

/// Process-local store. Vectors keep insertion order for listing.
#[derive(Default)]
pub struct MemoryStore {
    resumes: RwLock<Vec<Resume>>,
    jobs: RwLock<Vec<JobRequirement>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo data: four unscored résumés and two job requirements.
    pub fn with_demo_data() -> Self {
        Self {
            resumes: RwLock::new(demo_resumes()),
            jobs: RwLock::new(demo_jobs()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_resumes(&self) -> Result<Vec<Resume>> {
        Ok(self.resumes.read().await.clone())
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        Ok(self.resumes.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_resume(&self, resume: &Resume) -> Result<()> {
        let mut resumes = self.resumes.write().await;
        if resumes.iter().any(|r| r.id == resume.id) {
            anyhow::bail!("Résumé {} already exists", resume.id);
        }
        resumes.push(resume.clone());
        Ok(())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool> {
        let mut resumes = self.resumes.write().await;
        let before = resumes.len();
        resumes.retain(|r| r.id != id);
        Ok(resumes.len() != before)
    }

    async fn set_resume_score(&self, id: Uuid, score: f64) -> Result<bool> {
        let mut resumes = self.resumes.write().await;
        match resumes.iter_mut().find(|r| r.id == id) {
            Some(resume) => {
                resume.score = Some(score);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_jobs(&self) -> Result<Vec<JobRequirement>> {
        Ok(self.jobs.read().await.clone())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRequirement>> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn insert_job(&self, job: &JobRequirement) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.iter().any(|j| j.id == job.id) {
            anyhow::bail!("Job requirement {} already exists", job.id);
        }
        jobs.push(job.clone());
        Ok(())
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        Ok(jobs.len() != before)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

fn skills(entries: &[(&str, &str, i32)]) -> SkillSet {
    entries
        .iter()
        .map(|(name, category, weight)| Skill::new(*name, *category, *weight))
        .collect()
}

fn demo_resumes() -> Vec<Resume> {
    let people: [(&str, &str, (i32, u32, u32), &[(&str, &str, i32)]); 4] = [
        (
            "John Doe",
            "john.doe@example.com",
            (2023, 6, 15),
            &[
                ("react", "Frontend", 5),
                ("typescript", "Frontend", 4),
                ("node.js", "Backend", 4),
                ("mongodb", "Database", 3),
            ],
        ),
        (
            "Jane Smith",
            "jane.smith@example.com",
            (2023, 7, 2),
            &[
                ("python", "Backend", 5),
                ("postgresql", "Database", 4),
                ("aws", "Cloud", 4),
                ("docker", "DevOps", 3),
            ],
        ),
        (
            "Alex Johnson",
            "alex.johnson@example.com",
            (2023, 7, 10),
            &[
                ("react", "Frontend", 5),
                ("redux", "Frontend", 3),
                ("javascript", "Frontend", 5),
                ("git", "Tools", 3),
            ],
        ),
        (
            "Sarah Williams",
            "sarah.williams@example.com",
            (2023, 8, 5),
            &[
                ("python", "Backend", 5),
                ("django", "Backend", 4),
                ("postgresql", "Database", 4),
                ("aws", "Cloud", 4),
            ],
        ),
    ];

    people
        .into_iter()
        .map(|(name, email, (y, m, d), entries)| Resume {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: Some(email.to_string()),
            filename: format!("{}_resume.pdf", name.to_lowercase().replace(' ', "_")),
            upload_date: Utc
                .with_ymd_and_hms(y, m, d, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            skills: skills(entries),
            score: None,
        })
        .collect()
}

fn demo_jobs() -> Vec<JobRequirement> {
    vec![
        JobRequirement {
            id: Uuid::new_v4(),
            title: "Frontend Developer".to_string(),
            description: "We are looking for a skilled Frontend Developer with experience in React and TypeScript.".to_string(),
            required_skills: skills(&[
                ("react", "Frontend", 5),
                ("typescript", "Frontend", 4),
                ("redux", "Frontend", 3),
                ("jest", "Testing", 3),
            ]),
            created_at: Utc
                .with_ymd_and_hms(2023, 6, 10, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        },
        JobRequirement {
            id: Uuid::new_v4(),
            title: "Backend Developer".to_string(),
            description: "Looking for a Backend Developer proficient in Python and database management.".to_string(),
            required_skills: skills(&[
                ("python", "Backend", 5),
                ("postgresql", "Database", 4),
                ("rest api", "Backend", 4),
                ("docker", "DevOps", 3),
            ]),
            created_at: Utc
                .with_ymd_and_hms(2023, 7, 1, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        },
    ]
}
