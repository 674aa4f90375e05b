use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::skill::SkillSet;

/// A job requirement profile. Append-only: created, read, deleted; never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: SkillSet,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJobRequirement {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub required_skills: SkillSet,
}
