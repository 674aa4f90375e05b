use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::skill::SkillSet;

/// An uploaded résumé and the skills extracted from it.
/// `score` is only ever written by the matching engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub skills: SkillSet,
    pub score: Option<f64>,
}
