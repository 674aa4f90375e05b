use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::{MatchReport, MatchingEngine};
use crate::models::job::JobRequirement;
use crate::models::resume::Resume;
use crate::models::skill::SkillSet;
use crate::store::Store;

// ────────────────────────────────────────────────────────────────────────────
// Per-résumé locks
// ────────────────────────────────────────────────────────────────────────────

/// One async mutex per résumé id. Concurrent analyses of the same résumé run
/// one after another; different résumés never wait on each other.
#[derive(Clone, Default)]
pub struct ResumeLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ResumeLocks {
    pub fn lock_for(&self, id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(id).or_default().clone()
    }

    pub fn forget(&self, id: Uuid) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyze
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalysisOutcome {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    #[serde(flatten)]
    pub report: MatchReport,
}

/// Scores a stored résumé against a job and persists the score.
pub async fn analyze_resume(
    store: &dyn Store,
    engine: &MatchingEngine,
    locks: &ResumeLocks,
    resume_id: Uuid,
    job_id: Uuid,
) -> Result<AnalysisOutcome, AppError> {
    let not_found = || AppError::NotFound(format!("Resume {resume_id} not found"));

    // Unknown ids are rejected before a lock entry is created for them.
    if store.get_resume(resume_id).await?.is_none() {
        return Err(not_found());
    }
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let lock = locks.lock_for(resume_id);
    let _guard = lock.lock().await;

    // Re-read under the lock; a concurrent delete may have won.
    let Some(resume) = store.get_resume(resume_id).await? else {
        locks.forget(resume_id);
        return Err(not_found());
    };

    let report = engine.evaluate(&resume.skills, &job.required_skills)?;

    // Deleted while we were scoring.
    if !store.set_resume_score(resume_id, report.score).await? {
        locks.forget(resume_id);
        return Err(not_found());
    }

    info!(
        "Analyzed resume {resume_id} against job {job_id} ({}): score {}",
        job.title, report.score
    );

    Ok(AnalysisOutcome {
        resume_id,
        job_id,
        report,
    })
}

/// Best score across `jobs`. Jobs the skill set cannot be scored against are skipped.
pub fn best_match(
    engine: &MatchingEngine,
    skills: &SkillSet,
    jobs: &[JobRequirement],
) -> Option<(Uuid, MatchReport)> {
    let mut best: Option<(Uuid, MatchReport)> = None;
    for job in jobs {
        let report = match engine.evaluate(skills, &job.required_skills) {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping job {} during auto-analysis: {e}", job.id);
                continue;
            }
        };
        if best.as_ref().map_or(true, |(_, b)| report.score > b.score) {
            best = Some((job.id, report));
        }
    }
    best
}

// ────────────────────────────────────────────────────────────────────────────
// Rankings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RankedResume {
    pub rank: usize,
    pub resume_id: Uuid,
    pub name: String,
    pub filename: String,
    pub score: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub recommendation: String,
}

/// Every résumé scored against one job, best first. Ties keep upload order.
/// Nothing is persisted.
pub fn rank_resumes(
    engine: &MatchingEngine,
    resumes: &[Resume],
    job: &JobRequirement,
) -> Vec<RankedResume> {
    let mut scored: Vec<(&Resume, MatchReport)> = resumes
        .iter()
        .filter_map(|resume| match engine.evaluate(&resume.skills, &job.required_skills) {
            Ok(report) => Some((resume, report)),
            Err(e) => {
                warn!("Resume {} left out of rankings for job {}: {e}", resume.id, job.id);
                None
            }
        })
        .collect();

    scored.sort_by(|(ra, a), (rb, b)| {
        b.score
            .total_cmp(&a.score)
            .then(ra.upload_date.cmp(&rb.upload_date))
            .then(ra.id.cmp(&rb.id))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (resume, report))| RankedResume {
            rank: i + 1,
            resume_id: resume.id,
            name: resume.name.clone(),
            filename: resume.filename.clone(),
            score: report.score,
            matched: report.matched.into_iter().map(|h| h.skill).collect(),
            missing: report.missing.into_iter().map(|g| g.skill).collect(),
            recommendation: report.recommendation,
        })
        .collect()
}
