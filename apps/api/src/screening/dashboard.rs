use serde::Serialize;

use crate::models::resume::Resume;

const TOP_RESUMES: usize = 3;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_resumes: usize,
    pub analyzed_resumes: usize,
    pub total_jobs: usize,
    /// Mean over scored résumés only; 0 when none are scored.
    pub average_score: f64,
    pub top_resumes: Vec<Resume>,
}

pub fn summarize(resumes: &[Resume], total_jobs: usize) -> DashboardSummary {
    let scores: Vec<f64> = resumes.iter().filter_map(|r| r.score).collect();
    let average_score = if scores.is_empty() {
        0.0
    } else {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    // Unscored résumés sort after every scored one.
    let mut ordered: Vec<&Resume> = resumes.iter().collect();
    ordered.sort_by(|a, b| {
        let (a, b) = (a.score.unwrap_or(-1.0), b.score.unwrap_or(-1.0));
        b.total_cmp(&a)
    });

    DashboardSummary {
        total_resumes: resumes.len(),
        analyzed_resumes: scores.len(),
        total_jobs,
        average_score,
        top_resumes: ordered.into_iter().take(TOP_RESUMES).cloned().collect(),
    }
}
