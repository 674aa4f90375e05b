use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::ResumeDocument;
use crate::matching::MatchReport;
use crate::models::job::{JobRequirement, NewJobRequirement};
use crate::models::resume::Resume;
use crate::models::skill::{Skill, SkillSet};
use crate::screening::analysis::{analyze_resume, rank_resumes, AnalysisOutcome, RankedResume};
use crate::screening::dashboard::{summarize, DashboardSummary};
use crate::screening::settings::AdminSettings;
use crate::screening::upload::ingest_resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Résumés
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.store.list_resumes().await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let resume = state
        .store
        .get_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes (multipart: `file`, optional `job_id`)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_id = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("The file part has no filename".into()))?;
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, bytes));
            }
            "job_id" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    let id = Uuid::parse_str(raw)
                        .map_err(|e| AppError::Validation(format!("Invalid job_id: {e}")))?;
                    job_id = Some(id);
                }
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".into()))?;
    let resume = ingest_resume(&state, ResumeDocument::new(filename, bytes), job_id).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_resume(id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    state.locks.forget(id);
    info!("Deleted resume {id}");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub job_id: Uuid,
}

/// POST /api/v1/resumes/:id/analyze
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let engine = state.engine().await?;
    let outcome =
        analyze_resume(state.store.as_ref(), &engine, &state.locks, id, req.job_id).await?;
    Ok(Json(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRequirement>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRequirement>, AppError> {
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<NewJobRequirement>,
) -> Result<(StatusCode, Json<JobRequirement>), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Job title must not be blank".into()));
    }
    let required_skills = state.normalizer.canonicalize_set(&req.required_skills)?;

    let job = JobRequirement {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: req.description.trim().to_string(),
        required_skills,
        created_at: Utc::now(),
    };
    state.store.insert_job(&job).await?;
    info!("Created job {} ({})", job.id, job.title);
    Ok((StatusCode::CREATED, Json(job)))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_job(id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/:id/rankings
pub async fn handle_job_rankings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RankedResume>>, AppError> {
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    let resumes = state.store.list_resumes().await?;
    let engine = state.engine().await?;
    Ok(Json(rank_resumes(&engine, &resumes, &job)))
}

// ────────────────────────────────────────────────────────────────────────────
// Matching and skills
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MatchRequest {
    pub resume_skills: SkillSet,
    pub job_skills: SkillSet,
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    let engine = state.engine().await?;
    Ok(Json(engine.evaluate(&req.resume_skills, &req.job_skills)?))
}

#[derive(Deserialize)]
pub struct NormalizeRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct NormalizeResponse {
    pub input: String,
    pub canonical: String,
}

/// POST /api/v1/skills/normalize
pub async fn handle_normalize_skill(
    State(state): State<AppState>,
    Json(req): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let canonical = state.normalizer.normalize(&req.name)?;
    Ok(Json(NormalizeResponse {
        input: req.name,
        canonical: canonical.into_string(),
    }))
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> Json<Vec<Skill>> {
    match params.category {
        Some(category) => Json(state.catalog.by_category(&category)),
        None => Json(state.catalog.skills().to_vec()),
    }
}

/// GET /api/v1/skills/categories
pub async fn handle_list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard and admin
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let resumes = state.store.list_resumes().await?;
    let total_jobs = state.store.list_jobs().await?.len();
    Ok(Json(summarize(&resumes, total_jobs)))
}

/// GET /api/v1/admin/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<AdminSettings> {
    Json(state.settings.read().await.clone())
}

/// PUT /api/v1/admin/settings
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Json(settings): Json<AdminSettings>,
) -> Result<Json<AdminSettings>, AppError> {
    settings.validate()?;
    *state.settings.write().await = settings.clone();
    info!(
        "Admin settings updated: auto_analyze={}, bonus={}/{}",
        settings.auto_analyze_on_upload, settings.bonus_per_skill, settings.bonus_cap
    );
    Ok(Json(settings))
}
