use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_with_timeout, ResumeDocument};
use crate::models::resume::Resume;
use crate::screening::analysis::best_match;
use crate::state::AppState;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt", "md"];

/// Rejects empty files, oversized files, and extensions outside the allow-list.
pub fn validate_upload(document: &ResumeDocument, max_bytes: usize) -> Result<(), AppError> {
    if document.filename.trim().is_empty() {
        return Err(AppError::Validation("Uploaded file has no name".to_string()));
    }
    let allowed = document
        .extension()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        return Err(AppError::Validation(format!(
            "'{}' is not an accepted format (allowed: .pdf, .docx, .doc, .txt, .md)",
            document.filename
        )));
    }
    if document.bytes.is_empty() {
        return Err(AppError::Validation(format!(
            "'{}' is empty",
            document.filename
        )));
    }
    if document.bytes.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "'{}' is {} bytes; the limit is {max_bytes}",
            document.filename,
            document.bytes.len()
        )));
    }
    Ok(())
}

/// Upload pipeline: validate, extract, canonicalize, apply category weights,
/// optionally score, archive the original, persist.
pub async fn ingest_resume(
    state: &AppState,
    document: ResumeDocument,
    job_id: Option<Uuid>,
) -> Result<Resume, AppError> {
    validate_upload(&document, state.config.max_upload_bytes())?;

    let profile = extract_with_timeout(
        state.extractor.as_ref(),
        &document,
        state.extraction_timeout(),
    )
    .await?;

    let settings = state.settings.read().await.clone();
    let mut skills = state.normalizer.canonicalize_set(&profile.skills)?;
    settings.apply_category_weights(&mut skills);

    let engine = state.engine().await?;
    let score = match job_id {
        Some(job_id) => {
            let job = state
                .store
                .get_job(job_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
            Some(engine.score(&skills, &job.required_skills)?)
        }
        None if settings.auto_analyze_on_upload => {
            let jobs = state.store.list_jobs().await?;
            best_match(&engine, &skills, &jobs).map(|(_, report)| report.score)
        }
        None => None,
    };

    let id = Uuid::new_v4();
    let archived = match &state.archive {
        Some(archive) => {
            let key = archive
                .store_original(id, &document.filename, document.bytes.clone())
                .await
                .map_err(|e| AppError::S3(e.to_string()))?;
            Some((archive, key))
        }
        None => None,
    };

    let resume = Resume {
        id,
        name: profile.name,
        email: profile.email,
        filename: document.filename,
        upload_date: Utc::now(),
        skills,
        score,
    };
    if let Err(e) = state.store.insert_resume(&resume).await {
        // The stored original would have no résumé pointing at it.
        if let Some((archive, key)) = archived {
            if let Err(cleanup) = archive.delete_original(&key).await {
                warn!("Could not remove orphaned upload {key}: {cleanup:#}");
            }
        }
        return Err(e.into());
    }

    info!(
        "Stored resume {} ({}) via {} extractor: {} skills, score {:?}",
        resume.id,
        resume.filename,
        state.extractor.backend(),
        resume.skills.len(),
        resume.score
    );

    Ok(resume)
}
