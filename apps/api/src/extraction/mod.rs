// Extraction collaborator: uploaded document → candidate profile and skill set.
// The matching engine never parses documents; everything document-shaped lives here.

pub mod keyword;
pub mod llm;
pub mod prompts;
pub mod text;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::skill::SkillSet;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not read document: {0}")]
    Unreadable(String),

    #[error("No recognizable skills found in '{0}'")]
    NoSkills(String),

    #[error("LLM extraction failed: {0}")]
    Llm(String),
}

/// An uploaded file as received.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl ResumeDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }
}

/// What an extractor found. Skills are already canonicalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub name: String,
    pub email: Option<String>,
    pub skills: SkillSet,
}

/// Pluggable extraction backend. Default: `KeywordExtractor`; `LlmExtractor`
/// when an API key is configured. Carried in `AppState` as `Arc<dyn SkillExtractor>`.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, document: &ResumeDocument) -> Result<ExtractedProfile, ExtractionError>;

    /// Short label for logs ("keyword" | "llm").
    fn backend(&self) -> &'static str;
}

/// Runs one extraction with a deadline. An elapsed deadline is an error, never a
/// partially populated profile.
pub async fn extract_with_timeout(
    extractor: &dyn SkillExtractor,
    document: &ResumeDocument,
    timeout: Duration,
) -> Result<ExtractedProfile, ExtractionError> {
    match tokio::time::timeout(timeout, extractor.extract(document)).await {
        Ok(result) => result,
        Err(_) => Err(ExtractionError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill::Skill;

    struct SlowExtractor;

    #[async_trait]
    impl SkillExtractor for SlowExtractor {
        async fn extract(&self, _: &ResumeDocument) -> Result<ExtractedProfile, ExtractionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ExtractedProfile {
                name: "Late".into(),
                email: None,
                skills: vec![Skill::new("rust", "Backend", 3)].into(),
            })
        }

        fn backend(&self) -> &'static str {
            "slow"
        }
    }

    struct BrokenExtractor;

    #[async_trait]
    impl SkillExtractor for BrokenExtractor {
        async fn extract(&self, doc: &ResumeDocument) -> Result<ExtractedProfile, ExtractionError> {
            Err(ExtractionError::Unreadable(doc.filename.clone()))
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_error() {
        let doc = ResumeDocument::new("cv.txt", "React");
        let err = extract_with_timeout(&SlowExtractor, &doc, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generous_timeout_lets_result_through() {
        let doc = ResumeDocument::new("cv.txt", "React");
        let profile = extract_with_timeout(&SlowExtractor, &doc, Duration::from_secs(120))
            .await
            .unwrap();
        assert_eq!(profile.name, "Late");
    }

    #[tokio::test]
    async fn test_failure_is_propagated() {
        let doc = ResumeDocument::new("cv.pdf", "garbage");
        let err = extract_with_timeout(&BrokenExtractor, &doc, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(f) if f == "cv.pdf"));
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(
            ResumeDocument::new("Jane_CV.PDF", "").extension().as_deref(),
            Some("pdf")
        );
        assert_eq!(ResumeDocument::new("README", "").extension(), None);
    }
}
