//! LLM-backed extractor. The model reads the document text and proposes skills;
//! everything it returns is canonicalized and range-checked before use.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::extraction::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM};
use crate::extraction::text::{document_text, find_email, guess_candidate_name};
use crate::extraction::{ExtractedProfile, ExtractionError, ResumeDocument, SkillExtractor};
use crate::llm_client::LlmClient;
use crate::matching::SkillNormalizer;
use crate::models::skill::{Skill, SkillSet, MAX_WEIGHT, MIN_WEIGHT};

/// Résumés beyond this many characters are truncated before prompting.
const MAX_PROMPT_CHARS: usize = 24_000;

#[derive(Debug, Deserialize)]
struct LlmProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    skills: Vec<LlmSkill>,
}

#[derive(Debug, Deserialize)]
struct LlmSkill {
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default = "default_weight")]
    weight: i32,
}

fn default_weight() -> i32 {
    3
}

pub struct LlmExtractor {
    llm: LlmClient,
    normalizer: Arc<SkillNormalizer>,
}

impl LlmExtractor {
    pub fn new(llm: LlmClient, normalizer: Arc<SkillNormalizer>) -> Self {
        Self { llm, normalizer }
    }

    fn into_profile(
        &self,
        filename: &str,
        text: &str,
        answer: LlmProfile,
    ) -> Result<ExtractedProfile, ExtractionError> {
        let mut seen = HashSet::new();
        let mut skills = SkillSet::new();
        for proposed in answer.skills {
            let Ok(canonical) = self.normalizer.normalize(&proposed.name) else {
                warn!("LLM proposed a blank skill name for {filename}; dropped");
                continue;
            };
            if !seen.insert(canonical.clone()) {
                continue;
            }
            let category = match proposed.category.trim() {
                "" => "Other".to_string(),
                c => c.to_string(),
            };
            skills.push(Skill::new(
                canonical.into_string(),
                category,
                proposed.weight.clamp(MIN_WEIGHT, MAX_WEIGHT),
            ));
        }

        if skills.is_empty() {
            return Err(ExtractionError::NoSkills(filename.to_string()));
        }

        let name = answer
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| guess_candidate_name(text, filename));
        let email = answer
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| e.contains('@'))
            .or_else(|| find_email(text));

        Ok(ExtractedProfile {
            name,
            email,
            skills,
        })
    }
}

#[async_trait]
impl SkillExtractor for LlmExtractor {
    async fn extract(&self, document: &ResumeDocument) -> Result<ExtractedProfile, ExtractionError> {
        let text = document_text(document).await?;
        let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", &excerpt);

        let answer: LlmProfile = self
            .llm
            .call_json(&prompt, EXTRACT_SYSTEM)
            .await
            .map_err(|e| ExtractionError::Llm(e.to_string()))?;

        self.into_profile(&document.filename, &text, answer)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}
