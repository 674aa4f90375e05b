//! Catalog keyword extractor: finds every catalog skill (or one of its
//! synonyms) mentioned in the document. Deterministic, no network.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::extraction::text::{document_text, find_email, guess_candidate_name, SkillPattern};
use crate::extraction::{ExtractedProfile, ExtractionError, ResumeDocument, SkillExtractor};
use crate::matching::catalog::SkillCatalog;
use crate::matching::SkillNormalizer;
use crate::models::skill::{Skill, SkillSet};

/// Aliases shorter than this are too ambiguous to search for in prose
/// ("ts", "js", "py").
const MIN_ALIAS_LEN: usize = 3;

pub struct KeywordExtractor {
    /// Catalog skills (canonical name, catalog category and weight) with their
    /// compiled spellings, in catalog order.
    patterns: Vec<(Skill, SkillPattern)>,
}

impl KeywordExtractor {
    pub fn new(catalog: SkillCatalog, normalizer: Arc<SkillNormalizer>) -> Self {
        let mut patterns = Vec::with_capacity(catalog.skills().len());
        for entry in catalog.skills() {
            let Ok(canonical) = normalizer.normalize(&entry.name) else {
                continue;
            };
            let spellings = [canonical.as_str(), entry.name.as_str()].into_iter().chain(
                normalizer
                    .synonyms()
                    .spellings_of(&canonical)
                    .filter(|alias| alias.len() >= MIN_ALIAS_LEN),
            );
            match SkillPattern::new(spellings) {
                Ok(pattern) => patterns.push((
                    Skill::new(canonical.as_str(), entry.category.clone(), entry.weight),
                    pattern,
                )),
                Err(e) => warn!("Catalog skill '{}' left out of keyword search: {e}", entry.name),
            }
        }
        Self { patterns }
    }

    pub fn extract_from_text(
        &self,
        filename: &str,
        text: &str,
    ) -> Result<ExtractedProfile, ExtractionError> {
        let skills: SkillSet = self
            .patterns
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(skill, _)| skill.clone())
            .collect();

        if skills.is_empty() {
            return Err(ExtractionError::NoSkills(filename.to_string()));
        }

        debug!("Keyword extractor found {} skills in {filename}", skills.len());

        Ok(ExtractedProfile {
            name: guess_candidate_name(text, filename),
            email: find_email(text),
            skills,
        })
    }
}

#[async_trait]
impl SkillExtractor for KeywordExtractor {
    async fn extract(&self, document: &ResumeDocument) -> Result<ExtractedProfile, ExtractionError> {
        let text = document_text(document).await?;
        self.extract_from_text(&document.filename, &text)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}
