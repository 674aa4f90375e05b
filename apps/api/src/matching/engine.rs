//! Matching Engine — weighted skill coverage with category-overlap credit.
//!
//! Algorithm:
//! 1. Normalize every skill name on both sides.
//! 2. A required skill is matched when the candidate has the same canonical name.
//!    matched = Σ weight of matched required skills, total = Σ weight of all.
//! 3. base = 100 × matched / total (0 when total is 0)
//! 4. Every candidate skill that is not required but shares a category with a
//!    required skill earns `per_skill` bonus points, up to `cap`. Bonus is only
//!    granted once at least one required skill matched.
//! 5. score = min(100, round(base + bonus))
//!
//! The same pair of skill sets always yields the same score.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::matching::normalizer::{
    default_normalizer, fold_whitespace_and_case, CanonicalName, SkillNormalizer,
};
use crate::matching::weights::WeightModel;
use crate::matching::MatchError;
use crate::models::skill::SkillSet;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Category-overlap credit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusPolicy {
    pub per_skill: f64,
    pub cap: f64,
}

impl Default for BonusPolicy {
    fn default() -> Self {
        Self {
            per_skill: 1.0,
            cap: 10.0,
        }
    }
}

impl BonusPolicy {
    pub fn validate(&self) -> Result<(), MatchError> {
        for (label, value) in [("per_skill", self.per_skill), ("cap", self.cap)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidInput(format!(
                    "bonus {label} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillHit {
    pub skill: String,
    pub weight: u32,
}

/// A required skill the candidate does not have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub weight: u32,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: f64, // 0 – 100, integral
    pub base_score: f64,
    pub bonus: f64,
    pub matched_weight: u32,
    pub total_weight: u32,
    pub matched: Vec<SkillHit>,
    pub missing: Vec<SkillGap>,
    pub bonus_skills: Vec<String>,
    pub recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MatchingEngine {
    normalizer: Arc<SkillNormalizer>,
    bonus: BonusPolicy,
}

struct CandidateSkill {
    name: CanonicalName,
    category: String,
}

impl MatchingEngine {
    pub fn new(normalizer: Arc<SkillNormalizer>, bonus: BonusPolicy) -> Result<Self, MatchError> {
        bonus.validate()?;
        Ok(Self { normalizer, bonus })
    }

    /// Built-in synonyms, default bonus policy.
    pub fn with_defaults() -> Self {
        Self {
            normalizer: default_normalizer(),
            bonus: BonusPolicy::default(),
        }
    }

    pub fn bonus_policy(&self) -> BonusPolicy {
        self.bonus
    }

    /// Match score in [0, 100].
    pub fn score(&self, resume_skills: &SkillSet, job_skills: &SkillSet) -> Result<f64, MatchError> {
        Ok(self.evaluate(resume_skills, job_skills)?.score)
    }

    /// Full report behind `score`.
    pub fn evaluate(
        &self,
        resume_skills: &SkillSet,
        job_skills: &SkillSet,
    ) -> Result<MatchReport, MatchError> {
        let candidate = self.candidate_skills(resume_skills)?;
        let model = WeightModel::build(job_skills, &self.normalizer)?;

        if model.total_weight() == 0 {
            return Ok(MatchReport {
                score: 0.0,
                base_score: 0.0,
                bonus: 0.0,
                matched_weight: 0,
                total_weight: 0,
                matched: vec![],
                missing: vec![],
                bonus_skills: vec![],
                recommendation: "The job lists no required skills, nothing to match against."
                    .to_string(),
            });
        }

        let candidate_names: HashSet<&CanonicalName> = candidate.iter().map(|c| &c.name).collect();

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut matched_weight = 0_u32;

        for required in model.iter() {
            if candidate_names.contains(&required.name) {
                matched_weight += required.weight;
                matched.push(SkillHit {
                    skill: required.name.to_string(),
                    weight: required.weight,
                });
            } else {
                missing.push(SkillGap {
                    skill: required.name.to_string(),
                    weight: required.weight,
                    category: required.category.clone(),
                });
            }
        }

        let total_weight = model.total_weight();
        let base_score = 100.0 * f64::from(matched_weight) / f64::from(total_weight);

        let bonus_skills: Vec<String> = if matched_weight > 0 {
            let categories = model.categories();
            candidate
                .iter()
                .filter(|c| !model.contains(&c.name) && categories.contains(c.category.as_str()))
                .map(|c| c.name.to_string())
                .collect()
        } else {
            vec![]
        };
        let bonus = (bonus_skills.len() as f64 * self.bonus.per_skill).min(self.bonus.cap);

        let score = (base_score + bonus).round().clamp(0.0, 100.0);
        let recommendation = build_recommendation(score, &missing);

        Ok(MatchReport {
            score,
            base_score,
            bonus,
            matched_weight,
            total_weight,
            matched,
            missing,
            bonus_skills,
            recommendation,
        })
    }

    fn candidate_skills(&self, skills: &SkillSet) -> Result<Vec<CandidateSkill>, MatchError> {
        if skills.is_empty() {
            return Err(MatchError::InvalidInput(
                "candidate skill set is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(skills.len());
        for skill in skills {
            let name = self.normalizer.normalize(&skill.name).map_err(|_| {
                MatchError::InvalidInput(format!(
                    "candidate skill name {:?} is empty after normalization",
                    skill.name
                ))
            })?;
            if !skill.has_valid_weight() {
                return Err(MatchError::InvalidInput(format!(
                    "candidate skill '{}' has weight {} outside 1-5",
                    skill.name, skill.weight
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(MatchError::InvalidInput(format!(
                    "candidate skill '{name}' listed more than once"
                )));
            }
            out.push(CandidateSkill {
                name,
                category: fold_whitespace_and_case(&skill.category),
            });
        }
        Ok(out)
    }
}

/// Human-readable summary; lists the three heaviest missing skills.
fn build_recommendation(score: f64, missing: &[SkillGap]) -> String {
    let mut by_weight: Vec<&SkillGap> = missing.iter().collect();
    by_weight.sort_by(|a, b| b.weight.cmp(&a.weight));
    let top_gaps: Vec<&str> = by_weight.iter().take(3).map(|g| g.skill.as_str()).collect();

    if score >= 80.0 {
        "Strong match. The candidate covers the key required skills.".to_string()
    } else if score >= 60.0 {
        format!(
            "Moderate match ({score}/100). Missing: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Weak match ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
