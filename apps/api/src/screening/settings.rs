use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::matching::normalizer::fold_whitespace_and_case;
use crate::matching::{BonusPolicy, MatchError};
use crate::models::skill::{SkillSet, MAX_WEIGHT, MIN_WEIGHT};

/// Runtime-adjustable admin settings. Held in process memory; seeded from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Score new uploads against every job and keep the best score.
    pub auto_analyze_on_upload: bool,
    pub bonus_per_skill: f64,
    pub bonus_cap: f64,
    /// Category → weight applied to extracted skills of that category.
    #[serde(default)]
    pub category_weights: BTreeMap<String, i32>,
}

impl AdminSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auto_analyze_on_upload: false,
            bonus_per_skill: config.bonus_per_skill,
            bonus_cap: config.bonus_cap,
            category_weights: BTreeMap::new(),
        }
    }

    pub fn bonus_policy(&self) -> BonusPolicy {
        BonusPolicy {
            per_skill: self.bonus_per_skill,
            cap: self.bonus_cap,
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        self.bonus_policy().validate()?;
        for (category, weight) in &self.category_weights {
            if category.trim().is_empty() {
                return Err(MatchError::InvalidInput(
                    "category weight with a blank category".to_string(),
                ));
            }
            if !(MIN_WEIGHT..=MAX_WEIGHT).contains(weight) {
                return Err(MatchError::InvalidInput(format!(
                    "category '{category}' has weight {weight} outside 1-5"
                )));
            }
        }
        Ok(())
    }

    /// Overrides the weight of every skill whose category has a configured weight.
    pub fn apply_category_weights(&self, skills: &mut SkillSet) {
        if self.category_weights.is_empty() {
            return;
        }
        let folded: Vec<(String, i32)> = self
            .category_weights
            .iter()
            .map(|(c, w)| (fold_whitespace_and_case(c), *w))
            .collect();
        for skill in skills.iter_mut() {
            let category = fold_whitespace_and_case(&skill.category);
            if let Some((_, weight)) = folded.iter().find(|(c, _)| *c == category) {
                skill.weight = *weight;
            }
        }
    }
}
