//! Weight Model — canonical name → weight lookup for one job requirement.

use std::collections::{HashMap, HashSet};

use crate::matching::normalizer::{fold_whitespace_and_case, CanonicalName, SkillNormalizer};
use crate::matching::MatchError;
use crate::models::skill::SkillSet;

#[derive(Debug, Clone, PartialEq)]
pub struct RequiredSkill {
    pub name: CanonicalName,
    pub weight: u32,
    /// Case/whitespace-folded category.
    pub category: String,
}

/// Built from a job's required skills on every scoring call; never mutated.
#[derive(Debug, Clone, Default)]
pub struct WeightModel {
    required: Vec<RequiredSkill>,
    index: HashMap<CanonicalName, usize>,
    total: u32,
}

impl WeightModel {
    /// Fails with `InvalidInput` on an out-of-range weight, an empty name, or
    /// two entries sharing a canonical name.
    pub fn build(skills: &SkillSet, normalizer: &SkillNormalizer) -> Result<Self, MatchError> {
        let mut model = Self::default();
        for skill in skills {
            let name = normalizer.normalize(&skill.name).map_err(|_| {
                MatchError::InvalidInput(format!(
                    "required skill name {:?} is empty after normalization",
                    skill.name
                ))
            })?;
            if !skill.has_valid_weight() {
                return Err(MatchError::InvalidInput(format!(
                    "required skill '{}' has weight {} outside 1-5",
                    skill.name, skill.weight
                )));
            }
            if model.index.contains_key(&name) {
                return Err(MatchError::InvalidInput(format!(
                    "required skill '{name}' listed more than once"
                )));
            }
            let weight = skill.weight as u32;
            model.total += weight;
            model.index.insert(name.clone(), model.required.len());
            model.required.push(RequiredSkill {
                name,
                weight,
                category: fold_whitespace_and_case(&skill.category),
            });
        }
        Ok(model)
    }

    /// `None` means the skill is not required (zero contribution).
    pub fn weight_of(&self, name: &CanonicalName) -> Option<u32> {
        self.index.get(name).map(|&i| self.required[i].weight)
    }

    pub fn contains(&self, name: &CanonicalName) -> bool {
        self.index.contains_key(name)
    }

    pub fn total_weight(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    pub fn categories(&self) -> HashSet<&str> {
        self.required.iter().map(|r| r.category.as_str()).collect()
    }

    /// Required skills in the job's original order.
    pub fn iter(&self) -> impl Iterator<Item = &RequiredSkill> {
        self.required.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill::Skill;

    fn frontend_job() -> SkillSet {
        vec![
            Skill::new("React", "Frontend", 5),
            Skill::new("TypeScript", "Frontend", 4),
            Skill::new("Redux", "Frontend", 3),
            Skill::new("Jest", "Testing", 3),
        ]
        .into()
    }

    #[test]
    fn test_weight_lookup_by_canonical_name() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let model = WeightModel::build(&frontend_job(), &n).unwrap();
        assert_eq!(model.weight_of(&n.normalize("ReactJS").unwrap()), Some(5));
        assert_eq!(model.weight_of(&n.normalize("ts").unwrap()), Some(4));
        assert_eq!(model.weight_of(&n.normalize("Python").unwrap()), None);
    }

    #[test]
    fn test_total_weight() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let model = WeightModel::build(&frontend_job(), &n).unwrap();
        assert_eq!(model.total_weight(), 15);
    }

    #[test]
    fn test_categories_are_folded() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let model = WeightModel::build(&frontend_job(), &n).unwrap();
        let cats = model.categories();
        assert!(cats.contains("frontend"));
        assert!(cats.contains("testing"));
        assert_eq!(cats.len(), 2);
    }

    #[test]
    fn test_empty_set_builds_empty_model() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let model = WeightModel::build(&SkillSet::new(), &n).unwrap();
        assert!(model.is_empty());
        assert_eq!(model.total_weight(), 0);
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let set: SkillSet = vec![Skill::new("React", "Frontend", 6)].into();
        assert!(matches!(
            WeightModel::build(&set, &n),
            Err(MatchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_blank_name_as_invalid_input() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let set: SkillSet = vec![Skill::new("   ", "Frontend", 3)].into();
        assert!(matches!(
            WeightModel::build(&set, &n),
            Err(MatchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_synonym_duplicates() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let set: SkillSet = vec![
            Skill::new("Postgres", "Database", 4),
            Skill::new("PostgreSQL", "Database", 4),
        ]
        .into();
        assert!(WeightModel::build(&set, &n).is_err());
    }
}
