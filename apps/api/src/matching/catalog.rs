//! Known skills offered to job authors and searched for by the keyword extractor.

use crate::matching::normalizer::fold_whitespace_and_case;
use crate::models::skill::Skill;

const BUILTIN_SKILLS: &[(&str, &str, i32)] = &[
    ("React", "Frontend", 5),
    ("TypeScript", "Frontend", 4),
    ("JavaScript", "Frontend", 5),
    ("Redux", "Frontend", 3),
    ("Python", "Backend", 5),
    ("Node.js", "Backend", 4),
    ("Django", "Backend", 4),
    ("REST API", "Backend", 4),
    ("GraphQL", "Backend", 3),
    ("MongoDB", "Database", 3),
    ("PostgreSQL", "Database", 4),
    ("AWS", "Cloud", 4),
    ("Docker", "DevOps", 3),
    ("Kubernetes", "DevOps", 4),
    ("CI/CD", "DevOps", 3),
    ("Git", "Tools", 3),
    ("Jest", "Testing", 3),
];

#[derive(Debug, Clone)]
pub struct SkillCatalog {
    skills: Vec<Skill>,
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillCatalog {
    pub fn builtin() -> Self {
        Self {
            skills: BUILTIN_SKILLS
                .iter()
                .map(|(name, category, weight)| Skill::new(*name, *category, *weight))
                .collect(),
        }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Distinct categories, first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for skill in &self.skills {
            if !out.contains(&skill.category) {
                out.push(skill.category.clone());
            }
        }
        out
    }

    /// Case-insensitive category filter.
    pub fn by_category(&self, category: &str) -> Vec<Skill> {
        let wanted = fold_whitespace_and_case(category);
        self.skills
            .iter()
            .filter(|s| fold_whitespace_and_case(&s.category) == wanted)
            .cloned()
            .collect()
    }
}
