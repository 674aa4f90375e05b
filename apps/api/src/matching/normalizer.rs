//! Skill Normalizer — canonicalizes free-text skill names for comparison.
//!
//! `normalize` lower-cases, trims, collapses internal whitespace, then maps
//! known aliases to one canonical form through a `SynonymTable`.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::matching::MatchError;
use crate::models::skill::{Skill, SkillSet};

/// Comparison-ready skill name. Only constructed by a normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Built-in synonym groups: canonical form first, then its aliases.
const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    ("react", &["reactjs", "react.js", "react js"]),
    ("redux", &["redux.js", "reduxjs", "redux toolkit"]),
    ("typescript", &["ts", "type script"]),
    (
        "javascript",
        &["js", "java script", "ecmascript", "es6", "es2015"],
    ),
    ("node.js", &["node", "nodejs", "node js"]),
    ("python", &["python3", "python 3", "py"]),
    ("django", &["django rest framework", "drf"]),
    ("postgresql", &["postgres", "postgre sql", "psql"]),
    ("mongodb", &["mongo", "mongo db"]),
    ("aws", &["amazon web services", "amazon aws"]),
    ("docker", &["docker container", "docker compose"]),
    ("kubernetes", &["k8s", "kube"]),
    ("git", &["git scm"]),
    (
        "ci/cd",
        &[
            "cicd",
            "ci cd",
            "ci-cd",
            "continuous integration",
            "continuous delivery",
        ],
    ),
    ("rest api", &["restful", "restful api", "rest apis"]),
    ("graphql", &["graph ql"]),
    ("jest", &["jestjs", "jest.js"]),
];

/// Lower-cases, trims, and collapses internal whitespace. No synonym mapping.
/// Used for categories as well as the first step of name normalization.
pub fn fold_whitespace_and_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mapping alias → canonical name.
///
/// Every canonical name maps to itself, and no canonical name is an alias of
/// another one, so normalizing a canonical name is always a no-op.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    aliases: HashMap<String, CanonicalName>,
}

impl SynonymTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (canonical, aliases) in BUILTIN_SYNONYMS {
            let added = table.add_group(canonical, aliases.iter().copied());
            debug_assert!(added.is_ok(), "built-in synonym group {canonical}: {added:?}");
        }
        table
    }

    /// Adds one `canonical -> aliases` group.
    pub fn add_group<'a>(
        &mut self,
        canonical: &str,
        aliases: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), MatchError> {
        let canonical_key = fold_whitespace_and_case(canonical);
        if canonical_key.is_empty() {
            return Err(MatchError::InvalidSkillName(canonical.to_string()));
        }

        // A canonical name may not already be an alias of something else.
        if let Some(existing) = self.aliases.get(&canonical_key) {
            if existing.as_str() != canonical_key {
                return Err(MatchError::SynonymConflict {
                    alias: canonical_key,
                    first: existing.to_string(),
                    second: canonical.to_string(),
                });
            }
        }
        let canonical_name = CanonicalName(canonical_key.clone());
        self.aliases
            .insert(canonical_key.clone(), canonical_name.clone());

        for alias in aliases {
            let alias_key = fold_whitespace_and_case(alias);
            if alias_key.is_empty() {
                return Err(MatchError::InvalidSkillName(alias.to_string()));
            }
            match self.aliases.get(&alias_key) {
                Some(existing) if *existing == canonical_name => {}
                Some(existing) => {
                    return Err(MatchError::SynonymConflict {
                        alias: alias_key,
                        first: existing.to_string(),
                        second: canonical_key,
                    });
                }
                None => {
                    self.aliases.insert(alias_key, canonical_name.clone());
                }
            }
        }
        Ok(())
    }

    /// Loads extra groups from a JSON object `{"canonical": ["alias", ...]}`
    /// and merges them into this table.
    pub fn merge_json_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read synonym file {}", path.display()))?;
        let groups: HashMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Synonym file {} is not valid JSON", path.display()))?;

        // Sorted for deterministic conflict reporting.
        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));
        for (canonical, aliases) in &groups {
            self.add_group(canonical, aliases.iter().map(String::as_str))
                .with_context(|| format!("Invalid synonym group '{canonical}'"))?;
        }
        Ok(())
    }

    fn lookup(&self, folded: &str) -> Option<&CanonicalName> {
        self.aliases.get(folded)
    }

    /// All known spellings (canonical names included) of one canonical name.
    pub fn spellings_of<'a>(&'a self, canonical: &'a CanonicalName) -> impl Iterator<Item = &'a str> {
        self.aliases
            .iter()
            .filter(move |(_, c)| *c == canonical)
            .map(|(alias, _)| alias.as_str())
    }
}

/// Canonicalizes skill names. Pure; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SkillNormalizer {
    synonyms: SynonymTable,
}

impl SkillNormalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    pub fn with_builtin_synonyms() -> Self {
        Self::new(SynonymTable::builtin())
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn normalize(&self, raw: &str) -> Result<CanonicalName, MatchError> {
        let folded = fold_whitespace_and_case(raw);
        if folded.is_empty() {
            return Err(MatchError::InvalidSkillName(raw.to_string()));
        }
        Ok(self
            .synonyms
            .lookup(&folded)
            .cloned()
            .unwrap_or(CanonicalName(folded)))
    }

    /// Rewrites every skill name to its canonical form, checking weights and
    /// rejecting two skills that collapse onto the same canonical name.
    /// Used before a skill set is persisted.
    pub fn canonicalize_set(&self, skills: &SkillSet) -> Result<SkillSet, MatchError> {
        let mut out = SkillSet::new();
        let mut seen = std::collections::HashSet::new();
        for skill in skills {
            let name = self.normalize(&skill.name)?;
            if !skill.has_valid_weight() {
                return Err(MatchError::InvalidInput(format!(
                    "skill '{}' has weight {} outside 1-5",
                    skill.name, skill.weight
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(MatchError::InvalidInput(format!(
                    "skill '{}' appears more than once",
                    name
                )));
            }
            let category = skill.category.split_whitespace().collect::<Vec<_>>().join(" ");
            out.push(Skill::new(name.into_string(), category, skill.weight));
        }
        Ok(out)
    }
}

static DEFAULT_NORMALIZER: LazyLock<Arc<SkillNormalizer>> =
    LazyLock::new(|| Arc::new(SkillNormalizer::with_builtin_synonyms()));

/// Process-wide normalizer with the built-in synonym table.
pub fn default_normalizer() -> Arc<SkillNormalizer> {
    Arc::clone(&DEFAULT_NORMALIZER)
}

/// Normalizes with the built-in synonym table.
pub fn normalize(raw: &str) -> Result<CanonicalName, MatchError> {
    DEFAULT_NORMALIZER.normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lowercases_trims_and_collapses() {
        assert_eq!(normalize("  Machine   Learning ").unwrap().as_str(), "machine learning");
    }

    #[test]
    fn test_node_synonyms_share_one_form() {
        let a = normalize("Node").unwrap();
        let b = normalize("NodeJS").unwrap();
        let c = normalize("Node.js").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c.as_str(), "node.js");
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert!(matches!(normalize(""), Err(MatchError::InvalidSkillName(_))));
        assert!(matches!(
            normalize(" \t\n "),
            Err(MatchError::InvalidSkillName(_))
        ));
    }

    #[test]
    fn test_unknown_skill_passes_through_folded() {
        assert_eq!(normalize("Elixir").unwrap().as_str(), "elixir");
    }

    #[test]
    fn test_idempotent_over_builtin_spellings() {
        let mut inputs: Vec<String> = vec![
            "React".into(),
            " REST   API ".into(),
            "K8s".into(),
            "Some Unknown Skill".into(),
            "CI/CD".into(),
        ];
        for (canonical, aliases) in BUILTIN_SYNONYMS {
            inputs.push(canonical.to_string());
            inputs.extend(aliases.iter().map(|a| a.to_uppercase()));
        }
        for s in inputs {
            let once = normalize(&s).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_builtin_groups_are_conflict_free() {
        let mut table = SynonymTable::empty();
        for (canonical, aliases) in BUILTIN_SYNONYMS {
            table
                .add_group(canonical, aliases.iter().copied())
                .unwrap_or_else(|e| panic!("group {canonical}: {e}"));
        }
    }

    #[test]
    fn test_builtin_table_maps_every_alias() {
        let table = SynonymTable::builtin();
        for (canonical, aliases) in BUILTIN_SYNONYMS {
            for alias in aliases.iter() {
                let folded = fold_whitespace_and_case(alias);
                assert_eq!(
                    table.lookup(&folded).map(CanonicalName::as_str),
                    Some(*canonical),
                    "alias {alias}"
                );
            }
        }
    }

    #[test]
    fn test_alias_claimed_twice_is_conflict() {
        let mut table = SynonymTable::empty();
        table.add_group("golang", ["go"]).unwrap();
        let err = table.add_group("go board game", ["go"]).unwrap_err();
        assert!(matches!(err, MatchError::SynonymConflict { .. }));
    }

    #[test]
    fn test_canonical_that_is_an_alias_is_conflict() {
        let mut table = SynonymTable::empty();
        table.add_group("node.js", ["node"]).unwrap();
        let err = table.add_group("node", ["nodejs"]).unwrap_err();
        assert!(matches!(err, MatchError::SynonymConflict { .. }));
    }

    #[test]
    fn test_regrouping_same_alias_is_allowed() {
        let mut table = SynonymTable::builtin();
        table.add_group("react", ["reactjs", "react 18"]).unwrap();
        let n = SkillNormalizer::new(table);
        assert_eq!(n.normalize("React 18").unwrap().as_str(), "react");
    }

    #[test]
    fn test_merge_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"golang": ["go", "go lang"]}}"#).unwrap();

        let mut table = SynonymTable::builtin();
        table.merge_json_file(file.path()).unwrap();
        let n = SkillNormalizer::new(table);
        assert_eq!(n.normalize("Go Lang").unwrap().as_str(), "golang");
        // Built-ins survive the merge
        assert_eq!(n.normalize("nodejs").unwrap().as_str(), "node.js");
    }

    #[test]
    fn test_merge_json_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(SynonymTable::builtin().merge_json_file(file.path()).is_err());
    }

    #[test]
    fn test_canonicalize_set_rewrites_names() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let set: SkillSet = vec![
            Skill::new("ReactJS", "Frontend", 5),
            Skill::new("Postgres", " Database ", 4),
        ]
        .into();
        let out = n.canonicalize_set(&set).unwrap();
        let names: Vec<_> = out.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["react", "postgresql"]);
        assert_eq!(out.iter().nth(1).unwrap().category, "Database");
    }

    #[test]
    fn test_canonicalize_set_rejects_synonym_duplicates() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let set: SkillSet = vec![
            Skill::new("Node", "Backend", 4),
            Skill::new("Node.js", "Backend", 3),
        ]
        .into();
        assert!(matches!(
            n.canonicalize_set(&set),
            Err(MatchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_canonicalize_set_rejects_bad_weight() {
        let n = SkillNormalizer::with_builtin_synonyms();
        let set: SkillSet = vec![Skill::new("Rust", "Backend", 0)].into();
        assert!(matches!(
            n.canonicalize_set(&set),
            Err(MatchError::InvalidInput(_))
        ));
    }
}
