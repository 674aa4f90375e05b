// Skill-match scoring core.
// Pure and synchronous: no I/O, no shared mutable state. Safe to call from any
// number of tasks at once over an `Arc<SkillNormalizer>`.

pub mod catalog;
pub mod engine;
pub mod normalizer;
pub mod weights;

use thiserror::Error;

pub use engine::{BonusPolicy, MatchReport, MatchingEngine};
pub use normalizer::{default_normalizer, normalize, CanonicalName, SkillNormalizer, SynonymTable};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Invalid skill name: {0:?}")]
    InvalidSkillName(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Synonym conflict: '{alias}' maps to both '{first}' and '{second}'")]
    SynonymConflict {
        alias: String,
        first: String,
        second: String,
    },
}
