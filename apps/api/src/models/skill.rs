use serde::{Deserialize, Serialize};

pub const MIN_WEIGHT: i32 = 1;
pub const MAX_WEIGHT: i32 = 5;

/// A named competency with a category and an importance weight (1–5).
///
/// `weight` is kept as a plain integer so that out-of-range values coming from
/// callers reach the matching engine and are rejected there as invalid input,
/// rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    pub weight: i32,
}

impl Skill {
    pub fn new(name: impl Into<String>, category: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            weight,
        }
    }

    pub fn has_valid_weight(&self) -> bool {
        (MIN_WEIGHT..=MAX_WEIGHT).contains(&self.weight)
    }
}

/// Ordered skills of one résumé or one job requirement.
/// Order is kept for display only; scoring never depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<Skill>);

impl SkillSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skill> {
        self.0.iter()
    }

    pub fn push(&mut self, skill: Skill) {
        self.0.push(skill);
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Skill> {
        self.0.iter_mut()
    }
}

impl From<Vec<Skill>> for SkillSet {
    fn from(skills: Vec<Skill>) -> Self {
        Self(skills)
    }
}

impl FromIterator<Skill> for SkillSet {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a Skill;
    type IntoIter = std::slice::Iter<'a, Skill>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
