//! Bloom's taxonomy — the six canonical cognitive levels and the verb table
//! used to map instructional verbs emitted by the model onto them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the six canonical cognitive levels, in pedagogical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloomLevel {
    Remember,
    #[default]
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

/// Canonical iteration/display order.
pub const BLOOM_LEVELS: [BloomLevel; 6] = [
    BloomLevel::Remember,
    BloomLevel::Understand,
    BloomLevel::Apply,
    BloomLevel::Analyze,
    BloomLevel::Evaluate,
    BloomLevel::Create,
];

/// Instructional verbs the model tends to emit in place of a level name.
const VERB_LEVELS: &[(&str, BloomLevel)] = &[
    ("Plan", BloomLevel::Apply),
    ("Communicate", BloomLevel::Create),
    ("Design", BloomLevel::Create),
    ("Implement", BloomLevel::Apply),
    ("Demonstrate", BloomLevel::Apply),
    ("Identify", BloomLevel::Remember),
    ("Describe", BloomLevel::Understand),
    ("Explain", BloomLevel::Understand),
    ("Outline", BloomLevel::Understand),
    ("Use", BloomLevel::Apply),
    ("Select", BloomLevel::Analyze),
    ("Assess", BloomLevel::Evaluate),
    ("Construct", BloomLevel::Create),
    ("Develop", BloomLevel::Create),
    ("Produce", BloomLevel::Create),
    ("Configure", BloomLevel::Apply),
    ("Conduct", BloomLevel::Apply),
    ("Measure", BloomLevel::Analyze),
    ("Reflect", BloomLevel::Evaluate),
];

impl BloomLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remember => "Remember",
            Self::Understand => "Understand",
            Self::Apply => "Apply",
            Self::Analyze => "Analyze",
            Self::Evaluate => "Evaluate",
            Self::Create => "Create",
        }
    }

    /// Exact, case-sensitive match against the canonical names.
    pub fn from_canonical(name: &str) -> Option<Self> {
        BLOOM_LEVELS.into_iter().find(|level| level.as_str() == name)
    }

    /// Looks a verb up in the verb table. Case-sensitive, like the level names.
    pub fn from_verb(verb: &str) -> Option<Self> {
        VERB_LEVELS
            .iter()
            .find(|(v, _)| *v == verb)
            .map(|(_, level)| *level)
    }

    /// Resolves any untyped value to a level: canonical name, then verb table,
    /// then `Understand`.
    pub fn resolve(value: &Value) -> Self {
        let name = match value {
            Value::String(s) => s.as_str(),
            _ => return Self::default(),
        };
        Self::from_canonical(name)
            .or_else(|| Self::from_verb(name))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
