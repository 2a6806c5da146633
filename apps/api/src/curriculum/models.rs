//! The typed curriculum document handed back to callers.
//!
//! Every struct carries an `extra` map: fields the model emitted that the
//! document does not interpret are preserved and serialized back out.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::curriculum::bloom::BloomLevel;

/// Closed set of subject kinds. Unrecognized values normalize to `Core`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectType {
    #[default]
    Core,
    Elective,
    Lab,
    Project,
}

impl SubjectType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Core" => Some(Self::Core),
            "Elective" => Some(Self::Elective),
            "Lab" => Some(Self::Lab),
            "Project" => Some(Self::Project),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    pub hours: u32,
    pub bloom_level: BloomLevel,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutcome {
    pub code: String,
    pub description: String,
    pub bloom_level: BloomLevel,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Code used when an outcome arrives without one.
pub const DEFAULT_OUTCOME_CODE: &str = "CO1";

impl Default for CourseOutcome {
    fn default() -> Self {
        Self {
            code: DEFAULT_OUTCOME_CODE.to_string(),
            description: String::new(),
            bloom_level: BloomLevel::default(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub code: String,
    pub name: String,
    pub credits: u32,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    pub topics: Vec<Topic>,
    pub course_outcomes: Vec<CourseOutcome>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub semester: u32,
    pub total_credits: u32,
    pub subjects: Vec<Subject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root document, one per generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curriculum {
    pub program_name: String,
    pub domain: String,
    pub total_semesters: u32,
    pub total_credits: u32,
    pub semesters: Vec<Semester>,
    pub program_outcomes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
