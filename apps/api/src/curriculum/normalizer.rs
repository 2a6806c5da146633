//! Normalizer — coerces the extractor's untyped value into a `Curriculum`.
//!
//! Coercion runs bottom-up (topic/outcome → subject → semester → document)
//! and failures are absorbed at the smallest granularity: a bad field gets
//! its default, a bad array element is replaced by a default instance of its
//! type. Array lengths are never changed.
//!
//! Document validation fails when the root is not an object, or when its
//! `semesters` or `programOutcomes` is absent or not an array. In that case a
//! reduced reconstruction from whatever can be salvaged is tried once before
//! giving up with `NormalizationError`.

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::curriculum::bloom::BloomLevel;
use crate::curriculum::coerce::{coerce_array, coerce_string, coerce_u32, passthrough};
use crate::curriculum::models::{
    CourseOutcome, Curriculum, Semester, Subject, SubjectType, Topic, DEFAULT_OUTCOME_CODE,
};

/// Credits assumed per semester when the model gives no usable total.
pub const DEFAULT_CREDITS_PER_SEMESTER: u32 = 22;

/// Program name used when the fallback reconstruction salvages none.
pub const FALLBACK_PROGRAM_NAME: &str = "Curriculum";

/// Root fields that must be arrays for the document to validate.
const REQUIRED_ROOT_ARRAYS: [&str; 2] = ["semesters", "programOutcomes"];

#[derive(Debug, Error, PartialEq)]
pub enum NormalizationError {
    #[error("Generated curriculum did not match expected format")]
    Unrecoverable,
}

static NULL: Value = Value::Null;

fn field<'a>(object: &'a Map<String, Value>, key: &str) -> &'a Value {
    object.get(key).unwrap_or(&NULL)
}

/// Normalizes an untyped value into a fully typed document.
///
/// `expected_semesters` is the count the caller asked for; it only feeds the
/// fallback reconstruction.
pub fn normalize(value: &Value, expected_semesters: u32) -> Result<Curriculum, NormalizationError> {
    if let Some(curriculum) = curriculum_from_value(value) {
        return Ok(curriculum);
    }

    warn!(
        "Curriculum failed document validation ({}); attempting fallback reconstruction",
        rejection_reason(value)
    );
    let salvaged = salvage(value, expected_semesters);
    curriculum_from_value(&salvaged).ok_or(NormalizationError::Unrecoverable)
}

/// Full document validation. `None` when the root is not an object or one of
/// its required arrays is missing.
pub fn curriculum_from_value(value: &Value) -> Option<Curriculum> {
    let object = value.as_object()?;
    if !REQUIRED_ROOT_ARRAYS
        .iter()
        .all(|key| field(object, key).is_array())
    {
        return None;
    }
    Some(Curriculum {
        program_name: coerce_string(field(object, "programName")),
        domain: coerce_string(field(object, "domain")),
        total_semesters: coerce_u32(field(object, "totalSemesters")),
        total_credits: coerce_u32(field(object, "totalCredits")),
        semesters: coerce_array(object.get("semesters"), semester_from_value, Semester::default),
        program_outcomes: coerce_array(
            object.get("programOutcomes"),
            |p| Some(outcome_text(p)),
            String::new,
        ),
        extra: passthrough(
            object,
            &[
                "programName",
                "domain",
                "totalSemesters",
                "totalCredits",
                "semesters",
                "programOutcomes",
            ],
        ),
    })
}

fn semester_from_value(value: &Value) -> Option<Semester> {
    let object = value.as_object()?;
    Some(Semester {
        semester: coerce_u32(field(object, "semester")),
        total_credits: coerce_u32(field(object, "totalCredits")),
        subjects: coerce_array(object.get("subjects"), subject_from_value, Subject::default),
        extra: passthrough(object, &["semester", "totalCredits", "subjects"]),
    })
}

fn subject_from_value(value: &Value) -> Option<Subject> {
    let object = value.as_object()?;
    Some(Subject {
        code: coerce_string(field(object, "code")),
        name: coerce_string(field(object, "name")),
        credits: coerce_u32(field(object, "credits")),
        subject_type: field(object, "type")
            .as_str()
            .and_then(SubjectType::from_name)
            .unwrap_or_default(),
        topics: coerce_array(object.get("topics"), topic_from_value, Topic::default),
        course_outcomes: coerce_array(
            object.get("courseOutcomes"),
            course_outcome_from_value,
            CourseOutcome::default,
        ),
        extra: passthrough(
            object,
            &["code", "name", "credits", "type", "topics", "courseOutcomes"],
        ),
    })
}

fn topic_from_value(value: &Value) -> Option<Topic> {
    let object = value.as_object()?;
    Some(Topic {
        name: coerce_string(field(object, "name")),
        hours: coerce_u32(field(object, "hours")),
        bloom_level: BloomLevel::resolve(field(object, "bloomLevel")),
        extra: passthrough(object, &["name", "hours", "bloomLevel"]),
    })
}

fn course_outcome_from_value(value: &Value) -> Option<CourseOutcome> {
    let object = value.as_object()?;
    let code = match field(object, "code") {
        Value::Null => DEFAULT_OUTCOME_CODE.to_string(),
        other => coerce_string(other),
    };
    Some(CourseOutcome {
        code,
        description: coerce_string(field(object, "description")),
        bloom_level: BloomLevel::resolve(field(object, "bloomLevel")),
        extra: passthrough(object, &["code", "description", "bloomLevel"]),
    })
}

/// Program outcomes are plain strings; objects are reduced to their
/// `description` (or `text`) field when they carry one.
fn outcome_text(value: &Value) -> String {
    if let Value::Object(object) = value {
        let inner = ["description", "text"]
            .iter()
            .filter_map(|key| object.get(*key))
            .find(|v| !v.is_null());
        if let Some(inner) = inner {
            return coerce_string(inner);
        }
    }
    coerce_string(value)
}

/// Builds the reduced document the fallback path re-validates.
fn salvage(value: &Value, expected_semesters: u32) -> Value {
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);

    let program_name = match coerce_string(field(object, "programName")) {
        name if name.is_empty() => FALLBACK_PROGRAM_NAME.to_string(),
        name => name,
    };
    let total_semesters = match coerce_u32(field(object, "totalSemesters")) {
        0 => expected_semesters,
        n => n,
    };
    let total_credits = match coerce_u32(field(object, "totalCredits")) {
        0 => expected_semesters.saturating_mul(DEFAULT_CREDITS_PER_SEMESTER),
        n => n,
    };
    let semesters = match field(object, "semesters") {
        Value::Array(items) => Value::Array(items.clone()),
        _ => json!([]),
    };
    let program_outcomes: Vec<String> = match field(object, "programOutcomes") {
        Value::Array(items) => items.iter().map(coerce_string).collect(),
        _ => Vec::new(),
    };

    json!({
        "programName": program_name,
        "domain": coerce_string(field(object, "domain")),
        "totalSemesters": total_semesters,
        "totalCredits": total_credits,
        "semesters": semesters,
        "programOutcomes": program_outcomes,
    })
}

fn rejection_reason(value: &Value) -> String {
    let Some(object) = value.as_object() else {
        return format!("root is {}", value_kind(value));
    };
    let missing: Vec<&str> = REQUIRED_ROOT_ARRAYS
        .iter()
        .copied()
        .filter(|key| !field(object, key).is_array())
        .collect();
    format!("{} not an array", missing.join(" and "))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        json!({
            "programName": "B.Tech Computer Science",
            "domain": "Engineering",
            "totalSemesters": 8,
            "totalCredits": "176",
            "semesters": [
                {
                    "semester": 1,
                    "totalCredits": 22,
                    "subjects": [
                        {
                            "code": "CS101",
                            "name": "Programming Fundamentals",
                            "credits": 4,
                            "type": "Core",
                            "topics": [
                                {"name": "Variables", "hours": 6, "bloomLevel": "Remember"},
                                {"name": "Control Flow", "hours": "8", "bloomLevel": "Plan"}
                            ],
                            "courseOutcomes": [
                                {"code": "CO1", "description": "Write programs", "bloomLevel": "Apply"}
                            ]
                        },
                        {
                            "code": "CS102L",
                            "name": "Programming Lab",
                            "credits": 2,
                            "type": "Seminar"
                        }
                    ]
                },
                "garbage semester"
            ],
            "programOutcomes": [
                "PO1: Engineering knowledge",
                {"description": "PO2: Problem analysis"},
                {"text": "PO3: Design"},
                7
            ]
        })
    }

    #[test]
    fn test_well_formed_document() {
        let c = normalize(&sample(), 8).unwrap();
        assert_eq!(c.program_name, "B.Tech Computer Science");
        assert_eq!(c.total_semesters, 8);
        assert_eq!(c.total_credits, 176);
        let subject = &c.semesters[0].subjects[0];
        assert_eq!(subject.topics[1].hours, 8);
        assert_eq!(subject.topics[1].bloom_level, BloomLevel::Apply);
        assert_eq!(subject.course_outcomes[0].bloom_level, BloomLevel::Apply);
    }

    #[test]
    fn test_unrecognized_subject_type_is_core() {
        let c = normalize(&sample(), 8).unwrap();
        assert_eq!(c.semesters[0].subjects[1].subject_type, SubjectType::Core);
    }

    #[test]
    fn test_missing_topics_and_outcomes_become_empty() {
        let c = normalize(&sample(), 8).unwrap();
        let lab = &c.semesters[0].subjects[1];
        assert!(lab.topics.is_empty());
        assert!(lab.course_outcomes.is_empty());
        let value = serde_json::to_value(lab).unwrap();
        assert_eq!(value["topics"], json!([]));
    }

    #[test]
    fn test_bad_semester_is_defaulted_not_dropped() {
        let c = normalize(&sample(), 8).unwrap();
        assert_eq!(c.semesters.len(), 2);
        assert_eq!(c.semesters[1], Semester::default());
    }

    #[test]
    fn test_semester_count_is_preserved() {
        let raw = json!({"semesters": [null, 1, "x", {}, [], {"semester": "6"}]});
        let c = normalize(&raw, 8).unwrap();
        assert_eq!(c.semesters.len(), 6);
        assert_eq!(c.semesters[5].semester, 6);
    }

    #[test]
    fn test_bad_topic_and_outcome_elements_are_defaulted() {
        let raw = json!({
            "semesters": [{"subjects": [{
                "topics": ["just a string", {"name": "Real", "hours": 3}],
                "courseOutcomes": [42, {"description": "No code"}]
            }]}]
        });
        let c = normalize(&raw, 2).unwrap();
        let subject = &c.semesters[0].subjects[0];
        assert_eq!(subject.topics[0], Topic::default());
        assert_eq!(subject.topics[1].name, "Real");
        assert_eq!(subject.topics[1].bloom_level, BloomLevel::Understand);
        assert_eq!(subject.course_outcomes[0], CourseOutcome::default());
        assert_eq!(subject.course_outcomes[1].code, "CO1");
        assert_eq!(subject.course_outcomes[1].description, "No code");
    }

    #[test]
    fn test_program_outcomes_are_flattened_to_strings() {
        let c = normalize(&sample(), 8).unwrap();
        assert_eq!(
            c.program_outcomes,
            vec![
                "PO1: Engineering knowledge",
                "PO2: Problem analysis",
                "PO3: Design",
                "7"
            ]
        );
    }

    #[test]
    fn test_object_outcome_without_text_is_stringified() {
        let raw = json!({"semesters": [], "programOutcomes": [{"id": 1}, null]});
        let c = normalize(&raw, 2).unwrap();
        assert_eq!(c.program_outcomes, vec![r#"{"id":1}"#.to_string(), String::new()]);
    }

    #[test]
    fn test_non_array_nested_fields_become_empty() {
        let raw = json!({
            "semesters": [{"semester": 1, "subjects": "many"}],
            "programOutcomes": []
        });
        let c = normalize(&raw, 8).unwrap();
        assert_eq!(c.semesters[0].semester, 1);
        assert!(c.semesters[0].subjects.is_empty());
    }

    #[test]
    fn test_non_array_root_fields_take_fallback() {
        let raw = json!({"programName": "BA", "semesters": "eight", "programOutcomes": {"a": 1}});
        let c = normalize(&raw, 8).unwrap();
        assert_eq!(c.program_name, "BA");
        assert_eq!(c.total_semesters, 8);
        assert_eq!(c.total_credits, 176);
        assert!(c.semesters.is_empty());
        assert!(c.program_outcomes.is_empty());
    }

    #[test]
    fn test_scalars_are_coerced() {
        let raw = json!({
            "programName": 42,
            "domain": null,
            "totalSemesters": "eight",
            "totalCredits": 160.7,
            "semesters": [],
            "programOutcomes": []
        });
        let c = normalize(&raw, 8).unwrap();
        assert_eq!(c.program_name, "42");
        assert_eq!(c.domain, "");
        assert_eq!(c.total_semesters, 0);
        assert_eq!(c.total_credits, 160);
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let raw = json!({
            "programName": "MBA",
            "accreditation": "AACSB",
            "semesters": [{"semester": 1, "theme": "Foundations"}],
            "programOutcomes": []
        });
        let c = normalize(&raw, 4).unwrap();
        assert_eq!(c.extra["accreditation"], json!("AACSB"));
        assert_eq!(c.semesters[0].extra["theme"], json!("Foundations"));
        let out = serde_json::to_value(&c).unwrap();
        assert_eq!(out["accreditation"], json!("AACSB"));
    }

    #[test]
    fn test_normalizing_output_again_is_a_no_op() {
        let first = normalize(&sample(), 8).unwrap();
        let second = normalize(&serde_json::to_value(&first).unwrap(), 8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_object_root_uses_fallback() {
        let c = normalize(&json!("not a curriculum"), 6).unwrap();
        assert_eq!(c.program_name, "Curriculum");
        assert_eq!(c.total_semesters, 6);
        assert_eq!(c.total_credits, 132);
        assert!(c.semesters.is_empty());
        assert!(c.program_outcomes.is_empty());
    }

    #[test]
    fn test_empty_array_root_uses_fallback() {
        let c = normalize(&json!([]), 4).unwrap();
        assert_eq!(c.total_semesters, 4);
        assert_eq!(c.total_credits, 88);
    }

    #[test]
    fn test_object_without_required_arrays_uses_fallback_defaults() {
        let raw = json!({"programName": "", "totalSemesters": null, "semesters": null});
        let c = normalize(&raw, 8).unwrap();
        assert_eq!(c.program_name, "Curriculum");
        assert_eq!(c.total_semesters, 8);
        assert_eq!(c.total_credits, 176);
        assert!(c.semesters.is_empty());
    }

    #[test]
    fn test_fallback_keeps_usable_fields() {
        let raw = json!({
            "programName": "LLB",
            "domain": "Law",
            "totalSemesters": 0,
            "totalCredits": "150",
            "semesters": [{"semester": 1}],
            "programOutcomes": "PO1",
            "accreditation": "BCI"
        });
        let c = normalize(&raw, 10).unwrap();
        assert_eq!(c.program_name, "LLB");
        assert_eq!(c.domain, "Law");
        assert_eq!(c.total_semesters, 10);
        assert_eq!(c.total_credits, 150);
        assert_eq!(c.semesters.len(), 1);
        assert_eq!(c.semesters[0].semester, 1);
        assert!(c.program_outcomes.is_empty());
        assert!(c.extra.is_empty());
    }

    #[test]
    fn test_fallback_stringifies_program_outcomes() {
        let raw = json!({"programOutcomes": ["PO1", 2, {"description": "PO3"}]});
        let c = normalize(&raw, 2).unwrap();
        assert_eq!(
            c.program_outcomes,
            vec!["PO1".to_string(), "2".to_string(), r#"{"description":"PO3"}"#.to_string()]
        );
    }

    #[test]
    fn test_complete_object_keeps_zero_totals() {
        let c = normalize(&json!({"semesters": [], "programOutcomes": []}), 8).unwrap();
        assert_eq!(c.program_name, "");
        assert_eq!(c.total_semesters, 0);
        assert_eq!(c.total_credits, 0);
    }
}
