//! Document statistics shown alongside a curriculum.

use serde::Serialize;

use crate::curriculum::bloom::{BloomLevel, BLOOM_LEVELS};
use crate::curriculum::models::Curriculum;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloomCount {
    pub level: BloomLevel,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumSummary {
    pub total_subjects: u32,
    pub total_topics: u32,
    pub total_topic_hours: u64,
    pub program_outcome_count: u32,
    /// Topics and course outcomes per level, in canonical order.
    pub bloom_distribution: Vec<BloomCount>,
}

pub fn summarize(curriculum: &Curriculum) -> CurriculumSummary {
    let mut counts = [0u32; BLOOM_LEVELS.len()];
    let mut total_subjects = 0u32;
    let mut total_topics = 0u32;
    let mut total_topic_hours = 0u64;

    let subjects = curriculum.semesters.iter().flat_map(|s| &s.subjects);
    for subject in subjects {
        total_subjects += 1;
        for topic in &subject.topics {
            total_topics += 1;
            total_topic_hours += u64::from(topic.hours);
            counts[level_index(topic.bloom_level)] += 1;
        }
        for outcome in &subject.course_outcomes {
            counts[level_index(outcome.bloom_level)] += 1;
        }
    }

    CurriculumSummary {
        total_subjects,
        total_topics,
        total_topic_hours,
        program_outcome_count: curriculum.program_outcomes.len() as u32,
        bloom_distribution: BLOOM_LEVELS
            .iter()
            .zip(counts)
            .map(|(level, count)| BloomCount {
                level: *level,
                count,
            })
            .collect(),
    }
}

fn level_index(level: BloomLevel) -> usize {
    BLOOM_LEVELS
        .iter()
        .position(|l| *l == level)
        .unwrap_or_default()
}
