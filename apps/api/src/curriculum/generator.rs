//! Curriculum Generation — orchestrates one request end to end.
//!
//! Flow: build prompt → model call (single shot, bounded) → extract →
//!       normalize (with fallback) → typed `Curriculum`.
//!
//! Extraction and normalization are CPU-bound and run on the blocking pool.

use std::time::Duration;

use tracing::{error, info};

use crate::curriculum::bloom::BLOOM_LEVELS;
use crate::curriculum::extractor::extract;
use crate::curriculum::models::Curriculum;
use crate::curriculum::normalizer::normalize;
use crate::curriculum::prompts::CURRICULUM_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};

/// Validated inputs for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub program_name: String,
    pub domain: String,
    /// Program length in years.
    pub duration: u32,
    pub industry_focus: Option<String>,
}

impl GenerationParams {
    /// Two semesters per year.
    pub fn total_semesters(&self) -> u32 {
        self.duration.saturating_mul(2)
    }
}

/// Runs the full pipeline for one request.
pub async fn generate_curriculum(
    llm: &dyn TextGenerator,
    params: &GenerationParams,
    timeout: Duration,
) -> Result<Curriculum, AppError> {
    let prompt = build_curriculum_prompt(params);

    info!(
        "Generating curriculum: program={:?} domain={:?} semesters={}",
        params.program_name,
        params.domain,
        params.total_semesters()
    );

    let raw_text = tokio::time::timeout(timeout, llm.generate(&prompt, JSON_ONLY_SYSTEM))
        .await
        .map_err(|_| LlmError::Timeout {
            secs: timeout.as_secs(),
        })??;

    let curriculum = process_model_output(raw_text, params.total_semesters()).await?;

    info!(
        "Generated curriculum {:?}: {} semesters, {} program outcomes",
        curriculum.program_name,
        curriculum.semesters.len(),
        curriculum.program_outcomes.len()
    );

    Ok(curriculum)
}

/// Extracts and normalizes raw model text on the blocking pool.
pub async fn process_model_output(
    raw_text: String,
    expected_semesters: u32,
) -> Result<Curriculum, AppError> {
    tokio::task::spawn_blocking(move || curriculum_from_text(&raw_text, expected_semesters))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Curriculum processing task failed: {e}")))?
}

/// Extractor followed by Normalizer. Extraction failures are logged with the
/// offending text, which is never returned to the caller.
pub fn curriculum_from_text(
    raw_text: &str,
    expected_semesters: u32,
) -> Result<Curriculum, AppError> {
    let value = extract(raw_text).map_err(|e| {
        error!("Curriculum extraction failed: {e}; raw model output: {raw_text:?}");
        e
    })?;
    Ok(normalize(&value, expected_semesters)?)
}

/// Fills the generation prompt template.
pub fn build_curriculum_prompt(params: &GenerationParams) -> String {
    let industry_focus_line = params
        .industry_focus
        .as_deref()
        .map(str::trim)
        .filter(|focus| !focus.is_empty())
        .map(|focus| format!("Industry Focus: {focus}"))
        .unwrap_or_default();

    let bloom_levels = BLOOM_LEVELS
        .iter()
        .map(|level| level.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    CURRICULUM_PROMPT_TEMPLATE
        .replace("{program_name}", &params.program_name)
        .replace("{domain}", &params.domain)
        .replace("{duration}", &params.duration.to_string())
        .replace("{total_semesters}", &params.total_semesters().to_string())
        .replace("{industry_focus_line}", &industry_focus_line)
        .replace("{bloom_levels}", &bloom_levels)
}
