//! Axum route handlers for the Curriculum API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::curriculum::coerce::coerce_u32;
use crate::curriculum::generator::{generate_curriculum, process_model_output, GenerationParams};
use crate::curriculum::models::Curriculum;
use crate::curriculum::summary::{summarize, CurriculumSummary};
use crate::errors::AppError;
use crate::state::AppState;

const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields: programName, domain, and duration are required.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Request body for curriculum generation. Fields are loose so that a missing
/// or mistyped field is reported as a client error rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCurriculumRequest {
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    /// Years; numbers and numeric strings are accepted.
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub industry_focus: Option<String>,
}

impl GenerateCurriculumRequest {
    /// Rejects missing, empty, or zero-valued required fields.
    pub fn validate(self) -> Result<GenerationParams, AppError> {
        let program_name = self.program_name.filter(|s| !s.is_empty());
        let domain = self.domain.filter(|s| !s.is_empty());
        let duration = self.duration.as_ref().map(coerce_u32).filter(|d| *d > 0);

        match (program_name, domain, duration) {
            (Some(program_name), Some(domain), Some(duration)) => Ok(GenerationParams {
                program_name,
                domain,
                duration,
                industry_focus: self.industry_focus,
            }),
            _ => Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeRequest {
    pub raw_text: String,
    #[serde(default)]
    pub expected_semesters: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub curriculum: Curriculum,
    pub summary: CurriculumSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/curricula/generate
///
/// Full pipeline: validate → prompt → model call → extract → normalize.
/// Returns the bare `Curriculum` document.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateCurriculumRequest>, JsonRejection>,
) -> Result<Json<Curriculum>, AppError> {
    let llm = state.llm.clone().ok_or_else(|| {
        AppError::Configuration(
            "Model API key is not configured. Set ANTHROPIC_API_KEY in the environment or .env file."
                .to_string(),
        )
    })?;

    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected generate body: {e}");
        AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())
    })?;
    let params = request.validate()?;

    let curriculum = generate_curriculum(llm.as_ref(), &params, state.config.llm_timeout()).await?;

    Ok(Json(curriculum))
}

/// POST /api/v1/curricula/normalize
///
/// Runs the extractor and normalizer over captured model text without calling
/// the model. Returns the document plus its summary.
pub async fn handle_normalize(
    payload: Result<Json<NormalizeRequest>, JsonRejection>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let Json(request) = payload
        .map_err(|e| AppError::Validation(format!("rawText is required: {}", e.body_text())))?;

    let curriculum =
        process_model_output(request.raw_text, request.expected_semesters.unwrap_or(0)).await?;
    let summary = summarize(&curriculum);

    Ok(Json(NormalizeResponse {
        curriculum,
        summary,
    }))
}
