// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.

/// System prompt that asks for bare JSON. Callers must still tolerate fences
/// and prose; models do not always comply.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
