// Shared prompt fragments for every LLM call site.
// Stage-specific prompts live next to the stage (see analysis/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that reads candidate material.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Use only information present in the provided text. \
    Do NOT infer, interpolate, or invent details. \
    If a value is not present, use an empty string or an empty array.";
