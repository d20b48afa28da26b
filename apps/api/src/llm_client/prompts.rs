// Shared prompt constants.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt used for every completion: analyst persona, JSON-only output.
pub const ANALYST_SYSTEM: &str = "You are a real estate analyst. Return only JSON.";

/// Closing instruction appended to every generation prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON.";
