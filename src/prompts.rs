//! Prompt and endpoint constants for the captioning call.
//!
//! Centralised so that changing the default instruction, model, or endpoint
//! requires editing exactly one place, and so unit tests can inspect the
//! values without making a network call. Callers override all three through
//! [`crate::config::RunConfig`]; the constants here apply only when no
//! override is provided.

/// Default instruction sent with every captioning request.
///
/// Deliberately short: the caption is burned onto the image, so anything
/// longer than a sentence or two overflows small pictures.
pub const DEFAULT_DESCRIPTION_PROMPT: &str =
    "Describe the image in less than 20 words. Include the number of people and objects.";

/// Default vision model identifier.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";

/// Default OpenAI-compatible chat-completions endpoint.
///
/// [`crate::config::RunConfig::api_base`] points at this unless overridden
/// (tests point it at a local stub).
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1/chat/completions";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_is_short() {
        // The prompt itself should obey the budget it asks the model for.
        assert!(DEFAULT_DESCRIPTION_PROMPT.split_whitespace().count() < 25);
    }

    #[test]
    fn api_base_is_https() {
        assert!(OPENAI_API_BASE.starts_with("https://"));
    }
}
