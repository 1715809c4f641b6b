use tracing::info;

use crate::analysis::prompts::{render, EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use crate::analysis::validation::{clean_profile, RawProfile};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::{call_json, ChatCompletion, CompletionOptions, LlmError, RetryPolicy};
use crate::models::profile::CandidateProfile;

pub const EXTRACTION_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.1,
    max_tokens: 4000,
};

/// Resume text past this many characters is not sent to the model.
const MAX_RESUME_CHARS: usize = 30_000;

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Asks the LLM for a structured profile and runs it through the cleaning
/// boundary. Retries follow `policy`; the last error is returned.
pub async fn extract_profile(
    llm: &dyn ChatCompletion,
    policy: &RetryPolicy,
    resume_text: &str,
) -> Result<CandidateProfile, LlmError> {
    let system = format!("{EXTRACTION_SYSTEM} {JSON_ONLY_SYSTEM}");
    let prompt = format!(
        "{}\n\n{NO_FABRICATION_INSTRUCTION}",
        render(
            EXTRACTION_PROMPT_TEMPLATE,
            &[("{resume_text}", truncate_chars(resume_text, MAX_RESUME_CHARS))],
        )
    );

    let raw: RawProfile = call_json(
        llm,
        policy,
        "profile extraction",
        &system,
        &prompt,
        EXTRACTION_OPTIONS,
    )
    .await?;

    let profile = clean_profile(raw);
    info!(
        "Extracted profile: {} education, {} experience entries",
        profile.education.len(),
        profile.experience.len()
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::ScriptedLlm;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_profile_cleans_output() {
        let llm = ScriptedLlm::new(vec![Ok(r#"```json
{"contactInfo": {"name": "Jane Doe", "email": "jane@example.com"},
 "education": [{"institution": "MIT", "degree": "PhD", "year": 2020}],
 "experience": [{"company": "Acme", "title": ""}],
 "skills": ["Rust"]}
```"#
            .to_string())]);

        let profile = extract_profile(&llm, &RetryPolicy::default(), "resume text")
            .await
            .unwrap();

        assert_eq!(profile.contact_info.name, "Jane Doe");
        assert_eq!(profile.education[0].year.as_deref(), Some("2020"));
        assert!(profile.experience.is_empty());
        assert_eq!(profile.skills.technical, vec!["Rust"]);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_output_is_retried() {
        let llm = ScriptedLlm::new(vec![
            Ok("not json at all".to_string()),
            Ok(r#"{"contactInfo": {"name": "Jane"}}"#.to_string()),
        ]);

        let profile = extract_profile(&llm, &RetryPolicy::default(), "resume text")
            .await
            .unwrap();

        assert_eq!(profile.contact_info.name, "Jane");
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_last_error() {
        let llm = ScriptedLlm::new(vec![
            Err(LlmError::EmptyContent),
            Err(LlmError::EmptyContent),
            Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
        ]);

        let err = extract_profile(&llm, &RetryPolicy::default(), "resume text")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 503, .. }));
        assert_eq!(llm.calls(), 3);
    }
}
