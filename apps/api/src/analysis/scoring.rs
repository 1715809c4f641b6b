use serde::Deserialize;
use tracing::info;

use crate::analysis::prompts::{render, ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::analysis::validation::{lenient_string, RawSkills};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::{call_json, ChatCompletion, CompletionOptions, LlmError, RetryPolicy};
use crate::models::analysis::{Narrative, ResumeAnalysis, SkillBreakdown, SkillsMatch};
use crate::models::profile::CandidateProfile;

pub const ANALYSIS_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.2,
    max_tokens: 2000,
};

const NOT_SPECIFIED: &str = "Not specified";

/// Analysis as the model returns it, before normalization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnalysis {
    #[serde(deserialize_with = "lenient_string")]
    pub education_level: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub years_experience: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub skills_match: Option<String>,
    pub key_skills: Option<RawSkills>,
    pub missing_requirements: Option<RawSkills>,
    #[serde(deserialize_with = "lenient_string")]
    pub overall_score: Option<String>,
    pub analysis: Option<Narrative>,
}

/// "82", "82.6" and "82/100" all read as a number; anything else is None.
fn parse_score(raw: &str) -> Option<f64> {
    raw.split('/')
        .next()
        .and_then(|s| s.trim().trim_end_matches('%').parse::<f64>().ok())
        .filter(|s| s.is_finite())
}

impl RawAnalysis {
    /// Clamps the score to 0..=100 and derives `skillsMatch` from the score
    /// when the model's label has no recognizable leading word.
    pub fn into_analysis(self) -> ResumeAnalysis {
        let overall_score = self
            .overall_score
            .as_deref()
            .and_then(parse_score)
            .map(|s| s.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(0);

        let skills_match = self
            .skills_match
            .as_deref()
            .and_then(SkillsMatch::from_leading_word)
            .unwrap_or_else(|| SkillsMatch::from_score(overall_score));

        let or_not_specified = |value: Option<String>| {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string())
        };

        let breakdown = SkillBreakdown {
            key_skills: self.key_skills.unwrap_or_default().into_skills(),
            missing_requirements: self.missing_requirements.unwrap_or_default().into_skills(),
        };

        ResumeAnalysis {
            education_level: or_not_specified(self.education_level),
            years_experience: or_not_specified(self.years_experience),
            skills_match,
            key_skills: breakdown.key_skills.flatten(),
            missing_requirements: breakdown.missing_requirements.flatten(),
            overall_score,
            fallback: false,
            skill_breakdown: Some(breakdown),
            analysis: self.analysis,
            debug_info: None,
        }
    }
}

/// Scores a profile against a job description.
pub async fn analyze_profile(
    llm: &dyn ChatCompletion,
    policy: &RetryPolicy,
    profile: &CandidateProfile,
    job_description: &str,
) -> Result<ResumeAnalysis, LlmError> {
    let system = format!("{ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM}");
    let profile_json = serde_json::to_string_pretty(profile)?;
    let prompt = format!(
        "{}\n\n{NO_FABRICATION_INSTRUCTION}",
        render(
            ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("{profile_json}", profile_json.as_str()),
                ("{job_description}", job_description.trim()),
            ],
        )
    );

    let raw: RawAnalysis = call_json(
        llm,
        policy,
        "resume analysis",
        &system,
        &prompt,
        ANALYSIS_OPTIONS,
    )
    .await?;

    let analysis = raw.into_analysis();
    info!(
        "Analysis complete: score={}, skills_match={}",
        analysis.overall_score,
        analysis.skills_match.as_str()
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::ScriptedLlm;

    fn raw(json: &str) -> RawAnalysis {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_score_is_clamped_and_rounded() {
        assert_eq!(raw(r#"{"overallScore": 140}"#).into_analysis().overall_score, 100);
        assert_eq!(raw(r#"{"overallScore": -5}"#).into_analysis().overall_score, 0);
        assert_eq!(raw(r#"{"overallScore": 72.6}"#).into_analysis().overall_score, 73);
        assert_eq!(raw(r#"{"overallScore": "64/100"}"#).into_analysis().overall_score, 64);
        assert_eq!(raw(r#"{"overallScore": "n/a"}"#).into_analysis().overall_score, 0);
    }

    #[test]
    fn test_skills_match_from_leading_word() {
        let analysis = raw(r#"{"skillsMatch": "Medium - some overlap", "overallScore": 90}"#)
            .into_analysis();
        assert_eq!(analysis.skills_match, SkillsMatch::Medium);
    }

    #[test]
    fn test_skills_match_derived_from_score() {
        let analysis = raw(r#"{"skillsMatch": "excellent", "overallScore": 80}"#).into_analysis();
        assert_eq!(analysis.skills_match, SkillsMatch::High);
        let analysis = raw(r#"{"overallScore": 55}"#).into_analysis();
        assert_eq!(analysis.skills_match, SkillsMatch::Medium);
        let analysis = raw(r#"{"overallScore": 20}"#).into_analysis();
        assert_eq!(analysis.skills_match, SkillsMatch::Low);
    }

    #[test]
    fn test_categorized_skills_are_flattened() {
        let analysis = raw(
            r#"{
                "keySkills": {"technical": ["Rust", "SQL"], "soft": ["Leadership"], "industry": null},
                "missingRequirements": ["Kubernetes"]
            }"#,
        )
        .into_analysis();
        assert_eq!(analysis.key_skills, vec!["Rust", "SQL", "Leadership"]);
        assert_eq!(analysis.missing_requirements, vec!["Kubernetes"]);
        let breakdown = analysis.skill_breakdown.as_ref().unwrap();
        assert_eq!(breakdown.key_skills.soft, vec!["Leadership"]);
        assert_eq!(breakdown.missing_requirements.technical, vec!["Kubernetes"]);
        assert_eq!(analysis.education_level, "Not specified");
        assert!(!analysis.fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_profile_sends_job_description() {
        let llm = ScriptedLlm::new(vec![Ok(r#"{
            "educationLevel": "Bachelor's",
            "yearsExperience": "4 years",
            "skillsMatch": "High",
            "keySkills": {"technical": ["Rust"]},
            "missingRequirements": {"technical": []},
            "overallScore": 88,
            "analysis": {"strengths": ["Rust"], "gaps": [], "recommendations": []}
        }"#
        .to_string())]);

        let analysis = analyze_profile(
            &llm,
            &RetryPolicy::default(),
            &CandidateProfile::default(),
            "Senior Rust engineer",
        )
        .await
        .unwrap();

        assert_eq!(analysis.overall_score, 88);
        assert_eq!(analysis.analysis.unwrap().strengths, vec!["Rust"]);
        assert!(llm.prompts()[0].contains("Senior Rust engineer"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_placeholder_text_inside_profile_is_not_substituted() {
        let llm = ScriptedLlm::new(vec![Ok(r#"{"overallScore": 50}"#.to_string())]);
        let mut profile = CandidateProfile::default();
        profile.contact_info.name = "{job_description}".to_string();

        analyze_profile(&llm, &RetryPolicy::default(), &profile, "Data analyst")
            .await
            .unwrap();

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains(r#""name": "{job_description}""#));
        assert_eq!(prompt.matches("Data analyst").count(), 1);
    }
}
