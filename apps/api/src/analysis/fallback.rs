//! Heuristic analysis used when resume text cannot support a real one.

use crate::document::EXTRACTION_ERROR_SENTINEL;
use crate::models::analysis::{DebugInfo, ResumeAnalysis, SkillsMatch};

const EDUCATION_KEYWORDS: &[&str] = &["education", "degree", "university"];
const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "work", "employment"];
const SKILLS_KEYWORDS: &[&str] = &["skills", "expertise", "technologies"];

const SCORE_ALL_SECTIONS: u8 = 50;
const SCORE_PARTIAL: u8 = 30;

/// Whether extracted text can support LLM analysis. Any provider profile
/// makes the text itself irrelevant.
pub fn is_text_usable(text: &str, has_provider_profile: bool, min_length: usize) -> bool {
    if has_provider_profile {
        return true;
    }
    let trimmed = text.trim();
    !(trimmed.is_empty()
        || trimmed.starts_with(EXTRACTION_ERROR_SENTINEL)
        || trimmed.chars().count() < min_length)
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Keyword-only analysis: 50 when education, experience and skills are all
/// mentioned, 30 otherwise. Always `Low`, always `fallback`.
pub fn fallback_analysis(text: &str, reason: &str) -> ResumeAnalysis {
    let lower = text.to_lowercase();
    let has_education = mentions_any(&lower, EDUCATION_KEYWORDS);
    let has_experience = mentions_any(&lower, EXPERIENCE_KEYWORDS);
    let has_skills = mentions_any(&lower, SKILLS_KEYWORDS);

    let overall_score = if has_education && has_experience && has_skills {
        SCORE_ALL_SECTIONS
    } else {
        SCORE_PARTIAL
    };

    let education_level = if has_education {
        "Education mentioned (details unavailable)"
    } else {
        "Not found"
    };
    let years_experience = if has_experience {
        "Experience mentioned (details unavailable)"
    } else {
        "Not found"
    };

    let mut key_skills = Vec::new();
    if has_skills {
        key_skills.push("Skills section present (details unavailable)".to_string());
    }

    let mut missing_requirements =
        vec!["Unable to fully analyze the resume; review it manually".to_string()];
    for (present, section) in [
        (has_education, "education"),
        (has_experience, "experience"),
        (has_skills, "skills"),
    ] {
        if !present {
            missing_requirements.push(format!("No {section} section detected"));
        }
    }

    ResumeAnalysis {
        education_level: education_level.to_string(),
        years_experience: years_experience.to_string(),
        skills_match: SkillsMatch::Low,
        key_skills,
        missing_requirements,
        overall_score,
        fallback: true,
        skill_breakdown: None,
        analysis: None,
        debug_info: Some(DebugInfo {
            text_length: text.chars().count(),
            reason: Some(reason.to_string()),
            ..Default::default()
        }),
    }
}

/// Response for requests missing what an analysis needs.
pub fn missing_parameters_analysis(reason: &str) -> ResumeAnalysis {
    ResumeAnalysis {
        education_level: "Not available".to_string(),
        years_experience: "Not available".to_string(),
        skills_match: SkillsMatch::Low,
        key_skills: Vec::new(),
        missing_requirements: vec![reason.to_string()],
        overall_score: 0,
        fallback: true,
        skill_breakdown: None,
        analysis: None,
        debug_info: Some(DebugInfo {
            reason: Some(reason.to_string()),
            ..Default::default()
        }),
    }
}
