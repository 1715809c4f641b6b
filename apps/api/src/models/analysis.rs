use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::profile::Skills;

/// Coarse match bucket between a candidate and a job description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillsMatch {
    High,
    Medium,
    Low,
}

impl SkillsMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillsMatch::High => "High",
            SkillsMatch::Medium => "Medium",
            SkillsMatch::Low => "Low",
        }
    }

    pub fn from_score(score: u8) -> Self {
        match score {
            75..=100 => SkillsMatch::High,
            50..=74 => SkillsMatch::Medium,
            _ => SkillsMatch::Low,
        }
    }

    /// Reads the bucket from the leading word of free text such as
    /// "High - strong overlap with the required stack".
    pub fn from_leading_word(text: &str) -> Option<Self> {
        let word: String = text
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match word.as_str() {
            "high" | "strong" => Some(SkillsMatch::High),
            "medium" | "moderate" => Some(SkillsMatch::Medium),
            "low" | "weak" => Some(SkillsMatch::Low),
            _ => None,
        }
    }
}

/// Narrative part of an LLM analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Narrative {
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Per-category view of `keySkills` and `missingRequirements`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillBreakdown {
    pub key_skills: Skills,
    pub missing_requirements: Skills,
}

/// Which route produced the candidate profile behind an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Provider,
    Llm,
    Heuristic,
}

/// Diagnostics attached to freshly computed analyses. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub text_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_source: Option<ProfileSource>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub validation_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of matching a resume against a job description.
///
/// `fallback == true` marks heuristic, low-confidence results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub education_level: String,
    pub years_experience: String,
    pub skills_match: SkillsMatch,
    pub key_skills: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub overall_score: u8,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skill_breakdown: Option<SkillBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub analysis: Option<Narrative>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub debug_info: Option<DebugInfo>,
}

/// Row of `application_analyses`, one per application.
#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRow {
    #[allow(dead_code)]
    pub application_id: i64,
    #[allow(dead_code)]
    pub job_id: Option<i64>,
    pub education_level: String,
    pub years_experience: String,
    pub skills_match: String,
    pub key_skills: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub overall_score: i32,
    pub fallback: bool,
    pub skill_breakdown: Option<Json<SkillBreakdown>>,
    pub narrative: Option<Json<Narrative>>,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for ResumeAnalysis {
    fn from(row: AnalysisRow) -> Self {
        let overall_score = row.overall_score.clamp(0, 100) as u8;
        ResumeAnalysis {
            education_level: row.education_level,
            years_experience: row.years_experience,
            skills_match: SkillsMatch::from_leading_word(&row.skills_match)
                .unwrap_or_else(|| SkillsMatch::from_score(overall_score)),
            key_skills: row.key_skills,
            missing_requirements: row.missing_requirements,
            overall_score,
            fallback: row.fallback,
            skill_breakdown: row.skill_breakdown.map(|b| b.0),
            analysis: row.narrative.map(|n| n.0),
            debug_info: None,
        }
    }
}
