//! Parse-then-validate boundary for candidate profiles.
//!
//! Untrusted JSON (LLM output, provider fields) lands in the `Raw*` types,
//! is repaired into a `CandidateProfile` by `clean_profile`, and is checked
//! by `validate_profile`. Nothing downstream sees the raw shapes.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::profile::{
    CandidateProfile, ContactInfo, Education, Experience, SkillCategory, Skills,
};
use crate::parsing::education::detect_level;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

const OPEN_ENDED: &[&str] = &["present", "current", "now"];

/// Accepts a string, number, bool or null where a string is expected.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, found {other}"
        ))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawContact {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEducation {
    #[serde(deserialize_with = "lenient_string", alias = "school")]
    pub institution: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "lenient_string", alias = "fieldOfStudy")]
    pub field: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawExperience {
    #[serde(deserialize_with = "lenient_string", alias = "employer")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_string", alias = "position", alias = "role")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// Skills either as the categorized object or as one flat list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSkills {
    Flat(Vec<String>),
    Categorized {
        #[serde(default)]
        technical: Option<Vec<String>>,
        #[serde(default)]
        soft: Option<Vec<String>>,
        #[serde(default)]
        industry: Option<Vec<String>>,
    },
}

impl Default for RawSkills {
    fn default() -> Self {
        RawSkills::Flat(Vec::new())
    }
}

impl RawSkills {
    /// Flat lists are treated as technical skills.
    pub fn into_skills(self) -> Skills {
        let mut skills = Skills::default();
        let buckets = match self {
            RawSkills::Flat(items) => vec![(SkillCategory::Technical, items)],
            RawSkills::Categorized {
                technical,
                soft,
                industry,
            } => vec![
                (SkillCategory::Technical, technical.unwrap_or_default()),
                (SkillCategory::Soft, soft.unwrap_or_default()),
                (SkillCategory::Industry, industry.unwrap_or_default()),
            ],
        };
        for (category, items) in buckets {
            for item in items {
                skills.add(category, &item);
            }
        }
        skills
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfile {
    pub contact_info: Option<RawContact>,
    pub education: Option<Vec<RawEducation>>,
    pub experience: Option<Vec<RawExperience>>,
    pub skills: Option<RawSkills>,
}

fn clean(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn clean_opt(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Repairs a raw profile: trims every string, defaults missing lists to
/// empty, and drops education/experience entries missing either of their
/// identifying fields.
pub fn clean_profile(raw: RawProfile) -> CandidateProfile {
    let contact = raw.contact_info.unwrap_or_default();
    let contact_info = ContactInfo {
        name: clean(contact.name),
        email: clean(contact.email),
        phone: clean(contact.phone),
        location: clean(contact.location),
    };

    let education = raw
        .education
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| {
            let institution = clean(e.institution);
            let degree = clean(e.degree);
            if institution.is_empty() || degree.is_empty() {
                return None;
            }
            let level = Some(detect_level(&degree));
            Some(Education {
                institution,
                degree,
                field: clean(e.field),
                year: clean_opt(e.year),
                gpa: clean_opt(e.gpa),
                level,
            })
        })
        .collect();

    let experience = raw
        .experience
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| {
            let company = clean(e.company);
            let title = clean(e.title);
            if company.is_empty() || title.is_empty() {
                return None;
            }
            Some(Experience {
                company,
                title,
                start_date: clean_opt(e.start_date),
                end_date: clean_opt(e.end_date),
                description: clean(e.description),
            })
        })
        .collect();

    CandidateProfile {
        contact_info,
        education,
        experience,
        skills: raw.skills.unwrap_or_default().into_skills(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

fn is_year_like(value: &str) -> bool {
    YEAR_PATTERN.is_match(value)
}

fn is_end_date_like(value: &str) -> bool {
    is_year_like(value) || OPEN_ENDED.contains(&value.trim().to_lowercase().as_str())
}

/// Checks a profile and collects every problem found. Never fails; callers
/// decide how much an invalid profile matters.
pub fn validate_profile(profile: &CandidateProfile) -> ValidationReport {
    let mut errors = Vec::new();
    let contact = &profile.contact_info;

    if contact.name.trim().is_empty() {
        errors.push("contactInfo.name is missing".to_string());
    }
    if contact.email.trim().is_empty() && contact.phone.trim().is_empty() {
        errors.push("contactInfo requires an email or a phone number".to_string());
    }

    for (i, entry) in profile.education.iter().enumerate() {
        if entry.institution.trim().is_empty() {
            errors.push(format!("education[{i}].institution is missing"));
        }
        if entry.degree.trim().is_empty() {
            errors.push(format!("education[{i}].degree is missing"));
        }
        if let Some(year) = &entry.year {
            if !is_year_like(year) {
                errors.push(format!(
                    "education[{i}].year has an invalid year \"{year}\" (expected 19xx or 20xx)"
                ));
            }
        }
    }

    for (i, entry) in profile.experience.iter().enumerate() {
        if entry.company.trim().is_empty() {
            errors.push(format!("experience[{i}].company is missing"));
        }
        if entry.title.trim().is_empty() {
            errors.push(format!("experience[{i}].title is missing"));
        }
        if let Some(start) = &entry.start_date {
            if !is_year_like(start) {
                errors.push(format!(
                    "experience[{i}].startDate has an invalid year \"{start}\""
                ));
            }
        }
        if let Some(end) = &entry.end_date {
            if !is_end_date_like(end) {
                errors.push(format!(
                    "experience[{i}].endDate has an invalid year \"{end}\""
                ));
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// A provider-supplied profile good enough to skip LLM extraction.
pub fn is_sufficiently_complete(profile: &CandidateProfile) -> bool {
    validate_profile(profile).is_valid
        && (!profile.education.is_empty() || !profile.experience.is_empty())
}
