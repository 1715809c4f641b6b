//! Heuristic resume parser.
//!
//! Dependency-free structuring of raw resume text: section detection by a
//! keyword table, then per-section entry decomposition. Used when LLM
//! extraction is disabled and as the baseline that fills gaps in an LLM
//! profile.

pub mod contact;
pub mod education;
pub mod experience;
pub mod sections;
pub mod skills;

use std::sync::LazyLock;

use regex::Regex;

use crate::models::profile::{CandidateProfile, SkillCategory};
use crate::parsing::contact::extract_contact;
use crate::parsing::education::parse_education_entries;
use crate::parsing::experience::parse_experience_entries;
use crate::parsing::sections::{split_sections, SectionType};
use crate::parsing::skills::parse_skills;

/// Blank-line boundary between entries of one section.
pub(crate) static ENTRY_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

/// Builds a candidate profile from raw text using only heuristics.
pub fn parse_resume(text: &str) -> CandidateProfile {
    let text = text.replace("\r\n", "\n");
    let sections = split_sections(&text);

    let preamble = sections
        .first()
        .filter(|s| s.section_type == SectionType::Other && s.title.is_empty())
        .map(|s| s.content.as_str())
        .unwrap_or("");

    let mut profile = CandidateProfile {
        contact_info: extract_contact(preamble, &text),
        ..Default::default()
    };

    for section in &sections {
        match section.section_type {
            SectionType::Education => profile
                .education
                .extend(parse_education_entries(&section.content)),
            SectionType::Experience => profile
                .experience
                .extend(parse_experience_entries(&section.content)),
            SectionType::Skills => {
                let parsed = parse_skills(&section.content);
                for (category, bucket) in [
                    (SkillCategory::Technical, parsed.technical),
                    (SkillCategory::Soft, parsed.soft),
                    (SkillCategory::Industry, parsed.industry),
                ] {
                    for skill in bucket {
                        profile.skills.add(category, &skill);
                    }
                }
            }
            SectionType::Other => {}
        }
    }

    profile
}
