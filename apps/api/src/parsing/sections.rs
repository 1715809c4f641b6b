//! Section detection: splits raw resume text into titled, typed sections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Education,
    Experience,
    Skills,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
}

/// Header keywords per section type. Checked in table order; the first
/// matching row wins.
pub const SECTION_KEYWORDS: &[(SectionType, &[&str])] = &[
    (
        SectionType::Education,
        &[
            "education",
            "academic background",
            "educational background",
            "university",
            "college",
            "school",
            "institute",
            "academy",
            "bachelor",
            "master",
            "phd",
            "doctorate",
            "degree",
            "diploma",
            "certificate",
            "graduated",
            "graduation",
        ],
    ),
    (
        SectionType::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "work history",
            "employment history",
            "career history",
            "work",
            "employment",
            "career",
            "professional",
        ],
    ),
    (
        SectionType::Skills,
        &[
            "skills",
            "technical skills",
            "core competencies",
            "key skills",
            "areas of expertise",
            "skills and expertise",
            "expertise",
            "competencies",
            "technologies",
        ],
    ),
];

/// Classifies a single line as a section header.
///
/// A line is a header when its lowercase text equals a keyword (optionally
/// followed by `:`), or when the line is entirely uppercase and contains a
/// keyword.
pub fn classify_header(line: &str) -> Option<SectionType> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    let bare = lower.strip_suffix(':').unwrap_or(&lower).trim_end();
    let shouting = is_all_caps(trimmed);

    SECTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| bare == *kw || (shouting && lower.contains(kw)))
        })
        .map(|(section_type, _)| *section_type)
}

fn is_all_caps(line: &str) -> bool {
    line.chars().any(|c| c.is_alphabetic()) && !line.chars().any(|c| c.is_lowercase())
}

/// Splits text into sections in original order. Lines before the first
/// header form an untitled `Other` section; a header line becomes the title
/// of the section it opens.
pub fn split_sections(text: &str) -> Vec<ResumeSection> {
    let mut sections = Vec::new();
    let mut title = String::new();
    let mut section_type = SectionType::Other;
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(next_type) = classify_header(line) {
            push_section(&mut sections, &title, section_type, &lines);
            title = line.trim().to_string();
            section_type = next_type;
            lines.clear();
        } else {
            lines.push(line);
        }
    }
    push_section(&mut sections, &title, section_type, &lines);

    sections
}

fn push_section(
    sections: &mut Vec<ResumeSection>,
    title: &str,
    section_type: SectionType,
    lines: &[&str],
) {
    let content = lines.join("\n").trim().to_string();
    if title.is_empty() && content.is_empty() {
        return;
    }
    sections.push(ResumeSection {
        title: title.to_string(),
        content,
        section_type,
    });
}
