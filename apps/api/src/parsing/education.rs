//! Education entries and degree-level detection.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::profile::{Education, EducationLevel};
use crate::parsing::ENTRY_BREAK;

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static GPA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgpa\b\s*[:\-]?\s*(\d(?:\.\d{1,2})?)").unwrap());

const EDGE_PUNCTUATION: &[char] = &[',', '-', '–', '—', '|', '(', ')', ' ', ':'];

/// Maps a free-text degree string to an `EducationLevel`.
///
/// Full words ("master", "bachelor") match anywhere; dotted abbreviations are
/// compared after removing dots. Two-letter forms that double as English
/// words ("MA", "BA", "AS") only count as the first token.
pub fn detect_level(degree: &str) -> EducationLevel {
    let lower = degree.to_lowercase();
    let tokens: Vec<String> = lower
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '/'))
        .map(|t| t.replace('.', ""))
        .filter(|t| !t.is_empty())
        .collect();
    let first = tokens.first().map(String::as_str).unwrap_or("");
    let has_any = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_str()));

    if lower.contains("doctor") || has_any(&["phd", "dphil", "edd", "md"]) {
        EducationLevel::Doctorate
    } else if lower.contains("master")
        || has_any(&["ms", "msc", "mba", "meng", "mfa", "mphil", "mtech"])
        || first == "ma"
    {
        EducationLevel::Masters
    } else if lower.contains("bachelor")
        || has_any(&["bs", "bsc", "beng", "bfa", "btech", "bba"])
        || first == "ba"
    {
        EducationLevel::Bachelors
    } else if lower.contains("associate") || has_any(&["aa", "aas"]) || first == "as" {
        EducationLevel::Associates
    } else if lower.contains("certif") || lower.contains("diploma") {
        EducationLevel::Certification
    } else {
        EducationLevel::Other
    }
}

pub fn parse_education_entries(content: &str) -> Vec<Education> {
    ENTRY_BREAK
        .split(content)
        .filter_map(parse_education_entry)
        .collect()
}

fn parse_education_entry(entry: &str) -> Option<Education> {
    let lines: Vec<&str> = entry
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }

    let year = YEAR.find(entry).map(|m| m.as_str().to_string());
    let second = lines[1];
    let (degree, field) = match YEAR.find(second) {
        Some(m) => (
            second[..m.start()].trim_matches(EDGE_PUNCTUATION),
            second[m.end()..].trim_matches(EDGE_PUNCTUATION),
        ),
        None => (second, ""),
    };
    let gpa = GPA
        .captures(entry)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    Some(Education {
        institution: lines[0].to_string(),
        degree: degree.to_string(),
        field: field.to_string(),
        year,
        gpa,
        level: Some(detect_level(degree)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_level_masters_abbreviation() {
        assert_eq!(
            detect_level("M.S. Computer Science"),
            EducationLevel::Masters
        );
    }

    #[test]
    fn test_detect_level_phd() {
        assert_eq!(detect_level("PhD in Physics"), EducationLevel::Doctorate);
    }

    #[test]
    fn test_detect_level_associate() {
        assert_eq!(
            detect_level("Associate of Arts"),
            EducationLevel::Associates
        );
    }

    #[test]
    fn test_detect_level_other_buckets() {
        assert_eq!(
            detect_level("Bachelor of Engineering"),
            EducationLevel::Bachelors
        );
        assert_eq!(detect_level("B.Sc. Mathematics"), EducationLevel::Bachelors);
        assert_eq!(detect_level("MBA"), EducationLevel::Masters);
        assert_eq!(
            detect_level("Doctor of Medicine"),
            EducationLevel::Doctorate
        );
        assert_eq!(
            detect_level("AWS Certified Solutions Architect"),
            EducationLevel::Certification
        );
        assert_eq!(detect_level("High School"), EducationLevel::Other);
    }

    #[test]
    fn test_short_words_only_count_as_first_token() {
        assert_eq!(detect_level("Diploma as Chef"), EducationLevel::Certification);
        assert_eq!(detect_level("BA History"), EducationLevel::Bachelors);
    }

    #[test]
    fn test_entry_splits_degree_and_field_around_year() {
        let entries = parse_education_entries("Stanford University\nB.Sc. 2015 Computer Science");
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.institution, "Stanford University");
        assert_eq!(e.degree, "B.Sc.");
        assert_eq!(e.field, "Computer Science");
        assert_eq!(e.year.as_deref(), Some("2015"));
        assert_eq!(e.level, Some(EducationLevel::Bachelors));
    }

    #[test]
    fn test_entry_year_on_another_line() {
        let entries =
            parse_education_entries("MIT\nMaster of Science\nGraduated 2012\nGPA: 3.85");
        let e = &entries[0];
        assert_eq!(e.degree, "Master of Science");
        assert_eq!(e.field, "");
        assert_eq!(e.year.as_deref(), Some("2012"));
        assert_eq!(e.gpa.as_deref(), Some("3.85"));
        assert_eq!(e.level, Some(EducationLevel::Masters));
    }

    #[test]
    fn test_multiple_entries_and_single_line_dropped() {
        let content = "MIT\nPhD, 2010, Physics\n\nSelf-taught\n\nCommunity College\nAssociate of Science 2004";
        let entries = parse_education_entries(content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].degree, "PhD");
        assert_eq!(entries[0].field, "Physics");
        assert_eq!(entries[1].level, Some(EducationLevel::Associates));
    }
}
