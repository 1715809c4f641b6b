//! Skills section: categorized skill lists.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::profile::{SkillCategory, Skills};

/// Trigger words that switch the running category. Checked in table order.
const CATEGORY_TRIGGERS: &[(SkillCategory, &[&str])] = &[
    (SkillCategory::Technical, &["technical", "programming", "tools"]),
    (
        SkillCategory::Soft,
        &["soft", "interpersonal", "communication"],
    ),
    (SkillCategory::Industry, &["industry", "domain"]),
];

/// Words that make up a bare sub-heading such as "Soft Skills" or
/// "Programming Languages". "communication" is absent on purpose: alone it
/// is a skill, not a heading.
const LABEL_WORDS: &[&str] = &[
    "technical",
    "programming",
    "tools",
    "soft",
    "interpersonal",
    "industry",
    "domain",
    "skills",
    "skill",
    "languages",
    "knowledge",
    "expertise",
    "and",
    "&",
    "/",
];

static SKILL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[,;]|\band\b").unwrap());

/// Matches whole words only, so "Microsoft" never reads as "soft".
pub fn category_trigger(text: &str) -> Option<SkillCategory> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    CATEGORY_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| words.contains(t)))
        .map(|(category, _)| *category)
}

fn is_label_only(line: &str) -> bool {
    line.to_lowercase()
        .split_whitespace()
        .all(|word| LABEL_WORDS.contains(&word))
}

/// Splits a skill list on commas, semicolons and the word "and".
pub fn split_skill_list(items: &str) -> Vec<String> {
    SKILL_SEPARATOR
        .split(items)
        .map(|s| s.trim().trim_matches(|c: char| matches!(c, '.' | '-' | '*' | '•')).trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Walks the section line by line with a running category (technical by
/// default). A `Label: items` line switches on its label; a plain line
/// switches on its whole text. Items on the line are then filed under the
/// current category.
pub fn parse_skills(content: &str) -> Skills {
    let mut skills = Skills::default();
    let mut current = SkillCategory::Technical;

    for raw in content.lines() {
        let line = raw
            .trim()
            .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•'))
            .trim();
        if line.is_empty() {
            continue;
        }

        let (label, items, labelled) = match line.split_once(':') {
            Some((label, items)) => (label, items, true),
            None => (line, line, false),
        };
        if let Some(category) = category_trigger(label) {
            current = category;
        }
        if !labelled && is_label_only(line) {
            continue;
        }

        for skill in split_skill_list(items) {
            skills.add(current, &skill);
        }
    }

    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_line_then_soft_trigger_line() {
        let skills = parse_skills("Technical: Python, Go\nLeadership, Communication");
        assert_eq!(skills.technical, vec!["Python", "Go"]);
        assert_eq!(skills.soft, vec!["Leadership", "Communication"]);
        assert!(skills.industry.is_empty());
    }

    #[test]
    fn test_default_category_is_technical() {
        let skills = parse_skills("Rust; SQL and Kubernetes");
        assert_eq!(skills.technical, vec!["Rust", "SQL", "Kubernetes"]);
    }

    #[test]
    fn test_bare_headings_switch_without_adding_skills() {
        let skills = parse_skills("Soft Skills\nTeamwork, Mentoring\nDomain Knowledge\nFintech, Payments");
        assert_eq!(skills.soft, vec!["Teamwork", "Mentoring"]);
        assert_eq!(skills.industry, vec!["Fintech", "Payments"]);
        assert!(skills.technical.is_empty());
    }

    #[test]
    fn test_category_persists_across_lines() {
        let skills = parse_skills("Interpersonal: Negotiation\nPublic speaking");
        assert_eq!(skills.soft, vec!["Negotiation", "Public speaking"]);
    }

    #[test]
    fn test_and_inside_words_is_not_a_separator() {
        assert_eq!(
            split_skill_list("Android, Command line and Bash"),
            vec!["Android", "Command line", "Bash"]
        );
    }

    #[test]
    fn test_trigger_words_match_whole_words() {
        assert_eq!(category_trigger("Microsoft Excel"), None);
        assert_eq!(
            category_trigger("Communication skills"),
            Some(SkillCategory::Soft)
        );
    }

    #[test]
    fn test_bullets_are_stripped() {
        let skills = parse_skills("• Docker\n- Terraform");
        assert_eq!(skills.technical, vec!["Docker", "Terraform"]);
    }
}
