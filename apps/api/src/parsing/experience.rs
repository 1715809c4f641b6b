//! Experience entries: company, title, date range and description.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::profile::Experience;
use crate::parsing::ENTRY_BREAK;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const RANGE_SEP: &str = r"\s*(?:-|–|—|to)\s*";
const OPEN_END: &str = r"present|current|now";

static MONTH_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH}\.?\s+\d{{4}}){RANGE_SEP}({MONTH}\.?\s+\d{{4}}|{OPEN_END})\b"
    ))
    .unwrap()
});

static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b((?:19|20)\d{{2}}){RANGE_SEP}((?:19|20)\d{{2}}|{OPEN_END})\b"
    ))
    .unwrap()
});

static SLASH_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}}/\d{{4}}){RANGE_SEP}(\d{{1,2}}/\d{{4}}|{OPEN_END})\b"
    ))
    .unwrap()
});

static ANY_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static LEADING_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\s*(?:{MONTH}|\d{{4}})\b")).unwrap());

/// Date range found in an entry, plus the matched text so the line carrying
/// it can be left out of the description.
#[derive(Debug, Clone, PartialEq)]
pub struct DateSpan {
    pub start: Option<String>,
    pub end: Option<String>,
    pub matched: Option<String>,
}

/// Tries month-name ranges, then bare year ranges, then slash dates. When no
/// range matches, the first two 4-digit years anywhere in the entry are used.
pub fn extract_date_span(entry: &str) -> DateSpan {
    for pattern in [&*MONTH_RANGE, &*YEAR_RANGE, &*SLASH_RANGE] {
        if let Some(caps) = pattern.captures(entry) {
            return DateSpan {
                start: caps.get(1).map(|m| m.as_str().to_string()),
                end: caps.get(2).map(|m| m.as_str().to_string()),
                matched: caps.get(0).map(|m| m.as_str().to_string()),
            };
        }
    }

    let mut years = ANY_YEAR.find_iter(entry).map(|m| m.as_str().to_string());
    DateSpan {
        start: years.next(),
        end: years.next(),
        matched: None,
    }
}

/// True when a line opens with a month name or a bare year.
pub fn starts_with_date(line: &str) -> bool {
    LEADING_DATE.is_match(line)
}

pub fn parse_experience_entries(content: &str) -> Vec<Experience> {
    ENTRY_BREAK
        .split(content)
        .filter_map(parse_experience_entry)
        .collect()
}

fn parse_experience_entry(entry: &str) -> Option<Experience> {
    let lines: Vec<&str> = entry
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }

    let span = extract_date_span(entry);
    let (company, title) = if starts_with_date(lines[0]) {
        (lines[1], lines[0])
    } else {
        (lines[0], lines[1])
    };

    let description = lines[2..]
        .iter()
        .filter(|line| !is_date_only(line, span.matched.as_deref()))
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    Some(Experience {
        company: company.to_string(),
        title: title.to_string(),
        start_date: span.start,
        end_date: span.end,
        description,
    })
}

fn is_date_only(line: &str, matched: Option<&str>) -> bool {
    match matched {
        Some(m) => !line
            .replacen(m, "", 1)
            .chars()
            .any(|c| c.is_alphanumeric()),
        None => false,
    }
}
