use std::sync::LazyLock;

use regex::Regex;

use crate::models::profile::ContactInfo;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z.'-]*(?: [A-Z][A-Za-z.'-]*)*, ?[A-Z]{2})\b").unwrap()
});

/// Pulls contact details. Email and phone are searched in the whole text;
/// name and location only in the preamble before the first section header.
pub fn extract_contact(preamble: &str, full_text: &str) -> ContactInfo {
    let email = EMAIL
        .find(full_text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let phone = PHONE
        .find(full_text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let location = preamble
        .lines()
        .filter(|l| !EMAIL.is_match(l))
        .find_map(|l| LOCATION.captures(l))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let name = preamble
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .filter(|l| looks_like_name(l))
        .map(String::from)
        .unwrap_or_default();

    ContactInfo {
        name,
        email,
        phone,
        location,
    }
}

fn looks_like_name(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (1..=5).contains(&words)
        && !line.contains('@')
        && !line.contains(',')
        && !line.chars().any(|c| c.is_ascii_digit())
}
