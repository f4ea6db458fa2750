use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::CoreError;
use super::models::EducationEntry;

pub const STAGE: &str = "education";

const DEGREE_KEYWORDS: [&str; 6] = ["bachelor", "master", "phd", "degree", "university", "college"];

static GPA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bgpa\s*[:\-]?\s*(\d(?:\.\d{1,2})?)").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// One entry per non-blank line; lines are never merged.
pub fn extract_education(section_lines: &[&str]) -> Result<Vec<EducationEntry>, CoreError> {
    Ok(section_lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect())
}

fn parse_line(line: &str) -> EducationEntry {
    let lowered = line.to_lowercase();
    let degree = DEGREE_KEYWORDS
        .iter()
        .find(|keyword| lowered.contains(*keyword))
        .map(|keyword| title_case(keyword))
        .unwrap_or_default();

    let (institution, field) = match line.split(',').map(str::trim).collect::<Vec<&str>>()[..] {
        [first, second, ..] => (first.to_string(), second.to_string()),
        _ => (String::new(), String::new()),
    };

    let years: Vec<&str> = YEAR_RE.find_iter(line).map(|m| m.as_str()).collect();
    let (start_date, end_date) = match years.as_slice() {
        [] => (None, String::new()),
        [only] => (None, only.to_string()),
        [first, .., last] => (Some(first.to_string()), last.to_string()),
    };

    EducationEntry {
        institution,
        degree,
        field,
        start_date,
        end_date,
        gpa: GPA_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
