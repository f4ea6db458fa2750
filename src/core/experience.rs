//! Work history extraction.
//!
//! Every non-blank line opens a new entry and closes the previous one, so an
//! entry never spans more than one source line.

use tracing::warn;

use super::errors::CoreError;
use super::models::ExperienceEntry;
use super::ner::{first_with_label, EntityLabel, EntityRecognizer, EntitySpan};
use super::normalization::normalize_title;

pub const STAGE: &str = "experience";

const CURRENT_MARKERS: [&str; 3] = ["present", "current", "now"];

pub fn extract_experience(
    section_lines: &[&str],
    recognizer: &dyn EntityRecognizer,
    normalize_titles: bool,
) -> Result<Vec<ExperienceEntry>, CoreError> {
    let mut entries = Vec::new();
    let mut open: Option<ExperienceEntry> = None;

    for raw in section_lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let entry = parse_line(line, recognizer, normalize_titles)?;
        if let Some(done) = open.replace(entry) {
            entries.push(done);
        }
    }

    if let Some(done) = open {
        entries.push(done);
    }
    Ok(entries)
}

fn parse_line(
    line: &str,
    recognizer: &dyn EntityRecognizer,
    normalize_titles: bool,
) -> Result<ExperienceEntry, CoreError> {
    let spans = recognize_line(line, recognizer)?;

    let mut company = first_with_label(&spans, &EntityLabel::Org).map(str::to_string);
    let mut dates = spans
        .iter()
        .filter(|span| span.label == EntityLabel::Date)
        .map(|span| span.text.clone());
    let start_date = dates.next().unwrap_or_default();
    let end_date = dates.next().unwrap_or_default();

    let mut position = String::new();
    let parts: Vec<&str> = line.split('-').map(str::trim).collect();
    if parts.len() >= 2 {
        position = if normalize_titles {
            normalize_title(parts[0])
        } else {
            parts[0].to_string()
        };
        if company.is_none() {
            company = Some(parts[1].to_string());
        }
    }

    let current = CURRENT_MARKERS
        .iter()
        .any(|marker| end_date.trim().eq_ignore_ascii_case(marker));

    Ok(ExperienceEntry {
        company: company.unwrap_or_default(),
        position,
        start_date,
        end_date,
        current,
        description: line.to_string(),
        achievements: Vec::new(),
    })
}

fn recognize_line(
    line: &str,
    recognizer: &dyn EntityRecognizer,
) -> Result<Vec<EntitySpan>, CoreError> {
    match recognizer.recognize(line) {
        Ok(spans) => Ok(spans),
        Err(err) if err.is_degradable() => {
            warn!(stage = STAGE, error = %err, "entity recognizer unavailable for line");
            Ok(Vec::new())
        }
        Err(err) => Err(err.in_stage(STAGE)),
    }
}
