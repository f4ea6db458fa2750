//! Named regex patterns used by the personal-info extractor.
//!
//! Kept apart from entity recognition so each pattern can be tested on its own.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,2}[-.\s]?)?(\(?\d{3}\)?[-.\s]?)?\d{3}[-.\s]?\d{4}").unwrap()
});
static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/[\w-]+").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>'"\)]+"#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternName {
    Email,
    Phone,
    LinkedIn,
    Url,
}

pub struct NamedPattern {
    pub name: PatternName,
    regex: &'static Lazy<Regex>,
}

impl NamedPattern {
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }

    pub fn find_all<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        let regex: &'static Regex = Lazy::force(self.regex);
        regex.find_iter(text).map(|m| m.as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

pub static PATTERNS: [NamedPattern; 4] = [
    NamedPattern {
        name: PatternName::Email,
        regex: &EMAIL_RE,
    },
    NamedPattern {
        name: PatternName::Phone,
        regex: &PHONE_RE,
    },
    NamedPattern {
        name: PatternName::LinkedIn,
        regex: &LINKEDIN_RE,
    },
    NamedPattern {
        name: PatternName::Url,
        regex: &URL_RE,
    },
];

pub fn pattern(name: PatternName) -> &'static NamedPattern {
    PATTERNS
        .iter()
        .find(|p| p.name == name)
        .unwrap_or(&PATTERNS[0])
}

pub fn find_email(text: &str) -> Option<&str> {
    pattern(PatternName::Email).find(text)
}

pub fn find_phone(text: &str) -> Option<&str> {
    pattern(PatternName::Phone).find(text)
}

pub fn find_linkedin(text: &str) -> Option<String> {
    pattern(PatternName::LinkedIn)
        .find(text)
        .map(|handle| format!("https://{handle}"))
}

pub fn find_urls(text: &str) -> impl Iterator<Item = &str> {
    pattern(PatternName::Url).find_all(text)
}
