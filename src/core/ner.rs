//! Named-entity recognition seam.
//!
//! The extractors only depend on [`EntityRecognizer`]. The rule-based recognizer
//! shipped here covers dates and organization names with a suffix gazetteer; it
//! never labels people, so name detection falls back to the line heuristic unless
//! a real model is plugged in.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::CoreError;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{4}|\d{1,2}/\d{4}|(?:19|20)\d{2}|present)\b",
    )
    .unwrap()
});

static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:[A-Z][\w&.']*\s+){0,4}(?:Inc|Corp|Corporation|LLC|Ltd|Co|Company|Technologies|Labs|Group|Systems|Solutions|University|College|Institute)\b\.?",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Person,
    Org,
    Date,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub label: EntityLabel,
    pub text: String,
}

impl EntitySpan {
    pub fn new(label: EntityLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }
}

pub trait EntityRecognizer: Send + Sync {
    /// Spans in encounter order. Remote or model failures should be reported as
    /// [`CoreError::RemoteCapability`] so callers can degrade instead of aborting.
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, CoreError>;
}

pub fn first_with_label<'a>(spans: &'a [EntitySpan], label: &EntityLabel) -> Option<&'a str> {
    spans
        .iter()
        .find(|span| &span.label == label)
        .map(|span| span.text.as_str())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecognizer;

impl EntityRecognizer for NullRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, CoreError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedRecognizer;

impl EntityRecognizer for RuleBasedRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, CoreError> {
        let mut found: Vec<(usize, EntitySpan)> = Vec::new();

        for m in ORG_RE.find_iter(text) {
            found.push((
                m.start(),
                EntitySpan::new(EntityLabel::Org, m.as_str().trim()),
            ));
        }

        for m in DATE_RE.find_iter(text) {
            let inside_org = found
                .iter()
                .any(|(start, span)| m.start() >= *start && m.start() < start + span.text.len());
            if !inside_org {
                found.push((m.start(), EntitySpan::new(EntityLabel::Date, m.as_str())));
            }
        }

        found.sort_by_key(|(start, _)| *start);
        Ok(found.into_iter().map(|(_, span)| span).collect())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::HashMap;

    use super::*;

    /// Returns pinned spans for exact input strings and nothing otherwise.
    #[derive(Debug, Default)]
    pub struct StaticRecognizer {
        spans: HashMap<String, Vec<EntitySpan>>,
    }

    impl StaticRecognizer {
        pub fn with(mut self, text: &str, spans: Vec<EntitySpan>) -> Self {
            self.spans.insert(text.to_string(), spans);
            self
        }
    }

    impl EntityRecognizer for StaticRecognizer {
        fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, CoreError> {
            Ok(self.spans.get(text).cloned().unwrap_or_default())
        }
    }

    pub struct FailingRecognizer {
        remote: bool,
    }

    impl FailingRecognizer {
        pub fn remote() -> Self {
            Self { remote: true }
        }

        pub fn internal() -> Self {
            Self { remote: false }
        }
    }

    impl EntityRecognizer for FailingRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, CoreError> {
            if self.remote {
                Err(CoreError::remote("ner", "model server timed out"))
            } else {
                Err(CoreError::InvalidRequest("recognizer rejected input".to_string()))
            }
        }
    }
}
