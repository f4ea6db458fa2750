//! Section segmentation.
//!
//! [`KeywordSectionClassifier`] is the authoritative strategy: a cursor starts at
//! [`SectionLabel::Other`] and moves whenever a line contains a header keyword.
//! The header line itself belongs to the section it opens. [`LineWindowScanner`]
//! keeps the older behaviour of scanning a bounded window after the first header
//! match, and is only selected through configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLabel {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Other,
}

impl SectionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionLabel::Summary => "summary",
            SectionLabel::Experience => "experience",
            SectionLabel::Education => "education",
            SectionLabel::Skills => "skills",
            SectionLabel::Projects => "projects",
            SectionLabel::Other => "other",
        }
    }
}

// Order matters: the first row with a matching keyword wins.
const HEADER_KEYWORDS: [(SectionLabel, &[&str]); 5] = [
    (
        SectionLabel::Experience,
        &["experience", "employment", "work history"],
    ),
    (
        SectionLabel::Education,
        &["education", "academic background", "qualifications"],
    ),
    (
        SectionLabel::Skills,
        &["skills", "technical skills", "core competencies"],
    ),
    (SectionLabel::Projects, &["projects"]),
    (
        SectionLabel::Summary,
        &["summary", "objective", "profile", "about", "overview"],
    ),
];

/// Returns the section a line would open, if it looks like a header.
pub fn header_label(line: &str) -> Option<SectionLabel> {
    let lowered = line.trim().to_lowercase();
    HEADER_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(label, _)| *label)
}

/// Lines grouped by section, remembering the order in which sections were found.
/// A label that recurs later in the document is merged into one list; `runs`
/// keeps the contiguous stretches in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap<'a> {
    order: Vec<SectionLabel>,
    sections: HashMap<SectionLabel, Vec<&'a str>>,
    runs: Vec<(SectionLabel, Vec<&'a str>)>,
}

impl<'a> SectionMap<'a> {
    pub fn push(&mut self, label: SectionLabel, line: &'a str) {
        self.extend(label, &[line]);
    }

    pub fn extend(&mut self, label: SectionLabel, lines: &[&'a str]) {
        self.entry(label).extend_from_slice(lines);
        if let Some((last, run)) = self.runs.last_mut() {
            if *last == label {
                run.extend_from_slice(lines);
                return;
            }
        }
        self.runs.push((label, lines.to_vec()));
    }

    pub fn runs(&self) -> &[(SectionLabel, Vec<&'a str>)] {
        &self.runs
    }

    /// Content lines of a section with the header of every run removed, so a
    /// repeated header ("Experience, continued") is not read as content.
    pub fn body(&self, label: SectionLabel) -> Vec<&'a str> {
        self.runs
            .iter()
            .filter(|(run_label, _)| *run_label == label)
            .flat_map(|(_, run)| section_body(label, run))
            .collect()
    }

    pub fn lines(&self, label: SectionLabel) -> &[&'a str] {
        self.sections
            .get(&label)
            .map(|lines| lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn labels(&self) -> &[SectionLabel] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionLabel, &[&'a str])> + '_ {
        self.order
            .iter()
            .map(move |label| (*label, self.lines(*label)))
    }

    fn entry(&mut self, label: SectionLabel) -> &mut Vec<&'a str> {
        if !self.sections.contains_key(&label) {
            self.order.push(label);
        }
        self.sections.entry(label).or_default()
    }
}

pub trait SectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn split<'a>(&self, lines: &[&'a str]) -> SectionMap<'a>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordSectionClassifier;

impl SectionStrategy for KeywordSectionClassifier {
    fn name(&self) -> &'static str {
        "classifier"
    }

    fn split<'a>(&self, lines: &[&'a str]) -> SectionMap<'a> {
        let mut map = SectionMap::default();
        let mut current = SectionLabel::Other;

        for line in lines {
            if let Some(label) = header_label(line) {
                current = label;
            }
            map.push(current, line);
        }

        map
    }
}

pub fn classify<'a>(lines: &[&'a str]) -> SectionMap<'a> {
    KeywordSectionClassifier.split(lines)
}

#[derive(Debug, Clone, Copy)]
pub struct LineWindowScanner {
    pub window: usize,
}

impl Default for LineWindowScanner {
    fn default() -> Self {
        Self { window: 9 }
    }
}

impl LineWindowScanner {
    fn experience<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        let Some(start) = lines.iter().position(|line| {
            contains_any(line, &["experience", "employment", "work history"])
        }) else {
            return Vec::new();
        };

        lines[start + 1..]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .take_while(|line| !contains_any(line, &["education", "skills", "projects"]))
            .copied()
            .collect()
    }

    fn skills<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        let Some(start) = lines
            .iter()
            .position(|line| contains_any(line, &["skill"]) && word_count(line) <= 3)
        else {
            return Vec::new();
        };

        lines[start + 1..]
            .iter()
            .take(self.window)
            .take_while(|line| {
                let lowered = line.trim().to_lowercase();
                !lowered.is_empty()
                    && !["experience", "education", "work", "employment"]
                        .iter()
                        .any(|stop| lowered.starts_with(stop))
            })
            .copied()
            .collect()
    }

    fn education<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        let Some(start) = lines
            .iter()
            .position(|line| contains_any(line, &["education"]) && word_count(line) <= 3)
        else {
            return Vec::new();
        };

        lines[start + 1..]
            .iter()
            .take(self.window)
            .filter(|line| !line.trim().is_empty())
            .take_while(|line| !contains_any(line, &["experience", "skills", "work"]))
            .copied()
            .collect()
    }
}

impl SectionStrategy for LineWindowScanner {
    fn name(&self) -> &'static str {
        "line_window"
    }

    /// Windows may overlap or leave lines unassigned; only the three scanned
    /// sections are populated.
    fn split<'a>(&self, lines: &[&'a str]) -> SectionMap<'a> {
        let mut map = SectionMap::default();
        for (label, window) in [
            (SectionLabel::Experience, self.experience(lines)),
            (SectionLabel::Education, self.education(lines)),
            (SectionLabel::Skills, self.skills(lines)),
        ] {
            if !window.is_empty() {
                map.extend(label, &window);
            }
        }
        map
    }
}

/// Section lines without the opening header. Text after a colon on the header
/// line (`Skills: Rust, Go`) is kept as content.
pub fn section_body<'a>(label: SectionLabel, lines: &[&'a str]) -> Vec<&'a str> {
    match lines.split_first() {
        Some((first, rest)) if header_label(first) == Some(label) => {
            let mut body = Vec::with_capacity(lines.len());
            if let Some((_, inline)) = first.split_once(':') {
                if !inline.trim().is_empty() {
                    body.push(inline);
                }
            }
            body.extend_from_slice(rest);
            body
        }
        _ => lines.to_vec(),
    }
}

fn contains_any(line: &str, keywords: &[&str]) -> bool {
    let lowered = line.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}
