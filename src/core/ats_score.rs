//! ATS compatibility scoring.
//!
//! Four independent sub-scores (keywords, format, content, skills), each in
//! `0..=100`, are combined with [`AtsWeights`] into a weighted mean.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::models::{AtsFeedback, AtsScore, AtsSeverity, AtsWeights, ResumeRecord};

const TECHNICAL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "angular",
    "node.js",
    "sql",
    "mongodb",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "html",
    "css",
    "typescript",
    "spring boot",
    "fastapi",
    "django",
    "flask",
    "postgresql",
    "mysql",
    "redis",
    "elasticsearch",
];

const SOFT_KEYWORDS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "analytical",
    "project management",
    "collaboration",
    "adaptability",
    "creativity",
    "initiative",
];

const ACTION_VERBS: &[&str] = &[
    "achieved",
    "developed",
    "implemented",
    "managed",
    "led",
    "created",
    "designed",
    "optimized",
    "improved",
    "increased",
    "reduced",
    "streamlined",
    "delivered",
];

const CERTIFICATION_KEYWORDS: &[&str] = &[
    "certified",
    "certification",
    "aws certified",
    "pmp",
    "scrum master",
    "agile",
    "cissp",
    "comptia",
    "microsoft certified",
    "google certified",
];

const GENERIC_KEYWORDS: [&[&str]; 4] = [
    TECHNICAL_KEYWORDS,
    SOFT_KEYWORDS,
    ACTION_VERBS,
    CERTIFICATION_KEYWORDS,
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were",
];

const STANDARD_SUGGESTIONS: [&str; 5] = [
    "Use simple, clean formatting without graphics or tables",
    "Include relevant keywords naturally throughout the resume",
    "Start bullet points with strong action verbs",
    "Ensure all dates are in consistent format (MM/YYYY)",
    "Save resume in both PDF and Word formats for different ATS systems",
];

const MAX_SUGGESTIONS: usize = 6;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static QUANTIFIED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+%|\$\d+|\d+\+|increased|decreased|improved|reduced").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtsCategory {
    Keywords,
    Format,
    Content,
    Skills,
}

impl AtsCategory {
    pub fn label(self) -> &'static str {
        match self {
            AtsCategory::Keywords => "Keyword Optimization",
            AtsCategory::Format => "Format Compatibility",
            AtsCategory::Content => "Content Structure",
            AtsCategory::Skills => "Skills Matching",
        }
    }

    fn suggestion(self) -> &'static str {
        match self {
            AtsCategory::Keywords => "Add more industry-specific keywords from target job descriptions",
            AtsCategory::Format => "Use standard section headings (Experience, Education, Skills)",
            AtsCategory::Content => {
                "Include quantifiable achievements with specific numbers and percentages"
            }
            AtsCategory::Skills => "Expand skills section with relevant technical and soft skills",
        }
    }

    fn feedback(self, score: u32, message: String, severity: AtsSeverity) -> AtsFeedback {
        AtsFeedback {
            category: self.label().to_string(),
            score,
            message,
            severity,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AtsScorer {
    weights: AtsWeights,
}

impl AtsScorer {
    pub fn new(weights: AtsWeights) -> Self {
        Self {
            weights: weights.sanitized(),
        }
    }

    pub fn weights(&self) -> &AtsWeights {
        &self.weights
    }

    /// Scores a record, optionally against a job description. A blank job
    /// description is treated as absent.
    pub fn score(&self, record: &ResumeRecord, job_description: Option<&str>) -> AtsScore {
        let text = resume_text(record);
        let job_description = job_description.filter(|job| !job.trim().is_empty());

        let categories = [
            (AtsCategory::Keywords, keyword_score(&text, job_description), self.weights.keywords),
            (AtsCategory::Format, format_score(record), self.weights.format),
            (AtsCategory::Content, content_score(record, &text), self.weights.content),
            (AtsCategory::Skills, skills_score(record, &text), self.weights.skills),
        ];
        for (category, feedback, _) in &categories {
            debug!(category = category.label(), score = feedback.score, "ats category scored");
        }

        let weighted: f64 = categories
            .iter()
            .map(|(_, feedback, weight)| f64::from(feedback.score) * weight)
            .sum();
        let score = (weighted / self.weights.total()).floor().clamp(0.0, 100.0) as u32;

        let low_categories: Vec<AtsCategory> = categories
            .iter()
            .filter(|(_, feedback, _)| feedback.score < 70)
            .map(|(category, _, _)| *category)
            .collect();
        let suggestions = suggestions(score, &low_categories);

        info!(
            score,
            with_job_description = job_description.is_some(),
            "ats score calculated"
        );
        AtsScore {
            score,
            feedback: categories.into_iter().map(|(_, feedback, _)| feedback).collect(),
            suggestions,
        }
    }
}

/// Flattens every populated field of a record into one space-joined string.
pub fn resume_text(record: &ResumeRecord) -> String {
    let info = &record.personal_info;
    let mut parts: Vec<&str> = vec![info.full_name.as_str(), info.email.as_str()];
    parts.extend(record.summary.as_deref());
    parts.extend(record.skills.iter().map(String::as_str));
    for entry in &record.experience {
        parts.extend([
            entry.company.as_str(),
            entry.position.as_str(),
            entry.description.as_str(),
        ]);
        parts.extend(entry.achievements.iter().map(String::as_str));
    }
    for entry in &record.education {
        parts.extend([
            entry.institution.as_str(),
            entry.degree.as_str(),
            entry.field.as_str(),
        ]);
    }
    parts.push(record.raw_text.as_str());

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn keyword_score(text: &str, job_description: Option<&str>) -> AtsFeedback {
    match job_description {
        None => {
            let score = generic_keyword_coverage(text);
            AtsCategory::Keywords.feedback(
                score,
                format!(
                    "Resume contains {score}% of common industry keywords. \
                     Consider adding more relevant technical and soft skills."
                ),
                if score < 70 {
                    AtsSeverity::Medium
                } else {
                    AtsSeverity::Low
                },
            )
        }
        Some(job) => {
            let matched = job_term_coverage(text, job);
            let severity = match matched {
                80.. => AtsSeverity::Low,
                60.. => AtsSeverity::Medium,
                _ => AtsSeverity::High,
            };
            let verdict = if matched >= 70 {
                "Good alignment"
            } else {
                "Consider adding more relevant keywords"
            };
            AtsCategory::Keywords.feedback(
                matched.max(50),
                format!("Resume matches {matched}% of job description keywords. {verdict}."),
                severity,
            )
        }
    }
}

fn generic_keyword_coverage(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    let total: usize = GENERIC_KEYWORDS.iter().map(|group| group.len()).sum();
    let found = GENERIC_KEYWORDS
        .iter()
        .flat_map(|group| group.iter())
        .filter(|keyword| lowered.contains(*keyword))
        .count();
    percent(found, total)
}

/// Share of distinct job-description words, minus stop words, that also
/// appear in the resume. A job description with no usable words scores 50.
fn job_term_coverage(text: &str, job_description: &str) -> u32 {
    let resume_words = words(text);
    let job_words: HashSet<String> = words(job_description)
        .into_iter()
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect();
    if job_words.is_empty() {
        return 50;
    }
    let matched = job_words.intersection(&resume_words).count();
    percent(matched, job_words.len())
}

fn words(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|word| word.as_str().to_string())
        .collect()
}

pub fn format_score(record: &ResumeRecord) -> AtsFeedback {
    let info = &record.personal_info;
    let checks = [
        (record.experience.is_empty(), 20, "missing work experience section"),
        (record.education.is_empty(), 15, "missing education section"),
        (record.skills.is_empty(), 15, "missing skills section"),
        (is_blank(record.summary.as_deref()), 10, "missing professional summary"),
        (is_blank(info.phone.as_deref()), 5, "missing phone number"),
        (is_blank(info.address.as_deref()), 5, "missing address"),
    ];

    let mut score: u32 = 100;
    let mut issues = Vec::new();
    for (missing, penalty, issue) in checks {
        if missing {
            score = score.saturating_sub(penalty);
            issues.push(issue);
        }
    }

    let message = if score >= 85 {
        "Resume format is ATS-friendly".to_string()
    } else {
        format!("Format issues detected: {}", issues.join(", "))
    };
    AtsCategory::Format.feedback(score, message, AtsSeverity::for_score(score))
}

pub fn content_score(record: &ResumeRecord, text: &str) -> AtsFeedback {
    let mut score: u32 = 100;
    let mut issues = Vec::new();

    if record
        .experience
        .iter()
        .any(|entry| entry.description.split_whitespace().count() < 10)
    {
        score -= 10;
        issues.push("brief job descriptions");
    }
    if !QUANTIFIED_RE.is_match(text) {
        score -= 15;
        issues.push("lack of quantifiable achievements");
    }
    let lowered = text.to_lowercase();
    let action_verbs = ACTION_VERBS
        .iter()
        .filter(|verb| lowered.contains(*verb))
        .count();
    if action_verbs < 3 {
        score -= 10;
        issues.push("limited use of action verbs");
    }
    if let Some(summary) = record.summary.as_deref() {
        if !summary.trim().is_empty() && summary.split_whitespace().count() < 20 {
            score -= 5;
            issues.push("brief professional summary");
        }
    }

    let message = if score >= 85 {
        "Well-structured content with good detail".to_string()
    } else {
        format!("Content improvements needed: {}", issues.join(", "))
    };
    AtsCategory::Content.feedback(score, message, AtsSeverity::for_score(score))
}

pub fn skills_score(record: &ResumeRecord, text: &str) -> AtsFeedback {
    if record.skills.is_empty() {
        return AtsCategory::Skills.feedback(
            30,
            "No skills section found. Add relevant technical and soft skills.".to_string(),
            AtsSeverity::High,
        );
    }

    let technical = record
        .skills
        .iter()
        .filter(|skill| {
            let lowered = skill.to_lowercase();
            TECHNICAL_KEYWORDS.iter().any(|tech| lowered.contains(tech))
        })
        .count();
    let lowered = text.to_lowercase();
    let soft = SOFT_KEYWORDS
        .iter()
        .filter(|soft| lowered.contains(*soft))
        .count();

    let mut score: u32 = 70;
    score += match technical {
        5.. => 20,
        3.. => 10,
        _ => 0,
    };
    if soft >= 3 {
        score += 10;
    }
    let score = score.min(100);

    let coverage = if technical >= 3 {
        "Good technical coverage"
    } else {
        "Consider adding more technical skills"
    };
    AtsCategory::Skills.feedback(
        score,
        format!(
            "Skills section includes {} skills. {coverage}.",
            record.skills.len()
        ),
        AtsSeverity::for_score(score),
    )
}

fn suggestions(overall: u32, low_categories: &[AtsCategory]) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();
    if overall < 70 {
        suggestions
            .push("Consider a comprehensive resume review to improve ATS compatibility".to_string());
    }
    suggestions.extend(
        low_categories
            .iter()
            .map(|category| category.suggestion().to_string()),
    );
    if suggestions.len() < 3 {
        suggestions.extend(STANDARD_SUGGESTIONS[..3].iter().map(|s| s.to_string()));
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part * 100 / total) as u32
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{EducationEntry, ExperienceEntry, PersonalInfo};

    fn strong_record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: Some("(415) 555-0100".to_string()),
                address: Some("12 Oak Street, Springfield".to_string()),
                ..PersonalInfo::default()
            },
            summary: Some(
                "Backend engineer with eight years of experience building reliable payment \
                 platforms, leading small teams, and mentoring new hires across three time \
                 zones worldwide."
                    .to_string(),
            ),
            skills: [
                "Python",
                "Docker",
                "Kubernetes",
                "PostgreSQL",
                "React",
                "Leadership",
                "Communication",
                "Teamwork",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            experience: vec![ExperienceEntry {
                company: "Acme Corp".to_string(),
                position: "Senior Engineer".to_string(),
                description: "Led a team of five engineers and improved deployment speed by 40% \
                              across twelve services"
                    .to_string(),
                achievements: vec!["Designed and delivered a new billing pipeline".to_string()],
                ..ExperienceEntry::default()
            }],
            education: vec![EducationEntry {
                institution: "Stanford University".to_string(),
                degree: "Bachelor of Science".to_string(),
                field: "Computer Science".to_string(),
                ..EducationEntry::default()
            }],
            raw_text: String::new(),
        }
    }

    #[test]
    fn generic_keywords_report_coverage_percentage() {
        let feedback = keyword_score("python docker leadership developed certified", None);
        assert_eq!(feedback.category, "Keyword Optimization");
        assert_eq!(feedback.score, 8);
        assert_eq!(feedback.severity, AtsSeverity::Medium);
        assert!(feedback.message.starts_with("Resume contains 8%"));

        assert_eq!(keyword_score("", None).score, 0);
    }

    #[test]
    fn job_description_overlap_ignores_stop_words() {
        let feedback = keyword_score("Senior Rust engineer", Some("Rust and Kubernetes engineer"));
        assert_eq!(feedback.score, 66);
        assert_eq!(feedback.severity, AtsSeverity::Medium);
        assert!(feedback.message.contains("Consider adding more relevant keywords"));

        let full = keyword_score("Rust engineer", Some("Rust engineer"));
        assert_eq!(full.score, 100);
        assert_eq!(full.severity, AtsSeverity::Low);
    }

    #[test]
    fn job_description_score_is_floored_at_fifty() {
        let feedback = keyword_score("Rust engineer", Some("Haskell Erlang"));
        assert_eq!(feedback.score, 50);
        assert_eq!(feedback.severity, AtsSeverity::High);
        assert!(feedback.message.starts_with("Resume matches 0%"));

        assert_eq!(keyword_score("Rust", Some("the and of")).score, 50);
    }

    #[test]
    fn format_deducts_for_each_missing_part() {
        let complete = format_score(&strong_record());
        assert_eq!(complete.score, 100);
        assert_eq!(complete.message, "Resume format is ATS-friendly");

        let empty = format_score(&ResumeRecord::fallback(""));
        assert_eq!(empty.score, 30);
        assert_eq!(empty.severity, AtsSeverity::High);
        assert!(empty.message.contains("missing work experience section"));
        assert!(empty.message.ends_with("missing address"));

        let mut no_contact = strong_record();
        no_contact.personal_info.phone = None;
        no_contact.personal_info.address = Some("  ".to_string());
        assert_eq!(format_score(&no_contact).score, 90);
    }

    #[test]
    fn content_rewards_detail_numbers_and_verbs() {
        let record = strong_record();
        let strong = content_score(&record, &resume_text(&record));
        assert_eq!(strong.score, 100);
        assert_eq!(strong.severity, AtsSeverity::Low);

        let weak = ResumeRecord {
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                description: "Did work".to_string(),
                ..ExperienceEntry::default()
            }],
            ..ResumeRecord::fallback("")
        };
        let feedback = content_score(&weak, &resume_text(&weak));
        assert_eq!(feedback.score, 65);
        assert_eq!(feedback.severity, AtsSeverity::High);
        assert_eq!(
            feedback.message,
            "Content improvements needed: brief job descriptions, \
             lack of quantifiable achievements, limited use of action verbs"
        );
    }

    #[test]
    fn short_summary_costs_five_points() {
        let mut record = strong_record();
        record.summary = Some("Backend engineer.".to_string());
        assert_eq!(content_score(&record, &resume_text(&record)).score, 95);
    }

    #[test]
    fn skills_score_counts_technical_and_soft_skills() {
        let record = strong_record();
        let full = skills_score(&record, &resume_text(&record));
        assert_eq!(full.score, 100);
        assert!(full.message.starts_with("Skills section includes 8 skills"));

        let mut few = strong_record();
        few.summary = None;
        few.skills = vec!["Python".to_string(), "Docker".to_string(), "SQL".to_string()];
        let feedback = skills_score(&few, &resume_text(&few));
        assert_eq!(feedback.score, 80);
        assert_eq!(feedback.severity, AtsSeverity::Medium);
        assert!(feedback.message.ends_with("Good technical coverage."));

        let none = skills_score(&ResumeRecord::fallback(""), "");
        assert_eq!(none.score, 30);
        assert_eq!(none.severity, AtsSeverity::High);
    }

    #[test]
    fn overall_score_is_weighted_mean() {
        let record = ResumeRecord::fallback("");
        let report = AtsScorer::default().score(&record, None);

        // keywords 0, format 30, content 75, skills 30
        let scores: Vec<u32> = report.feedback.iter().map(|f| f.score).collect();
        assert_eq!(scores, vec![0, 30, 75, 30]);
        assert_eq!(report.score, 32);

        let format_only = AtsScorer::new(AtsWeights {
            keywords: 0.0,
            format: 1.0,
            content: 0.0,
            skills: 0.0,
        });
        assert_eq!(format_only.score(&record, None).score, 30);
    }

    #[test]
    fn weak_resume_gets_category_suggestions() {
        let report = AtsScorer::default().score(&ResumeRecord::fallback(""), None);
        assert_eq!(
            report.suggestions,
            vec![
                "Consider a comprehensive resume review to improve ATS compatibility",
                AtsCategory::Keywords.suggestion(),
                AtsCategory::Format.suggestion(),
                AtsCategory::Skills.suggestion(),
            ]
        );
    }

    #[test]
    fn strong_resume_is_padded_with_standard_suggestions() {
        let report = AtsScorer::default().score(&strong_record(), None);

        assert!(report.score >= 70);
        assert_eq!(report.suggestions.len(), 4);
        assert_eq!(report.suggestions[0], AtsCategory::Keywords.suggestion());
        assert_eq!(report.suggestions[1..], STANDARD_SUGGESTIONS[..3]);
    }

    #[test]
    fn suggestions_are_capped() {
        let all = [
            AtsCategory::Keywords,
            AtsCategory::Format,
            AtsCategory::Content,
            AtsCategory::Skills,
            AtsCategory::Keywords,
            AtsCategory::Format,
        ];
        assert_eq!(suggestions(10, &all).len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn blank_job_description_uses_generic_keywords() {
        let record = strong_record();
        let scorer = AtsScorer::default();
        assert_eq!(scorer.score(&record, Some("  \n")), scorer.score(&record, None));
    }
}
