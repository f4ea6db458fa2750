use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use super::generative::GenerativeClient;
use super::models::{EnhancedResume, ExperienceEntry, ResumeRecord};
use super::normalization::normalize_skill;
use super::skills::MAX_SKILLS;

const DEFAULT_SUMMARY: &str = "Results-driven professional with proven expertise in delivering high-quality solutions and driving business success.";
const SOFT_SKILLS: [&str; 4] = [
    "Leadership",
    "Strategic Planning",
    "Problem Solving",
    "Team Collaboration",
];
const FALLBACK_SKILLS: [&str; 4] = [
    "Communication",
    "Problem Solving",
    "Team Collaboration",
    "Project Management",
];
const ACTION_VERBS: [&str; 6] = [
    "Developed",
    "Implemented",
    "Managed",
    "Led",
    "Created",
    "Optimized",
];
const TEMPLATE_IMPROVEMENTS: [&str; 4] = [
    "Enhanced professional summary with industry keywords",
    "Optimized skills section for ATS compatibility",
    "Improved action verbs and quantifiable achievements",
    "Added relevant technical competencies",
];
const DEFAULT_IMPROVEMENTS: [&str; 3] = [
    "Optimized content for ATS compatibility",
    "Enhanced keyword density for better searchability",
    "Improved overall professional presentation",
];
const AI_SUGGESTIONS: [&str; 4] = [
    "Consider adding specific metrics and quantifiable achievements to demonstrate impact",
    "Include relevant industry certifications or training programs",
    "Tailor keywords to match specific job descriptions you're targeting",
    "Add a projects section if you have notable work to showcase",
];

/// Rewrites a record for presentation. Personal info and education are
/// carried over untouched.
pub struct ResumeEnhancer {
    client: Option<Arc<dyn GenerativeClient>>,
}

impl ResumeEnhancer {
    pub fn new(client: Option<Arc<dyn GenerativeClient>>) -> Self {
        Self { client }
    }

    pub fn is_generative(&self) -> bool {
        self.client.is_some()
    }

    pub async fn enhance(&self, record: &ResumeRecord) -> EnhancedResume {
        match &self.client {
            Some(client) => {
                info!(mode = "generative", "enhancing resume");
                generative_enhancement(client.as_ref(), record).await
            }
            None => {
                info!(mode = "template", "enhancing resume");
                template_enhancement(record)
            }
        }
    }
}

fn template_enhancement(record: &ResumeRecord) -> EnhancedResume {
    let base_summary = record.summary.as_deref().unwrap_or(DEFAULT_SUMMARY);
    let summary = if record.skills.is_empty() {
        base_summary.to_string()
    } else {
        let top_skills = record.skills.iter().take(3).cloned().collect::<Vec<_>>();
        format!(
            "Results-driven professional with proven expertise in {}. {base_summary}",
            top_skills.join(", ")
        )
    };

    let mut skills = record.skills.clone();
    for soft in SOFT_SKILLS {
        if skills.len() >= MAX_SKILLS {
            break;
        }
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(soft)) {
            skills.push(soft.to_string());
        }
    }

    let experience = record
        .experience
        .iter()
        .enumerate()
        .map(|(index, entry)| ExperienceEntry {
            description: with_action_verb(&entry.description, index),
            ..entry.clone()
        })
        .collect();

    EnhancedResume {
        original_resume: record.clone(),
        enhanced_resume: ResumeRecord {
            summary: Some(summary),
            skills,
            experience,
            ..record.clone()
        },
        improvements: to_strings(&TEMPLATE_IMPROVEMENTS),
        ai_suggestions: to_strings(&AI_SUGGESTIONS),
    }
}

fn with_action_verb(description: &str, index: usize) -> String {
    let lowered = description.to_lowercase();
    if description.is_empty()
        || ACTION_VERBS
            .iter()
            .any(|verb| lowered.contains(&verb.to_lowercase()))
    {
        return description.to_string();
    }
    format!("{} {lowered}", ACTION_VERBS[index % ACTION_VERBS.len()])
}

async fn generative_enhancement(
    client: &dyn GenerativeClient,
    record: &ResumeRecord,
) -> EnhancedResume {
    let summary = enhance_summary(client, record).await;
    let skills = enhance_skills(client, record).await;
    let experience = join_all(
        record
            .experience
            .iter()
            .map(|entry| enhance_experience_entry(client, entry)),
    )
    .await;

    let enhanced = ResumeRecord {
        summary,
        skills,
        experience,
        ..record.clone()
    };

    EnhancedResume {
        improvements: describe_improvements(record, &enhanced),
        original_resume: record.clone(),
        enhanced_resume: enhanced,
        ai_suggestions: to_strings(&AI_SUGGESTIONS),
    }
}

async fn enhance_summary(client: &dyn GenerativeClient, record: &ResumeRecord) -> Option<String> {
    let original = record.summary.as_deref().unwrap_or(DEFAULT_SUMMARY);
    let skills = if record.skills.is_empty() {
        "various technologies".to_string()
    } else {
        record.skills.iter().take(10).cloned().collect::<Vec<_>>().join(", ")
    };
    let prompt = format!(
        "Enhance this professional summary to make it more compelling and ATS-friendly.\n\
         Original Summary: {original}\n\
         Key Skills: {skills}\n\
         Keep it to 2-3 results-oriented sentences with strong action words.\n\
         Return only the enhanced summary text."
    );

    let completion = client.complete(&prompt).await;
    match completion.trim() {
        "" => record.summary.clone(),
        text => Some(text.to_string()),
    }
}

async fn enhance_skills(client: &dyn GenerativeClient, record: &ResumeRecord) -> Vec<String> {
    if record.skills.is_empty() {
        return to_strings(&FALLBACK_SKILLS);
    }

    let context: String = record
        .experience
        .iter()
        .map(|e| e.description.as_str())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(500)
        .collect();
    let prompt = format!(
        "Enhance this skills list to make it more comprehensive and ATS-friendly.\n\
         Current Skills: {}\n\
         Experience Context: {context}\n\
         Remove duplicates and limit to the {MAX_SKILLS} most relevant skills.\n\
         Return only a comma-separated list of skills.",
        record.skills.join(", ")
    );

    let completion = client.complete(&prompt).await;
    let mut skills: Vec<String> = Vec::new();
    for token in completion.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let skill = normalize_skill(token);
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
            skills.push(skill);
        }
        if skills.len() == MAX_SKILLS {
            break;
        }
    }

    if skills.is_empty() {
        record.skills.clone()
    } else {
        skills
    }
}

async fn enhance_experience_entry(
    client: &dyn GenerativeClient,
    entry: &ExperienceEntry,
) -> ExperienceEntry {
    if entry.description.is_empty() {
        return ExperienceEntry {
            description: format!(
                "Responsible for various duties and tasks related to {} role.",
                entry.position
            ),
            ..entry.clone()
        };
    }

    let prompt = format!(
        "Enhance this job description to make it more impactful and ATS-friendly.\n\
         Position: {}\n\
         Original Description: {}\n\
         Start with strong action verbs and focus on measurable impact.\n\
         Return only the enhanced description.",
        entry.position, entry.description
    );

    let completion = client.complete(&prompt).await;
    match completion.trim() {
        "" => entry.clone(),
        text => ExperienceEntry {
            description: text.to_string(),
            ..entry.clone()
        },
    }
}

fn describe_improvements(original: &ResumeRecord, enhanced: &ResumeRecord) -> Vec<String> {
    let mut improvements = Vec::new();

    if original.summary != enhanced.summary {
        improvements.push("Enhanced professional summary with stronger impact statements".to_string());
    }
    if enhanced.skills.len() > original.skills.len() {
        improvements.push("Expanded skills section with relevant technical and soft skills".to_string());
    }

    let description_chars = |record: &ResumeRecord| -> usize {
        record.experience.iter().map(|e| e.description.len()).sum()
    };
    let (before, after) = (description_chars(original), description_chars(enhanced));
    if after * 10 > before * 11 {
        improvements.push(
            "Improved job descriptions with stronger action verbs and impact focus".to_string(),
        );
    }

    if improvements.is_empty() {
        return to_strings(&DEFAULT_IMPROVEMENTS);
    }
    improvements
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::core::models::PersonalInfo;

    struct ScriptedClient<F>(F);

    #[async_trait]
    impl<F> GenerativeClient for ScriptedClient<F>
    where
        F: Fn(&str) -> String + Send + Sync,
    {
        async fn complete(&self, prompt: &str) -> String {
            (self.0)(prompt)
        }
    }

    fn record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                ..PersonalInfo::default()
            },
            summary: Some("Backend engineer.".to_string()),
            skills: vec![
                "Rust".to_string(),
                "Python".to_string(),
                "SQL".to_string(),
                "Docker".to_string(),
            ],
            experience: vec![
                ExperienceEntry {
                    position: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    description: "Maintained billing services".to_string(),
                    ..ExperienceEntry::default()
                },
                ExperienceEntry {
                    description: "Led the platform team".to_string(),
                    ..ExperienceEntry::default()
                },
            ],
            education: Vec::new(),
            raw_text: "raw".to_string(),
        }
    }

    #[tokio::test]
    async fn template_prefixes_summary_with_top_skills() {
        let enhanced = ResumeEnhancer::new(None).enhance(&record()).await;

        assert_eq!(
            enhanced.enhanced_resume.summary.as_deref(),
            Some("Results-driven professional with proven expertise in Rust, Python, SQL. Backend engineer.")
        );
        assert_eq!(enhanced.enhanced_resume.skills.len(), 8);
        assert!(enhanced
            .enhanced_resume
            .skills
            .contains(&"Team Collaboration".to_string()));
        assert_eq!(enhanced.original_resume, record());
        assert_eq!(enhanced.improvements.len(), 4);
        assert_eq!(enhanced.ai_suggestions.len(), 4);
    }

    #[tokio::test]
    async fn template_soft_skills_respect_the_cap() {
        let full = ResumeRecord {
            skills: (0..MAX_SKILLS).map(|i| format!("tool{i}")).collect(),
            ..record()
        };
        let enhanced = ResumeEnhancer::new(None).enhance(&full).await;
        assert_eq!(enhanced.enhanced_resume.skills, full.skills);

        let almost = ResumeRecord {
            skills: (0..MAX_SKILLS - 2).map(|i| format!("tool{i}")).collect(),
            ..record()
        };
        let enhanced = ResumeEnhancer::new(None).enhance(&almost).await;
        let skills = &enhanced.enhanced_resume.skills;
        assert_eq!(skills.len(), MAX_SKILLS);
        assert_eq!(&skills[..MAX_SKILLS - 2], almost.skills.as_slice());
        assert_eq!(skills[MAX_SKILLS - 2..], ["Leadership", "Strategic Planning"]);
    }

    #[tokio::test]
    async fn template_adds_rotating_action_verbs() {
        let enhanced = ResumeEnhancer::new(None).enhance(&record()).await;
        let experience = &enhanced.enhanced_resume.experience;

        assert_eq!(experience[0].description, "Developed maintained billing services");
        assert_eq!(experience[1].description, "Led the platform team");
        assert_eq!(experience[0].company, "Acme");
    }

    #[tokio::test]
    async fn template_without_skills_keeps_default_summary() {
        let bare = ResumeRecord {
            summary: None,
            skills: Vec::new(),
            ..record()
        };
        let enhanced = ResumeEnhancer::new(None).enhance(&bare).await;
        assert_eq!(enhanced.enhanced_resume.summary.as_deref(), Some(DEFAULT_SUMMARY));
        assert_eq!(enhanced.enhanced_resume.skills, to_strings(&SOFT_SKILLS));
    }

    #[tokio::test]
    async fn generative_rewrites_each_section() {
        let client = ScriptedClient(|prompt: &str| {
            if prompt.contains("professional summary") {
                "Seasoned backend engineer.".to_string()
            } else if prompt.contains("skills list") {
                "Rust, js, rust, Kubernetes, , Go".to_string()
            } else {
                "Rebuilt billing services, cutting latency by 40% across regions.".to_string()
            }
        });
        let enhancer = ResumeEnhancer::new(Some(Arc::new(client)));
        assert!(enhancer.is_generative());

        let enhanced = enhancer.enhance(&record()).await;
        let resume = &enhanced.enhanced_resume;
        assert_eq!(resume.summary.as_deref(), Some("Seasoned backend engineer."));
        assert_eq!(resume.skills, vec!["Rust", "JavaScript", "Kubernetes", "Go"]);
        assert!(resume.experience[0].description.starts_with("Rebuilt billing"));
        assert_eq!(resume.personal_info, record().personal_info);
        assert_eq!(
            enhanced.improvements,
            vec![
                "Enhanced professional summary with stronger impact statements",
                "Improved job descriptions with stronger action verbs and impact focus",
            ]
        );
    }

    #[tokio::test]
    async fn empty_completions_keep_original_content() {
        let enhancer = ResumeEnhancer::new(Some(Arc::new(ScriptedClient(|_: &str| String::new()))));
        let enhanced = enhancer.enhance(&record()).await;

        assert_eq!(enhanced.enhanced_resume.summary, record().summary);
        assert_eq!(enhanced.enhanced_resume.skills, record().skills);
        assert_eq!(enhanced.enhanced_resume.experience, record().experience);
        assert_eq!(enhanced.improvements, to_strings(&DEFAULT_IMPROVEMENTS));
    }

    #[tokio::test]
    async fn generative_skills_are_capped() {
        let many = (0..30).map(|i| format!("Skill{i}")).collect::<Vec<_>>().join(", ");
        let client = ScriptedClient(move |prompt: &str| {
            if prompt.contains("skills list") {
                many.clone()
            } else {
                String::new()
            }
        });
        let enhanced = ResumeEnhancer::new(Some(Arc::new(client)))
            .enhance(&record())
            .await;
        assert_eq!(enhanced.enhanced_resume.skills.len(), MAX_SKILLS);
    }
}
