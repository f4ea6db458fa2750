use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::CoreError;
use super::normalization::normalize_skill;

pub const STAGE: &str = "skills";
pub const MAX_SKILLS: usize = 20;

static SKILL_DELIMITER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;•·|\n]").unwrap());

const COMMON_SKILLS: [&str; 28] = [
    "Python",
    "Java",
    "JavaScript",
    "React",
    "Angular",
    "Node.js",
    "SQL",
    "MongoDB",
    "AWS",
    "Docker",
    "Kubernetes",
    "Git",
    "HTML",
    "CSS",
    "TypeScript",
    "Spring Boot",
    "FastAPI",
    "Django",
    "Flask",
    "PostgreSQL",
    "MySQL",
    "Redis",
    "Elasticsearch",
    "Machine Learning",
    "Data Analysis",
    "Project Management",
    "Agile",
    "Scrum",
];

pub trait SkillStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, section_lines: &[&str], full_text: &str) -> Result<Vec<String>, CoreError>;
}

/// Ordered, case-insensitively deduplicated skill list with a hard cap.
#[derive(Debug, Default)]
struct SkillSet {
    skills: Vec<String>,
}

impl SkillSet {
    fn is_full(&self) -> bool {
        self.skills.len() >= MAX_SKILLS
    }

    fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }

    fn insert(&mut self, skill: String) {
        if !self.is_full() && !self.contains(&skill) {
            self.skills.push(skill);
        }
    }
}

pub fn extract_skills(section_lines: &[&str]) -> Vec<String> {
    let mut set = SkillSet::default();
    collect_section_skills(&mut set, section_lines);
    set.skills
}

fn collect_section_skills(set: &mut SkillSet, section_lines: &[&str]) {
    for line in section_lines {
        for token in SKILL_DELIMITER_RE.split(line) {
            if set.is_full() {
                return;
            }
            let token = token.trim();
            if token.chars().count() <= 1 {
                continue;
            }
            set.insert(normalize_skill(token));
        }
    }
}

/// Skills listed in the skills section only.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionSkills;

impl SkillStrategy for SectionSkills {
    fn name(&self) -> &'static str {
        "section"
    }

    fn extract(&self, section_lines: &[&str], _full_text: &str) -> Result<Vec<String>, CoreError> {
        Ok(extract_skills(section_lines))
    }
}

/// Section skills followed by well-known skills found anywhere in the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordScanSkills;

impl SkillStrategy for KeywordScanSkills {
    fn name(&self) -> &'static str {
        "keyword_scan"
    }

    fn extract(&self, section_lines: &[&str], full_text: &str) -> Result<Vec<String>, CoreError> {
        let mut set = SkillSet::default();
        collect_section_skills(&mut set, section_lines);

        let lowered = full_text.to_lowercase();
        for skill in COMMON_SKILLS {
            if lowered.contains(&skill.to_lowercase()) {
                set.insert(skill.to_string());
            }
        }

        Ok(set.skills)
    }
}
