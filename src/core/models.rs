use serde::{Deserialize, Serialize};

pub const FALLBACK_NAME: &str = "Unknown";
pub const FALLBACK_EMAIL: &str = "unknown@email.com";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linked_in: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub current: bool,
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: Option<String>,
    pub end_date: String,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    pub raw_text: String,
}

impl ResumeRecord {
    /// Placeholder record returned when the extraction pipeline cannot complete.
    pub fn fallback(raw_text: &str) -> Self {
        Self {
            personal_info: PersonalInfo {
                full_name: FALLBACK_NAME.to_string(),
                email: FALLBACK_EMAIL.to_string(),
                ..PersonalInfo::default()
            },
            summary: None,
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            raw_text: raw_text.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.personal_info.full_name == FALLBACK_NAME
            && self.personal_info.email == FALLBACK_EMAIL
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedResume {
    pub original_resume: ResumeRecord,
    pub enhanced_resume: ResumeRecord,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub ai_suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchParseResult {
    pub source_file: String,
    pub resume: Option<ResumeRecord>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtsSeverity {
    Low,
    Medium,
    High,
}

impl AtsSeverity {
    pub fn for_score(score: u32) -> Self {
        match score {
            85.. => AtsSeverity::Low,
            70.. => AtsSeverity::Medium,
            _ => AtsSeverity::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsFeedback {
    pub category: String,
    pub score: u32,
    pub message: String,
    pub severity: AtsSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScore {
    pub score: u32,
    pub feedback: Vec<AtsFeedback>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Relative weight of each ATS category in the overall score. Only the ratios
/// matter; the overall score is a weighted mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtsWeights {
    pub keywords: f64,
    pub format: f64,
    pub content: f64,
    pub skills: f64,
}

impl Default for AtsWeights {
    fn default() -> Self {
        Self {
            keywords: 0.3,
            format: 0.25,
            content: 0.25,
            skills: 0.2,
        }
    }
}

impl AtsWeights {
    pub fn total(&self) -> f64 {
        self.keywords + self.format + self.content + self.skills
    }

    /// Negative or non-finite weights count as zero; an all-zero set falls
    /// back to the defaults.
    pub fn sanitized(self) -> Self {
        let clean = |weight: f64| if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        let weights = Self {
            keywords: clean(self.keywords),
            format: clean(self.format),
            content: clean(self.content),
            skills: clean(self.skills),
        };
        if weights.total() > 0.0 {
            weights
        } else {
            Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStrategyKind {
    #[default]
    Classifier,
    LineWindow,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStrategyKind {
    #[default]
    Section,
    KeywordScan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorSettings {
    pub tesseract_path: String,
    pub ocr_timeout_seconds: u64,
    pub remote_timeout_seconds: u64,
    pub gemini_model: String,
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,
    pub section_strategy: SectionStrategyKind,
    pub skill_strategy: SkillStrategyKind,
    pub normalize_titles: bool,
    pub max_concurrent_documents: usize,
    pub ats_weights: AtsWeights,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            ocr_timeout_seconds: 120,
            remote_timeout_seconds: 30,
            gemini_model: "gemini-1.5-pro-latest".to_string(),
            gemini_api_key: None,
            section_strategy: SectionStrategyKind::Classifier,
            skill_strategy: SkillStrategyKind::Section,
            normalize_titles: true,
            max_concurrent_documents: 4,
            ats_weights: AtsWeights::default(),
        }
    }
}

impl ExtractorSettings {
    pub fn sanitized(mut self) -> Self {
        if self.tesseract_path.trim().is_empty() {
            self.tesseract_path = "tesseract".to_string();
        }
        if self.gemini_model.trim().is_empty() {
            self.gemini_model = ExtractorSettings::default().gemini_model;
        }
        self.gemini_api_key = self
            .gemini_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self.ocr_timeout_seconds = self.ocr_timeout_seconds.max(1);
        self.remote_timeout_seconds = self.remote_timeout_seconds.max(1);
        self.max_concurrent_documents = self.max_concurrent_documents.max(1);
        self.ats_weights = self.ats_weights.sanitized();
        self
    }
}
