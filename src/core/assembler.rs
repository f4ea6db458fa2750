use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, error, info, info_span};

use super::education::extract_education;
use super::errors::CoreError;
use super::experience::extract_experience;
use super::models::{ExtractorSettings, ResumeRecord, SectionStrategyKind, SkillStrategyKind};
use super::ner::EntityRecognizer;
use super::normalizer::normalize;
use super::personal_info::extract_personal;
use super::sections::{KeywordSectionClassifier, LineWindowScanner, SectionLabel, SectionStrategy};
use super::skills::{self, KeywordScanSkills, SectionSkills, SkillStrategy};
use super::summary::extract_summary;

/// Turns raw document text into a [`ResumeRecord`].
///
/// The recognizer and both strategies are injected so the pipeline holds no
/// global state and can be shared across threads.
pub struct ResumePipeline {
    recognizer: Arc<dyn EntityRecognizer>,
    section_strategy: Box<dyn SectionStrategy>,
    skill_strategy: Box<dyn SkillStrategy>,
    normalize_titles: bool,
}

impl ResumePipeline {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            section_strategy: Box::new(KeywordSectionClassifier),
            skill_strategy: Box::new(SectionSkills),
            normalize_titles: true,
        }
    }

    pub fn from_settings(
        settings: &ExtractorSettings,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Self {
        let section_strategy: Box<dyn SectionStrategy> = match settings.section_strategy {
            SectionStrategyKind::Classifier => Box::new(KeywordSectionClassifier),
            SectionStrategyKind::LineWindow => Box::new(LineWindowScanner::default()),
        };
        let skill_strategy: Box<dyn SkillStrategy> = match settings.skill_strategy {
            SkillStrategyKind::Section => Box::new(SectionSkills),
            SkillStrategyKind::KeywordScan => Box::new(KeywordScanSkills),
        };

        Self::new(recognizer)
            .with_section_strategy(section_strategy)
            .with_skill_strategy(skill_strategy)
            .with_title_normalization(settings.normalize_titles)
    }

    pub fn with_section_strategy(mut self, strategy: Box<dyn SectionStrategy>) -> Self {
        self.section_strategy = strategy;
        self
    }

    pub fn with_skill_strategy(mut self, strategy: Box<dyn SkillStrategy>) -> Self {
        self.skill_strategy = strategy;
        self
    }

    pub fn with_title_normalization(mut self, enabled: bool) -> Self {
        self.normalize_titles = enabled;
        self
    }

    pub fn assemble(&self, raw_text: &str) -> ResumeRecord {
        let document = document_id(raw_text.as_bytes());
        self.assemble_document(&document, raw_text)
    }

    /// Never fails: any stage error downgrades the whole result to
    /// [`ResumeRecord::fallback`]. Every record emitted while extracting is
    /// scoped to an `extract` span carrying the document id.
    pub fn assemble_document(&self, document: &str, raw_text: &str) -> ResumeRecord {
        let span = info_span!("extract", document = %document);
        let _entered = span.enter();

        match self.try_assemble(raw_text) {
            Ok(record) => {
                info!(
                    skills = record.skills.len(),
                    experience = record.experience.len(),
                    education = record.education.len(),
                    "resume extracted"
                );
                record
            }
            Err(err) => {
                let stage = match &err {
                    CoreError::ExtractionStage { stage, .. } => *stage,
                    _ => "pipeline",
                };
                error!(stage, error = %err, "extraction failed, returning fallback record");
                ResumeRecord::fallback(raw_text)
            }
        }
    }

    fn try_assemble(&self, raw_text: &str) -> Result<ResumeRecord, CoreError> {
        let lines = normalize(raw_text);
        let sections = self.section_strategy.split(&lines);
        debug!(
            strategy = self.section_strategy.name(),
            sections = ?sections.labels(),
            "sections classified"
        );

        let personal_info = extract_personal(raw_text, self.recognizer.as_ref())?;
        let summary = extract_summary(&lines)?;

        let skills = self
            .skill_strategy
            .extract(&sections.body(SectionLabel::Skills), raw_text)
            .map_err(|err| err.in_stage(skills::STAGE))?;
        if skills.len() > skills::MAX_SKILLS {
            return Err(CoreError::stage(
                skills::STAGE,
                format!(
                    "strategy '{}' returned {} skills",
                    self.skill_strategy.name(),
                    skills.len()
                ),
            ));
        }

        let experience = extract_experience(
            &sections.body(SectionLabel::Experience),
            self.recognizer.as_ref(),
            self.normalize_titles,
        )?;
        let education = extract_education(&sections.body(SectionLabel::Education))?;

        Ok(ResumeRecord {
            personal_info,
            summary,
            skills,
            experience,
            education,
            raw_text: raw_text.to_string(),
        })
    }
}

/// Short content hash used to correlate log records for one document.
pub fn document_id(bytes: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    digest[..12].to_string()
}
