use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::assembler::ResumePipeline;
use super::ats_score::AtsScorer;
use super::document_parser::ResumeDocumentParser;
use super::enhancer::ResumeEnhancer;
use super::errors::CoreError;
use super::generative::{GeminiClient, GenerativeClient};
use super::models::{AtsScore, BatchParseResult, EnhancedResume, ExtractorSettings, ResumeRecord};
use super::ner::{EntityRecognizer, RuleBasedRecognizer};
use super::ocr::TesseractOcr;
use super::pdf::PdfTextExtractor;
use super::settings_store::{apply_overrides, SettingsStore};

/// Composition root: owns the settings and every collaborator built from them.
pub struct CoreService {
    settings: ExtractorSettings,
    pipeline: Arc<ResumePipeline>,
    parser: ResumeDocumentParser,
    enhancer: ResumeEnhancer,
    scorer: AtsScorer,
}

impl CoreService {
    /// Loads persisted settings, applies environment overrides and wires the
    /// rule-based recognizer. A Gemini client is attached when an API key is set.
    pub async fn new() -> anyhow::Result<Self> {
        let store = SettingsStore::new();
        let persisted = store.load().await.unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "failed to load settings, using defaults");
            ExtractorSettings::default()
        });
        let settings = apply_overrides(persisted, |name| std::env::var(name).ok());

        let service = Self::from_settings(settings.clone(), Arc::new(RuleBasedRecognizer));
        match settings.gemini_api_key.clone() {
            Some(api_key) => {
                let client = GeminiClient::new(
                    api_key,
                    &settings.gemini_model,
                    Duration::from_secs(settings.remote_timeout_seconds),
                )?;
                Ok(service.with_generative_client(Arc::new(client)))
            }
            None => {
                info!("no Gemini API key configured, enhancement uses templates");
                Ok(service)
            }
        }
    }

    pub fn from_settings(
        settings: ExtractorSettings,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Self {
        let settings = settings.sanitized();
        let pipeline = Arc::new(ResumePipeline::from_settings(&settings, recognizer));
        let ocr = TesseractOcr::new(
            settings.tesseract_path.clone(),
            Duration::from_secs(settings.ocr_timeout_seconds),
        );
        let parser = ResumeDocumentParser::new(PdfTextExtractor::new(ocr), Arc::clone(&pipeline));

        Self {
            pipeline,
            parser,
            enhancer: ResumeEnhancer::new(None),
            scorer: AtsScorer::new(settings.ats_weights),
            settings,
        }
    }

    pub fn with_generative_client(mut self, client: Arc<dyn GenerativeClient>) -> Self {
        self.enhancer = ResumeEnhancer::new(Some(client));
        self
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    pub fn pipeline(&self) -> &ResumePipeline {
        &self.pipeline
    }

    pub async fn parse_single(
        &self,
        file_name: &str,
        file_bytes: &[u8],
    ) -> Result<ResumeRecord, CoreError> {
        self.parser.parse_resume_bytes(file_name, file_bytes).await
    }

    pub async fn parse_file(&self, path: &Path) -> anyhow::Result<ResumeRecord> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record = self.parse_single(&file_name_of(path), &bytes).await?;
        Ok(record)
    }

    /// Parses every path with at most `max_concurrent_documents` in flight.
    /// Results arrive in completion order; each carries its source file.
    pub async fn parse_batch(&self, paths: &[PathBuf]) -> Vec<BatchParseResult> {
        let max_concurrency = self.settings.max_concurrent_documents.max(1);
        info!(documents = paths.len(), max_concurrency, "starting batch");

        stream::iter(paths.iter())
            .map(|path| async move {
                let source_file = path.display().to_string();
                match self.parse_file(path).await {
                    Ok(record) => BatchParseResult {
                        source_file,
                        resume: Some(record),
                        errors: Vec::new(),
                    },
                    Err(err) => {
                        warn!(source_file = %source_file, error = %format!("{err:#}"), "document skipped");
                        BatchParseResult {
                            source_file,
                            resume: None,
                            errors: vec![format!("{err:#}")],
                        }
                    }
                }
            })
            .buffer_unordered(max_concurrency)
            .collect()
            .await
    }

    pub async fn enhance(&self, record: &ResumeRecord) -> EnhancedResume {
        self.enhancer.enhance(record).await
    }

    pub fn score(&self, record: &ResumeRecord, job_description: Option<&str>) -> AtsScore {
        self.scorer.score(record, job_description)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
