pub mod core;

pub use core::assembler::ResumePipeline;
pub use core::ats_score::AtsScorer;
pub use core::errors::CoreError;
pub use core::models::{AtsScore, EnhancedResume, ExtractorSettings, ResumeRecord};
pub use core::ner::{EntityLabel, EntityRecognizer, EntitySpan};
pub use core::service::CoreService;
