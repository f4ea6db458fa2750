use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to decode {file_name}: {reason}")]
    DecodeFailure { file_name: String, reason: String },
    #[error("Extraction stage '{stage}' failed: {reason}")]
    ExtractionStage { stage: &'static str, reason: String },
    #[error("Remote capability '{capability}' failed: {reason}")]
    RemoteCapability {
        capability: &'static str,
        reason: String,
    },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CoreError {
    pub fn stage(stage: &'static str, reason: impl Into<String>) -> Self {
        CoreError::ExtractionStage {
            stage,
            reason: reason.into(),
        }
    }

    pub fn remote(capability: &'static str, reason: impl Into<String>) -> Self {
        CoreError::RemoteCapability {
            capability,
            reason: reason.into(),
        }
    }

    /// Tags an error with the extraction stage it surfaced in.
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            CoreError::ExtractionStage { .. } => self,
            other => CoreError::stage(stage, other.to_string()),
        }
    }

    /// Remote failures degrade the affected field; everything else aborts the stage.
    pub fn is_degradable(&self) -> bool {
        matches!(self, CoreError::RemoteCapability { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::UnsupportedFormat(_) | CoreError::InvalidRequest(_)
        )
    }
}
