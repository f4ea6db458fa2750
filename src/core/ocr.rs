use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs the Tesseract CLI over a document. Timeouts and non-zero exits yield
/// empty text rather than an error so the caller can decide what "no text" means.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    executable: String,
    language: String,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(executable: impl Into<String>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            language: "eng".to_string(),
            timeout,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub async fn extract_text(&self, document: &[u8]) -> anyhow::Result<String> {
        let work_dir = tempfile::Builder::new()
            .prefix("resume-extract-ocr-")
            .tempdir()
            .context("failed to create OCR work dir")?;

        let input_path = work_dir.path().join("document.pdf");
        tokio::fs::write(&input_path, document)
            .await
            .with_context(|| format!("failed to stage OCR input {}", input_path.display()))?;

        let mut command = Command::new(&self.executable);
        command
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(executable = %self.executable, language = %self.language, "running OCR");
        let output = match timeout(self.timeout, command.output()).await {
            Ok(result) => result
                .with_context(|| format!("failed to launch {}", self.executable))?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "OCR timed out");
                return Ok(String::new());
            }
        };

        if !output.status.success() {
            warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "OCR exited with failure"
            );
            return Ok(String::new());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
