use tracing::{debug, warn};

use super::ocr::TesseractOcr;
use super::patterns::find_urls;

const MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    pub text: String,
    pub ocr_used: bool,
}

pub struct PdfTextExtractor {
    ocr: TesseractOcr,
    min_text_chars: usize,
}

impl PdfTextExtractor {
    pub fn new(ocr: TesseractOcr) -> Self {
        Self {
            ocr,
            min_text_chars: MIN_TEXT_CHARS,
        }
    }

    /// Uses the embedded text layer when it carries enough content, otherwise OCR.
    pub async fn extract(&self, data: &[u8]) -> anyhow::Result<PdfText> {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(mut text) => {
                let links = embedded_links(data);
                if !links.is_empty() {
                    text.push('\n');
                    text.push_str(&links.join("\n"));
                }

                if has_enough_text(&text, self.min_text_chars) {
                    return Ok(PdfText {
                        text,
                        ocr_used: false,
                    });
                }
                debug!(
                    chars = text.trim().len(),
                    "pdf text layer too sparse, running OCR"
                );
            }
            Err(err) => {
                warn!(error = %err, "pdf text extraction failed, running OCR");
            }
        }

        let text = self.ocr.extract_text(data).await?;
        Ok(PdfText {
            text,
            ocr_used: true,
        })
    }
}

fn has_enough_text(text: &str, min_chars: usize) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).count() >= min_chars
}

/// Link annotations often carry profile URLs that never reach the text layer.
fn embedded_links(data: &[u8]) -> Vec<String> {
    let raw = String::from_utf8_lossy(data);
    let mut links: Vec<String> = Vec::new();
    for url in find_urls(&raw) {
        if !links.iter().any(|seen| seen.eq_ignore_ascii_case(url)) {
            links.push(url.to_string());
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_links_are_deduplicated_case_insensitively() {
        let data = b"<< /URI (https://linkedin.com/in/jane) >> << /URI (https://LINKEDIN.COM/in/jane) >> https://jane.dev";
        assert_eq!(
            embedded_links(data),
            vec!["https://linkedin.com/in/jane", "https://jane.dev"]
        );
    }

    #[test]
    fn sparse_text_needs_ocr() {
        assert!(!has_enough_text("  a b c \n\n", MIN_TEXT_CHARS));
        assert!(has_enough_text(&"x".repeat(MIN_TEXT_CHARS), MIN_TEXT_CHARS));
    }
}
