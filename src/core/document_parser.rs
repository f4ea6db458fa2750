use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use super::assembler::{document_id, ResumePipeline};
use super::errors::CoreError;
use super::models::ResumeRecord;
use super::pdf::PdfTextExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, CoreError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(CoreError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

pub struct ResumeDocumentParser {
    pdf_text_extractor: PdfTextExtractor,
    pipeline: Arc<ResumePipeline>,
}

impl ResumeDocumentParser {
    pub fn new(pdf_text_extractor: PdfTextExtractor, pipeline: Arc<ResumePipeline>) -> Self {
        Self {
            pdf_text_extractor,
            pipeline,
        }
    }

    pub async fn extract_text(&self, file_name: &str, data: &[u8]) -> Result<String, CoreError> {
        let decode_failure = |reason: String| CoreError::DecodeFailure {
            file_name: file_name.to_string(),
            reason,
        };

        let text = match DocumentFormat::from_file_name(file_name)? {
            DocumentFormat::Pdf => {
                let extracted = self
                    .pdf_text_extractor
                    .extract(data)
                    .await
                    .map_err(|err| decode_failure(format!("{err:#}")))?;
                debug!(file_name, ocr_used = extracted.ocr_used, "pdf decoded");
                extracted.text
            }
            DocumentFormat::Docx => {
                extract_docx_text(data).map_err(|err| decode_failure(format!("{err:#}")))?
            }
        };

        if text.trim().is_empty() {
            return Err(decode_failure("document contains no text".to_string()));
        }
        Ok(text)
    }

    /// Unsupported formats are surfaced; undecodable documents produce the
    /// fallback record with empty text.
    pub async fn parse_resume_bytes(
        &self,
        file_name: &str,
        data: &[u8],
    ) -> Result<ResumeRecord, CoreError> {
        let document = document_id(data);
        match self.extract_text(file_name, data).await {
            Ok(text) => Ok(self.pipeline.assemble_document(&document, &text)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!(document = %document, file_name, error = %err, "decode failed, returning fallback record");
                Ok(ResumeRecord::fallback(""))
            }
        }
    }
}

/// Paragraph text of `word/document.xml`, one line per `w:p`. Empty paragraphs
/// are kept as blank lines since they delimit sections.
pub fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => lines.push(std::mem::take(&mut current).trim_end().to_string()),
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => lines.push(String::new()),
                b"w:tab" => current.push(' '),
                b"w:br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    current.push_str(&e.xml_content()?);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text {
                    if let Some(ch) = e.resolve_char_ref()? {
                        current.push(ch);
                    } else if let Some(resolved) = resolve_xml_entity(&e.decode()?) {
                        current.push_str(resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let body: String = paragraphs
        .iter()
        .map(|p| {
            if p.is_empty() {
                "<w:p/>".to_string()
            } else {
                format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>")
            }
        })
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::ner::NullRecognizer;
    use crate::core::ocr::TesseractOcr;

    fn parser() -> ResumeDocumentParser {
        let ocr = TesseractOcr::new("/nonexistent/tesseract-binary", Duration::from_secs(1));
        ResumeDocumentParser::new(
            PdfTextExtractor::new(ocr),
            Arc::new(ResumePipeline::new(Arc::new(NullRecognizer))),
        )
    }

    #[test]
    fn format_follows_extension_case_insensitively() {
        assert_eq!(
            DocumentFormat::from_file_name("cv.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_file_name("dir/cv.docx").unwrap(),
            DocumentFormat::Docx
        );
        assert!(matches!(
            DocumentFormat::from_file_name("cv.txt"),
            Err(CoreError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_file_name("README").is_err());
    }

    #[test]
    fn docx_paragraphs_become_lines() {
        let data = build_docx(&["Jane Doe", "", "Skills", "Rust &amp; Go"]);
        let text = extract_docx_text(&data).unwrap();
        assert_eq!(text, "Jane Doe\n\nSkills\nRust & Go");
    }

    #[test]
    fn docx_without_document_part_is_an_error() {
        assert!(extract_docx_text(b"not a zip").is_err());
    }

    #[tokio::test]
    async fn docx_resume_is_assembled() {
        let data = build_docx(&[
            "Jane Doe",
            "jane@example.com",
            "Skills",
            "js, py",
        ]);
        let record = parser().parse_resume_bytes("jane.docx", &data).await.unwrap();
        assert_eq!(record.personal_info.full_name, "Jane Doe");
        assert_eq!(record.skills, vec!["JavaScript", "Python"]);
    }

    #[tokio::test]
    async fn unsupported_format_is_surfaced() {
        let err = parser()
            .parse_resume_bytes("resume.odt", b"whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat(name) if name == "resume.odt"));
    }

    #[tokio::test]
    async fn undecodable_document_yields_fallback_record() {
        let record = parser()
            .parse_resume_bytes("broken.docx", b"garbage")
            .await
            .unwrap();
        assert!(record.is_fallback());
        assert_eq!(record.raw_text, "");
    }

    #[tokio::test]
    async fn empty_docx_is_a_decode_failure() {
        let data = build_docx(&["", ""]);
        let err = parser().extract_text("blank.docx", &data).await.unwrap_err();
        assert!(matches!(err, CoreError::DecodeFailure { .. }));
    }
}
