use std::path::Path;

use serde::{Deserialize, Serialize};

/// Raw resume upload as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ResumeDocument {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    pub fn plain_text(file_name: impl Into<String>, text: &str) -> Self {
        Self::new(
            file_name,
            Some(mime::TEXT_PLAIN_UTF_8.to_string()),
            text.as_bytes().to_vec(),
        )
    }
}

/// Formats the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    /// Content type wins; the file extension is the fallback.
    pub fn detect(document: &ResumeDocument) -> Option<Self> {
        let from_mime = document
            .content_type
            .as_deref()
            .and_then(|raw| raw.parse::<mime::Mime>().ok())
            .and_then(|parsed| Self::from_mime(&parsed));

        from_mime.or_else(|| {
            Path::new(&document.file_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(Self::from_extension)
        })
    }

    fn from_mime(value: &mime::Mime) -> Option<Self> {
        if value.essence_str() == mime::APPLICATION_PDF.essence_str() {
            Some(Self::Pdf)
        } else if value.type_() == mime::TEXT && value.subtype() == mime::PLAIN {
            Some(Self::PlainText)
        } else {
            None
        }
    }

    fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "txt",
        }
    }
}

/// Failures turning an upload into resume text.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("resume document is unreadable: {0}")]
    Unreadable(String),
    #[error("unsupported resume format '{0}' (expected PDF or plain text)")]
    UnsupportedFormat(String),
    #[error("resume document is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

/// Boundary to whatever turns an uploaded document into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &ResumeDocument) -> Result<String, DocumentError>;
}

/// Extractor for PDF and UTF-8 text uploads, bounded by a maximum payload size.
#[derive(Debug, Clone)]
pub struct DocumentTextExtractor {
    max_bytes: usize,
}

impl DocumentTextExtractor {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, document: &ResumeDocument) -> Result<String, DocumentError> {
        let size = document.bytes.len();
        if size > self.max_bytes {
            return Err(DocumentError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let format = DocumentFormat::detect(document).ok_or_else(|| {
            DocumentError::UnsupportedFormat(
                document
                    .content_type
                    .clone()
                    .unwrap_or_else(|| document.file_name.clone()),
            )
        })?;

        if document.bytes.is_empty() {
            return Err(DocumentError::Unreadable("document is empty".to_string()));
        }

        let _span = tracing::debug_span!("screening.extract", ?format, size).entered();
        match format {
            DocumentFormat::Pdf => extract_pdf_text(&document.bytes),
            DocumentFormat::PlainText => String::from_utf8(document.bytes.clone())
                .map_err(|err| DocumentError::Unreadable(format!("invalid UTF-8 text: {err}"))),
        }
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|err| DocumentError::Unreadable(format!("failed to load PDF: {err}")))?;

    let pages = document.get_pages();
    let mut text = String::new();
    let mut failed_pages = 0usize;

    for (page_number, _) in &pages {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(err) => {
                failed_pages += 1;
                tracing::warn!(page = page_number, error = %err, "skipping unreadable PDF page");
            }
        }
    }

    if !pages.is_empty() && failed_pages == pages.len() {
        return Err(DocumentError::Unreadable(
            "no page of the PDF could be decoded".to_string(),
        ));
    }

    Ok(text)
}
