use async_trait::async_trait;
use std::path::Path;

#[derive(Debug)]
pub enum DocumentExtractionError {
    UnsupportedFormat(String),
    CorruptedFile(String),
    ExtractionFailed(String),
    IoError(String),
}

impl std::fmt::Display for DocumentExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentExtractionError::UnsupportedFormat(format) => {
                write!(f, "Unsupported format: {}", format)
            }
            DocumentExtractionError::CorruptedFile(msg) => write!(f, "Corrupted file: {}", msg),
            DocumentExtractionError::ExtractionFailed(msg) => {
                write!(f, "Extraction failed: {}", msg)
            }
            DocumentExtractionError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentExtractionError {}

/// Page-wise extraction result. Pages keep their order so chunk offsets can
/// be resolved back to page numbers.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub pages: Vec<String>,
    pub page_count: i32,
}

impl ExtractedDocument {
    /// True when no page carries any text, as with scanned or image-only
    /// PDFs. Indexing rejects such documents instead of storing zero chunks.
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<ExtractedDocument, DocumentExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_only_pages_are_blank() {
        let extracted = ExtractedDocument {
            pages: vec!["".to_string(), "  \n\t".to_string()],
            page_count: 2,
        };
        assert!(extracted.is_blank());

        let extracted = ExtractedDocument {
            pages: vec!["".to_string(), "Chapitre un".to_string()],
            page_count: 2,
        };
        assert!(!extracted.is_blank());
    }
}
