use async_trait::async_trait;
use lopdf::{Document, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::path::Path;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedDocument,
};

pub struct PdfExtractor {
    password: String,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn filter_func(object_id: (u32, u16), object: &mut Object) -> Option<((u32, u16), Object)> {
        static IGNORE: &[&[u8]] = &[
            b"Length",
            b"BBox",
            b"Matrix",
            b"Filter",
            b"ColorSpace",
            b"Width",
            b"Height",
            b"BitsPerComponent",
            b"PTEX.FileName",
            b"PTEX.PageNumber",
            b"PTEX.InfoDict",
            b"FontDescriptor",
            b"ExtGState",
            b"MediaBox",
        ];

        if let Object::Dictionary(dict) = object {
            let keys_to_remove: Vec<_> = dict
                .iter()
                .filter_map(|(key, _)| {
                    if IGNORE.contains(&key.as_slice()) {
                        Some(key.clone())
                    } else {
                        None
                    }
                })
                .collect();
            for key in keys_to_remove {
                dict.remove(&key);
            }
        }

        Some((object_id, object.to_owned()))
    }

    fn extract_pages(doc: &Document) -> Result<Vec<String>, DocumentExtractionError> {
        let pages = doc.get_pages();

        let mut extracted: Vec<(u32, String)> = pages
            .into_par_iter()
            .map(|(page_num, _): (u32, (u32, u16))| {
                let text = doc.extract_text(&[page_num]).unwrap_or_default();

                let lines: Vec<String> = text
                    .split('\n')
                    .map(|s| s.trim_end().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();

                (page_num, lines.join("\n"))
            })
            .collect();

        extracted.sort_by_key(|(page_num, _)| *page_num);

        Ok(extracted.into_iter().map(|(_, text)| text).collect())
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedDocument, DocumentExtractionError> {
        let mut doc = Document::load_filtered(path, Self::filter_func)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&self.password).map_err(|_e| {
                DocumentExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        let pages = Self::extract_pages(&doc)?;
        let page_count = pages.len() as i32;

        Ok(ExtractedDocument { pages, page_count })
    }
}
