use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{DocumentExtractor, EmbeddingProvider};
use crate::application::services::page_map::PageMap;
use crate::application::services::text_splitter::{RecursiveSplitter, SplitParams};
use crate::config::ChunkingConfig;
use crate::domain::entities::{ChildChunk, Document, Embedding, ParentChunk};
use crate::domain::repositories::{ChunkRepository, DocumentRepository, EmbeddingRepository};
use crate::domain::value_objects::ContentHash;

const EMBEDDING_BATCH_SIZE: usize = 10;

#[derive(Debug)]
pub enum IndexingError {
    IoError(String),
    ExtractionError(String),
    EmbeddingError(String),
    RepositoryError(String),
}

impl std::fmt::Display for IndexingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexingError::IoError(msg) => write!(f, "IO error: {}", msg),
            IndexingError::ExtractionError(msg) => write!(f, "Extraction error: {}", msg),
            IndexingError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            IndexingError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for IndexingError {}

/// Outcome of one directory sync.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct IndexReport {
    pub scanned: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub parent_chunks: usize,
    pub child_chunks: usize,
}

/// Builds the two-tier index: PDFs from the data directory are split into
/// parent chunks for context and child chunks for matching, the children are
/// embedded in batches, and everything is persisted behind the repository
/// traits.
pub struct IndexingService {
    document_extractor: Arc<dyn DocumentExtractor>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    embedding_repository: Arc<dyn EmbeddingRepository>,
    splitter: RecursiveSplitter,
    chunking: ChunkingConfig,
}

impl IndexingService {
    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        embedding_repository: Arc<dyn EmbeddingRepository>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            document_extractor,
            embedding_provider,
            document_repository,
            chunk_repository,
            embedding_repository,
            splitter: RecursiveSplitter::default(),
            chunking,
        }
    }

    /// Indexes every PDF under `data_dir` that is new or has changed on
    /// disk. A missing directory is logged and produces an empty report
    /// rather than an error.
    pub async fn sync_directory(&self, data_dir: &Path) -> IndexReport {
        let files = scan_pdf_files(data_dir);
        if files.is_empty() {
            if !data_dir.exists() {
                tracing::error!("Data path {} does not exist", data_dir.display());
            } else {
                tracing::warn!("No PDF files found under {}", data_dir.display());
            }
            return IndexReport::default();
        }

        let mut report = IndexReport {
            scanned: files.len(),
            ..Default::default()
        };

        for path in files {
            match self.index_file(&path).await {
                Ok(Some((parents, children))) => {
                    tracing::info!(
                        "Indexed {} ({} parent chunks, {} child chunks)",
                        path.display(),
                        parents,
                        children
                    );
                    report.indexed += 1;
                    report.parent_chunks += parents;
                    report.child_chunks += children;
                }
                Ok(None) => {
                    tracing::info!("Skipping {} (already indexed)", path.display());
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to index {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Returns the chunk counts for a freshly indexed file, or `None` when
    /// the file's content hash is already in the index.
    async fn index_file(&self, path: &Path) -> Result<Option<(usize, usize)>, IndexingError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IndexingError::IoError(e.to_string()))?;
        let hash = ContentHash::from_bytes(&bytes);
        let path_str = path.to_string_lossy().to_string();

        if let Some(existing) = self
            .document_repository
            .find_by_path(&path_str)
            .await
            .map_err(|e| IndexingError::RepositoryError(e.to_string()))?
        {
            if existing.is_indexed() && existing.matches_content(&hash) {
                let models = self
                    .embedding_repository
                    .model_names_for_document(existing.id())
                    .await
                    .map_err(|e| IndexingError::RepositoryError(e.to_string()))?;
                if !embeddings_are_stale(&models, self.embedding_provider.model_name()) {
                    return Ok(None);
                }
                tracing::info!(
                    "Reindexing {} (embeddings were built with a different model)",
                    existing.file_name()
                );
            }
            // Content changed, the embedding backend changed, or a previous
            // run died midway: drop the stale document and its chunks, then
            // reindex.
            self.document_repository
                .delete(existing.id())
                .await
                .map_err(|e| IndexingError::RepositoryError(e.to_string()))?;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path_str.clone());

        let mut document = Document::new(path_str, file_name, Some(bytes.len() as i64), hash);
        document
            .start_indexing()
            .map_err(IndexingError::RepositoryError)?;
        self.document_repository
            .save(&document)
            .await
            .map_err(|e| IndexingError::RepositoryError(e.to_string()))?;

        match self.build_index(&document, path).await {
            Ok((parents, children, page_count)) => {
                document
                    .complete_indexing(page_count)
                    .map_err(IndexingError::RepositoryError)?;
                self.document_repository
                    .update(&document)
                    .await
                    .map_err(|e| IndexingError::RepositoryError(e.to_string()))?;
                Ok(Some((parents, children)))
            }
            Err(e) => {
                let _ = document.fail_indexing(e.to_string());
                if let Err(update_err) = self.document_repository.update(&document).await {
                    tracing::error!(
                        "Could not record indexing failure for {}: {}",
                        document.file_name(),
                        update_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn build_index(
        &self,
        document: &Document,
        path: &Path,
    ) -> Result<(usize, usize, i32), IndexingError> {
        let extracted = self
            .document_extractor
            .extract(path)
            .await
            .map_err(|e| IndexingError::ExtractionError(e.to_string()))?;

        if extracted.is_blank() {
            return Err(IndexingError::ExtractionError(
                "no extractable text (scanned or image-only PDF?)".to_string(),
            ));
        }

        let page_map = PageMap::from_pages(&extracted.pages);

        let parent_params = SplitParams::new(
            self.chunking.parent_chunk_size,
            self.chunking.parent_chunk_overlap,
        );
        let child_params = SplitParams::new(
            self.chunking.child_chunk_size,
            self.chunking.child_chunk_overlap,
        );

        let parents = build_parents(document.id(), &page_map, &self.splitter, parent_params);
        let children = build_children(document.id(), &parents, &self.splitter, child_params);

        self.chunk_repository
            .save_parents(&parents)
            .await
            .map_err(|e| IndexingError::RepositoryError(e.to_string()))?;
        self.chunk_repository
            .save_children(&children)
            .await
            .map_err(|e| IndexingError::RepositoryError(e.to_string()))?;

        let embeddings = self.embed_children(&children).await?;
        self.embedding_repository
            .save_batch(&embeddings)
            .await
            .map_err(|e| IndexingError::RepositoryError(e.to_string()))?;

        Ok((parents.len(), children.len(), page_map.page_count()))
    }

    async fn embed_children(
        &self,
        children: &[ChildChunk],
    ) -> Result<Vec<Embedding>, IndexingError> {
        let embeddable: Vec<&ChildChunk> = children.iter().filter(|c| c.is_embeddable()).collect();
        let model_name = self.embedding_provider.model_name().to_string();
        let mut embeddings = Vec::with_capacity(embeddable.len());

        for batch in embeddable.chunks(EMBEDDING_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.chunk_text().to_string()).collect();
            let vectors = self
                .embedding_provider
                .embed_batch(&texts)
                .await
                .map_err(|e| IndexingError::EmbeddingError(e.to_string()))?;

            if vectors.len() != batch.len() {
                return Err(IndexingError::EmbeddingError(format!(
                    "Provider returned {} vectors for {} texts",
                    vectors.len(),
                    batch.len()
                )));
            }

            for (chunk, vector) in batch.iter().zip(vectors) {
                embeddings.push(Embedding::new(chunk.id(), model_name.clone(), vector));
            }
        }

        Ok(embeddings)
    }
}

/// A document's stored embeddings are stale when any of them came from a
/// model other than the one currently configured. Different models disagree
/// on dimensions, so stale vectors can never serve a query.
fn embeddings_are_stale(models: &[String], current_model: &str) -> bool {
    models.iter().any(|model| model != current_model)
}

/// PDF files under `dir`, sorted by path. A missing or unreadable directory
/// yields an empty list.
pub fn scan_pdf_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();

    files.sort();
    files
}

fn build_parents(
    document_id: Uuid,
    page_map: &PageMap,
    splitter: &RecursiveSplitter,
    params: SplitParams,
) -> Vec<ParentChunk> {
    splitter
        .split(page_map.text(), params)
        .into_iter()
        .enumerate()
        .map(|(index, span)| {
            let page = page_map.page_for_offset(span.start_offset);
            ParentChunk::new(
                document_id,
                span.text,
                index as i32,
                span.start_offset as i32,
                page,
            )
        })
        .collect()
}

fn build_children(
    document_id: Uuid,
    parents: &[ParentChunk],
    splitter: &RecursiveSplitter,
    params: SplitParams,
) -> Vec<ChildChunk> {
    let mut children = Vec::new();
    for parent in parents {
        for (index, span) in splitter.split(parent.chunk_text(), params).into_iter().enumerate() {
            children.push(ChildChunk::new(
                parent.id(),
                document_id,
                span.text,
                index as i32,
                span.start_offset as i32,
            ));
        }
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_switch_marks_embeddings_stale() {
        let models = vec!["all-MiniLM-L6-v2".to_string()];
        assert!(embeddings_are_stale(&models, "text-embedding-3-small"));
        assert!(!embeddings_are_stale(&models, "all-MiniLM-L6-v2"));
        // a document with no embeddings has nothing stale to rebuild
        assert!(!embeddings_are_stale(&[], "text-embedding-3-small"));
    }

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let missing = std::env::temp_dir().join(format!("tutor-rag-none-{}", Uuid::new_v4()));
        assert!(scan_pdf_files(&missing).is_empty());
    }

    #[test]
    fn test_scan_keeps_only_pdfs() {
        let dir = std::env::temp_dir().join(format!("tutor-rag-scan-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cours1.pdf"), b"pdf").unwrap();
        std::fs::write(dir.join("Cours2.PDF"), b"pdf").unwrap();
        std::fs::write(dir.join("notes.txt"), b"txt").unwrap();

        let files = scan_pdf_files(&dir);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        }));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_parent_chunks_respect_params_and_pages() {
        let pages = vec![
            "Chapitre un. ".repeat(20),
            "Chapitre deux. ".repeat(20),
        ];
        let page_map = PageMap::from_pages(&pages);
        let splitter = RecursiveSplitter::default();
        let params = SplitParams::new(80, 16);

        let document_id = Uuid::new_v4();
        let parents = build_parents(document_id, &page_map, &splitter, params);

        assert!(!parents.is_empty());
        for (i, parent) in parents.iter().enumerate() {
            assert_eq!(parent.chunk_index(), i as i32);
            assert!(parent.chunk_text().chars().count() <= 80);
            assert_eq!(parent.document_id(), document_id);
            assert!(parent.page_number().is_some());
        }

        // A chunk that starts inside page two cites page two.
        let last = parents.last().unwrap();
        assert_eq!(last.page_number(), Some(2));
    }

    #[test]
    fn test_children_nest_inside_their_parent() {
        let pages = vec!["Les embeddings encodent le sens des mots. ".repeat(10)];
        let page_map = PageMap::from_pages(&pages);
        let splitter = RecursiveSplitter::default();

        let document_id = Uuid::new_v4();
        let parents = build_parents(document_id, &page_map, &splitter, SplitParams::new(120, 20));
        let children = build_children(document_id, &parents, &splitter, SplitParams::new(40, 8));

        assert!(!children.is_empty());
        for child in &children {
            let parent = parents
                .iter()
                .find(|p| p.id() == child.parent_chunk_id())
                .expect("child points at a known parent");

            let start = child.start_offset() as usize;
            let slice = &parent.chunk_text()[start..start + child.chunk_text().len()];
            assert_eq!(slice, child.chunk_text());
            assert!(child.chunk_text().chars().count() <= 40);
        }
    }
}
