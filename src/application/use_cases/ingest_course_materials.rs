use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::IndexingService;
use crate::application::services::indexing_service::IndexReport;

/// Scans the course-material directory and (re)indexes what changed. Run
/// once at startup and on demand through the reindex endpoint.
pub struct IngestCourseMaterialsUseCase {
    indexing_service: Arc<IndexingService>,
    data_dir: PathBuf,
}

impl IngestCourseMaterialsUseCase {
    pub fn new(indexing_service: Arc<IndexingService>, data_dir: PathBuf) -> Self {
        Self {
            indexing_service,
            data_dir,
        }
    }

    pub async fn execute(&self) -> IndexReport {
        tracing::info!("Syncing course materials from {}", self.data_dir.display());
        let report = self.indexing_service.sync_directory(&self.data_dir).await;
        tracing::info!(
            "Sync done: {} scanned, {} indexed, {} skipped, {} failed",
            report.scanned,
            report.indexed,
            report.skipped,
            report.failed
        );
        report
    }
}
