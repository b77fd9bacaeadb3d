mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;

use config::AppConfig;
use infrastructure::AppContainer;
use presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    let container = AppContainer::new(&config).await?;

    // Index whatever is in the course directory before serving; a missing or
    // empty directory just yields an empty index.
    let report = container.ingest_use_case.execute().await;
    tracing::info!(
        "Startup ingestion: {} indexed, {} skipped, {} failed",
        report.indexed,
        report.skipped,
        report.failed
    );

    let server = HttpServer::new(
        container.chat_handler.clone(),
        container.search_handler.clone(),
        container.document_handler.clone(),
        container.profile_handler.clone(),
        config.port,
    );

    server.run().await
}
