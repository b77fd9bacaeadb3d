use std::sync::Arc;

use crate::{
    application::{
        ports::{ChatModel, DocumentExtractor, EmbeddingProvider, ProfileStore},
        services::{AnswerService, IndexingService, MemoryService, RetrievalService},
        use_cases::{
            AskQuestionUseCase, GetStudentProfileUseCase, IngestCourseMaterialsUseCase,
            ListDocumentsUseCase, SearchPassagesUseCase,
        },
    },
    config::AppConfig,
    domain::repositories::{ChunkRepository, DocumentRepository, EmbeddingRepository},
    infrastructure::{
        database::{
            create_connection_pool, get_database_connection,
            repositories::{
                PostgresChunkRepository, PostgresDocumentRepository, PostgresEmbeddingRepository,
            },
            run_migrations,
        },
        external_services::{
            LocalEmbeddingProvider, LocalEmbeddingsConfig, OpenAiChatModel, OpenAiClient,
            OpenAiClientConfig, OpenAiEmbeddingProvider, PdfExtractor,
        },
        file_system::LocalStudentDataStore,
    },
    presentation::http::handlers::{ChatHandler, DocumentHandler, ProfileHandler, SearchHandler},
};

/// Which embedding backend the configuration resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    OpenAi,
    Local,
}

pub fn select_embedding_backend(use_openai: bool) -> EmbeddingBackend {
    if use_openai {
        EmbeddingBackend::OpenAi
    } else {
        EmbeddingBackend::Local
    }
}

pub struct AppContainer {
    // Repositories
    pub document_repository: Arc<dyn DocumentRepository>,
    pub chunk_repository: Arc<dyn ChunkRepository>,
    pub embedding_repository: Arc<dyn EmbeddingRepository>,

    // External services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub chat_model: Arc<dyn ChatModel>,
    pub document_extractor: Arc<dyn DocumentExtractor>,
    pub profile_store: Arc<dyn ProfileStore>,

    // Application services
    pub indexing_service: Arc<IndexingService>,
    pub retrieval_service: Arc<RetrievalService>,
    pub answer_service: Arc<AnswerService>,
    pub memory_service: Arc<MemoryService>,

    // Use cases
    pub ask_question_use_case: Arc<AskQuestionUseCase>,
    pub search_passages_use_case: Arc<SearchPassagesUseCase>,
    pub ingest_use_case: Arc<IngestCourseMaterialsUseCase>,
    pub list_documents_use_case: Arc<ListDocumentsUseCase>,
    pub get_profile_use_case: Arc<GetStudentProfileUseCase>,

    // HTTP handlers
    pub chat_handler: Arc<ChatHandler>,
    pub search_handler: Arc<SearchHandler>,
    pub document_handler: Arc<DocumentHandler>,
    pub profile_handler: Arc<ProfileHandler>,
}

impl AppContainer {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = create_connection_pool()?;
        let mut conn = get_database_connection()
            .map_err(|e| format!("Failed to create database connection: {}", e))?;
        run_migrations(&mut conn)
            .map_err(|e| format!("Failed to run database migrations: {}", e))?;

        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let chunk_repository: Arc<dyn ChunkRepository> =
            Arc::new(PostgresChunkRepository::new(db_pool.clone()));
        let embedding_repository: Arc<dyn EmbeddingRepository> =
            Arc::new(PostgresEmbeddingRepository::new(db_pool));

        let api_key = config.openai_api_key.clone().ok_or(
            "OPENAI_API_KEY is required for the chat model",
        )?;
        let openai_client = OpenAiClient::new(OpenAiClientConfig::new(api_key))?;

        let chat_model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(
            openai_client.clone(),
            config.openai_model_name.clone(),
            config.temperature,
        ));

        let embedding_provider: Arc<dyn EmbeddingProvider> =
            match select_embedding_backend(config.use_openai_embeddings) {
                EmbeddingBackend::OpenAi => Arc::new(OpenAiEmbeddingProvider::new(
                    openai_client,
                    config.openai_embedding_model.clone(),
                )),
                EmbeddingBackend::Local => {
                    Arc::new(LocalEmbeddingProvider::new(LocalEmbeddingsConfig::new(
                        config.embeddings_service_url.clone(),
                        config.embedding_model.clone(),
                    ))?)
                }
            };

        let document_extractor: Arc<dyn DocumentExtractor> = Arc::new(PdfExtractor::new());
        let profile_store: Arc<dyn ProfileStore> =
            Arc::new(LocalStudentDataStore::new(config.user_data_dir.clone()));

        let indexing_service = Arc::new(IndexingService::new(
            document_extractor.clone(),
            embedding_provider.clone(),
            document_repository.clone(),
            chunk_repository.clone(),
            embedding_repository.clone(),
            config.chunking.clone(),
        ));

        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            embedding_repository.clone(),
            chunk_repository.clone(),
            document_repository.clone(),
        ));

        let answer_service = Arc::new(AnswerService::new(chat_model.clone()));

        let memory_service = Arc::new(MemoryService::new(
            chat_model.clone(),
            profile_store.clone(),
            config.memory_buffer_chars,
        ));

        let ask_question_use_case = Arc::new(AskQuestionUseCase::new(
            retrieval_service.clone(),
            answer_service.clone(),
            memory_service.clone(),
            config.retrieval_k,
        ));

        let search_passages_use_case = Arc::new(SearchPassagesUseCase::new(
            retrieval_service.clone(),
            config.retrieval_k,
        ));

        let ingest_use_case = Arc::new(IngestCourseMaterialsUseCase::new(
            indexing_service.clone(),
            config.data_dir.clone(),
        ));

        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(document_repository.clone()));

        let get_profile_use_case =
            Arc::new(GetStudentProfileUseCase::new(profile_store.clone()));

        let chat_handler = Arc::new(ChatHandler::new(ask_question_use_case.clone()));
        let search_handler = Arc::new(SearchHandler::new(search_passages_use_case.clone()));
        let document_handler = Arc::new(DocumentHandler::new(
            list_documents_use_case.clone(),
            ingest_use_case.clone(),
        ));
        let profile_handler = Arc::new(ProfileHandler::new(get_profile_use_case.clone()));

        Ok(Self {
            document_repository,
            chunk_repository,
            embedding_repository,
            embedding_provider,
            chat_model,
            document_extractor,
            profile_store,
            indexing_service,
            retrieval_service,
            answer_service,
            memory_service,
            ask_question_use_case,
            search_passages_use_case,
            ingest_use_case,
            list_documents_use_case,
            get_profile_use_case,
            chat_handler,
            search_handler,
            document_handler,
            profile_handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection_follows_flag() {
        assert_eq!(select_embedding_backend(true), EmbeddingBackend::OpenAi);
        assert_eq!(select_embedding_backend(false), EmbeddingBackend::Local);
    }
}
