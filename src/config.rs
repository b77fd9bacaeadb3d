use std::env;
use std::path::PathBuf;

/// Splitter parameters for the two-tier index. The parent tier keeps the
/// course assistant's historical 1000/200 values; children are sized for
/// matching precision.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkingConfig {
    pub parent_chunk_size: usize,
    pub parent_chunk_overlap: usize,
    pub child_chunk_size: usize,
    pub child_chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            parent_chunk_size: 1000,
            parent_chunk_overlap: 200,
            child_chunk_size: 300,
            child_chunk_overlap: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub user_data_dir: PathBuf,
    pub port: u16,

    pub openai_api_key: Option<String>,
    pub openai_model_name: String,
    pub temperature: f32,

    pub use_openai_embeddings: bool,
    pub openai_embedding_model: String,
    pub embeddings_service_url: String,
    pub embedding_model: String,

    pub chunking: ChunkingConfig,
    pub retrieval_k: usize,
    pub memory_buffer_chars: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env_or("DATA_DIR", "./data")),
            user_data_dir: PathBuf::from(env_or("USER_DATA_DIR", "./user_data")),
            port: env_parsed("PORT", 3000),

            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model_name: env_or("OPENAI_MODEL_NAME", "gpt-4o-mini"),
            temperature: env_parsed("TEMPERATURE", 1.0),

            use_openai_embeddings: env_bool("USE_OPENAI_EMBEDDINGS", false),
            openai_embedding_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            embeddings_service_url: env_or(
                "EMBEDDINGS_SERVICE_URL",
                "http://localhost:8080/embeddings",
            ),
            embedding_model: env_or("EMBEDDING_MODEL", "sentence-transformers/all-MiniLM-L6-v2"),

            chunking: ChunkingConfig {
                parent_chunk_size: env_parsed("PARENT_CHUNK_SIZE", 1000),
                parent_chunk_overlap: env_parsed("PARENT_CHUNK_OVERLAP", 200),
                child_chunk_size: env_parsed("CHILD_CHUNK_SIZE", 300),
                child_chunk_overlap: env_parsed("CHILD_CHUNK_OVERLAP", 60),
            },
            retrieval_k: env_parsed("RETRIEVAL_K", 4),
            memory_buffer_chars: env_parsed("MEMORY_BUFFER_CHARS", 4800),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => parse_bool(&value).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_default_chunking_matches_course_assistant() {
        let chunking = ChunkingConfig::default();
        assert_eq!(chunking.parent_chunk_size, 1000);
        assert_eq!(chunking.parent_chunk_overlap, 200);
        assert!(chunking.child_chunk_size < chunking.parent_chunk_size);
        assert!(chunking.child_chunk_overlap < chunking.child_chunk_size);
    }
}
