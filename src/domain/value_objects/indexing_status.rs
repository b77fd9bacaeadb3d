use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexingStatus {
    Pending,
    Indexing,
    Indexed,
    Failed(String),
}

impl IndexingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            IndexingStatus::Pending => "pending",
            IndexingStatus::Indexing => "indexing",
            IndexingStatus::Indexed => "indexed",
            IndexingStatus::Failed(_) => "failed",
        }
    }

    pub fn from_db(status: &str, error: Option<String>) -> Self {
        match status {
            "indexing" => IndexingStatus::Indexing,
            "indexed" => IndexingStatus::Indexed,
            "failed" => IndexingStatus::Failed(error.unwrap_or_default()),
            _ => IndexingStatus::Pending,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            IndexingStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl std::fmt::Display for IndexingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_round_trip() {
        let status = IndexingStatus::Failed("boom".to_string());
        let restored =
            IndexingStatus::from_db(status.as_str(), status.error_message().map(String::from));
        assert_eq!(status, restored);

        let indexed = IndexingStatus::from_db("indexed", None);
        assert_eq!(indexed, IndexingStatus::Indexed);
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(IndexingStatus::from_db("???", None), IndexingStatus::Pending);
    }
}
