use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    id: Uuid,
    child_chunk_id: Uuid,
    model_name: String,
    embedding: Vector,
    generated_at: DateTime<Utc>,
}

impl Embedding {
    pub fn new(child_chunk_id: Uuid, model_name: String, embedding: Vector) -> Self {
        Self {
            id: Uuid::new_v4(),
            child_chunk_id,
            model_name,
            embedding,
            generated_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        child_chunk_id: Uuid,
        model_name: String,
        embedding: Vector,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            child_chunk_id,
            model_name,
            embedding,
            generated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn child_chunk_id(&self) -> Uuid {
        self.child_chunk_id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn dimension(&self) -> usize {
        self.embedding.as_slice().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_dimension() {
        let emb = Embedding::new(
            Uuid::new_v4(),
            "all-MiniLM-L6-v2".to_string(),
            Vector::from(vec![0.1, 0.2, 0.3]),
        );
        assert_eq!(emb.dimension(), 3);
        assert_eq!(emb.model_name(), "all-MiniLM-L6-v2");
    }
}
