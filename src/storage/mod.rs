use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, StorageBackend};
use crate::error::Result;
use crate::models::quiz::{Quiz, QuizSummary};

pub mod file_store;
pub mod s3_store;

pub use file_store::FileStore;
pub use s3_store::S3Store;

pub const QUIZ_KEY_PREFIX: &str = "quiz-";
pub const QUIZ_KEY_EXTENSION: &str = "yaml";

/// A collection of quiz documents keyed by quiz id.
#[async_trait]
pub trait QuizStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn put(&self, quiz: &Quiz) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Quiz>;

    /// Summaries of every stored quiz, ordered by storage name.
    async fn list(&self) -> Result<Vec<QuizSummary>>;

    async fn delete(&self, id: &str) -> Result<()>;
}

pub fn quiz_key(id: &str) -> String {
    format!("{}{}.{}", QUIZ_KEY_PREFIX, id, QUIZ_KEY_EXTENSION)
}

/// Inverse of [`quiz_key`]. Only the final path component is considered.
pub fn quiz_id_from_key(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next()?;
    let id = name
        .strip_prefix(QUIZ_KEY_PREFIX)?
        .strip_suffix(QUIZ_KEY_EXTENSION)?
        .strip_suffix('.')?;
    if is_valid_quiz_id(id) {
        Some(id)
    } else {
        None
    }
}

pub fn is_valid_quiz_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

pub async fn build_store(config: &Config) -> Result<Arc<dyn QuizStore>> {
    match config.storage.backend {
        StorageBackend::Filesystem => {
            let store = FileStore::open(Path::new(&config.storage.directory)).await?;
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let store = S3Store::connect(&config.aws.s3_bucket, &config.aws.region).await;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_keys_from_ids() {
        assert_eq!(quiz_key("1718000000000000000"), "quiz-1718000000000000000.yaml");
    }

    #[test]
    fn parses_ids_from_keys() {
        assert_eq!(quiz_id_from_key("quiz-123.yaml"), Some("123"));
        assert_eq!(quiz_id_from_key("archive/quiz-456.yaml"), Some("456"));
        assert_eq!(quiz_id_from_key("quiz-.yaml"), None);
        assert_eq!(quiz_id_from_key("quiz-12a.yaml"), None);
        assert_eq!(quiz_id_from_key("quiz-123.yml"), None);
        assert_eq!(quiz_id_from_key("notes-123.yaml"), None);
        assert_eq!(quiz_id_from_key("quiz-123yaml"), None);
    }

    #[test]
    fn only_digit_ids_are_valid() {
        assert!(is_valid_quiz_id("0042"));
        assert!(!is_valid_quiz_id(""));
        assert!(!is_valid_quiz_id("../etc"));
        assert!(!is_valid_quiz_id("12 3"));
    }
}
