use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{quiz_id_from_key, quiz_key, QuizStore};
use crate::error::{Error, Result};
use crate::models::quiz::{Quiz, QuizSummary};

/// Stores each quiz as `quiz-<id>.yaml` inside a single directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Opens the store, creating `base_path` if it does not exist yet.
    pub async fn open(base_path: &Path) -> Result<Self> {
        fs::create_dir_all(base_path).await?;
        tracing::info!(path = %base_path.display(), "using filesystem quiz store");
        Ok(Self {
            base_path: base_path.to_path_buf(),
        })
    }

    fn quiz_path(&self, id: &str) -> PathBuf {
        self.base_path.join(quiz_key(id))
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("no quiz with id {}", id))
}

#[async_trait]
impl QuizStore for FileStore {
    fn backend(&self) -> &'static str {
        "filesystem"
    }

    async fn put(&self, quiz: &Quiz) -> Result<()> {
        let path = self.quiz_path(&quiz.id);
        let document = quiz.to_yaml()?;
        tracing::trace!(path = %path.display(), "writing quiz");
        fs::write(&path, document).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Quiz> {
        let path = self.quiz_path(id);
        tracing::trace!(path = %path.display(), "reading quiz");
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found(id)),
            Err(e) => return Err(e.into()),
        };
        Ok(Quiz::from_yaml(&data)?)
    }

    async fn list(&self) -> Result<Vec<QuizSummary>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if quiz_id_from_key(&name).is_some() {
                names.push(name);
            }
        }
        names.sort();

        let mut summaries = Vec::with_capacity(names.len());
        for name in names {
            let Some(id) = quiz_id_from_key(&name) else {
                continue;
            };
            match self.get(id).await {
                Ok(quiz) => summaries.push(QuizSummary {
                    id: id.to_string(),
                    title: quiz.title,
                }),
                Err(Error::NotFound(_)) => {
                    tracing::debug!(id, "quiz removed while listing");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summaries)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.quiz_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }
}
