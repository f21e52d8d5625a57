pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use crate::services::quiz_service::QuizService;
use crate::storage::QuizStore;

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn QuizStore>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            quiz_service: QuizService::new(store),
            static_dir: static_dir.into(),
        }
    }
}
