use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_REGION: &str = "us-west-2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[serde(alias = "fs", alias = "file")]
    Filesystem,
    S3,
}

impl std::str::FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filesystem" | "fs" | "file" => Ok(StorageBackend::Filesystem),
            "s3" => Ok(StorageBackend::S3),
            other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Filesystem,
            directory: PathBuf::from("quizzes"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub s3_bucket: String,
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            s3_bucket: String::new(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_address: String,
    pub static_dir: PathBuf,
    pub storage: StorageConfig,
    pub aws: AwsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8081".to_string(),
            static_dir: PathBuf::from("static"),
            storage: StorageConfig::default(),
            aws: AwsConfig::default(),
        }
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Reads `config.yaml` (or `$QUIZ_CONFIG`), then applies environment overrides.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let mut config = match env::var("QUIZ_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    tracing::warn!("{} not found, using default configuration", DEFAULT_CONFIG_PATH);
                    Self::default()
                }
            }
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(address) = get_env("SERVER_ADDRESS") {
            self.server_address = address;
        }
        if let Some(dir) = get_env("STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(backend) = get_env("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(dir) = get_env("QUIZ_DIR") {
            self.storage.directory = PathBuf::from(dir);
        }
        if let Some(bucket) = get_env("S3_BUCKET") {
            self.aws.s3_bucket = bucket;
        }
        if let Some(region) = get_env("AWS_REGION") {
            self.aws.region = region;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.backend == StorageBackend::S3 && self.aws.s3_bucket.trim().is_empty() {
            return Err(Error::Config(
                "aws.s3_bucket is required for the s3 storage backend".to_string(),
            ));
        }
        if self.aws.region.trim().is_empty() {
            return Err(Error::Config("aws.region must not be empty".to_string()));
        }
        Ok(())
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn init_config() -> Result<()> {
    let config = Config::load()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
