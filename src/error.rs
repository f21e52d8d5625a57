use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStreamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to parse quiz document: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object store error: {0}")]
    ObjectStore(Box<dyn std::error::Error + Send + Sync>),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::BadRequest(msg) => format!("Failed to parse quiz data: {}", msg),
            Error::NotFound(msg) => format!("Quiz not found: {}", msg),
            Error::Template(_) => "Failed to render template".to_string(),
            Error::Internal(msg) => msg.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, message).into_response()
    }
}

impl<E: 'static, R: 'static> From<SdkError<E, R>> for Error
where
    SdkError<E, R>: std::error::Error + Send + Sync,
{
    fn from(err: SdkError<E, R>) -> Self {
        Error::ObjectStore(Box::new(err))
    }
}

impl From<ByteStreamError> for Error {
    fn from(err: ByteStreamError) -> Self {
        Error::ObjectStore(Box::new(err))
    }
}
