use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

type BoxedSource = Box<dyn Error + Send + Sync>;

/// Failures raised while extracting, aggregating or saving a report.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error("failed to open database {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    #[error("query failed: {0}")]
    Query(#[source] BoxedSource),

    #[error("failed to close database: {0}")]
    Close(#[source] BoxedSource),

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    #[error("invalid invoice date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PipelineError {
    pub fn connection(path: impl Into<PathBuf>, source: impl Into<BoxedSource>) -> Self {
        Self::Connection {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn query(source: impl Into<BoxedSource>) -> Self {
        Self::Query(source.into())
    }

    pub fn close(source: impl Into<BoxedSource>) -> Self {
        Self::Close(source.into())
    }

    pub fn output(path: impl Into<PathBuf>, source: impl Into<BoxedSource>) -> Self {
        Self::Output {
            path: path.into(),
            source: source.into(),
        }
    }
}
