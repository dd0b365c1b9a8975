//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failure to fetch or decode the question bank.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bank file could not be read.
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
    /// The HTTP request itself failed (connection, TLS, body).
    #[error("request for {location} failed: {source}")]
    Request {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("failed to load {location}: status {status}")]
    Status { location: String, status: u16 },
    /// The document is not a valid question bank.
    #[error("failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A section that deserialized but cannot be used to run a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("section {section}: question {question} has no options")]
    NoOptions { section: String, question: usize },
    #[error(
        "section {section}: question {question} has answerIndex {answer_index} but only {option_count} options"
    )]
    AnswerOutOfRange {
        section: String,
        question: usize,
        answer_index: usize,
        option_count: usize,
    },
}

/// Failure to read a tutorial page into an element tree.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("markup error at byte {position}: {message}")]
    Markup { position: u64, message: String },
    #[error("page has no root element")]
    NoRoot,
}

/// Invalid chapter table or environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("chapter table is empty")]
    EmptyChapterTable,
    #[error("chapter slug {0:?} appears more than once")]
    DuplicateSlug(String),
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Top-level error for the command line and the terminal quiz.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load questions: {0}")]
    Load(#[from] Arc<LoadError>),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
