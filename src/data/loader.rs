use std::future::Future;
use std::path::Path;

use tracing::debug;

use crate::error::LoadError;
use crate::models::QuestionBank;

/// Default question bank location, relative to a tutorial page.
pub const DEFAULT_BANK_LOCATION: &str = "../quiz/questions.json";

/// Decode a question bank document.
pub fn parse_bank(location: &str, content: &str) -> Result<QuestionBank, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::Parse {
        location: location.to_string(),
        source,
    })
}

/// Where question bank documents come from.
pub trait BankSource {
    /// Fetch the raw document at `location`.
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Fetches `http://` and `https://` locations over the network and treats
/// anything else as a file path.
#[derive(Debug, Clone, Default)]
pub struct LocationSource {
    client: reqwest::Client,
}

impl LocationSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BankSource for LocationSource {
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        if is_remote(location) {
            fetch_remote(&self.client, location).await
        } else {
            load_file(location).await
        }
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

async fn fetch_remote(client: &reqwest::Client, location: &str) -> Result<String, LoadError> {
    debug!(location, "fetching question bank");
    let response = client
        .get(location)
        .send()
        .await
        .map_err(|source| LoadError::Request {
            location: location.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            location: location.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| LoadError::Request {
        location: location.to_string(),
        source,
    })
}

async fn load_file(location: &str) -> Result<String, LoadError> {
    debug!(location, "reading question bank");
    tokio::fs::read_to_string(Path::new(location))
        .await
        .map_err(|source| LoadError::Io {
            location: location.to_string(),
            source,
        })
}

/// Resolve a bank location against the directory of the page that uses it.
///
/// Remote locations and absolute paths are returned unchanged.
pub fn resolve_location(page_dir: Option<&Path>, location: &str) -> String {
    if is_remote(location) || Path::new(location).is_absolute() {
        return location.to_string();
    }
    match page_dir {
        Some(dir) => dir.join(location).to_string_lossy().into_owned(),
        None => location.to_string(),
    }
}
