use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::error::LoadError;
use crate::models::QuestionBank;

use super::loader::{parse_bank, BankSource, LocationSource};

/// Outcome of a bank load, shared by every quiz that asked for it.
pub type BankResult = Result<Arc<QuestionBank>, Arc<LoadError>>;

/// Observable state of one cache key.
#[derive(Debug, Clone)]
pub enum LoadState {
    NotLoaded,
    Loaded(Arc<QuestionBank>),
    Failed(Arc<LoadError>),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Memoizing question bank loader, keyed by location.
///
/// The first caller for a location performs the fetch; callers arriving while
/// it is in flight wait on the same result. Failures are cached too, so a
/// location is fetched at most once for the lifetime of the loader.
pub struct BankLoader<S = LocationSource> {
    source: S,
    cells: Mutex<HashMap<String, Arc<OnceCell<BankResult>>>>,
}

impl BankLoader<LocationSource> {
    pub fn new() -> Self {
        Self::with_source(LocationSource::new())
    }
}

impl Default for BankLoader<LocationSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BankSource> BankLoader<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn load(&self, location: &str) -> BankResult {
        let cell = self.cell(location);
        cell.get_or_init(|| self.fetch(location)).await.clone()
    }

    pub fn state(&self, location: &str) -> LoadState {
        let cells = self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match cells.get(location).and_then(|cell| cell.get()) {
            None => LoadState::NotLoaded,
            Some(Ok(bank)) => LoadState::Loaded(Arc::clone(bank)),
            Some(Err(err)) => LoadState::Failed(Arc::clone(err)),
        }
    }

    fn cell(&self, location: &str) -> Arc<OnceCell<BankResult>> {
        let mut cells = self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(cells.entry(location.to_string()).or_default())
    }

    async fn fetch(&self, location: &str) -> BankResult {
        let result = match self.source.fetch(location).await {
            Ok(content) => parse_bank(location, &content),
            Err(err) => Err(err),
        };

        match result {
            Ok(bank) => {
                info!(location, sections = bank.sections.len(), "question bank loaded");
                Ok(Arc::new(bank))
            }
            Err(err) => {
                error!(location, error = %err, "failed to fetch quiz data");
                Err(Arc::new(err))
            }
        }
    }
}
