mod cache;
mod loader;

pub use cache::{BankLoader, BankResult, LoadState};
pub use loader::{parse_bank, resolve_location, BankSource, LocationSource, DEFAULT_BANK_LOCATION};
