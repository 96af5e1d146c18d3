//! Ticker symbol catalog and symbol normalization

use crate::error::{Result, StockError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Longest symbol accepted from the form (e.g. `BRK.B`, `^GSPC`, `EURUSD=X`)
const MAX_SYMBOL_LEN: usize = 15;

#[derive(Debug, Deserialize)]
struct SymbolRow {
    symbol: String,
}

/// Read the `symbol` column of a CSV file with a header row
///
/// Other columns are ignored and blank symbols are skipped.
pub fn load_symbols(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut symbols = Vec::new();
    for row in reader.deserialize::<SymbolRow>() {
        let row = row?;
        if !row.symbol.is_empty() {
            symbols.push(row.symbol);
        }
    }
    Ok(symbols)
}

/// The static list of symbols offered on the home page
///
/// The file is re-read on every call so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    path: PathBuf,
}

impl SymbolCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Catalog symbols, or an empty list when the file cannot be read
    pub fn symbols(&self) -> Vec<String> {
        load_symbols(&self.path).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "failed to read symbol catalog");
            Vec::new()
        })
    }
}

/// Trim and upper-case a symbol typed or picked by the user
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_ascii_uppercase();

    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));

    if valid {
        Ok(symbol)
    } else {
        Err(StockError::InvalidSymbol(raw.trim().to_string()))
    }
}
