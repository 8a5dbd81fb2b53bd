//! Default price list loaded once at startup.
//!
//! The file is a JSON document with a top-level `default_pricing` array of
//! `{price, name, value}` entries. An unreadable file aborts startup; a file
//! that reads but does not parse degrades to an empty list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::api::models::prices::PriceEntry;

#[derive(Error, Debug)]
pub enum DefaultPricingError {
    #[error("failed to read default pricing file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct PricingFile {
    default_pricing: Vec<PriceEntry>,
}

/// Immutable fallback price list, shared cheaply between handlers.
#[derive(Debug, Clone)]
pub struct DefaultPricing {
    entries: Arc<[PriceEntry]>,
}

impl DefaultPricing {
    pub fn new(entries: Vec<PriceEntry>) -> Self {
        Self { entries: entries.into() }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Read and parse the default pricing file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DefaultPricingError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|source| DefaultPricingError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let pricing = Self::parse(&contents);
        info!(path = %path.display(), entries = pricing.len(), "Loaded default pricing");
        Ok(pricing)
    }

    /// Parse file contents, falling back to an empty list on malformed input.
    pub fn parse(contents: &str) -> Self {
        match serde_json::from_str::<PricingFile>(contents) {
            Ok(file) => Self::new(file.default_pricing),
            Err(e) => {
                error!("Failed to parse default pricing, continuing with none: {e}");
                Self::empty()
            }
        }
    }

    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DefaultPricing {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;

    #[test]
    fn test_parse_accepts_numbers_and_strings() {
        let pricing = DefaultPricing::parse(
            r#"{"default_pricing": [
                {"price": 10, "name": "cpu", "value": "1.5"},
                {"price": "0.25", "name": "memory", "value": 2}
            ]}"#,
        );

        assert_eq!(pricing.len(), 2);
        assert_eq!(pricing.entries()[0].name, "cpu");
        assert_eq!(pricing.entries()[0].value, Decimal::new(15, 1));
        assert_eq!(pricing.entries()[1].price, Decimal::new(25, 2));
    }

    #[test]
    fn test_parse_failures_degrade_to_empty() {
        assert!(DefaultPricing::parse("not json").is_empty());
        assert!(DefaultPricing::parse(r#"{"other": []}"#).is_empty());
        assert!(DefaultPricing::parse(r#"{"default_pricing": [{"name": "cpu"}]}"#).is_empty());
        assert!(DefaultPricing::parse(r#"{"default_pricing": []}"#).is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_pricing": [{{"price": 1, "name": "disk", "value": 100}}]}}"#).unwrap();

        let pricing = DefaultPricing::load(file.path()).await.unwrap();
        assert_eq!(pricing.len(), 1);
        assert_eq!(pricing.entries()[0].name, "disk");
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ broken").unwrap();

        let pricing = DefaultPricing::load(file.path()).await.unwrap();
        assert!(pricing.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DefaultPricing::load(dir.path().join("missing.json")).await.unwrap_err();
        assert!(matches!(err, DefaultPricingError::Read { .. }));
    }
}
