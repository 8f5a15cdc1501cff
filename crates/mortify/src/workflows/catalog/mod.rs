//! Category reference-data import from curated CSV exports.

mod book;
mod normalizer;
mod parser;

pub use book::CategoryBook;

use crate::workflows::viability::{
    CategoryDefaults, FALLBACK_LIFESPAN_YEARS, FALLBACK_MARKET_PRICE,
};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => {
                write!(f, "failed to read category reference export: {}", err)
            }
            CatalogImportError::Csv(err) => write!(f, "invalid category CSV data: {}", err),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct CategoryReferenceImporter;

impl CategoryReferenceImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CategoryBook, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Imports rows into a [`CategoryBook`]. Blank numeric cells fall back to
    /// the service-wide defaults rather than dropping the row; rows with a
    /// blank category name are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<CategoryBook, CatalogImportError> {
        let mut rows = Vec::new();

        for record in parser::parse_records(reader)? {
            if record.normalized_name.is_empty() {
                continue;
            }

            rows.push(CategoryDefaults {
                category: record.display_name,
                avg_market_price: record.avg_market_price.unwrap_or(FALLBACK_MARKET_PRICE),
                avg_lifespan_years: record
                    .avg_lifespan_years
                    .unwrap_or(FALLBACK_LIFESPAN_YEARS),
                trivial_install: record.trivial_install,
            });
        }

        Ok(CategoryBook::new(rows))
    }
}
