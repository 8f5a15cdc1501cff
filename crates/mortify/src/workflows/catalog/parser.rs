use super::normalizer::normalize_name;
use crate::workflows::viability::numeric::{parse_optional_amount, parse_optional_int};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One parsed reference row, numerics already coerced. Missing numerics stay
/// absent here; the importer decides what absence falls back to.
#[derive(Debug)]
pub(crate) struct CategoryRecord {
    pub(crate) normalized_name: String,
    pub(crate) display_name: String,
    pub(crate) avg_market_price: Option<f64>,
    pub(crate) avg_lifespan_years: Option<u8>,
    pub(crate) trivial_install: bool,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<CategoryRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<CategoryRow>()
        .map(|record| record.map(CategoryRecord::from))
        .collect()
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Average Price", default, deserialize_with = "blank_as_none")]
    average_price: Option<String>,
    #[serde(rename = "Lifespan Years", default, deserialize_with = "blank_as_none")]
    lifespan_years: Option<String>,
    #[serde(rename = "Simple Install", default, deserialize_with = "blank_as_none")]
    simple_install: Option<String>,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            normalized_name: normalize_name(&row.category),
            display_name: row.category.trim().to_string(),
            avg_market_price: row.market_price(),
            avg_lifespan_years: row.lifespan(),
            trivial_install: row.trivial_install(),
        }
    }
}

impl CategoryRow {
    fn market_price(&self) -> Option<f64> {
        self.average_price.as_deref().and_then(parse_optional_amount)
    }

    fn lifespan(&self) -> Option<u8> {
        let years = self.lifespan_years.as_deref().and_then(parse_optional_int)?;
        u8::try_from(years).ok()
    }

    /// Exports spell the flag in Spanish or English; unrecognized values
    /// mean a full installation.
    fn trivial_install(&self) -> bool {
        let Some(raw) = self.simple_install.as_deref() else {
            return false;
        };
        matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "si" | "sí" | "yes" | "y" | "true" | "1"
        )
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}
