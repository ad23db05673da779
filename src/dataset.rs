// Listing Dataset - Records loaded once at startup
// JSON (bundled or external) and CSV sources, price parsing, brand derivation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Dataset compiled into the binary; used when no external file is configured.
pub const BUNDLED_DATA: &str = include_str!("../data/blogsData.json");

// ============================================================================
// RECORD
// ============================================================================

/// One listing. The four named fields are the external contract;
/// any other JSON fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Cid")]
    pub cid: i64,

    /// Display name, "Make Model Trim"
    #[serde(rename = "NameMMT")]
    pub name_mmt: String,

    #[serde(rename = "Model")]
    pub model: String,

    /// Price with thousands separators, e.g. "25,000"
    #[serde(rename = "Prc")]
    pub prc: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(cid: i64, name_mmt: &str, model: &str, prc: &str) -> Self {
        Record {
            cid,
            name_mmt: name_mmt.to_string(),
            model: model.to_string(),
            prc: prc.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    /// First whitespace-delimited token of the display name, upper-cased.
    pub fn brand(&self) -> String {
        brand_of(&self.name_mmt)
    }

    pub fn price(&self) -> Result<i64, PriceError> {
        parse_price(&self.prc)
    }

    /// Price for aggregation: malformed prices count as zero.
    pub fn price_or_zero(&self) -> i64 {
        self.price().unwrap_or(0)
    }
}

pub fn brand_of(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

// ============================================================================
// PRICE PARSING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price {0:?} has no leading digits")]
    NotNumeric(String),

    #[error("price {0:?} does not fit in a 64-bit integer")]
    OutOfRange(String),
}

/// Parse a separator-formatted price ("25,000" -> 25000).
///
/// Commas are stripped, an optional sign is accepted, and only the leading
/// run of digits is read, so "25,000.99" parses to 25000.
pub fn parse_price(raw: &str) -> Result<i64, PriceError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();

    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    if digits.is_empty() {
        return Err(PriceError::NotNumeric(raw.to_string()));
    }

    let value: i64 = digits
        .parse()
        .map_err(|_| PriceError::OutOfRange(raw.to_string()))?;

    Ok(if negative { -value } else { value })
}

// ============================================================================
// DATASET
// ============================================================================

/// Immutable, ordered record set. Never mutated after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

/// CSV row shape; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Cid")]
    cid: i64,
    #[serde(rename = "NameMMT")]
    name_mmt: String,
    #[serde(rename = "Model")]
    model: String,
    #[serde(rename = "Prc")]
    prc: String,
}

impl From<CsvRecord> for Record {
    fn from(row: CsvRecord) -> Self {
        Record::new(row.cid, &row.name_mmt, &row.model, &row.prc)
    }
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        for record in &records {
            if let Err(e) = record.price() {
                warn!(cid = record.cid, error = %e, "malformed price, counted as 0 in aggregates");
            }
        }
        Dataset { records }
    }

    /// The dataset bundled with the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_DATA).context("Failed to parse bundled dataset")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<Record> =
            serde_json::from_str(json).context("Failed to deserialize records")?;
        Ok(Self::from_records(records))
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid JSON dataset {}", path.display()))
    }

    pub fn load_csv(csv_path: &Path) -> Result<Self> {
        let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let row: CsvRecord = result.context("Failed to deserialize record")?;
            records.push(row.into());
        }

        Ok(Self::from_records(records))
    }

    /// Load from `path` (".csv" → CSV, anything else → JSON), or the bundled data.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let dataset = match path {
            Some(p) if is_csv(p) => Self::load_csv(p)?,
            Some(p) => Self::load_json(p)?,
            None => Self::bundled()?,
        };

        match path {
            Some(p) => info!(source = %p.display(), records = dataset.len(), "dataset loaded"),
            None => info!(source = "bundled", records = dataset.len(), "dataset loaded"),
        }

        Ok(dataset)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with the given id (ids are not guaranteed unique).
    pub fn find(&self, cid: i64) -> Option<&Record> {
        self.records.iter().find(|r| r.cid == cid)
    }

    /// Records whose brand equals `first_word`, compared case-insensitively.
    pub fn by_first_word(&self, first_word: &str) -> Vec<&Record> {
        let wanted = first_word.to_uppercase();
        self.records
            .iter()
            .filter(|r| r.brand() == wanted)
            .collect()
    }

    /// Sum of all well-formed prices, saturating at the i64 bounds.
    pub fn total_value(&self) -> i64 {
        self.records
            .iter()
            .map(Record::price_or_zero)
            .fold(0i64, i64::saturating_add)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}
