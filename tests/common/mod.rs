#![allow(dead_code)]

use etfgeo::domain::error::EtfGeoError;
use etfgeo::domain::holdings::{CleanHolding, HoldingsTable};
use etfgeo::ports::holdings_port::{HoldingsPort, LoadOutcome, ParseStrategy};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// In-memory holdings source for pipeline tests that skip file parsing.
pub struct MockHoldingsPort {
    pub outcome: Option<LoadOutcome>,
    pub error: Option<String>,
}

impl MockHoldingsPort {
    pub fn with_table(table: HoldingsTable) -> Self {
        Self {
            outcome: Some(LoadOutcome {
                table,
                strategy: ParseStrategy::Comma,
            }),
            error: None,
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            outcome: None,
            error: Some(reason.to_string()),
        }
    }
}

impl HoldingsPort for MockHoldingsPort {
    fn load_holdings(&self, path: &Path) -> Result<LoadOutcome, EtfGeoError> {
        if let Some(reason) = &self.error {
            return Err(EtfGeoError::Load {
                path: path.display().to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.outcome.clone().unwrap())
    }
}

pub fn make_table(columns: &[&str], rows: &[&[&str]]) -> HoldingsTable {
    HoldingsTable::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect(),
    )
}

pub fn make_holding(country: &str, weight: f64) -> CleanHolding {
    CleanHolding {
        country: country.to_string(),
        weight,
    }
}

pub fn write_fixture(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A small but realistic three-holding export: two US names and one Japanese.
pub const SAMPLE_HOLDINGS: &[u8] =
    b"Ticker,Name,Weight (%),Location\nAAA,Alpha Corp,40%,United States\nBBB,Beta Inc,30%,United States\nCCC,Gamma KK,30%,Japan\n";
