//! Holdings loading port trait.

use crate::domain::error::EtfGeoError;
use crate::domain::holdings::HoldingsTable;
use std::fmt;
use std::path::Path;

/// Which parse strategy produced the table. Exposed so callers (and tests)
/// can inspect how a file was read instead of scraping console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Comma,
    Semicolon,
    Tab,
    Sniffed,
    SniffedLatin1,
    Manual,
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseStrategy::Comma => "comma-separated",
            ParseStrategy::Semicolon => "semicolon-separated",
            ParseStrategy::Tab => "tab-separated",
            ParseStrategy::Sniffed => "sniffed delimiter",
            ParseStrategy::SniffedLatin1 => "sniffed delimiter (latin-1)",
            ParseStrategy::Manual => "manual line parsing",
        };
        f.write_str(name)
    }
}

/// A loaded table together with the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub table: HoldingsTable,
    pub strategy: ParseStrategy,
}

pub trait HoldingsPort {
    fn load_holdings(&self, path: &Path) -> Result<LoadOutcome, EtfGeoError>;
}
