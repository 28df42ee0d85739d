//! CSV holdings adapter with cascading parse strategies.
//!
//! Strategies are tried in a fixed order; the first one whose delimiter
//! splits the header and whose records all parse wins. The final
//! fallback scans lines by hand for a recognizable header. A configured
//! preamble skip copies the remainder of the file to a scratch file next to
//! the input, which is removed when the load finishes regardless of outcome.

use crate::domain::error::EtfGeoError;
use crate::domain::holdings::HoldingsTable;
use crate::ports::holdings_port::{HoldingsPort, LoadOutcome, ParseStrategy};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Keywords that mark a header line during manual parsing.
const HEADER_KEYWORDS: [&str; 5] = ["ticker", "weight", "location", "name", "sector"];

/// Delimiters considered by the sniffer.
const SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Minimum fields for a manually parsed data row.
const MIN_MANUAL_FIELDS: usize = 3;

pub struct CsvAdapter {
    skip_lines: usize,
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self { skip_lines: 0 }
    }

    /// Skip the first `skip_lines` lines before structured parsing, for
    /// exports that carry a vendor preamble ("Fund Holdings as of ...").
    pub fn with_skip_lines(skip_lines: usize) -> Self {
        Self { skip_lines }
    }

    /// First `n` raw lines of the file, lossily decoded, for diagnostics
    /// after a failed load.
    pub fn raw_preview(path: &Path, n: usize) -> Result<Vec<String>, EtfGeoError> {
        let bytes = fs::read(path).map_err(|e| EtfGeoError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.lines().take(n).map(|l| l.to_string()).collect())
    }

    fn load_file(&self, path: &Path) -> Result<LoadOutcome, EtfGeoError> {
        let bytes = fs::read(path).map_err(|e| EtfGeoError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let utf8 = String::from_utf8(bytes.clone()).ok();
        let latin1 = decode_latin1(&bytes);

        if let Some(ref text) = utf8 {
            for (delim, strategy) in [
                (b',', ParseStrategy::Comma),
                (b';', ParseStrategy::Semicolon),
                (b'\t', ParseStrategy::Tab),
            ] {
                if let Some(table) = parse_delimited(text, delim) {
                    return Ok(LoadOutcome { table, strategy });
                }
            }
            if let Some(table) = parse_delimited(text, sniff_delimiter(text)) {
                return Ok(LoadOutcome {
                    table,
                    strategy: ParseStrategy::Sniffed,
                });
            }
        }

        if let Some(table) = parse_delimited(&latin1, sniff_delimiter(&latin1)) {
            return Ok(LoadOutcome {
                table,
                strategy: ParseStrategy::SniffedLatin1,
            });
        }

        let text = utf8.as_deref().unwrap_or(&latin1);
        if let Some(table) = manual_parse(text) {
            return Ok(LoadOutcome {
                table,
                strategy: ParseStrategy::Manual,
            });
        }

        Err(EtfGeoError::ParseExhausted {
            path: path.display().to_string(),
        })
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldingsPort for CsvAdapter {
    fn load_holdings(&self, path: &Path) -> Result<LoadOutcome, EtfGeoError> {
        if self.skip_lines == 0 {
            return self.load_file(path);
        }

        let bytes = fs::read(path).map_err(|e| EtfGeoError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let remainder = skip_preamble(&bytes, self.skip_lines);

        // Scratch file lives next to the input and is removed on drop,
        // whether or not parsing succeeds.
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut scratch = tempfile::Builder::new()
            .prefix(".etfgeo-scratch-")
            .suffix(".csv")
            .tempfile_in(dir)?;
        scratch.write_all(remainder)?;
        scratch.flush()?;

        let result = self.load_file(scratch.path());
        // Map errors back to the caller's path, not the scratch path.
        result.map_err(|e| match e {
            EtfGeoError::ParseExhausted { .. } => EtfGeoError::ParseExhausted {
                path: path.display().to_string(),
            },
            EtfGeoError::Load { reason, .. } => EtfGeoError::Load {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }
}

/// Latin-1 maps each byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Drop the first `n` lines (LF or CRLF) from the raw bytes.
fn skip_preamble(bytes: &[u8], n: usize) -> &[u8] {
    let mut start = 0;
    let mut skipped = 0;
    while skipped < n {
        match bytes[start..].iter().position(|&b| b == b'\n') {
            Some(pos) => {
                start += pos + 1;
                skipped += 1;
            }
            None => return &[],
        }
    }
    &bytes[start..]
}

/// Most frequent candidate delimiter in the first non-empty line, defaulting
/// to a comma when none appears.
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    SNIFF_CANDIDATES
        .iter()
        .copied()
        .map(|d| (d, first_line.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Parse with a fixed delimiter. Succeeds only if the delimiter splits the
/// header into at least two columns, every record parses with the same field
/// count, and there is at least one data row.
fn parse_delimited(text: &str, delimiter: u8) -> Option<HoldingsTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .ok()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.len() < 2 || columns.iter().all(|c| c.is_empty()) {
        return None;
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.ok()?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    if rows.is_empty() {
        return None;
    }

    Some(HoldingsTable::new(columns, rows))
}

/// Quote-aware split of a single line, falling back to a plain comma split.
fn split_line(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    if let Some(Ok(record)) = reader.records().next() {
        return record.iter().map(|f| f.to_string()).collect();
    }
    line.split(',').map(|f| f.trim().to_string()).collect()
}

/// Last-resort parser: find a header line by keyword, then read each later
/// line to the header's width, padding short rows and discarding rows with
/// fewer than three fields.
fn manual_parse(text: &str) -> Option<HoldingsTable> {
    let mut columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match &columns {
            None => {
                let lower = line.to_lowercase();
                if HEADER_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
                    columns = Some(split_line(line));
                }
            }
            Some(header) => {
                let mut fields = split_line(line);
                if fields.len() < MIN_MANUAL_FIELDS {
                    continue;
                }
                while fields.len() < header.len() {
                    fields.push(String::new());
                }
                fields.truncate(header.len());
                rows.push(fields);
            }
        }
    }

    match columns {
        Some(columns) if !rows.is_empty() => Some(HoldingsTable::new(columns, rows)),
        _ => None,
    }
}
