//! Row cleaning: weight parsing and location normalization.
//!
//! Rows with a missing weight or location field are dropped, as are rows
//! whose weight fails to parse after stripping `%` and mapping the decimal
//! comma. Dropped counts are kept so callers can report what was discarded.

use crate::domain::columns::ColumnSelection;
use crate::domain::holdings::{CleanHolding, HoldingsTable};
use crate::domain::normalize::normalize_country;

/// Outcome of the cleaning pass over a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningResult {
    pub holdings: Vec<CleanHolding>,
    pub dropped_missing: usize,
    pub dropped_unparseable: usize,
}

impl CleaningResult {
    pub fn dropped_total(&self) -> usize {
        self.dropped_missing + self.dropped_unparseable
    }
}

/// Parse a raw weight field: strip `%`, map decimal comma to point, trim.
/// Returns `None` for empty or unparseable values.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('%', "").replace(',', ".");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Run the cleaning pass over the table using the selected columns.
pub fn clean_holdings(table: &HoldingsTable, selection: &ColumnSelection) -> CleaningResult {
    let mut holdings = Vec::with_capacity(table.row_count());
    let mut dropped_missing = 0usize;
    let mut dropped_unparseable = 0usize;

    for i in 0..table.row_count() {
        let weight_raw = table.field(i, selection.weight).unwrap_or("");
        let location_raw = table.field(i, selection.location).unwrap_or("");

        if weight_raw.trim().is_empty() || location_raw.trim().is_empty() {
            dropped_missing += 1;
            continue;
        }

        let Some(weight) = parse_weight(weight_raw) else {
            dropped_unparseable += 1;
            continue;
        };

        holdings.push(CleanHolding {
            country: normalize_country(location_raw),
            weight,
        });
    }

    CleaningResult {
        holdings,
        dropped_missing,
        dropped_unparseable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<&str>>) -> HoldingsTable {
        HoldingsTable::new(
            vec!["Ticker".into(), "Weight".into(), "Location".into()],
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    const SELECTION: ColumnSelection = ColumnSelection { weight: 1, location: 2 };

    #[test]
    fn parse_weight_plain_number() {
        assert_eq!(parse_weight("12.5"), Some(12.5));
    }

    #[test]
    fn parse_weight_percent_sign() {
        assert_eq!(parse_weight("40%"), Some(40.0));
    }

    #[test]
    fn parse_weight_decimal_comma_and_percent() {
        assert_eq!(parse_weight("12,5%"), Some(12.5));
    }

    #[test]
    fn parse_weight_surrounding_whitespace() {
        assert_eq!(parse_weight("  3.75 % "), Some(3.75));
    }

    #[test]
    fn parse_weight_rejects_garbage() {
        assert_eq!(parse_weight("n/a"), None);
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("--"), None);
    }

    #[test]
    fn parse_weight_rejects_non_finite() {
        assert_eq!(parse_weight("inf"), None);
        assert_eq!(parse_weight("NaN"), None);
    }

    #[test]
    fn clean_keeps_valid_rows() {
        let t = table(vec![
            vec!["AAA", "40%", "United States"],
            vec!["BBB", "30%", "Japan"],
        ]);
        let result = clean_holdings(&t, &SELECTION);
        assert_eq!(result.holdings.len(), 2);
        assert_eq!(result.holdings[0].country, "United States");
        assert_eq!(result.holdings[0].weight, 40.0);
        assert_eq!(result.dropped_total(), 0);
    }

    #[test]
    fn clean_drops_missing_weight() {
        let t = table(vec![
            vec!["AAA", "", "United States"],
            vec!["BBB", "30%", "Japan"],
        ]);
        let result = clean_holdings(&t, &SELECTION);
        assert_eq!(result.holdings.len(), 1);
        assert_eq!(result.dropped_missing, 1);
    }

    #[test]
    fn clean_drops_missing_location() {
        let t = table(vec![vec!["AAA", "40%", "  "]]);
        let result = clean_holdings(&t, &SELECTION);
        assert!(result.holdings.is_empty());
        assert_eq!(result.dropped_missing, 1);
    }

    #[test]
    fn clean_drops_unparseable_weight() {
        let t = table(vec![
            vec!["AAA", "not-a-number", "United States"],
            vec!["BBB", "30%", "Japan"],
        ]);
        let result = clean_holdings(&t, &SELECTION);
        assert_eq!(result.holdings.len(), 1);
        assert_eq!(result.dropped_unparseable, 1);
    }

    #[test]
    fn clean_handles_short_rows() {
        let t = table(vec![vec!["AAA", "40%"]]);
        let result = clean_holdings(&t, &SELECTION);
        assert!(result.holdings.is_empty());
        assert_eq!(result.dropped_missing, 1);
    }

    #[test]
    fn clean_normalizes_country_names() {
        let t = table(vec![vec!["AAA", "5.0", " Korea (South) "]]);
        let result = clean_holdings(&t, &SELECTION);
        assert_eq!(result.holdings[0].country, "South Korea");
    }
}
