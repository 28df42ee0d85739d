//! Weight/location column identification.
//!
//! Matches column headers against fixed keyword sets, with explicit 0-based
//! index overrides taking precedence. Inconclusive detection is an error;
//! the CLI's `columns` subcommand prints the numbered list so the caller can
//! supply an override.

use crate::domain::error::EtfGeoError;

pub const WEIGHT_KEYWORDS: [&str; 5] = ["weight", "peso", "%", "percent", "allocation"];
pub const LOCATION_KEYWORDS: [&str; 5] = ["location", "country", "paese", "nazione", "region"];

/// The chosen (weight, location) column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub weight: usize,
    pub location: usize,
}

/// First column whose lowercased name contains any of the given keywords.
fn find_by_keywords(columns: &[String], keywords: &[&str]) -> Option<usize> {
    columns.iter().position(|col| {
        let lower = col.trim().to_lowercase();
        keywords.iter().any(|kw| lower.contains(kw))
    })
}

fn resolve_override(
    kind: &'static str,
    index: usize,
    count: usize,
) -> Result<usize, EtfGeoError> {
    if index < count {
        Ok(index)
    } else {
        Err(EtfGeoError::ColumnIndex { kind, index, count })
    }
}

/// Select the weight and location columns.
///
/// Explicit overrides win; otherwise the keyword heuristic applies. A column
/// that cannot be identified either way is a hard error listing the available
/// columns.
pub fn detect_columns(
    columns: &[String],
    weight_override: Option<usize>,
    location_override: Option<usize>,
) -> Result<ColumnSelection, EtfGeoError> {
    let weight = match weight_override {
        Some(idx) => resolve_override("weight", idx, columns.len())?,
        None => find_by_keywords(columns, &WEIGHT_KEYWORDS).ok_or_else(|| {
            EtfGeoError::ColumnNotFound {
                kind: "weight",
                columns: columns.to_vec(),
            }
        })?,
    };

    let location = match location_override {
        Some(idx) => resolve_override("location", idx, columns.len())?,
        None => find_by_keywords(columns, &LOCATION_KEYWORDS).ok_or_else(|| {
            EtfGeoError::ColumnNotFound {
                kind: "location",
                columns: columns.to_vec(),
            }
        })?,
    };

    Ok(ColumnSelection { weight, location })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn detects_weight_and_location() {
        let columns = cols(&["Ticker", "Name", "Weight (%)", "Location", "Sector"]);
        let sel = detect_columns(&columns, None, None).unwrap();
        assert_eq!(sel, ColumnSelection { weight: 2, location: 3 });
    }

    #[test]
    fn detection_is_case_insensitive() {
        let columns = cols(&["TICKER", "WEIGHT", "COUNTRY"]);
        let sel = detect_columns(&columns, None, None).unwrap();
        assert_eq!(sel.weight, 1);
        assert_eq!(sel.location, 2);
    }

    #[test]
    fn detects_italian_headers() {
        let columns = cols(&["Titolo", "Peso", "Paese"]);
        let sel = detect_columns(&columns, None, None).unwrap();
        assert_eq!(sel.weight, 1);
        assert_eq!(sel.location, 2);
    }

    #[test]
    fn percent_sign_matches_weight() {
        let columns = cols(&["Name", "% of Fund", "Region"]);
        let sel = detect_columns(&columns, None, None).unwrap();
        assert_eq!(sel.weight, 1);
        assert_eq!(sel.location, 2);
    }

    #[test]
    fn first_match_wins() {
        let columns = cols(&["Allocation", "Weight", "Country", "Region"]);
        let sel = detect_columns(&columns, None, None).unwrap();
        assert_eq!(sel.weight, 0);
        assert_eq!(sel.location, 2);
    }

    #[test]
    fn missing_weight_column_is_error() {
        let columns = cols(&["Ticker", "Name", "Country"]);
        let err = detect_columns(&columns, None, None).unwrap_err();
        assert!(matches!(err, EtfGeoError::ColumnNotFound { kind: "weight", .. }));
    }

    #[test]
    fn missing_location_column_is_error() {
        let columns = cols(&["Ticker", "Weight"]);
        let err = detect_columns(&columns, None, None).unwrap_err();
        assert!(matches!(
            err,
            EtfGeoError::ColumnNotFound { kind: "location", .. }
        ));
    }

    #[test]
    fn overrides_take_precedence() {
        let columns = cols(&["Ticker", "Weight", "Country", "Exposure"]);
        let sel = detect_columns(&columns, Some(3), Some(0)).unwrap();
        assert_eq!(sel, ColumnSelection { weight: 3, location: 0 });
    }

    #[test]
    fn override_out_of_range_is_error() {
        let columns = cols(&["Ticker", "Weight", "Country"]);
        let err = detect_columns(&columns, Some(7), None).unwrap_err();
        assert!(matches!(
            err,
            EtfGeoError::ColumnIndex { kind: "weight", index: 7, count: 3 }
        ));
    }

    #[test]
    fn override_rescues_undetectable_column() {
        let columns = cols(&["Ticker", "Exposure", "Domicile"]);
        let sel = detect_columns(&columns, Some(1), Some(2)).unwrap();
        assert_eq!(sel, ColumnSelection { weight: 1, location: 2 });
    }
}
