//! Domain error types.

/// Top-level error type for etfgeo.
#[derive(Debug, thiserror::Error)]
pub enum EtfGeoError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("cannot read {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("no parse strategy produced a table for {path}")]
    ParseExhausted { path: String },

    #[error("cannot identify {kind} column; available columns: {}", columns.join(", "))]
    ColumnNotFound {
        kind: &'static str,
        columns: Vec<String>,
    },

    #[error("{kind} column index {index} out of range (table has {count} columns)")]
    ColumnIndex {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EtfGeoError> for std::process::ExitCode {
    fn from(err: &EtfGeoError) -> Self {
        let code: u8 = match err {
            EtfGeoError::Io(_) | EtfGeoError::Report { .. } => 1,
            EtfGeoError::ConfigParse { .. }
            | EtfGeoError::ConfigMissing { .. }
            | EtfGeoError::ConfigInvalid { .. } => 2,
            EtfGeoError::Load { .. } | EtfGeoError::ParseExhausted { .. } => 3,
            EtfGeoError::ColumnNotFound { .. } | EtfGeoError::ColumnIndex { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_not_found_lists_columns() {
        let err = EtfGeoError::ColumnNotFound {
            kind: "weight",
            columns: vec!["Ticker".into(), "Name".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("weight"));
        assert!(msg.contains("Ticker, Name"));
    }

    #[test]
    fn column_index_message() {
        let err = EtfGeoError::ColumnIndex {
            kind: "location",
            index: 9,
            count: 4,
        };
        assert_eq!(
            err.to_string(),
            "location column index 9 out of range (table has 4 columns)"
        );
    }
}
