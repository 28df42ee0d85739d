//! CSV export adapter for country allocations.

use crate::domain::allocation::Allocation;
use crate::domain::error::EtfGeoError;
use crate::domain::stats::SummaryStats;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvExportAdapter;

impl CsvExportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvExportAdapter {
    fn write(
        &self,
        allocation: &Allocation,
        _stats: &SummaryStats,
        output_path: &Path,
    ) -> Result<(), EtfGeoError> {
        let mut writer = csv::Writer::from_path(output_path).map_err(|e| EtfGeoError::Report {
            reason: format!("cannot write {}: {}", output_path.display(), e),
        })?;

        writer
            .write_record(["Country", "Total_Weight", "Percentage"])
            .map_err(|e| EtfGeoError::Report {
                reason: e.to_string(),
            })?;

        // Entries are already sorted by descending weight.
        for entry in &allocation.entries {
            writer
                .write_record([
                    entry.country.as_str(),
                    &format!("{:.4}", entry.total_weight),
                    &format!("{:.2}", entry.percentage),
                ])
                .map_err(|e| EtfGeoError::Report {
                    reason: e.to_string(),
                })?;
        }

        writer.flush().map_err(EtfGeoError::Io)?;
        Ok(())
    }
}
