//! Report output port trait.

use crate::domain::allocation::Allocation;
use crate::domain::error::EtfGeoError;
use crate::domain::stats::SummaryStats;
use std::path::Path;

/// Port for writing allocation results to a file.
pub trait ReportPort {
    fn write(
        &self,
        allocation: &Allocation,
        stats: &SummaryStats,
        output_path: &Path,
    ) -> Result<(), EtfGeoError>;
}
