//! Typst report generation.
//!
//! Reads a Typst template (the built-in default or a custom file via
//! `template_path`), resolves all `{{PLACEHOLDER}}` markers by calling
//! helpers from `charts` and `tables`, and writes the final `.typ` file.

pub mod charts;
pub mod default_template;
pub mod tables;

use crate::domain::allocation::Allocation;
use crate::domain::error::EtfGeoError;
use crate::domain::stats::SummaryStats;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

/// Countries below this share of the portfolio fold into the pie chart's
/// "Other" slice.
pub const DEFAULT_OTHER_THRESHOLD_PCT: f64 = 2.0;

/// How many countries the ranking bar chart shows.
const RANKING_TOP_N: usize = 10;

/// Context for resolving template placeholders.
pub struct ReportContext<'a> {
    pub allocation: &'a Allocation,
    pub stats: &'a SummaryStats,
    pub source_file: &'a str,
    pub generated_at: &'a str,
    pub other_threshold_pct: f64,
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let mut output = template.to_string();

    output = output.replace("{{SOURCE_FILE}}", ctx.source_file);
    output = output.replace("{{GENERATED_AT}}", ctx.generated_at);

    let stats_table = tables::render_summary_stats(ctx.stats);
    output = output.replace("{{SUMMARY_STATS}}", &stats_table);

    let allocation_table = tables::render_allocation_table(ctx.allocation);
    output = output.replace("{{ALLOCATION_TABLE}}", &allocation_table);

    let pie = charts::pie_chart_svg(&ctx.allocation.entries, ctx.other_threshold_pct);
    output = output.replace("{{PIE_CHART}}", &embed_svg(&pie));

    let ranking = charts::ranking_chart_svg(&ctx.allocation.entries, RANKING_TOP_N);
    output = output.replace("{{RANKING_CHART}}", &embed_svg(&ranking));

    let histogram = charts::histogram_svg(&ctx.allocation.entries);
    output = output.replace("{{HISTOGRAM}}", &embed_svg(&histogram));

    let box_plot = charts::box_plot_svg(&ctx.allocation.entries);
    output = output.replace("{{BOX_PLOT}}", &embed_svg(&box_plot));

    output
}

/// Wrap an SVG string in Typst `image.decode`, escaping for the string
/// literal. An empty chart becomes a placeholder note.
fn embed_svg(svg: &str) -> String {
    if svg.is_empty() {
        return "_No chart data._".to_string();
    }
    format!(
        "#image.decode(\n\"{}\",\n  width: 100%,\n)",
        svg.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// Writes the resolved report to a `.typ` file.
pub struct TypstReportAdapter {
    source_file: String,
    template_path: Option<PathBuf>,
    other_threshold_pct: f64,
}

impl TypstReportAdapter {
    pub fn new(
        source_file: impl Into<String>,
        template_path: Option<PathBuf>,
        other_threshold_pct: f64,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            template_path,
            other_threshold_pct,
        }
    }

    fn load_template(&self) -> Result<String, EtfGeoError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(|e| EtfGeoError::Report {
                reason: format!("cannot read template {}: {}", path.display(), e),
            }),
            None => Ok(default_template::template().to_string()),
        }
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(
        &self,
        allocation: &Allocation,
        stats: &SummaryStats,
        output_path: &Path,
    ) -> Result<(), EtfGeoError> {
        let template = self.load_template()?;
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let ctx = ReportContext {
            allocation,
            stats,
            source_file: &self.source_file,
            generated_at: &generated_at,
            other_threshold_pct: self.other_threshold_pct,
        };
        let markup = resolve(&template, &ctx);
        fs::write(output_path, markup).map_err(|e| EtfGeoError::Report {
            reason: format!("cannot write {}: {}", output_path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::aggregate;
    use crate::domain::holdings::CleanHolding;
    use tempfile::TempDir;

    fn holding(country: &str, weight: f64) -> CleanHolding {
        CleanHolding {
            country: country.to_string(),
            weight,
        }
    }

    fn sample_allocation() -> Allocation {
        aggregate(&[
            holding("United States", 60.0),
            holding("Japan", 25.0),
            holding("Germany", 15.0),
        ])
    }

    #[test]
    fn resolve_default_template_no_placeholders_remain() {
        let allocation = sample_allocation();
        let stats = SummaryStats::compute(&allocation, 3);
        let ctx = ReportContext {
            allocation: &allocation,
            stats: &stats,
            source_file: "holdings.csv",
            generated_at: "2024-07-01 12:00:00",
            other_threshold_pct: DEFAULT_OTHER_THRESHOLD_PCT,
        };

        let output = resolve(default_template::template(), &ctx);
        assert!(
            !output.contains("{{"),
            "unresolved placeholder in output: {output}"
        );
    }

    #[test]
    fn resolve_produces_valid_typst() {
        let allocation = sample_allocation();
        let stats = SummaryStats::compute(&allocation, 3);
        let ctx = ReportContext {
            allocation: &allocation,
            stats: &stats,
            source_file: "holdings.csv",
            generated_at: "2024-07-01 12:00:00",
            other_threshold_pct: DEFAULT_OTHER_THRESHOLD_PCT,
        };

        let output = resolve(default_template::template(), &ctx);
        assert!(output.contains("#set page("));
        assert!(output.contains("= Geographic Allocation Report"));
        assert!(output.contains("#table("));
        assert!(output.contains("#image.decode("));
        assert!(output.contains("United States"));
        assert!(output.contains("holdings.csv"));
    }

    #[test]
    fn resolve_empty_allocation_uses_placeholders() {
        let allocation = Allocation {
            entries: Vec::new(),
            total_weight: 0.0,
        };
        let stats = SummaryStats::compute(&allocation, 0);
        let ctx = ReportContext {
            allocation: &allocation,
            stats: &stats,
            source_file: "empty.csv",
            generated_at: "2024-07-01 12:00:00",
            other_threshold_pct: DEFAULT_OTHER_THRESHOLD_PCT,
        };

        let output = resolve(default_template::template(), &ctx);
        assert!(output.contains("_No allocation data._"));
        assert!(output.contains("_No chart data._"));
        assert!(!output.contains("{{"));
    }

    #[test]
    fn resolve_custom_template() {
        let allocation = sample_allocation();
        let stats = SummaryStats::compute(&allocation, 3);
        let ctx = ReportContext {
            allocation: &allocation,
            stats: &stats,
            source_file: "holdings.csv",
            generated_at: "2024-07-01 12:00:00",
            other_threshold_pct: DEFAULT_OTHER_THRESHOLD_PCT,
        };

        let custom = "= My Report\n{{ALLOCATION_TABLE}}\n{{PIE_CHART}}";
        let output = resolve(custom, &ctx);
        assert!(output.contains("= My Report"));
        assert!(output.contains("#table("));
        assert!(!output.contains("{{"));
    }

    #[test]
    fn adapter_writes_typ_file() {
        let allocation = sample_allocation();
        let stats = SummaryStats::compute(&allocation, 3);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.typ");

        TypstReportAdapter::new("holdings.csv", None, DEFAULT_OTHER_THRESHOLD_PCT)
            .write(&allocation, &stats, &path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("= Geographic Allocation Report"));
        assert!(!content.contains("{{"));
    }

    #[test]
    fn adapter_uses_custom_template_file() {
        let allocation = sample_allocation();
        let stats = SummaryStats::compute(&allocation, 3);
        let dir = TempDir::new().unwrap();
        let template_path = dir.path().join("custom.typ");
        fs::write(&template_path, "= Custom\n{{SUMMARY_STATS}}\n").unwrap();
        let out_path = dir.path().join("report.typ");

        TypstReportAdapter::new(
            "holdings.csv",
            Some(template_path),
            DEFAULT_OTHER_THRESHOLD_PCT,
        )
        .write(&allocation, &stats, &out_path)
        .unwrap();

        let content = fs::read_to_string(&out_path).unwrap();
        assert!(content.contains("= Custom"));
        assert!(content.contains("#table("));
    }

    #[test]
    fn adapter_missing_template_is_report_error() {
        let allocation = sample_allocation();
        let stats = SummaryStats::compute(&allocation, 3);
        let dir = TempDir::new().unwrap();

        let err = TypstReportAdapter::new(
            "holdings.csv",
            Some(PathBuf::from("/nonexistent/template.typ")),
            DEFAULT_OTHER_THRESHOLD_PCT,
        )
        .write(&allocation, &stats, &dir.path().join("report.typ"))
        .unwrap_err();
        assert!(matches!(err, EtfGeoError::Report { .. }));
    }
}
