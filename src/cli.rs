//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_export::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::{TypstReportAdapter, DEFAULT_OTHER_THRESHOLD_PCT};
use crate::domain::allocation::{aggregate, Allocation};
use crate::domain::cleaning::{clean_holdings, CleaningResult};
use crate::domain::columns::{detect_columns, ColumnSelection};
use crate::domain::error::EtfGeoError;
use crate::domain::stats::SummaryStats;
use crate::ports::config_port::ConfigPort;
use crate::ports::holdings_port::{HoldingsPort, LoadOutcome};
use crate::ports::report_port::ReportPort;

/// Raw lines shown when every parse strategy fails.
const FAILURE_PREVIEW_LINES: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "etfgeo", about = "ETF holdings geographic allocation analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a holdings export and write allocation outputs
    Analyze {
        /// Holdings CSV file (overrides [input] path)
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Allocation CSV output path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Typst report output path
        #[arg(short, long)]
        report: Option<PathBuf>,
        /// 0-based weight column override
        #[arg(long)]
        weight_index: Option<usize>,
        /// 0-based location column override
        #[arg(long)]
        location_index: Option<usize>,
        /// Preamble lines to skip before parsing
        #[arg(long)]
        skip_lines: Option<usize>,
        /// Custom Typst template file
        #[arg(long)]
        template: Option<PathBuf>,
        /// Fold countries below this percentage into "Other" in the pie chart
        #[arg(long)]
        other_threshold: Option<f64>,
    },
    /// Show how a holdings file parses without running the analysis
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, default_value_t = 0)]
        skip_lines: usize,
    },
    /// List a file's columns with indexes and the detection result
    Columns {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, default_value_t = 0)]
        skip_lines: usize,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            input,
            config,
            output,
            report,
            weight_index,
            location_index,
            skip_lines,
            template,
            other_threshold,
        } => run_analyze(AnalyzeFlags {
            input,
            config,
            output,
            report,
            weight_index,
            location_index,
            skip_lines,
            template,
            other_threshold,
        }),
        Command::Inspect { input, skip_lines } => run_inspect(&input, skip_lines),
        Command::Columns { input, skip_lines } => run_columns(&input, skip_lines),
    }
}

/// Command-line flags for `analyze`, before merging with the config file.
#[derive(Debug, Default)]
pub struct AnalyzeFlags {
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub weight_index: Option<usize>,
    pub location_index: Option<usize>,
    pub skip_lines: Option<usize>,
    pub template: Option<PathBuf>,
    pub other_threshold: Option<f64>,
}

/// Fully resolved analysis settings. Flags win over config keys; config keys
/// win over defaults.
#[derive(Debug, PartialEq)]
pub struct AnalyzeSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: PathBuf,
    pub weight_index: Option<usize>,
    pub location_index: Option<usize>,
    pub skip_lines: usize,
    pub template: Option<PathBuf>,
    pub other_threshold_pct: f64,
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = EtfGeoError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Read an optional non-negative index key, distinguishing "absent" from
/// "present but invalid".
fn config_index(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<usize>, EtfGeoError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| EtfGeoError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected a non-negative integer, got {raw:?}"),
            }),
    }
}

/// Merge flags with an optional config file into final settings.
pub fn build_analyze_settings(
    flags: &AnalyzeFlags,
    config: Option<&dyn ConfigPort>,
) -> Result<AnalyzeSettings, EtfGeoError> {
    let input = match &flags.input {
        Some(path) => path.clone(),
        None => config
            .and_then(|c| c.get_string("input", "path"))
            .map(PathBuf::from)
            .ok_or_else(|| EtfGeoError::ConfigMissing {
                section: "input".to_string(),
                key: "path".to_string(),
            })?,
    };

    let skip_lines = match flags.skip_lines {
        Some(n) => n,
        None => match config {
            Some(c) => {
                let raw = c.get_int("input", "skip_lines", 0);
                usize::try_from(raw).map_err(|_| EtfGeoError::ConfigInvalid {
                    section: "input".to_string(),
                    key: "skip_lines".to_string(),
                    reason: format!("expected a non-negative integer, got {raw}"),
                })?
            }
            None => 0,
        },
    };

    let weight_index = match flags.weight_index {
        Some(idx) => Some(idx),
        None => match config {
            Some(c) => config_index(c, "columns", "weight_index")?,
            None => None,
        },
    };
    let location_index = match flags.location_index {
        Some(idx) => Some(idx),
        None => match config {
            Some(c) => config_index(c, "columns", "location_index")?,
            None => None,
        },
    };

    let output = flags
        .output
        .clone()
        .or_else(|| {
            config
                .and_then(|c| c.get_string("output", "csv_path"))
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("country_allocation.csv"));

    let report = flags
        .report
        .clone()
        .or_else(|| {
            config
                .and_then(|c| c.get_string("report", "typst_path"))
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("country_allocation.typ"));

    let template = flags.template.clone().or_else(|| {
        config
            .and_then(|c| c.get_string("report", "template_path"))
            .map(PathBuf::from)
    });

    let other_threshold_pct = flags.other_threshold.unwrap_or_else(|| {
        config
            .map(|c| {
                c.get_double(
                    "report",
                    "other_threshold_pct",
                    DEFAULT_OTHER_THRESHOLD_PCT,
                )
            })
            .unwrap_or(DEFAULT_OTHER_THRESHOLD_PCT)
    });
    if !other_threshold_pct.is_finite() || other_threshold_pct < 0.0 {
        return Err(EtfGeoError::ConfigInvalid {
            section: "report".to_string(),
            key: "other_threshold_pct".to_string(),
            reason: format!("expected a non-negative number, got {other_threshold_pct}"),
        });
    }

    Ok(AnalyzeSettings {
        input,
        output,
        report,
        weight_index,
        location_index,
        skip_lines,
        template,
        other_threshold_pct,
    })
}

fn run_analyze(flags: AnalyzeFlags) -> ExitCode {
    // Stage 1: config and settings
    let adapter = match &flags.config {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => Some(a),
                Err(code) => return code,
            }
        }
        None => None,
    };
    let settings = match build_analyze_settings(&flags, adapter.as_ref().map(|a| a as &dyn ConfigPort)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: load the holdings table
    eprintln!("Loading holdings from {}", settings.input.display());
    let loader = CsvAdapter::with_skip_lines(settings.skip_lines);
    let outcome = match loader.load_holdings(&settings.input) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            if matches!(e, EtfGeoError::ParseExhausted { .. }) {
                print_raw_preview(&settings.input);
            }
            return (&e).into();
        }
    };
    eprintln!(
        "Parsed via {}: {} columns, {} rows",
        outcome.strategy,
        outcome.table.column_count(),
        outcome.table.row_count()
    );

    // Stage 3: column identification
    let selection = match detect_columns(
        &outcome.table.columns,
        settings.weight_index,
        settings.location_index,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Using weight column {:?} ({}), location column {:?} ({})",
        outcome.table.columns[selection.weight],
        selection.weight,
        outcome.table.columns[selection.location],
        selection.location
    );

    // Stage 4: clean and aggregate
    let cleaning = clean_holdings(&outcome.table, &selection);
    if cleaning.dropped_total() > 0 {
        eprintln!(
            "Dropped {} rows ({} missing fields, {} unparseable weights)",
            cleaning.dropped_total(),
            cleaning.dropped_missing,
            cleaning.dropped_unparseable
        );
    }
    let allocation = aggregate(&cleaning.holdings);
    let stats = SummaryStats::compute(&allocation, cleaning.holdings.len());

    // Stage 5: console summary
    print_allocation(&allocation, &stats);

    // Stage 6: file outputs
    if let Err(e) = CsvExportAdapter::new().write(&allocation, &stats, &settings.output) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Wrote allocation CSV to {}", settings.output.display());

    let reporter = TypstReportAdapter::new(
        settings.input.display().to_string(),
        settings.template.clone(),
        settings.other_threshold_pct,
    );
    if let Err(e) = reporter.write(&allocation, &stats, &settings.report) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Wrote Typst report to {}", settings.report.display());

    ExitCode::SUCCESS
}

fn run_inspect(input: &Path, skip_lines: usize) -> ExitCode {
    let loader = CsvAdapter::with_skip_lines(skip_lines);
    let LoadOutcome { table, strategy } = match loader.load_holdings(input) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            if matches!(e, EtfGeoError::ParseExhausted { .. }) {
                print_raw_preview(input);
            }
            return (&e).into();
        }
    };

    println!("File:     {}", input.display());
    println!("Strategy: {strategy}");
    println!("Columns:  {}", table.column_count());
    println!("Rows:     {}", table.row_count());
    println!();
    println!("Header: {}", table.columns.join(" | "));
    for row in table.preview(FAILURE_PREVIEW_LINES) {
        println!("        {}", row.join(" | "));
    }

    ExitCode::SUCCESS
}

fn run_columns(input: &Path, skip_lines: usize) -> ExitCode {
    let loader = CsvAdapter::with_skip_lines(skip_lines);
    let outcome = match loader.load_holdings(input) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("Columns in {}:", input.display());
    for (i, name) in outcome.table.columns.iter().enumerate() {
        println!("  {i:>3}  {name}");
    }
    println!();

    match detect_columns(&outcome.table.columns, None, None) {
        Ok(ColumnSelection { weight, location }) => {
            println!(
                "Detected: weight = {} ({}), location = {} ({})",
                weight, outcome.table.columns[weight], location, outcome.table.columns[location]
            );
        }
        Err(e) => {
            println!("Detection failed: {e}");
            println!("Pass --weight-index / --location-index to analyze explicitly.");
        }
    }

    ExitCode::SUCCESS
}

fn print_raw_preview(input: &Path) {
    if let Ok(lines) = CsvAdapter::raw_preview(input, FAILURE_PREVIEW_LINES) {
        eprintln!("First {} raw lines:", lines.len());
        for line in lines {
            eprintln!("  {line}");
        }
    }
}

fn print_allocation(allocation: &Allocation, stats: &SummaryStats) {
    println!();
    println!("=== Geographic Allocation ===");
    if allocation.is_empty() {
        println!("No valid holdings found.");
        return;
    }

    println!("{:<4} {:<25} {:>12} {:>10}", "#", "Country", "Weight", "Pct");
    for (i, entry) in allocation.entries.iter().enumerate() {
        println!(
            "{:<4} {:<25} {:>12.4} {:>9.2}%",
            i + 1,
            entry.country,
            entry.total_weight,
            entry.percentage
        );
    }
    let pct_sum: f64 = allocation.entries.iter().map(|e| e.percentage).sum();
    println!(
        "{:<4} {:<25} {:>12.4} {:>9.2}%",
        "", "TOTAL", allocation.total_weight, pct_sum
    );

    println!();
    println!("=== Top 5 ===");
    for (i, entry) in allocation.entries.iter().take(5).enumerate() {
        println!("{}. {} ({:.2}%)", i + 1, entry.country, entry.percentage);
    }

    println!();
    println!("=== Summary ===");
    println!("Holdings:             {}", stats.holdings_count);
    println!("Countries:            {}", stats.country_count);
    println!("Top 3 concentration:  {:.2}%", stats.top3_concentration);
    println!("Top 5 concentration:  {:.2}%", stats.top5_concentration);
    println!("Top 10 concentration: {:.2}%", stats.top10_concentration);
    println!("Mean allocation:      {:.2}%", stats.mean_pct);
    println!("Median allocation:    {:.2}%", stats.median_pct);
    println!("Std deviation:        {:.2}%", stats.stddev_pct);
    println!(
        "Largest / smallest:   {:.2}% / {:.2}%",
        stats.max_pct, stats.min_pct
    );
}

// Exposed so integration tests can drive the pipeline without spawning a
// process.
pub fn analyze_table(
    outcome: &LoadOutcome,
    weight_override: Option<usize>,
    location_override: Option<usize>,
) -> Result<(CleaningResult, Allocation, SummaryStats), EtfGeoError> {
    let selection = detect_columns(&outcome.table.columns, weight_override, location_override)?;
    let cleaning = clean_holdings(&outcome.table, &selection);
    let allocation = aggregate(&cleaning.holdings);
    let stats = SummaryStats::compute(&allocation, cleaning.holdings.len());
    Ok((cleaning, allocation, stats))
}
