use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use graph_analytics::data::loader;
use graph_analytics::{
    paired_correlation, AnalyticsConfig, AnalyticsResult, Calculation, CorrelationStrength,
    GraphCalculator, IntegrationMethod, SampleSeries, SeriesStats,
};

#[derive(Parser)]
#[command(name = "graph-analytics")]
#[command(about = "Statistics, area under the curve and correlation for one data column")]
#[command(version)]
struct Cli {
    /// CSV or Excel file holding the samples
    file: PathBuf,

    /// Column with the y-values, by header name or 0-based index (default: last column)
    #[arg(short, long)]
    column: Option<String>,

    /// Column with explicit x-values (numbers or dates) for the correlation
    #[arg(long)]
    x_column: Option<String>,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Distance between consecutive samples on the x-axis
    #[arg(short, long)]
    scale: Option<f64>,

    /// Integration method: left, right, trapezoidal or simpson
    #[arg(short, long)]
    integration: Option<IntegrationMethod>,

    /// Treat absent samples as zero instead of interpolating them
    #[arg(long)]
    no_interpolate: bool,

    /// Statistic for the reference line: sum, average, median, mode, min, max, std-dev
    #[arg(long)]
    reference: Option<Calculation>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to this file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

/// A single report entry: the value, or why it could not be computed.
#[derive(Serialize)]
#[serde(untagged)]
enum Outcome<T> {
    Value(T),
    Failed { error: String },
}

impl<T> From<AnalyticsResult<T>> for Outcome<T> {
    fn from(result: AnalyticsResult<T>) -> Self {
        match result {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Failed { error: e.to_string() },
        }
    }
}

impl<T: std::fmt::Display> Outcome<T> {
    fn describe(&self) -> String {
        match self {
            Outcome::Value(v) => v.to_string(),
            Outcome::Failed { error } => format!("n/a ({error})"),
        }
    }
}

#[derive(Serialize)]
struct Report {
    column: String,
    config: AnalyticsConfig,
    summary: Outcome<SeriesStats>,
    reference_line: Outcome<f64>,
    area: Outcome<f64>,
    correlation: Outcome<f64>,
    strength: Outcome<CorrelationStrength>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(scale) = cli.scale {
        config.x_axis_scale = scale;
    }
    if let Some(method) = cli.integration {
        config.integration = method;
    }
    if cli.no_interpolate {
        config.interpolate_absent = false;
    }
    if let Some(reference) = cli.reference {
        config.reference_line = reference;
    }
    config.validate()?;

    if let Some(path) = &cli.save_config {
        config.save(path)?;
    }

    let data = loader::load_file(&cli.file)?;
    let y_idx = match &cli.column {
        Some(selector) => data.column_index(selector)?,
        None => data.columns.len().saturating_sub(1),
    };
    let column = data.columns[y_idx].clone();
    let series = loader::column_to_series(&data.column_data[y_idx]);

    let x_series = match &cli.x_column {
        Some(selector) => Some(
            loader::column_to_x_values(data.column(selector)?)
                .ok_or_else(|| format!("x column {selector:?} holds neither numbers nor dates"))?,
        ),
        None => None,
    };

    let calc = GraphCalculator::new(config);
    let report = build_report(&calc, column, &series, x_series.as_ref());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn build_report(
    calc: &GraphCalculator,
    column: String,
    series: &SampleSeries,
    x_series: Option<&SampleSeries>,
) -> Report {
    let correlation = match x_series {
        Some(x) => paired_correlation(x, series, calc.config().correlation),
        None => calc.correlation(series),
    };
    let strength = correlation.clone().map(CorrelationStrength::from_coefficient);

    Report {
        column,
        config: calc.config().clone(),
        summary: calc.summary(series).into(),
        reference_line: calc.reference_line_value(series).into(),
        area: calc.area(series).into(),
        correlation: correlation.into(),
        strength: strength.into(),
    }
}

fn print_report(report: &Report) {
    match &report.summary {
        Outcome::Value(stats) => print!("{}", stats.report(&report.column)),
        Outcome::Failed { error } => println!("{}:\n  n/a ({error})", report.column),
    }
    println!(
        "  Reference line ({}): {}",
        report.config.reference_line,
        report.reference_line.describe()
    );
    println!(
        "  Area ({}, scale {}): {}",
        report.config.integration,
        report.config.x_axis_scale,
        report.area.describe()
    );
    println!(
        "  Correlation ({}): {}",
        report.config.correlation.label(),
        report.correlation.describe()
    );
    println!("  Strength: {}", report.strength.describe());
}
