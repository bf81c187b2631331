//! Arlington CLI binary.
//!
//! Command-line interface for the Arlington event-study pipeline.

mod pipeline;

use arlington_data::schema::SchemaMapping;
use arlington_output::{ExportFormat, Exporter};
use arlington_stats::{FactorTable, fit_categorical, fit_factor_model, one_sample_ttest};
use clap::{Args, Parser, Subcommand};
use pipeline::{
    aar_rows, build_summary, load_config, load_inputs, load_schema, result_rows, run_study,
    window_cars, window_names,
};
use serde_json::json;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "arlington")]
#[command(about = "Arlington: event-study analysis of disclosed official trades", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input tables and configuration shared by every subcommand.
#[derive(Args)]
struct InputArgs {
    /// Disclosed-events CSV
    #[arg(long)]
    events: PathBuf,

    /// Per-entity daily-returns CSV
    #[arg(long)]
    returns: PathBuf,

    /// Market daily-returns CSV
    #[arg(long)]
    market: PathBuf,

    /// JSON schema-mapping file (defaults to the built-in aliases)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// JSON study-configuration file (defaults: 250-day window, CAR5/10/120)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full event study and export the per-event result table
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Output path for the result table
        #[arg(long, default_value = "results.csv")]
        out: PathBuf,

        /// Output format (csv, json, pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Also write a Markdown summary to this path
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Export the cross-event AAR/CAAR series
    Aar {
        #[command(flatten)]
        input: InputArgs,

        /// Output path for the AAR/CAAR series
        #[arg(long, default_value = "aar.csv")]
        out: PathBuf,

        /// Output format (csv, json, pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Explanatory regressions of window CARs on factors and categories
    Regress {
        #[command(flatten)]
        input: InputArgs,

        /// Factor table CSV (entity, date, one column per factor)
        #[arg(long)]
        factors: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Significance tests of mean CAR against zero, per window
    Test {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { input, out, format, summary } => run_full_study(&input, &out, &format, summary.as_deref()),
        Commands::Aar { input, out, format } => run_aar(&input, &out, &format),
        Commands::Regress { input, factors, format } => {
            run_regressions(&input, factors.as_deref(), &format)
        }
        Commands::Test { input, format } => run_significance(&input, &format),
    }
}

/// Shared load-and-run phase. The schema mapping is returned for
/// subcommands that load further tables (factor CSVs).
fn complete_study(
    input: &InputArgs,
) -> Result<(pipeline::CompletedStudy, SchemaMapping), Box<dyn std::error::Error>> {
    let mapping = load_schema(input.schema.as_deref())?;
    let config = load_config(input.config.as_deref())?;
    let (store, events) = load_inputs(&input.events, &input.returns, &input.market, &mapping)?;
    Ok((run_study(&store, &events, config)?, mapping))
}

fn run_full_study(
    input: &InputArgs,
    out: &std::path::Path,
    format: &str,
    summary_path: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (completed, _) = complete_study(input)?;

    let export_format = parse_export_format(format)?;
    let exporter = Exporter::new(export_format);
    let rows = result_rows(&completed.outcome);
    exporter.export_results(&rows, &window_names(&completed.config), out)?;
    println!("Wrote {} result rows to {}", rows.len(), out.display());

    let summary = build_summary(&completed);
    println!("{summary}");

    if let Some(path) = summary_path {
        std::fs::write(path, summary.to_markdown())?;
        println!("Wrote summary to {}", path.display());
    }

    Ok(())
}

fn run_aar(
    input: &InputArgs,
    out: &std::path::Path,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (completed, _) = complete_study(input)?;

    let rows = aar_rows(&completed);
    if rows.is_empty() {
        eprintln!("Warning: no abnormal returns to aggregate; nothing written");
        return Ok(());
    }

    let export_format = parse_export_format(format)?;
    Exporter::new(export_format).export_aar(&rows, out)?;
    println!("Wrote {} AAR/CAAR offsets to {}", rows.len(), out.display());

    Ok(())
}

fn run_regressions(
    input: &InputArgs,
    factors_path: Option<&std::path::Path>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (completed, mapping) = complete_study(input)?;

    let factor_table = match factors_path {
        Some(path) => {
            let records = arlington_data::loader::load_factor_table(path, &mapping)?;
            let mut table = FactorTable::new(records.names);
            for row in records.rows {
                table.insert(&row.entity, row.date, row.values)?;
            }
            Some(table)
        }
        None => None,
    };

    let keys: Vec<(String, chrono::NaiveDate)> = completed
        .outcome
        .results
        .iter()
        .map(|r| (r.entity.clone(), r.date))
        .collect();

    let mut reports = Vec::new();
    for name in window_names(&completed.config) {
        let cars: Vec<Option<f64>> = completed
            .outcome
            .results
            .iter()
            .map(|r| r.car(&name))
            .collect();

        let factor_report = match &factor_table {
            Some(table) => match fit_factor_model(
                &name,
                &keys,
                &cars,
                table,
                completed.config.risk_free_daily,
            ) {
                Ok(fit) => Some(fit),
                Err(error) if error.is_recoverable() => {
                    eprintln!("Warning: skipping factor regression for {name}: {error}");
                    None
                }
                Err(error) => return Err(error.into()),
            },
            None => None,
        };

        let mut categorical_reports = Vec::new();
        for attribute in ["sector", "party"] {
            let labels: Vec<Option<String>> = completed
                .outcome
                .results
                .iter()
                .map(|r| match attribute {
                    "sector" => r.sector.clone(),
                    _ => r.party.clone(),
                })
                .collect();

            match fit_categorical(attribute, &name, &cars, &labels) {
                Ok(fit) => categorical_reports.push(fit),
                Err(error) if error.is_recoverable() => {
                    eprintln!("Warning: skipping {attribute} regression for {name}: {error}");
                }
                Err(error) => return Err(error.into()),
            }
        }

        reports.push((name, factor_report, categorical_reports));
    }

    if format == "json" {
        let value = json!(
            reports
                .iter()
                .map(|(window, factor, categorical)| {
                    json!({
                        "window": window,
                        "factor_model": factor.as_ref().map(|f| json!({
                            "intercept": f.intercept,
                            "loadings": f.loadings.iter().map(|(n, c)| json!({"factor": n, "loading": c})).collect::<Vec<_>>(),
                            "r_squared": f.r_squared,
                            "f_statistic": f.f_statistic,
                            "f_p_value": f.f_p_value,
                            "n": f.n_observations,
                        })),
                        "categorical": categorical.iter().map(|c| json!({
                            "attribute": c.attribute,
                            "reference": c.reference,
                            "r_squared": c.r_squared,
                            "n": c.n_observations,
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect::<Vec<_>>()
        );
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (window, factor, categorical) in &reports {
        println!("{window}:");
        if let Some(f) = factor {
            println!(
                "  factor model: R²={:.4} F={} p={} n={}",
                f.r_squared,
                f.f_statistic.map_or("n/a".to_string(), |v| format!("{v:.3}")),
                f.f_p_value.map_or("n/a".to_string(), |v| format!("{v:.4}")),
                f.n_observations,
            );
            println!("    intercept: {:+.6}", f.intercept);
            for (factor_name, loading) in &f.loadings {
                println!("    {factor_name}: {loading:+.6}");
            }
        }
        for c in categorical {
            println!(
                "  {} membership: R²={:.4} (reference: {}, n={})",
                c.attribute, c.r_squared, c.reference, c.n_observations,
            );
            for effect in &c.effects {
                println!(
                    "    {} vs {}: {:+.6} (n={})",
                    effect.label, c.reference, effect.coefficient, effect.n_rows,
                );
            }
        }
    }

    Ok(())
}

fn run_significance(input: &InputArgs, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (completed, _) = complete_study(input)?;

    let mut results = Vec::new();
    for name in window_names(&completed.config) {
        let cars = window_cars(&completed.outcome, &name);
        match one_sample_ttest(&cars) {
            Ok(test) => results.push((name, test)),
            Err(error) if error.is_recoverable() => {
                eprintln!("Warning: skipping significance test for {name}: {error}");
            }
            Err(error) => return Err(error.into()),
        }
    }

    if format == "json" {
        let value = json!(
            results
                .iter()
                .map(|(window, t)| json!({
                    "window": window,
                    "n": t.n,
                    "mean": t.mean,
                    "t_statistic": t.t_statistic,
                    "p_value": t.p_value,
                    "significant": t.is_significant(completed.config.significance_level),
                }))
                .collect::<Vec<_>>()
        );
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (window, test) in &results {
        println!(
            "{window}: n={} mean={:+.6} t={:+.3} p={:.4}{}",
            test.n,
            test.mean,
            test.t_statistic,
            test.p_value,
            if test.is_significant(completed.config.significance_level) { " *" } else { "" },
        );
    }

    Ok(())
}

fn parse_export_format(name: &str) -> Result<ExportFormat, Box<dyn std::error::Error>> {
    ExportFormat::parse(name)
        .ok_or_else(|| format!("unknown output format '{name}' (csv, json, pretty-json)").into())
}
