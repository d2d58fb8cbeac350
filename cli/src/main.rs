//! Samyama Filter CLI: evaluate, apply and render filter expressions
//!
//! Expressions are given as JSON build plans; rows as JSON objects mapping
//! variable names to serialized terms (or `null` for unbound).

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use samyama_filter::{EvaluatorConfig, ExpressionPlan, FilterEvaluator, NamespaceManager, SolutionRow};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "samyama-filter", version, about = "SPARQL filter expression evaluator")]
struct Cli {
    /// Evaluator configuration (YAML)
    #[arg(long, global = true, env = "SAMYAMA_FILTER_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against each row
    Eval {
        /// Expression plan (JSON file, `-` for stdin)
        plan: PathBuf,

        /// Rows (JSON array file); a single empty row when omitted
        #[arg(long)]
        rows: Option<PathBuf>,
    },
    /// Keep the rows for which an expression is true
    Filter {
        /// Expression plan (JSON file, `-` for stdin)
        plan: PathBuf,

        /// Rows (JSON array file)
        #[arg(long)]
        rows: PathBuf,

        /// Evaluate large batches on the rayon pool
        #[arg(long)]
        parallel: bool,
    },
    /// Print the canonical text of an expression
    Render {
        /// Expression plan (JSON file, `-` for stdin)
        plan: PathBuf,

        /// Extra namespace as `prefix=iri`, tried after the configured ones
        #[arg(long = "prefix")]
        prefixes: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Eval { plan, rows } => run_eval(&config, plan, rows.as_deref(), &cli.format),
        Commands::Filter {
            plan,
            rows,
            parallel,
        } => run_filter(&config, plan, rows, *parallel, &cli.format),
        Commands::Render { plan, prefixes } => run_render(&config, plan, prefixes),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const UNBOUND: &str = "UNBOUND";

fn load_config(path: Option<&Path>) -> CliResult<EvaluatorConfig> {
    match path {
        Some(path) => Ok(EvaluatorConfig::from_yaml_file(path)?),
        None => Ok(EvaluatorConfig::default()),
    }
}

fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e).into())
}

fn load_filter(config: &EvaluatorConfig, plan: &Path) -> CliResult<FilterEvaluator> {
    let plan = ExpressionPlan::from_json(&read_input(plan)?)?;
    let expression = plan.build()?;
    info!("Loaded filter {}", expression);
    Ok(FilterEvaluator::from_config(expression, config))
}

fn run_eval(config: &EvaluatorConfig, plan: &Path, rows: Option<&Path>, format: &OutputFormat) -> CliResult<()> {
    let filter = load_filter(config, plan)?;
    let rows: Vec<SolutionRow> = match rows {
        Some(path) => serde_json::from_str(&read_input(path)?)?,
        None => vec![SolutionRow::new()],
    };

    let values: Vec<Option<String>> = rows
        .iter()
        .map(|row| filter.evaluate(row).map(|term| term.to_string()))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Csv => {
            println!("row,value");
            for (i, value) in values.iter().enumerate() {
                println!("{},{}", i, format_csv_value(Some(value.as_deref().unwrap_or(UNBOUND))));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["row", "value"]);
            for (i, value) in values.iter().enumerate() {
                table.add_row(vec![i.to_string(), value.clone().unwrap_or_else(|| UNBOUND.to_string())]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_filter(
    config: &EvaluatorConfig,
    plan: &Path,
    rows: &Path,
    parallel: bool,
    format: &OutputFormat,
) -> CliResult<()> {
    let filter = load_filter(config, plan)?;
    let rows: Vec<SolutionRow> = serde_json::from_str(&read_input(rows)?)?;
    let total = rows.len();

    let kept = if parallel {
        filter.filter_parallel(rows)
    } else {
        filter.filter(rows)
    };
    info!("{} of {} rows kept", kept.len(), total);

    let columns: Vec<String> = kept
        .iter()
        .flat_map(|row| row.variables())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&kept)?);
        }
        OutputFormat::Csv => {
            println!("{}", columns.join(","));
            for row in &kept {
                let cells: Vec<String> = columns.iter().map(|c| format_csv_value(row.get(c))).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            if kept.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&columns);
            for row in &kept {
                let cells: Vec<&str> = columns.iter().map(|c| row.get(c).unwrap_or("")).collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} of {} row(s)", kept.len(), total);
        }
    }
    Ok(())
}

fn run_render(config: &EvaluatorConfig, plan: &Path, prefixes: &[String]) -> CliResult<()> {
    let filter = load_filter(config, plan)?;

    let mut namespaces = NamespaceManager::empty();
    for ns in &config.namespaces {
        namespaces.add_prefix(ns.prefix.as_str(), ns.iri.as_str());
    }
    for entry in prefixes {
        let (prefix, iri) = entry
            .split_once('=')
            .ok_or_else(|| format!("expected prefix=iri, got {:?}", entry))?;
        namespaces.add_prefix(prefix, iri);
    }

    println!("{}", filter.expression().render(&namespaces.prefixes()));
    Ok(())
}

fn format_csv_value(value: Option<&str>) -> String {
    match value {
        None => String::new(),
        Some(s) if s.contains(',') || s.contains('"') || s.contains('\n') => {
            format!("\"{}\"", s.replace('"', "\"\""))
        }
        Some(s) => s.to_string(),
    }
}
