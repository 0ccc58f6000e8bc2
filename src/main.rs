use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use sankey_flow::parser::parse_value;
use sankey_flow::{
    generate_from_import, load_rows, write_template, Category, ClassifiedEntry, ClassifiedStatement,
    EngineConfig, FlowReport, ImportedReport, Language,
};

/// Turn an income statement into Sankey flow data
#[derive(Parser, Debug)]
#[command(name = "sankey-flow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug output, repeat for more (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,

    /// Display language for aggregate node labels
    #[arg(short, long, global = true, default_value = "en", env = "SANKEY_LANG")]
    lang: Language,

    /// JSON locale file (labels + extra keywords)
    #[arg(long, global = true, env = "SANKEY_LOCALE_FILE")]
    locale: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the flow graph from a CSV statement (columns: name, value, type)
    Generate {
        file: PathBuf,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,

        /// Print a readable summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Build the flow graph from values given on the command line
    Manual {
        /// Revenue source, NAME=VALUE (repeatable)
        #[arg(short, long, value_parser = parse_named_value)]
        revenue: Vec<(String, f64)>,

        /// Cost of revenue (COGS)
        #[arg(short, long, default_value = "0", value_parser = parse_amount)]
        cogs: f64,

        /// Operating expense or tax, NAME=VALUE (repeatable)
        #[arg(short, long, value_parser = parse_named_value)]
        expense: Vec<(String, f64)>,

        #[arg(long)]
        pretty: bool,

        #[arg(long)]
        summary: bool,
    },

    /// Write the example statement CSV
    Template {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn parse_amount(s: &str) -> std::result::Result<f64, String> {
    parse_value(s).map_err(|e| e.to_string())
}

fn parse_named_value(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    Ok((name.trim().to_string(), parse_amount(value)?))
}

/// Command-line rows arrive with their category; no keyword matching involved
fn manual_statement(
    revenue: Vec<(String, f64)>,
    cogs: (String, f64),
    expense: Vec<(String, f64)>,
) -> ClassifiedStatement {
    let entries = revenue
        .into_iter()
        .map(|(name, value)| ClassifiedEntry::categorized(name, value, Category::Revenue))
        .chain(std::iter::once(ClassifiedEntry::categorized(
            cogs.0,
            cogs.1,
            Category::CostOfRevenue,
        )))
        .chain(
            expense
                .into_iter()
                .map(|(name, value)| ClassifiedEntry::categorized(name, value, Category::Expense)),
        );

    ClassifiedStatement::from_entries(entries)
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::load(cli.lang, cli.locale.as_deref())?;

    match cli.command {
        Commands::Generate { file, pretty, summary } => {
            let import = load_rows(&file)?;
            let imported = generate_from_import(import, &config.locale, &config.table);

            if summary {
                print_summary(&imported.report);
                print_row_issues(&imported);
            } else {
                print_json(&imported, pretty)?;
            }
        }
        Commands::Manual {
            revenue,
            cogs,
            expense,
            pretty,
            summary,
        } => {
            let cogs_label = config.locale.labels.cost_of_revenue.clone();
            let statement = manual_statement(revenue, (cogs_label, cogs), expense);
            let report = FlowReport::from_statement(statement, &config.locale);

            if summary {
                print_summary(&report);
            } else {
                print_json(&report, pretty)?;
            }
        }
        Commands::Template { out } => match out {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_template(file)?;
                eprintln!("✓ Template written to {}", path.display());
            }
            None => write_template(io::stdout().lock())?,
        },
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut out = io::stdout().lock();
    writeln!(out, "{}", json)?;
    Ok(())
}

fn print_summary(report: &FlowReport) {
    println!("📊 {}", report.summary());

    for (source, target, value) in report.graph.labeled_edges() {
        println!("   {} → {}: {:.2}", source, target, value);
    }

    for skipped in &report.unclassified {
        println!("⚠️  Skipped {:?}: unknown type {:?}", skipped.name, skipped.raw_type);
    }
    for advisory in &report.advisories {
        println!("⚠️  {}", advisory);
    }
    if !report.has_diagram() {
        println!("ℹ️  Nothing to draw");
    }
}

fn print_row_issues(imported: &ImportedReport) {
    for issue in &imported.row_issues {
        println!("⚠️  Line {}: {}", issue.line, issue.error);
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}
