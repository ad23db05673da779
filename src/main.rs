use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use blog_listings::{audit, brand_summary, car_summary, init_tracing, Dataset, GroupSummary};

#[derive(Parser, Debug)]
#[command(name = "blog-listings", version, about = "Inspect the listings dataset served by blog-server")]
struct Cli {
    /// JSON or CSV dataset; the bundled dataset is used when omitted
    #[arg(long, env = "BLOGS_DATA", global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Audit the dataset; exits non-zero on critical issues
    Check,
    /// Print count and value per group
    Summary {
        #[arg(long, value_enum, default_value_t = Grouping::Brand)]
        by: Grouping,
    },
    /// Print one record as JSON
    Get { cid: i64 },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Grouping {
    Brand,
    Model,
}

fn main() -> Result<()> {
    init_tracing("warn")?;

    let cli = Cli::parse();
    let dataset = Dataset::load(cli.data.as_deref())?;

    match cli.command {
        Command::Check => run_check(&dataset),
        Command::Summary { by } => {
            let summary = match by {
                Grouping::Brand => brand_summary(dataset.records()),
                Grouping::Model => car_summary(dataset.records()),
            };
            print_summary(&summary, dataset.total_value());
            Ok(())
        }
        Command::Get { cid } => match dataset.find(cid) {
            Some(record) => {
                println!("{}", serde_json::to_string_pretty(record)?);
                Ok(())
            }
            None => bail!("Blog not found: {cid}"),
        },
    }
}

fn run_check(dataset: &Dataset) -> Result<()> {
    let report = audit(dataset);

    println!("{}", report.summary());
    for issue in &report.issues {
        println!(
            "  [{:?}] Cid {} {}: {} ({})",
            issue.severity, issue.cid, issue.field, issue.issue, issue.recommendation
        );
    }

    if report.has_critical_issues() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(summary: &GroupSummary, total_value: i64) {
    let width = summary.keys().map(String::len).max().unwrap_or(0).max(5);

    println!("{:<width$}  {:>6}  {:>14}", "Group", "Count", "Value");
    for (group, stat) in summary {
        println!("{:<width$}  {:>6}  {:>14}", group, stat.count, stat.value);
    }
    let count: usize = summary.values().map(|s| s.count).sum();
    println!("{:<width$}  {:>6}  {:>14}", "TOTAL", count, total_value);
}
