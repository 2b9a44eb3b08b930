//! COIQ - command-line front end for the rocket-type pipeline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coiq::config::{self, AppConfig};
use coiq::data::export;
use coiq::data::DataLoader;
use coiq::data::DataProcessor;
use coiq::stats::{Insights, InsightsCalculator, StatsSummary};
use coiq::taxonomy::{classify, RocketType, COUNTRY_COORDS, FUND_LEVEL_MAPPING};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coiq", version, about = "Classify startups into rocket types")]
struct Cli {
    /// Config file (toml, json or yaml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a CSV and write the processed table and statistics
    Process {
        input: PathBuf,
        /// Overrides `output.dir` from config
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify a CSV and print portfolio insights
    Report {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the rocket type for each funding stage
    Classify {
        #[arg(required = true)]
        fund_levels: Vec<String>,
    },
    /// Print the label set, fund-level table and country table
    Tables,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("failed to load config")?;
    init_logging(&cfg, cli.verbose);

    match cli.command {
        Commands::Process {
            input,
            output_dir,
            json,
        } => {
            if let Some(dir) = output_dir {
                cfg.output.dir = dir;
            }
            run_process(&cfg, &input, json)
        }
        Commands::Report { input, json } => run_report(&cfg, &input, json),
        Commands::Classify { fund_levels } => {
            for raw in fund_levels {
                println!("{raw}\t{}", classify(&raw));
            }
            Ok(())
        }
        Commands::Tables => {
            print_tables();
            Ok(())
        }
    }
}

fn init_logging(cfg: &AppConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_and_process(input: &Path) -> Result<(DataFrame, StatsSummary)> {
    let mut loader = DataLoader::new();
    let df = loader
        .load_csv(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let processed = DataProcessor::process(df).context("failed to process startup table")?;
    Ok(processed)
}

fn run_process(cfg: &AppConfig, input: &Path, json: bool) -> Result<()> {
    let (mut processed, stats) = load_and_process(input)?;

    let csv_path = cfg.output.processed_csv_path();
    export::write_processed_csv(&mut processed, &csv_path)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    let stats_path = cfg.output.stats_json_path();
    export::write_stats_json(&stats, &stats_path)
        .with_context(|| format!("failed to write {}", stats_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_summary(&stats);
        println!();
        println!("Processed table: {}", csv_path.display());
        println!("Statistics:      {}", stats_path.display());
    }
    Ok(())
}

fn run_report(cfg: &AppConfig, input: &Path, json: bool) -> Result<()> {
    let (processed, stats) = load_and_process(input)?;
    let insights = InsightsCalculator::compute(&processed, &stats, &cfg.report)
        .context("failed to compute insights")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else {
        print_summary(&stats);
        print_insights(&insights);
    }
    Ok(())
}

fn print_summary(stats: &StatsSummary) {
    println!("Total startups: {}", stats.total_count);
    for (label, count) in &stats.label_counts {
        let pct = stats.label_percentages.get(label).copied().unwrap_or(0.0);
        println!("  {label:<8} {count:>6}  {pct:>6.2}%");
    }
}

fn print_insights(insights: &Insights) {
    let overview = &insights.overview;
    let or_na = |v: Option<usize>| v.map_or_else(|| "N/A".to_string(), |n| n.to_string());

    println!();
    println!("Organizations: {}", overview.organizations);
    println!("Countries:     {}", or_na(overview.countries));
    println!("Sectors:       {}", or_na(overview.sectors));
    println!("MVPs:          {}", or_na(overview.mvps));

    if !insights.top_countries.is_empty() {
        println!();
        print!("{:<20}", "Country");
        for label in RocketType::RANKED {
            print!(" {:>5}", label);
        }
        println!(" {:>6}", "Total");
        for row in &insights.top_countries {
            print!("{:<20}", row.country);
            for label in RocketType::RANKED {
                print!(" {:>5}", row.counts.get(label.as_str()).copied().unwrap_or(0));
            }
            println!(" {:>6}", row.total);
        }
    }

    if !insights.top_sectors.is_empty() {
        println!();
        println!("Top sectors:");
        for (sector, count) in &insights.top_sectors {
            println!("  {sector:<24} {count:>6}");
        }
    }
}

fn print_tables() {
    let labels: Vec<&str> = RocketType::ALL.iter().map(|l| l.as_str()).collect();
    println!("Labels: {}", labels.join(", "));

    println!();
    println!("Fund level -> label:");
    for (fund_level, label) in FUND_LEVEL_MAPPING {
        println!("  {fund_level:<16} {label}");
    }

    println!();
    println!("Country centroids:");
    for (country, coords) in COUNTRY_COORDS {
        println!("  {country:<20} {:>9.4} {:>10.4}", coords.lat, coords.lon);
    }
}
