use anyhow::Context;
use clap::{Parser, Subcommand};
use pixmatch::{load_catalog, similarity_breakdown, AppConfig, FeaturePipeline, Matcher, Query};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Visual fingerprinting and catalog ranking
#[derive(Parser, Debug)]
#[command(name = "pixmatch")]
#[command(about = "Fingerprint images and rank catalogs by visual similarity", long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the fingerprint of an image as JSON
    Fingerprint {
        image: PathBuf,
    },
    /// Print the similarity breakdown of two images
    Compare {
        first: PathBuf,
        second: PathBuf,
    },
    /// Rank a catalog against a query image
    Rank {
        /// Query image
        #[arg(short, long)]
        query: PathBuf,

        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Override the category boost
        #[arg(long)]
        category_boost: Option<f32>,

        /// Query category; inferred from the image when omitted
        #[arg(long)]
        category: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    debug!("Config: {:?}", config);

    match args.command {
        Command::Fingerprint { image } => {
            let pipeline = FeaturePipeline::new(config.pipeline)?;
            let fingerprint = pipeline
                .fingerprint_path(&image)
                .with_context(|| format!("fingerprinting {}", image.display()))?;
            print_json(&fingerprint)?;
        }
        Command::Compare { first, second } => {
            let pipeline = FeaturePipeline::new(config.pipeline)?;
            let a = pipeline
                .fingerprint_path(&first)
                .with_context(|| format!("fingerprinting {}", first.display()))?;
            let b = pipeline
                .fingerprint_path(&second)
                .with_context(|| format!("fingerprinting {}", second.display()))?;
            print_json(&similarity_breakdown(a.as_slice(), b.as_slice()))?;
        }
        Command::Rank {
            query,
            catalog,
            limit,
            category_boost,
            category,
        } => {
            if let Some(boost) = category_boost {
                config.matching.category_boost = boost;
            }
            let pipeline = FeaturePipeline::new(config.pipeline)?;
            let matcher = Matcher::new(config.matching)?;

            let fingerprint = pipeline
                .fingerprint_path(&query)
                .with_context(|| format!("fingerprinting query {}", query.display()))?;
            let items = load_catalog(&catalog, &pipeline)?;

            let mut query = Query::new(fingerprint);
            if let Some(category) = category {
                query = query.with_category(category);
            }

            let outcome = matcher.rank(&query, &items, limit);
            info!(
                "Ranked {} candidates, {} results, confidence {:.3}",
                outcome.stats.candidates_count, outcome.stats.results_count, outcome.confidence
            );
            print_json(&outcome)?;
        }
    }

    Ok(())
}
