use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use churn_risk_pipeline::{analyze, export, ingest, report, ChurnAnalysis, Config};

#[derive(Parser)]
#[command(name = "churn-risk")]
#[command(about = "Customer churn risk scoring from CSV exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score customers and print the highest risk ones
    Score {
        /// Customer CSV; a synthetic dataset is used when omitted
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write predictions as CSV or the full analysis as JSON
    Export {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "predictions.csv")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Write a synthetic customer dataset
    Synthesize {
        #[arg(long, default_value_t = ingest::SYNTHETIC_BATCH_SIZE)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "customers.csv")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "churn_risk_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Score { csv, seed, limit } => {
            let config = config.with_seed(seed);
            let analysis = run_analysis(csv.as_deref(), &config)?;
            let summary = report::summarize(&analysis.predictions);

            println!(
                "Scored {} customers: {} high, {} medium, {} low (avg churn risk {:.1}%, AUC-ROC {:.1}%).",
                summary.total,
                summary.high,
                summary.medium,
                summary.low,
                summary.average_probability * 100.0,
                analysis.metrics.auc * 100.0
            );

            println!("Top customers by churn risk:");
            for prediction in report::top_risk(&analysis.predictions, limit.unwrap_or(config.top_n)) {
                println!(
                    "- {} ({}) churn risk {:.1}% | tenure {:.0}, {:.2}/month, {}",
                    prediction.user_id,
                    prediction.risk_level.as_str(),
                    prediction.churn_probability * 100.0,
                    prediction.features.tenure,
                    prediction.features.monthly_charges,
                    prediction.features.contract_type.as_str()
                );
            }
        }
        Commands::Report { csv, seed, out } => {
            let config = config.with_seed(seed);
            let analysis = run_analysis(csv.as_deref(), &config)?;
            let label = csv
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "synthetic dataset".to_string());
            let report = report::build_report(&label, chrono::Utc::now(), &analysis);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            csv,
            seed,
            out,
            format,
        } => {
            let config = config.with_seed(seed);
            let analysis = run_analysis(csv.as_deref(), &config)?;
            let writer = create_output(&out)?;
            match format {
                ExportFormat::Csv => export::write_predictions_csv(writer, &analysis.predictions)?,
                ExportFormat::Json => export::write_analysis_json(writer, &analysis)?,
            }
            println!(
                "Exported {} predictions to {}.",
                analysis.predictions.len(),
                out.display()
            );
        }
        Commands::Synthesize { count, seed, out } => {
            let config = config.with_seed(seed);
            let records = ingest::synthesize_batch(count, &mut config.rng());
            export::write_customers_csv(create_output(&out)?, &records)?;
            println!("Wrote {} synthetic customers to {}.", records.len(), out.display());
        }
    }

    Ok(())
}

fn run_analysis(csv: Option<&Path>, config: &Config) -> anyhow::Result<ChurnAnalysis> {
    let raw_text = match csv {
        Some(path) => ingest::read_csv_text(path)?,
        None => String::new(),
    };

    Ok(analyze(&raw_text, &mut config.rng()))
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
