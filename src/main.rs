use clap::Parser;
use coursepay::config::CheckoutConfig;
use coursepay::domain::pricing::GstRate;
use coursepay::interfaces::csv::cart_reader::CartSnapshotReader;
use coursepay::interfaces::csv::quote_writer::QuoteWriter;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Price a cart snapshot: per-item GST breakdown plus totals, as CSV on stdout.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input cart snapshot CSV file
    input: PathBuf,

    /// TOML config file. `COURSEPAY_*` environment overrides still apply.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured GST rate percentage
    #[arg(long)]
    gst_rate: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "coursepay=debug,info"
    } else {
        "coursepay=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // The quote goes to stdout; logs must stay on stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => CheckoutConfig::from_file(path).into_diagnostic()?,
        None => CheckoutConfig::default(),
    };
    config.apply_env_overrides().into_diagnostic()?;
    if let Some(rate) = cli.gst_rate {
        config.gst_rate_percent = rate;
    }
    config.validate().into_diagnostic()?;

    let rate = GstRate::new(Decimal::from(config.gst_rate_percent)).into_diagnostic()?;

    let file = File::open(&cli.input).into_diagnostic()?;
    let mut items = Vec::new();
    for item in CartSnapshotReader::new(file).items() {
        // A quote is never printed from a partially read cart.
        let item = item
            .into_diagnostic()?
            .resolve_sessions(config.workshop_sessions);
        item.validate().into_diagnostic()?;
        items.push(item);
    }

    let stdout = io::stdout();
    let breakdown = QuoteWriter::new(stdout.lock())
        .write_quote(&items, rate)
        .into_diagnostic()?;

    tracing::info!(
        items = items.len(),
        total = %breakdown.total_payable,
        "quote written"
    );

    Ok(())
}
