//! Demo binary: forecast a symbol from a CSV history.
//!
//! ```text
//! cargo run --bin forecast -- --input data/aapl.csv --symbol AAPL --horizon 14
//! ```
//!
//! The CSV must carry a `Date,Open,High,Low,Close,Volume` header. Output
//! is the full response payload as JSON on stdout.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use market_forecast::data::load_records_csv;
use market_forecast::{ForecastEngine, ForecastRequest};

#[derive(Parser, Debug)]
#[command(name = "forecast", about = "Dual-model price forecast from a CSV history")]
struct Args {
    /// Path to the OHLCV CSV file
    #[arg(long)]
    input: String,

    /// Asset symbol the history belongs to
    #[arg(long, default_value = "UNKNOWN")]
    symbol: String,

    /// Forecast horizon in days (7-30)
    #[arg(long, default_value_t = 14)]
    horizon: usize,

    /// Training-window length in calendar days
    #[arg(long, default_value_t = 730)]
    training_days: usize,

    /// Moving-average lookback override
    #[arg(long)]
    indicator_period: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let rows = load_records_csv(&args.input)
        .with_context(|| format!("failed to load history from {}", args.input))?;
    info!(rows = rows.len(), symbol = %args.symbol, "history loaded");

    let engine = ForecastEngine::default();
    let mut request = ForecastRequest::new(&args.symbol, args.horizon, args.training_days);
    if let Some(period) = args.indicator_period {
        request = request.with_indicator_period(period);
    }
    let response = engine
        .run(&request, rows)
        .context("forecast request failed")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");

    Ok(())
}
