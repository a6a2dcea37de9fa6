use analytics::indicators::rolling_mean;
use analytics::{MetricsEngine, MetricsResult, QuoteSummary, summarize};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{Config, LoggingSettings, validate_risk_free_rate};
use core_types::WindowSpec;
use market_data::{Instrument, MarketRepository, Mover};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use windowing::{ChartPoint, RangeSelector, chart_points};

/// The main entry point for the GSE Watch terminal.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    // Held until exit so the file writer flushes.
    let _log_guard = init_tracing(&config.logging)?;
    tracing::debug!(path = %cli.config.display(), ?config, "Loaded configuration");

    let data_path = cli.data.clone().unwrap_or_else(|| config.data.path.clone());
    let repo = MarketRepository::load(&data_path)
        .with_context(|| format!("Failed to load market data from {}", data_path.display()))?;

    // Execute the appropriate command
    match cli.command {
        Commands::List(args) => handle_list(args, &repo),
        Commands::Market => handle_market(&repo),
        Commands::Stats(args) => handle_stats(args, &config, &repo),
        Commands::Chart(args) => handle_chart(args, &config, &repo),
        Commands::Export(args) => handle_export(args, &config, &repo),
    }
}

/// Installs the stderr subscriber and, when configured, a daily rolling log file.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Market statistics, charts and exports for Ghana Stock Exchange listings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Market data document to read, overriding `data.path` from the configuration.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available symbols.
    List(ListArgs),
    /// Show the latest session's top gainers, losers and total volume.
    Market,
    /// Show the key statistics and performance of one stock.
    Stats(StatsArgs),
    /// Print the chart series of one stock as JSON.
    Chart(WindowArgs),
    /// Write the selected window of one stock to a CSV file.
    Export(ExportArgs),
}

#[derive(Parser)]
struct ListArgs {
    /// Only list symbols containing this text (case-insensitive).
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Parser)]
struct StatsArgs {
    /// The symbol to analyse (e.g., "MTNGH").
    #[arg(long)]
    symbol: String,

    /// Reference date for year-to-date figures (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Annual risk-free rate as a fraction (e.g., 0.112), overriding the configuration.
    #[arg(long)]
    risk_free_rate: Option<Decimal>,
}

#[derive(Parser)]
struct WindowArgs {
    /// The symbol to select (e.g., "GCB").
    #[arg(long)]
    symbol: String,

    /// Time range: 1M, 3M, 6M, YTD, 1Y, 2Y, 5Y or ALL. Defaults to the configured window.
    #[arg(long)]
    window: Option<String>,

    /// Reference date for the YTD window (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Parser)]
struct ExportArgs {
    #[command(flatten)]
    selection: WindowArgs,

    /// Output file. Defaults to `<SYMBOL>_GSE_data.csv` in the current directory.
    #[arg(long)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_list(args: ListArgs, repo: &MarketRepository) -> anyhow::Result<()> {
    let matches = repo.search(&args.search);
    if matches.is_empty() {
        tracing::warn!(search = %args.search, "No stocks match the search");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Symbol", "Name", "Sector", "Last Close", "Change", "Sessions"]);
    for instrument in matches {
        let summary = quote_summary(instrument);
        table.add_row(vec![
            instrument.symbol.clone(),
            instrument.display_name().to_string(),
            instrument.sector_label().to_string(),
            format_price(summary.as_ref().map(|s| s.last_close).or(instrument.price)),
            format_signed(summary.and_then(|s| s.daily_change_pct), "%"),
            instrument.history.len().to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn handle_market(repo: &MarketRepository) -> anyhow::Result<()> {
    let Some(summary) = repo.market_summary() else {
        tracing::warn!("The market data holds no sessions");
        return Ok(());
    };

    println!(
        "{} stocks, data as of {}, total volume {}",
        summary.total_stocks,
        summary.latest_date.format("%d %b %Y"),
        summary.total_volume
    );
    println!("\nTop Gainers");
    println!("{}", movers_table(&summary.gainers));
    println!("\nTop Losers");
    println!("{}", movers_table(&summary.losers));
    Ok(())
}

fn handle_stats(args: StatsArgs, config: &Config, repo: &MarketRepository) -> anyhow::Result<()> {
    let instrument = repo.instrument(&args.symbol)?;
    let today = args.today.unwrap_or_else(local_today);
    let risk_free_rate = resolve_risk_free_rate(args.risk_free_rate, config)?;

    tracing::info!(symbol = %instrument.symbol, %today, %risk_free_rate, "Computing statistics");

    let samples = instrument.history.samples();
    let metrics = MetricsEngine::new().compute(samples, risk_free_rate, today);
    let summary = quote_summary(instrument);

    println!("{} - {} ({})", instrument.symbol, instrument.display_name(), instrument.sector_label());
    match &summary {
        Some(s) => println!(
            "GH₵ {} {} ({})  as of {}, {} data points",
            format_decimal(s.last_close),
            format_signed(s.daily_change, ""),
            format_signed(s.daily_change_pct, "%"),
            s.last_date.format("%d %b %Y"),
            s.data_points
        ),
        None => println!("No valid closing prices on record."),
    }

    println!("\nKey Statistics");
    println!("{}", statistics_table(summary.as_ref(), latest_volume(instrument), &metrics));
    println!("\nPerformance");
    println!("{}", performance_table(&metrics));
    Ok(())
}

/// A command-line rate override is held to the same bounds as the configured one.
fn resolve_risk_free_rate(cli_rate: Option<Decimal>, config: &Config) -> anyhow::Result<Decimal> {
    match cli_rate {
        Some(rate) => {
            validate_risk_free_rate(rate).context("Invalid --risk-free-rate")?;
            Ok(rate)
        }
        None => Ok(config.analytics.risk_free_rate),
    }
}

/// The quote summary derived from history, with the document's published quote
/// fields taking precedence for the 52-week range and filling any gaps.
fn quote_summary(instrument: &Instrument) -> Option<QuoteSummary> {
    let mut summary = summarize(instrument.history.samples())?;

    if let Some(high) = instrument.year_high {
        summary.year_high = high;
    }
    if let Some(low) = instrument.year_low {
        summary.year_low = low;
    }
    summary.previous_close = summary.previous_close.or(instrument.prev_close);
    summary.daily_change = summary.daily_change.or(instrument.change);
    summary.daily_change_pct = summary.daily_change_pct.or(instrument.change_percent);
    summary.average_volume_10d = summary
        .average_volume_10d
        .or(instrument.avg_volume_10d.map(Decimal::from));
    summary.average_volume_30d = summary
        .average_volume_30d
        .or(instrument.avg_volume_30d.map(Decimal::from));

    Some(summary)
}

/// Volume of the latest session, falling back to the document's quote header.
fn latest_volume(instrument: &Instrument) -> Option<u64> {
    instrument
        .history
        .last()
        .and_then(|s| s.volume)
        .or(instrument.volume)
}

/// The JSON document handed to the charting front-end.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartDocument<'a> {
    symbol: &'a str,
    window: WindowSpec,
    points: Vec<ChartPoint>,
    moving_average_20: Vec<Option<Decimal>>,
    moving_average_50: Vec<Option<Decimal>>,
}

fn handle_chart(args: WindowArgs, config: &Config, repo: &MarketRepository) -> anyhow::Result<()> {
    let instrument = repo.instrument(&args.symbol)?;
    let (window, selection) = select_window(&args, config, instrument);

    let points = chart_points(selection);
    let closes: Vec<Decimal> = points.iter().map(|p| p.close).collect();

    let document = ChartDocument {
        symbol: &instrument.symbol,
        window,
        moving_average_20: rolling_mean(&closes, 20),
        moving_average_50: rolling_mean(&closes, 50),
        points,
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn handle_export(args: ExportArgs, config: &Config, repo: &MarketRepository) -> anyhow::Result<()> {
    let instrument = repo.instrument(&args.selection.symbol)?;
    let (window, selection) = select_window(&args.selection, config, instrument);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(exporter::default_file_name(&instrument.symbol)));
    let rows = exporter::export_to_file(&output, &instrument.symbol, selection)
        .with_context(|| format!("Failed to export {}", instrument.symbol))?;

    println!("Wrote {rows} rows ({window}) to {}", output.display());
    Ok(())
}

/// Resolves the requested (or configured) window and selects it from the instrument's history.
fn select_window<'a>(
    args: &WindowArgs,
    config: &Config,
    instrument: &'a Instrument,
) -> (WindowSpec, windowing::Selection<'a>) {
    let token = args
        .window
        .as_deref()
        .unwrap_or(&config.display.default_window);
    let today = args.today.unwrap_or_else(local_today);

    let selection = RangeSelector::new().select_token(instrument.history.samples(), token, today);
    (WindowSpec::from_token(token), selection)
}

/// The calendar date on this machine. The only place the wall clock is read.
fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

// ==============================================================================
// Presentation
// ==============================================================================

const NOT_AVAILABLE: &str = "N/A";

fn statistics_table(summary: Option<&QuoteSummary>, volume: Option<u64>, metrics: &MetricsResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    let rows: Vec<(&str, String)> = vec![
        ("Previous Close", format_price(summary.and_then(|s| s.previous_close))),
        ("52-Week High", format_price(summary.map(|s| s.year_high))),
        ("52-Week Low", format_price(summary.map(|s| s.year_low))),
        ("Volume", format_volume(volume.map(Decimal::from))),
        ("Avg Vol (10d)", format_volume(summary.and_then(|s| s.average_volume_10d))),
        ("Avg Vol (30d)", format_volume(summary.and_then(|s| s.average_volume_30d))),
        ("20-Day MA", format_price(metrics.moving_average_20)),
        ("50-Day MA", format_price(metrics.moving_average_50)),
        ("200-Day MA", format_price(summary.and_then(|s| s.moving_average_200))),
        (
            "Volatility (30d)",
            metrics
                .volatility_annualized_pct
                .map(|v| format!("{}%", v.round_dp(1)))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        (
            "Sharpe Ratio",
            metrics
                .sharpe_ratio
                .map(format_decimal)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    ];

    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table
}

fn performance_table(metrics: &MetricsResult) -> Table {
    let periods = metrics.period_returns();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(periods.iter().map(|(label, _)| label.to_string()).collect::<Vec<_>>());
    table.add_row(
        periods
            .iter()
            .map(|(_, value)| format_signed(*value, "%"))
            .collect::<Vec<_>>(),
    );
    table
}

fn movers_table(movers: &[Mover]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Symbol", "Close", "Change"]);
    for mover in movers {
        table.add_row(vec![
            mover.symbol.clone(),
            format_price(mover.close),
            format_signed(Some(mover.change), ""),
        ]);
    }
    table
}

fn format_decimal(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn format_price(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("GH₵ {}", format_decimal(v)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn format_volume(value: Option<Decimal>) -> String {
    match value {
        Some(v) => v.round_dp(0).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Two decimal places with an explicit sign, or "N/A".
fn format_signed(value: Option<Decimal>, suffix: &str) -> String {
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => format!("{}{suffix}", format_decimal(v)),
        Some(v) => format!("+{}{suffix}", format_decimal(v.abs())),
        None => NOT_AVAILABLE.to_string(),
    }
}
