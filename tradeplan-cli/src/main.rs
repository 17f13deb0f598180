//! TradePlan CLI — stock analysis and watchlist commands.
//!
//! Commands:
//! - `analyze <SYMBOL>` — indicators, fundamentals, and a generated trading plan
//! - `scan` — day-over-day moves for the watchlist plus a recommendation
//! - `config show` — print the effective configuration
//! - `config init` — write the default configuration file

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tradeplan_core::data::{Lookback, YahooProvider};
use tradeplan_core::domain::{MarketCap, Ratio};
use tradeplan_core::narrative::GeminiClient;
use tradeplan_core::prompt::{Percent, Price, StrategyMode};
use tradeplan_runner::{
    execute, save_analysis, AnalysisRequest, AppConfig, Command, PreparedAnalysis, ScanReport,
    ScanRequest, Settings, NARRATIVE_MIME,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Recent sessions shown in the detail view.
const RECENT_SESSIONS: usize = 10;

#[derive(Parser)]
#[command(
    name = "tradeplan",
    about = "TradePlan CLI — technical snapshot and AI trading plan for IDX stocks"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one stock and generate a trading plan.
    Analyze {
        /// Ticker, with or without the exchange suffix (e.g. BBCA).
        symbol: String,

        /// Strategy: aggressive, conservative, long-term-growth.
        #[arg(long)]
        mode: Option<StrategyMode>,

        /// Months of daily history to fetch (at least 1).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        lookback_months: Option<u32>,

        /// Gemini API key.
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Save the narrative and chart data to the output directory.
        #[arg(long, default_value_t = false)]
        save: bool,

        /// Output directory for saved artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Scan the watchlist and ask for the best candidates today.
    Scan {
        /// Symbols to scan instead of the configured watchlist.
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Gemini API key.
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            symbol,
            mode,
            lookback_months,
            api_key,
            save,
            output_dir,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_analyze(config, symbol, mode, lookback_months, api_key, save, output_dir)
        }
        Commands::Scan { symbols, api_key } => {
            let config = load_config(cli.config.as_deref())?;
            run_scan(config, symbols, api_key)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_config(cli.config.as_deref())?;
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigAction::Init { force } => run_config_init(cli.config, force),
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tradeplan").join("config.toml"))
}

/// An explicit path must exist; the default location is optional.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        info!(path = %path.display(), "loading config");
        return Ok(AppConfig::from_file(path)?);
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "loading config");
            Ok(AppConfig::from_file(&path)?)
        }
        _ => {
            debug!("no config file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn run_config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(default_config_path)
        .context("no config directory on this platform; pass --config")?;
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save(&path)?;
    println!("Config written to: {}", path.display());
    Ok(())
}

fn provider_for(config: &AppConfig) -> YahooProvider {
    YahooProvider::with_cookie_url(
        config.yahoo.base_url.clone(),
        config.yahoo.cookie_url.clone(),
    )
}

fn generator_for(config: &AppConfig) -> GeminiClient {
    GeminiClient::new(config.gemini.base_url.clone(), config.gemini.model.clone())
}

fn run_analyze(
    mut config: AppConfig,
    symbol: String,
    mode: Option<StrategyMode>,
    lookback_months: Option<u32>,
    api_key: Option<String>,
    save: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    let mut req = AnalysisRequest::from_config(symbol, &config);
    if let Some(mode) = mode {
        req.mode = mode;
    }
    if let Some(months) = lookback_months {
        req.lookback = Lookback::Months(months);
    }

    let provider = provider_for(&config);
    let generator = generator_for(&config);
    let settings = Settings::new(config, api_key);

    let prepared = execute(Command::Prepare(req), &settings, &provider, &generator)?
        .into_prepared()
        .context("prepare returned no analysis")?;
    print_detail(&prepared);

    let result = execute(
        Command::Narrate(Box::new(prepared)),
        &settings,
        &provider,
        &generator,
    )?
    .into_analysis()
    .context("narrate returned no analysis")?;
    println!();
    println!("=== {} Plan ===", result.prepared.mode.title());
    println!("{}", result.narrative);

    if save {
        let today = chrono::Local::now().date_naive();
        let saved = save_analysis(&settings.config.output_dir, &result, today)?;
        println!();
        println!(
            "Narrative saved to: {} ({NARRATIVE_MIME})",
            saved.narrative.display()
        );
        println!("Chart data saved to: {}", saved.chart.display());
    }

    Ok(())
}

fn run_scan(config: AppConfig, symbols: Vec<String>, api_key: Option<String>) -> Result<()> {
    let req = if symbols.is_empty() {
        ScanRequest::watchlist(&config)
    } else {
        ScanRequest::new(symbols)
    };

    let provider = provider_for(&config);
    let generator = generator_for(&config);
    let settings = Settings::new(config, api_key);

    let report = execute(Command::Scan(req), &settings, &provider, &generator)?
        .into_scan()
        .context("scan returned no report")?;
    print_scan(&report);
    Ok(())
}

fn print_detail(p: &PreparedAnalysis) {
    let ind = &p.indicators;
    println!();
    println!("=== {} ({}) ===", p.symbol, p.qualified_symbol);
    println!("Strategy:       {}", p.mode.title());
    println!("Bars:           {}", p.series.len());
    println!("Price:          {}", Price(ind.last_close));
    println!("Change:         {}", Percent(ind.change_pct()));
    match ind.last_volume {
        Some(v) => println!("Volume:         {v}"),
        None => println!("Volume:         {}", Price(None)),
    }
    println!();
    println!("--- Technicals ---");
    println!("Support:        {}", Price(ind.windowed_low));
    println!("Resistance:     {}", Price(ind.windowed_high));
    println!("MA20:           {}", Price(ind.ma20));
    println!("MA50:           {}", Price(ind.ma50));
    println!();
    println!("--- Fundamentals ---");
    println!("P/E:            {}", Ratio(p.fundamentals.trailing_pe));
    println!("PBV:            {}", Ratio(p.fundamentals.price_to_book));
    println!("Market Cap:     {}", MarketCap(p.fundamentals.market_cap));

    let bars = p.series.bars();
    let start = bars.len().saturating_sub(RECENT_SESSIONS);
    if start < bars.len() {
        println!();
        println!("--- Recent Sessions ---");
        println!(
            "{:<10} {:>12} {:>12} {:>12} {:>12}",
            "Date", "Close", "Volume", "MA20", "MA50"
        );
        for (i, bar) in bars.iter().enumerate().skip(start) {
            println!(
                "{:<10} {:>12.2} {:>12} {:>12} {:>12}",
                bar.date.to_string(),
                bar.close,
                bar.volume,
                Price(p.overlay.ma20.get(i).copied().flatten()).to_string(),
                Price(p.overlay.ma50.get(i).copied().flatten()).to_string(),
            );
        }
    }
}

fn print_scan(report: &ScanReport) {
    println!();
    println!("=== Watchlist ===");
    for line in report.lines() {
        println!("{line}");
    }
    for skipped in &report.skipped {
        println!("SKIPPED {}: {}", skipped.symbol, skipped.reason);
    }
    println!();
    println!("=== Recommendation ===");
    println!("{}", report.summary);
}
