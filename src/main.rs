//! LeverageQuote - Main Entry Point
//!
//! Prints a leveraged position quote for the given trade parameters, using
//! the static prices from the configuration file. With `--watch` the price
//! feed keeps polling and every quote change is printed until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use leverage_quote::common::format::{format_token_amount, format_usd};
use leverage_quote::config::load_config;
use leverage_quote::engine::spawn_price_listener;
use leverage_quote::feeds::StaticBalanceSource;
use leverage_quote::{
    AccountState, AppConfig, BalanceFeed, BalanceSnapshot, Direction, InputUpdate, OrderType,
    PairId, PriceFeed, SharedEngine, TokenSymbol, TradeEngine,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Trading pair, e.g. WETH/USDC
    #[arg(long)]
    pair: Option<PairId>,

    /// LONG or SHORT
    #[arg(long)]
    direction: Option<Direction>,

    /// MARKET or LIMIT
    #[arg(long)]
    order_type: Option<OrderType>,

    /// Token the position is funded with
    #[arg(long)]
    funding_token: Option<TokenSymbol>,

    /// Amount of the funding token
    #[arg(long, conflicts_with = "max")]
    amount: Option<String>,

    /// Fund with the whole balance of the funding token
    #[arg(long)]
    max: bool,

    /// Wallet address; defaults to account.address from the config file
    #[arg(long)]
    address: Option<String>,

    /// Chain the wallet is connected to; defaults to the target chain
    #[arg(long)]
    chain_id: Option<u64>,

    /// Leverage multiplier
    #[arg(long)]
    leverage: Option<f64>,

    /// Limit price (LIMIT orders)
    #[arg(long)]
    limit_price: Option<String>,

    /// Stop loss price
    #[arg(long)]
    stop_loss: Option<String>,

    /// Take profit price
    #[arg(long)]
    take_profit: Option<String>,

    /// Keep polling prices and print every quote change
    #[arg(long)]
    watch: bool,
}

impl Args {
    fn input_update(&self) -> InputUpdate {
        InputUpdate {
            order_type: self.order_type,
            direction: self.direction,
            pair: self.pair,
            funding_amount: None,
            funding_token: self.funding_token,
            leverage_multiplier: self.leverage,
            limit_price: self.limit_price.clone(),
            stop_loss_price: self.stop_loss.clone(),
            take_profit_price: self.take_profit.clone(),
        }
    }
}

/// Read balances for the configured account, if it has any
async fn load_balances(args: &Args, config: &AppConfig) -> Result<Option<BalanceSnapshot>> {
    let Some(holdings) = config.account.static_balances else {
        return Ok(None);
    };
    let address = args
        .address
        .clone()
        .or_else(|| config.account.address.clone())
        .context("account.address or --address is needed to read balances")?;

    let target_chain_id = config.account.target_chain_id;
    let account = AccountState::connected(address, args.chain_id.unwrap_or(target_chain_id));
    let source = StaticBalanceSource::from_whole(&holdings)?;
    let mut feed = BalanceFeed::new(Arc::new(source), target_chain_id);
    Ok(Some(*feed.refresh(&account).await?))
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config))?;

    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.settings.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Configuration file: {}", args.config);

    let source = config
        .price_feed
        .static_source()?
        .context("price_feed.static_prices or price_feed.oracle_answers must be set")?;

    let mut feed = PriceFeed::new(Arc::new(source))
        .with_heartbeat(Duration::from_millis(config.price_feed.heartbeat_ms));
    feed.refresh().await?;

    let mut engine = TradeEngine::new(config.engine.clone());
    engine.on_prices(feed.latest());

    // The token goes first: switching it clears the amount
    if !engine.update_inputs(args.input_update()) {
        anyhow::bail!("trade parameters rejected (negative leverage?)");
    }
    let balances = load_balances(&args, &config).await?;
    let accepted = if args.max {
        let balances = balances
            .as_ref()
            .context("--max needs account.static_balances in the configuration")?;
        engine.fund_max(balances)
    } else {
        let amount = args.amount.clone().unwrap_or_default();
        engine.update_inputs(InputUpdate::new().funding_amount(amount))
    };
    if !accepted {
        anyhow::bail!("funding amount must be a non-negative number");
    }

    let funding_token = engine.inputs().funding_token;
    if let Some(usd) = engine.funding_amount_usd() {
        info!("Pay: ${}", format_usd(usd));
    }
    if let Some(balances) = &balances {
        info!(
            "Balance: {} {}",
            format_token_amount(funding_token, balances.get(funding_token)),
            funding_token
        );
        if let Some(missing) = engine.funding_shortfall(balances) {
            tracing::warn!(
                "Insufficient {}: {} more needed",
                funding_token,
                format_token_amount(funding_token, missing)
            );
        }
    }

    if !engine.inputs().leverage_within_bounds() {
        let (min, max) = engine.leverage_bounds();
        tracing::warn!(
            leverage = engine.inputs().leverage_multiplier,
            "Leverage outside the {}x-{}x range offered for {}",
            min,
            max,
            engine.inputs().funding_token
        );
    }

    println!("{}", serde_json::to_string_pretty(&engine.quote())?);

    if !args.watch {
        return Ok(());
    }

    engine.subscribe(|quote| match quote {
        Some(quote) => println!("{}", quote.summary()),
        None => println!("no quote"),
    });

    let shared = SharedEngine::new(engine);
    let listener = spawn_price_listener(shared, feed.subscribe());
    feed.start();

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal, cleaning up...");

    feed.stop();
    drop(feed);
    listener.await?;

    Ok(())
}
