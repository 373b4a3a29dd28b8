//! Kairos - orderbook delta momentum research
//!
//! Streams order book snapshots (synthetic by default, Bybit REST with
//! `--live`, a capture file with `--capture`), backtests the delta
//! momentum strategy over them, and writes the research artifacts.

use std::path::PathBuf;
use std::time::Duration;

use kairos_feed::{
    BybitClient, BybitRestSource, ReplaySource, SnapshotSource, SyntheticFeed, SyntheticFeedConfig,
};
use kairos_runner::{ResearchConfig, ResearchSession, render_text_report, write_artifacts};

fn print_help() {
    eprintln!(
        r#"Kairos - orderbook delta momentum research

USAGE:
    kairos [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from a JSON file
    --capture <PATH>    Replay a captured snapshot file instead of a feed
    --live              Poll the exchange instead of the synthetic feed
    --out <DIR>         Directory for report artifacts (default: .)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Offline run with the seeded synthetic feed
    kairos

    # Backtest against the exchange testnet order book
    kairos --live

    # Re-run a recorded session
    kairos --capture snapshots.json --config research.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut capture_path: Option<String> = None;
    let mut out_dir = PathBuf::from(".");
    let mut live_flag = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--capture" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --capture requires a path argument");
                    std::process::exit(1);
                }
                capture_path = Some(args[i].clone());
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --out requires a directory argument");
                    std::process::exit(1);
                }
                out_dir = PathBuf::from(&args[i]);
            }
            "--live" => {
                live_flag = true;
            }
            arg => {
                eprintln!("Unknown argument: {arg}");
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => ResearchConfig::from_json_file(path)?,
        None => ResearchConfig::default(),
    };
    if live_flag {
        config.live = true;
    }
    config.validate()?;

    log::info!(
        "Starting delta momentum research: symbol={} threshold={} iterations={}",
        config.symbol,
        config.delta_threshold,
        config.max_iterations
    );

    let mut source: Box<dyn SnapshotSource + Send> = match &capture_path {
        Some(path) => Box::new(ReplaySource::from_json_file(path)?),
        None if config.live => {
            let client = BybitClient::new(config.testnet)?;
            Box::new(BybitRestSource::new(
                client,
                config.symbol.clone(),
                config.depth,
                Duration::from_millis(config.poll_interval_ms),
            ))
        }
        None => Box::new(SyntheticFeed::new(SyntheticFeedConfig {
            symbol: config.symbol.clone(),
            seed: config.seed,
            ..Default::default()
        })),
    };

    if !source.symbol().is_empty() && source.symbol() != config.symbol {
        log::warn!(
            "Source symbol {} differs from configured symbol {}",
            source.symbol(),
            config.symbol
        );
    }

    let mut session = ResearchSession::new(config)?;
    session.run(source.as_mut()).await?;
    let (report, stats) = session.finish();

    println!("{}", render_text_report(&report, &stats));
    write_artifacts(&out_dir, &report, &stats)?;

    log::info!("Research completed");
    Ok(())
}
