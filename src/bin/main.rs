use lzrgun::*;

use std::process::ExitCode;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal;
use tracing::warn;

use lzrgun::cli::Args;
use lzrgun::client::HttpFetcher;
use lzrgun::error::AppResult;
use lzrgun::runner::{run, RunContext};
use lzrgun::shutdown::shutdown_channel;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_normalized();
    logger::init_logging(args.verbose);

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            println!("{e}");
            println!("{}", cli::usage());
            return ExitCode::FAILURE;
        }
    };

    match execute(&args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: &Args, config: model::Config) -> AppResult<()> {
    if !args.json {
        println!(
            "using {} with {} total requests ({} concurrently)",
            config.target, config.total_requests, config.concurrency
        );
    }

    let fetcher = Arc::new(HttpFetcher::new(config.timeout)?);

    let pb = if args.quiet || args.json {
        ProgressBar::hidden()
    } else {
        let sty = ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        let pb = ProgressBar::new(config.total_requests as u64);
        pb.set_style(sty);
        pb
    };

    let shutdown_tx = shutdown_channel();
    let ctrl_c_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C signal, stopping");
            drop(ctrl_c_tx.send(()));
        }
    });

    let report = run(RunContext {
        config,
        fetcher,
        shutdown_tx,
        progress: pb,
    })
    .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary);
        println!(
            "started {}, finished in {:.2}s ({:.2} requests/sec)",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.elapsed.as_secs_f64(),
            report.requests_per_sec()
        );
    }
    Ok(())
}
