use std::ffi::OsString;
use std::time::Duration;

use clap::{CommandFactory, Parser};

use crate::error::ConfigError;
use crate::model::{Config, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DEFAULT_TOTAL_REQUESTS};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fire a fixed number of GET requests at a URL from a pool of workers",
    long_about = None,
    override_usage = "lzrgun [-n total] [-nc concurrent] url"
)]
pub struct Args {
    /// URL to request
    pub url: String,

    /// Number of total requests to perform
    #[arg(long = "n", value_name = "TOTAL", default_value_t = DEFAULT_TOTAL_REQUESTS)]
    pub total: usize,

    /// Number of concurrent requests to perform
    #[arg(long = "nc", value_name = "CONCURRENT", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parses the process arguments, accepting the single-dash `-n`/`-nc`
    /// spelling as well as `--n`/`--nc`.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn to_config(&self) -> Result<Config, ConfigError> {
        Config::new(
            &self.url,
            self.total,
            self.concurrency,
            Duration::from_secs(self.timeout),
        )
    }
}

pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Rewrites `-n`, `-nc` and their `=value` forms to the long spelling clap
/// understands. Everything after `--` is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for arg in args.into_iter().map(Into::into) {
        if passthrough {
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                return None;
            }
            let (flag, value) = match s.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (s, None),
            };
            match flag {
                "-n" | "-nc" => Some(match value {
                    Some(value) => format!("-{flag}={value}"),
                    None => format!("-{flag}"),
                }),
                _ => None,
            }
        });
        if arg == "--" {
            passthrough = true;
        }
        out.push(rewritten.map_or(arg, OsString::from));
    }
    out
}
