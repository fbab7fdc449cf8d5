//! Command-line and environment configuration. Every option has a default.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use clap::Parser;
use kyp_ai::ChatClient;

const DEFAULT_OUTPUT_DIR: &str = "data/output";

#[derive(Debug, Parser)]
#[command(
    name = "kyp",
    version,
    about = "Batch credit-risk screening of company financial statements"
)]
pub struct Cli {
    /// Directory holding one `.json` statement per company.
    #[arg(long, env = "KYP_INPUT_DIR", default_value = "data/input")]
    pub input: PathBuf,

    /// Report path. Defaults to a timestamped file under `data/output/`.
    #[arg(long, env = "KYP_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Maximum classifier requests in flight.
    #[arg(
        long,
        env = "KYP_CONCURRENCY",
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub concurrency: u16,

    /// Per-record classifier timeout in seconds.
    #[arg(
        long,
        env = "KYP_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    #[arg(long, env = "KYP_MODEL", default_value = ChatClient::DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of an OpenAI-compatible chat-completions API.
    #[arg(long, env = "KYP_API_BASE", default_value = ChatClient::DEFAULT_BASE_URL)]
    pub api_base: String,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl Cli {
    pub fn concurrency(&self) -> usize {
        usize::from(self.concurrency)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `--output` if given, else `data/output/consolidated_report_<YYYYmmdd_HHMM>.csv`.
    pub fn output_path(&self, now: NaiveDateTime) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(DEFAULT_OUTPUT_DIR).join(format!(
                "consolidated_report_{}.csv",
                now.format("%Y%m%d_%H%M")
            ))
        })
    }
}
