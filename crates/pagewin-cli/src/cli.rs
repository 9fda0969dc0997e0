use clap::{Args, Parser, Subcommand};
use std::fmt;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "pagewin")]
#[command(about = "Page through a lazily loaded collection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a config file (or set PAGEWIN_CONFIG env var)
    #[arg(long, global = true, value_name = "FILE", env = "PAGEWIN_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page through a simulated data source, one JSON line per settled page
    Browse(BrowseArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Number of records the source holds
    #[arg(long)]
    pub total: usize,
    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Comma-separated steps: next, prev, goto:N, size:N, dirty
    #[arg(long, value_delimiter = ',')]
    pub steps: Vec<Step>,
    /// Simulated latency of every fetch
    #[arg(long, default_value_t = 0)]
    pub latency_ms: u64,
    /// Fail every Nth fetch
    #[arg(long)]
    pub fail_every: Option<usize>,
    /// Keep the page index inside the page range
    #[arg(long)]
    pub clamp: bool,
    /// Give up on a page that has not settled after this long
    #[arg(long, default_value_t = 5000)]
    pub settle_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
    Goto(isize),
    PageSize(usize),
    Dirty,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "next" => return Ok(Step::Next),
            "prev" | "previous" => return Ok(Step::Previous),
            "dirty" => return Ok(Step::Dirty),
            _ => {}
        }
        if let Some(index) = s.strip_prefix("goto:") {
            return index
                .parse()
                .map(Step::Goto)
                .map_err(|e| format!("invalid page index '{}': {}", index, e));
        }
        if let Some(size) = s.strip_prefix("size:") {
            return match size.parse::<usize>() {
                Ok(0) => Err("page size must be greater than zero".to_string()),
                Ok(size) => Ok(Step::PageSize(size)),
                Err(e) => Err(format!("invalid page size '{}': {}", size, e)),
            };
        }
        Err(format!(
            "unknown step '{}' (expected next, prev, goto:N, size:N or dirty)",
            s
        ))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Next => write!(f, "next"),
            Step::Previous => write!(f, "prev"),
            Step::Goto(index) => write!(f, "goto:{}", index),
            Step::PageSize(size) => write!(f, "size:{}", size),
            Step::Dirty => write!(f, "dirty"),
        }
    }
}
