use crate::formatter::OutputFormat;
use crate::types::Severity;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cluster-lint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lint a Kubernetes cluster snapshot for best-practice violations")]
#[command(long_about = "Runs a configurable set of checks against a point-in-time snapshot of a Kubernetes cluster (manifests exported with `kubectl get -o yaml`) and reports unused secrets, config maps and volume claims, bare pods, floating image tags and privileged containers.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (defaults to .cluster-lint.yaml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress logging and the run report; errors and the exit status remain
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available checks
    List {
        /// Only list checks in these groups
        #[arg(long, value_delimiter = ',')]
        groups: Vec<String>,
    },

    /// Run checks against a snapshot
    Run {
        /// Manifest file or directory holding the cluster snapshot
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },
}

/// Options of `cluster-lint run`. Set values override the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct RunOptions {
    /// Checks to run (overrides group selection)
    #[arg(long, value_delimiter = ',')]
    pub checks: Vec<String>,

    /// Checks to skip
    #[arg(long, value_delimiter = ',')]
    pub exclude_checks: Vec<String>,

    /// Groups of checks to run
    #[arg(long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Groups of checks to skip
    #[arg(long, value_delimiter = ',')]
    pub exclude_groups: Vec<String>,

    /// Namespaces (glob patterns) whose diagnostics are dropped
    #[arg(long, value_delimiter = ',')]
    pub ignore_namespaces: Vec<String>,

    /// Output format (plain, json)
    #[arg(short, long, default_value = "plain")]
    pub output: OutputFormat,

    /// Lowest severity to report (error, warning, suggestion)
    #[arg(long, value_parser = parse_severity)]
    pub min_severity: Option<Severity>,

    /// Lowest severity that fails the run
    #[arg(long, value_parser = parse_severity)]
    pub failure_threshold: Option<Severity>,

    /// Always exit successfully when checks report diagnostics
    #[arg(long)]
    pub no_fail: bool,
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::parse(s)
        .ok_or_else(|| format!("unknown severity '{}' (expected error, warning or suggestion)", s))
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
