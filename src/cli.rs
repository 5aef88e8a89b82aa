//! Command-line interface definitions using clap derive API.

use crate::config::{BehaviorPolicy, Campaign, ExperimentConfig};
use crate::report::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Evaluate off-policy estimators on logged bandit feedback
#[derive(Parser, Debug)]
#[command(name = "ope-selection")]
#[command(about = "Compare DM, IPW and DR by their relative estimation error")]
#[command(version)]
pub struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run estimator selection on recorded simulator output
    Run(RunArgs),
    /// Print the JSON schema of the experiment configuration file
    Schema,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Experiment configuration (YAML)
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// Recorded ground truths (`split,ground_truth`)
    #[arg(long)]
    pub ground_truth: PathBuf,

    /// Recorded trial estimates (`split,trial,estimator,estimate`)
    #[arg(long)]
    pub estimates: PathBuf,

    /// Number of train/test splits
    #[arg(short = 'n', long)]
    pub n_splits: Option<usize>,

    /// Number of bagged trials per split
    #[arg(short = 'e', long)]
    pub n_estimators: Option<usize>,

    /// Policy that collected the logged data
    #[arg(short = 'b', long, value_enum)]
    pub behavior_policy: Option<BehaviorPolicy>,

    /// Campaign of the logged data
    #[arg(short = 'c', long, value_enum)]
    pub campaign: Option<Campaign>,

    /// Output format of the results table
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// Results table path (defaults to <log_dir>/<behavior_policy>/<campaign>/)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write per-split relative errors to this CSV file
    #[arg(long)]
    pub history: Option<PathBuf>,
}

impl RunArgs {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply(&self, cfg: &mut ExperimentConfig) {
        if let Some(n) = self.n_splits {
            cfg.n_splits = n;
        }
        if let Some(n) = self.n_estimators {
            cfg.n_estimators = n;
        }
        if let Some(b) = self.behavior_policy {
            cfg.behavior_policy = b;
        }
        if let Some(c) = self.campaign {
            cfg.campaign = c;
        }
    }
}
