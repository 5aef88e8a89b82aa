//! Entry point of the `ope-selection` command.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use ope_selection::cli::{Cli, Commands, RunArgs};
use ope_selection::config::{ExperimentConfig, ModelHyperparams, PolicyContext};
use ope_selection::replay::{RecordedSplits, RecordedTrials};
use ope_selection::report::{HistoryFormat, ResultSink, RunMetadata, TableWriter};
use ope_selection::tasks::EstimatorSelection;
use ope_selection::telemetry;
use std::path::Path;
use tracing::{info, warn};

const METADATA_FILE: &str = "run_metadata.json";

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Schema => {
            let schema = schemars::schema_for!(ExperimentConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let (mut cfg, base) = match &args.config {
        Some(path) => {
            let cfg = ExperimentConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            (cfg, base)
        }
        None => {
            let (Some(b), Some(c)) = (args.behavior_policy, args.campaign) else {
                bail!("--behavior-policy and --campaign are required without --config");
            };
            (ExperimentConfig::new(b, c), Path::new(".").to_path_buf())
        }
    };
    args.apply(&mut cfg);
    cfg.validate().context("invalid experiment configuration")?;
    let files = cfg.files.relative_to(&base);

    let hyperparams = if files.hyperparams.exists() {
        ModelHyperparams::load(&files.hyperparams)?
    } else {
        warn!(
            "hyperparameter file {} not found, recording none",
            files.hyperparams.display()
        );
        ModelHyperparams::default()
    };

    let counterfactual = cfg.counterfactual_policy()?;
    if counterfactual == cfg.behavior_policy.kind() {
        warn!(
            "counterfactual policy {counterfactual} is the same family as behavior policy {}",
            cfg.behavior_policy
        );
    }
    let policy = counterfactual
        .build(
            &PolicyContext {
                n_actions: cfg.dataset.n_actions,
                len_list: cfg.dataset.len_list,
                random_state: cfg.random_state,
                campaign: cfg.campaign,
            },
            &files,
        )
        .with_context(|| format!("building {counterfactual} policy"))?;

    info!(
        behavior_policy = %cfg.behavior_policy,
        campaign = %cfg.campaign,
        counterfactual = %counterfactual,
        n_splits = cfg.n_splits,
        n_estimators = cfg.n_estimators,
        "starting estimator selection"
    );

    let splits = RecordedSplits::from_csv(&args.ground_truth)
        .with_context(|| format!("reading {}", args.ground_truth.display()))?;
    let trials = RecordedTrials::from_csv(&args.estimates)
        .with_context(|| format!("reading {}", args.estimates.display()))?;

    let mut selection = EstimatorSelection::new(
        splits,
        trials,
        cfg.estimators.iter().copied(),
        cfg.n_splits,
        cfg.n_estimators,
        cfg.bootstrap,
        cfg.random_state,
    )?;
    let table = selection.run()?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| cfg.output_path(args.format));
    TableWriter::new(args.format)
        .write(&table, &output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("results written to {}", output.display());

    if let Some(history) = &args.history {
        selection
            .history()
            .export(history, HistoryFormat::Csv)
            .with_context(|| format!("writing {}", history.display()))?;
    }

    let best = table.best();
    if let Some((name, ci)) = &best {
        info!(
            "lowest mean relative error: {name} ({:.6}, [{:.6}, {:.6}])",
            ci.mean, ci.lower_bound, ci.upper_bound
        );
    }

    let metadata_path = output
        .parent()
        .unwrap_or(Path::new("."))
        .join(METADATA_FILE);
    RunMetadata {
        generated_at: Utc::now(),
        config: cfg,
        counterfactual_policy: policy,
        hyperparams,
        best_estimator: best.map(|(name, _)| name),
    }
    .write(&metadata_path)
    .with_context(|| format!("writing {}", metadata_path.display()))?;

    Ok(())
}
