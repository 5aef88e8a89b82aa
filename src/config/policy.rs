use crate::config::{BatchSizes, Campaign, ConfigError, ConfigFiles, PolicyPriors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Family of counterfactual policy to evaluate.
///
/// Each variant has its own construction path in [`PolicyKind::build`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PolicyKind {
    /// Uniformly random slate policy.
    Random,
    /// Bernoulli Thompson sampling with production priors and batch size.
    BernoulliTs,
}

/// Dataset-derived parameters every policy receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyContext {
    pub n_actions: usize,
    pub len_list: usize,
    pub random_state: u64,
    pub campaign: Campaign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RandomPolicy {
    pub n_actions: usize,
    pub len_list: usize,
    pub random_state: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BernoulliTsPolicy {
    pub n_actions: usize,
    pub len_list: usize,
    pub random_state: u64,
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
    pub batch_size: usize,
}

/// Fully parameterised counterfactual policy, handed to the simulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum PolicySpec {
    Random(RandomPolicy),
    BernoulliTs(BernoulliTsPolicy),
}

impl PolicySpec {
    pub fn kind(&self) -> PolicyKind {
        match self {
            PolicySpec::Random(_) => PolicyKind::Random,
            PolicySpec::BernoulliTs(_) => PolicyKind::BernoulliTs,
        }
    }
}

impl PolicyKind {
    /// Builds the policy parameters. Only Bernoulli-TS reads the prior and
    /// batch-size files.
    pub fn build(self, ctx: &PolicyContext, files: &ConfigFiles) -> Result<PolicySpec, ConfigError> {
        match self {
            PolicyKind::Random => Ok(PolicySpec::Random(build_random(ctx))),
            PolicyKind::BernoulliTs => {
                let priors = PolicyPriors::load(&files.prior_bts)?;
                let batch_sizes = BatchSizes::load(&files.batch_size_bts)?;
                build_bernoulli_ts(ctx, &priors, &batch_sizes).map(PolicySpec::BernoulliTs)
            }
        }
    }
}

fn build_random(ctx: &PolicyContext) -> RandomPolicy {
    RandomPolicy {
        n_actions: ctx.n_actions,
        len_list: ctx.len_list,
        random_state: ctx.random_state,
    }
}

fn build_bernoulli_ts(
    ctx: &PolicyContext,
    priors: &PolicyPriors,
    batch_sizes: &BatchSizes,
) -> Result<BernoulliTsPolicy, ConfigError> {
    let prior = priors.for_campaign(ctx.campaign)?;
    if prior.alpha.len() != ctx.n_actions || prior.beta.len() != ctx.n_actions {
        return Err(ConfigError::Invalid(format!(
            "prior for campaign {} has {} alpha / {} beta values, expected {}",
            ctx.campaign,
            prior.alpha.len(),
            prior.beta.len(),
            ctx.n_actions
        )));
    }
    if let Some(bad) = prior.alpha.iter().chain(&prior.beta).find(|v| !(**v > 0.0)) {
        return Err(ConfigError::Invalid(format!(
            "prior parameters must be positive, got {bad}"
        )));
    }
    let batch_size = batch_sizes.for_campaign(ctx.campaign)?;
    if batch_size == 0 {
        return Err(ConfigError::Invalid("batch_size must be > 0".into()));
    }
    Ok(BernoulliTsPolicy {
        n_actions: ctx.n_actions,
        len_list: ctx.len_list,
        random_state: ctx.random_state,
        alpha: prior.alpha.clone(),
        beta: prior.beta.clone(),
        batch_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn ctx(campaign: Campaign) -> PolicyContext {
        PolicyContext {
            n_actions: 2,
            len_list: 1,
            random_state: 12345,
            campaign,
        }
    }

    fn conf_dir(prior: &str, batch: &str) -> (TempDir, ConfigFiles) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("prior_bts.yaml"), prior).unwrap();
        fs::write(dir.path().join("batch_size_bts.yaml"), batch).unwrap();
        let files = ConfigFiles {
            hyperparams: dir.path().join("lightgbm.yaml"),
            prior_bts: dir.path().join("prior_bts.yaml"),
            batch_size_bts: dir.path().join("batch_size_bts.yaml"),
        };
        (dir, files)
    }

    #[test]
    fn random_needs_no_files() {
        let files = ConfigFiles {
            hyperparams: PathBuf::from("/missing/a.yaml"),
            prior_bts: PathBuf::from("/missing/b.yaml"),
            batch_size_bts: PathBuf::from("/missing/c.yaml"),
        };
        let spec = PolicyKind::Random.build(&ctx(Campaign::All), &files).unwrap();
        assert_eq!(
            spec,
            PolicySpec::Random(RandomPolicy {
                n_actions: 2,
                len_list: 1,
                random_state: 12345
            })
        );
        assert_eq!(spec.kind(), PolicyKind::Random);
    }

    #[test]
    fn bernoulli_ts_reads_campaign_prior_and_batch_size() {
        let (_dir, files) = conf_dir(
            "men:\n  alpha: [1.5, 2.5]\n  beta: [10.0, 20.0]\n",
            "men: 1000\n",
        );
        let spec = PolicyKind::BernoulliTs.build(&ctx(Campaign::Men), &files).unwrap();
        match spec {
            PolicySpec::BernoulliTs(p) => {
                assert_eq!(p.alpha, vec![1.5, 2.5]);
                assert_eq!(p.beta, vec![10.0, 20.0]);
                assert_eq!(p.batch_size, 1000);
                assert_eq!(p.random_state, 12345);
            }
            other => panic!("unexpected spec {other:?}"),
        }
    }

    #[test]
    fn bernoulli_ts_without_campaign_fails() {
        let (_dir, files) = conf_dir("men:\n  alpha: [1.0, 1.0]\n  beta: [1.0, 1.0]\n", "men: 10\n");
        let err = PolicyKind::BernoulliTs
            .build(&ctx(Campaign::Women), &files)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCampaign {
                campaign: Campaign::Women,
                ..
            }
        ));
    }

    #[test]
    fn bernoulli_ts_rejects_prior_of_wrong_length() {
        let (_dir, files) = conf_dir("all:\n  alpha: [1.0]\n  beta: [1.0]\n", "all: 10\n");
        let err = PolicyKind::BernoulliTs
            .build(&ctx(Campaign::All), &files)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn spec_serializes_with_policy_tag() {
        let spec = PolicySpec::Random(RandomPolicy {
            n_actions: 3,
            len_list: 2,
            random_state: 1,
        });
        let v = serde_json::to_value(&spec).unwrap();
        assert_eq!(v["policy"], "random");
        assert_eq!(v["n_actions"], 3);
        assert_eq!(PolicyKind::BernoulliTs.to_string(), "bernoulli-ts");
    }
}
