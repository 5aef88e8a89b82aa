use crate::config::files::read_yaml;
use crate::config::{ConfigError, PolicyKind};
use crate::core::EstimatorName;
use crate::evaluation::BootstrapSettings;
use crate::report::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

const DEFAULT_RANDOM_STATE: u64 = 12345;
const REPORT_STEM: &str = "off_policy_estimator_selection";

fn default_n_splits() -> usize {
    1
}
fn default_n_estimators() -> usize {
    2
}
fn default_random_state() -> u64 {
    DEFAULT_RANDOM_STATE
}
fn default_estimators() -> Vec<EstimatorName> {
    EstimatorName::iter().collect()
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}
fn default_counterfactual_policies() -> BTreeMap<BehaviorPolicy, PolicyKind> {
    BTreeMap::from([
        (BehaviorPolicy::Bts, PolicyKind::Random),
        (BehaviorPolicy::Random, PolicyKind::BernoulliTs),
    ])
}

/// Policy that collected the logged feedback.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BehaviorPolicy {
    /// Bernoulli Thompson sampling.
    Bts,
    /// Uniform random.
    Random,
}

impl BehaviorPolicy {
    /// Policy family of the behavior policy itself.
    pub fn kind(self) -> PolicyKind {
        match self {
            BehaviorPolicy::Bts => PolicyKind::BernoulliTs,
            BehaviorPolicy::Random => PolicyKind::Random,
        }
    }
}

/// Campaign (item subset) of the logged dataset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Campaign {
    All,
    Men,
    Women,
}

/// Shape of the logged dataset, as reported by the dataset loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatasetConfig {
    #[schemars(title = "Actions", description = "Number of actions (items)", range(min = 1))]
    pub n_actions: usize,

    #[schemars(
        title = "List length",
        description = "Number of slots in a recommendation list",
        range(min = 1)
    )]
    pub len_list: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            n_actions: 80,
            len_list: 3,
        }
    }
}

fn default_hyperparams_path() -> PathBuf {
    PathBuf::from("./conf/lightgbm.yaml")
}
fn default_prior_path() -> PathBuf {
    PathBuf::from("./conf/prior_bts.yaml")
}
fn default_batch_size_path() -> PathBuf {
    PathBuf::from("./conf/batch_size_bts.yaml")
}

/// Auxiliary YAML files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFiles {
    #[serde(default = "default_hyperparams_path")]
    #[schemars(with = "String", title = "Model hyperparameters")]
    pub hyperparams: PathBuf,

    #[serde(default = "default_prior_path")]
    #[schemars(with = "String", title = "Bernoulli-TS priors")]
    pub prior_bts: PathBuf,

    #[serde(default = "default_batch_size_path")]
    #[schemars(with = "String", title = "Bernoulli-TS batch sizes")]
    pub batch_size_bts: PathBuf,
}

impl Default for ConfigFiles {
    fn default() -> Self {
        Self {
            hyperparams: default_hyperparams_path(),
            prior_bts: default_prior_path(),
            batch_size_bts: default_batch_size_path(),
        }
    }
}

impl ConfigFiles {
    /// Resolves relative paths against `base`.
    pub fn relative_to(&self, base: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        Self {
            hyperparams: join(&self.hyperparams),
            prior_bts: join(&self.prior_bts),
            batch_size_bts: join(&self.batch_size_bts),
        }
    }
}

/// Everything one estimator-selection run needs, built once at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExperimentConfig {
    #[serde(default = "default_n_splits")]
    #[schemars(
        title = "Splits",
        description = "Number of train/test splits",
        range(min = 1),
        default = "default_n_splits"
    )]
    pub n_splits: usize,

    #[serde(default = "default_n_estimators")]
    #[schemars(
        title = "Bagged trials",
        description = "Bootstrap samples of the training data per split",
        range(min = 1),
        default = "default_n_estimators"
    )]
    pub n_estimators: usize,

    #[schemars(title = "Behavior policy")]
    pub behavior_policy: BehaviorPolicy,

    #[schemars(title = "Campaign")]
    pub campaign: Campaign,

    #[serde(default = "default_random_state")]
    #[schemars(title = "Random state", default = "default_random_state")]
    pub random_state: u64,

    #[serde(default = "default_estimators")]
    #[schemars(title = "Estimators", default = "default_estimators")]
    pub estimators: Vec<EstimatorName>,

    #[serde(default)]
    pub bootstrap: BootstrapSettings,

    #[serde(default = "default_log_dir")]
    #[schemars(with = "String", title = "Log directory", default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub files: ConfigFiles,

    /// Counterfactual policy evaluated for each behavior policy.
    #[serde(default = "default_counterfactual_policies")]
    #[schemars(title = "Counterfactual policies")]
    pub counterfactual_policies: BTreeMap<BehaviorPolicy, PolicyKind>,
}

impl ExperimentConfig {
    pub fn new(behavior_policy: BehaviorPolicy, campaign: Campaign) -> Self {
        Self {
            n_splits: default_n_splits(),
            n_estimators: default_n_estimators(),
            behavior_policy,
            campaign,
            random_state: default_random_state(),
            estimators: default_estimators(),
            bootstrap: BootstrapSettings::default(),
            log_dir: default_log_dir(),
            dataset: DatasetConfig::default(),
            files: ConfigFiles::default(),
            counterfactual_policies: default_counterfactual_policies(),
        }
    }

    /// Reads and validates a YAML experiment file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg: Self = read_yaml(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_splits == 0 {
            return Err(ConfigError::Invalid("n_splits must be > 0".into()));
        }
        if self.n_estimators == 0 {
            return Err(ConfigError::Invalid("n_estimators must be > 0".into()));
        }
        if self.estimators.is_empty() {
            return Err(ConfigError::Invalid("estimators must not be empty".into()));
        }
        if self.dataset.n_actions == 0 || self.dataset.len_list == 0 {
            return Err(ConfigError::Invalid(
                "dataset.n_actions and dataset.len_list must be > 0".into(),
            ));
        }
        if self.dataset.len_list > self.dataset.n_actions {
            return Err(ConfigError::Invalid(format!(
                "dataset.len_list ({}) exceeds dataset.n_actions ({})",
                self.dataset.len_list, self.dataset.n_actions
            )));
        }
        self.bootstrap
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("bootstrap: {e}")))?;
        Ok(())
    }

    /// Counterfactual policy configured for the behavior policy.
    ///
    /// The mapping is used verbatim; nothing is inferred when it looks odd.
    pub fn counterfactual_policy(&self) -> Result<PolicyKind, ConfigError> {
        self.counterfactual_policies
            .get(&self.behavior_policy)
            .copied()
            .ok_or_else(|| {
                ConfigError::MissingKey(format!(
                    "counterfactual_policies.{}",
                    self.behavior_policy
                ))
            })
    }

    /// `<log_dir>/<behavior_policy>/<campaign>/off_policy_estimator_selection.<ext>`
    pub fn output_path(&self, format: ReportFormat) -> PathBuf {
        let ext = match format {
            ReportFormat::Csv => "csv",
            ReportFormat::Tsv => "tsv",
            ReportFormat::Json => "json",
        };
        self.log_dir
            .join(self.behavior_policy.to_string())
            .join(self.campaign.to_string())
            .join(format!("{REPORT_STEM}.{ext}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn minimal_file_applies_defaults() {
        let f = yaml_file("behavior_policy: random\ncampaign: men\n");
        let cfg = ExperimentConfig::load(f.path()).unwrap();
        assert_eq!(cfg, ExperimentConfig::new(BehaviorPolicy::Random, Campaign::Men));
        assert_eq!(cfg.n_splits, 1);
        assert_eq!(cfg.n_estimators, 2);
        assert_eq!(cfg.random_state, 12345);
        assert_eq!(
            cfg.estimators,
            vec![EstimatorName::Dm, EstimatorName::Ipw, EstimatorName::Dr]
        );
        assert_eq!(cfg.bootstrap, BootstrapSettings::default());
    }

    #[test]
    fn full_file_is_read() {
        let f = yaml_file(
            "\
n_splits: 30
n_estimators: 5
behavior_policy: bts
campaign: women
random_state: 7
estimators: [dr, dm]
bootstrap:
  n_resamples: 500
  confidence_level: 0.9
log_dir: /tmp/ope
dataset:
  n_actions: 34
  len_list: 3
files:
  prior_bts: priors.yaml
counterfactual_policies:
  bts: bernoulli-ts
",
        );
        let cfg = ExperimentConfig::load(f.path()).unwrap();
        assert_eq!(cfg.n_splits, 30);
        assert_eq!(cfg.n_estimators, 5);
        assert_eq!(cfg.campaign, Campaign::Women);
        assert_eq!(cfg.estimators, vec![EstimatorName::Dr, EstimatorName::Dm]);
        assert_eq!(cfg.bootstrap.n_resamples, 500);
        assert_eq!(cfg.dataset.n_actions, 34);
        assert_eq!(cfg.files.prior_bts, PathBuf::from("priors.yaml"));
        assert_eq!(cfg.files.hyperparams, PathBuf::from("./conf/lightgbm.yaml"));
        assert_eq!(cfg.counterfactual_policy().unwrap(), PolicyKind::BernoulliTs);
    }

    #[test]
    fn default_mapping_is_kept_as_recorded() {
        let bts = ExperimentConfig::new(BehaviorPolicy::Bts, Campaign::All);
        assert_eq!(bts.counterfactual_policy().unwrap(), PolicyKind::Random);
        let random = ExperimentConfig::new(BehaviorPolicy::Random, Campaign::All);
        assert_eq!(random.counterfactual_policy().unwrap(), PolicyKind::BernoulliTs);
    }

    #[test]
    fn unmapped_behavior_policy_is_reported() {
        let mut cfg = ExperimentConfig::new(BehaviorPolicy::Random, Campaign::All);
        cfg.counterfactual_policies.remove(&BehaviorPolicy::Random);
        assert!(matches!(
            cfg.counterfactual_policy().unwrap_err(),
            ConfigError::MissingKey(_)
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let base = ExperimentConfig::new(BehaviorPolicy::Bts, Campaign::All);
        let mut cases = Vec::new();

        let mut c = base.clone();
        c.n_splits = 0;
        cases.push(c);
        let mut c = base.clone();
        c.n_estimators = 0;
        cases.push(c);
        let mut c = base.clone();
        c.estimators.clear();
        cases.push(c);
        let mut c = base.clone();
        c.dataset.len_list = 100;
        cases.push(c);
        let mut c = base.clone();
        c.bootstrap.confidence_level = 1.2;
        cases.push(c);

        for c in cases {
            assert!(matches!(c.validate().unwrap_err(), ConfigError::Invalid(_)), "{c:?}");
        }
        assert!(base.validate().is_ok());
    }

    #[test]
    fn unknown_campaign_is_a_parse_error() {
        let f = yaml_file("behavior_policy: bts\ncampaign: kids\n");
        assert!(matches!(
            ExperimentConfig::load(f.path()).unwrap_err(),
            ConfigError::Yaml { .. }
        ));
    }

    #[test]
    fn output_path_layout() {
        let cfg = ExperimentConfig::new(BehaviorPolicy::Bts, Campaign::Women);
        assert_eq!(
            cfg.output_path(ReportFormat::Csv),
            PathBuf::from("./logs/bts/women/off_policy_estimator_selection.csv")
        );
        assert!(
            cfg.output_path(ReportFormat::Json)
                .to_string_lossy()
                .ends_with(".json")
        );
    }

    #[test]
    fn files_resolve_relative_to_base() {
        let files = ConfigFiles {
            hyperparams: PathBuf::from("/abs/lightgbm.yaml"),
            ..ConfigFiles::default()
        };
        let resolved = files.relative_to(Path::new("/work"));
        assert_eq!(resolved.hyperparams, PathBuf::from("/abs/lightgbm.yaml"));
        assert_eq!(resolved.prior_bts, PathBuf::from("/work/./conf/prior_bts.yaml"));
    }

    #[test]
    fn enums_parse_from_cli_strings() {
        assert_eq!(BehaviorPolicy::from_str("bts").unwrap(), BehaviorPolicy::Bts);
        assert_eq!(Campaign::from_str("women").unwrap(), Campaign::Women);
        assert_eq!(Campaign::Men.to_string(), "men");
        assert_eq!(BehaviorPolicy::Bts.kind(), PolicyKind::BernoulliTs);
    }
}
