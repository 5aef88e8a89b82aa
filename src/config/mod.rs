mod error;
mod experiment;
mod files;
mod policy;

pub use error::ConfigError;
pub use experiment::{BehaviorPolicy, Campaign, ConfigFiles, DatasetConfig, ExperimentConfig};
pub use files::{BatchSizes, BetaPrior, ModelHyperparams, PolicyPriors};
pub use policy::{BernoulliTsPolicy, PolicyContext, PolicyKind, PolicySpec, RandomPolicy};
