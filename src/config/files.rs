use crate::config::{Campaign, ConfigError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Hyperparameters of the reward regression model (`model` section of its
/// YAML file). Opaque to this crate; passed through to the simulator and
/// recorded in run metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelHyperparams(pub BTreeMap<String, serde_yaml::Value>);

impl ModelHyperparams {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct File {
            model: Option<BTreeMap<String, serde_yaml::Value>>,
        }
        let file: File = read_yaml(path)?;
        file.model
            .map(Self)
            .ok_or_else(|| ConfigError::MissingKey(format!("{}: model", path.display())))
    }

    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.0.get(key)
    }
}

/// Beta prior of a Bernoulli Thompson sampling policy, one entry per action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaPrior {
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
}

/// Production priors of the Bernoulli-TS policy per campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyPriors {
    path: PathBuf,
    by_campaign: BTreeMap<Campaign, BetaPrior>,
}

impl PolicyPriors {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            path: path.to_path_buf(),
            by_campaign: read_yaml(path)?,
        })
    }

    pub fn for_campaign(&self, campaign: Campaign) -> Result<&BetaPrior, ConfigError> {
        self.by_campaign
            .get(&campaign)
            .ok_or_else(|| ConfigError::MissingCampaign {
                file: self.path.clone(),
                campaign,
            })
    }
}

/// Production batch sizes of the Bernoulli-TS policy per campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSizes {
    path: PathBuf,
    by_campaign: BTreeMap<Campaign, usize>,
}

impl BatchSizes {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            path: path.to_path_buf(),
            by_campaign: read_yaml(path)?,
        })
    }

    pub fn for_campaign(&self, campaign: Campaign) -> Result<usize, ConfigError> {
        self.by_campaign
            .get(&campaign)
            .copied()
            .ok_or_else(|| ConfigError::MissingCampaign {
                file: self.path.clone(),
                campaign,
            })
    }
}
