use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Off-policy estimator whose relative error is being compared.
///
/// Only used as a key. Serialized lowercase (`dm`, `ipw`, `dr`) and
/// displayed uppercase (`DM`, `IPW`, `DR`).
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
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum EstimatorName {
    /// Direct method.
    #[strum(serialize = "dm", to_string = "DM")]
    Dm,
    /// Inverse probability weighting.
    #[strum(serialize = "ipw", to_string = "IPW")]
    Ipw,
    /// Doubly robust.
    #[strum(serialize = "dr", to_string = "DR")]
    Dr,
}

impl EstimatorName {
    /// Lowercase key used in files (`dm`, `ipw`, `dr`).
    pub fn key(self) -> &'static str {
        match self {
            EstimatorName::Dm => "dm",
            EstimatorName::Ipw => "ipw",
            EstimatorName::Dr => "dr",
        }
    }
}

/// Policy-value estimates keyed by estimator, as returned by one trial.
pub type EstimateSet = BTreeMap<EstimatorName, f64>;
