use crate::config::{ExperimentConfig, ModelHyperparams, PolicySpec};
use crate::core::EstimatorName;
use crate::report::ReportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Provenance written next to the results table.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub generated_at: DateTime<Utc>,
    pub config: ExperimentConfig,
    pub counterfactual_policy: PolicySpec,
    pub hyperparams: ModelHyperparams,
    pub best_estimator: Option<EstimatorName>,
}

impl RunMetadata {
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, self)?;
        writeln!(w)?;
        w.flush()?;
        Ok(())
    }
}
