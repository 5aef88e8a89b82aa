use crate::report::{AggregationTable, ReportError};
use serde_json::{Map, Value, json};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

/// Durable destination for a finished [`AggregationTable`].
pub trait ResultSink {
    fn write(&self, table: &AggregationTable, destination: &Path) -> Result<(), ReportError>;
}

/// Writes the table as a delimited text file or JSON document.
///
/// The delimited layout has one row per estimator, keyed by its lowercase
/// name, with the columns `mean`, `<level>% CI (lower)` and
/// `<level>% CI (upper)`; the header's first cell is empty. Missing parent
/// directories are created.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableWriter {
    pub format: ReportFormat,
}

impl TableWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    fn write_delimited<W: Write>(
        table: &AggregationTable,
        w: &mut W,
        delimiter: char,
    ) -> Result<(), ReportError> {
        let rows = table.rows()?;
        let level = rows
            .first()
            .map(|(_, ci)| level_label(ci.confidence_level))
            .unwrap_or_default();
        writeln!(
            w,
            "{d}mean{d}{level}% CI (lower){d}{level}% CI (upper)",
            d = delimiter
        )?;
        for (name, ci) in rows {
            writeln!(
                w,
                "{}{d}{}{d}{}{d}{}",
                name.key(),
                ci.mean,
                ci.lower_bound,
                ci.upper_bound,
                d = delimiter
            )?;
        }
        Ok(())
    }

    fn write_json<W: Write>(table: &AggregationTable, w: &mut W) -> Result<(), ReportError> {
        let mut doc = Map::new();
        for (name, ci) in table.rows()? {
            doc.insert(
                name.key().to_string(),
                json!({
                    "mean": ci.mean,
                    "lower_bound": ci.lower_bound,
                    "upper_bound": ci.upper_bound,
                    "confidence_level": ci.confidence_level,
                }),
            );
        }
        serde_json::to_writer_pretty(&mut *w, &Value::Object(doc))?;
        writeln!(w)?;
        Ok(())
    }
}

impl ResultSink for TableWriter {
    fn write(&self, table: &AggregationTable, destination: &Path) -> Result<(), ReportError> {
        // Validate before touching the filesystem.
        table.rows()?;
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut w = BufWriter::new(File::create(destination)?);
        match self.format {
            ReportFormat::Csv => Self::write_delimited(table, &mut w, ',')?,
            ReportFormat::Tsv => Self::write_delimited(table, &mut w, '\t')?,
            ReportFormat::Json => Self::write_json(table, &mut w)?,
        }
        w.flush()?;
        Ok(())
    }
}

/// `0.95 -> "95.0"`, `0.975 -> "97.5"`.
fn level_label(confidence_level: f64) -> String {
    let pct = 100.0 * confidence_level;
    if pct.fract() == 0.0 {
        format!("{pct:.1}")
    } else {
        format!("{pct}")
    }
}
