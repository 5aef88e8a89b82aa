use crate::core::EstimatorName;
use crate::report::{ReportError, SplitRecord};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFormat {
    Csv,
    Tsv,
}

/// Per-split records of one evaluation run, in split order.
#[derive(Debug, Clone, Default)]
pub struct SplitHistory {
    entries: Vec<SplitRecord>,
}

impl SplitHistory {
    pub fn push(&mut self, record: SplitRecord) {
        self.entries.push(record)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<&SplitRecord> {
        self.entries.last()
    }
    pub fn iter(&self) -> impl Iterator<Item = &SplitRecord> {
        self.entries.iter()
    }

    /// Relative errors of `estimator` across splits, in split order.
    pub fn relative_errors(&self, estimator: EstimatorName) -> Vec<f64> {
        self.entries
            .iter()
            .filter_map(|r| r.relative_errors.get(&estimator).copied())
            .collect()
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: HistoryFormat) -> Result<(), ReportError> {
        match fmt {
            HistoryFormat::Csv => self.export_with_delimiter(path, ','),
            HistoryFormat::Tsv => self.export_with_delimiter(path, '\t'),
        }
    }

    fn export_with_delimiter<P: AsRef<Path>>(
        &self,
        path: P,
        delimiter: char,
    ) -> Result<(), ReportError> {
        let mut w = BufWriter::new(File::create(path)?);
        let names: Vec<EstimatorName> = self
            .entries
            .first()
            .map(|r| r.relative_errors.keys().copied().collect())
            .unwrap_or_default();

        write!(w, "split{d}ground_truth", d = delimiter)?;
        for n in &names {
            write!(w, "{delimiter}{}_estimate", n.key())?;
        }
        for n in &names {
            write!(w, "{delimiter}{}_relative_error", n.key())?;
        }
        writeln!(w)?;

        for r in &self.entries {
            write!(w, "{}{d}{:.12}", r.split_index, r.ground_truth, d = delimiter)?;
            for n in &names {
                let v = r.estimates.get(n).copied().unwrap_or(f64::NAN);
                write!(w, "{delimiter}{v:.12}")?;
            }
            for n in &names {
                let v = r.relative_errors.get(n).copied().unwrap_or(f64::NAN);
                write!(w, "{delimiter}{v:.12}")?;
            }
            writeln!(w)?;
        }
        w.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SplitHistory {
    type Item = &'a SplitRecord;
    type IntoIter = std::slice::Iter<'a, SplitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
