use crate::replay::ReplayError;
use crate::utils::file_parsing::{is_skippable, split_fields};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Comma-separated file with a header row. Blank lines and `#` comments are
/// ignored.
pub(crate) struct CsvTable {
    path: PathBuf,
    columns: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl CsvTable {
    pub(crate) fn read(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    pub(crate) fn parse(path: &Path, text: &str) -> Result<Self, ReplayError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !is_skippable(l));

        let Some((_, header)) = lines.next() else {
            return Err(ReplayError::Parse {
                path: path.to_path_buf(),
                line: 0,
                reason: "missing header row".into(),
            });
        };
        let columns: Vec<String> = split_fields(header, ',')
            .into_iter()
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let mut rows = Vec::new();
        for (line, raw) in lines {
            let fields = split_fields(raw, ',');
            if fields.len() != columns.len() {
                return Err(ReplayError::Parse {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("expected {} fields, found {}", columns.len(), fields.len()),
                });
            }
            rows.push((line, fields));
        }

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            rows,
        })
    }

    pub(crate) fn column(&self, name: &str) -> Result<usize, ReplayError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ReplayError::Parse {
                path: self.path.clone(),
                line: 1,
                reason: format!("missing column '{name}'"),
            })
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows.iter().map(|(l, f)| (*l, f.as_slice()))
    }

    pub(crate) fn parse_error(&self, line: usize, reason: String) -> ReplayError {
        ReplayError::Parse {
            path: self.path.clone(),
            line,
            reason,
        }
    }

    pub(crate) fn field<T: FromStr>(
        &self,
        line: usize,
        fields: &[String],
        column: usize,
    ) -> Result<T, ReplayError> {
        let raw = &fields[column];
        raw.parse().map_err(|_| {
            self.parse_error(
                line,
                format!("cannot parse '{raw}' in column '{}'", self.columns[column]),
            )
        })
    }
}
