//! Dataset entries and the `info` manifest format
//!
//! A manifest is a flat text file with one line per output file:
//! `filename,tag1,tag2,...`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::DatasetError;

/// File name of the manifest written into every dataset directory
pub const MANIFEST_FILE_NAME: &str = "info";

/// A planned copy: output name, source file and its labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetEntry {
    pub name: String,
    pub source: PathBuf,
    pub tags: Vec<String>,
}

impl DatasetEntry {
    /// Manifest line without the trailing newline
    pub fn manifest_line(&self) -> String {
        let mut line = self.name.clone();
        for tag in &self.tags {
            line.push(',');
            line.push_str(tag);
        }
        line
    }
}

/// One parsed manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub name: String,
    pub tags: Vec<String>,
}

/// Ordered list of entries for one output directory
#[derive(Debug, Default, Clone)]
pub struct Manifest {
    entries: Vec<DatasetEntry>,
}

impl From<Vec<DatasetEntry>> for Manifest {
    fn from(entries: Vec<DatasetEntry>) -> Self {
        Self { entries }
    }
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: DatasetEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sort_by_name(&mut self) {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Copy every entry into `dir` under its output name and write the
    /// manifest alongside. Returns the number of files copied.
    pub fn materialize(&self, dir: &Path) -> Result<usize, DatasetError> {
        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        let file = File::create(&manifest_path).map_err(|e| DatasetError::io(&manifest_path, e))?;
        let mut out = BufWriter::new(file);

        for entry in &self.entries {
            let target = dir.join(&entry.name);
            fs::copy(&entry.source, &target).map_err(|e| DatasetError::io(&entry.source, e))?;
            writeln!(out, "{}", entry.manifest_line())
                .map_err(|e| DatasetError::io(&manifest_path, e))?;
        }

        out.flush().map_err(|e| DatasetError::io(&manifest_path, e))?;
        Ok(self.entries.len())
    }

    /// Parse a manifest file written by [`Manifest::materialize`]
    pub fn read(path: &Path) -> Result<Vec<ManifestRecord>, DatasetError> {
        let content = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let mut fields = line.split(',');
                let name = fields.next().unwrap_or_default().to_string();
                ManifestRecord {
                    name,
                    tags: fields.map(str::to_string).collect(),
                }
            })
            .collect())
    }
}
