//! Dataset build orchestration
//!
//! Guards the output directory, then runs the posture and action builders
//! against one source tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::action::ActionBuilder;
use crate::config::DatasetConfig;
use crate::error::DatasetError;
use crate::posture::PostureBuilder;
use crate::tags::TagRules;

/// Default source directory when none is given
pub const DEFAULT_SOURCE_DIR: &str = "raw";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "datasets";

/// Which dataset layouts to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Posture,
    Action,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Posture, DatasetKind::Action];

    /// Subdirectory of the output root
    pub fn dir_name(self) -> &'static str {
        match self {
            DatasetKind::Posture => "posture",
            DatasetKind::Action => "action",
        }
    }
}

/// Result of building one dataset layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub kind: DatasetKind,
    pub output: PathBuf,
    /// Number of manifest directories written
    pub directories: usize,
    pub files_copied: usize,
    /// Distinct tags encountered, sorted
    pub tags: Vec<String>,
}

/// Result of a full build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub source: PathBuf,
    pub output: PathBuf,
    pub datasets: Vec<DatasetSummary>,
}

impl BuildSummary {
    pub fn files_copied(&self) -> usize {
        self.datasets.iter().map(|d| d.files_copied).sum()
    }
}

/// Builds the requested datasets from a source tree into a fresh output root
pub struct DatasetBuilder {
    rules: TagRules,
    source: PathBuf,
    output: PathBuf,
}

impl DatasetBuilder {
    pub fn new(
        config: &DatasetConfig,
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<Self, DatasetError> {
        Ok(Self {
            rules: config.compile()?,
            source: source.into(),
            output: output.into(),
        })
    }

    /// Refuses to run if the output root exists; nothing is written in that case.
    ///
    /// A build that fails part way leaves the output root behind, so the
    /// next run is refused until it is deleted.
    pub fn build(&self, kinds: &[DatasetKind]) -> Result<BuildSummary, DatasetError> {
        if self.output.exists() {
            return Err(DatasetError::OutputExists(self.output.clone()));
        }
        if !self.source.is_dir() {
            return Err(DatasetError::MissingSource(self.source.clone()));
        }

        info!(output = %self.output.display(), "Preparing data sets");
        fs::create_dir_all(&self.output).map_err(|e| DatasetError::io(&self.output, e))?;

        let mut datasets = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let out_dir = self.output.join(kind.dir_name());
            let summary = match kind {
                DatasetKind::Posture => {
                    PostureBuilder::new(&self.rules).build(&self.source, &out_dir)?
                }
                DatasetKind::Action => {
                    ActionBuilder::new(&self.rules).build(&self.source, &out_dir)?
                }
            };
            datasets.push(summary);
        }

        let summary = BuildSummary {
            source: self.source.clone(),
            output: self.output.clone(),
            datasets,
        };
        info!(files_copied = summary.files_copied(), "Done all");
        Ok(summary)
    }
}
