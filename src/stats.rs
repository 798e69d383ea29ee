//! Raw sequence statistics
//!
//! Every directory without subdirectories is one recorded sequence. Its class
//! is the name of its parent directory and its files are named
//! `<timestamp>.<ext>`. Measures per class:
//!
//! - number of sequences
//! - mean and population std. dev. of frames per sequence
//! - mean and population std. dev. of elapsed time per sequence

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::DatasetError;
use crate::walk;

/// Label of the totals row
pub const TOTAL_LABEL: &str = "T O T A L";

/// One sequence folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceSample {
    pub path: PathBuf,
    pub class: String,
    pub frames: usize,
    /// Max timestamp minus min timestamp, 0 for fewer than two files
    pub span: u64,
}

impl SequenceSample {
    /// Read a sequence folder. Fails on any file whose stem is not an integer.
    pub fn read(dir: &Path) -> Result<Self, DatasetError> {
        let files = walk::list_files(dir)?;

        let mut min: Option<i64> = None;
        let mut max: Option<i64> = None;
        for name in &files {
            let timestamp = parse_timestamp(name)
                .ok_or_else(|| DatasetError::InvalidTimestamp(dir.join(name)))?;
            min = Some(min.map_or(timestamp, |m| m.min(timestamp)));
            max = Some(max.map_or(timestamp, |m| m.max(timestamp)));
        }

        let span = match (min, max) {
            (Some(min), Some(max)) => max.abs_diff(min),
            _ => {
                warn!(dir = %dir.display(), "Empty sequence folder");
                0
            }
        };

        Ok(Self {
            path: dir.to_path_buf(),
            class: class_of(dir),
            frames: files.len(),
            span,
        })
    }
}

/// Timestamp encoded in a file name: everything before the first dot
pub fn parse_timestamp(file_name: &str) -> Option<i64> {
    let stem = file_name.split('.').next().unwrap_or_default();
    stem.trim().parse().ok()
}

fn class_of(dir: &Path) -> String {
    match dir.parent() {
        Some(parent) => parent
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| parent.display().to_string()),
        None => String::new(),
    }
}

/// Accumulated samples for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStats {
    pub class: String,
    pub frame_counts: Vec<usize>,
    pub spans: Vec<u64>,
}

impl ClassStats {
    fn new(class: String) -> Self {
        Self {
            class,
            frame_counts: Vec::new(),
            spans: Vec::new(),
        }
    }

    pub fn sequences(&self) -> usize {
        self.frame_counts.len()
    }

    pub fn mean_frames(&self) -> f64 {
        mean(&self.frames_f64())
    }

    pub fn std_frames(&self) -> f64 {
        population_std(&self.frames_f64())
    }

    pub fn mean_span(&self) -> f64 {
        mean(&self.spans_f64())
    }

    pub fn std_span(&self) -> f64 {
        population_std(&self.spans_f64())
    }

    fn frames_f64(&self) -> Vec<f64> {
        self.frame_counts.iter().map(|&c| c as f64).collect()
    }

    fn spans_f64(&self) -> Vec<f64> {
        self.spans.iter().map(|&s| s as f64).collect()
    }
}

/// Arithmetic mean, 0 for no values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor N), 0 for no values
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// One rendered class row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRow {
    /// Upper-cased class name
    pub tag: String,
    pub sequences: usize,
    pub mean_frames: f64,
    pub std_frames: f64,
    pub mean_time_ms: u64,
    pub std_time_ms: u64,
}

/// Per-class rows plus the total sequence count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    pub rows: Vec<StatsRow>,
    pub total_sequences: usize,
}

/// Statistics over every sequence found under a set of roots
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    /// Classes in first-seen order
    pub classes: Vec<ClassStats>,
}

impl StatsReport {
    /// Walk every root and accumulate its leaf folders
    pub fn collect<P: AsRef<Path>>(roots: &[P]) -> Result<Self, DatasetError> {
        let mut report = Self::default();
        for root in roots {
            for dir in walk::leaf_dirs(root.as_ref())? {
                let sample = SequenceSample::read(&dir)?;
                debug!(
                    dir = %dir.display(),
                    class = %sample.class,
                    frames = sample.frames,
                    span = sample.span,
                    "Sequence"
                );
                report.add(sample);
            }
        }
        Ok(report)
    }

    pub fn add(&mut self, sample: SequenceSample) {
        let idx = match self.classes.iter().position(|c| c.class == sample.class) {
            Some(idx) => idx,
            None => {
                self.classes.push(ClassStats::new(sample.class.clone()));
                self.classes.len() - 1
            }
        };
        let class = &mut self.classes[idx];
        class.frame_counts.push(sample.frames);
        class.spans.push(sample.span);
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn total_sequences(&self) -> usize {
        self.classes.iter().map(|c| c.sequences()).sum()
    }

    pub fn class(&self, name: &str) -> Option<&ClassStats> {
        self.classes.iter().find(|c| c.class == name)
    }

    /// Rows ready for rendering
    pub fn table(&self) -> StatsTable {
        let rows = self
            .classes
            .iter()
            .map(|c| StatsRow {
                tag: c.class.to_uppercase(),
                sequences: c.sequences(),
                mean_frames: round2(c.mean_frames()),
                std_frames: round2(c.std_frames()),
                mean_time_ms: c.mean_span().round() as u64,
                std_time_ms: c.std_span().round() as u64,
            })
            .collect();

        StatsTable {
            rows,
            total_sequences: self.total_sequences(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
