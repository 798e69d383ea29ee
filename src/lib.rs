//! Mocap Datasets - labeled dataset preparation for raw motion-capture sequences
//!
//! Raw recordings are trees of folders whose names carry the labels
//! (`sitting`, `standing`, `up`, `down`, ...) and whose leaf folders hold
//! frames named by timestamp. This crate reorganizes such trees into flat,
//! labeled datasets and reports statistics over the raw sequences.
//!
//! ## Modules
//!
//! - **Dataset Builder**: posture and action layouts with `info` manifests
//! - **Stats Reporter**: per-class sequence counts, frame counts and durations

pub mod action;
pub mod builder;
pub mod config;
pub mod conflict;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod posture;
pub mod stats;
pub mod table;
pub mod tags;
pub mod walk;

pub use builder::{BuildSummary, DatasetBuilder, DatasetKind, DatasetSummary};
pub use config::{DatasetConfig, ExtraTag};
pub use conflict::{ConflictPolicy, PrecedenceRule, Resolution};
pub use error::DatasetError;
pub use manifest::{DatasetEntry, Manifest, MANIFEST_FILE_NAME};
pub use stats::{StatsReport, StatsTable};

/// Crate version reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
