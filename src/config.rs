//! Dataset configuration
//!
//! Tag tables that drive classification. The defaults match the recording
//! sessions this tool was written for; a JSON file with the same shape can
//! override any field.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conflict::ConflictPolicy;
use crate::error::DatasetError;
use crate::tags::TagRules;

/// Label added when any path component matches one of `patterns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTag {
    pub tag: String,
    pub patterns: Vec<String>,
}

/// Complete configuration for dataset preparation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Major classes for the posture dataset (default: sitting, standing)
    pub posture_tags: Vec<String>,
    /// Direction folders that mark an action experiment (default: up, down)
    pub action_tags: Vec<String>,
    /// Labels implied by a major class (default: chair for both postures)
    pub associated_tags: BTreeMap<String, Vec<String>>,
    /// Labels inferred from folder names (default: table for `.*masa.*`)
    pub extra_tags: Vec<ExtraTag>,
    /// Precedence for same-name files under different action tags
    pub conflicts: ConflictPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let mut associated_tags = BTreeMap::new();
        associated_tags.insert("sitting".to_string(), vec!["chair".to_string()]);
        associated_tags.insert("standing".to_string(), vec!["chair".to_string()]);

        Self {
            posture_tags: vec!["sitting".to_string(), "standing".to_string()],
            action_tags: vec!["up".to_string(), "down".to_string()],
            associated_tags,
            extra_tags: vec![ExtraTag {
                tag: "table".to_string(),
                patterns: vec![".*masa.*".to_string()],
            }],
            conflicts: ConflictPolicy::default(),
        }
    }
}

impl DatasetConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let json = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, DatasetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the tables and compile the extra-tag patterns
    pub fn compile(&self) -> Result<TagRules, DatasetError> {
        if self.posture_tags.is_empty() && self.action_tags.is_empty() {
            return Err(DatasetError::InvalidConfig(
                "at least one posture or action tag is required".to_string(),
            ));
        }
        if let Some(tag) = self
            .posture_tags
            .iter()
            .chain(self.action_tags.iter())
            .find(|t| t.is_empty() || t.contains(['/', '\\']))
        {
            return Err(DatasetError::InvalidConfig(format!(
                "tag '{tag}' is not a valid directory name"
            )));
        }
        TagRules::compile(self)
    }
}
