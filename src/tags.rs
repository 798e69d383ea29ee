//! Tag inference from directory naming conventions

use std::path::{Component, Path};

use regex::Regex;

use crate::config::DatasetConfig;
use crate::conflict::ConflictPolicy;
use crate::error::DatasetError;

/// Compiled, read-only view of a [`DatasetConfig`]
#[derive(Debug, Clone)]
pub struct TagRules {
    config: DatasetConfig,
    extra: Vec<(String, Vec<Regex>)>,
}

impl TagRules {
    pub(crate) fn compile(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let mut extra = Vec::with_capacity(config.extra_tags.len());
        for extra_tag in &config.extra_tags {
            let mut regexes = Vec::with_capacity(extra_tag.patterns.len());
            for pattern in &extra_tag.patterns {
                // Anchored at the start of the component only
                let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                    DatasetError::InvalidRegex {
                        tag: extra_tag.tag.clone(),
                        pattern: pattern.clone(),
                        source,
                    }
                })?;
                regexes.push(regex);
            }
            extra.push((extra_tag.tag.clone(), regexes));
        }

        Ok(Self {
            config: config.clone(),
            extra,
        })
    }

    pub fn posture_tags(&self) -> &[String] {
        &self.config.posture_tags
    }

    pub fn action_tags(&self) -> &[String] {
        &self.config.action_tags
    }

    pub fn conflicts(&self) -> &ConflictPolicy {
        &self.config.conflicts
    }

    /// Major tag followed by its associated tags
    pub fn default_tags(&self, major: &str) -> Vec<String> {
        let mut tags = vec![major.to_string()];
        if let Some(associated) = self.config.associated_tags.get(major) {
            tags.extend(associated.iter().cloned());
        }
        tags
    }

    /// Extra tags whose patterns match any component of `path`
    pub fn extra_tags(&self, path: &Path) -> Vec<String> {
        let components = path_components(path);
        self.extra
            .iter()
            .filter(|(_, regexes)| {
                regexes
                    .iter()
                    .any(|re| components.iter().any(|c| re.is_match(c)))
            })
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// Full tag list for a folder classified under `major`
    pub fn folder_tags(&self, major: &str, folder: &Path) -> Vec<String> {
        let mut tags = self.default_tags(major);
        tags.extend(self.extra_tags(folder));
        tags
    }
}

/// Whether the last component of `dir` names `tag`, ignoring case
pub fn is_tag_dir(dir: &Path, tag: &str) -> bool {
    dir.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_lowercase() == tag.to_lowercase())
        .unwrap_or(false)
}

/// Action tag of a file: the experiment's direct child it descends from.
///
/// Returns `None` when the file lies directly in the experiment folder or
/// outside it.
pub fn action_tag(experiment: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(experiment).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    components.next()?;
    match first {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}

fn path_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
