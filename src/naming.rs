//! Unique output file names within one dataset directory

use std::collections::HashSet;

use crate::error::DatasetError;

/// Upper bound on suffixed candidates tried for a single name.
///
/// With `k` names already claimed at most `k + 1` candidates are ever needed,
/// so this cap is only reached by datasets with more than a million copies of
/// one file name.
pub const MAX_RENAME_ATTEMPTS: usize = 1_000_000;

/// Allocates output names, suffixing `_<n>` before the extension on collision
#[derive(Debug, Default, Clone)]
pub struct UniqueNamer {
    used: HashSet<String>,
}

impl UniqueNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Claim `name`, or the first free `stem_<n>.ext` for n = 1, 2, ...
    pub fn claim(&mut self, name: &str) -> Result<String, DatasetError> {
        if self.used.insert(name.to_string()) {
            return Ok(name.to_string());
        }

        let (stem, extension) = split_extension(name);
        for n in 1..=MAX_RENAME_ATTEMPTS {
            let candidate = format!("{stem}_{n}{extension}");
            if self.used.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        Err(DatasetError::NameExhausted(name.to_string()))
    }
}

/// Split at the last dot, keeping the dot with the extension.
/// Leading dots (hidden files) are part of the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
