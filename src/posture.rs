//! Posture dataset
//!
//! Every file below a directory named after a posture tag is copied into one
//! flat directory and labeled with the posture, its associated tags and any
//! extra tags inferred from the folder path.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::builder::{DatasetKind, DatasetSummary};
use crate::error::DatasetError;
use crate::manifest::{DatasetEntry, Manifest};
use crate::naming::UniqueNamer;
use crate::tags::{is_tag_dir, TagRules};
use crate::walk;

/// Builds the posture dataset from a raw tree
pub struct PostureBuilder<'a> {
    rules: &'a TagRules,
}

impl<'a> PostureBuilder<'a> {
    pub fn new(rules: &'a TagRules) -> Self {
        Self { rules }
    }

    /// Classify every file under `source` without touching the disk.
    ///
    /// A file reachable from several tag directories appears once, with the
    /// union of their tags in discovery order.
    pub fn plan(&self, source: &Path) -> Result<Manifest, DatasetError> {
        let mut namer = UniqueNamer::new();
        let mut entries: Vec<DatasetEntry> = Vec::new();
        let mut by_source: HashMap<PathBuf, usize> = HashMap::new();

        for major in self.rules.posture_tags() {
            let tag_dirs: Vec<PathBuf> = walk::directories(source)?
                .into_iter()
                .filter(|dir| is_tag_dir(dir, major))
                .collect();
            debug!(tag = %major, count = tag_dirs.len(), "Matched tag directories");

            for tag_dir in tag_dirs {
                for (folder, files) in walk::dirs_with_files(&tag_dir)? {
                    let folder_tags = self.rules.folder_tags(major, &folder);

                    for file in files {
                        let path = folder.join(&file);

                        if let Some(&idx) = by_source.get(&path) {
                            let entry = &mut entries[idx];
                            for tag in &folder_tags {
                                if !entry.tags.contains(tag) {
                                    entry.tags.push(tag.clone());
                                }
                            }
                            continue;
                        }

                        let name = namer.claim(&file)?;
                        if name != file {
                            debug!(from = %file, to = %name, "Renamed colliding file");
                        }
                        by_source.insert(path.clone(), entries.len());
                        entries.push(DatasetEntry {
                            name,
                            source: path,
                            tags: folder_tags.clone(),
                        });
                    }
                }
            }
        }

        Ok(Manifest::from(entries))
    }

    /// Plan, then copy into `out_dir` (created here) and write its manifest
    pub fn build(&self, source: &Path, out_dir: &Path) -> Result<DatasetSummary, DatasetError> {
        info!(source = %source.display(), "Preparing posture dataset");
        let manifest = self.plan(source)?;

        fs::create_dir_all(out_dir).map_err(|e| DatasetError::io(out_dir, e))?;
        let files_copied = manifest.materialize(out_dir)?;
        info!(files_copied, "Posture dataset done");

        let tags: BTreeSet<String> = manifest
            .entries()
            .iter()
            .flat_map(|e| e.tags.iter().cloned())
            .collect();

        Ok(DatasetSummary {
            kind: DatasetKind::Posture,
            output: out_dir.to_path_buf(),
            directories: 1,
            files_copied,
            tags: tags.into_iter().collect(),
        })
    }
}
