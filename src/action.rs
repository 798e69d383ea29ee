//! Action dataset
//!
//! An experiment is any directory with a direct `up` or `down` child. Each
//! experiment is flattened into its own numbered directory, every file tagged
//! with the direction folder it came from.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::builder::{DatasetKind, DatasetSummary};
use crate::conflict::Resolution;
use crate::error::DatasetError;
use crate::manifest::{DatasetEntry, Manifest};
use crate::naming::UniqueNamer;
use crate::tags::{action_tag, TagRules};
use crate::walk;

/// Planned contents of one experiment directory
#[derive(Debug, Clone)]
pub struct ExperimentPlan {
    pub experiment: PathBuf,
    /// Entries sorted by output name
    pub manifest: Manifest,
    /// Every tag encountered, including those of files that lost a conflict
    pub tags_seen: BTreeSet<String>,
}

/// Files sharing one source name inside an experiment, all under the
/// currently winning tag
#[derive(Debug)]
struct NameGroup {
    file_name: String,
    tag: String,
    sources: Vec<PathBuf>,
}

/// Builds the action dataset from a raw tree
pub struct ActionBuilder<'a> {
    rules: &'a TagRules,
}

impl<'a> ActionBuilder<'a> {
    pub fn new(rules: &'a TagRules) -> Self {
        Self { rules }
    }

    /// Directories with at least one direct child named exactly after an
    /// action tag, in sorted walk order
    pub fn experiments(&self, source: &Path) -> Result<Vec<PathBuf>, DatasetError> {
        let mut found = Vec::new();
        for dir in walk::directories(source)? {
            let children = walk::child_dirs(&dir)?;
            if children
                .iter()
                .any(|child| self.rules.action_tags().contains(child))
            {
                found.push(dir);
            }
        }
        Ok(found)
    }

    /// Flatten one experiment, resolving same-name files across tags.
    ///
    /// Conflicts are settled per file name before any output name is claimed,
    /// so a winning tag evicts every file of the losing tag under that name.
    pub fn plan_experiment(&self, experiment: &Path) -> Result<ExperimentPlan, DatasetError> {
        let policy = self.rules.conflicts();
        let mut groups: Vec<NameGroup> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut tags_seen = BTreeSet::new();

        for file in walk::files_under(experiment)? {
            let Some(tag) = action_tag(experiment, &file) else {
                warn!(file = %file.display(), "Skipping file outside any tag directory");
                continue;
            };
            tags_seen.insert(tag.clone());

            let file_name = match file.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };

            let Some(&idx) = by_name.get(&file_name) else {
                by_name.insert(file_name.clone(), groups.len());
                groups.push(NameGroup {
                    file_name,
                    tag,
                    sources: vec![file],
                });
                continue;
            };

            let group = &mut groups[idx];
            match policy.resolve(&group.tag, &tag) {
                Resolution::Identical => group.sources.push(file),
                Resolution::KeepExisting => {
                    debug!(name = %file_name, kept = %group.tag, dropped = %tag, "Conflict resolved");
                }
                Resolution::ReplaceExisting => {
                    debug!(
                        name = %file_name,
                        kept = %tag,
                        dropped = %group.tag,
                        evicted = group.sources.len(),
                        "Conflict resolved"
                    );
                    group.tag = tag;
                    group.sources = vec![file];
                }
                Resolution::Unresolvable => {
                    warn!(
                        name = %file_name,
                        existing = %group.tag,
                        incoming = %tag,
                        "Ambiguous tag conflict, keeping the first file"
                    );
                }
                Resolution::Unknown => {
                    return Err(DatasetError::UnexpectedTagConflict {
                        name: file_name,
                        existing: group.tag.clone(),
                        incoming: tag,
                    });
                }
            }
        }

        // Original names first, so a real `1_1.jpg` is not displaced by a
        // renamed duplicate of `1.jpg`
        let mut namer = UniqueNamer::new();
        let mut entries: Vec<DatasetEntry> = Vec::new();
        for group in &groups {
            entries.push(DatasetEntry {
                name: namer.claim(&group.file_name)?,
                source: group.sources[0].clone(),
                tags: vec![group.tag.clone()],
            });
        }
        for group in &groups {
            for source in &group.sources[1..] {
                entries.push(DatasetEntry {
                    name: namer.claim(&group.file_name)?,
                    source: source.clone(),
                    tags: vec![group.tag.clone()],
                });
            }
        }

        let mut manifest = Manifest::from(entries);
        manifest.sort_by_name();

        Ok(ExperimentPlan {
            experiment: experiment.to_path_buf(),
            manifest,
            tags_seen,
        })
    }

    /// Write `out_dir/NNN/` for every experiment under `source`
    pub fn build(&self, source: &Path, out_dir: &Path) -> Result<DatasetSummary, DatasetError> {
        info!(source = %source.display(), "Preparing action dataset");
        fs::create_dir_all(out_dir).map_err(|e| DatasetError::io(out_dir, e))?;

        let experiments = self.experiments(source)?;
        let mut files_copied = 0;
        let mut tags = BTreeSet::new();

        for (index, experiment) in experiments.iter().enumerate() {
            let plan = self.plan_experiment(experiment)?;
            let target = out_dir.join(format!("{index:03}"));
            fs::create_dir_all(&target).map_err(|e| DatasetError::io(&target, e))?;

            let copied = plan.manifest.materialize(&target)?;
            files_copied += copied;
            info!(
                experiment = %plan.experiment.display(),
                output = %target.display(),
                copied,
                total = files_copied,
                "Copied experiment"
            );
            tags.extend(plan.tags_seen);
        }

        info!(files_copied, tags = ?tags, "Action dataset done");

        Ok(DatasetSummary {
            kind: DatasetKind::Action,
            output: out_dir.to_path_buf(),
            directories: experiments.len(),
            files_copied,
            tags: tags.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;
    use crate::manifest::MANIFEST_FILE_NAME;
    use pretty_assertions::assert_eq;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, path.to_string_lossy().as_bytes()).unwrap();
    }

    fn rules() -> TagRules {
        DatasetConfig::default().compile().unwrap()
    }

    fn lines(plan: &ExperimentPlan) -> Vec<String> {
        plan.manifest.entries().iter().map(|e| e.manifest_line()).collect()
    }

    #[test]
    fn test_experiments_need_exact_direction_child() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("exp1/up/s1/1.jpg"));
        touch(&root.join("exp2/down/s1/1.jpg"));
        touch(&root.join("exp3/Up/s1/1.jpg"));
        touch(&root.join("exp4/upwards/s1/1.jpg"));

        let rules = rules();
        let experiments = ActionBuilder::new(&rules).experiments(root).unwrap();
        assert_eq!(experiments, vec![root.join("exp1"), root.join("exp2")]);
    }

    #[test]
    fn test_down_wins_regardless_of_order() {
        let tmp = tempfile::tempdir().unwrap();
        let exp = tmp.path().join("exp");
        // "down" sorts before "up", so down is planned first here
        touch(&exp.join("down/s1/100.jpg"));
        touch(&exp.join("up/s1/100.jpg"));
        touch(&exp.join("up/s1/050.jpg"));

        let rules = rules();
        let plan = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap();
        assert_eq!(lines(&plan), vec!["050.jpg,up", "100.jpg,down"]);
        assert_eq!(plan.manifest.entries()[1].source, exp.join("down/s1/100.jpg"));

        let config = DatasetConfig {
            action_tags: vec!["a_up".to_string(), "b_down".to_string()],
            conflicts: crate::conflict::ConflictPolicy {
                precedence: vec![crate::conflict::PrecedenceRule::new("b_down", "a_up")],
                ambiguous: vec![],
            },
            ..Default::default()
        };
        let rules = config.compile().unwrap();
        let exp = tmp.path().join("exp_b");
        // here the losing tag is planned first
        touch(&exp.join("a_up/s1/100.jpg"));
        touch(&exp.join("b_down/s1/100.jpg"));
        let plan = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap();
        assert_eq!(lines(&plan), vec!["100.jpg,b_down"]);
        assert_eq!(plan.manifest.entries()[0].source, exp.join("b_down/s1/100.jpg"));
    }

    #[test]
    fn test_same_tag_collision_keeps_both() {
        let tmp = tempfile::tempdir().unwrap();
        let exp = tmp.path().join("exp");
        touch(&exp.join("up/s1/1.jpg"));
        touch(&exp.join("up/s2/1.jpg"));

        let rules = rules();
        let plan = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap();
        assert_eq!(lines(&plan), vec!["1.jpg,up", "1_1.jpg,up"]);
    }

    #[test]
    fn test_winning_tag_evicts_every_duplicate_of_loser() {
        let config = DatasetConfig {
            action_tags: vec!["a_up".to_string(), "b_down".to_string()],
            conflicts: crate::conflict::ConflictPolicy {
                precedence: vec![crate::conflict::PrecedenceRule::new("b_down", "a_up")],
                ambiguous: vec![],
            },
            ..Default::default()
        };
        let rules = config.compile().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let exp = tmp.path().join("exp");
        touch(&exp.join("a_up/s1/1.jpg"));
        touch(&exp.join("a_up/s2/1.jpg"));
        touch(&exp.join("b_down/s1/1.jpg"));

        let plan = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap();
        assert_eq!(lines(&plan), vec!["1.jpg,b_down"]);
        assert_eq!(plan.manifest.entries()[0].source, exp.join("b_down/s1/1.jpg"));
        assert!(plan.tags_seen.contains("a_up"));
    }

    #[test]
    fn test_renamed_duplicate_does_not_take_an_existing_name() {
        let tmp = tempfile::tempdir().unwrap();
        let exp = tmp.path().join("exp");
        touch(&exp.join("up/s1/1.jpg"));
        touch(&exp.join("up/s2/1.jpg"));
        touch(&exp.join("up/s3/1_1.jpg"));

        let rules = rules();
        let plan = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap();
        assert_eq!(lines(&plan), vec!["1.jpg,up", "1_1.jpg,up", "1_2.jpg,up"]);
        let kept = plan
            .manifest
            .entries()
            .iter()
            .find(|e| e.name == "1_1.jpg")
            .unwrap();
        assert_eq!(kept.source, exp.join("up/s3/1_1.jpg"));
    }

    #[test]
    fn test_ambiguous_pair_keeps_prior_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let exp = tmp.path().join("exp");
        touch(&exp.join("sitting/s1/1.jpg"));
        touch(&exp.join("standing/s1/1.jpg"));

        let rules = rules();
        let plan = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap();
        assert_eq!(lines(&plan), vec!["1.jpg,sitting"]);
        assert_eq!(plan.manifest.entries()[0].source, exp.join("sitting/s1/1.jpg"));
        assert!(plan.tags_seen.contains("standing"));
    }

    #[test]
    fn test_unknown_pair_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let exp = tmp.path().join("exp");
        touch(&exp.join("notes/1.jpg"));
        touch(&exp.join("up/s1/1.jpg"));

        let rules = rules();
        let err = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap_err();
        assert!(matches!(err, DatasetError::UnexpectedTagConflict { .. }));
    }

    #[test]
    fn test_files_directly_in_experiment_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let exp = tmp.path().join("exp");
        touch(&exp.join("readme.txt"));
        touch(&exp.join("up/s1/1.jpg"));

        let rules = rules();
        let plan = ActionBuilder::new(&rules).plan_experiment(&exp).unwrap();
        assert_eq!(lines(&plan), vec!["1.jpg,up"]);
    }

    #[test]
    fn test_build_numbers_experiments_and_sorts_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("raw");
        touch(&root.join("a/up/s1/300.jpg"));
        touch(&root.join("a/up/s1/100.jpg"));
        touch(&root.join("a/down/s1/200.jpg"));
        touch(&root.join("b/down/s1/1.jpg"));
        let out = tmp.path().join("datasets/action");

        let rules = rules();
        let summary = ActionBuilder::new(&rules).build(&root, &out).unwrap();
        assert_eq!(summary.directories, 2);
        assert_eq!(summary.files_copied, 4);
        assert_eq!(summary.tags, vec!["down", "up"]);

        let records = Manifest::read(&out.join("000").join(MANIFEST_FILE_NAME)).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["100.jpg", "200.jpg", "300.jpg"]);
        assert!(out.join("001/1.jpg").is_file());
    }
}
