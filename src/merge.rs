use crate::error::GitletError;
use crate::objects::{Commit, ObjectStore};
use crate::repo::GitletRepository;
use log::info;
use std::collections::{HashSet, VecDeque};
use std::fs;

/// Every fingerprint reachable from `start` through either parent,
/// `start` included.
fn ancestors(store: &ObjectStore, start: &str) -> Result<HashSet<String>, GitletError> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([start.to_string()]);
    while let Some(sha1) = queue.pop_front() {
        if !seen.insert(sha1.clone()) {
            continue;
        }
        let commit = store.get_commit(&sha1)?;
        if let Some(parent) = commit.parent1 {
            queue.push_back(parent);
        }
        if let Some(parent) = commit.parent2 {
            queue.push_back(parent);
        }
    }
    Ok(seen)
}

/// Nearest commit reachable from both tips: breadth-first from `given`,
/// stopping at the first commit that is also an ancestor of `current`.
/// The initial commit makes the search total.
pub fn lowest_common_ancestor(
    store: &ObjectStore,
    current: &str,
    given: &str,
) -> Result<String, GitletError> {
    let reachable = ancestors(store, current)?;
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([given.to_string()]);
    while let Some(sha1) = queue.pop_front() {
        if !seen.insert(sha1.clone()) {
            continue;
        }
        if reachable.contains(&sha1) {
            return Ok(sha1);
        }
        let commit = store.get_commit(&sha1)?;
        if let Some(parent) = commit.parent1 {
            queue.push_back(parent);
        }
        if let Some(parent) = commit.parent2 {
            queue.push_back(parent);
        }
    }
    Err(GitletError::NoSuchCommit)
}

/// Conflict-marker block for one filename. A side missing from its commit
/// contributes empty contents.
pub fn conflict_bytes(current: &[u8], given: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(current.len() + given.len() + 32);
    out.extend_from_slice(b"<<<<<<< HEAD\n");
    out.extend_from_slice(current);
    out.extend_from_slice(b"\n=======\n");
    out.extend_from_slice(given);
    out.extend_from_slice(b"\n>>>>>>>");
    out
}

impl GitletRepository {
    /// Merge the given branch into the current one. Returns the
    /// user-facing outcome line, if the merge produced one.
    pub fn merge(&mut self, name: &str) -> Result<Option<String>, GitletError> {
        self.load_basic_info()?;
        if !self.staged_files()?.is_empty() || !self.branch.removal_stage.is_empty() {
            return Err(GitletError::UncommittedChanges);
        }
        if !self.branch_path(name).is_file() {
            return Err(GitletError::NoSuchBranch);
        }
        if name == self.branch.name {
            return Err(GitletError::MergeSelf);
        }
        self.ensure_no_untracked()?;
        let given = self.read_branch(name)?;
        let ancestor_sha1 = lowest_common_ancestor(&self.store, &self.head_sha1, &given.tip)?;
        info!(
            "merge {} into {}: ancestor {}",
            name, self.branch.name, ancestor_sha1
        );
        if ancestor_sha1 == given.tip {
            return Ok(Some(
                "Given branch is an ancestor of the current branch.".to_string(),
            ));
        }
        let given_commit = self.store.get_commit(&given.tip)?;
        if ancestor_sha1 == self.head_sha1 {
            self.materialize(&given_commit)?;
            self.branch.tip = given.tip.clone();
            self.persist_branch()?;
            self.head_sha1 = given.tip;
            self.head_commit = given_commit;
            return Ok(Some("Current branch fast-forwarded.".to_string()));
        }
        let ancestor = self.store.get_commit(&ancestor_sha1)?;
        let conflicted = self.apply_three_way(&ancestor, &given_commit)?;
        let message = format!("Merged {} into {}.", name, self.branch.name);
        self.build_commit(&message, Some(given.tip))?;
        if conflicted {
            Ok(Some("Encountered a merge conflict.".to_string()))
        } else {
            Ok(None)
        }
    }

    /// Per-file three-way classification over the tracked sets of the
    /// ancestor, the current tip and the given tip. Files of the given
    /// commit are walked first, then the current commit's remainder, then
    /// the ancestor's. Returns whether any file conflicted.
    fn apply_three_way(&mut self, ancestor: &Commit, given: &Commit) -> Result<bool, GitletError> {
        let current = self.head_commit.tracked.clone();
        let base = &ancestor.tracked;
        let theirs = &given.tracked;
        let mut names: Vec<String> = theirs.keys().cloned().collect();
        names.extend(current.keys().filter(|n| !theirs.contains_key(*n)).cloned());
        names.extend(
            base.keys()
                .filter(|n| !theirs.contains_key(*n) && !current.contains_key(*n))
                .cloned(),
        );
        let mut conflicted = false;
        for name in names {
            match (base.get(&name), current.get(&name), theirs.get(&name)) {
                (Some(a), Some(c), Some(g)) => {
                    if c == a && g != a {
                        // changed only on the given side
                        self.take_given(&name, g)?;
                    } else if c != a && g != a && c != g {
                        self.write_conflict(&name, Some(c), Some(g))?;
                        conflicted = true;
                    }
                }
                // created on the given side only
                (None, None, Some(g)) => self.take_given(&name, g)?,
                (Some(a), Some(c), None) => {
                    if c == a {
                        // deleted on the given side, untouched here
                        self.stage_removal(&name)?;
                    } else {
                        self.write_conflict(&name, Some(c), None)?;
                        conflicted = true;
                    }
                }
                (Some(a), None, Some(g)) => {
                    if g != a {
                        self.write_conflict(&name, None, Some(g))?;
                        conflicted = true;
                    }
                }
                (None, Some(c), Some(g)) => {
                    if c != g {
                        self.write_conflict(&name, Some(c), Some(g))?;
                        conflicted = true;
                    }
                }
                // remaining shapes keep the current branch's version
                _ => {}
            }
        }
        Ok(conflicted)
    }

    /// Put the given branch's blob in the working directory and stage it.
    fn take_given(&mut self, name: &str, fingerprint: &str) -> Result<(), GitletError> {
        let bytes = self.store.get_blob(fingerprint)?;
        fs::write(self.work_dir.join(name), &bytes)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        fs::write(self.staging_path.join(name), &bytes)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))
    }

    fn stage_removal(&mut self, name: &str) -> Result<(), GitletError> {
        self.branch.removal_stage.insert(name.to_string());
        let working = self.work_dir.join(name);
        if working.is_file() {
            fs::remove_file(working).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        }
        Ok(())
    }

    fn write_conflict(
        &mut self,
        name: &str,
        current: Option<&String>,
        given: Option<&String>,
    ) -> Result<(), GitletError> {
        let current_bytes = match current {
            Some(fingerprint) => self.store.get_blob(fingerprint)?,
            None => Vec::new(),
        };
        let given_bytes = match given {
            Some(fingerprint) => self.store.get_blob(fingerprint)?,
            None => Vec::new(),
        };
        let merged = conflict_bytes(&current_bytes, &given_bytes);
        fs::write(self.work_dir.join(name), &merged)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        fs::write(self.staging_path.join(name), &merged)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))
    }
}
