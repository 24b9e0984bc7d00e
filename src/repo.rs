use crate::error::GitletError;
use crate::objects::{Branch, Commit, ObjectStore, FINGERPRINT_LEN};
use crate::utils;
use chrono::Utc;
use log::info;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::{env, fs};

const GITLET_DIR: &str = ".gitlet";
const OBJECTS_DIR: &str = "objects";
const REFS_DIR: &str = "refs";
const STAGING_DIR: &str = "staging";
const HEAD_FILE: &str = "HEAD";
const GLOBAL_LOG_FILE: &str = "global log";
const DEFAULT_BRANCH: &str = "master";

/// Handle on one repository: the working directory plus the `.gitlet`
/// control directory inside it. Every command loads HEAD, the active
/// branch record and its tip commit from disk up front, and persists
/// whatever it changed before returning.
pub struct GitletRepository {
    pub(crate) work_dir: PathBuf,
    pub repo_path: PathBuf,
    refs_path: PathBuf,
    pub(crate) staging_path: PathBuf,
    head_file: PathBuf,
    global_log_file: PathBuf,
    pub(crate) store: ObjectStore,
    pub(crate) branch: Branch,
    pub(crate) head_commit: Commit,
    pub(crate) head_sha1: String,
}

impl GitletRepository {
    pub fn new() -> Self {
        Self::at(env::current_dir().unwrap())
    }

    /// Build a handle rooted at an explicit working directory.
    pub fn at(work_dir: PathBuf) -> Self {
        let repo_path = work_dir.join(GITLET_DIR);
        Self {
            refs_path: repo_path.join(REFS_DIR),
            staging_path: repo_path.join(STAGING_DIR),
            head_file: repo_path.join(HEAD_FILE),
            global_log_file: repo_path.join(GLOBAL_LOG_FILE),
            store: ObjectStore::new(repo_path.join(OBJECTS_DIR)),
            repo_path,
            work_dir,
            branch: Branch::new(DEFAULT_BRANCH, ""),
            head_commit: Commit::initial(),
            head_sha1: String::new(),
        }
    }

    fn init_repo_dir(path: &Path) -> Result<(), GitletError> {
        fs::create_dir_all(path).map_err(|e| GitletError::Io(format!("{:?}", e)))
    }

    /// Create the repository layout and the initial commit.
    pub fn init(&mut self) -> Result<(), GitletError> {
        if self.repo_path.exists() {
            return Err(GitletError::RepoExists);
        }
        Self::init_repo_dir(&self.repo_path)?;
        self.store.init()?;
        Self::init_repo_dir(&self.refs_path)?;
        Self::init_repo_dir(&self.staging_path)?;
        let initial = Commit::initial();
        let sha1 = self.store.put_commit(&initial)?;
        self.branch = Branch::new(DEFAULT_BRANCH, &sha1);
        self.persist_branch()?;
        fs::write(&self.head_file, DEFAULT_BRANCH)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        fs::write(&self.global_log_file, "")
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        self.prepend_global_log(&sha1, &initial)?;
        self.head_sha1 = sha1;
        self.head_commit = initial;
        info!("initialized repository at {}", self.repo_path.display());
        Ok(())
    }

    /// load HEAD, the active branch record and its tip commit
    pub(crate) fn load_basic_info(&mut self) -> Result<(), GitletError> {
        if !self.repo_path.is_dir() {
            return Err(GitletError::NotARepo);
        }
        let name = fs::read_to_string(&self.head_file)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        self.branch = self.read_branch(name.trim())?;
        self.head_sha1 = self.branch.tip.clone();
        self.head_commit = self.store.get_commit(&self.head_sha1)?;
        info!("on branch {} at {}", self.branch.name, self.head_sha1);
        Ok(())
    }

    pub(crate) fn branch_path(&self, name: &str) -> PathBuf {
        self.refs_path.join(name)
    }

    pub(crate) fn read_branch(&self, name: &str) -> Result<Branch, GitletError> {
        let path = self.branch_path(name);
        if !path.is_file() {
            return Err(GitletError::NoSuchBranch);
        }
        utils::read_json(&path)
    }

    pub(crate) fn persist_branch(&self) -> Result<(), GitletError> {
        utils::write_json(&self.branch, &self.branch_path(&self.branch.name))
    }

    /// Filenames currently staged for addition, sorted.
    pub(crate) fn staged_files(&self) -> Result<Vec<String>, GitletError> {
        utils::list_files(&self.staging_path)
    }

    /// Working-directory files the engine would clobber blindly: neither
    /// tracked nor staged, or shadowing a staged removal.
    fn untracked_files(&self) -> Result<Vec<String>, GitletError> {
        let mut names = Vec::new();
        for name in utils::list_files(&self.work_dir)? {
            let staged = self.staging_path.join(&name).is_file();
            let tracked = self.head_commit.tracked.contains_key(&name);
            if (!tracked && !staged) || self.branch.removal_stage.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    pub(crate) fn ensure_no_untracked(&self) -> Result<(), GitletError> {
        if self.untracked_files()?.is_empty() {
            Ok(())
        } else {
            Err(GitletError::UntrackedInTheWay)
        }
    }

    /// Stage a file for addition, or every working file for `.`.
    pub fn add(&mut self, name: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        if name == "." {
            for file in utils::list_files(&self.work_dir)? {
                self.stage_file(&file)?;
            }
            Ok(())
        } else {
            self.stage_file(name)
        }
    }

    fn stage_file(&mut self, name: &str) -> Result<(), GitletError> {
        let path = self.work_dir.join(name);
        if !path.is_file() {
            return Err(GitletError::AddMissingFile);
        }
        // adding a file cancels a pending removal of the same name
        if self.branch.removal_stage.remove(name) {
            self.persist_branch()?;
        }
        let fingerprint = utils::fingerprint_file(&path)?;
        let staged = self.staging_path.join(name);
        if self.head_commit.tracked.get(name) == Some(&fingerprint) {
            // the edit reverted to the tracked version; nothing to stage
            if staged.is_file() {
                fs::remove_file(&staged).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
            }
            return Ok(());
        }
        utils::copy_to(&path, &staged)
    }

    /// Unstage a pending addition, and stage a tracked file for removal
    /// (deleting the working copy).
    pub fn remove(&mut self, name: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        let staged = self.staging_path.join(name);
        let mut acted = false;
        if staged.is_file() {
            fs::remove_file(&staged).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
            acted = true;
        }
        if self.head_commit.tracked.contains_key(name) {
            self.branch.removal_stage.insert(name.to_string());
            self.persist_branch()?;
            let working = self.work_dir.join(name);
            if working.is_file() {
                fs::remove_file(&working).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
            }
            acted = true;
        }
        if acted {
            Ok(())
        } else {
            Err(GitletError::NoReasonToRemove)
        }
    }

    pub fn commit(&mut self, message: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        if self.staged_files()?.is_empty() && self.branch.removal_stage.is_empty() {
            return Err(GitletError::NothingToCommit);
        }
        if message.is_empty() {
            return Err(GitletError::EmptyMessage);
        }
        self.build_commit(message, None)
    }

    /// Assemble a commit from the parent's tracked set plus the staged
    /// additions and removals, then advance the branch. Shared by `commit`
    /// and the merge engine (which supplies `parent2`).
    pub(crate) fn build_commit(
        &mut self,
        message: &str,
        parent2: Option<String>,
    ) -> Result<(), GitletError> {
        let mut tracked = self.head_commit.tracked.clone();
        for name in self.staged_files()? {
            let fingerprint = self.store.put_blob(&self.staging_path.join(&name))?;
            tracked.insert(name, fingerprint);
        }
        for name in &self.branch.removal_stage {
            tracked.remove(name);
        }
        let timestamp = Utc::now().timestamp_millis();
        let commit = Commit {
            message: message.to_string(),
            timestamp,
            display_time: utils::display_time(timestamp),
            parent1: Some(self.head_sha1.clone()),
            parent2,
            tracked,
        };
        let sha1 = self.store.put_commit(&commit)?;
        self.branch.tip = sha1.clone();
        self.branch.removal_stage.clear();
        self.persist_branch()?;
        self.prepend_global_log(&sha1, &commit)?;
        info!("commit {} on {}", sha1, self.branch.name);
        self.head_sha1 = sha1;
        self.head_commit = commit;
        Ok(())
    }

    fn render_commit(sha1: &str, commit: &Commit) -> String {
        let mut out = format!("===\ncommit {}\n", sha1);
        if let (Some(p1), Some(p2)) = (&commit.parent1, &commit.parent2) {
            out.push_str(&format!("Merge: {} {}\n", &p1[..7], &p2[..7]));
        }
        out.push_str(&format!("Date: {}\n{}", commit.display_time, commit.message));
        out
    }

    fn prepend_global_log(&self, sha1: &str, commit: &Commit) -> Result<(), GitletError> {
        let existing = fs::read_to_string(&self.global_log_file)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        let entry = Self::render_commit(sha1, commit);
        fs::write(&self.global_log_file, format!("{}\n\n{}", entry, existing))
            .map_err(|e| GitletError::Io(format!("{:?}", e)))
    }

    /// History of the current branch, first parents only.
    pub fn log(&mut self) -> Result<String, GitletError> {
        self.load_basic_info()?;
        let mut entries = Vec::new();
        let mut cursor = self.head_sha1.clone();
        loop {
            let commit = self.store.get_commit(&cursor)?;
            entries.push(Self::render_commit(&cursor, &commit));
            match commit.parent1 {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        Ok(entries.join("\n\n"))
    }

    /// The global-log file verbatim.
    pub fn global_log(&mut self) -> Result<String, GitletError> {
        self.load_basic_info()?;
        fs::read_to_string(&self.global_log_file).map_err(|e| GitletError::Io(format!("{:?}", e)))
    }

    fn all_commit_ids(&self) -> Result<Vec<String>, GitletError> {
        let content = fs::read_to_string(&self.global_log_file)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        Ok(content
            .lines()
            .filter_map(|line| line.strip_prefix("commit "))
            .filter(|id| id.len() == FINGERPRINT_LEN)
            .map(str::to_string)
            .collect())
    }

    /// Ids of every commit whose message equals `message` exactly,
    /// one per line.
    pub fn find(&mut self, message: &str) -> Result<String, GitletError> {
        self.load_basic_info()?;
        let mut ids = Vec::new();
        for sha1 in self.all_commit_ids()? {
            if self.store.get_commit(&sha1)?.message == message {
                ids.push(sha1);
            }
        }
        if ids.is_empty() {
            Err(GitletError::NoCommitWithMessage)
        } else {
            Ok(ids.join("\n"))
        }
    }

    pub fn status(&mut self) -> Result<String, GitletError> {
        self.load_basic_info()?;
        let sections = [
            self.branch_section()?,
            self.staged_section()?,
            self.removed_section(),
            self.modified_section()?,
            self.untracked_section()?,
        ];
        Ok(sections.join("\n\n"))
    }

    fn branch_section(&self) -> Result<String, GitletError> {
        let mut lines = vec!["=== Branches ===".to_string()];
        for name in utils::list_files(&self.refs_path)? {
            if name == self.branch.name {
                lines.push(format!("*{}", name));
            } else {
                lines.push(name);
            }
        }
        Ok(lines.join("\n"))
    }

    fn staged_section(&self) -> Result<String, GitletError> {
        let mut lines = vec!["=== Staged Files ===".to_string()];
        lines.extend(self.staged_files()?);
        Ok(lines.join("\n"))
    }

    fn removed_section(&self) -> String {
        let mut lines = vec!["=== Removed Files ===".to_string()];
        lines.extend(self.branch.removal_stage.iter().cloned());
        lines.join("\n")
    }

    fn modified_section(&self) -> Result<String, GitletError> {
        let mut lines = vec!["=== Modifications Not Staged For Commit ===".to_string()];
        let mut names: BTreeSet<String> = self.head_commit.tracked.keys().cloned().collect();
        names.extend(self.staged_files()?);
        for name in names {
            let working = self.work_dir.join(&name);
            let staged_path = self.staging_path.join(&name);
            let staged = staged_path.is_file();
            let tracked_fp = self.head_commit.tracked.get(&name);
            if working.is_file() {
                let working_fp = utils::fingerprint_file(&working)?;
                let modified = if staged {
                    utils::fingerprint_file(&staged_path)? != working_fp
                } else {
                    matches!(tracked_fp, Some(fp) if *fp != working_fp)
                };
                if modified {
                    lines.push(format!("{} (modified)", name));
                }
            } else if staged {
                lines.push(format!("{} (deleted)", name));
            } else if tracked_fp.is_some() && !self.branch.removal_stage.contains(&name) {
                lines.push(format!("{} (deleted)", name));
            }
        }
        Ok(lines.join("\n"))
    }

    fn untracked_section(&self) -> Result<String, GitletError> {
        let mut lines = vec!["=== Untracked Files ===".to_string()];
        lines.extend(self.untracked_files()?);
        Ok(lines.join("\n"))
    }

    /// `checkout -- <name>`: restore a file from the current tip.
    pub fn checkout_file(&mut self, name: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        let commit = self.head_commit.clone();
        self.restore_file(&commit, name)
    }

    /// `checkout <commit> -- <name>`: restore a file from the named commit.
    pub fn checkout_file_at(&mut self, prefix: &str, name: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        let (_, commit) = self.store.find_commit(prefix)?;
        self.restore_file(&commit, name)
    }

    fn restore_file(&self, commit: &Commit, name: &str) -> Result<(), GitletError> {
        let fingerprint = commit
            .tracked
            .get(name)
            .ok_or(GitletError::FileNotInCommit)?;
        let bytes = self.store.get_blob(fingerprint)?;
        fs::write(self.work_dir.join(name), bytes).map_err(|e| GitletError::Io(format!("{:?}", e)))
    }

    /// `checkout <branch>`: switch the active branch and materialize its tip.
    pub fn checkout_branch(&mut self, name: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        if name == self.branch.name {
            return Err(GitletError::CheckoutCurrentBranch);
        }
        let target = self.read_branch(name)?;
        self.ensure_no_untracked()?;
        let commit = self.store.get_commit(&target.tip)?;
        fs::write(&self.head_file, name).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        self.materialize(&commit)?;
        self.head_sha1 = target.tip.clone();
        self.branch = target;
        self.head_commit = commit;
        Ok(())
    }

    /// Move the current branch to the given commit and check it out.
    pub fn reset(&mut self, prefix: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        self.ensure_no_untracked()?;
        let (sha1, commit) = self.store.find_commit(prefix)?;
        self.branch.tip = sha1.clone();
        self.persist_branch()?;
        self.materialize(&commit)?;
        self.head_sha1 = sha1;
        self.head_commit = commit;
        Ok(())
    }

    /// Make the working directory an exact image of the target commit:
    /// drop every working file, copy in the tracked blobs, empty staging.
    /// The removal stage belongs to the branch record and is left alone.
    pub(crate) fn materialize(&self, commit: &Commit) -> Result<(), GitletError> {
        for name in utils::list_files(&self.work_dir)? {
            fs::remove_file(self.work_dir.join(name))
                .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        }
        for (name, fingerprint) in &commit.tracked {
            let bytes = self.store.get_blob(fingerprint)?;
            fs::write(self.work_dir.join(name), bytes)
                .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        }
        self.clear_staging()
    }

    fn clear_staging(&self) -> Result<(), GitletError> {
        for name in utils::list_files(&self.staging_path)? {
            fs::remove_file(self.staging_path.join(name))
                .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        }
        Ok(())
    }

    /// Create a new branch pointer at the current tip. HEAD stays put.
    pub fn branch(&mut self, name: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        if self.branch_path(name).exists() {
            return Err(GitletError::BranchExists);
        }
        utils::write_json(&Branch::new(name, &self.head_sha1), &self.branch_path(name))
    }

    /// Delete a branch pointer. Its commits stay in the object store.
    pub fn rm_branch(&mut self, name: &str) -> Result<(), GitletError> {
        self.load_basic_info()?;
        if !self.branch_path(name).is_file() {
            return Err(GitletError::BranchMissing);
        }
        if name == self.branch.name {
            return Err(GitletError::RemoveCurrentBranch);
        }
        fs::remove_file(self.branch_path(name)).map_err(|e| GitletError::Io(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, GitletRepository) {
        let _ = env_logger::builder().is_test(true).try_init();
        let tmp = TempDir::new().unwrap();
        let mut repo = GitletRepository::at(tmp.path().to_path_buf());
        repo.init().unwrap();
        (tmp, repo)
    }

    fn write_file(repo: &GitletRepository, name: &str, contents: &str) {
        fs::write(repo.work_dir.join(name), contents).unwrap();
    }

    fn read_file(repo: &GitletRepository, name: &str) -> String {
        fs::read_to_string(repo.work_dir.join(name)).unwrap()
    }

    #[test]
    fn init_creates_layout_ut() {
        let (_tmp, repo) = setup();
        assert!(repo.repo_path.is_dir());
        assert!(repo.refs_path.is_dir());
        assert!(repo.staging_path.is_dir());
        assert_eq!(
            "master",
            fs::read_to_string(&repo.head_file).unwrap().as_str()
        );
        assert!(repo.branch_path("master").is_file());
        assert!(repo.global_log_file.is_file());
    }

    #[test]
    fn init_status_sections_ut() {
        let (_tmp, mut repo) = setup();
        assert_eq!(
            "=== Branches ===\n\
             *master\n\n\
             === Staged Files ===\n\n\
             === Removed Files ===\n\n\
             === Modifications Not Staged For Commit ===\n\n\
             === Untracked Files ===",
            repo.status().unwrap()
        );
    }

    #[test]
    fn init_twice_reports_existing_ut() {
        let (_tmp, mut repo) = setup();
        let before = repo.global_log().unwrap();
        assert!(matches!(repo.init(), Err(GitletError::RepoExists)));
        assert_eq!(before, repo.global_log().unwrap());
    }

    #[test]
    fn commands_outside_repo_ut() {
        let tmp = TempDir::new().unwrap();
        let mut repo = GitletRepository::at(tmp.path().to_path_buf());
        assert!(matches!(repo.status(), Err(GitletError::NotARepo)));
        assert!(matches!(repo.add("a.txt"), Err(GitletError::NotARepo)));
    }

    #[test]
    fn add_missing_file_ut() {
        let (_tmp, mut repo) = setup();
        assert!(matches!(
            repo.add("nope.txt"),
            Err(GitletError::AddMissingFile)
        ));
    }

    #[test]
    fn add_commit_log_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "hello");
        repo.add("a.txt").unwrap();
        assert_eq!(vec!["a.txt".to_string()], repo.staged_files().unwrap());
        repo.commit("add a").unwrap();
        let log = repo.log().unwrap();
        assert!(log.starts_with(&format!("===\ncommit {}\n", repo.head_sha1)));
        let first = log.find("add a").unwrap();
        let second = log.find("initial commit").unwrap();
        assert!(first < second);
        assert_eq!(2, log.matches("===\ncommit ").count());
    }

    #[test]
    fn add_dot_stages_every_working_file_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "a");
        write_file(&repo, "b.txt", "b");
        repo.add(".").unwrap();
        assert_eq!(
            vec!["a.txt".to_string(), "b.txt".to_string()],
            repo.staged_files().unwrap()
        );
    }

    #[test]
    fn add_reverted_edit_clears_staging_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "one");
        repo.add("a.txt").unwrap();
        repo.commit("v1").unwrap();
        write_file(&repo, "a.txt", "two");
        repo.add("a.txt").unwrap();
        assert_eq!(vec!["a.txt".to_string()], repo.staged_files().unwrap());
        write_file(&repo, "a.txt", "one");
        repo.add("a.txt").unwrap();
        assert!(repo.staged_files().unwrap().is_empty());
    }

    #[test]
    fn commit_empties_staging_and_removal_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "a");
        write_file(&repo, "b.txt", "b");
        repo.add(".").unwrap();
        repo.commit("two files").unwrap();
        assert!(repo.staged_files().unwrap().is_empty());
        repo.remove("b.txt").unwrap();
        repo.commit("drop b").unwrap();
        assert!(repo.branch.removal_stage.is_empty());
        assert!(!repo.head_commit.tracked.contains_key("b.txt"));
        assert!(repo.head_commit.tracked.contains_key("a.txt"));
    }

    #[test]
    fn commit_preconditions_ut() {
        let (_tmp, mut repo) = setup();
        assert!(matches!(
            repo.commit("nothing"),
            Err(GitletError::NothingToCommit)
        ));
        write_file(&repo, "a.txt", "a");
        repo.add("a.txt").unwrap();
        assert!(matches!(repo.commit(""), Err(GitletError::EmptyMessage)));
        // the failed commit left the staging area alone
        assert_eq!(vec!["a.txt".to_string()], repo.staged_files().unwrap());
    }

    #[test]
    fn rm_tracked_file_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "hello");
        repo.add("a.txt").unwrap();
        repo.commit("add a").unwrap();
        repo.remove("a.txt").unwrap();
        assert!(!repo.work_dir.join("a.txt").exists());
        let status = repo.status().unwrap();
        assert!(status.contains("=== Removed Files ===\na.txt"));
    }

    #[test]
    fn rm_unstages_addition_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "b.txt", "b");
        repo.add("b.txt").unwrap();
        repo.remove("b.txt").unwrap();
        assert!(repo.staged_files().unwrap().is_empty());
        // untracked working copy is not deleted
        assert!(repo.work_dir.join("b.txt").is_file());
    }

    #[test]
    fn rm_no_reason_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "loose.txt", "x");
        assert!(matches!(
            repo.remove("loose.txt"),
            Err(GitletError::NoReasonToRemove)
        ));
    }

    #[test]
    fn checkout_file_restores_tracked_version_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "b.txt", "one");
        repo.add("b.txt").unwrap();
        repo.commit("add b").unwrap();
        write_file(&repo, "b.txt", "two");
        repo.checkout_file("b.txt").unwrap();
        assert_eq!("one", read_file(&repo, "b.txt"));
        assert!(matches!(
            repo.checkout_file("missing.txt"),
            Err(GitletError::FileNotInCommit)
        ));
    }

    #[test]
    fn checkout_file_at_commit_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "b.txt", "one");
        repo.add("b.txt").unwrap();
        repo.commit("v1").unwrap();
        let v1 = repo.head_sha1.clone();
        write_file(&repo, "b.txt", "two");
        repo.add("b.txt").unwrap();
        repo.commit("v2").unwrap();
        repo.checkout_file_at(&v1[..8], "b.txt").unwrap();
        assert_eq!("one", read_file(&repo, "b.txt"));
        assert!(matches!(
            repo.checkout_file_at("deadbeef", "b.txt"),
            Err(GitletError::NoSuchCommit)
        ));
    }

    #[test]
    fn checkout_branch_switches_working_set_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "base");
        repo.add("a.txt").unwrap();
        repo.commit("base").unwrap();
        repo.branch("dev").unwrap();
        write_file(&repo, "a.txt", "master edit");
        repo.add("a.txt").unwrap();
        repo.commit("master edit").unwrap();
        repo.checkout_branch("dev").unwrap();
        assert_eq!("dev", repo.branch.name);
        assert_eq!("base", read_file(&repo, "a.txt"));
        assert!(matches!(
            repo.checkout_branch("dev"),
            Err(GitletError::CheckoutCurrentBranch)
        ));
        assert!(matches!(
            repo.checkout_branch("nope"),
            Err(GitletError::NoSuchBranch)
        ));
    }

    #[test]
    fn untracked_file_blocks_checkout_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "base");
        repo.add("a.txt").unwrap();
        repo.commit("base").unwrap();
        repo.branch("dev").unwrap();
        write_file(&repo, "loose.txt", "untracked");
        assert!(matches!(
            repo.checkout_branch("dev"),
            Err(GitletError::UntrackedInTheWay)
        ));
        // aborted with no side effects
        assert_eq!("master", repo.branch.name);
        assert!(repo.work_dir.join("loose.txt").is_file());
    }

    #[test]
    fn reset_moves_tip_and_materializes_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "one");
        repo.add("a.txt").unwrap();
        repo.commit("v1").unwrap();
        let v1 = repo.head_sha1.clone();
        write_file(&repo, "a.txt", "two");
        write_file(&repo, "b.txt", "b");
        repo.add(".").unwrap();
        repo.commit("v2").unwrap();
        repo.reset(&v1[..10]).unwrap();
        assert_eq!(v1, repo.branch.tip);
        assert_eq!("one", read_file(&repo, "a.txt"));
        assert!(!repo.work_dir.join("b.txt").exists());
        assert!(repo.staged_files().unwrap().is_empty());
        assert!(matches!(
            repo.reset("deadbeef"),
            Err(GitletError::NoSuchCommit)
        ));
    }

    #[test]
    fn branch_create_and_remove_ut() {
        let (_tmp, mut repo) = setup();
        repo.branch("dev").unwrap();
        assert!(matches!(repo.branch("dev"), Err(GitletError::BranchExists)));
        // the new pointer shares the current tip and HEAD stays on master
        let dev = repo.read_branch("dev").unwrap();
        assert_eq!(repo.head_sha1, dev.tip);
        assert_eq!("master", fs::read_to_string(&repo.head_file).unwrap());
        assert!(matches!(
            repo.rm_branch("missing"),
            Err(GitletError::BranchMissing)
        ));
        assert!(matches!(
            repo.rm_branch("master"),
            Err(GitletError::RemoveCurrentBranch)
        ));
        repo.rm_branch("dev").unwrap();
        assert!(!repo.branch_path("dev").exists());
    }

    #[test]
    fn find_by_message_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "1");
        repo.add("a.txt").unwrap();
        repo.commit("same message").unwrap();
        let first = repo.head_sha1.clone();
        write_file(&repo, "a.txt", "2");
        repo.add("a.txt").unwrap();
        repo.commit("same message").unwrap();
        let second = repo.head_sha1.clone();
        let found = repo.find("same message").unwrap();
        assert!(found.contains(&first));
        assert!(found.contains(&second));
        assert_eq!(2, found.lines().count());
        assert!(matches!(
            repo.find("no such"),
            Err(GitletError::NoCommitWithMessage)
        ));
    }

    #[test]
    fn global_log_newest_first_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "1");
        repo.add("a.txt").unwrap();
        repo.commit("first").unwrap();
        write_file(&repo, "a.txt", "2");
        repo.add("a.txt").unwrap();
        repo.commit("second").unwrap();
        let global = repo.global_log().unwrap();
        assert!(global.starts_with(&format!("===\ncommit {}\n", repo.head_sha1)));
        assert_eq!(3, global.matches("===\ncommit ").count());
        assert!(global.contains("initial commit"));
    }

    #[test]
    fn status_modified_and_deleted_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "a");
        write_file(&repo, "b.txt", "b");
        repo.add(".").unwrap();
        repo.commit("base").unwrap();
        write_file(&repo, "a.txt", "edited");
        fs::remove_file(repo.work_dir.join("b.txt")).unwrap();
        let status = repo.status().unwrap();
        assert!(status.contains("a.txt (modified)"));
        assert!(status.contains("b.txt (deleted)"));
        // staged copy newer than the working copy also counts as modified
        write_file(&repo, "c.txt", "staged");
        repo.add("c.txt").unwrap();
        write_file(&repo, "c.txt", "changed after staging");
        let status = repo.status().unwrap();
        assert!(status.contains("c.txt (modified)"));
        // staged copy whose working file vanished counts as deleted
        fs::remove_file(repo.work_dir.join("c.txt")).unwrap();
        let status = repo.status().unwrap();
        assert!(status.contains("c.txt (deleted)"));
    }

    #[test]
    fn status_untracked_ut() {
        let (_tmp, mut repo) = setup();
        write_file(&repo, "a.txt", "a");
        repo.add("a.txt").unwrap();
        repo.commit("base").unwrap();
        write_file(&repo, "loose.txt", "x");
        let status = repo.status().unwrap();
        assert!(status.contains("=== Untracked Files ===\nloose.txt"));
        // a file staged for removal but recreated in the working directory
        // is untracked again
        repo.remove("a.txt").unwrap();
        write_file(&repo, "a.txt", "back");
        let status = repo.status().unwrap();
        assert!(status.contains("=== Untracked Files ===\na.txt\nloose.txt"));
    }
}
