use crate::error::GitletError;
use crate::utils;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Hex length of a full fingerprint.
pub const FINGERPRINT_LEN: usize = 40;
/// Length of an object filename inside a bucket (fingerprint minus the
/// two bucket characters).
pub const BUCKET_NAME_LEN: usize = FINGERPRINT_LEN - 2;

/// Immutable node of the commit DAG. Identity is the fingerprint of the
/// serialized record, so every field participates in it. `tracked` maps
/// filename to blob fingerprint; BTreeMap keeps the serialization canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub message: String,
    pub timestamp: i64,
    pub display_time: String,
    pub parent1: Option<String>,
    pub parent2: Option<String>,
    pub tracked: BTreeMap<String, String>,
}

impl Commit {
    /// The one commit every repository starts from. Created only by `init`.
    pub fn initial() -> Self {
        Self {
            message: "initial commit".to_string(),
            timestamp: 0,
            display_time: utils::display_time(0),
            parent1: None,
            parent2: None,
            tracked: BTreeMap::new(),
        }
    }
}

/// Named branch pointer. The removal stage rides along so that staged
/// removals survive process exit without a second on-disk index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub tip: String,
    pub removal_stage: BTreeSet<String>,
}

impl Branch {
    pub fn new(name: &str, tip: &str) -> Self {
        Self {
            name: name.to_string(),
            tip: tip.to_string(),
            removal_stage: BTreeSet::new(),
        }
    }
}

/// Content-addressed store under `.gitlet/objects`. The first two hex
/// characters of a fingerprint select the bucket directory, the remaining
/// 38 name the file. Blobs and commit records share the namespace.
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Pre-create all 256 buckets so later writes never create directories.
    pub fn init(&self) -> Result<(), GitletError> {
        for hi in 0..16u8 {
            for lo in 0..16u8 {
                let bucket = format!("{:x}{:x}", hi, lo);
                fs::create_dir_all(self.root.join(bucket))
                    .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
            }
        }
        Ok(())
    }

    fn object_path(&self, fingerprint: &str) -> PathBuf {
        self.root
            .join(&fingerprint[..2])
            .join(&fingerprint[2..])
    }

    /// Store the file at `path` as a blob, moving it out of its source
    /// directory (commit drains the staging area through this). When the
    /// target already exists the contents are identical, so the source is
    /// simply dropped.
    pub fn put_blob(&self, path: &Path) -> Result<String, GitletError> {
        let fingerprint = utils::fingerprint_file(path)?;
        let target = self.object_path(&fingerprint);
        if target.exists() {
            fs::remove_file(path).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        } else if fs::rename(path, &target).is_err() {
            utils::copy_to(path, &target)?;
            fs::remove_file(path).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        }
        Ok(fingerprint)
    }

    pub fn get_blob(&self, fingerprint: &str) -> Result<Vec<u8>, GitletError> {
        fs::read(self.object_path(fingerprint)).map_err(|e| GitletError::Io(format!("{:?}", e)))
    }

    /// Serialize, fingerprint and store a commit record. The stored bytes
    /// are exactly the fingerprinted serialization.
    pub fn put_commit(&self, commit: &Commit) -> Result<String, GitletError> {
        let content =
            serde_json::to_string(commit).map_err(|e| GitletError::Serde(format!("{:?}", e)))?;
        let fingerprint = utils::fingerprint_bytes(content.as_bytes());
        fs::write(self.object_path(&fingerprint), content)
            .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        info!("stored commit {}", fingerprint);
        Ok(fingerprint)
    }

    /// Load a commit by full 40-hex id. An id that names nothing, or names
    /// a blob, reports no-such-commit.
    pub fn get_commit(&self, fingerprint: &str) -> Result<Commit, GitletError> {
        if fingerprint.len() != FINGERPRINT_LEN || !fingerprint.is_ascii() {
            return Err(GitletError::NoSuchCommit);
        }
        let path = self.object_path(fingerprint);
        if !path.is_file() {
            return Err(GitletError::NoSuchCommit);
        }
        let content =
            fs::read_to_string(&path).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        serde_json::from_str(&content).map_err(|_| GitletError::NoSuchCommit)
    }

    /// Resolve a commit id prefix of length >= 2. Scans the bucket named by
    /// the first two characters for commit records whose filename begins
    /// with the rest; a prefix matching more than one commit is an error.
    pub fn find_commit(&self, prefix: &str) -> Result<(String, Commit), GitletError> {
        if prefix.len() < 2 || prefix.len() > FINGERPRINT_LEN || !prefix.is_ascii() {
            return Err(GitletError::NoSuchCommit);
        }
        if prefix.len() == FINGERPRINT_LEN {
            return Ok((prefix.to_string(), self.get_commit(prefix)?));
        }
        let bucket = self.root.join(&prefix[..2]);
        if !bucket.is_dir() {
            return Err(GitletError::NoSuchCommit);
        }
        let rest = &prefix[2..];
        let mut matches: Vec<(String, Commit)> = Vec::new();
        for entry in fs::read_dir(&bucket).map_err(|e| GitletError::Io(format!("{:?}", e)))? {
            let entry = entry.map_err(|e| GitletError::Io(format!("{:?}", e)))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.len() != BUCKET_NAME_LEN || !name.starts_with(rest) {
                continue;
            }
            let content = fs::read_to_string(entry.path())
                .map_err(|e| GitletError::Io(format!("{:?}", e)))?;
            // blobs share the bucket; anything that does not parse as a
            // commit record is one of them
            if let Ok(commit) = serde_json::from_str::<Commit>(&content) {
                matches.push((format!("{}{}", &prefix[..2], name), commit));
            }
        }
        match matches.len() {
            0 => Err(GitletError::NoSuchCommit),
            1 => Ok(matches.remove(0)),
            _ => Err(GitletError::AmbiguousCommit),
        }
    }
}
