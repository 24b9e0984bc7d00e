use thiserror::Error;

/// Every user-visible failure renders its exact one-line message through
/// `Display`. `Io` and `Serde` are internal faults and go to stderr instead.
#[derive(Debug, Error)]
pub enum GitletError {
    #[error("A Gitlet version-control system already exists in the current directory.")]
    RepoExists,
    #[error("Not in an initialized Gitlet directory.")]
    NotARepo,
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("File does not exist.")]
    AddMissingFile,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("Please enter a commit message.")]
    EmptyMessage,
    #[error("No reason to remove the file.")]
    NoReasonToRemove,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,
    #[error("A branch with that name already exists.")]
    BranchExists,
    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,
    #[error("A branch with that name does not exist.")]
    BranchMissing,
    #[error("No commit with that id exists.")]
    NoSuchCommit,
    #[error("Ambiguous commit id.")]
    AmbiguousCommit,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedInTheWay,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    MergeSelf,
    #[error("file op fatal: {0}")]
    Io(String),
    #[error("serialized/deserialized fatal: {0}")]
    Serde(String),
}

impl GitletError {
    /// Recoverable user condition: printed to stdout, exit status 0.
    pub fn is_user(&self) -> bool {
        !matches!(self, GitletError::Io(_) | GitletError::Serde(_))
    }
}
