use crate::error::GitletError;
use crate::repo::GitletRepository;
use clap::Parser;

#[derive(Debug, Parser)]
#[clap(name = "gitlet")]
pub enum GitletCommand {
    /// Create a new Gitlet version-control system in the current directory.
    ///
    /// The new repository starts with a single `master` branch pointing at
    /// an initial commit with an empty snapshot.
    ///
    /// Failure cases: if a repository already exists here, print
    /// `A Gitlet version-control system already exists in the current
    /// directory.`
    #[clap(name = "init")]
    Init {},
    /// add [file name | .]
    ///
    /// Description: stage the file for inclusion in the next commit,
    /// copying its current contents into the staging area. `add .` stages
    /// every regular file in the working directory. Staging a file whose
    /// contents equal the tracked version clears any pending staged copy,
    /// and adding a file cancels a staged removal of the same name.
    ///
    /// Failure cases: if the file does not exist, print
    /// `File does not exist.`
    Add {
        file: String,
    },
    /// rm [file name]
    ///
    /// Description: unstage the file if it is currently staged for
    /// addition. If the file is tracked in the current commit, stage it
    /// for removal and delete it from the working directory.
    ///
    /// Failure cases: if the file is neither staged nor tracked by the
    /// head commit, print `No reason to remove the file.`
    Rm {
        file: String,
    },
    /// commit [message]
    ///
    /// Description: save a snapshot of the tracked files from the current
    /// commit and the staging area. Staged additions replace or extend the
    /// parent's snapshot, staged removals drop files from it, and the
    /// staging area is emptied afterwards.
    ///
    /// Failure cases: nothing staged prints `No changes added to the
    /// commit.`; an empty message prints `Please enter a commit message.`
    Commit {
        message: String,
    },
    /// Show the history of the current branch, following first parents
    /// only.
    #[clap(name = "log")]
    Log {},
    /// Show every commit ever made in this repository, newest first.
    #[clap(name = "global-log")]
    GlobalLog {},
    /// Print the ids of all commits whose message equals the operand.
    Find {
        message: String,
    },
    /// Usage: gitlet status
    ///
    /// Description: displays what branches currently exist, marking the
    /// current branch with a *, then the files staged for addition or
    /// removal, the unstaged modifications, and the untracked files.
    ///
    /// Example:
    /// === Branches ===
    /// *master
    /// other-branch
    ///
    /// === Staged Files ===
    /// wug.txt
    ///
    /// === Removed Files ===
    /// goodbye.txt
    ///
    /// === Modifications Not Staged For Commit ===
    /// junk.txt (deleted)
    /// wug3.txt (modified)
    ///
    /// === Untracked Files ===
    /// random.stuff
    #[clap(name = "status")]
    Status {},
    /// Create a new branch pointing at the current commit. Does not switch
    /// to it.
    Branch {
        name: String,
    },
    /// Delete the branch pointer with the given name; its commits remain.
    #[clap(name = "rm-branch")]
    RmBranch {
        name: String,
    },
    /// checkout [branch] | checkout -- [file] | checkout [commit id] -- [file]
    ///
    /// The first form switches the active branch and materializes its tip.
    /// The other two restore one file, from the current tip or from the
    /// named commit (id prefixes are accepted).
    Checkout {
        /// Branch name, or commit id when a file follows.
        target: Option<String>,
        /// File to restore, after `--`.
        #[arg(last = true)]
        file: Option<String>,
    },
    /// Move the current branch to the given commit and check it out.
    Reset {
        commit: String,
    },
    /// Merge the given branch into the current one.
    Merge {
        branch: String,
    },
}

impl GitletCommand {
    pub fn execute(self) {
        let mut repo = GitletRepository::new();
        match self {
            GitletCommand::Init {} => report(repo.init()),
            GitletCommand::Add { file } => report(repo.add(&file)),
            GitletCommand::Rm { file } => report(repo.remove(&file)),
            GitletCommand::Commit { message } => report(repo.commit(&message)),
            GitletCommand::Log {} => match repo.log() {
                Ok(out) => println!("{}", out),
                Err(err) => report_err(err),
            },
            GitletCommand::GlobalLog {} => match repo.global_log() {
                Ok(out) => print!("{}", out),
                Err(err) => report_err(err),
            },
            GitletCommand::Find { message } => match repo.find(&message) {
                Ok(out) => println!("{}", out),
                Err(err) => report_err(err),
            },
            GitletCommand::Status {} => match repo.status() {
                Ok(out) => println!("{}", out),
                Err(err) => report_err(err),
            },
            GitletCommand::Branch { name } => report(repo.branch(&name)),
            GitletCommand::RmBranch { name } => report(repo.rm_branch(&name)),
            GitletCommand::Checkout { target, file } => match (target, file) {
                (Some(branch), None) => report(repo.checkout_branch(&branch)),
                (None, Some(file)) => report(repo.checkout_file(&file)),
                (Some(commit), Some(file)) => report(repo.checkout_file_at(&commit, &file)),
                (None, None) => println!("{}", GitletError::IncorrectOperands),
            },
            GitletCommand::Reset { commit } => report(repo.reset(&commit)),
            GitletCommand::Merge { branch } => match repo.merge(&branch) {
                Ok(Some(outcome)) => println!("{}", outcome),
                Ok(None) => {}
                Err(err) => report_err(err),
            },
        }
    }
}

fn report(result: Result<(), GitletError>) {
    if let Err(err) = result {
        report_err(err);
    }
}

fn report_err(err: GitletError) {
    if err.is_user() {
        println!("{}", err);
    } else {
        eprintln!("gitlet: {}", err);
    }
}
