//! Completion messages and the pending effects that produce them.

use std::{fmt, path::PathBuf};

use crate::fs_list::DirListing;
use crate::git_ops::{Branch, Commit, RepoStatus};
use crate::panes::packages::Package;
use crate::panes::pull_requests::PullRequest;
use crate::panes::workspace::WorkspaceInfo;

/// Typed completion events posted back onto the event loop.
#[derive(Clone, Debug)]
pub enum Message {
    Status(RepoStatus),
    Files {
        dir: PathBuf,
        listing: Result<DirListing, String>,
    },
    Branches {
        branches: Vec<Branch>,
        tags: Vec<String>,
    },
    Commits {
        reflog: bool,
        commits: Vec<Commit>,
    },
    Stashes(Vec<String>),
    Workspace(WorkspaceInfo),
    Packages(Vec<Package>),
    PullRequests(Vec<PullRequest>),
    /// Diff lines for the detail view, keyed like `file:<path>`.
    Diff {
        key: String,
        lines: Vec<String>,
    },
    ActionComplete {
        action: String,
        success: bool,
        message: String,
    },
    /// A refresh of `pane` failed; the pane leaves its loading state.
    Failed {
        pane: &'static str,
        error: String,
    },
}

type TaskFn = Box<dyn FnOnce() -> Message + Send + 'static>;

/// Blocking unit of work run off the event loop.
pub struct Task {
    /// Id of the pane that issued the work.
    pub origin: &'static str,
    run: TaskFn,
}

impl Task {
    pub fn run(self) -> Message {
        (self.run)()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("origin", &self.origin).finish()
    }
}

/// Pending effect returned from event handling.
#[derive(Debug)]
pub enum Cmd {
    Task(Task),
    Quit,
}

impl Cmd {
    pub fn task<F>(origin: &'static str, run: F) -> Self
    where
        F: FnOnce() -> Message + Send + 'static,
    {
        Cmd::Task(Task {
            origin,
            run: Box::new(run),
        })
    }

    /// Run a task inline. Used by tests to drive completions synchronously.
    #[cfg(test)]
    pub fn run_now(self) -> Option<Message> {
        match self {
            Cmd::Task(task) => Some(task.run()),
            Cmd::Quit => None,
        }
    }
}
