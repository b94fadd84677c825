//! Error types shared by the git layer and the application shell.

use std::io;

use thiserror::Error;

/// Failure of a single git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be started at all.
    #[error("failed to run git: {0}")]
    Spawn(#[from] io::Error),

    /// git ran but exited unsuccessfully.
    #[error("git {args} failed ({code}): {stderr}")]
    Failed {
        args: String,
        code: String,
        stderr: String,
    },
}

impl GitError {
    pub(crate) fn failed(args: &[&str], code: Option<i32>, stderr: &[u8]) -> Self {
        GitError::Failed {
            args: args.join(" "),
            code: code.map_or_else(|| "signal".to_string(), |c| format!("exit {c}")),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

/// Fatal startup errors. Everything past terminal setup is recovered in-loop.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_error_reads_like_a_command_line() {
        let err = GitError::failed(&["stash", "pop"], Some(1), b"  conflict\n");
        assert_eq!(err.to_string(), "git stash pop failed (exit 1): conflict");
    }

    #[test]
    fn killed_process_reports_signal() {
        let err = GitError::failed(&["fetch"], None, b"");
        assert!(err.to_string().contains("(signal)"));
    }
}
