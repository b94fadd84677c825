//! Directory listing for the files pane.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::git_ops::{FileInfo, FileStatus, StatusMap};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirListing {
    pub entries: Vec<FileInfo>,
    /// Number of directory entries before the cap and filters were applied.
    pub total: usize,
}

impl DirListing {
    pub fn truncated(&self, max_files: usize) -> bool {
        self.total > max_files
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn has_control_chars(name: &str) -> bool {
    name.chars().any(char::is_control)
}

/// Read `dir`, directories first, at most `max_files` entries considered.
///
/// Status lookups that cannot be resolved degrade to [`FileStatus::Unknown`];
/// a missing status map (not a repository, git unavailable) marks every file
/// that way.
pub fn list_dir(
    dir: &Path,
    show_hidden: bool,
    max_files: usize,
    status: Option<&StatusMap>,
) -> io::Result<DirListing> {
    let mut raw: Vec<(String, PathBuf, bool)> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (name, e.path(), is_dir)
        })
        .collect();
    raw.sort_by(|a, b| a.0.cmp(&b.0));

    let total = raw.len();
    raw.truncate(max_files);

    let (mut dirs, mut files): (Vec<FileInfo>, Vec<FileInfo>) = raw
        .into_iter()
        .filter(|(name, _, _)| show_hidden || !is_hidden(name))
        .filter(|(name, _, _)| !has_control_chars(name))
        .map(|(name, path, is_dir)| {
            let status = match status {
                Some(map) => map.lookup(&path),
                None => FileStatus::Unknown,
            };
            FileInfo {
                name,
                path,
                is_dir,
                status,
            }
        })
        .partition(|f| f.is_dir);

    dirs.append(&mut files);
    Ok(DirListing {
        entries: dirs,
        total,
    })
}

/// Parent of `current`, never leaving `root`. `None` when already at `root`.
pub fn parent_within(root: &Path, current: &Path) -> Option<PathBuf> {
    if current == root || !current.starts_with(root) {
        return None;
    }
    match current.parent() {
        Some(parent) if parent.starts_with(root) => Some(parent.to_path_buf()),
        _ => Some(root.to_path_buf()),
    }
}
