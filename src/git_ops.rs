use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tracing::{debug, warn};

use crate::error::GitError;

/// Files above this size are never diffed or previewed.
pub const MAX_DIFF_FILE_SIZE: u64 = 1024 * 1024;
const MAX_DIFF_LINES: usize = 200;
const MAX_DIFF_LINE_LEN: usize = 500;
const MAX_ADDITION_LINES: usize = 100;
const MAX_ADDITION_LINE_LEN: usize = 200;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub branch: String,
    pub upstream: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    pub modified: usize,
    pub untracked: usize,
    pub staged: usize,
}

impl RepoStatus {
    pub fn is_dirty(&self) -> bool {
        self.modified > 0 || self.untracked > 0 || self.staged > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Modified,
    Deleted,
    Added,
    Staged,
    StagedDeleted,
    Renamed,
    Copied,
    Untracked,
    Ignored,
    Clean,
    Unknown,
}

impl FileStatus {
    /// Classify a porcelain `XY` pair. Worktree state wins over index state.
    pub fn from_xy(x: char, y: char) -> Self {
        match (x, y) {
            ('!', '!') => FileStatus::Ignored,
            (_, '?') => FileStatus::Untracked,
            (_, 'M') => FileStatus::Modified,
            (_, 'D') => FileStatus::Deleted,
            ('A', _) => FileStatus::Added,
            ('M', _) => FileStatus::Staged,
            ('D', _) => FileStatus::StagedDeleted,
            ('R', _) => FileStatus::Renamed,
            ('C', _) => FileStatus::Copied,
            _ => FileStatus::Clean,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Added => "added",
            FileStatus::Staged => "staged",
            FileStatus::StagedDeleted => "staged_deleted",
            FileStatus::Renamed => "renamed",
            FileStatus::Copied => "copied",
            FileStatus::Untracked => "untracked",
            FileStatus::Ignored => "ignored",
            FileStatus::Clean => "tracked",
            FileStatus::Unknown => "unknown",
        }
    }

    /// Single column marker shown in front of file names.
    pub fn marker(self) -> char {
        match self {
            FileStatus::Modified => 'M',
            FileStatus::Added => 'A',
            FileStatus::Deleted | FileStatus::StagedDeleted => 'D',
            FileStatus::Staged => 'S',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
            FileStatus::Untracked => '?',
            FileStatus::Ignored => '!',
            FileStatus::Unknown => '~',
            FileStatus::Clean => ' ',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub status: FileStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
    /// Reflog selector (`HEAD@{n}`) when the entry comes from the reflog.
    pub selector: Option<String>,
}

impl Commit {
    /// Two letter author tag shown in the log column.
    pub fn author_tag(&self) -> String {
        author_initials(&self.author)
    }

    pub fn is_merge(&self) -> bool {
        self.message.to_lowercase().contains("merge")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    pub upstream: Option<String>,
}

/// Porcelain status of a whole repository, keyed by repo-relative path.
#[derive(Clone, Debug, Default)]
pub struct StatusMap {
    toplevel: PathBuf,
    entries: HashMap<String, FileStatus>,
}

impl StatusMap {
    pub fn lookup(&self, path: &Path) -> FileStatus {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let Ok(rel) = canonical.strip_prefix(&self.toplevel) else {
            return FileStatus::Unknown;
        };
        let key = rel.to_string_lossy().replace('\\', "/");
        if let Some(status) = self.entries.get(&key) {
            return *status;
        }
        // untracked directories are reported once, as `dir/`
        let mut prefix = String::new();
        for part in key.split('/') {
            prefix.push_str(part);
            prefix.push('/');
            if self.entries.get(&prefix) == Some(&FileStatus::Untracked) {
                return FileStatus::Untracked;
            }
        }
        FileStatus::Clean
    }
}

fn run_git(cwd: &Path, args: &[&str]) -> io::Result<Output> {
    Command::new("git")
        .arg("-C")
        .arg(cwd)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_PAGER", "cat")
        .env("PAGER", "cat")
        .env("GIT_EDITOR", ":")
        .env("EDITOR", ":")
        .env("GIT_SEQUENCE_EDITOR", ":")
        .env("GIT_MERGE_AUTOEDIT", "no")
        .output()
}

fn git_bytes(cwd: &Path, args: &[&str]) -> Result<Vec<u8>, GitError> {
    debug!(?args, "git");
    let out = run_git(cwd, args)?;
    if !out.status.success() {
        return Err(GitError::failed(args, out.status.code(), &out.stderr));
    }
    Ok(out.stdout)
}

fn git_text(cwd: &Path, args: &[&str]) -> Result<String, GitError> {
    git_bytes(cwd, args).map(|b| String::from_utf8_lossy(&b).to_string())
}

pub fn current_branch(repo: &Path) -> String {
    git_text(repo, &["branch", "--show-current"])
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub fn upstream(repo: &Path) -> Option<String> {
    git_text(repo, &["rev-parse", "--abbrev-ref", "@{upstream}"])
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Working tree summary. A missing upstream is not an error.
pub fn status(repo: &Path) -> Result<RepoStatus, GitError> {
    let mut status = RepoStatus {
        branch: current_branch(repo),
        ..RepoStatus::default()
    };

    let raw = git_bytes(repo, &["status", "--porcelain=v1", "-z"])?;
    for (x, y, _) in parse_porcelain(&raw) {
        if x != ' ' && x != '?' {
            status.staged += 1;
        }
        match y {
            ' ' => {}
            '?' => status.untracked += 1,
            _ => status.modified += 1,
        }
    }

    status.upstream = upstream(repo);
    if status.upstream.is_some() {
        match git_text(
            repo,
            &["rev-list", "--left-right", "--count", "HEAD...@{upstream}"],
        ) {
            Ok(counts) => {
                if let Some((ahead, behind)) = parse_ahead_behind(&counts) {
                    status.ahead = ahead;
                    status.behind = behind;
                }
            }
            Err(e) => warn!("ahead/behind lookup failed: {e}"),
        }
    }

    Ok(status)
}

/// Split `git status --porcelain=v1 -z` output into `(x, y, path)`.
pub fn parse_porcelain(raw: &[u8]) -> Vec<(char, char, String)> {
    let records: Vec<&[u8]> = raw.split(|b| *b == 0).filter(|r| !r.is_empty()).collect();
    let mut entries = Vec::new();
    let mut i = 0;
    while i < records.len() {
        let rec = String::from_utf8_lossy(records[i]);
        i += 1;
        if rec.len() < 4 {
            continue;
        }
        let mut chars = rec.chars();
        let x = chars.next().unwrap_or(' ');
        let y = chars.next().unwrap_or(' ');
        let path = rec[3..].to_string();
        // renames and copies carry the source path as an extra record
        if x == 'R' || x == 'C' {
            i += 1;
        }
        entries.push((x, y, path));
    }
    entries
}

pub fn parse_ahead_behind(counts: &str) -> Option<(u32, u32)> {
    let mut parts = counts.split_whitespace();
    let ahead = parts.next()?.parse().ok()?;
    let behind = parts.next()?.parse().ok()?;
    Some((ahead, behind))
}

pub fn file_status(repo: &Path, path: &Path) -> Result<FileStatus, GitError> {
    let path_s = path.to_string_lossy();
    let raw = git_bytes(repo, &["status", "--porcelain=v1", "-z", "--", &path_s])?;
    Ok(parse_porcelain(&raw)
        .first()
        .map(|(x, y, _)| FileStatus::from_xy(*x, *y))
        .unwrap_or(FileStatus::Clean))
}

pub fn status_map(repo: &Path) -> Result<StatusMap, GitError> {
    let toplevel = git_text(repo, &["rev-parse", "--show-toplevel"])?;
    let toplevel = PathBuf::from(toplevel.trim());
    let toplevel = toplevel.canonicalize().unwrap_or(toplevel);
    let raw = git_bytes(repo, &["status", "--porcelain=v1", "-z"])?;
    let entries = parse_porcelain(&raw)
        .into_iter()
        .map(|(x, y, path)| (path, FileStatus::from_xy(x, y)))
        .collect();
    Ok(StatusMap { toplevel, entries })
}

pub fn branches(repo: &Path) -> Result<Vec<Branch>, GitError> {
    let format = "%(HEAD)\t%(refname:short)\t%(upstream:short)";
    let local = git_text(repo, &["for-each-ref", "refs/heads", "--format", format])?;
    let remote = git_text(repo, &["for-each-ref", "refs/remotes", "--format", format])?;

    let mut out = parse_branch_refs(&local, false);
    out.extend(parse_branch_refs(&remote, true));
    Ok(out)
}

pub fn parse_branch_refs(text: &str, is_remote: bool) -> Vec<Branch> {
    let mut branches = Vec::new();
    for line in text.lines() {
        let mut it = line.split('\t');
        let head = it.next().unwrap_or("").trim();
        let name = it.next().unwrap_or("").trim().to_string();
        // `origin/HEAD` is an alias, and bare remote names show up as `origin`
        if name.is_empty() || (is_remote && (name.ends_with("/HEAD") || !name.contains('/'))) {
            continue;
        }
        let upstream = it
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        branches.push(Branch {
            name,
            is_current: head == "*",
            is_remote,
            upstream,
        });
    }
    branches
}

pub fn tags(repo: &Path) -> Result<Vec<String>, GitError> {
    let text = git_text(repo, &["tag", "--list", "--sort=-creatordate"])?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn commits(repo: &Path, limit: usize) -> Result<Vec<Commit>, GitError> {
    let limit_s = limit.to_string();
    let text = git_text(
        repo,
        &[
            "log",
            "--no-color",
            "--date=short",
            "--max-count",
            limit_s.as_str(),
            "--pretty=format:%H\t%h\t%an\t%ad\t%s",
        ],
    )?;
    Ok(parse_log(&text))
}

pub fn parse_log(text: &str) -> Vec<Commit> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let mut it = line.splitn(5, '\t');
        let hash = it.next().unwrap_or("").trim().to_string();
        if hash.is_empty() {
            continue;
        }
        let short_hash = it.next().unwrap_or("").trim().to_string();
        let author = it.next().unwrap_or("").trim().to_string();
        let date = it.next().unwrap_or("").trim().to_string();
        let message = it.next().unwrap_or("").trim().to_string();
        entries.push(Commit {
            hash,
            short_hash,
            author,
            date,
            message,
            selector: None,
        });
    }
    entries
}

pub fn reflog(repo: &Path, limit: usize) -> Result<Vec<Commit>, GitError> {
    let limit_s = limit.to_string();
    let text = git_text(
        repo,
        &[
            "log",
            "-g",
            "--no-color",
            "--date=short",
            "--max-count",
            limit_s.as_str(),
            "--pretty=format:%H\t%h\t%gD\t%an\t%ad\t%gs",
        ],
    )?;

    let mut entries = Vec::new();
    for line in text.lines() {
        let mut it = line.splitn(6, '\t');
        let hash = it.next().unwrap_or("").trim().to_string();
        if hash.is_empty() {
            continue;
        }
        let short_hash = it.next().unwrap_or("").trim().to_string();
        let selector = it.next().map(|s| s.trim().to_string());
        let author = it.next().unwrap_or("").trim().to_string();
        let date = it.next().unwrap_or("").trim().to_string();
        let message = it.next().unwrap_or("").trim().to_string();
        entries.push(Commit {
            hash,
            short_hash,
            author,
            date,
            message,
            selector,
        });
    }
    Ok(entries)
}

/// Raw `git stash list` lines, e.g. `stash@{0}: On main: wip`.
pub fn stashes(repo: &Path) -> Result<Vec<String>, GitError> {
    let text = git_text(repo, &["stash", "list", "--no-color"])?;
    Ok(text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// The `stash@{n}` selector of a stash list line, falling back to its position.
pub fn stash_ref(line: &str, index: usize) -> String {
    if line.starts_with("stash@{")
        && let Some(end) = line.find('}')
    {
        return line[..=end].to_string();
    }
    format!("stash@{{{index}}}")
}

pub fn stage(repo: &Path, path: &Path) -> Result<(), GitError> {
    let path_s = path.to_string_lossy();
    git_bytes(repo, &["add", "--", &path_s]).map(|_| ())
}

pub fn unstage(repo: &Path, path: &Path) -> Result<(), GitError> {
    let path_s = path.to_string_lossy();
    git_bytes(repo, &["reset", "-q", "HEAD", "--", &path_s]).map(|_| ())
}

pub fn fetch(repo: &Path) -> Result<(), GitError> {
    git_bytes(repo, &["fetch"]).map(|_| ())
}

/// Run a mutating command and return its combined, trimmed output.
pub fn run_action(repo: &Path, args: &[&str]) -> Result<String, GitError> {
    debug!(?args, "git action");
    let out = run_git(repo, args)?;
    if !out.status.success() {
        return Err(GitError::failed(args, out.status.code(), &out.stderr));
    }
    let mut text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    let err = String::from_utf8_lossy(&out.stderr).trim().to_string();
    if !err.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&err);
    }
    Ok(text)
}

/// Diff of a working tree path, staged diff as fallback, and a synthetic
/// addition for untracked files.
pub fn file_diff(repo: &Path, path: &Path) -> Result<Vec<String>, GitError> {
    if let Ok(meta) = fs::metadata(path)
        && meta.len() > MAX_DIFF_FILE_SIZE
    {
        return Ok(vec![format!(
            "File too large ({} bytes) - diff not shown",
            meta.len()
        )]);
    }

    let path_s = path.to_string_lossy();
    let unstaged = git_text(repo, &["diff", "--no-color", "--", &path_s])?;
    if !unstaged.trim().is_empty() {
        return Ok(truncate_diff(&unstaged));
    }

    let staged = git_text(repo, &["diff", "--no-color", "--cached", "--", &path_s])?;
    if !staged.trim().is_empty() {
        return Ok(truncate_diff(&staged));
    }

    match file_status(repo, path)? {
        FileStatus::Untracked | FileStatus::Clean => Ok(file_as_addition(path)),
        _ => Ok(Vec::new()),
    }
}

pub fn commit_diff(repo: &Path, hash: &str) -> Result<Vec<String>, GitError> {
    let text = git_text(repo, &["show", "--no-color", "--stat", "--patch", hash])?;
    Ok(truncate_diff(&text))
}

pub fn stash_diff(repo: &Path, selector: &str) -> Result<Vec<String>, GitError> {
    let text = git_text(repo, &["stash", "show", "--no-color", "-p", selector])?;
    Ok(truncate_diff(&text))
}

pub fn truncate_diff(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .lines()
        .take(MAX_DIFF_LINES)
        .map(|l| truncate_line(l, MAX_DIFF_LINE_LEN))
        .collect();
    if text.lines().count() > MAX_DIFF_LINES {
        lines.push(format!(
            "... (diff truncated, showing first {MAX_DIFF_LINES} lines)"
        ));
    }
    lines
}

fn truncate_line(line: &str, max: usize) -> String {
    match line.char_indices().nth(max) {
        Some((cut, _)) => format!("{}... (line truncated)", &line[..cut]),
        None => line.to_string(),
    }
}

/// Render a file that git does not know yet as an all-added diff.
pub fn file_as_addition(path: &Path) -> Vec<String> {
    let meta = match fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        _ => return Vec::new(),
    };
    if meta.len() > MAX_DIFF_FILE_SIZE {
        return vec![format!("File too large ({} bytes) - diff not shown", meta.len())];
    }

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => return vec![format!("Error reading file: {e}")],
    };
    let content = sanitize_content(&String::from_utf8_lossy(&bytes));

    let mut body: Vec<String> = content
        .lines()
        .take(MAX_ADDITION_LINES)
        .map(|l| truncate_line(l, MAX_ADDITION_LINE_LEN))
        .collect();
    if content.lines().count() > MAX_ADDITION_LINES {
        body.push(format!(
            "... (file truncated, showing first {MAX_ADDITION_LINES} lines)"
        ));
    }

    let shown = path.to_string_lossy();
    let mut lines = vec![
        format!("diff --git a/{shown} b/{shown}"),
        "new file mode 100644".to_string(),
        "index 0000000..0000000".to_string(),
        "--- /dev/null".to_string(),
        format!("+++ b/{shown}"),
        format!("@@ -0,0 +1,{} @@", body.len()),
    ];
    lines.extend(body.into_iter().map(|l| format!("+{l}")));
    lines
}

/// Escape control characters; binary content collapses into one placeholder.
pub fn sanitize_content(content: &str) -> String {
    if is_binary_content(content) {
        return format!("Binary file ({} bytes) - content not shown", content.len());
    }
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        match ch {
            '\n' | '\t' => out.push(ch),
            c if (c as u32) < 32 || c as u32 == 127 => {
                out.push_str(&format!("\\x{:02x}", c as u32))
            }
            c => out.push(c),
        }
    }
    out
}

/// More than 30% control characters within the first 1000 chars.
pub fn is_binary_content(content: &str) -> bool {
    let mut total = 0usize;
    let mut control = 0usize;
    for ch in content.chars().take(1000) {
        total += 1;
        if (ch as u32) < 32 && !matches!(ch, '\n' | '\t' | '\r') {
            control += 1;
        }
    }
    total > 0 && control * 10 > total * 3
}

pub fn author_initials(author: &str) -> String {
    let words: Vec<&str> = author.split_whitespace().collect();
    let tag: String = match words.as_slice() {
        [] => return "??".to_string(),
        [single] => single.chars().take(2).collect(),
        [first, .., last] => first.chars().take(1).chain(last.chars().take(1)).collect(),
    };
    tag.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn porcelain_counts_are_exact() {
        let raw =
            b" M src/a.rs\0M  src/b.rs\0MM src/c.rs\0?? new.txt\0?? other/\0R  to.rs\0from.rs\0";
        let entries = parse_porcelain(raw);
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[5], ('R', ' ', "to.rs".to_string()));

        let staged = entries.iter().filter(|(x, _, _)| *x != ' ' && *x != '?').count();
        let untracked = entries.iter().filter(|(_, y, _)| *y == '?').count();
        let modified = entries.iter().filter(|(_, y, _)| *y != ' ' && *y != '?').count();
        assert_eq!((staged, untracked, modified), (3, 2, 2));
    }

    #[test]
    fn file_status_prefers_worktree_state() {
        assert_eq!(FileStatus::from_xy('?', '?'), FileStatus::Untracked);
        assert_eq!(FileStatus::from_xy('M', 'M'), FileStatus::Modified);
        assert_eq!(FileStatus::from_xy('A', ' '), FileStatus::Added);
        assert_eq!(FileStatus::from_xy('M', ' '), FileStatus::Staged);
        assert_eq!(FileStatus::from_xy('D', ' '), FileStatus::StagedDeleted);
        assert_eq!(FileStatus::from_xy(' ', 'D'), FileStatus::Deleted);
        assert_eq!(FileStatus::from_xy('R', ' '), FileStatus::Renamed);
        assert_eq!(FileStatus::from_xy('!', '!'), FileStatus::Ignored);
        assert_eq!(FileStatus::from_xy(' ', ' '), FileStatus::Clean);
    }

    #[test]
    fn ahead_behind_reports_counts() {
        assert_eq!(parse_ahead_behind("3\t12\n"), Some((3, 12)));
        assert_eq!(parse_ahead_behind("0 0"), Some((0, 0)));
        assert_eq!(parse_ahead_behind("garbage"), None);
    }

    #[test]
    fn branch_refs_skip_remote_aliases() {
        let local = "*\tmain\torigin/main\n \tfeature/auth\t\n";
        let remote = " \torigin/HEAD\t\n \torigin\t\n \torigin/main\t\n";
        let mut all = parse_branch_refs(local, false);
        all.extend(parse_branch_refs(remote, true));

        let names: Vec<&str> = all.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["main", "feature/auth", "origin/main"]);
        assert!(all[0].is_current);
        assert_eq!(all[0].upstream.as_deref(), Some("origin/main"));
        assert!(all[2].is_remote);
    }

    #[test]
    fn log_lines_parse_with_tabs_in_subject() {
        let text = "abc123\tabc\tAda Lovelace\t2024-05-01\tMerge branch 'x'\tmore\n\n";
        let commits = parse_log(text);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].short_hash, "abc");
        assert_eq!(commits[0].message, "Merge branch 'x'\tmore");
        assert_eq!(commits[0].author_tag(), "AL");
        assert!(commits[0].is_merge());
    }

    #[test]
    fn initials_cover_odd_names() {
        assert_eq!(author_initials("grace"), "GR");
        assert_eq!(author_initials("  "), "??");
        assert_eq!(author_initials("Jean Luc Picard"), "JP");
    }

    #[test]
    fn stash_ref_extraction() {
        assert_eq!(stash_ref("stash@{3}: On main: wip", 0), "stash@{3}");
        assert_eq!(stash_ref("weird line", 2), "stash@{2}");
    }

    #[test]
    fn long_diffs_are_truncated_with_marker() {
        let text: String = (0..250).map(|i| format!("+line {i}\n")).collect();
        let lines = truncate_diff(&text);
        assert_eq!(lines.len(), MAX_DIFF_LINES + 1);
        assert!(lines.last().is_some_and(|l| l.contains("diff truncated")));

        let wide = "x".repeat(600);
        let lines = truncate_diff(&wide);
        assert!(lines[0].ends_with("... (line truncated)"));
        assert_eq!(lines[0].chars().filter(|c| *c == 'x').count(), MAX_DIFF_LINE_LEN);
    }

    #[test]
    fn binary_detection_uses_control_ratio() {
        assert!(!is_binary_content("plain text\nwith\ttabs\r\n"));
        assert!(is_binary_content("\x00\x01\x02\x03ab"));
        assert!(!is_binary_content(""));
    }

    #[test]
    fn sanitize_escapes_isolated_control_chars() {
        let out = sanitize_content("bell\x07 here\n");
        assert_eq!(out, "bell\\x07 here\n");
    }

    #[test]
    fn untracked_file_renders_as_addition() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..120 {
            writeln!(file, "row {i}").unwrap();
        }
        file.flush().unwrap();

        let lines = file_as_addition(file.path());
        assert!(lines[0].starts_with("diff --git"));
        assert_eq!(lines[5], format!("@@ -0,0 +1,{} @@", MAX_ADDITION_LINES + 1));
        assert_eq!(lines[6], "+row 0");
        assert!(lines.last().unwrap().contains("file truncated"));
    }

    #[test]
    fn addition_of_missing_path_is_empty() {
        assert!(file_as_addition(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn status_map_resolves_untracked_directories() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().canonicalize().unwrap();
        std::fs::create_dir(top.join("new")).unwrap();
        std::fs::write(top.join("new/inner.txt"), "x").unwrap();
        std::fs::write(top.join("tracked.rs"), "x").unwrap();

        let mut entries = HashMap::new();
        entries.insert("new/".to_string(), FileStatus::Untracked);
        let map = StatusMap {
            toplevel: top.clone(),
            entries,
        };
        assert_eq!(map.lookup(&top.join("new/inner.txt")), FileStatus::Untracked);
        assert_eq!(map.lookup(&top.join("tracked.rs")), FileStatus::Clean);
        assert_eq!(map.lookup(Path::new("/elsewhere")), FileStatus::Unknown);
    }
}
