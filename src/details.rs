//! Right-hand detail view: cursor/scroll model, derived lines and the diff cache.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::RwLock;

use crate::list::{ItemKind, ItemMeta, ListItem};

const DIFF_CACHE_CAPACITY: usize = 64;

#[derive(Clone, Debug, Default)]
pub struct DetailsPane {
    pub selected_line: usize,
    pub scroll: usize,
    pub lines: Vec<String>,
}

impl DetailsPane {
    pub fn reset(&mut self) {
        self.selected_line = 0;
        self.scroll = 0;
    }

    /// Replace the content; the cursor is kept only when the content is unchanged.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        if lines != self.lines {
            self.lines = lines;
            self.reset();
        }
    }

    pub fn move_down(&mut self) {
        if self.selected_line + 1 < self.lines.len() {
            self.selected_line += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected_line = self.selected_line.saturating_sub(1);
    }

    pub fn move_to_top(&mut self) {
        self.selected_line = 0;
        self.scroll = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.selected_line = self.lines.len().saturating_sub(1);
    }

    /// Keep the cursor inside a viewport of `max` lines.
    pub fn adjust_scroll(&mut self, max: usize) {
        let max = max.max(1);
        if self.selected_line < self.scroll {
            self.scroll = self.selected_line;
        } else if self.selected_line >= self.scroll + max {
            self.scroll = self.selected_line + 1 - max;
        }
    }

    pub fn scroll_down(&mut self, max: usize) {
        let limit = self.lines.len().saturating_sub(max.max(1));
        if self.scroll < limit {
            self.scroll += 1;
        }
        if self.selected_line < self.scroll {
            self.selected_line = self.scroll;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

/// Cache key under which an item's diff is stored, if it has one.
pub fn diff_key(item: &ListItem) -> Option<String> {
    match &item.meta {
        ItemMeta::File(f) if !f.is_dir => Some(format!("file:{}", f.path.display())),
        ItemMeta::Commit(c) => Some(format!("commit:{}", c.hash)),
        _ if item.kind == ItemKind::Stash => Some(format!("stash:{}", item.value)),
        _ => None,
    }
}

fn payload_lines(meta: &ItemMeta) -> Vec<String> {
    match meta {
        ItemMeta::None => Vec::new(),
        ItemMeta::Status(s) => {
            let mut out = vec![format!("Branch: {}", s.branch)];
            if let Some(up) = &s.upstream {
                out.push(format!("Upstream: {up}"));
                out.push(format!("Ahead: {}  Behind: {}", s.ahead, s.behind));
            }
            out.push(format!(
                "Modified: {}  Staged: {}  Untracked: {}",
                s.modified, s.staged, s.untracked
            ));
            out
        }
        ItemMeta::Commit(c) => {
            let mut out = vec![
                format!("Hash: {}", c.hash),
                format!("Author: {}", c.author),
                format!("Date: {}", c.date),
                format!("Message: {}", c.message),
            ];
            if let Some(sel) = &c.selector {
                out.push(format!("Reflog: {sel}"));
            }
            out
        }
        ItemMeta::Branch(b) => vec![
            format!("Branch: {}", b.name),
            format!("Current: {}", if b.is_current { "yes" } else { "no" }),
            format!("Remote: {}", if b.is_remote { "yes" } else { "no" }),
            format!("Upstream: {}", b.upstream.as_deref().unwrap_or("none")),
        ],
        ItemMeta::File(f) => vec![
            format!("Path: {}", f.path.display()),
            format!("Status: {}", f.status.as_str()),
            format!("Directory: {}", if f.is_dir { "yes" } else { "no" }),
        ],
        ItemMeta::PullRequest(pr) => vec![
            format!("Title: {}", pr.title),
            format!("Package: {}", pr.package),
            format!("Author: {}", pr.author),
            format!("Status: {}", pr.status.as_str()),
            format!("Created: {}", pr.created.format("%Y-%m-%d %H:%M")),
        ],
        ItemMeta::Package(p) => vec![
            format!("Branch: {}", p.branch),
            format!("Last commit: {}", p.last_commit),
            format!("Last author: {}", p.last_author),
            format!("Modified files: {}", p.modified_files),
            format!("Description: {}", p.description),
        ],
        ItemMeta::Workspace(w) => vec![
            format!("Workspace: {}", w.name),
            format!("Version set: {}", w.version_set),
        ],
    }
}

/// Lines shown for the active pane's selection. Pure: reads the cache only.
pub fn derive_lines(item: Option<&ListItem>, pane_title: &str, diffs: &DiffCache) -> Vec<String> {
    let Some(item) = item else {
        return vec!["Select an item to see details".to_string()];
    };

    if let Some(lines) = diff_key(item).and_then(|key| diffs.get(&key)) {
        return lines;
    }

    let mut lines = vec![
        "Selected Item Details:".to_string(),
        String::new(),
        format!("Name: {}", item.display),
        format!("Value: {}", item.value),
        format!("Type: {}", item.kind.as_str()),
    ];
    lines.extend(payload_lines(&item.meta));
    lines.push(String::new());
    lines.push(format!("From: {pane_title} pane"));
    lines
}

/// Thread-safe LRU of diff lines keyed by [`diff_key`].
pub struct DiffCache {
    cache: RwLock<LruCache<String, Vec<String>>>,
}

impl Default for DiffCache {
    fn default() -> Self {
        Self::new(DIFF_CACHE_CAPACITY)
    }
}

impl DiffCache {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(cap)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        self.cache.write().get(key).cloned()
    }

    pub fn insert(&self, key: String, lines: Vec<String>) {
        self.cache.write().put(key, lines);
    }

    pub fn remove(&self, key: &str) {
        self.cache.write().pop(key);
    }

    /// Drop every entry; diffs go stale after any mutating git action.
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}
