//! Scrollable, selectable list shared by every pane.
//!
//! The list owns its items, a cursor and a scroll offset. Every operation that
//! can move the cursor re-runs the scroll adjustment, so for a
//! non-empty list `scroll_offset <= selected < scroll_offset + window` always
//! holds.

use crate::git_ops::{Branch, Commit, FileInfo, FileStatus, RepoStatus};
use crate::panes::packages::Package;
use crate::panes::pull_requests::PullRequest;
use crate::panes::workspace::WorkspaceInfo;

pub const DEFAULT_WINDOW: usize = 50;

/// Visual / semantic sub-category of a list entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    // status pane
    Branch,
    Status,
    Upstream,
    // workspace pane
    Name,
    Version,
    Metadata,
    // files pane
    Directory,
    File(FileStatus),
    Error,
    Info,
    // branches pane
    Current,
    Local,
    Remote,
    Tag,
    // commits pane
    Commit,
    Merge,
    Reflog,
    // stash pane
    Stash,
    Empty,
    // pull requests pane
    Open,
    Closed,
    Merged,
    // packages pane
    Active,
    Inactive,
    Greeting,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Branch => "branch",
            ItemKind::Status => "status",
            ItemKind::Upstream => "upstream",
            ItemKind::Name => "name",
            ItemKind::Version => "version",
            ItemKind::Metadata => "metadata",
            ItemKind::Directory => "directory",
            ItemKind::File(status) => status.as_str(),
            ItemKind::Error => "error",
            ItemKind::Info => "info",
            ItemKind::Current => "current",
            ItemKind::Local => "local",
            ItemKind::Remote => "remote",
            ItemKind::Tag => "tag",
            ItemKind::Commit => "commit",
            ItemKind::Merge => "merge",
            ItemKind::Reflog => "reflog",
            ItemKind::Stash => "stash",
            ItemKind::Empty => "empty",
            ItemKind::Open => "open",
            ItemKind::Closed => "closed",
            ItemKind::Merged => "merged",
            ItemKind::Active => "active",
            ItemKind::Inactive => "inactive",
            ItemKind::Greeting => "greeting",
        }
    }
}

/// Pane specific payload carried alongside an item.
#[derive(Clone, Debug, Default)]
pub enum ItemMeta {
    #[default]
    None,
    Status(RepoStatus),
    Commit(Commit),
    Branch(Branch),
    File(FileInfo),
    PullRequest(PullRequest),
    Package(Package),
    Workspace(WorkspaceInfo),
}

#[derive(Clone, Debug)]
pub struct ListItem {
    pub display: String,
    pub value: String,
    pub icon: String,
    pub kind: ItemKind,
    pub meta: ItemMeta,
    /// Reserved for multi-select; cursor movement never touches it.
    pub selected: bool,
}

impl ListItem {
    pub fn new(display: impl Into<String>, value: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            display: display.into(),
            value: value.into(),
            icon: String::new(),
            kind,
            meta: ItemMeta::None,
            selected: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_meta(mut self, meta: ItemMeta) -> Self {
        self.meta = meta;
        self
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.display.to_lowercase().contains(needle_lower)
            || self.value.to_lowercase().contains(needle_lower)
    }
}

#[derive(Clone, Debug)]
pub struct SelectableList {
    items: Vec<ListItem>,
    selected: usize,
    scroll_offset: usize,
    window: usize,
}

impl Default for SelectableList {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectableList {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            window: window.max(1),
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.items.get(self.selected)
    }

    pub fn set_window(&mut self, window: usize) {
        self.window = window.max(1);
        self.adjust_scroll();
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
        self.adjust_scroll();
    }

    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
        self.adjust_scroll();
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn move_to_bottom(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.selected = last;
            self.adjust_scroll();
        }
    }

    /// Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = index;
            self.adjust_scroll();
        }
    }

    pub fn push(&mut self, item: ListItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Option<ListItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        self.adjust_scroll();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ListItem>) {
        self.items.extend(items);
    }

    /// Items whose display text or value contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&ListItem> {
        self.filter_indices(query)
            .into_iter()
            .map(|i| &self.items[i])
            .collect()
    }

    pub fn filter_indices(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return (0..self.items.len()).collect();
        }
        let needle = query.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// The rows currently inside the scroll window.
    pub fn visible(&self) -> &[ListItem] {
        let end = (self.scroll_offset + self.window).min(self.items.len());
        let start = self.scroll_offset.min(end);
        &self.items[start..end]
    }

    fn adjust_scroll(&mut self) {
        if self.items.is_empty() {
            self.scroll_offset = 0;
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        if self.selected >= self.scroll_offset + self.window {
            self.scroll_offset = self.selected + 1 - self.window;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(names: &[&str], window: usize) -> SelectableList {
        let mut list = SelectableList::with_window(window);
        for name in names {
            list.push(ListItem::new(*name, name.to_lowercase(), ItemKind::Local));
        }
        list
    }

    fn displays(items: &[ListItem]) -> Vec<&str> {
        items.iter().map(|i| i.display.as_str()).collect()
    }

    fn assert_in_view(list: &SelectableList) {
        if list.is_empty() {
            return;
        }
        assert!(list.selected_index() < list.len());
        assert!(list.scroll_offset() <= list.selected_index());
        assert!(list.selected_index() < list.scroll_offset() + list.window());
    }

    #[test]
    fn move_down_wraps_to_first() {
        let mut list = list_of(&["a", "b", "c"], 50);
        list.move_down();
        list.move_down();
        assert_eq!(list.selected_index(), 2);
        list.move_down();
        assert_eq!(list.selected_index(), 0);
    }

    #[test]
    fn move_up_wraps_to_last() {
        let mut list = list_of(&["a", "b", "c"], 50);
        list.move_up();
        assert_eq!(list.selected_index(), 2);
        list.move_up();
        assert_eq!(list.selected_index(), 1);
    }

    #[test]
    fn cursor_stays_in_view_for_mixed_moves() {
        let names: Vec<String> = (0..23).map(|i| format!("item-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut list = list_of(&refs, 4);

        // deterministic pseudo random walk
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            match (seed >> 16) % 6 {
                0 | 1 => list.move_down(),
                2 | 3 => list.move_up(),
                4 => list.move_to_bottom(),
                _ => list.select(((seed >> 8) % 30) as usize),
            }
            assert_in_view(&list);
            assert!(list.visible().len() <= list.window());
        }
    }

    #[test]
    fn clear_then_move_down_stays_at_zero() {
        let mut list = list_of(&["a", "b"], 50);
        list.move_down();
        list.clear();
        for _ in 0..10 {
            list.move_down();
        }
        assert_eq!(list.selected_index(), 0);
        assert_eq!(list.scroll_offset(), 0);
        assert!(list.selected_item().is_none());
    }

    #[test]
    fn visible_window_never_exceeds_bounds() {
        let list = list_of(&["a", "b"], 5);
        assert_eq!(list.visible().len(), 2);

        let empty = SelectableList::with_window(3);
        assert!(empty.visible().is_empty());
    }

    #[test]
    fn filter_is_case_insensitive_on_display_or_value() {
        let list = list_of(&["Main", "feature/auth", "release"], 50);
        assert_eq!(displays_ref(&list.filter("FEAT")), vec!["feature/auth"]);
        assert_eq!(
            displays_ref(&list.filter("")),
            vec!["Main", "feature/auth", "release"]
        );

        let mut by_value = SelectableList::new();
        by_value.push(ListItem::new("shown", "a1b2c3", ItemKind::Commit));
        assert_eq!(by_value.filter("B2").len(), 1);
    }

    fn displays_ref<'a>(items: &[&'a ListItem]) -> Vec<&'a str> {
        items.iter().map(|i| i.display.as_str()).collect()
    }

    #[test]
    fn five_items_window_three_scrolls_to_tail() {
        let mut list = list_of(&["A", "B", "C", "D", "E"], 3);
        for _ in 0..4 {
            list.move_down();
        }
        assert_eq!(list.selected_index(), 4);
        assert_eq!(list.scroll_offset(), 2);
        assert_eq!(displays(list.visible()), vec!["C", "D", "E"]);

        list.move_down();
        assert_eq!(list.selected_index(), 0);
        assert_eq!(list.scroll_offset(), 0);
    }

    #[test]
    fn removing_only_item_leaves_empty_list() {
        let mut list = list_of(&["only"], 50);
        assert!(list.remove(0).is_some());
        assert!(list.is_empty());
        assert_eq!(list.selected_index(), 0);
        list.move_down();
        assert_eq!(list.selected_index(), 0);
    }

    #[test]
    fn remove_reclamps_cursor() {
        let mut list = list_of(&["a", "b", "c"], 2);
        list.move_to_bottom();
        list.remove(2);
        assert_eq!(list.selected_index(), 1);
        assert!(list.remove(9).is_none());
        assert_in_view(&list);
    }

    #[test]
    fn select_out_of_range_is_ignored() {
        let mut list = list_of(&["a", "b"], 50);
        list.select(1);
        list.select(5);
        assert_eq!(list.selected_index(), 1);
    }

    #[test]
    fn move_to_bottom_on_empty_is_noop() {
        let mut list = SelectableList::with_window(3);
        list.move_to_bottom();
        assert_eq!(list.selected_index(), 0);
    }

    #[test]
    fn shrinking_window_pulls_scroll_forward() {
        let mut list = list_of(&["a", "b", "c", "d", "e", "f"], 10);
        list.select(5);
        assert_eq!(list.scroll_offset(), 0);
        list.set_window(2);
        assert_eq!(list.scroll_offset(), 4);
        list.set_window(0);
        assert_eq!(list.window(), 1);
        assert_in_view(&list);
    }
}
