use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::Line;
use tracing::{debug, warn};

use super::{Pane, PaneKind, PaneState, help_line, navigate, placeholder, plain_row, render_list};
use crate::git_ops::{self, RepoStatus};
use crate::list::{ItemKind, ItemMeta, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "status";

/// Repository summary: branch, working tree state and upstream tracking.
pub struct StatusPane {
    state: PaneState,
    repo: PathBuf,
    repo_name: String,
    detailed: bool,
    last: Option<RepoStatus>,
}

impl StatusPane {
    pub fn new(repo: &Path) -> Self {
        let repo_name = repo
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| repo.display().to_string());
        Self {
            state: PaneState::new("Status", PaneKind::Status, ID),
            repo: repo.to_path_buf(),
            repo_name,
            detailed: false,
            last: None,
        }
    }

    /// Rebuild after a view toggle, keeping the cursor on the same row where possible.
    fn rebuild_in_place(&mut self) {
        let saved = self.state.list.selected_index();
        self.rebuild();
        let list = &mut self.state.list;
        list.select(saved.min(list.len().saturating_sub(1)));
    }

    fn rebuild(&mut self) {
        let Some(status) = self.last.clone() else {
            return;
        };
        let list = &mut self.state.list;
        list.clear();

        let meta = ItemMeta::Status(status.clone());
        if status.branch.is_empty() {
            list.push(
                ListItem::new(
                    format!("{} (detached HEAD)", self.repo_name),
                    "HEAD",
                    ItemKind::Branch,
                )
                .with_icon("⚠")
                .with_meta(meta.clone()),
            );
        } else {
            list.push(
                ListItem::new(
                    format!("{} → {}", self.repo_name, status.branch),
                    status.branch.clone(),
                    ItemKind::Branch,
                )
                .with_icon("→")
                .with_meta(meta.clone()),
            );
        }

        if status.is_dirty() {
            let mut text = "Working tree has changes".to_string();
            if status.modified > 0 {
                text.push_str(&format!(" ({} modified)", status.modified));
            }
            list.push(
                ListItem::new(text, "dirty", ItemKind::Status)
                    .with_icon("●")
                    .with_meta(meta.clone()),
            );
        } else {
            list.push(
                ListItem::new("Working tree clean", "clean", ItemKind::Status)
                    .with_icon("○")
                    .with_meta(meta.clone()),
            );
        }

        if self.detailed {
            for (label, count) in [
                ("Modified", status.modified),
                ("Staged", status.staged),
                ("Untracked", status.untracked),
            ] {
                list.push(
                    ListItem::new(format!("{label}: {count}"), count.to_string(), ItemKind::Status)
                        .with_meta(meta.clone()),
                );
            }
        }

        if let Some(upstream) = &status.upstream {
            let mut text = upstream.clone();
            if status.ahead > 0 {
                text.push_str(&format!(" (ahead {})", status.ahead));
            }
            if status.behind > 0 {
                text.push_str(&format!(" (behind {})", status.behind));
            }
            list.push(
                ListItem::new(text, upstream.clone(), ItemKind::Upstream)
                    .with_icon("↑")
                    .with_meta(meta),
            );
        }
    }

    fn load(&self, fetch_first: bool) -> Cmd {
        let repo = self.repo.clone();
        Cmd::task(ID, move || {
            if fetch_first && let Err(e) = git_ops::fetch(&repo) {
                warn!("fetch failed: {e}");
            }
            match git_ops::status(&repo) {
                Ok(status) => Message::Status(status),
                Err(e) => {
                    warn!("status failed: {e}");
                    Message::Failed {
                        pane: ID,
                        error: e.to_string(),
                    }
                }
            }
        })
    }
}

impl Pane for StatusPane {
    fn state(&self) -> &PaneState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PaneState {
        &mut self.state
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Cmd> {
        if navigate(&mut self.state.list, &key) {
            return None;
        }
        match key.code {
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Enter => self.handle_action("toggle"),
            KeyCode::Char('f') => self.handle_action("fetch"),
            _ => None,
        }
    }

    fn handle_message(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Status(status) => {
                self.state.end_load();
                self.last = Some(status.clone());
                self.rebuild();
            }
            Message::Failed { pane: ID, error } => {
                self.state.end_load();
                self.state.list.clear();
                self.state
                    .list
                    .push(ListItem::new(format!("Error: {error}"), "error", ItemKind::Error));
            }
            _ => {}
        }
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        if let Some(lines) = placeholder(
            &self.state,
            theme,
            "Loading status...",
            "No repository information",
        ) {
            return lines;
        }
        let mut lines = render_list(&self.state, theme, plain_row(theme));
        lines.extend(help_line(&self.state, theme, "enter: Details  f: Fetch  r: Refresh"));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, "refresh");
        self.state.begin_load();
        Some(self.load(false))
    }

    fn handle_action(&mut self, action: &str) -> Option<Cmd> {
        match action {
            "refresh" => self.refresh(),
            "toggle" => {
                self.detailed = !self.detailed;
                self.rebuild_in_place();
                None
            }
            "fetch" => {
                self.state.begin_load();
                Some(self.load(true))
            }
            _ => None,
        }
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &["refresh", "fetch", "toggle"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::PaneEvent;
    use crate::panes::test_support::*;

    fn status() -> RepoStatus {
        RepoStatus {
            branch: "main".into(),
            upstream: Some("origin/main".into()),
            ahead: 12,
            behind: 3,
            modified: 65,
            untracked: 1,
            staged: 0,
        }
    }

    fn displays(p: &StatusPane) -> Vec<String> {
        p.state.list.items().iter().map(|i| i.display.clone()).collect()
    }

    #[test]
    fn counts_are_rendered_as_numbers() {
        let mut p = StatusPane::new(Path::new("/work/demo"));
        p.update(PaneEvent::Message(&Message::Status(status())));
        assert_eq!(
            displays(&p),
            vec![
                "demo → main",
                "Working tree has changes (65 modified)",
                "origin/main (ahead 12) (behind 3)",
            ]
        );
    }

    #[test]
    fn clean_tree_without_upstream() {
        let mut p = StatusPane::new(Path::new("/work/demo"));
        let clean = RepoStatus {
            branch: String::new(),
            ..RepoStatus::default()
        };
        p.update(PaneEvent::Message(&Message::Status(clean)));
        assert_eq!(displays(&p), vec!["demo (detached HEAD)", "Working tree clean"]);
    }

    #[test]
    fn enter_toggles_detailed_counts() {
        let mut p = StatusPane::new(Path::new("/work/demo"));
        p.state_mut().activate();
        p.update(PaneEvent::Message(&Message::Status(status())));
        assert!(p.update(PaneEvent::Key(key(KeyCode::Enter))).is_none());
        assert_eq!(p.state.list.len(), 6);
        assert_eq!(p.state.list.items()[2].display, "Modified: 65");
        p.update(PaneEvent::Key(key(KeyCode::Enter)));
        assert_eq!(p.state.list.len(), 3);
    }

    #[test]
    fn detail_toggle_keeps_the_cursor() {
        let mut p = StatusPane::new(Path::new("/work/demo"));
        p.state_mut().activate();
        p.update(PaneEvent::Message(&Message::Status(status())));
        p.update(PaneEvent::Key(ch('j')));
        p.update(PaneEvent::Key(key(KeyCode::Enter)));
        assert_eq!(p.state.list.selected_index(), 1);

        p.update(PaneEvent::Key(ch('G')));
        p.update(PaneEvent::Key(key(KeyCode::Enter)));
        assert_eq!(p.state.list.selected_index(), 2);
    }

    #[test]
    fn failure_ends_loading() {
        let mut p = StatusPane::new(Path::new("/work/demo"));
        assert!(p.refresh().is_some());
        assert!(p.state.is_loading());
        p.update(PaneEvent::Message(&Message::Failed {
            pane: ID,
            error: "not a git repository".into(),
        }));
        assert!(!p.state.is_loading());
        assert_eq!(p.state.list.items()[0].kind, ItemKind::Error);
    }
}
