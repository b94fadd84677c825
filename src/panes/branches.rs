use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use tracing::{debug, warn};

use super::{
    Pane, PaneKind, PaneState, git_action, help_line, navigate, placeholder, render_list,
    unsupported,
};
use crate::git_ops::{self, Branch};
use crate::list::{ItemKind, ItemMeta, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "branches";

/// Local branches, then remotes and tags when enabled.
pub struct BranchesPane {
    state: PaneState,
    repo: PathBuf,
    show_remote: bool,
    show_tags: bool,
    branches: Vec<Branch>,
    tags: Vec<String>,
}

impl BranchesPane {
    pub fn new(repo: &Path) -> Self {
        Self {
            state: PaneState::new("Branches", PaneKind::Branches, ID),
            repo: repo.to_path_buf(),
            show_remote: true,
            show_tags: true,
            branches: Vec::new(),
            tags: Vec::new(),
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
        let list = &mut self.state.list;
        list.clear();

        for b in self.branches.iter().filter(|b| !b.is_remote) {
            let (kind, icon) = if b.is_current {
                (ItemKind::Current, "●")
            } else {
                (ItemKind::Local, "")
            };
            list.push(
                ListItem::new(b.name.clone(), b.name.clone(), kind)
                    .with_icon(icon)
                    .with_meta(ItemMeta::Branch(b.clone())),
            );
        }
        if self.show_remote {
            for b in self.branches.iter().filter(|b| b.is_remote) {
                list.push(
                    ListItem::new(b.name.clone(), b.name.clone(), ItemKind::Remote)
                        .with_icon("↑")
                        .with_meta(ItemMeta::Branch(b.clone())),
                );
            }
        }
        if self.show_tags {
            for tag in &self.tags {
                list.push(ListItem::new(tag.clone(), tag.clone(), ItemKind::Tag).with_icon("🏷"));
            }
        }
    }

    fn action(&self, action: &'static str, args: &[&str], done: String) -> Cmd {
        git_action(
            ID,
            &self.repo,
            action,
            args.iter().map(|s| s.to_string()).collect(),
            done,
        )
    }
}

impl Pane for BranchesPane {
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
            KeyCode::Enter => self.handle_action("checkout"),
            KeyCode::Char('c') => self.handle_action("create_branch"),
            KeyCode::Char('d') => self.handle_action("delete_branch"),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('m') => self.handle_action("merge"),
            KeyCode::Char('R') => self.handle_action("rebase"),
            KeyCode::Char('p') => self.handle_action("pull"),
            KeyCode::Char('P') => self.handle_action("push"),
            KeyCode::Char('f') => self.handle_action("fetch"),
            KeyCode::Char('t') => self.handle_action("toggle_tags"),
            KeyCode::Char('o') => self.handle_action("toggle_remote"),
            _ => None,
        }
    }

    fn handle_message(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Branches { branches, tags } => {
                self.state.end_load();
                self.branches = branches.clone();
                self.tags = tags.clone();
                self.rebuild();
            }
            Message::Failed { pane: ID, .. } => self.state.end_load(),
            _ => {}
        }
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        if let Some(lines) =
            placeholder(&self.state, theme, "Loading branches...", "No branches found")
        {
            return lines;
        }
        let mut lines = render_list(&self.state, theme, |item| {
            let style = theme.kind(item.kind);
            let marker = if item.kind == ItemKind::Current { "* " } else { "  " };
            vec![
                Span::styled(marker, style),
                Span::styled(item.display.clone(), style),
            ]
        });
        lines.extend(help_line(
            &self.state,
            theme,
            "enter: Checkout  d: Delete  m/R: Merge/Rebase  p/P: Pull/Push  o/t: Remotes/Tags",
        ));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, "refresh");
        self.state.begin_load();
        let repo = self.repo.clone();
        Some(Cmd::task(ID, move || match git_ops::branches(&repo) {
            Ok(branches) => {
                let tags = git_ops::tags(&repo).unwrap_or_else(|e| {
                    warn!("tag listing failed: {e}");
                    Vec::new()
                });
                Message::Branches { branches, tags }
            }
            Err(e) => {
                warn!("branch listing failed: {e}");
                Message::Failed {
                    pane: ID,
                    error: e.to_string(),
                }
            }
        }))
    }

    fn handle_action(&mut self, action: &str) -> Option<Cmd> {
        match action {
            "refresh" => return self.refresh(),
            "toggle_remote" => {
                self.show_remote = !self.show_remote;
                self.rebuild_in_place();
                return None;
            }
            "toggle_tags" => {
                self.show_tags = !self.show_tags;
                self.rebuild_in_place();
                return None;
            }
            "fetch" => {
                return Some(self.action(
                    "fetch",
                    &["fetch", "--all", "--prune"],
                    "Fetched all remotes".to_string(),
                ));
            }
            "create_branch" => {
                return Some(unsupported(
                    ID,
                    "create_branch",
                    "Creating a branch needs a name prompt",
                ));
            }
            _ => {}
        }

        let item = self.state.list.selected_item()?;
        let name = item.value.clone();
        let kind = item.kind;
        let cmd = match action {
            "checkout" if kind == ItemKind::Remote => self.action(
                "checkout",
                &["checkout", "--track", &name],
                format!("Checked out branch: {name}"),
            ),
            "checkout" => self.action(
                "checkout",
                &["checkout", &name],
                format!("Checked out: {name}"),
            ),
            "delete_branch" if kind == ItemKind::Remote || kind == ItemKind::Tag => unsupported(
                ID,
                "delete_branch",
                "Only local branches can be deleted",
            ),
            "delete_branch" => self.action(
                "delete_branch",
                &["branch", "-d", &name],
                format!("Deleted branch: {name}"),
            ),
            "merge" => self.action(
                "merge",
                &["merge", "--no-edit", &name],
                format!("Merged branch: {name}"),
            ),
            "rebase" => self.action(
                "rebase",
                &["rebase", &name],
                format!("Rebased onto: {name}"),
            ),
            "pull" => self.action(
                "pull",
                &["pull", "--ff-only"],
                "Pulled current branch".to_string(),
            ),
            "push" if kind == ItemKind::Current => {
                self.action("push", &["push"], format!("Pushed branch: {name}"))
            }
            "push" if kind == ItemKind::Local => self.action(
                "push",
                &["push", "origin", &name],
                format!("Pushed branch: {name}"),
            ),
            "push" => unsupported(ID, "push", "Only local branches can be pushed"),
            _ => return None,
        };
        Some(cmd)
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &[
            "checkout",
            "create_branch",
            "delete_branch",
            "merge",
            "rebase",
            "pull",
            "push",
            "fetch",
            "refresh",
            "toggle_remote",
            "toggle_tags",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::PaneEvent;
    use crate::panes::test_support::*;

    fn branch(name: &str, current: bool, remote: bool) -> Branch {
        Branch {
            name: name.into(),
            is_current: current,
            is_remote: remote,
            upstream: None,
        }
    }

    fn loaded() -> BranchesPane {
        let mut p = BranchesPane::new(Path::new("/repo"));
        p.state_mut().activate();
        p.update(PaneEvent::Message(&Message::Branches {
            branches: vec![
                branch("dev", false, false),
                branch("origin/main", false, true),
                branch("main", true, false),
            ],
            tags: vec!["v1.0.0".into()],
        }));
        p
    }

    fn kinds(p: &BranchesPane) -> Vec<(String, ItemKind)> {
        p.state
            .list
            .items()
            .iter()
            .map(|i| (i.display.clone(), i.kind))
            .collect()
    }

    #[test]
    fn locals_then_remotes_then_tags() {
        let p = loaded();
        assert_eq!(
            kinds(&p),
            vec![
                ("dev".to_string(), ItemKind::Local),
                ("main".to_string(), ItemKind::Current),
                ("origin/main".to_string(), ItemKind::Remote),
                ("v1.0.0".to_string(), ItemKind::Tag),
            ]
        );
    }

    #[test]
    fn toggles_hide_sections() {
        let mut p = loaded();
        assert!(p.update(PaneEvent::Key(ch('o'))).is_none());
        assert!(p.update(PaneEvent::Key(ch('t'))).is_none());
        assert_eq!(p.state.list.len(), 2);
        p.update(PaneEvent::Key(ch('t')));
        assert_eq!(p.state.list.len(), 3);
    }

    #[test]
    fn toggles_keep_the_cursor() {
        let mut p = loaded();
        p.update(PaneEvent::Key(ch('j')));
        p.update(PaneEvent::Key(ch('t')));
        assert_eq!(p.state.list.selected_index(), 1);
        assert_eq!(p.state.list.selected_item().unwrap().display, "main");

        // cursor on the last row is clamped when the section disappears
        p.update(PaneEvent::Key(ch('t')));
        p.update(PaneEvent::Key(ch('G')));
        p.update(PaneEvent::Key(ch('o')));
        p.update(PaneEvent::Key(ch('t')));
        assert_eq!(p.state.list.selected_index(), 1);
    }

    #[test]
    fn create_reports_prompt_needed() {
        let mut p = loaded();
        let msg = p.update(PaneEvent::Key(ch('c'))).and_then(Cmd::run_now).unwrap();
        match msg {
            Message::ActionComplete { success, action, .. } => {
                assert!(!success);
                assert_eq!(action, "create_branch");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn remote_branches_are_not_deleted() {
        let mut p = loaded();
        p.state.list.select(2);
        let msg = p.handle_action("delete_branch").and_then(Cmd::run_now).unwrap();
        assert!(matches!(msg, Message::ActionComplete { success: false, .. }));
    }

    #[test]
    fn unknown_action_and_empty_selection() {
        let mut p = BranchesPane::new(Path::new("/repo"));
        assert!(p.handle_action("checkout").is_none());
        assert!(p.handle_action("squash").is_none());
    }
}
