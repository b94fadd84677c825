use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};
use tracing::{debug, warn};

use super::{
    Pane, PaneKind, PaneState, git_action, help_line, load_diff, navigate, placeholder,
    render_list, unsupported,
};
use crate::details::diff_key;
use crate::git_ops::{self, Commit};
use crate::list::{ItemKind, ItemMeta, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "commits";
const LIMIT_STEP: usize = 25;

/// `git log` (or the reflog) bounded by an adjustable limit.
pub struct CommitsPane {
    state: PaneState,
    repo: PathBuf,
    limit: usize,
    show_reflog: bool,
}

impl CommitsPane {
    pub fn new(repo: &Path, limit: usize) -> Self {
        Self {
            state: PaneState::new("Commits", PaneKind::Commits, ID),
            repo: repo.to_path_buf(),
            limit: limit.max(LIMIT_STEP),
            show_reflog: false,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn apply(&mut self, commits: &[Commit]) {
        let list = &mut self.state.list;
        list.clear();
        for c in commits {
            let kind = if self.show_reflog {
                ItemKind::Reflog
            } else if c.is_merge() {
                ItemKind::Merge
            } else {
                ItemKind::Commit
            };
            list.push(
                ListItem::new(
                    format!("{} {} ○ {}", c.short_hash, c.author_tag(), c.message),
                    c.hash.clone(),
                    kind,
                )
                .with_meta(ItemMeta::Commit(c.clone())),
            );
        }
    }

    fn footer(&self) -> String {
        let mode = if self.show_reflog { "Reflog" } else { "Commits" };
        let list = &self.state.list;
        let current = if list.is_empty() { 0 } else { list.selected_index() + 1 };
        format!("{mode}: {current}/{} (limit: {})", list.len(), self.limit)
    }

    fn selected_commit(&self) -> Option<&Commit> {
        match &self.state.list.selected_item()?.meta {
            ItemMeta::Commit(c) => Some(c),
            _ => None,
        }
    }

    fn on_selected(&self, action: &'static str, args: &[&str], done: &str) -> Option<Cmd> {
        let commit = self.selected_commit()?;
        let mut argv: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        argv.push(commit.hash.clone());
        Some(git_action(
            ID,
            &self.repo,
            action,
            argv,
            format!("{done} {}", commit.short_hash),
        ))
    }
}

fn row(theme: &Palette) -> impl Fn(&ListItem) -> Vec<Span<'static>> + '_ {
    move |item| {
        let ItemMeta::Commit(c) = &item.meta else {
            return vec![Span::styled(item.display.clone(), theme.text())];
        };
        vec![
            Span::styled(c.short_hash.clone(), theme.title(false)),
            Span::raw(" "),
            Span::styled(c.author_tag(), theme.info()),
            Span::raw(" "),
            Span::styled("○", theme.kind(item.kind)),
            Span::raw(" "),
            Span::styled(c.message.clone(), theme.text()),
        ]
    }
}

impl Pane for CommitsPane {
    fn state(&self) -> &PaneState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PaneState {
        &mut self.state
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Cmd> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('f') => self.handle_action("search"),
                _ => None,
            };
        }
        if navigate(&mut self.state.list, &key) {
            return None;
        }
        match key.code {
            KeyCode::Enter => self.handle_action("show_commit"),
            KeyCode::Char('d') => self.handle_action("show_diff"),
            KeyCode::Char('c') => self.handle_action("cherry_pick"),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('R') => self.handle_action("reset"),
            KeyCode::Char('v') => self.handle_action("revert"),
            KeyCode::Char('s') => self.handle_action("squash"),
            KeyCode::Char('e') => self.handle_action("edit"),
            KeyCode::Char('f') => self.handle_action("fixup"),
            KeyCode::Char('t') => self.handle_action("toggle_reflog"),
            KeyCode::Char('+') => self.handle_action("more"),
            KeyCode::Char('-') => self.handle_action("less"),
            _ => None,
        }
    }

    fn handle_message(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Commits { reflog, commits } if *reflog == self.show_reflog => {
                self.state.end_load();
                self.apply(commits);
            }
            Message::Failed { pane: ID, .. } => self.state.end_load(),
            _ => {}
        }
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        if let Some(lines) =
            placeholder(&self.state, theme, "Loading commits...", "No commits found")
        {
            return lines;
        }
        let mut lines = render_list(&self.state, theme, row(theme));
        lines.push(Line::raw(""));
        lines.push(Line::styled(self.footer(), theme.info()));
        lines.extend(help_line(
            &self.state,
            theme,
            "enter/d: Diff  c: Cherry-pick  R: Reset  v: Revert  t: Reflog  +/-: Limit",
        ));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, limit = self.limit, reflog = self.show_reflog, "refresh");
        self.state.begin_load();
        let repo = self.repo.clone();
        let (limit, reflog) = (self.limit, self.show_reflog);
        Some(Cmd::task(ID, move || {
            let result = if reflog {
                git_ops::reflog(&repo, limit)
            } else {
                git_ops::commits(&repo, limit)
            };
            match result {
                Ok(commits) => Message::Commits { reflog, commits },
                Err(e) => {
                    warn!("commit listing failed: {e}");
                    Message::Failed {
                        pane: ID,
                        error: e.to_string(),
                    }
                }
            }
        }))
    }

    fn handle_action(&mut self, action: &str) -> Option<Cmd> {
        match action {
            "refresh" => self.refresh(),
            "toggle_reflog" => {
                self.show_reflog = !self.show_reflog;
                self.refresh()
            }
            "more" => {
                self.limit += LIMIT_STEP;
                self.refresh()
            }
            "less" if self.limit > LIMIT_STEP => {
                self.limit -= LIMIT_STEP;
                self.refresh()
            }
            "show_commit" | "show_diff" => {
                let key = diff_key(self.state.list.selected_item()?)?;
                let hash = self.selected_commit()?.hash.clone();
                let repo = self.repo.clone();
                Some(load_diff(ID, key, move || git_ops::commit_diff(&repo, &hash)))
            }
            "cherry_pick" => self.on_selected("cherry_pick", &["cherry-pick"], "Cherry-picked"),
            "reset" => self.on_selected("reset", &["reset", "--mixed"], "Reset to"),
            "revert" => self.on_selected("revert", &["revert", "--no-edit"], "Reverted"),
            "squash" => Some(unsupported(ID, "squash", "Squash needs an interactive rebase")),
            "edit" => Some(unsupported(ID, "edit", "Edit needs an interactive rebase")),
            "fixup" => Some(unsupported(ID, "fixup", "Fixup needs an interactive rebase")),
            "search" => Some(unsupported(ID, "search", "Search needs a query prompt")),
            _ => None,
        }
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &[
            "show_commit",
            "show_diff",
            "cherry_pick",
            "reset",
            "revert",
            "squash",
            "edit",
            "fixup",
            "search",
            "refresh",
            "toggle_reflog",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::PaneEvent;
    use crate::panes::test_support::*;

    fn commit(hash: &str, author: &str, message: &str) -> Commit {
        Commit {
            hash: format!("{hash}0000000"),
            short_hash: hash.into(),
            author: author.into(),
            date: "2024-05-01".into(),
            message: message.into(),
            selector: None,
        }
    }

    fn loaded() -> CommitsPane {
        let mut p = CommitsPane::new(Path::new("/repo"), 50);
        p.state_mut().activate();
        p.update(PaneEvent::Message(&Message::Commits {
            reflog: false,
            commits: vec![
                commit("abc1234", "Ada Lovelace", "Add parser"),
                commit("def5678", "grace", "Merge branch 'dev'"),
            ],
        }));
        p
    }

    #[test]
    fn rows_carry_hash_author_and_kind() {
        let p = loaded();
        let items = p.state.list.items();
        assert_eq!(items[0].display, "abc1234 AL ○ Add parser");
        assert_eq!(items[0].value, "abc12340000000");
        assert_eq!(items[0].kind, ItemKind::Commit);
        assert_eq!(items[1].display, "def5678 GR ○ Merge branch 'dev'");
        assert_eq!(items[1].kind, ItemKind::Merge);
        assert_eq!(p.footer(), "Commits: 1/2 (limit: 50)");
    }

    #[test]
    fn limit_steps_with_floor() {
        let mut p = loaded();
        assert!(p.update(PaneEvent::Key(ch('+'))).is_some());
        assert_eq!(p.limit(), 75);
        p.update(PaneEvent::Key(ch('-')));
        p.update(PaneEvent::Key(ch('-')));
        assert_eq!(p.limit(), 25);
        assert!(p.update(PaneEvent::Key(ch('-'))).is_none());
        assert_eq!(p.limit(), 25);
    }

    #[test]
    fn reflog_toggle_ignores_stale_log() {
        let mut p = loaded();
        p.update(PaneEvent::Key(ch('t')));
        assert!(p.state.is_loading());
        p.update(PaneEvent::Message(&Message::Commits {
            reflog: false,
            commits: vec![],
        }));
        assert!(p.state.is_loading());
        assert_eq!(p.state.list.len(), 2);
    }

    #[test]
    fn interactive_actions_report_failure() {
        let mut p = loaded();
        for c in ['s', 'e', 'f'] {
            let msg = p.update(PaneEvent::Key(ch(c))).and_then(Cmd::run_now).unwrap();
            assert!(matches!(msg, Message::ActionComplete { success: false, .. }));
        }
        let ctrl_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL);
        let msg = p.update(PaneEvent::Key(ctrl_f)).and_then(Cmd::run_now).unwrap();
        assert!(matches!(msg, Message::ActionComplete { action, .. } if action == "search"));
    }

    #[test]
    fn enter_requests_commit_diff() {
        let mut p = loaded();
        match p.update(PaneEvent::Key(key(KeyCode::Enter))) {
            Some(Cmd::Task(task)) => assert_eq!(task.origin, ID),
            other => panic!("unexpected {other:?}"),
        }
    }
}
