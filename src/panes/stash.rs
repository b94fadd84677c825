use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use tracing::{debug, warn};

use super::{
    Pane, PaneKind, PaneState, git_action, help_line, load_diff, navigate, placeholder,
    render_list, unsupported,
};
use crate::details::diff_key;
use crate::git_ops;
use crate::list::{ItemKind, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "stash";

pub struct StashPane {
    state: PaneState,
    repo: PathBuf,
}

impl StashPane {
    pub fn new(repo: &Path) -> Self {
        Self {
            state: PaneState::new("Stash", PaneKind::Stash, ID),
            repo: repo.to_path_buf(),
        }
    }

    fn apply(&mut self, lines: &[String]) {
        let list = &mut self.state.list;
        list.clear();
        if lines.is_empty() {
            list.push(ListItem::new("No stashed changes", "", ItemKind::Empty));
            return;
        }
        for (i, line) in lines.iter().enumerate() {
            list.push(ListItem::new(line.clone(), git_ops::stash_ref(line, i), ItemKind::Stash));
        }
    }

    fn footer(&self) -> String {
        let list = &self.state.list;
        format!("Stashes: {}/{}", list.selected_index() + 1, list.len())
    }

    fn selected_ref(&self) -> Option<String> {
        let item = self.state.list.selected_item()?;
        (item.kind == ItemKind::Stash).then(|| item.value.clone())
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

fn row(theme: &Palette) -> impl Fn(&ListItem) -> Vec<Span<'static>> + '_ {
    move |item| {
        let parts: Vec<&str> = item.display.splitn(3, ':').collect();
        match parts.as_slice() {
            [stash_ref, branch, message] if item.kind == ItemKind::Stash => vec![
                Span::styled(format!("{stash_ref}:"), theme.title(false)),
                Span::styled(format!("{branch}:"), theme.info()),
                Span::styled(message.to_string(), theme.text()),
            ],
            _ => vec![Span::styled(item.display.clone(), theme.kind(item.kind))],
        }
    }
}

impl Pane for StashPane {
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
            KeyCode::Enter => self.handle_action("apply_stash"),
            KeyCode::Char('p') => self.handle_action("pop_stash"),
            KeyCode::Char('d') => self.handle_action("drop_stash"),
            KeyCode::Char('s') => self.handle_action("create_stash"),
            KeyCode::Char('S') => self.handle_action("create_stash_include_untracked"),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('v') => self.handle_action("show_stash"),
            KeyCode::Char('D') => self.handle_action("clear_all_stashes"),
            KeyCode::Char('b') => self.handle_action("create_branch_from_stash"),
            _ => None,
        }
    }

    fn handle_message(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Stashes(lines) => {
                self.state.end_load();
                self.apply(lines);
            }
            Message::Failed { pane: ID, .. } => self.state.end_load(),
            _ => {}
        }
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        if let Some(lines) =
            placeholder(&self.state, theme, "Loading stashes...", "No stashed changes")
        {
            return lines;
        }
        let mut lines = render_list(&self.state, theme, row(theme));
        lines.push(Line::raw(""));
        lines.push(Line::styled(self.footer(), theme.info()));
        lines.extend(help_line(
            &self.state,
            theme,
            "enter: Apply  p: Pop  d: Drop  s/S: Stash  v: Show  D: Clear",
        ));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, "refresh");
        self.state.begin_load();
        let repo = self.repo.clone();
        Some(Cmd::task(ID, move || match git_ops::stashes(&repo) {
            Ok(lines) => Message::Stashes(lines),
            Err(e) => {
                warn!("stash listing failed: {e}");
                Message::Failed {
                    pane: ID,
                    error: e.to_string(),
                }
            }
        }))
    }

    fn handle_action(&mut self, action: &str) -> Option<Cmd> {
        let cmd = match action {
            "refresh" => return self.refresh(),
            "create_stash" => self.action(
                "create_stash",
                &["stash", "push"],
                "Stashed changes".to_string(),
            ),
            "create_stash_include_untracked" => self.action(
                "create_stash_include_untracked",
                &["stash", "push", "--include-untracked"],
                "Stashed changes including untracked files".to_string(),
            ),
            "clear_all_stashes" => self.action(
                "clear_all_stashes",
                &["stash", "clear"],
                "Cleared all stashes".to_string(),
            ),
            "apply_stash" => {
                let r = self.selected_ref()?;
                self.action("apply_stash", &["stash", "apply", &r], format!("Applied {r}"))
            }
            "pop_stash" => {
                let r = self.selected_ref()?;
                self.action("pop_stash", &["stash", "pop", &r], format!("Popped {r}"))
            }
            "drop_stash" => {
                let r = self.selected_ref()?;
                self.action("drop_stash", &["stash", "drop", &r], format!("Dropped {r}"))
            }
            "show_stash" => {
                let key = diff_key(self.state.list.selected_item()?)?;
                let r = self.selected_ref()?;
                let repo = self.repo.clone();
                load_diff(ID, key, move || git_ops::stash_diff(&repo, &r))
            }
            "create_branch_from_stash" => {
                self.selected_ref()?;
                unsupported(
                    ID,
                    "create_branch_from_stash",
                    "Creating a branch from a stash needs a name prompt",
                )
            }
            _ => return None,
        };
        Some(cmd)
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &[
            "create_stash",
            "create_stash_include_untracked",
            "apply_stash",
            "pop_stash",
            "drop_stash",
            "show_stash",
            "clear_all_stashes",
            "create_branch_from_stash",
            "refresh",
        ]
    }
}
