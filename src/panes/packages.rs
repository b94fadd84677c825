use std::{thread, time::Duration};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::Line;
use tracing::debug;

use super::{
    Pane, PaneKind, PaneState, footer, help_line, navigate, placeholder, plain_row, render_list,
};
use crate::list::{ItemKind, ItemMeta, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "packages";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub active: bool,
    pub branch: String,
    pub has_upstream: bool,
    pub upstream_ahead: u32,
    pub last_commit: String,
    pub last_author: String,
    pub modified_files: u32,
    pub description: String,
}

impl Package {
    /// `name [branch]`, with `↑n` when tracking an upstream.
    pub fn display(&self) -> String {
        let mut out = format!("{} [{}]", self.name, self.branch);
        if self.has_upstream {
            out.push_str(&format!(" ↑{}", self.upstream_ahead));
        }
        out
    }
}

fn package(
    name: &str,
    branch: &str,
    upstream_ahead: Option<u32>,
    last_commit: &str,
    last_author: &str,
    modified_files: u32,
    description: &str,
) -> Package {
    Package {
        name: name.to_string(),
        active: true,
        branch: branch.to_string(),
        has_upstream: upstream_ahead.is_some(),
        upstream_ahead: upstream_ahead.unwrap_or(0),
        last_commit: last_commit.to_string(),
        last_author: last_author.to_string(),
        modified_files,
        description: description.to_string(),
    }
}

fn gather() -> Vec<Package> {
    vec![
        package(
            "antonio",
            "main",
            Some(3),
            "feat: Add user authentication",
            "john.doe",
            5,
            "Core authentication service",
        ),
        package(
            "miguel",
            "feature/auth",
            None,
            "wip: Working on OAuth integration",
            "jane.smith",
            12,
            "OAuth and token management",
        ),
        package(
            "rita",
            "main",
            Some(1),
            "fix: Resolve database connection issue",
            "bob.wilson",
            2,
            "Database layer and migrations",
        ),
    ]
}

/// Mock package list.
pub struct PackagesPane {
    state: PaneState,
    delay: Duration,
}

impl PackagesPane {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: PaneState::new("Packages", PaneKind::Packages, ID),
            delay,
        }
    }
}

impl Pane for PackagesPane {
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
            _ => None,
        }
    }

    fn handle_message(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Packages(packages) => {
                self.state.end_load();
                self.state.list.clear();
                for p in packages {
                    let kind = if p.active { ItemKind::Active } else { ItemKind::Inactive };
                    self.state.list.push(
                        ListItem::new(p.display(), p.name.clone(), kind)
                            .with_meta(ItemMeta::Package(p.clone())),
                    );
                }
            }
            Message::Failed { pane: ID, .. } => self.state.end_load(),
            _ => {}
        }
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        if let Some(lines) =
            placeholder(&self.state, theme, "Loading packages...", "No packages found")
        {
            return lines;
        }
        let mut lines = render_list(&self.state, theme, plain_row(theme));
        lines.push(Line::raw(""));
        lines.push(footer("Packages", &self.state.list, theme));
        lines.extend(help_line(&self.state, theme, "j/k: Navigate  g/G: Top/Bottom  r: Refresh"));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, "refresh");
        self.state.begin_load();
        let delay = self.delay;
        Some(Cmd::task(ID, move || {
            thread::sleep(delay);
            Message::Packages(gather())
        }))
    }

    fn handle_action(&mut self, action: &str) -> Option<Cmd> {
        match action {
            "refresh" => self.refresh(),
            _ => None,
        }
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &["refresh"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::PaneEvent;

    #[test]
    fn failed_load_ends_loading() {
        let mut p = PackagesPane::new(Duration::ZERO);
        p.refresh();
        assert!(p.state.is_loading());
        p.update(PaneEvent::Message(&Message::Failed {
            pane: ID,
            error: "task panicked".into(),
        }));
        assert!(!p.state.is_loading());
    }

    #[test]
    fn packages_show_branch_and_ahead_count() {
        let mut p = PackagesPane::new(Duration::ZERO);
        let msg = p.refresh().and_then(Cmd::run_now).unwrap();
        p.update(PaneEvent::Message(&msg));

        let shown: Vec<&str> = p.state.list.items().iter().map(|i| i.display.as_str()).collect();
        assert_eq!(
            shown,
            vec!["antonio [main] ↑3", "miguel [feature/auth]", "rita [main] ↑1"]
        );
        assert!(p.state.list.items().iter().all(|i| i.kind == ItemKind::Active));
    }
}
