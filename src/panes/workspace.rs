use std::{thread, time::Duration};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::Line;
use tracing::debug;

use super::{Pane, PaneKind, PaneState, help_line, navigate, placeholder, plain_row, render_list};
use crate::list::{ItemKind, ItemMeta, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "workspace";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceInfo {
    pub name: String,
    pub version_set: String,
    pub updated_at: DateTime<Local>,
}

fn gather() -> WorkspaceInfo {
    WorkspaceInfo {
        name: "JoeWorkspace".to_string(),
        version_set: "v1.0.0".to_string(),
        updated_at: Local::now(),
    }
}

/// Mock workspace summary loaded with a simulated delay.
pub struct WorkspacePane {
    state: PaneState,
    delay: Duration,
}

impl WorkspacePane {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: PaneState::new("Workspace", PaneKind::Workspace, ID),
            delay,
        }
    }

    fn apply(&mut self, info: &WorkspaceInfo) {
        let meta = ItemMeta::Workspace(info.clone());
        let list = &mut self.state.list;
        list.clear();
        list.push(
            ListItem::new(info.name.clone(), info.name.clone(), ItemKind::Name)
                .with_meta(meta.clone()),
        );
        list.push(
            ListItem::new(
                format!("Version Set: {}", info.version_set),
                info.version_set.clone(),
                ItemKind::Version,
            )
            .with_meta(meta.clone()),
        );
        list.push(
            ListItem::new(
                format!("Updated: {}", info.updated_at.format("%Y-%m-%d %H:%M")),
                info.updated_at.to_rfc3339(),
                ItemKind::Metadata,
            )
            .with_meta(meta),
        );
    }
}

impl Pane for WorkspacePane {
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
            Message::Workspace(info) => {
                self.state.end_load();
                self.apply(info);
            }
            Message::Failed { pane: ID, .. } => self.state.end_load(),
            _ => {}
        }
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        if let Some(lines) =
            placeholder(&self.state, theme, "Loading workspace...", "No workspace information")
        {
            return lines;
        }
        let rule = Line::styled("━━━━━━━━━━━━━━━━━━━━━━━━", theme.dimmed());
        let mut lines = vec![rule.clone()];
        lines.extend(render_list(&self.state, theme, plain_row(theme)));
        lines.push(Line::raw(""));
        lines.push(rule);
        lines.extend(help_line(&self.state, theme, "↑↓: Navigate  r: Refresh"));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, "refresh");
        self.state.begin_load();
        let delay = self.delay;
        Some(Cmd::task(ID, move || {
            thread::sleep(delay);
            Message::Workspace(gather())
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
