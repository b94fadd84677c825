use std::{thread, time::Duration};

use chrono::{DateTime, Local, TimeDelta};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use tracing::debug;

use super::{Pane, PaneKind, PaneState, help_line, navigate, placeholder, render_list};
use crate::list::{ItemKind, ItemMeta, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "pullrequests";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrStatus {
    Open,
    Closed,
    Merged,
}

impl PrStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PrStatus::Open => "open",
            PrStatus::Closed => "closed",
            PrStatus::Merged => "merged",
        }
    }

    fn kind(self) -> ItemKind {
        match self {
            PrStatus::Open => ItemKind::Open,
            PrStatus::Closed => ItemKind::Closed,
            PrStatus::Merged => ItemKind::Merged,
        }
    }

    fn badge(self) -> &'static str {
        match self {
            PrStatus::Open => "[OPEN]",
            PrStatus::Closed => "[CLOSED]",
            PrStatus::Merged => "[MERGED]",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullRequest {
    pub id: u32,
    pub title: String,
    pub package: String,
    pub author: String,
    pub status: PrStatus,
    pub created: DateTime<Local>,
}

fn gather() -> Vec<PullRequest> {
    let now = Local::now();
    let pr = |id, title: &str, package: &str, author: &str, status, hours_ago| PullRequest {
        id,
        title: title.to_string(),
        package: package.to_string(),
        author: author.to_string(),
        status,
        created: now - TimeDelta::hours(hours_ago),
    };
    vec![
        pr(1, "Add new feature", "antonio", "john", PrStatus::Open, 2),
        pr(2, "Fix bug in handler", "miguel", "jane", PrStatus::Open, 1),
        pr(3, "Update dependencies", "rita", "bob", PrStatus::Merged, 24),
        pr(4, "Refactor authentication", "antonio", "alice", PrStatus::Closed, 48),
        pr(5, "Add tests for API", "miguel", "charlie", PrStatus::Open, 3),
    ]
}

/// Mock pull request list with status badges.
pub struct PullRequestsPane {
    state: PaneState,
    delay: Duration,
    prs: Vec<PullRequest>,
}

impl PullRequestsPane {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: PaneState::new("Pull Requests", PaneKind::PullRequests, ID),
            delay,
            prs: Vec::new(),
        }
    }

    fn count(&self, status: PrStatus) -> usize {
        self.prs.iter().filter(|p| p.status == status).count()
    }

    fn footer(&self, theme: &Palette) -> Line<'static> {
        let list = &self.state.list;
        let mut spans = vec![Span::styled(
            format!("{}/{}", list.selected_index() + 1, list.len()),
            theme.title(true),
        )];
        for status in [PrStatus::Open, PrStatus::Closed, PrStatus::Merged] {
            let n = self.count(status);
            if n == 0 {
                continue;
            }
            let label = match status {
                PrStatus::Open => "Open",
                PrStatus::Closed => "Closed",
                PrStatus::Merged => "Merged",
            };
            spans.push(Span::styled(" │ ", theme.dimmed()));
            spans.push(Span::styled(format!("{label}: {n}"), theme.kind(status.kind())));
        }
        Line::from(spans)
    }
}

impl Pane for PullRequestsPane {
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
            Message::PullRequests(prs) => {
                self.state.end_load();
                self.state.list.clear();
                self.prs = prs.clone();
                for pr in prs {
                    self.state.list.push(
                        ListItem::new(
                            format!("#{}: {} [{}]", pr.id, pr.title, pr.package),
                            pr.id.to_string(),
                            pr.status.kind(),
                        )
                        .with_meta(ItemMeta::PullRequest(pr.clone())),
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
            placeholder(&self.state, theme, "Loading pull requests...", "No pull requests")
        {
            return lines;
        }
        let mut lines = render_list(&self.state, theme, |item| {
            let badge = match &item.meta {
                ItemMeta::PullRequest(pr) => pr.status.badge(),
                _ => "[UNKNOWN]",
            };
            let style = theme.kind(item.kind);
            vec![
                Span::styled(badge, style),
                Span::styled(format!(" {}", item.display), style),
            ]
        });
        lines.push(Line::raw(""));
        lines.push(self.footer(theme));
        lines.extend(help_line(&self.state, theme, "j/k: Navigate  g/G: Top/Bottom  r: Refresh"));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, "refresh");
        self.state.begin_load();
        let delay = self.delay;
        Some(Cmd::task(ID, move || {
            thread::sleep(delay);
            Message::PullRequests(gather())
        }))
    }

    fn handle_action(&mut self, action: &str) -> Option<Cmd> {
        match action {
            "refresh" => self.refresh(),
            _ => None,
        }
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &["refresh", "view", "checkout"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::PaneEvent;

    fn loaded() -> PullRequestsPane {
        let mut p = PullRequestsPane::new(Duration::ZERO);
        let msg = p.refresh().and_then(Cmd::run_now).unwrap();
        p.update(PaneEvent::Message(&msg));
        p
    }

    #[test]
    fn failed_load_ends_loading() {
        let mut p = PullRequestsPane::new(Duration::ZERO);
        p.refresh();
        p.update(PaneEvent::Message(&Message::Failed {
            pane: ID,
            error: "task panicked".into(),
        }));
        assert!(!p.state.is_loading());
    }

    #[test]
    fn five_requests_with_status_kinds() {
        let p = loaded();
        let items = p.state.list.items();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].display, "#1: Add new feature [antonio]");
        assert_eq!(items[0].value, "1");
        assert_eq!(items[2].kind, ItemKind::Merged);
        assert_eq!(items[3].kind, ItemKind::Closed);
    }

    #[test]
    fn footer_counts_by_status() {
        let p = loaded();
        let text: String = p
            .footer(&crate::theme::DEFAULT)
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(text, "1/5 │ Open: 3 │ Closed: 1 │ Merged: 1");
    }
}
