//! Pane contract shared by every list panel, plus navigation and rendering helpers.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

use crate::git_ops;
use crate::list::{ListItem, SelectableList};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

pub mod branches;
pub mod commits;
pub mod files;
pub mod greeting;
pub mod packages;
pub mod pull_requests;
pub mod stash;
pub mod status;
pub mod workspace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneKind {
    Status,
    Workspace,
    Files,
    Branches,
    Commits,
    Stash,
    PullRequests,
    Packages,
    Greeting,
}

/// Input delivered to a pane by the router.
#[derive(Clone, Copy, Debug)]
pub enum PaneEvent<'a> {
    Key(KeyEvent),
    Message(&'a Message),
}

/// Identity, flags and list shared by every pane.
#[derive(Debug)]
pub struct PaneState {
    title: &'static str,
    kind: PaneKind,
    id: &'static str,
    active: bool,
    loading: bool,
    pub list: SelectableList,
}

impl PaneState {
    pub fn new(title: &'static str, kind: PaneKind, id: &'static str) -> Self {
        Self {
            title,
            kind,
            id,
            active: false,
            loading: false,
            list: SelectableList::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn kind(&self) -> PaneKind {
        self.kind
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn end_load(&mut self) {
        self.loading = false;
    }
}

pub trait Pane: Send {
    fn state(&self) -> &PaneState;
    fn state_mut(&mut self) -> &mut PaneState;

    fn init(&mut self) -> Option<Cmd> {
        self.refresh()
    }

    /// Keys are honoured only while active; completion messages always.
    fn update(&mut self, event: PaneEvent<'_>) -> Option<Cmd> {
        match event {
            PaneEvent::Key(key) if self.state().is_active() => self.handle_key(key),
            PaneEvent::Key(_) => None,
            PaneEvent::Message(msg) => self.handle_message(msg),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Cmd>;
    fn handle_message(&mut self, msg: &Message) -> Option<Cmd>;
    fn view(&self, theme: &Palette) -> Vec<Line<'static>>;
    fn refresh(&mut self) -> Option<Cmd>;
    fn handle_action(&mut self, action: &str) -> Option<Cmd>;
    fn available_actions(&self) -> &'static [&'static str];

    fn title(&self) -> &'static str {
        self.state().title()
    }

    fn id(&self) -> &'static str {
        self.state().id()
    }

    fn selected_item(&self) -> Option<&ListItem> {
        self.state().list.selected_item()
    }
}

/// j/k/up/down/g/G/Home/End. Returns whether the key was a movement.
pub fn navigate(list: &mut SelectableList, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => list.move_down(),
        KeyCode::Char('k') | KeyCode::Up => list.move_up(),
        KeyCode::Char('g') | KeyCode::Home => list.move_to_top(),
        KeyCode::Char('G') | KeyCode::End => list.move_to_bottom(),
        _ => return false,
    }
    true
}

/// Placeholder shown while loading or when the list is empty.
pub fn placeholder(
    state: &PaneState,
    theme: &Palette,
    loading: &str,
    empty: &str,
) -> Option<Vec<Line<'static>>> {
    if state.is_loading() {
        return Some(vec![Line::styled(loading.to_string(), theme.info())]);
    }
    if state.list.is_empty() {
        return Some(vec![Line::styled(empty.to_string(), theme.info())]);
    }
    None
}

/// Visible window of the list with cursor and scroll indicators.
pub fn render_list<F>(state: &PaneState, theme: &Palette, row: F) -> Vec<Line<'static>>
where
    F: Fn(&ListItem) -> Vec<Span<'static>>,
{
    let list = &state.list;
    let mut lines = Vec::new();
    if list.scroll_offset() > 0 {
        lines.push(Line::styled("  ↑ more items above", theme.dimmed()));
    }

    for (i, item) in list.visible().iter().enumerate() {
        let idx = list.scroll_offset() + i;
        let selected = idx == list.selected_index() && state.is_active();
        let mut spans = if selected {
            vec![Span::styled("❯ ", theme.selected())]
        } else {
            vec![Span::raw("  ")]
        };
        if !item.icon.is_empty() {
            spans.push(Span::raw(format!("{} ", item.icon)));
        }
        let body = row(item);
        if selected {
            spans.extend(body.into_iter().map(|s| Span::styled(s.content, theme.selected())));
        } else {
            spans.extend(body);
        }
        lines.push(Line::from(spans));
    }

    if list.scroll_offset() + list.visible().len() < list.len() {
        lines.push(Line::styled("  ↓ more items below", theme.dimmed()));
    }
    lines
}

/// Row renderer colouring the display text by item kind.
pub fn plain_row(theme: &Palette) -> impl Fn(&ListItem) -> Vec<Span<'static>> + '_ {
    move |item| vec![Span::styled(item.display.clone(), theme.kind(item.kind))]
}

/// `Label: i/n` footer.
pub fn footer(label: &str, list: &SelectableList, theme: &Palette) -> Line<'static> {
    let current = if list.is_empty() { 0 } else { list.selected_index() + 1 };
    Line::from(vec![
        Span::styled(format!("{label}: "), theme.dimmed()),
        Span::styled(format!("{current}/{}", list.len()), theme.title(true)),
    ])
}

pub fn help_line(state: &PaneState, theme: &Palette, text: &str) -> Vec<Line<'static>> {
    if !state.is_active() {
        return Vec::new();
    }
    vec![Line::raw(""), Line::styled(text.to_string(), theme.dimmed())]
}

/// Run a mutating git command off the loop and report how it went.
pub(crate) fn git_action(
    origin: &'static str,
    repo: &Path,
    action: &'static str,
    args: Vec<String>,
    done: String,
) -> Cmd {
    let repo: PathBuf = repo.to_path_buf();
    Cmd::task(origin, move || {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        match git_ops::run_action(&repo, &argv) {
            Ok(_) => Message::ActionComplete {
                action: action.to_string(),
                success: true,
                message: done,
            },
            Err(e) => Message::ActionComplete {
                action: action.to_string(),
                success: false,
                message: e.to_string(),
            },
        }
    })
}

/// An action that needs input the dashboard cannot collect.
pub(crate) fn unsupported(
    origin: &'static str,
    action: &'static str,
    message: &'static str,
) -> Cmd {
    Cmd::task(origin, move || Message::ActionComplete {
        action: action.to_string(),
        success: false,
        message: message.to_string(),
    })
}

/// Load diff lines for the detail view.
pub(crate) fn load_diff<F>(origin: &'static str, key: String, load: F) -> Cmd
where
    F: FnOnce() -> Result<Vec<String>, crate::error::GitError> + Send + 'static,
{
    Cmd::task(origin, move || {
        let lines = load().unwrap_or_else(|e| vec![format!("Error loading diff: {e}")]);
        Message::Diff { key, lines }
    })
}
