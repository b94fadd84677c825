//! Application router: owns the panes, focus, detail view and key routing.

use std::{
    path::Path,
    time::{Duration, Instant},
};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use tracing::{debug, info, warn};

use crate::config::{Config, Layout};
use crate::details::{self, DetailsPane, DiffCache};
use crate::message::{Cmd, Message};
use crate::panes::{
    Pane, PaneEvent, branches::BranchesPane, commits::CommitsPane, files::FilesPane,
    greeting::GreetingPane, packages::PackagesPane, pull_requests::PullRequestsPane,
    stash::StashPane, status::StatusPane, workspace::WorkspacePane,
};

/// Panes stacked in the left column; any further pane takes the right column.
pub const LEFT_COLUMN_PANES: usize = 4;
/// Rows taken by borders, footers and help text inside a pane.
const PANE_CHROME_ROWS: u16 = 6;
/// Rows the detail view loses to the status bar and its own border.
const DETAILS_CHROME_ROWS: u16 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Panes,
    Details,
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Message(Message),
}

pub struct App {
    panes: Vec<Box<dyn Pane>>,
    active: usize,
    width: u16,
    height: u16,
    focus: Focus,
    details: DetailsPane,
    diffs: DiffCache,
    notice: Option<(String, Instant)>,
    notice_ttl: Duration,
    filter: Option<String>,
    show_help: bool,
    quitting: bool,
}

/// Pane set for a layout, in display order.
pub fn build_panes(config: &Config, repo: &Path) -> Vec<Box<dyn Pane>> {
    match config.layout {
        Layout::Git => vec![
            Box::new(StatusPane::new(repo)),
            Box::new(FilesPane::new(repo, config.show_hidden, config.max_files)),
            Box::new(BranchesPane::new(repo)),
            Box::new(CommitsPane::new(repo, config.commit_limit)),
            Box::new(StashPane::new(repo)),
        ],
        Layout::Workspace => vec![
            Box::new(WorkspacePane::new(config.mock_delay)),
            Box::new(PackagesPane::new(config.mock_delay)),
            Box::new(PullRequestsPane::new(config.mock_delay)),
            Box::new(GreetingPane::new()),
        ],
    }
}

impl App {
    pub fn new(panes: Vec<Box<dyn Pane>>, notice_ttl: Duration) -> Self {
        Self {
            panes,
            active: 0,
            width: 0,
            height: 0,
            focus: Focus::Panes,
            details: DetailsPane::default(),
            diffs: DiffCache::default(),
            notice: None,
            notice_ttl,
            filter: None,
            show_help: false,
            quitting: false,
        }
    }

    pub fn from_config(config: &Config, repo: &Path) -> Self {
        Self::new(build_panes(config, repo), config.notice_ttl)
    }

    pub fn panes(&self) -> &[Box<dyn Pane>] {
        &self.panes
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_pane(&self) -> Option<&dyn Pane> {
        self.panes.get(self.active).map(|p| p.as_ref())
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn details(&self) -> &DetailsPane {
        &self.details
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Initialise every pane; the first one starts active.
    pub fn init(&mut self) -> Vec<Cmd> {
        info!(panes = self.panes.len(), "starting");
        let cmds = self.panes.iter_mut().filter_map(|p| p.init()).collect();
        self.set_active_pane(0);
        cmds
    }

    pub fn set_active_pane(&mut self, index: usize) {
        if index >= self.panes.len() {
            return;
        }
        self.active = index;
        for (i, pane) in self.panes.iter_mut().enumerate() {
            if i == index {
                debug!(pane = pane.id(), kind = ?pane.state().kind(), "activate");
                pane.state_mut().activate();
            } else {
                pane.state_mut().deactivate();
            }
        }
    }

    pub fn next_pane(&mut self) {
        if !self.panes.is_empty() {
            self.set_active_pane((self.active + 1) % self.panes.len());
        }
    }

    pub fn prev_pane(&mut self) {
        let n = self.panes.len();
        if n > 0 {
            self.set_active_pane((self.active + n - 1) % n);
        }
    }

    pub fn refresh_all(&mut self) -> Vec<Cmd> {
        debug!("refresh all");
        self.diffs.clear();
        self.panes.iter_mut().filter_map(|p| p.refresh()).collect()
    }

    pub fn dispatch(&mut self, event: AppEvent) -> Vec<Cmd> {
        match event {
            AppEvent::Resize(w, h) => {
                self.width = w;
                self.height = h;
                Vec::new()
            }
            AppEvent::Mouse(_) => Vec::new(),
            AppEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            AppEvent::Key(_) => Vec::new(),
            AppEvent::Message(msg) => self.handle_message(msg),
        }
    }

    fn details_rows(&self) -> usize {
        self.height.saturating_sub(DETAILS_CHROME_ROWS).max(1) as usize
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Cmd> {
        if self.filter.is_some() {
            self.filter_key(key);
            return Vec::new();
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let on_panes = self.focus == Focus::Panes;
        match key.code {
            KeyCode::Char('c') if ctrl => return self.quit(),
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Char('r') if ctrl => return self.refresh_all(),
            KeyCode::Up if ctrl => {
                self.details.scroll_up();
                return Vec::new();
            }
            KeyCode::Down if ctrl => {
                let rows = self.details_rows();
                self.details.scroll_down(rows);
                return Vec::new();
            }
            KeyCode::Char(' ') => {
                self.toggle_focus();
                return Vec::new();
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
                return Vec::new();
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return Vec::new();
            }
            KeyCode::Tab => {
                if on_panes {
                    self.next_pane();
                }
                return Vec::new();
            }
            KeyCode::BackTab => {
                if on_panes {
                    self.prev_pane();
                }
                return Vec::new();
            }
            KeyCode::Char(c @ '1'..='9') if (c as usize - '0' as usize) <= self.panes.len() => {
                if on_panes {
                    self.set_active_pane(c as usize - '1' as usize);
                }
                return Vec::new();
            }
            KeyCode::Char('/') if on_panes => {
                self.filter = Some(String::new());
                return Vec::new();
            }
            _ => {}
        }

        if !on_panes {
            self.details_key(key);
            return Vec::new();
        }

        self.panes
            .get_mut(self.active)
            .and_then(|p| p.update(PaneEvent::Key(key)))
            .into_iter()
            .collect()
    }

    fn quit(&mut self) -> Vec<Cmd> {
        info!("quit requested");
        self.quitting = true;
        vec![Cmd::Quit]
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Panes => {
                self.details.reset();
                Focus::Details
            }
            Focus::Details => Focus::Panes,
        };
    }

    fn details_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.details.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.details.move_up(),
            KeyCode::Char('g') | KeyCode::Home => self.details.move_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.details.move_to_bottom(),
            _ => return,
        }
        let rows = self.details_rows();
        self.details.adjust_scroll(rows);
    }

    /// Keys typed into the `/` prompt. Enter jumps to the first match.
    fn filter_key(&mut self, key: KeyEvent) {
        let Some(query) = self.filter.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.filter = None,
            KeyCode::Enter => {
                let query = std::mem::take(query);
                self.filter = None;
                let Some(pane) = self.panes.get_mut(self.active) else {
                    return;
                };
                let list = &mut pane.state_mut().list;
                match list.filter_indices(&query).first().copied() {
                    Some(i) => list.select(i),
                    None => self.set_notice(format!("No match for '{query}'")),
                }
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => query.push(c),
            _ => {}
        }
    }

    fn set_notice(&mut self, text: String) {
        self.notice = Some((text, Instant::now()));
    }

    fn handle_message(&mut self, msg: Message) -> Vec<Cmd> {
        let mut cmds = Vec::new();
        match &msg {
            Message::Diff { key, lines } => self.diffs.insert(key.clone(), lines.clone()),
            Message::Files {
                listing: Ok(listing),
                ..
            } => {
                for entry in listing.entries.iter().filter(|e| !e.is_dir) {
                    self.diffs.remove(&format!("file:{}", entry.path.display()));
                }
            }
            Message::ActionComplete {
                action,
                success,
                message,
            } => {
                if *success {
                    info!(action = %action, "{message}");
                    self.set_notice(format!("✓ {message}"));
                    cmds.extend(self.refresh_all());
                } else {
                    warn!(action = %action, "{message}");
                    self.set_notice(format!("✗ {message}"));
                }
            }
            Message::Failed { pane, error } => {
                warn!(pane = %pane, "{error}");
                self.set_notice(format!("{pane}: {error}"));
            }
            _ => {}
        }

        for pane in &mut self.panes {
            if let Some(cmd) = pane.update(PaneEvent::Message(&msg)) {
                cmds.push(cmd);
            }
        }
        cmds
    }

    /// Per-frame bookkeeping: list windows, derived detail lines, notice expiry.
    pub fn tick(&mut self, now: Instant) {
        let body = self.height.saturating_sub(1);
        let stacked = self.panes.len().clamp(1, LEFT_COLUMN_PANES) as u16;
        let left_window = (body / stacked).saturating_sub(PANE_CHROME_ROWS).max(1) as usize;
        let right_window = body.saturating_sub(PANE_CHROME_ROWS).max(1) as usize;
        for (i, pane) in self.panes.iter_mut().enumerate() {
            let window = if i < LEFT_COLUMN_PANES { left_window } else { right_window };
            pane.state_mut().list.set_window(window);
        }

        let lines = match self.panes.get(self.active) {
            Some(pane) => details::derive_lines(pane.selected_item(), pane.title(), &self.diffs),
            None => vec!["No pane selected".to_string()],
        };
        self.details.set_lines(lines);
        let rows = self.details_rows();
        self.details.adjust_scroll(rows);

        let expired = self
            .notice
            .as_ref()
            .is_some_and(|(_, at)| now.duration_since(*at) >= self.notice_ttl);
        if expired {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_list::DirListing;
    use crate::git_ops::{FileInfo, FileStatus};
    use crate::panes::test_support::*;
    use std::path::PathBuf;

    fn mock_app(count: usize) -> App {
        let mut panes: Vec<Box<dyn Pane>> = vec![
            Box::new(WorkspacePane::new(Duration::ZERO)),
            Box::new(PackagesPane::new(Duration::ZERO)),
            Box::new(PullRequestsPane::new(Duration::ZERO)),
            Box::new(GreetingPane::new()),
            Box::new(GreetingPane::new()),
        ];
        panes.truncate(count);
        let mut app = App::new(panes, Duration::from_secs(4));
        app.dispatch(AppEvent::Resize(120, 40));
        app
    }

    fn run_all(app: &mut App, cmds: Vec<Cmd>) {
        let mut queue = cmds;
        while let Some(cmd) = queue.pop() {
            if let Some(msg) = cmd.run_now() {
                queue.extend(app.dispatch(AppEvent::Message(msg)));
            }
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn active_flags(app: &App) -> Vec<bool> {
        app.panes().iter().map(|p| p.state().is_active()).collect()
    }

    #[test]
    fn set_active_pane_activates_exactly_one() {
        let mut app = mock_app(5);
        app.init();
        app.set_active_pane(2);
        assert_eq!(app.active_index(), 2);
        assert_eq!(active_flags(&app), vec![false, false, true, false, false]);

        app.set_active_pane(9);
        assert_eq!(app.active_index(), 2);
    }

    #[test]
    fn tab_wraps_both_ways() {
        let mut app = mock_app(4);
        app.init();
        app.dispatch(AppEvent::Key(key(KeyCode::BackTab)));
        assert_eq!(app.active_index(), 3);
        app.dispatch(AppEvent::Key(key(KeyCode::Tab)));
        assert_eq!(app.active_index(), 0);
        app.dispatch(AppEvent::Key(ch('3')));
        assert_eq!(app.active_index(), 2);
        // out of range digits are not pane switches
        app.dispatch(AppEvent::Key(ch('7')));
        assert_eq!(app.active_index(), 2);
    }

    #[test]
    fn refresh_completes_after_switching_panes() {
        let mut app = mock_app(4);
        let cmds = app.init();
        assert_eq!(cmds.len(), 3);
        assert!(app.panes()[0].state().is_loading());

        app.set_active_pane(1);
        run_all(&mut app, cmds);

        for pane in app.panes() {
            assert!(!pane.state().is_loading(), "{} still loading", pane.id());
        }
        assert_eq!(app.panes()[0].state().list.len(), 3);
        assert_eq!(app.panes()[1].state().list.len(), 3);
        assert_eq!(app.panes()[2].state().list.len(), 5);
    }

    #[test]
    fn keys_reach_only_the_active_pane() {
        let mut app = mock_app(4);
        let cmds = app.init();
        run_all(&mut app, cmds);
        app.set_active_pane(1);
        app.dispatch(AppEvent::Key(ch('j')));
        assert_eq!(app.panes()[1].state().list.selected_index(), 1);
        assert_eq!(app.panes()[0].state().list.selected_index(), 0);
        assert_eq!(app.panes()[2].state().list.selected_index(), 0);
    }

    #[test]
    fn details_focus_captures_navigation() {
        let mut app = mock_app(4);
        let cmds = app.init();
        run_all(&mut app, cmds);
        app.tick(Instant::now());
        assert_eq!(app.details().lines[0], "Selected Item Details:");

        app.dispatch(AppEvent::Key(ch(' ')));
        assert_eq!(app.focus(), Focus::Details);
        app.dispatch(AppEvent::Key(ch('j')));
        app.dispatch(AppEvent::Key(ch('j')));
        assert_eq!(app.details().selected_line, 2);
        assert_eq!(app.panes()[0].state().list.selected_index(), 0);

        // pane switching is ignored while details hold focus
        app.dispatch(AppEvent::Key(key(KeyCode::Tab)));
        app.dispatch(AppEvent::Key(ch('2')));
        assert_eq!(app.active_index(), 0);

        app.dispatch(AppEvent::Key(ch(' ')));
        assert_eq!(app.focus(), Focus::Panes);
    }

    #[test]
    fn refresh_all_reloads_every_pane() {
        let mut app = mock_app(4);
        let cmds = app.init();
        run_all(&mut app, cmds);
        let cmds = app.dispatch(AppEvent::Key(ctrl('r')));
        assert_eq!(cmds.len(), 3);
        assert!(app.panes()[2].state().is_loading());
        run_all(&mut app, cmds);
        assert!(!app.panes()[2].state().is_loading());
    }

    #[test]
    fn quit_keys() {
        let mut app = mock_app(4);
        let cmds = app.dispatch(AppEvent::Key(ch('q')));
        assert!(matches!(cmds.as_slice(), [Cmd::Quit]));
        assert!(app.is_quitting());

        let mut app = mock_app(4);
        let cmds = app.dispatch(AppEvent::Key(ctrl('c')));
        assert!(matches!(cmds.as_slice(), [Cmd::Quit]));
    }

    #[test]
    fn filter_prompt_jumps_to_first_match() {
        let mut app = mock_app(4);
        let cmds = app.init();
        run_all(&mut app, cmds);
        app.set_active_pane(2);

        app.dispatch(AppEvent::Key(ch('/')));
        assert_eq!(app.filter(), Some(""));
        for c in "tests".chars() {
            app.dispatch(AppEvent::Key(ch(c)));
        }
        // typed keys do not leak into the pane or the router
        assert_eq!(app.active_index(), 2);
        app.dispatch(AppEvent::Key(key(KeyCode::Enter)));
        assert_eq!(app.filter(), None);
        assert_eq!(app.panes()[2].state().list.selected_index(), 4);

        app.dispatch(AppEvent::Key(ch('/')));
        app.dispatch(AppEvent::Key(ch('z')));
        app.dispatch(AppEvent::Key(key(KeyCode::Esc)));
        assert_eq!(app.filter(), None);
        assert_eq!(app.panes()[2].state().list.selected_index(), 4);
    }

    #[test]
    fn failed_action_sets_notice_that_expires() {
        let mut app = mock_app(4);
        let cmds = app.dispatch(AppEvent::Message(Message::ActionComplete {
            action: "push".into(),
            success: false,
            message: "rejected".into(),
        }));
        assert!(cmds.is_empty());
        assert_eq!(app.notice(), Some("✗ rejected"));
        app.tick(Instant::now() + Duration::from_secs(5));
        assert_eq!(app.notice(), None);
    }

    #[test]
    fn diff_completion_fills_details() {
        let mut app = mock_app(4);
        app.dispatch(AppEvent::Message(Message::Diff {
            key: "commit:abc".into(),
            lines: vec!["+x".into()],
        }));
        assert_eq!(app.diffs.get("commit:abc"), Some(vec!["+x".to_string()]));
    }

    #[test]
    fn refresh_all_drops_cached_diffs() {
        let mut app = mock_app(4);
        app.dispatch(AppEvent::Message(Message::Diff {
            key: "file:/r/a.rs".into(),
            lines: vec!["+old".into()],
        }));
        app.dispatch(AppEvent::Key(ctrl('r')));
        assert_eq!(app.diffs.get("file:/r/a.rs"), None);
    }

    #[test]
    fn new_listing_drops_its_files_diffs() {
        let mut app = mock_app(4);
        for key in ["file:/r/a.rs", "file:/r/b.rs", "commit:abc"] {
            app.dispatch(AppEvent::Message(Message::Diff {
                key: key.into(),
                lines: vec!["+x".into()],
            }));
        }
        let listing = DirListing {
            entries: vec![FileInfo {
                name: "a.rs".into(),
                path: PathBuf::from("/r/a.rs"),
                is_dir: false,
                status: FileStatus::Modified,
            }],
            total: 1,
        };
        app.dispatch(AppEvent::Message(Message::Files {
            dir: PathBuf::from("/r"),
            listing: Ok(listing),
        }));
        assert_eq!(app.diffs.get("file:/r/a.rs"), None);
        assert!(app.diffs.get("file:/r/b.rs").is_some());
        assert!(app.diffs.get("commit:abc").is_some());
    }

    #[test]
    fn windows_follow_terminal_height() {
        let mut app = mock_app(5);
        app.tick(Instant::now());
        // (40 - 1) / 4 - 6
        assert_eq!(app.panes()[0].state().list.window(), 3);
        assert_eq!(app.panes()[4].state().list.window(), 33);
    }

    #[test]
    fn mouse_and_help() {
        let mut app = mock_app(4);
        assert!(app
            .dispatch(AppEvent::Mouse(MouseEvent {
                kind: crossterm::event::MouseEventKind::Moved,
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            }))
            .is_empty());
        app.dispatch(AppEvent::Key(ch('?')));
        assert!(app.show_help());
        app.dispatch(AppEvent::Key(key(KeyCode::Esc)));
        assert!(!app.show_help());
    }
}
