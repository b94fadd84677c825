use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use tracing::{debug, warn};

use super::{Pane, PaneKind, PaneState, help_line, load_diff, navigate, placeholder, render_list};
use crate::details::diff_key;
use crate::fs_list::{self, DirListing};
use crate::git_ops::{self, FileStatus};
use crate::list::{ItemKind, ItemMeta, ListItem};
use crate::message::{Cmd, Message};
use crate::theme::Palette;

const ID: &str = "files";
const PARENT: &str = "..";

fn read_listing(repo: &Path, dir: &Path, show_hidden: bool, max_files: usize) -> Message {
    let map = match git_ops::status_map(repo) {
        Ok(map) => Some(map),
        Err(e) => {
            debug!("no status for {}: {e}", dir.display());
            None
        }
    };
    let listing = fs_list::list_dir(dir, show_hidden, max_files, map.as_ref()).map_err(|e| {
        warn!("read_dir {} failed: {e}", dir.display());
        e.to_string()
    });
    Message::Files {
        dir: dir.to_path_buf(),
        listing,
    }
}

/// Directory browser rooted at the repository, with per-file git status.
pub struct FilesPane {
    state: PaneState,
    repo: PathBuf,
    root: PathBuf,
    current: PathBuf,
    show_hidden: bool,
    max_files: usize,
}

impl FilesPane {
    pub fn new(repo: &Path, show_hidden: bool, max_files: usize) -> Self {
        Self {
            state: PaneState::new("Files", PaneKind::Files, ID),
            repo: repo.to_path_buf(),
            root: repo.to_path_buf(),
            current: repo.to_path_buf(),
            show_hidden,
            max_files,
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current
    }

    fn listing_task(&self) -> Cmd {
        let repo = self.repo.clone();
        let dir = self.current.clone();
        let (hidden, max) = (self.show_hidden, self.max_files);
        Cmd::task(ID, move || read_listing(&repo, &dir, hidden, max))
    }

    fn apply(&mut self, listing: &Result<DirListing, String>) {
        let list = &mut self.state.list;
        list.clear();

        if self.current != self.root {
            list.push(ListItem::new("../", PARENT, ItemKind::Directory).with_icon("📁"));
        }

        let listing = match listing {
            Ok(l) => l,
            Err(e) => {
                list.push(ListItem::new(
                    format!("Error reading directory: {e}"),
                    "",
                    ItemKind::Error,
                ));
                return;
            }
        };

        if listing.truncated(self.max_files) {
            list.push(ListItem::new(
                format!(
                    "Directory has {} items (showing first {})",
                    listing.total, self.max_files
                ),
                "",
                ItemKind::Info,
            ));
        }

        for f in &listing.entries {
            let (display, kind) = if f.is_dir {
                (format!("{}/", f.name), ItemKind::Directory)
            } else {
                (f.name.clone(), ItemKind::File(f.status))
            };
            list.push(
                ListItem::new(display, f.path.to_string_lossy(), kind)
                    .with_meta(ItemMeta::File(f.clone())),
            );
        }
    }

    fn change_dir(&mut self, dir: PathBuf) -> Option<Cmd> {
        self.current = dir;
        self.state.list.move_to_top();
        self.refresh()
    }

    fn up(&mut self) -> Option<Cmd> {
        let parent = fs_list::parent_within(&self.root, &self.current)?;
        self.change_dir(parent)
    }

    fn selected_file(&self) -> Option<(PathBuf, bool)> {
        match &self.state.list.selected_item()?.meta {
            ItemMeta::File(f) => Some((f.path.clone(), f.is_dir)),
            _ => None,
        }
    }

    fn index_op(&self, action: &'static str) -> Option<Cmd> {
        let (path, is_dir) = self.selected_file()?;
        if is_dir {
            return None;
        }
        let repo = self.repo.clone();
        let dir = self.current.clone();
        let (hidden, max) = (self.show_hidden, self.max_files);
        Some(Cmd::task(ID, move || {
            let result = match action {
                "stage" => git_ops::stage(&repo, &path),
                _ => git_ops::unstage(&repo, &path),
            };
            match result {
                Ok(()) => read_listing(&repo, &dir, hidden, max),
                Err(e) => Message::ActionComplete {
                    action: action.to_string(),
                    success: false,
                    message: e.to_string(),
                },
            }
        }))
    }

    fn diff(&self) -> Option<Cmd> {
        let item = self.state.list.selected_item()?;
        let key = diff_key(item)?;
        let (path, _) = self.selected_file()?;
        let repo = self.repo.clone();
        Some(load_diff(ID, key, move || git_ops::file_diff(&repo, &path)))
    }
}

impl Pane for FilesPane {
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
            KeyCode::Enter => self.handle_action("open"),
            KeyCode::Char('l') | KeyCode::Right => self.handle_action("enter_directory"),
            KeyCode::Char('h') | KeyCode::Left => self.handle_action("up_directory"),
            KeyCode::Char('.') => self.handle_action("toggle_hidden"),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('a') => self.handle_action("stage"),
            KeyCode::Char('u') => self.handle_action("unstage"),
            KeyCode::Char('d') => self.handle_action("diff"),
            _ => None,
        }
    }

    fn handle_message(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Files { dir, listing } if *dir == self.current => {
                self.state.end_load();
                self.apply(listing);
            }
            Message::Failed { pane: ID, error } => {
                self.state.end_load();
                self.apply(&Err(error.clone()));
            }
            _ => {}
        }
        None
    }

    fn view(&self, theme: &Palette) -> Vec<Line<'static>> {
        if let Some(lines) =
            placeholder(&self.state, theme, "Loading files...", "No files in directory")
        {
            return lines;
        }
        let mut lines = render_list(&self.state, theme, |item| {
            let style = theme.kind(item.kind);
            let marker = match item.kind {
                ItemKind::File(status) if status != FileStatus::Clean => status.marker(),
                _ => ' ',
            };
            vec![
                Span::styled(format!("{marker} "), style),
                Span::styled(item.display.clone(), style),
            ]
        });
        lines.extend(help_line(
            &self.state,
            theme,
            "enter: Open  h/l: Up/In  .: Hidden  a/u: Stage/Unstage  d: Diff",
        ));
        lines
    }

    fn refresh(&mut self) -> Option<Cmd> {
        debug!(pane = ID, dir = %self.current.display(), "refresh");
        self.state.begin_load();
        Some(self.listing_task())
    }

    fn handle_action(&mut self, action: &str) -> Option<Cmd> {
        match action {
            "refresh" => self.refresh(),
            "toggle_hidden" => {
                self.show_hidden = !self.show_hidden;
                self.refresh()
            }
            "up_directory" => self.up(),
            "open" | "enter_directory" => {
                let item = self.state.list.selected_item()?;
                if item.value == PARENT {
                    return self.up();
                }
                match self.selected_file()? {
                    (path, true) => self.change_dir(path),
                    (_, false) if action == "open" => self.diff(),
                    _ => None,
                }
            }
            "stage" => self.index_op("stage"),
            "unstage" => self.index_op("unstage"),
            "diff" => self.diff(),
            _ => None,
        }
    }

    fn available_actions(&self) -> &'static [&'static str] {
        &["open", "stage", "unstage", "diff", "refresh", "toggle_hidden"]
    }
}
