use ratatui::style::{Color, Modifier, Style};

use crate::list::ItemKind;

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_tertiary: Color,
    pub border_inactive: Color,
    pub selection_bg: Color,
    pub dimmed: Color,
    pub error: Color,
    pub merged: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_hunk_fg: Color,
    pub status_bg: Color,
}

pub const DEFAULT: Palette = Palette {
    bg: Color::Reset,
    fg: Color::Rgb(221, 214, 254),
    accent_primary: Color::Rgb(4, 181, 117),
    accent_secondary: Color::Rgb(255, 234, 167),
    accent_tertiary: Color::Rgb(116, 185, 255),
    border_inactive: Color::Rgb(108, 92, 231),
    selection_bg: Color::Rgb(45, 55, 72),
    dimmed: Color::Rgb(105, 105, 105),
    error: Color::Rgb(229, 62, 62),
    merged: Color::Rgb(167, 139, 250),
    diff_add_fg: Color::Rgb(0, 255, 0),
    diff_del_fg: Color::Rgb(255, 0, 0),
    diff_hunk_fg: Color::Rgb(0, 255, 255),
    status_bg: Color::Rgb(26, 32, 44),
};

impl Palette {
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dimmed)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.accent_tertiary)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.accent_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.accent_secondary)
        }
    }

    pub fn border(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.accent_primary)
        } else {
            Style::default().fg(self.border_inactive)
        }
    }

    /// Foreground for an unselected row of the given kind.
    pub fn kind(&self, kind: ItemKind) -> Style {
        use crate::git_ops::FileStatus;

        let base = Style::default();
        match kind {
            ItemKind::Branch | ItemKind::Current | ItemKind::Name => base
                .fg(self.accent_primary)
                .add_modifier(Modifier::BOLD),
            ItemKind::Status | ItemKind::Tag | ItemKind::Version => base.fg(self.accent_secondary),
            ItemKind::Upstream
            | ItemKind::Remote
            | ItemKind::Directory
            | ItemKind::Info
            | ItemKind::Empty => base.fg(self.accent_tertiary),
            ItemKind::Metadata | ItemKind::Inactive => base.fg(self.dimmed),
            ItemKind::Error | ItemKind::Closed => base.fg(self.error),
            ItemKind::Open | ItemKind::Active => base.fg(self.accent_primary),
            ItemKind::Merged | ItemKind::Merge => base.fg(self.merged),
            ItemKind::File(status) => match status {
                FileStatus::Modified | FileStatus::Staged => base.fg(self.accent_secondary),
                FileStatus::Added | FileStatus::Renamed | FileStatus::Copied => {
                    base.fg(self.accent_primary)
                }
                FileStatus::Deleted | FileStatus::StagedDeleted => base.fg(self.error),
                FileStatus::Untracked => base.fg(Color::Rgb(242, 93, 148)),
                FileStatus::Ignored | FileStatus::Unknown => base.fg(self.dimmed),
                FileStatus::Clean => base.fg(self.fg),
            },
            ItemKind::Local
            | ItemKind::Commit
            | ItemKind::Reflog
            | ItemKind::Stash
            | ItemKind::Greeting => base.fg(self.fg),
        }
    }

    /// Colour a diff line by its first character.
    pub fn diff_line(&self, line: &str) -> Style {
        match line.chars().next() {
            Some('+') => Style::default().fg(self.diff_add_fg),
            Some('-') => Style::default().fg(self.diff_del_fg),
            Some('@') => Style::default()
                .fg(self.diff_hunk_fg)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::Rgb(204, 204, 204)),
        }
    }
}
