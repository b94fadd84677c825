//! Text measuring and layout arithmetic used by the renderer.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Focus};
use crate::panes::Pane;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
const DETAIL_LINE_MAX: usize = 120;

pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|ch| {
            if ch == '\t' {
                4
            } else {
                UnicodeWidthChar::width(ch).unwrap_or(0)
            }
        })
        .sum()
}

/// Cut `s` to at most `max` columns, ending in `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max >= 3 {
        out.push_str("...");
    }
    out
}

/// Detail view lines are clipped at a fixed width.
pub fn clip_detail(line: &str) -> String {
    match line.char_indices().nth(DETAIL_LINE_MAX) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

pub fn right_status() -> String {
    format!("gitdeck v{VERSION}")
}

pub fn left_status(app: &App) -> String {
    if let Some(query) = app.filter() {
        return format!("Filter: {query}_ | Enter: Jump | Esc: Cancel");
    }
    if let Some(notice) = app.notice() {
        return notice.to_string();
    }
    let title = app.active_pane().map_or("Unknown", |p| p.title());
    let n = app.panes().len();
    let focus_hint = match app.focus() {
        Focus::Panes => "Space: Details",
        Focus::Details => "j/k: Navigate details | Space: Panes",
    };
    format!(
        "Active: {title} | 1-{n}: Switch | Tab: Next | {focus_hint} | /: Filter | ?: Help | q: Quit"
    )
}

/// Left text truncated to leave room for the right text, then padded to `width`.
pub fn status_line(left: &str, right: &str, width: usize) -> String {
    let max_left = width.saturating_sub(display_width(right) + 5);
    let left = truncate(left, max_left);
    let pad = width.saturating_sub(display_width(&left) + display_width(right));
    format!("{left}{}{right}", " ".repeat(pad))
}

/// Rectangle of `w` x `h` centred in `area`, clamped to it.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
