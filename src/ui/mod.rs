pub mod layout;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, Focus, LEFT_COLUMN_PANES};
use crate::panes::Pane;
use crate::theme::Palette;

pub fn draw(f: &mut Frame, app: &App, theme: &Palette) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let body = rows[0];

    let left_w = body.width * 2 / 3;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(left_w), Constraint::Min(0)])
        .split(body);

    draw_left_column(f, app, theme, cols[0]);

    let active = app.active_index();
    match app.panes().get(active) {
        Some(pane) if active >= LEFT_COLUMN_PANES => {
            draw_pane(f, pane.as_ref(), active + 1, theme, cols[1]);
        }
        _ => draw_details(f, app, theme, cols[1]),
    }

    draw_status_bar(f, app, theme, rows[1]);

    if app.show_help() {
        draw_help(f, app, theme, area);
    }
}

fn draw_left_column(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let stacked = app.panes().len().min(LEFT_COLUMN_PANES);
    if stacked == 0 {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, stacked as u32); stacked];
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    for (i, pane) in app.panes().iter().take(stacked).enumerate() {
        draw_pane(f, pane.as_ref(), i + 1, theme, slots[i]);
    }
}

fn pane_block(title: String, active: bool, theme: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(active))
        .title(Span::styled(title, theme.title(active)))
}

fn draw_pane(f: &mut Frame, pane: &dyn Pane, number: usize, theme: &Palette, area: Rect) {
    let active = pane.state().is_active();
    let block = pane_block(format!("[{number}] {}", pane.title()), active, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(pane.view(theme)), inner);
}

fn draw_details(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let focused = app.focus() == Focus::Details;
    let block = pane_block("Details".to_string(), focused, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let details = app.details();
    if details.lines.is_empty() {
        f.render_widget(
            Paragraph::new(Line::styled("Select a file to see diff", theme.info())),
            inner,
        );
        return;
    }

    let rows = inner.height as usize;
    let start = details.scroll.min(details.lines.len().saturating_sub(1));
    let end = (start + rows).min(details.lines.len());

    let mut lines = Vec::with_capacity(rows + 2);
    if start > 0 {
        lines.push(Line::styled("  ↑ more content above", theme.dimmed()));
    }
    for (offset, raw) in details.lines[start..end].iter().enumerate() {
        let mut style = theme.diff_line(raw);
        if focused && start + offset == details.selected_line {
            style = style.bg(theme.selection_bg).add_modifier(Modifier::BOLD);
        }
        lines.push(Line::styled(layout::clip_detail(raw), style));
    }
    if end < details.lines.len() {
        lines.push(Line::styled("  ↓ more content below", theme.dimmed()));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_status_bar(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let text = layout::status_line(
        &layout::left_status(app),
        &layout::right_status(),
        area.width as usize,
    );
    let style = Style::default().bg(theme.status_bg).fg(theme.accent_primary);
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_help(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let Some(pane) = app.active_pane() else {
        return;
    };

    let mut lines = vec![
        Line::styled("Global", theme.title(true)),
        Line::raw("  1-9 / Tab / Shift+Tab   switch pane"),
        Line::raw("  Space                   toggle details focus"),
        Line::raw("  Ctrl+Up / Ctrl+Down     scroll details"),
        Line::raw("  /                       filter and jump"),
        Line::raw("  Ctrl+R                  refresh all"),
        Line::raw("  q / Ctrl+C              quit"),
        Line::raw(""),
        Line::styled(format!("{} actions", pane.title()), theme.title(true)),
    ];
    let actions = pane.available_actions();
    if actions.is_empty() {
        lines.push(Line::styled("  (none)", theme.dimmed()));
    }
    for action in actions {
        lines.push(Line::styled(format!("  {action}"), theme.text()));
    }

    let h = lines.len() as u16 + 2;
    let modal = layout::centered(area, 52, h);
    f.render_widget(Clear, modal);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(true))
        .title(" Help (? or Esc to close) ");
    let inner = block.inner(modal);
    f.render_widget(block, modal);
    f.render_widget(Paragraph::new(lines), inner);
}
