//! Queue card - the playlist with the current entry marked

use super::truncate_str;
use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = theme.card(format!(" {} Queue ", icons.queue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner)[1];

    let items = &state.queue_items;
    if items.is_empty() {
        let empty_msg = Line::from(Span::styled(
            "Queue is empty.",
            Style::default().fg(theme.palette.fg_secondary),
        ));
        frame.render_widget(Paragraph::new(empty_msg), padded);
        return;
    }

    let header = Line::from(vec![
        Span::styled(
            format!("{} tracks", items.len()),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw("  "),
        if state.shuffle {
            Span::styled(
                format!("{} Shuffle ON", icons.shuffle),
                Style::default().fg(theme.palette.accent),
            )
        } else {
            Span::styled(
                format!("{} Shuffle OFF", icons.shuffle),
                Style::default().fg(theme.palette.fg_secondary),
            )
        },
    ]);

    // Header, blank line and hints
    let visible_height = padded.height.saturating_sub(3) as usize;
    let max_width = padded.width.saturating_sub(7) as usize;
    let scroll_offset = scroll_offset(state.queue_index, visible_height);

    let mut lines: Vec<Line> = vec![header, Line::default()];

    for (i, name) in items.iter().enumerate().skip(scroll_offset).take(visible_height) {
        let is_current = state.queue_index == Some(i);

        let prefix = if is_current {
            format!("{} ", icons.play)
        } else {
            "  ".to_string()
        };

        let style = if is_current {
            Style::default()
                .fg(theme.palette.fg_primary)
                .bg(theme.palette.bg_highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.palette.fg_primary)
        };

        let prefix_style = if is_current {
            Style::default().fg(theme.palette.accent)
        } else {
            Style::default().fg(theme.palette.fg_secondary)
        };

        lines.push(Line::from(vec![
            Span::styled(prefix, prefix_style),
            Span::styled(
                format!("{:>3}. ", i + 1),
                Style::default().fg(theme.palette.fg_secondary),
            ),
            Span::styled(truncate_str(name, max_width), style),
        ]));
    }

    // Hints at the bottom
    if lines.len() < (padded.height as usize) {
        let remaining = (padded.height as usize) - lines.len();
        for _ in 0..remaining.saturating_sub(1) {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "n/p: Next/Prev  r: Repeat  s: Shuffle",
            Style::default().fg(theme.palette.fg_secondary),
        )));
    }

    frame.render_widget(Paragraph::new(lines), padded);
}

/// First row to draw so the current entry stays in view.
fn scroll_offset(current: Option<usize>, visible: usize) -> usize {
    match current {
        Some(i) if visible > 0 && i >= visible => i + 1 - visible,
        _ => 0,
    }
}
