//! Lyrics card: previous, current and next line around the playhead

use super::truncate_str;
use crate::app::state::{AppState, LyricsStatus};
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();

    let block = theme.card(format!(" {} Lyrics ", theme.icons.lyrics));
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

    let dim = Style::default().fg(theme.palette.fg_secondary);

    let placeholder = match state.lyrics_status {
        LyricsStatus::Disabled => Some("Lyrics disabled"),
        LyricsStatus::Loading => Some("Loading..."),
        LyricsStatus::Unavailable => Some("No lyrics available"),
        LyricsStatus::Loaded => None,
    };
    if let Some(msg) = placeholder {
        let top_padding = padded.height.saturating_sub(1) as usize / 2;
        let mut lines = vec![Line::default(); top_padding];
        lines.push(Line::from(Span::styled(msg, dim)));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), padded);
        return;
    }

    let max_width = padded.width.saturating_sub(2) as usize;
    let current_style = Style::default()
        .fg(theme.palette.accent)
        .add_modifier(Modifier::BOLD);

    let display_lines = vec![
        Line::from(Span::styled(
            truncate_str(state.previous_lyric.as_deref().unwrap_or(""), max_width),
            dim,
        )),
        Line::from(Span::styled(
            match state.current_lyric.as_deref() {
                Some(text) => format!("♪ {}", truncate_str(text, max_width)),
                None => "♪".to_string(),
            },
            current_style,
        )),
        Line::from(Span::styled(
            truncate_str(state.next_lyric.as_deref().unwrap_or(""), max_width),
            dim,
        )),
    ];

    // Center vertically
    let top_padding = (padded.height as usize).saturating_sub(display_lines.len()) / 2;
    let mut centered_lines: Vec<Line> = vec![Line::default(); top_padding];
    centered_lines.extend(display_lines);

    frame.render_widget(
        Paragraph::new(centered_lines).alignment(Alignment::Center),
        padded,
    );
}
