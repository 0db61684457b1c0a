//! Now Playing card: title, artist, progress and transport state

use super::truncate_str;
use crate::app::state::{AppState, ToastKind};
use crate::player::PlayerState;
use crate::queue::RepeatMode;
use crate::tui::theme::{Icons, get_theme};
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

    let block = theme.card(format!(" {} Now Playing ", icons.music));
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

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Track title
            Constraint::Length(1), // Artist / album
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume
            Constraint::Min(0),    // Toast (if any)
        ])
        .split(padded);

    let content_width = padded.width.saturating_sub(1) as usize;

    let title = state.title.as_deref().unwrap_or("Not playing");
    let title_line = Line::from(Span::styled(
        truncate_str(title, content_width),
        Style::default()
            .fg(theme.palette.fg_primary)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title_line), rows[0]);

    let subtitle = match (&state.artist, &state.album) {
        (Some(artist), Some(album)) if !album.is_empty() => format!("{artist} · {album}"),
        (Some(artist), _) => artist.clone(),
        (None, _) => String::new(),
    };
    let artist_line = Line::from(Span::styled(
        truncate_str(&subtitle, content_width),
        Style::default().fg(theme.palette.fg_secondary),
    ));
    frame.render_widget(Paragraph::new(artist_line), rows[1]);

    let ratio = if state.duration > 0.0 {
        (state.position as f64 / state.duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let progress_line = Line::from(Span::styled(
        render_progress_bar(rows[3].width as usize, ratio, icons),
        Style::default().fg(theme.palette.accent),
    ));
    frame.render_widget(Paragraph::new(progress_line), rows[3]);

    let state_icon = match state.player_state {
        PlayerState::Playing => icons.pause,
        PlayerState::Paused => icons.play,
        PlayerState::Idle | PlayerState::Off => icons.stop,
    };

    let vol_icon = if state.muted || state.volume == 0 {
        icons.volume_mute
    } else if state.volume < 50 {
        icons.volume_low
    } else {
        icons.volume_high
    };

    let mut controls_spans = vec![
        Span::styled(
            format!(
                "{}/{}",
                format_clock(state.position as f64),
                format_clock(state.duration)
            ),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw(" "),
        Span::styled(icons.prev, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(state_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(icons.next, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw("  "),
        Span::styled(vol_icon, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(
            format!("{}%", state.volume),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            state.player_state.label(),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ];

    let repeat_icon = match state.repeat {
        RepeatMode::Off => None,
        RepeatMode::One => Some(icons.repeat_one),
        RepeatMode::All => Some(icons.repeat),
    };
    if let Some(icon) = repeat_icon {
        controls_spans.push(Span::raw(" "));
        controls_spans.push(Span::styled(icon, Style::default().fg(theme.palette.accent_alt)));
    }
    if state.shuffle {
        controls_spans.push(Span::raw(" "));
        controls_spans.push(Span::styled(
            icons.shuffle,
            Style::default().fg(theme.palette.accent_alt),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(controls_spans)), rows[4]);

    if let Some(toast) = &state.toast
        && !toast.is_expired()
    {
        let (prefix, color) = match toast.kind {
            ToastKind::Success => (icons.success, theme.palette.playing),
            ToastKind::Error => (icons.error, theme.palette.error),
        };
        let toast_line = Line::from(vec![
            Span::styled(format!("{} ", prefix), Style::default().fg(color)),
            Span::styled(
                truncate_str(&toast.message, content_width.saturating_sub(3)),
                Style::default().fg(color),
            ),
        ]);
        frame.render_widget(Paragraph::new(toast_line), rows[5]);
    }
}

fn render_progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push_str(icons.progress_full);
    }
    bar.push_str(icons.progress_head);
    for _ in 0..empty {
        bar.push_str(icons.progress_empty);
    }
    bar
}

/// `mm:ss`, minutes keep growing past the hour.
fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
