//! Root layout widget
//!
//! ┌──────────────────────────┬───────────────┐
//! │          Lyrics          │     Queue     │
//! ├──────────────────────────┴───────────────┤
//! │               Now Playing                │
//! └──────────────────────────────────────────┘

use crate::app::state::AppState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::{lyrics, now_playing, queue};

pub fn render(frame: &mut Frame, state: &AppState) {
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Lyrics + queue
            Constraint::Length(8), // Player
        ])
        .split(root);

    let top_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    lyrics::render(frame, state, top_cols[0]);
    queue::render(frame, state, top_cols[1]);
    now_playing::render(frame, state, rows[1]);
}
