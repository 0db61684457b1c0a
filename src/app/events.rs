#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Device(DeviceEvent),
    Lyrics(LyricsEvent),
    Tick,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Resize,
}

/// What mpv reports about itself.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Playing,
    Paused,
    Idle,
    Position { seconds: f64 },
    Duration { seconds: f64 },
    Ended,
    Error(String),
}

/// Result of a lyric lookup, tagged with the play it was started for.
#[derive(Debug, Clone)]
pub enum LyricsEvent {
    Loaded { play_id: u64, lrc: String },
    NotFound { play_id: u64 },
}
