use crate::player::PlayerState;
use crate::queue::RepeatMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LyricsStatus {
    #[default]
    Disabled,
    Loading,
    Loaded,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

/// Everything the virtual player exposes for rendering.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub should_quit: bool,

    // Media
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub artwork_url: Option<String>,

    // Playback
    pub player_state: PlayerState,
    pub position: u64,
    pub duration: f64,
    pub volume: u8,
    pub muted: bool,
    pub repeat: RepeatMode,
    pub shuffle: bool,

    // Lyrics
    pub lyrics_status: LyricsStatus,
    pub previous_lyric: Option<String>,
    pub current_lyric: Option<String>,
    pub next_lyric: Option<String>,

    // Queue
    pub queue_items: Vec<String>,
    pub queue_index: Option<usize>,

    pub toast: Option<Toast>,
}

impl AppState {
    pub fn new(volume: u8, repeat: RepeatMode, shuffle: bool) -> Self {
        Self {
            volume,
            repeat,
            shuffle,
            ..Self::default()
        }
    }
}
