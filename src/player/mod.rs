//! Playback: the underlying mpv device, the position tracker that follows it
//! and the tick scheduler driving the tracker.

pub mod mpv;
pub mod ticker;
pub mod tracker;

pub use ticker::Ticker;
pub use tracker::{AdvanceReason, PlaybackTracker, TrackerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    Off,
    #[default]
    Idle,
    Playing,
    Paused,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            PlayerState::Off => "off",
            PlayerState::Idle => "idle",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
        }
    }
}

/// What the underlying player last reported.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceSnapshot {
    pub state: PlayerState,
    /// Seconds, 0 when unknown
    pub duration: f64,
    pub position: f64,
}
