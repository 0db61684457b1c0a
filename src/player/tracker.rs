//! Synthetic playback position for a virtual player.
//!
//! The underlying device plays the stream but reports position poorly (or not
//! at all) for streaming URLs, so the tracker keeps its own integer position,
//! advanced by one second per tick, and only uses the device's duration as a
//! coarse "track about to end" trigger. Drift against the device clock is
//! accepted.

use super::{DeviceSnapshot, PlayerState};
use crate::lyrics::LyricParser;
use tokio::sync::mpsc;

/// Notifications for the host. Anything observable that changes is announced.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Position(u64),
    Lyric {
        current: Option<String>,
        next: Option<String>,
    },
    State(PlayerState),
    /// Move on to the next track. The tracker does not wait for it.
    AdvanceRequested(AdvanceReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    /// The device's duration says the track is over.
    EndOfTrack,
    /// The user asked for the next track.
    Skip,
}

/// Previous tick, kept for end-of-track detection.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    position: u64,
    duration: f64,
    state: Option<PlayerState>,
    device_position: Option<f64>,
}

/// Per-track playback numbers, rebuilt whenever a track starts.
#[derive(Debug, Clone, Default)]
struct PlaybackState {
    position: u64,
    duration: f64,
    baseline: Option<Baseline>,
}

#[derive(Debug)]
pub struct PlaybackTracker {
    state: PlayerState,
    playback: PlaybackState,
    lyrics: LyricParser,
    lyric_index: Option<usize>,
    current_lyric: Option<String>,
    next_lyric: Option<String>,
    previous_lyric: Option<String>,
    events: mpsc::UnboundedSender<TrackerEvent>,
}

impl PlaybackTracker {
    pub fn new(events: mpsc::UnboundedSender<TrackerEvent>) -> Self {
        Self {
            state: PlayerState::Idle,
            playback: PlaybackState::default(),
            lyrics: LyricParser::new(),
            lyric_index: None,
            current_lyric: None,
            next_lyric: None,
            previous_lyric: None,
            events,
        }
    }

    /// One scheduler tick. A no-op unless playing.
    pub fn tick(&mut self, device: Option<&DeviceSnapshot>) {
        if self.state != PlayerState::Playing {
            return;
        }

        self.playback.position += 1;
        self.emit(TrackerEvent::Position(self.playback.position));
        self.refresh_lyric(false);

        if let Some(device) = device {
            self.playback.duration = device.duration;
            if self.end_of_track_reached() {
                self.playback.baseline = None;
                self.set_state(PlayerState::Paused);
                self.emit(TrackerEvent::AdvanceRequested(AdvanceReason::EndOfTrack));
                return;
            }
        }

        self.snapshot(device);
    }

    /// Jump to `position` seconds and resync the lyric right away.
    ///
    /// The baseline recorded before the jump is replaced by one taken at the
    /// new position, so a seek into the last second ends the track on the
    /// next tick.
    pub fn seek(&mut self, position: u64, device: Option<&DeviceSnapshot>) {
        self.playback.position = position;
        self.playback.baseline = None;
        self.emit(TrackerEvent::Position(position));
        self.refresh_lyric(false);
        if let Some(device) = device {
            self.playback.duration = device.duration;
            self.snapshot(Some(device));
        }
    }

    /// The device reported the stream finished on its own. Same path as a
    /// detected end of track; ignored unless playing.
    pub fn device_ended(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }
        tracing::info!(position = self.playback.position, "device finished the track");
        self.playback.baseline = None;
        self.set_state(PlayerState::Paused);
        self.emit(TrackerEvent::AdvanceRequested(AdvanceReason::EndOfTrack));
    }

    /// Fresh playback numbers and no lyrics for a new track.
    pub fn start_track(&mut self) {
        self.playback = PlaybackState::default();
        self.lyrics.clear();
        self.clear_lyric_lines();
        self.set_state(PlayerState::Paused);
        self.emit(TrackerEvent::Position(0));
    }

    /// Install the LRC payload for the current track.
    pub fn set_lyrics(&mut self, lrc: &str) {
        self.lyrics.parse(lrc);
        self.clear_lyric_lines();
        self.refresh_lyric(true);
    }

    pub fn play(&mut self) {
        self.set_state(PlayerState::Playing);
    }

    pub fn pause(&mut self) {
        self.set_state(PlayerState::Paused);
    }

    pub fn stop(&mut self) {
        self.playback.baseline = None;
        self.set_state(PlayerState::Idle);
    }

    pub fn turn_off(&mut self) {
        self.playback.baseline = None;
        self.set_state(PlayerState::Off);
    }

    /// Explicit skip: same path as a detected end of track.
    pub fn skip(&mut self) {
        self.playback.baseline = None;
        self.set_state(PlayerState::Paused);
        self.emit(TrackerEvent::AdvanceRequested(AdvanceReason::Skip));
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn position(&self) -> u64 {
        self.playback.position
    }

    pub fn duration(&self) -> f64 {
        self.playback.duration
    }

    pub fn has_lyrics(&self) -> bool {
        !self.lyrics.is_empty()
    }

    #[cfg(test)]
    pub fn current_lyric(&self) -> Option<&str> {
        self.current_lyric.as_deref()
    }

    #[cfg(test)]
    pub fn next_lyric(&self) -> Option<&str> {
        self.next_lyric.as_deref()
    }

    pub fn previous_lyric(&self) -> Option<&str> {
        self.previous_lyric.as_deref()
    }

    fn end_of_track_reached(&self) -> bool {
        let Some(base) = self.playback.baseline else {
            return false;
        };
        if base.duration <= 0.0 {
            return false;
        }
        let remaining = self.playback.duration - self.playback.position as f64;
        if !(0.0..=1.0).contains(&remaining) {
            return false;
        }
        tracing::info!(
            position = self.playback.position,
            duration = self.playback.duration,
            last_position = base.position,
            last_device_state = ?base.state,
            drift = ?base.device_position.map(|p| base.position as f64 - p),
            "end of track"
        );
        true
    }

    /// Record this tick's numbers for the next end-of-track check.
    fn snapshot(&mut self, device: Option<&DeviceSnapshot>) {
        self.playback.baseline = Some(Baseline {
            position: self.playback.position,
            duration: self.playback.duration,
            state: device.map(|d| d.state),
            device_position: device.map(|d| d.position),
        });
    }

    fn refresh_lyric(&mut self, force: bool) {
        if self.lyrics.is_empty() {
            return;
        }

        let current = self.lyrics.active_line(self.playback.position as f64).map(str::to_owned);
        let index = current.as_ref().and_then(|_| self.lyrics.cursor());
        if !force && index == self.lyric_index && current == self.current_lyric {
            return;
        }

        self.lyric_index = index;
        self.current_lyric = current;
        if self.current_lyric.is_some() {
            self.next_lyric = self.lyrics.next_line().map(str::to_owned);
            self.previous_lyric = self.lyrics.previous_line().map(str::to_owned);
        } else {
            // Before the first line: the first line is what comes next
            self.next_lyric = self.lyrics.lines().first().map(|l| l.text.clone());
            self.previous_lyric = None;
        }

        tracing::debug!(
            position = self.playback.position,
            lyric = self.current_lyric.as_deref().unwrap_or(""),
            "lyric changed"
        );
        self.emit(TrackerEvent::Lyric {
            current: self.current_lyric.clone(),
            next: self.next_lyric.clone(),
        });
    }

    fn clear_lyric_lines(&mut self) {
        let had_line = self.current_lyric.is_some() || self.next_lyric.is_some();
        self.lyric_index = None;
        self.current_lyric = None;
        self.next_lyric = None;
        self.previous_lyric = None;
        if had_line {
            self.emit(TrackerEvent::Lyric {
                current: None,
                next: None,
            });
        }
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            tracing::debug!(from = self.state.label(), to = state.label(), "tracker state");
            self.state = state;
            self.emit(TrackerEvent::State(state));
        }
    }

    fn emit(&self, event: TrackerEvent) {
        // The host may already be gone while shutting down
        let _ = self.events.send(event);
    }
}
