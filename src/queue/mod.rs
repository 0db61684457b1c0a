use crate::playlist::MusicInfo;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    Off,
    One,
    #[default]
    All,
}

impl RepeatMode {
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat: Off",
            RepeatMode::One => "Repeat: One",
            RepeatMode::All => "Repeat: All",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<MusicInfo>,
    current_index: Option<usize>,
    shuffle_enabled: bool,
    shuffle_order: Vec<usize>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire queue with new tracks and start from the beginning
    pub fn replace(&mut self, tracks: Vec<MusicInfo>) {
        self.tracks = tracks;
        self.current_index = if self.tracks.is_empty() { None } else { Some(0) };
        self.rebuild_shuffle_order();
    }

    /// Toggle shuffle mode
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle_enabled);
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle_enabled = enabled;
        self.rebuild_shuffle_order();
    }

    /// Get shuffle state
    pub fn is_shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    /// Set the current playing index
    pub fn set_current(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.current_index = Some(index);
        }
    }

    /// Get the current track
    pub fn current_track(&self) -> Option<&MusicInfo> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    /// Get the current index
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Advance to the next track, returns the new current index
    pub fn advance(&mut self, repeat: RepeatMode) -> Option<usize> {
        let current = self.current_index?;
        let next_index = match repeat {
            RepeatMode::One => Some(current),
            RepeatMode::Off => self.next_index(current),
            RepeatMode::All => self.next_index(current).or_else(|| self.first_index()),
        }?;
        self.current_index = Some(next_index);
        Some(next_index)
    }

    /// Go to the previous track, returns the new current index
    pub fn go_back(&mut self, repeat: RepeatMode) -> Option<usize> {
        let current = self.current_index?;
        let prev_index = match repeat {
            RepeatMode::One => Some(current),
            RepeatMode::Off => self.prev_index(current),
            RepeatMode::All => self.prev_index(current).or_else(|| self.last_index()),
        }?;
        self.current_index = Some(prev_index);
        Some(prev_index)
    }

    /// Get all tracks in the queue
    pub fn tracks(&self) -> &[MusicInfo] {
        &self.tracks
    }

    /// Get the number of tracks in the queue
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn shuffled(&self) -> bool {
        self.shuffle_enabled && !self.shuffle_order.is_empty()
    }

    fn first_index(&self) -> Option<usize> {
        if self.shuffled() {
            self.shuffle_order.first().copied()
        } else if self.tracks.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn last_index(&self) -> Option<usize> {
        if self.shuffled() {
            self.shuffle_order.last().copied()
        } else {
            self.tracks.len().checked_sub(1)
        }
    }

    fn next_index(&self, current: usize) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        if self.shuffled() {
            let pos = self.shuffle_order.iter().position(|&x| x == current)?;
            self.shuffle_order.get(pos + 1).copied()
        } else if current + 1 < self.tracks.len() {
            Some(current + 1)
        } else {
            None
        }
    }

    fn prev_index(&self, current: usize) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        if self.shuffled() {
            let pos = self.shuffle_order.iter().position(|&x| x == current)?;
            pos.checked_sub(1).map(|p| self.shuffle_order[p])
        } else {
            current.checked_sub(1)
        }
    }

    fn rebuild_shuffle_order(&mut self) {
        if !self.shuffle_enabled || self.tracks.is_empty() {
            self.shuffle_order.clear();
            return;
        }

        let mut rng = rand::rng();
        self.shuffle_order = (0..self.tracks.len()).collect();
        self.shuffle_order.shuffle(&mut rng);

        // The playing track leads the shuffled order
        if let Some(current) = self.current_index
            && let Some(pos) = self.shuffle_order.iter().position(|&x| x == current)
        {
            self.shuffle_order.swap(0, pos);
        }
    }
}
