//! Lyrics module for fetching and following synchronized lyrics
//!
//! This module provides:
//! - NetEase API client for fetching lyrics
//! - LRC format parser with an active-line cursor

pub mod netease;
pub mod parser;

use std::future::Future;

pub use netease::NeteaseClient;
pub use parser::LyricParser;

/// Where lyrics come from: a search step resolving a song id, then the lyric
/// payload for that id.
pub trait LyricsSource {
    fn search_song(
        &self,
        title: &str,
        artist: &str,
    ) -> impl Future<Output = anyhow::Result<Option<u64>>> + Send;

    fn get_lyric(&self, song_id: u64) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;
}

impl LyricsSource for NeteaseClient {
    fn search_song(
        &self,
        title: &str,
        artist: &str,
    ) -> impl Future<Output = anyhow::Result<Option<u64>>> + Send {
        NeteaseClient::search_song(self, title, artist)
    }

    fn get_lyric(&self, song_id: u64) -> impl Future<Output = anyhow::Result<Option<String>>> + Send {
        NeteaseClient::get_lyric(self, song_id)
    }
}

/// Get the raw LRC payload for a track.
///
/// Every failure (no match, transport error, bad status, bad JSON) ends up as
/// `None`; the reason is only logged.
pub async fn fetch_lyrics<S: LyricsSource>(source: &S, title: &str, artist: &str) -> Option<String> {
    tracing::info!(title, artist, "looking up lyrics");

    let song_id = match source.search_song(title, artist).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::info!(title, artist, "no song id found");
            return None;
        }
        Err(e) => {
            tracing::warn!(title, artist, error = %format!("{e:#}"), "song search failed");
            return None;
        }
    };

    match source.get_lyric(song_id).await {
        Ok(Some(lrc)) => {
            tracing::info!(song_id, len = lrc.len(), "lyrics fetched");
            Some(lrc)
        }
        Ok(None) => {
            tracing::info!(song_id, "song has no lyrics");
            None
        }
        Err(e) => {
            tracing::warn!(song_id, error = %format!("{e:#}"), "lyric fetch failed");
            None
        }
    }
}
