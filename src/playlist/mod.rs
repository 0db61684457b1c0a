//! Playlist files: the catalog entries the player works through.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicInfo {
    #[serde(default)]
    pub id: Option<String>,
    pub song: String,
    pub singer: String,
    #[serde(default)]
    pub album: Option<String>,
    /// Artwork URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Stream URL handed to the underlying player
    pub url: String,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl MusicInfo {
    pub fn display_name(&self) -> String {
        if self.singer.is_empty() {
            self.song.clone()
        } else {
            format!("{} - {}", self.song, self.singer)
        }
    }
}

pub fn load(path: &Path) -> anyhow::Result<Vec<MusicInfo>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse(&raw).with_context(|| format!("parse {}", path.display()))
}

fn parse(raw: &str) -> anyhow::Result<Vec<MusicInfo>> {
    let tracks: Vec<MusicInfo> = serde_json::from_str(raw)?;
    if let Some(bad) = tracks.iter().position(|t| t.url.trim().is_empty()) {
        anyhow::bail!("entry {} has no url", bad);
    }
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlist() {
        let raw = r#"[
            {"id": "1", "song": "Qing Tian", "singer": "Jay Chou", "album": "Ye Hui Mei", "url": "http://x/1.mp3", "duration": 269},
            {"song": "Untitled", "singer": "", "url": "http://x/2.mp3"}
        ]"#;
        let tracks = parse(raw).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].display_name(), "Qing Tian - Jay Chou");
        assert_eq!(tracks[0].duration, Some(269));
        assert_eq!(tracks[1].display_name(), "Untitled");
        assert_eq!(tracks[1].thumbnail, None);
    }

    #[test]
    fn test_parse_rejects_missing_url() {
        assert!(parse(r#"[{"song": "a", "singer": "b", "url": "  "}]"#).is_err());
        assert!(parse(r#"[{"song": "a", "singer": "b"}]"#).is_err());
        assert!(parse("{}").is_err());
    }
}
