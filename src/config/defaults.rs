use super::{Config, LogConfig, LyricsConfig, PathsConfig, PlayerConfig};

pub const SEARCH_URL: &str = "https://music.163.com/api/search/get/web";
pub const LYRIC_URL: &str = "https://music.163.com/api/song/lyric";
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Config written on first run.
pub fn defaults() -> Config {
    Config {
        paths: PathsConfig::default(),
        lyrics: LyricsConfig::default(),
        player: PlayerConfig::default(),
        log: LogConfig::default(),
    }
}
