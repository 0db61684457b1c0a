use crate::queue::RepeatMode;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub lyrics: LyricsConfig,
    pub player: PlayerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Log file and mpv IPC socket live here.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub enabled: bool,
    pub search_url: String,
    pub lyric_url: String,
    /// Request timeout in seconds, 0 keeps the transport default.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Volume level (0-100)
    pub volume: u8,
    /// Period of the position tracker, in milliseconds.
    pub tick_interval_ms: u64,
    pub repeat: RepeatMode,
    pub shuffle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of error, warn, info, debug, trace.
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        defaults::defaults()
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "cloudmusic", "cloudmusic");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("cloudmusic"));
        Self { data_dir }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_url: defaults::SEARCH_URL.to_string(),
            lyric_url: defaults::LYRIC_URL.to_string(),
            timeout_secs: 0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_device: None,
            volume: 80,
            tick_interval_ms: defaults::TICK_INTERVAL_MS,
            repeat: RepeatMode::All,
            shuffle: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PlayerConfig {
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl LogConfig {
    pub fn max_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "cloudmusic", "cloudmusic")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = defaults::defaults();
        write_config(&cfg, &path)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse(&raw).with_context(|| format!("parse {}", path.display()))
}

fn parse(raw: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str::<Config>(raw)?)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = parse(
            r#"
[player]
volume = 40
repeat = "one"
"#,
        )
        .unwrap();
        assert_eq!(cfg.player.volume, 40);
        assert_eq!(cfg.player.repeat, RepeatMode::One);
        assert_eq!(cfg.player.tick_interval_ms, 1000);
        assert!(!cfg.player.shuffle);
        assert!(cfg.lyrics.enabled);
        assert_eq!(cfg.lyrics.search_url, defaults::SEARCH_URL);
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn test_empty_file_is_default() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.player.repeat, RepeatMode::All);
        assert_eq!(cfg.player.tick_interval(), std::time::Duration::from_secs(1));
        assert_eq!(cfg.lyrics.timeout_secs, 0);
    }

    #[test]
    fn test_bad_repeat_is_rejected() {
        assert!(parse("[player]\nrepeat = \"sometimes\"\n").is_err());
    }

    #[test]
    fn test_log_level() {
        let mut log = LogConfig::default();
        assert_eq!(log.max_level(), tracing::Level::INFO);
        log.level = "debug".into();
        assert_eq!(log.max_level(), tracing::Level::DEBUG);
        log.level = "loud".into();
        assert_eq!(log.max_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let path = std::env::temp_dir()
            .join(format!("cloudmusic-cfg-{}", std::process::id()))
            .join("config.toml");
        let _ = fs::remove_file(&path);

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.player.volume, 80);

        let again = load(Some(&path)).unwrap();
        assert_eq!(again.lyrics.lyric_url, cfg.lyrics.lyric_url);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
