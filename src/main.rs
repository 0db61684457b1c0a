mod app;
mod config;
mod input;
mod lyrics;
mod player;
mod playlist;
mod queue;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lyrics::parser::{LyricParser, format_timestamp};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cloudmusic", version, about = "Cloud music player with synced lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a JSON playlist in the terminal player.
    Play {
        playlist: PathBuf,
        /// Shuffle the queue, whatever the config says.
        #[arg(long)]
        shuffle: bool,
        /// Queue index to start from.
        #[arg(long, default_value_t = 0)]
        start: usize,
    },
    /// Fetch lyrics from NetEase and print them (headless).
    Lyrics { title: String, artist: String },
    /// Print the NetEase song id for a track (headless).
    Search { title: String, artist: String },
    /// Parse a local .lrc file and print its timed lines (headless).
    Parse { file: PathBuf },

    /// Audio output device management (mpv).
    Audio {
        #[command(subcommand)]
        cmd: AudioCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AudioCommand {
    /// List mpv audio devices.
    List,
    /// Set mpv audio device (name as shown in list).
    Set { device: String },
    /// Clear mpv audio device override.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Play {
            playlist,
            shuffle,
            start,
        } => {
            init_file_logging(&cfg)?;
            let tracks = playlist::load(&playlist)?;
            tracing::info!(tracks = tracks.len(), path = %playlist.display(), "playlist loaded");

            let mut cfg = cfg;
            cfg.player.shuffle |= shuffle;
            let source = if cfg.lyrics.enabled {
                Some(lyrics::NeteaseClient::new(&cfg.lyrics)?)
            } else {
                None
            };

            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            let mut app = app::App::new(cfg, tracks, source);
            app.run(terminal.terminal_mut(), start).await?;
        }
        Command::Lyrics { title, artist } => {
            init_stderr_logging(&cfg);
            let client = lyrics::NeteaseClient::new(&cfg.lyrics)?;
            let Some(lrc) = lyrics::fetch_lyrics(&client, &title, &artist).await else {
                println!("No lyrics found for {title} - {artist}.");
                return Ok(());
            };
            let mut parser = LyricParser::new();
            parser.parse(&lrc);
            print_lines(&parser);
        }
        Command::Search { title, artist } => {
            init_stderr_logging(&cfg);
            let client = lyrics::NeteaseClient::new(&cfg.lyrics)?;
            match client.search_song(&title, &artist).await? {
                Some(id) => println!("{id}"),
                None => println!("No song found for {title} - {artist}."),
            }
        }
        Command::Parse { file } => {
            init_stderr_logging(&cfg);
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let mut parser = LyricParser::new();
            parser.parse(&raw);
            print_lines(&parser);
        }
        Command::Audio { cmd } => match cmd {
            AudioCommand::List => {
                let out = tokio::process::Command::new("mpv")
                    .args(["--audio-device=help", "--no-video", "--idle=no"])
                    .output()
                    .await
                    .context("run mpv --audio-device=help")?;
                // mpv prints help to stdout.
                print!("{}", String::from_utf8_lossy(&out.stdout));
                eprint!("{}", String::from_utf8_lossy(&out.stderr));
            }
            AudioCommand::Set { device } => {
                let mut cfg = cfg;
                cfg.player.audio_device = Some(device);
                config::save(&cfg, cli.config.as_deref()).context("save config")?;
                println!("Updated audio device in config.");
            }
            AudioCommand::Clear => {
                let mut cfg = cfg;
                cfg.player.audio_device = None;
                config::save(&cfg, cli.config.as_deref()).context("save config")?;
                println!("Cleared audio device override.");
            }
        },
    }

    Ok(())
}

fn init_stderr_logging(cfg: &config::Config) {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.log.max_level())
        .with_writer(std::io::stderr)
        .init();
}

/// The terminal belongs to the UI while playing, so logs go to a file.
fn init_file_logging(cfg: &config::Config) -> anyhow::Result<()> {
    let dir = &cfg.paths.data_dir;
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join("cloudmusic.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .with_max_level(cfg.log.max_level())
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn print_lines(parser: &LyricParser) {
    if parser.is_empty() {
        println!("No timed lines.");
        return;
    }
    for line in parser.lines() {
        println!("{} {}", format_timestamp(line.time), line.text);
    }
}
