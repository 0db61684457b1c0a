use crate::app::events::{DeviceEvent, Event};
use anyhow::Context;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    process::{Child, Command},
    sync::mpsc,
};

/// The underlying player: an idle mpv process driven over JSON IPC.
#[derive(Debug)]
pub struct MpvHandle {
    child: Child,
    socket_path: PathBuf,
    writer: tokio::sync::Mutex<tokio::io::WriteHalf<UnixStream>>,
    request_id: AtomicU64,
}

impl MpvHandle {
    pub async fn spawn(
        event_tx: mpsc::Sender<Event>,
        socket_path: &Path,
        audio_device: Option<&str>,
        log_file: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let _ = std::fs::remove_file(socket_path);

        let mut cmd = Command::new("mpv");
        cmd.args([
            "--no-video",
            "--idle=yes",
            "--input-terminal=no",
            "--really-quiet",
        ]);
        if let Some(dev) = audio_device {
            cmd.arg(format!("--audio-device={dev}"));
        }
        if let Some(p) = log_file {
            cmd.arg(format!("--log-file={}", p.display()));
        }
        let child = cmd
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn mpv")?;

        // mpv creates the socket shortly after starting.
        let stream = connect_with_retry(socket_path).await?;
        let (reader, writer) = tokio::io::split(stream);

        tokio::spawn(read_events_loop(reader, event_tx));

        let this = Self {
            child,
            socket_path: socket_path.to_path_buf(),
            writer: tokio::sync::Mutex::new(writer),
            request_id: AtomicU64::new(1),
        };

        this.command(json!({"command":["request_log_messages", "warn"]}))
            .await?;

        this.command(json!({"command":["observe_property", 1, "time-pos"]}))
            .await?;
        this.command(json!({"command":["observe_property", 2, "duration"]}))
            .await?;
        this.command(json!({"command":["observe_property", 3, "pause"]}))
            .await?;
        this.command(json!({"command":["observe_property", 4, "eof-reached"]}))
            .await?;
        this.command(json!({"command":["observe_property", 5, "idle-active"]}))
            .await?;

        tracing::info!(socket = %this.socket_path.display(), "mpv ready");
        Ok(this)
    }

    pub async fn load_url(&self, url: &str) -> anyhow::Result<()> {
        self.command(json!({"command":["loadfile", url, "replace"]})).await?;
        self.resume().await
    }

    pub async fn pause(&self) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", true]}))
            .await
    }

    pub async fn resume(&self) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", false]}))
            .await
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.command(json!({"command":["stop"]})).await
    }

    pub async fn seek_absolute(&self, seconds: u64) -> anyhow::Result<()> {
        self.command(json!({"command":["seek", seconds, "absolute"]}))
            .await
    }

    pub async fn set_volume(&self, volume_0_100: u8) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "volume", volume_0_100]}))
            .await
    }

    pub async fn set_mute(&self, muted: bool) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "mute", muted]}))
            .await
    }

    async fn command(&self, mut v: serde_json::Value) -> anyhow::Result<()> {
        // Tag requests so errors come back on the IPC stream with an id.
        if v.get("request_id").is_none() {
            let id = self.request_id.fetch_add(1, Ordering::Relaxed);
            if let serde_json::Value::Object(ref mut o) = v {
                o.insert("request_id".to_string(), serde_json::Value::from(id));
            }
        }
        let mut w = self.writer.lock().await;
        let mut line = serde_json::to_vec(&v).context("encode mpv json")?;
        line.push(b'\n');
        w.write_all(&line).await.context("write mpv ipc")?;
        w.flush().await.context("flush mpv ipc")?;
        Ok(())
    }
}

#[cfg(test)]
impl MpvHandle {
    /// A handle whose IPC peer is already gone, so every command fails.
    pub(crate) fn disconnected() -> anyhow::Result<Self> {
        let (ours, theirs) = UnixStream::pair()?;
        drop(theirs);
        let (_, writer) = tokio::io::split(ours);
        let child = Command::new("true").kill_on_drop(true).spawn()?;
        Ok(Self {
            child,
            socket_path: std::env::temp_dir().join("cloudmusic-disconnected.sock"),
            writer: tokio::sync::Mutex::new(writer),
            request_id: AtomicU64::new(1),
        })
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn connect_with_retry(path: &Path) -> anyhow::Result<UnixStream> {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) => {
                if tokio::time::Instant::now() > deadline {
                    return Err(e)
                        .with_context(|| format!("connect to mpv ipc {}", path.display()));
                }
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
        }
    }
}

async fn read_events_loop(reader: tokio::io::ReadHalf<UnixStream>, event_tx: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        if let Some(de) = map_mpv_event(&v)
            && event_tx.send(Event::Device(de)).await.is_err()
        {
            break;
        }
    }
    tracing::debug!("mpv event stream closed");
}

fn map_mpv_event(v: &serde_json::Value) -> Option<DeviceEvent> {
    // Command replies: {"request_id":..., "error":"..."}
    if v.get("request_id").is_some() {
        let err = v.get("error")?.as_str()?;
        return (err != "success").then(|| DeviceEvent::Error(format!("mpv ipc error: {err}")));
    }

    match v.get("event")?.as_str()? {
        "property-change" => {
            let name = v.get("name")?.as_str()?;
            let data = v.get("data");
            match name {
                "time-pos" => Some(DeviceEvent::Position {
                    seconds: data.and_then(|d| d.as_f64()).unwrap_or(0.0),
                }),
                // Unknown duration (live streams, before load) arrives as null
                "duration" => Some(DeviceEvent::Duration {
                    seconds: data.and_then(|d| d.as_f64()).unwrap_or(0.0),
                }),
                "pause" => {
                    let paused = data?.as_bool().unwrap_or(false);
                    Some(if paused { DeviceEvent::Paused } else { DeviceEvent::Playing })
                }
                "eof-reached" => data?.as_bool().unwrap_or(false).then_some(DeviceEvent::Ended),
                "idle-active" => data?.as_bool().unwrap_or(false).then_some(DeviceEvent::Idle),
                _ => None,
            }
        }
        // "stop" and "redirect" come from our own loadfile/stop commands
        "end-file" => match v.get("reason").and_then(|x| x.as_str()).unwrap_or("") {
            "eof" => Some(DeviceEvent::Ended),
            "error" => {
                let err = v.get("file_error").and_then(|x| x.as_str()).unwrap_or("unknown");
                Some(DeviceEvent::Error(format!("mpv end-file error: {err}")))
            }
            _ => None,
        },
        "log-message" => {
            let level = v.get("level")?.as_str().unwrap_or("info");
            let text = v.get("text")?.as_str().unwrap_or("").trim();
            if (level == "warn" || level == "error") && !text.is_empty() {
                Some(DeviceEvent::Error(format!("mpv {level}: {text}")))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(raw: &str) -> Option<DeviceEvent> {
        map_mpv_event(&serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_property_changes() {
        assert_eq!(
            map(r#"{"event":"property-change","id":2,"name":"duration","data":241.5}"#),
            Some(DeviceEvent::Duration { seconds: 241.5 })
        );
        assert_eq!(
            map(r#"{"event":"property-change","id":2,"name":"duration"}"#),
            Some(DeviceEvent::Duration { seconds: 0.0 })
        );
        assert_eq!(
            map(r#"{"event":"property-change","id":3,"name":"pause","data":true}"#),
            Some(DeviceEvent::Paused)
        );
        assert_eq!(
            map(r#"{"event":"property-change","id":3,"name":"pause","data":false}"#),
            Some(DeviceEvent::Playing)
        );
        assert_eq!(
            map(r#"{"event":"property-change","id":4,"name":"eof-reached","data":false}"#),
            None
        );
        assert_eq!(
            map(r#"{"event":"property-change","id":5,"name":"idle-active","data":true}"#),
            Some(DeviceEvent::Idle)
        );
    }

    #[test]
    fn test_replies_and_end_file() {
        assert_eq!(map(r#"{"request_id":3,"error":"success","data":null}"#), None);
        assert_eq!(
            map(r#"{"request_id":4,"error":"property unavailable"}"#),
            Some(DeviceEvent::Error("mpv ipc error: property unavailable".into()))
        );
        assert_eq!(map(r#"{"event":"end-file","reason":"eof"}"#), Some(DeviceEvent::Ended));
        assert_eq!(map(r#"{"event":"end-file","reason":"stop"}"#), None);
        assert!(matches!(
            map(r#"{"event":"end-file","reason":"error","file_error":"loading failed"}"#),
            Some(DeviceEvent::Error(_))
        ));
        assert_eq!(map(r#"{"event":"log-message","level":"info","text":"hi"}"#), None);
    }
}
