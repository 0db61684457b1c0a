pub mod actions;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::lyrics::{self, LyricsSource, NeteaseClient};
use crate::player::mpv::MpvHandle;
use crate::player::{
    AdvanceReason, DeviceSnapshot, PlaybackTracker, PlayerState, Ticker, TrackerEvent,
};
use crate::playlist::MusicInfo;
use crate::queue::{Queue, RepeatMode};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{DeviceEvent, Event, LyricsEvent};
use state::{AppState, LyricsStatus, Toast};
use tokio::sync::mpsc;

const SEEK_STEP_SECS: u64 = 10;
const VOLUME_STEP: u8 = 5;

/// The virtual player: a queue of catalog tracks played on mpv, with a
/// tracker that synthesizes position and lyrics on top.
pub struct App<S = NeteaseClient> {
    cfg: Config,
    state: AppState,
    queue: Queue,
    tracker: PlaybackTracker,
    tracker_rx: mpsc::UnboundedReceiver<TrackerEvent>,
    mpv: Option<MpvHandle>,
    /// Last report from the underlying player; `None` when there is none.
    device: Option<DeviceSnapshot>,
    lyrics: Option<S>,
    play_id: u64,
}

impl<S> App<S>
where
    S: LyricsSource + Clone + Send + Sync + 'static,
{
    pub fn new(cfg: Config, tracks: Vec<MusicInfo>, lyrics: Option<S>) -> Self {
        let (tracker_tx, tracker_rx) = mpsc::unbounded_channel();
        let mut queue = Queue::new();
        queue.replace(tracks);
        queue.set_shuffle(cfg.player.shuffle);

        let state = AppState::new(cfg.player.volume, cfg.player.repeat, cfg.player.shuffle);

        let mut app = Self {
            cfg,
            state,
            queue,
            tracker: PlaybackTracker::new(tracker_tx),
            tracker_rx,
            mpv: None,
            device: None,
            lyrics,
            play_id: 0,
        };
        app.sync_state();
        app
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal, start: usize) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());
        self.attach_device(&tx).await;

        let mut ticker = Ticker::start(self.cfg.player.tick_interval(), tx.clone(), Event::Tick);

        self.play_index(start, &tx).await;
        self.pump_tracker(&tx).await;
        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            self.handle_event(ev, &tx).await;

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        ticker.stop();
        if let Some(mpv) = &self.mpv {
            let _ = mpv.stop().await;
        }
        tracing::info!("player closed");
        Ok(())
    }

    async fn attach_device(&mut self, tx: &mpsc::Sender<Event>) {
        let data_dir = &self.cfg.paths.data_dir;
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            tracing::warn!(error = %e, dir = %data_dir.display(), "cannot create data dir");
        }
        let socket = data_dir.join("mpv.sock");
        let mpv_log = data_dir.join("mpv.log");

        match MpvHandle::spawn(
            tx.clone(),
            &socket,
            self.cfg.player.audio_device.as_deref(),
            Some(&mpv_log),
        )
        .await
        {
            Ok(h) => {
                let _ = h.set_volume(self.state.volume).await;
                self.mpv = Some(h);
                self.device = Some(DeviceSnapshot::default());
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "running without mpv");
                self.state.toast = Some(Toast::error(format!("mpv disabled: {e:#}")));
                self.tracker.turn_off();
            }
        }
    }

    async fn handle_event(&mut self, ev: Event, tx: &mpsc::Sender<Event>) {
        match ev {
            Event::Input(input_ev) => {
                if let Some(action) = input::map_input_to_action(input_ev) {
                    self.handle_action(action, tx).await;
                }
            }
            Event::Device(de) => self.handle_device(de),
            Event::Lyrics(le) => self.handle_lyrics(le),
            Event::Tick => {
                self.tracker.tick(self.device.as_ref());
            }
        }
        self.pump_tracker(tx).await;
    }

    /// Handle everything the tracker announced since the last call.
    async fn pump_tracker(&mut self, tx: &mpsc::Sender<Event>) {
        while let Ok(ev) = self.tracker_rx.try_recv() {
            match ev {
                TrackerEvent::Position(seconds) => self.state.position = seconds,
                TrackerEvent::Lyric { current, next } => {
                    self.state.current_lyric = current;
                    self.state.next_lyric = next;
                }
                TrackerEvent::State(state) => self.state.player_state = state,
                TrackerEvent::AdvanceRequested(reason) => self.advance(reason, tx).await,
            }
        }
        self.sync_state();
    }

    async fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Resize => {}
            Action::TogglePause => match self.tracker.state() {
                PlayerState::Playing => {
                    let result = match &self.mpv {
                        Some(mpv) => mpv.pause().await,
                        None => Ok(()),
                    };
                    self.report("pause", result);
                    self.tracker.pause();
                }
                PlayerState::Paused => {
                    let result = match &self.mpv {
                        Some(mpv) => mpv.resume().await,
                        None => Ok(()),
                    };
                    self.report("resume", result);
                    self.tracker.play();
                }
                PlayerState::Idle | PlayerState::Off => {
                    let index = self.queue.current_index().unwrap_or(0);
                    self.play_index(index, tx).await;
                }
            },
            Action::Stop => {
                let result = match &self.mpv {
                    Some(mpv) => mpv.stop().await,
                    None => Ok(()),
                };
                self.report("stop", result);
                self.tracker.stop();
            }
            Action::NextTrack => self.tracker.skip(),
            Action::PrevTrack => self.go_back(tx).await,
            Action::SeekForward => {
                let mut target = self.tracker.position() + SEEK_STEP_SECS;
                let duration = self.tracker.duration();
                if duration > 0.0 {
                    // Land inside the last second so the next tick ends the track
                    target = target.min((duration - 1.0).max(0.0) as u64);
                }
                self.seek(target).await;
            }
            Action::SeekBack => {
                let target = self.tracker.position().saturating_sub(SEEK_STEP_SECS);
                self.seek(target).await;
            }
            Action::SeekTenths(tenths) => {
                let duration = self.state.duration;
                if duration > 0.0 {
                    let target = (duration * f64::from(tenths) / 10.0).floor() as u64;
                    self.seek(target).await;
                }
            }
            Action::VolumeUp => {
                self.set_volume(self.state.volume.saturating_add(VOLUME_STEP).min(100)).await;
            }
            Action::VolumeDown => {
                self.set_volume(self.state.volume.saturating_sub(VOLUME_STEP)).await;
            }
            Action::ToggleMute => {
                self.state.muted = !self.state.muted;
                let result = match &self.mpv {
                    Some(mpv) => mpv.set_mute(self.state.muted).await,
                    None => Ok(()),
                };
                self.report("mute", result);
            }
            Action::CycleRepeat => {
                self.state.repeat = self.state.repeat.next();
                self.state.toast = Some(Toast::success(self.state.repeat.label()));
            }
            Action::ToggleShuffle => {
                self.queue.toggle_shuffle();
                self.state.shuffle = self.queue.is_shuffle_enabled();
                let label = if self.state.shuffle { "Shuffle: On" } else { "Shuffle: Off" };
                self.state.toast = Some(Toast::success(label));
            }
        }
    }

    fn handle_device(&mut self, ev: DeviceEvent) {
        let Some(device) = self.device.as_mut() else {
            return;
        };
        // Only a load that reported a duration can finish; this also swallows
        // the repeated end reports mpv sends for one file.
        let finished = matches!(ev, DeviceEvent::Idle | DeviceEvent::Ended) && device.duration > 0.0;
        match ev {
            DeviceEvent::Playing => device.state = PlayerState::Playing,
            DeviceEvent::Paused => device.state = PlayerState::Paused,
            DeviceEvent::Idle => {
                device.state = PlayerState::Idle;
                device.duration = 0.0;
                device.position = 0.0;
            }
            DeviceEvent::Position { seconds } => device.position = seconds,
            DeviceEvent::Duration { seconds } => device.duration = seconds,
            DeviceEvent::Ended => {
                tracing::debug!("device reports end of file");
                device.duration = 0.0;
            }
            DeviceEvent::Error(msg) => {
                tracing::warn!(%msg, "device error");
                self.state.toast = Some(Toast::error(msg));
            }
        }
        if finished {
            self.tracker.device_ended();
        }
    }

    fn handle_lyrics(&mut self, ev: LyricsEvent) {
        match ev {
            LyricsEvent::Loaded { play_id, lrc } if play_id == self.play_id => {
                self.tracker.set_lyrics(&lrc);
                self.state.lyrics_status = if self.tracker.has_lyrics() {
                    LyricsStatus::Loaded
                } else {
                    LyricsStatus::Unavailable
                };
            }
            LyricsEvent::NotFound { play_id } if play_id == self.play_id => {
                self.state.lyrics_status = LyricsStatus::Unavailable;
            }
            LyricsEvent::Loaded { play_id, .. } | LyricsEvent::NotFound { play_id } => {
                tracing::debug!(play_id, current = self.play_id, "dropping stale lyrics");
            }
        }
    }

    /// Start the queue entry at `index` from the beginning.
    async fn play_index(&mut self, index: usize, tx: &mpsc::Sender<Event>) {
        if self.queue.is_empty() {
            tracing::info!("queue is empty");
            return;
        }
        self.queue.set_current(index);
        let Some(track) = self.queue.current_track().cloned() else {
            return;
        };

        self.play_id += 1;
        self.tracker.start_track();
        tracing::info!(index, song = %track.song, singer = %track.singer, "starting track");

        if let Some(mpv) = &self.mpv {
            if let Err(e) = mpv.load_url(&track.url).await {
                self.report("load", Err(e));
                // Idle, so play/pause retries the load
                self.tracker.stop();
                return;
            }
        }
        if let Some(device) = self.device.as_mut() {
            *device = DeviceSnapshot::default();
        }

        self.spawn_lyrics_fetch(&track, tx.clone());
        self.tracker.play();
    }

    fn spawn_lyrics_fetch(&mut self, track: &MusicInfo, tx: mpsc::Sender<Event>) {
        let Some(source) = self.lyrics.clone() else {
            self.state.lyrics_status = LyricsStatus::Disabled;
            return;
        };
        self.state.lyrics_status = LyricsStatus::Loading;

        let play_id = self.play_id;
        let title = track.song.clone();
        let artist = track.singer.clone();
        tokio::spawn(async move {
            let ev = match lyrics::fetch_lyrics(&source, &title, &artist).await {
                Some(lrc) => LyricsEvent::Loaded { play_id, lrc },
                None => LyricsEvent::NotFound { play_id },
            };
            let _ = tx.send(Event::Lyrics(ev)).await;
        });
    }

    async fn advance(&mut self, reason: AdvanceReason, tx: &mpsc::Sender<Event>) {
        // A skip under repeat-one still moves on
        let repeat = match (reason, self.state.repeat) {
            (AdvanceReason::Skip, RepeatMode::One) => RepeatMode::All,
            (_, repeat) => repeat,
        };

        match self.queue.advance(repeat) {
            Some(index) => self.play_index(index, tx).await,
            None => {
                tracing::info!("end of queue");
                let result = match &self.mpv {
                    Some(mpv) => mpv.stop().await,
                    None => Ok(()),
                };
                self.report("stop", result);
                self.tracker.stop();
            }
        }
    }

    async fn go_back(&mut self, tx: &mpsc::Sender<Event>) {
        let repeat = match self.state.repeat {
            RepeatMode::One => RepeatMode::All,
            repeat => repeat,
        };
        self.tracker.pause();
        // At the start of the queue, restart the current track
        let index = self
            .queue
            .go_back(repeat)
            .or(self.queue.current_index())
            .unwrap_or(0);
        self.play_index(index, tx).await;
    }

    async fn seek(&mut self, target: u64) {
        let result = match &self.mpv {
            Some(mpv) => mpv.seek_absolute(target).await,
            None => Ok(()),
        };
        self.report("seek", result);
        self.tracker.seek(target, self.device.as_ref());
    }

    async fn set_volume(&mut self, volume: u8) {
        self.state.volume = volume;
        let result = match &self.mpv {
            Some(mpv) => mpv.set_volume(volume).await,
            None => Ok(()),
        };
        self.report("volume", result);
    }

    fn report(&mut self, what: &str, result: anyhow::Result<()>) {
        if let Err(e) = result {
            tracing::warn!(command = what, error = %format!("{e:#}"), "device command failed");
            self.state.toast = Some(Toast::error(format!("{what} failed: {e:#}")));
        }
    }

    /// Project the queue and the tracker's derived numbers onto the rendered
    /// attributes. Position, state and lyric lines arrive as tracker events.
    fn sync_state(&mut self) {
        let s = &mut self.state;
        let track = self.queue.current_track();
        s.title = track.map(|t| t.song.clone());
        s.artist = track.map(|t| t.singer.clone());
        s.album = track.and_then(|t| t.album.clone());
        s.artwork_url = track.and_then(|t| t.thumbnail.clone());

        s.duration = match self.tracker.duration() {
            d if d > 0.0 => d,
            _ => track.and_then(|t| t.duration).map(f64::from).unwrap_or(0.0),
        };

        s.previous_lyric = self.tracker.previous_lyric().map(str::to_owned);

        s.queue_index = self.queue.current_index();
        if s.queue_items.len() != self.queue.len() {
            s.queue_items = self.queue.tracks().iter().map(MusicInfo::display_name).collect();
        }
        s.shuffle = self.queue.is_shuffle_enabled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::tests::FakeSource;
    use std::time::Duration;

    fn track(n: usize) -> MusicInfo {
        MusicInfo {
            id: Some(n.to_string()),
            song: format!("Song {n}"),
            singer: "Singer".to_string(),
            album: Some("Album".to_string()),
            thumbnail: Some(format!("http://img.example/{n}.jpg")),
            url: format!("http://music.example/{n}.mp3"),
            duration: Some(200),
        }
    }

    fn app(n: usize, source: Option<FakeSource>) -> App<FakeSource> {
        let mut cfg = Config::default();
        cfg.player.repeat = RepeatMode::Off;
        App::new(cfg, (0..n).map(track).collect(), source)
    }

    async fn next_event(rx: &mut mpsc::Receiver<Event>) -> Event {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_play_projects_track_and_lyrics() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut app = app(2, Some(FakeSource::with_lyrics("[00:00.00]A\n[00:02.00]B")));

        app.play_index(0, &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.state.title.as_deref(), Some("Song 0"));
        assert_eq!(app.state.artwork_url.as_deref(), Some("http://img.example/0.jpg"));
        assert_eq!(app.state.player_state, PlayerState::Playing);
        assert_eq!(app.state.lyrics_status, LyricsStatus::Loading);
        assert_eq!(app.state.duration, 200.0);

        let ev = next_event(&mut rx).await;
        app.handle_event(ev, &tx).await;
        assert_eq!(app.state.lyrics_status, LyricsStatus::Loaded);
        assert_eq!(app.state.current_lyric.as_deref(), Some("A"));
        assert_eq!(app.state.next_lyric.as_deref(), Some("B"));

        app.handle_event(Event::Tick, &tx).await;
        app.handle_event(Event::Tick, &tx).await;
        assert_eq!(app.state.position, 2);
        assert_eq!(app.state.current_lyric.as_deref(), Some("B"));
        assert_eq!(app.state.previous_lyric.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_stale_lyrics_are_dropped() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(2, Some(FakeSource::with_lyrics("[00:00.00]old")));

        app.play_index(0, &tx).await;
        let first = app.play_id;
        app.play_index(1, &tx).await;

        app.handle_lyrics(LyricsEvent::Loaded {
            play_id: first,
            lrc: "[00:00.00]old".into(),
        });
        assert_eq!(app.state.lyrics_status, LyricsStatus::Loading);
        assert!(!app.tracker.has_lyrics());

        app.handle_lyrics(LyricsEvent::NotFound { play_id: app.play_id });
        assert_eq!(app.state.lyrics_status, LyricsStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_skip_goes_through_tracker_to_queue() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(3, None);
        app.play_index(0, &tx).await;
        for _ in 0..4 {
            app.handle_event(Event::Tick, &tx).await;
        }

        app.handle_action(Action::NextTrack, &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.state.queue_index, Some(1));
        assert_eq!(app.state.position, 0);
        assert_eq!(app.state.player_state, PlayerState::Playing);
        assert_eq!(app.state.lyrics_status, LyricsStatus::Disabled);
    }

    #[tokio::test]
    async fn test_end_of_track_advances_and_stops_at_queue_end() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(2, None);
        app.device = Some(DeviceSnapshot {
            state: PlayerState::Playing,
            duration: 3.0,
            position: 0.0,
        });

        app.play_index(0, &tx).await;
        app.handle_event(Event::Device(DeviceEvent::Duration { seconds: 3.0 }), &tx).await;
        for _ in 0..3 {
            app.handle_event(Event::Tick, &tx).await;
        }
        assert_eq!(app.state.queue_index, Some(1));

        app.handle_event(Event::Device(DeviceEvent::Duration { seconds: 3.0 }), &tx).await;
        for _ in 0..3 {
            app.handle_event(Event::Tick, &tx).await;
        }
        // Repeat is off and this was the last track
        assert_eq!(app.state.queue_index, Some(1));
        assert_eq!(app.state.player_state, PlayerState::Idle);
    }

    #[tokio::test]
    async fn test_repeat_one_replays_on_end_but_not_on_skip() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(2, None);
        app.state.repeat = RepeatMode::One;
        app.play_index(0, &tx).await;

        app.advance(AdvanceReason::EndOfTrack, &tx).await;
        assert_eq!(app.queue.current_index(), Some(0));

        app.advance(AdvanceReason::Skip, &tx).await;
        assert_eq!(app.queue.current_index(), Some(1));
    }

    #[tokio::test]
    async fn test_seek_and_pause() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(1, None);
        app.play_index(0, &tx).await;

        app.handle_action(Action::SeekForward, &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.state.position, 10);

        app.handle_action(Action::SeekBack, &tx).await;
        app.handle_action(Action::SeekBack, &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.state.position, 0);

        app.handle_action(Action::TogglePause, &tx).await;
        app.handle_event(Event::Tick, &tx).await;
        assert_eq!(app.state.player_state, PlayerState::Paused);
        assert_eq!(app.state.position, 0);

        app.handle_action(Action::TogglePause, &tx).await;
        app.handle_event(Event::Tick, &tx).await;
        assert_eq!(app.state.position, 1);
    }

    #[tokio::test]
    async fn test_absolute_seek_uses_track_duration() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(1, Some(FakeSource::default()));
        app.play_index(0, &tx).await;
        app.handle_lyrics(LyricsEvent::Loaded {
            play_id: app.play_id,
            lrc: "[00:00.00]intro\n[01:00.00]verse\n[02:00.00]chorus".into(),
        });
        app.pump_tracker(&tx).await;

        app.handle_action(Action::SeekTenths(5), &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.state.position, 100);
        assert_eq!(app.state.current_lyric.as_deref(), Some("verse"));
        assert_eq!(app.state.next_lyric.as_deref(), Some("chorus"));
        assert_eq!(app.state.previous_lyric.as_deref(), Some("intro"));
    }

    #[tokio::test]
    async fn test_prev_at_start_restarts_current() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(2, None);
        app.play_index(0, &tx).await;
        app.handle_event(Event::Tick, &tx).await;

        app.handle_action(Action::PrevTrack, &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.state.queue_index, Some(0));
        assert_eq!(app.state.position, 0);
        assert_eq!(app.state.player_state, PlayerState::Playing);
    }

    #[tokio::test]
    async fn test_device_idle_ends_track_once() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(3, None);
        app.device = Some(DeviceSnapshot::default());
        app.play_index(0, &tx).await;

        app.handle_event(Event::Device(DeviceEvent::Duration { seconds: 3.0 }), &tx).await;
        app.handle_event(Event::Device(DeviceEvent::Idle), &tx).await;
        assert_eq!(app.state.queue_index, Some(1));

        // Further end reports for the same file change nothing
        app.handle_event(Event::Device(DeviceEvent::Ended), &tx).await;
        for _ in 0..3 {
            app.handle_event(Event::Tick, &tx).await;
        }
        assert_eq!(app.state.queue_index, Some(1));
        assert_eq!(app.state.player_state, PlayerState::Playing);
        assert_eq!(app.state.position, 3);
    }

    #[tokio::test]
    async fn test_device_end_replays_under_repeat_one() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(2, None);
        app.state.repeat = RepeatMode::One;
        app.device = Some(DeviceSnapshot::default());
        app.play_index(0, &tx).await;
        let first = app.play_id;

        app.handle_event(Event::Device(DeviceEvent::Duration { seconds: 3.0 }), &tx).await;
        app.handle_event(Event::Device(DeviceEvent::Ended), &tx).await;
        assert_eq!(app.state.queue_index, Some(0));
        assert_eq!(app.play_id, first + 1);
    }

    #[tokio::test]
    async fn test_seek_forward_stops_inside_last_second() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(2, None);
        app.device = Some(DeviceSnapshot::default());
        app.play_index(0, &tx).await;
        app.handle_event(Event::Device(DeviceEvent::Duration { seconds: 30.0 }), &tx).await;
        app.handle_event(Event::Tick, &tx).await;

        for _ in 0..3 {
            app.handle_action(Action::SeekForward, &tx).await;
            app.pump_tracker(&tx).await;
        }
        assert_eq!(app.state.position, 29);
        assert_eq!(app.state.queue_index, Some(0));

        app.handle_event(Event::Tick, &tx).await;
        assert_eq!(app.state.queue_index, Some(1));
        assert_eq!(app.state.position, 0);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_player_idle() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(2, Some(FakeSource::with_lyrics("[00:00.00]A")));
        app.mpv = Some(MpvHandle::disconnected().unwrap());
        app.device = Some(DeviceSnapshot::default());

        app.play_index(0, &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.state.player_state, PlayerState::Idle);
        assert!(matches!(
            app.state.toast.as_ref().map(|t| t.kind),
            Some(state::ToastKind::Error)
        ));
        assert_eq!(app.state.lyrics_status, LyricsStatus::Disabled);

        app.handle_event(Event::Tick, &tx).await;
        assert_eq!(app.state.position, 0);

        // Play/pause goes back through the load instead of resuming nothing
        let before = app.play_id;
        app.handle_action(Action::TogglePause, &tx).await;
        app.pump_tracker(&tx).await;
        assert_eq!(app.play_id, before + 1);
        assert_eq!(app.state.player_state, PlayerState::Idle);
    }

    #[tokio::test]
    async fn test_volume_is_clamped() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = app(1, None);
        app.state.volume = 98;
        app.handle_action(Action::VolumeUp, &tx).await;
        assert_eq!(app.state.volume, 100);
        app.state.volume = 3;
        app.handle_action(Action::VolumeDown, &tx).await;
        assert_eq!(app.state.volume, 0);
    }
}
