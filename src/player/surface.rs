use std::time::Duration;

use tracing::{debug, error, warn};

use crate::library::Track;

use super::{media::MediaHandle, progress::PlaybackClock, sink::PlaybackSink, state::PlayerState};

pub const SEEK_STEP: f64 = 0.1;
pub const VOLUME_STEP: f32 = 0.05;

#[derive(Debug, Default)]
enum Source {
    #[default]
    Empty,
    Pending {
        track_id: String,
    },
    Ready(MediaHandle),
    Failed {
        track_id: String,
        reason: String,
    },
}

impl Source {
    fn track_id(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Pending { track_id } | Self::Failed { track_id, .. } => Some(track_id),
            Self::Ready(handle) => Some(handle.track_id()),
        }
    }
}

/// What the player bar shows about the loaded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Idle,
    Loading,
    Ready,
    Unavailable,
}

/// Follows [`PlayerState`] and drives a [`PlaybackSink`] from a single
/// local media handle.
pub struct PlaybackSurface {
    source: Source,
    sink: Box<dyn PlaybackSink>,
    clock: PlaybackClock,
    volume: f32,
    muted: bool,
    sounding: bool,
    downloading: Option<String>,
}

impl PlaybackSurface {
    pub fn new(sink: Box<dyn PlaybackSink>) -> Self {
        Self {
            source: Source::Empty,
            sink,
            clock: PlaybackClock::new(),
            volume: 1.0,
            muted: false,
            sounding: false,
            downloading: None,
        }
    }

    /// Brings the surface in line with `state`. Returns the track whose media
    /// still has to be fetched, if any; the result goes to [`Self::attach`].
    pub fn reconcile(&mut self, state: &PlayerState) -> Option<Track> {
        let wanted = state.current().map(Track::id);

        if wanted != self.source.track_id() {
            self.release();

            let track = state.current()?;
            if !track.is_playable() {
                return None;
            }
            self.source = Source::Pending {
                track_id: track.id().to_string(),
            };
            debug!(track_id = track.id(), "media_fetch_requested");
            return Some(track.clone());
        }

        self.apply(state.is_playing());
        None
    }

    /// Installs a fetched handle if it is still wanted; otherwise the handle
    /// is dropped here.
    pub fn attach(&mut self, handle: MediaHandle, state: &PlayerState) {
        let wanted = matches!(
            &self.source,
            Source::Pending { track_id } if track_id == handle.track_id()
        ) && state.current().map(Track::id) == Some(handle.track_id());

        if !wanted {
            debug!(track_id = handle.track_id(), "stale_media_dropped");
            return;
        }

        self.source = Source::Ready(handle);
        self.apply(state.is_playing());
    }

    pub fn fetch_failed(&mut self, track_id: &str, reason: impl Into<String>) {
        if matches!(&self.source, Source::Pending { track_id: id } if id == track_id) {
            let reason = reason.into();
            warn!(track_id, %reason, "media_unavailable");
            self.source = Source::Failed {
                track_id: track_id.to_string(),
                reason,
            };
        }
    }

    /// Forgets a failed fetch so the next reconcile tries again.
    pub fn clear_failure(&mut self) {
        if matches!(self.source, Source::Failed { .. }) {
            self.source = Source::Empty;
        }
    }

    /// Returns true when playback ran to the end since the last tick.
    pub fn tick(&mut self) -> bool {
        if !self.sounding || !self.sink.has_finished() {
            return false;
        }
        self.sounding = false;
        self.clock.reset();
        true
    }

    pub fn status(&self) -> SourceStatus {
        match self.source {
            Source::Empty => SourceStatus::Idle,
            Source::Pending { .. } => SourceStatus::Loading,
            Source::Ready(_) => SourceStatus::Ready,
            Source::Failed { .. } => SourceStatus::Unavailable,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.source {
            Source::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn position(&self) -> Duration {
        let position = self.clock.position();
        self.duration().map_or(position, |d| position.min(d))
    }

    pub fn duration(&self) -> Option<Duration> {
        match &self.source {
            Source::Ready(handle) => handle.duration(),
            _ => None,
        }
    }

    pub fn progress(&self) -> f64 {
        match self.duration() {
            Some(d) if !d.is_zero() => {
                (self.position().as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// A non-zero level also unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume > 0.0 {
            self.muted = false;
        }
        self.restart();
    }

    pub fn nudge_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.restart();
    }

    /// Moves to `fraction` of the track. Without a known duration this
    /// rewinds to the start.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        let target = self
            .duration()
            .map(|d| d.mul_f64(fraction))
            .unwrap_or(Duration::ZERO);
        self.clock.seek(target);
        self.restart();
    }

    pub fn nudge(&mut self, delta: f64) {
        self.seek_fraction(self.progress() + delta);
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading.is_some()
    }

    /// Reserves the download slot. Returns false while another download is
    /// still running.
    pub fn begin_download(&mut self, track_id: &str) -> bool {
        if self.downloading.is_some() {
            return false;
        }
        self.downloading = Some(track_id.to_string());
        true
    }

    pub fn finish_download(&mut self) {
        self.downloading = None;
    }

    fn apply(&mut self, playing: bool) {
        match (playing, self.sounding) {
            (true, false) => self.start_sink(),
            (false, true) => {
                self.sink.halt();
                self.sounding = false;
                self.clock.pause();
            }
            _ => {}
        }
    }

    fn restart(&mut self) {
        if self.sounding {
            self.start_sink();
        }
    }

    fn start_sink(&mut self) {
        let Source::Ready(handle) = &self.source else {
            return;
        };

        let from = self.position();
        let volume = self.effective_volume();
        match self.sink.start(handle.path(), from, volume) {
            Ok(()) => {
                self.sounding = true;
                self.clock.resume();
            }
            Err(e) => {
                error!(error = %e, "Failed to start playback");
                let track_id = handle.track_id().to_string();
                self.sounding = false;
                self.clock.pause();
                self.source = Source::Failed {
                    track_id,
                    reason: e.to_string(),
                };
            }
        }
    }

    fn release(&mut self) {
        if self.sounding {
            self.sink.halt();
            self.sounding = false;
        }
        self.clock.reset();
        self.source = Source::Empty;
    }
}

impl Drop for PlaybackSurface {
    fn drop(&mut self) {
        self.sink.halt();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::{Path, PathBuf},
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::player::{error::MediaError, media::tests::tiny_mp4};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Start {
            path: PathBuf,
            from: Duration,
            volume: f32,
        },
        Halt,
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        calls: Arc<Mutex<Vec<Call>>>,
        finished: Arc<Mutex<bool>>,
        broken: bool,
    }

    impl RecordingSink {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn last_start(&self) -> Option<(Duration, f32)> {
            self.calls().into_iter().rev().find_map(|c| match c {
                Call::Start { from, volume, .. } => Some((from, volume)),
                Call::Halt => None,
            })
        }
    }

    impl PlaybackSink for RecordingSink {
        fn start(&mut self, path: &Path, from: Duration, volume: f32) -> Result<(), MediaError> {
            if self.broken {
                return Err(MediaError::Player {
                    program: "broken".into(),
                    source: std::io::ErrorKind::NotFound.into(),
                });
            }
            self.calls.lock().unwrap().push(Call::Start {
                path: path.to_path_buf(),
                from,
                volume,
            });
            Ok(())
        }

        fn halt(&mut self) {
            self.calls.lock().unwrap().push(Call::Halt);
        }

        fn has_finished(&mut self) -> bool {
            std::mem::take(&mut *self.finished.lock().unwrap())
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        sink: RecordingSink,
        surface: PlaybackSurface,
        state: PlayerState,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_sink(RecordingSink::default())
        }

        fn with_sink(sink: RecordingSink) -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                surface: PlaybackSurface::new(Box::new(sink.clone())),
                sink,
                state: PlayerState::new(),
            }
        }

        fn handle_for(&self, track: &Track, secs: u32) -> MediaHandle {
            MediaHandle::write(self.dir.path(), track.id(), &tiny_mp4(secs)).unwrap()
        }

        /// Plays `track` and delivers its media.
        fn play_loaded(&mut self, track: &Track, secs: u32) -> PathBuf {
            self.state.set_current(Some(track.clone()));
            self.state.set_playing(true);
            assert_eq!(self.surface.reconcile(&self.state).as_ref(), Some(track));

            let handle = self.handle_for(track, secs);
            let path = handle.path().to_path_buf();
            self.surface.attach(handle, &self.state);
            path
        }
    }

    fn track(name: &str) -> Track {
        Track::generated(name, format!("https://media/{name}"), "la")
    }

    #[tokio::test(start_paused = true)]
    async fn starts_once_media_arrives() {
        let mut fx = Fixture::new();
        let t = track("a");
        let path = fx.play_loaded(&t, 60);

        assert_eq!(fx.surface.status(), SourceStatus::Ready);
        assert_eq!(
            fx.sink.calls(),
            [Call::Start {
                path,
                from: Duration::ZERO,
                volume: 1.0
            }]
        );
    }

    #[test]
    fn switching_tracks_releases_the_old_handle() {
        let mut fx = Fixture::new();
        let a = track("a");
        let old_path = fx.play_loaded(&a, 60);
        assert!(old_path.exists());

        let b = track("b");
        fx.state.set_current(Some(b.clone()));
        assert_eq!(fx.surface.reconcile(&fx.state), Some(b));

        assert!(!old_path.exists());
        assert_eq!(fx.surface.status(), SourceStatus::Loading);
        assert_eq!(fx.sink.calls().last(), Some(&Call::Halt));
    }

    #[test]
    fn late_media_for_an_old_track_is_dropped() {
        let mut fx = Fixture::new();
        let a = track("a");
        let b = track("b");

        fx.state.set_current(Some(a.clone()));
        fx.surface.reconcile(&fx.state);
        fx.state.set_current(Some(b.clone()));
        fx.surface.reconcile(&fx.state);

        let stale = fx.handle_for(&a, 10);
        let stale_path = stale.path().to_path_buf();
        fx.surface.attach(stale, &fx.state);

        assert!(!stale_path.exists());
        assert_eq!(fx.surface.status(), SourceStatus::Loading);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_follow_player_state() {
        let mut fx = Fixture::new();
        let t = track("a");
        fx.play_loaded(&t, 60);

        fx.state.set_playing(false);
        assert_eq!(fx.surface.reconcile(&fx.state), None);
        assert_eq!(fx.sink.calls().last(), Some(&Call::Halt));

        fx.state.set_playing(true);
        fx.surface.reconcile(&fx.state);
        assert!(matches!(fx.sink.calls().last(), Some(Call::Start { .. })));
    }

    #[test]
    fn clearing_current_releases_everything() {
        let mut fx = Fixture::new();
        let path = fx.play_loaded(&track("a"), 60);

        fx.state.set_current(None);
        assert_eq!(fx.surface.reconcile(&fx.state), None);

        assert!(!path.exists());
        assert_eq!(fx.surface.status(), SourceStatus::Idle);
    }

    #[test]
    fn examples_are_never_fetched() {
        let mut fx = Fixture::new();
        fx.state
            .set_current(Some(Track::example("example1", "lofi", "la")));
        fx.state.set_playing(true);

        assert_eq!(fx.surface.reconcile(&fx.state), None);
        assert!(fx.sink.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn mute_keeps_the_stored_level() {
        let mut fx = Fixture::new();
        fx.play_loaded(&track("a"), 60);
        fx.surface.set_volume(0.4);

        fx.surface.toggle_mute();
        assert_eq!(fx.surface.effective_volume(), 0.0);
        assert_eq!(fx.surface.volume(), 0.4);
        assert_eq!(fx.sink.last_start().map(|(_, v)| v), Some(0.0));

        fx.surface.toggle_mute();
        assert_eq!(fx.surface.effective_volume(), 0.4);
    }

    #[test]
    fn non_zero_volume_unmutes() {
        let mut fx = Fixture::new();
        fx.surface.toggle_mute();
        fx.surface.set_volume(0.0);
        assert!(fx.surface.is_muted());

        fx.surface.set_volume(0.7);
        assert!(!fx.surface.is_muted());
        assert_eq!(fx.surface.effective_volume(), 0.7);
    }

    #[tokio::test(start_paused = true)]
    async fn seeking_uses_the_probed_duration() {
        let mut fx = Fixture::new();
        fx.play_loaded(&track("a"), 100);

        fx.surface.seek_fraction(0.25);
        assert_eq!(fx.sink.last_start().map(|(f, _)| f), Some(Duration::from_secs(25)));

        fx.surface.seek_fraction(3.0);
        assert_eq!(fx.sink.last_start().map(|(f, _)| f), Some(Duration::from_secs(100)));
    }

    #[tokio::test(start_paused = true)]
    async fn seeking_without_duration_rewinds() {
        let mut fx = Fixture::new();
        let t = track("a");
        fx.state.set_current(Some(t.clone()));
        fx.state.set_playing(true);
        fx.surface.reconcile(&fx.state);
        let handle = MediaHandle::write(fx.dir.path(), t.id(), b"raw bytes").unwrap();
        fx.surface.attach(handle, &fx.state);

        fx.surface.seek_fraction(0.5);
        assert_eq!(fx.sink.last_start().map(|(f, _)| f), Some(Duration::ZERO));
    }

    #[test]
    fn natural_end_is_reported_once() {
        let mut fx = Fixture::new();
        fx.play_loaded(&track("a"), 60);

        assert!(!fx.surface.tick());
        *fx.sink.finished.lock().unwrap() = true;
        assert!(fx.surface.tick());
        assert!(!fx.surface.tick());
    }

    #[test]
    fn failed_fetch_leaves_surface_unavailable_until_cleared() {
        let mut fx = Fixture::new();
        let t = track("a");
        fx.state.set_current(Some(t.clone()));
        fx.surface.reconcile(&fx.state);

        fx.surface.fetch_failed(t.id(), "HTTP 404");
        assert_eq!(fx.surface.status(), SourceStatus::Unavailable);
        assert_eq!(fx.surface.failure(), Some("HTTP 404"));
        assert_eq!(fx.surface.reconcile(&fx.state), None);

        fx.surface.clear_failure();
        assert_eq!(fx.surface.reconcile(&fx.state), Some(t));
    }

    #[test]
    fn player_spawn_failure_does_not_panic() {
        let mut fx = Fixture::with_sink(RecordingSink {
            broken: true,
            ..Default::default()
        });
        fx.play_loaded(&track("a"), 60);

        assert_eq!(fx.surface.status(), SourceStatus::Unavailable);
    }

    #[test]
    fn one_download_at_a_time() {
        let mut fx = Fixture::new();
        assert!(fx.surface.begin_download("a"));
        assert!(!fx.surface.begin_download("b"));
        fx.surface.finish_download();
        assert!(fx.surface.begin_download("b"));
    }
}
