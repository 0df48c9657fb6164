use std::time::Duration;

use tokio::time::Instant;

/// Wall-clock estimate of the playback position. The external player does
/// not report back, so position is offset plus time spent running.
#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    offset: Duration,
    resumed_at: Option<Instant>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Duration {
        self.offset + self.resumed_at.map(|at| at.elapsed()).unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.resumed_at.is_some()
    }

    pub fn resume(&mut self) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        self.offset = self.position();
        self.resumed_at = None;
    }

    pub fn seek(&mut self, position: Duration) {
        self.offset = position;
        if self.resumed_at.is_some() {
            self.resumed_at = Some(Instant::now());
        }
    }

    pub fn reset(&mut self) {
        self.offset = Duration::ZERO;
        self.resumed_at = None;
    }
}
