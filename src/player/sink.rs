use std::{path::Path, process::Stdio, time::Duration};

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::error::MediaError;

/// Whatever actually makes sound from a local media file.
pub trait PlaybackSink: Send {
    /// Starts playing `path` from `from`, replacing anything already running.
    fn start(&mut self, path: &Path, from: Duration, volume: f32) -> Result<(), MediaError>;
    fn halt(&mut self);
    /// True once, after playback reached the end on its own.
    fn has_finished(&mut self) -> bool;
}

/// Runs an mpv-compatible player as a child process.
pub struct ProcessSink {
    program: String,
    child: Option<Child>,
}

impl ProcessSink {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    fn args(path: &Path, from: Duration, volume: f32) -> Vec<String> {
        vec![
            "--no-video".to_string(),
            "--really-quiet".to_string(),
            format!("--volume={}", (volume.clamp(0.0, 1.0) * 100.0).round() as u32),
            format!("--start={:.1}", from.as_secs_f64()),
            path.display().to_string(),
        ]
    }
}

impl PlaybackSink for ProcessSink {
    fn start(&mut self, path: &Path, from: Duration, volume: f32) -> Result<(), MediaError> {
        self.halt();

        let child = Command::new(&self.program)
            .args(Self::args(path, from, volume))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| MediaError::Player {
                program: self.program.clone(),
                source,
            })?;

        debug!(program = %self.program, pid = ?child.id(), "player_started");
        self.child = Some(child);
        Ok(())
    }

    fn halt(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
        {
            warn!(error = %e, "Failed to stop player process");
        }
    }

    fn has_finished(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(%status, "player_exited");
                self.child = None;
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to query player process");
                self.child = None;
                true
            }
        }
    }
}

impl Drop for ProcessSink {
    fn drop(&mut self) {
        self.halt();
    }
}
