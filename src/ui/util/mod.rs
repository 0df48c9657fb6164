pub mod handler;

use std::time::{SystemTime, UNIX_EPOCH};

/// Pulsing marker for the current track; steady while paused.
pub fn get_active_track_icon(is_playing: bool) -> &'static str {
    const FRAME_STEP_MS: u128 = 150;
    const FRAMES: [&str; 6] = ["▁", "▃", "▅", "▇", "▅", "▃"];

    if !is_playing {
        return "❚❚";
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    FRAMES[(now / FRAME_STEP_MS) as usize % FRAMES.len()]
}
