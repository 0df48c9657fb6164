use tracing::warn;

use crate::library::Track;

/// The current track and whether it should be sounding. `is_playing` is
/// never true without a current track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    current: Option<Track>,
    is_playing: bool,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_current(&mut self, track: Option<Track>) {
        if track.is_none() {
            self.is_playing = false;
        }
        self.current = track;
    }

    pub fn set_playing(&mut self, playing: bool) {
        if playing && self.current.is_none() {
            warn!("set_playing_without_track");
            return;
        }
        self.is_playing = playing;
    }

    pub fn is_currently_playing(&self, id: &str) -> bool {
        self.is_playing && self.current.as_ref().is_some_and(|t| t.id() == id)
    }

    /// Swaps in a newer copy of the current track. Returns whether the
    /// ids matched.
    pub fn refresh(&mut self, track: &Track) -> bool {
        match &mut self.current {
            Some(current) if current.id() == track.id() => {
                *current = track.clone();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::generated("lofi", "https://m/a", "la")
    }

    #[test]
    fn clearing_current_stops_playback() {
        for playing in [false, true] {
            let mut state = PlayerState::new();
            state.set_current(Some(track()));
            state.set_playing(playing);

            state.set_current(None);
            assert!(!state.is_playing());
            assert!(state.current().is_none());
        }
    }

    #[test]
    fn cannot_play_without_a_track() {
        let mut state = PlayerState::new();
        state.set_playing(true);
        assert!(!state.is_playing());
    }

    #[test]
    fn currently_playing_needs_matching_id_and_flag() {
        let t = track();
        let mut state = PlayerState::new();
        state.set_current(Some(t.clone()));

        assert!(!state.is_currently_playing(t.id()));
        state.set_playing(true);
        assert!(state.is_currently_playing(t.id()));
        assert!(!state.is_currently_playing("other"));
    }

    #[test]
    fn switching_tracks_keeps_the_flag() {
        let mut state = PlayerState::new();
        state.set_current(Some(track()));
        state.set_playing(true);

        let next = track();
        state.set_current(Some(next.clone()));
        assert!(state.is_currently_playing(next.id()));
    }

    #[test]
    fn refresh_only_touches_the_same_track() {
        let t = track();
        let mut state = PlayerState::new();
        state.set_current(Some(t.clone()));

        assert!(!state.refresh(&track().with_lyrics("x")));
        assert!(state.refresh(&t.with_lyrics("new words")));
        assert_eq!(state.current().and_then(Track::lyrics), Some("new words"));
    }
}
