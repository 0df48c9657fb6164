use std::time::Duration;

use tokio::time::Instant;

const LOADING_MESSAGE_PERIOD: Duration = Duration::from_secs(4);

pub const LOADING_MESSAGES: &[&str] = &[
    "Writing the lyrics...",
    "Warming up the synthesizers...",
    "Tuning the virtual instruments...",
    "Composing the digital symphony...",
    "Mixing the audio channels...",
    "Applying the final mastering touches...",
    "Almost there, the track is cooking...",
];

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub ui: UiState,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub toast: Option<Toast>,
    pub generation_started: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

impl AppState {
    /// A new toast replaces whatever is showing and restarts the timer.
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.ui.toast = Some(Toast {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    /// Returns true when a toast was removed.
    pub fn expire_toast(&mut self, lifetime: Duration) -> bool {
        match &self.ui.toast {
            Some(toast) if toast.shown_at.elapsed() >= lifetime => {
                self.ui.toast = None;
                true
            }
            _ => false,
        }
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        let started = self.ui.generation_started?;
        let step = started.elapsed().as_secs() / LOADING_MESSAGE_PERIOD.as_secs();
        Some(LOADING_MESSAGES[step as usize % LOADING_MESSAGES.len()])
    }
}
