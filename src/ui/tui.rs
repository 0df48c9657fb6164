use std::{
    io::Stdout,
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::Result;
use crossterm::event::EventStream;
use flume::{Receiver, Sender};
use futures::StreamExt;
use ratatui::crossterm::{
    cursor,
    event::{
        DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
        Event as CrosstermEvent, KeyEvent, KeyEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, error};

type Backend = CrosstermBackend<Stdout>;

#[derive(Clone, Debug)]
pub enum TerminalEvent {
    Init,
    Tick,
    FocusGained,
    FocusLost,
    Key(KeyEvent),
    /// Text delivered in one piece by bracketed paste.
    Paste(String),
    Resize(u16, u16),
}

impl TerminalEvent {
    fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Paste(text) => Some(Self::Paste(text)),
            CrosstermEvent::Resize(w, h) => Some(Self::Resize(w, h)),
            CrosstermEvent::FocusGained => Some(Self::FocusGained),
            CrosstermEvent::FocusLost => Some(Self::FocusLost),
            _ => None,
        }
    }
}

/// Owns the terminal while the app runs and turns crossterm input plus a
/// fixed tick into a single stream of [`TerminalEvent`]s.
pub struct Tui {
    pub terminal: Terminal<Backend>,
    event_rx: Receiver<TerminalEvent>,
    event_tx: Sender<TerminalEvent>,
    tick_rate: Duration,
    reader: Option<JoinHandle<()>>,
}

impl Tui {
    pub fn new(tick_rate: Duration) -> Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();

        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(std::io::stdout()))?,
            event_rx,
            event_tx,
            tick_rate,
            reader: None,
        })
    }

    fn start(&mut self) {
        let tx = self.event_tx.clone();
        let mut ticks = tokio::time::interval(self.tick_rate);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.reader = Some(tokio::spawn(async move {
            let mut input = EventStream::new();
            loop {
                let event = tokio::select! {
                    _ = ticks.tick() => TerminalEvent::Tick,
                    next = input.next() => match next {
                        Some(Ok(raw)) => match TerminalEvent::from_crossterm(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(e)) => {
                            error!(error = %e, "terminal_input_failed");
                            continue;
                        }
                        None => break,
                    },
                };

                if tx.send_async(event).await.is_err() {
                    break;
                }
            }
            debug!("terminal_reader_stopped");
        }));
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            std::io::stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableFocusChange,
            cursor::Hide
        )?;
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if terminal::is_raw_mode_enabled()? {
            self.terminal.flush()?;
            Self::restore()?;
        }
        Ok(())
    }

    /// Puts the terminal back into cooked mode. Also used by the panic hook.
    pub fn restore() -> Result<()> {
        execute!(
            std::io::stdout(),
            DisableFocusChange,
            DisableBracketedPaste,
            LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    #[allow(clippy::should_implement_trait)]
    pub async fn next(&self) -> Option<TerminalEvent> {
        self.event_rx.recv_async().await.ok()
    }
}

impl Deref for Tui {
    type Target = Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!(error = %e, "Failed to restore terminal");
        }
    }
}
