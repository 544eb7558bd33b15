use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::session::{FetchSession, FetchTicket};
use crate::app::state::DashboardState;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{IntradayFetcher, StockSeries};
use crate::ui::{render_dashboard, TerminalGuard};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Exit,
}

struct Completion {
    id: u64,
    result: Result<StockSeries>,
}

/// Owns the dashboard state and routes keys and fetch completions into it.
pub struct DashboardController {
    fetcher: Arc<IntradayFetcher>,
    state: DashboardState,
    session: FetchSession,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl DashboardController {
    pub fn new(config: &Config, fetcher: Arc<IntradayFetcher>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            state: DashboardState::new(config.defaults),
            session: FetchSession::new(),
            completions_tx,
            completions_rx,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Start a fetch for the current form values. Any fetch still in flight is
    /// cancelled before the new one is issued.
    pub fn submit(&mut self) {
        let request = match self.state.prepare_load() {
            Ok(request) => request,
            Err(err) => {
                log::debug!("Rejected dashboard submit: {err}");
                return;
            }
        };

        let FetchTicket { id, signal } = self.session.begin();
        log::info!(
            "Fetch #{id}: {} ({}, {})",
            request.symbol(),
            request.interval,
            request.output_size
        );

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&request, &signal).await;
            let _ = tx.send(Completion { id, result });
        });
    }

    pub fn cancel_in_flight(&mut self) -> bool {
        self.session.cancel_current()
    }

    /// Apply every completion that has arrived so far. Returns how many changed
    /// the visible state.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(Completion { id, result }) = self.completions_rx.try_recv() {
            if let Some(outcome) = self.session.settle(id, result) {
                self.state.apply(outcome);
                applied += 1;
            }
        }
        applied
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.session.cancel_current();
            return KeyOutcome::Exit;
        }

        match key.code {
            KeyCode::Esc => {
                if self.session.is_active() {
                    self.cancel_in_flight();
                } else {
                    return KeyOutcome::Exit;
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.state.pop_char(),
            KeyCode::Up => self.state.prev_interval(),
            KeyCode::Down => self.state.next_interval(),
            KeyCode::Tab => self.state.toggle_output_size(),
            KeyCode::Char(ch) if !ch.is_control() && !ch.is_whitespace() => {
                self.state.push_char(ch)
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Drive the terminal until the user exits.
    pub async fn run(mut self) -> Result<()> {
        let mut guard = TerminalGuard::new()?;

        loop {
            self.drain_completions();
            guard
                .terminal_mut()
                .draw(|f| render_dashboard(f, &self.state))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) == KeyOutcome::Exit {
                        break;
                    }
                }
            }

            tokio::task::yield_now().await;
        }

        self.session.cancel_current();
        guard.restore()?;
        Ok(())
    }
}
