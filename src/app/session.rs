use crate::error::{AppError, Result};
use crate::fetch::{cancel_pair, CancelHandle, CancelSignal, StockSeries};

/// How a fetch settled from the dashboard's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded(StockSeries),
    /// Superseded or cancelled by the user; never shown as an error.
    Canceled,
    Failed(String),
}

/// Identifies one started fetch and carries the signal it must honour.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub id: u64,
    pub signal: CancelSignal,
}

struct ActiveFetch {
    id: u64,
    handle: CancelHandle,
}

/// Single slot holding the one fetch the dashboard currently cares about.
#[derive(Default)]
pub struct FetchSession {
    current: Option<ActiveFetch>,
    last_id: u64,
}

impl FetchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is in the slot, then install a fresh ticket.
    pub fn begin(&mut self) -> FetchTicket {
        if let Some(previous) = self.current.take() {
            log::debug!("Cancelling superseded fetch #{}", previous.id);
            previous.handle.cancel();
        }

        self.last_id += 1;
        let (handle, signal) = cancel_pair();
        self.current = Some(ActiveFetch {
            id: self.last_id,
            handle,
        });

        FetchTicket {
            id: self.last_id,
            signal,
        }
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.current.as_ref().map(|active| active.id) == Some(id)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Cancel the current fetch but keep it in the slot so its settlement is
    /// still reported as [`FetchOutcome::Canceled`].
    pub fn cancel_current(&mut self) -> bool {
        match &self.current {
            Some(active) => {
                active.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Resolve a finished fetch. Results of superseded tickets yield `None`.
    pub fn settle(&mut self, id: u64, result: Result<StockSeries>) -> Option<FetchOutcome> {
        if !self.is_current(id) {
            log::debug!("Discarding result of superseded fetch #{id}");
            return None;
        }
        self.current = None;

        Some(match result {
            Ok(series) => FetchOutcome::Loaded(series),
            Err(AppError::Canceled) => FetchOutcome::Canceled,
            Err(err) => FetchOutcome::Failed(err.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fetch_cancels_previous_before_it_is_issued() {
        let mut session = FetchSession::new();
        let first = session.begin();
        assert!(!first.signal.is_cancelled());

        let second = session.begin();

        assert!(first.signal.is_cancelled());
        assert!(!second.signal.is_cancelled());
        assert!(second.id > first.id);
        assert!(session.is_current(second.id));
        assert!(!session.is_current(first.id));
    }

    #[test]
    fn superseded_results_never_settle() {
        let mut session = FetchSession::new();
        let first = session.begin();
        let second = session.begin();

        assert_eq!(session.settle(first.id, Ok(StockSeries::default())), None);
        assert_eq!(session.settle(first.id, Err(AppError::Canceled)), None);
        assert!(session.is_current(second.id));
    }

    #[test]
    fn current_results_map_to_outcomes() {
        let mut session = FetchSession::new();

        let ticket = session.begin();
        assert_eq!(
            session.settle(ticket.id, Ok(StockSeries::default())),
            Some(FetchOutcome::Loaded(StockSeries::default()))
        );
        assert!(!session.is_active());

        let ticket = session.begin();
        assert_eq!(
            session.settle(ticket.id, Err(AppError::parse("rate limited"))),
            Some(FetchOutcome::Failed("rate limited".to_string()))
        );

        let ticket = session.begin();
        assert!(session.cancel_current());
        assert!(ticket.signal.is_cancelled());
        assert_eq!(
            session.settle(ticket.id, Err(AppError::Canceled)),
            Some(FetchOutcome::Canceled)
        );
        assert!(!session.cancel_current());
    }

    #[test]
    fn settled_ticket_is_not_settled_twice() {
        let mut session = FetchSession::new();
        let ticket = session.begin();
        assert!(session.settle(ticket.id, Ok(StockSeries::default())).is_some());
        assert!(session.settle(ticket.id, Ok(StockSeries::default())).is_none());
    }
}
