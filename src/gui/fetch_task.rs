//! Background Fetch Task
//! Runs one history request on a worker thread and hands the result back to
//! the UI thread through a channel polled every frame.

use crate::data::{FetchError, HistoryRequest, PriceSeries, PriceSource, Symbol};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Fetch result from the background thread
pub struct FetchOutcome {
    pub symbol: Symbol,
    pub result: Result<PriceSeries, FetchError>,
}

/// What a poll of the task found.
pub enum FetchPoll {
    /// No fetch running.
    Idle,
    /// Worker still busy.
    Waiting,
    Finished(FetchOutcome),
    /// Worker went away without sending a result.
    Aborted(Symbol),
}

/// At most one in-flight fetch.
#[derive(Default)]
pub struct FetchTask {
    rx: Option<Receiver<FetchOutcome>>,
    pending: Option<Symbol>,
}

impl FetchTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Reserve the slot for `symbol`. Returns the sender the worker must
    /// answer on, or None when a fetch is already running.
    fn begin(&mut self, symbol: Symbol) -> Option<Sender<FetchOutcome>> {
        if self.pending.is_some() {
            return None;
        }
        let (tx, rx) = channel();
        self.rx = Some(rx);
        self.pending = Some(symbol);
        Some(tx)
    }

    /// Spawn the worker. Returns false (and does nothing) while another
    /// fetch is pending.
    pub fn start(
        &mut self,
        symbol: Symbol,
        source: Arc<dyn PriceSource>,
        request: HistoryRequest,
    ) -> bool {
        let Some(tx) = self.begin(symbol) else {
            return false;
        };

        thread::spawn(move || {
            let result = source.fetch_history(symbol.ticker, &request);
            let _ = tx.send(FetchOutcome { symbol, result });
        });
        true
    }

    /// Check for a result without blocking.
    pub fn poll(&mut self) -> FetchPoll {
        let Some(rx) = self.rx.take() else {
            return FetchPoll::Idle;
        };

        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                FetchPoll::Finished(outcome)
            }
            Err(TryRecvError::Empty) => {
                self.rx = Some(rx);
                FetchPoll::Waiting
            }
            Err(TryRecvError::Disconnected) => match self.pending.take() {
                Some(symbol) => FetchPoll::Aborted(symbol),
                None => FetchPoll::Idle,
            },
        }
    }
}
