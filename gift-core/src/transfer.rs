//! Following a gift transfer through the chain.
//!
//! The chain client reports a stream of [`TransferStatus`]es. A [`TransferTracker`]
//! turns that stream into a single [`TransferOutcome`], reported exactly once, which is
//! the signal for the caller to stop listening and, on success, record the gift.

use core::fmt;

use crate::LOG_TARGET;

/// A status notification for a submitted transfer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TransferStatus {
    /// Waiting in the pool for an earlier transaction.
    Future,
    /// Ready to be included.
    Ready,
    /// Gossiped to the listed peers.
    Broadcast(Vec<String>),
    /// Included in a block. The dispatch error, if any, is the runtime's verdict.
    InBlock {
        block: String,
        dispatch_error: Option<String>,
    },
    /// The including block was retracted. The transfer may still land elsewhere.
    Retracted(String),
    /// The block was not finalized in time.
    FinalityTimeout(String),
    /// Included in a finalized block.
    Finalized {
        block: String,
        dispatch_error: Option<String>,
    },
    /// Replaced by another transaction with the same nonce.
    Usurped(String),
    /// Dropped from the pool.
    Dropped,
    /// Rejected as invalid.
    Invalid,
    /// The client itself reported a failure.
    Error(String),
}

impl TransferStatus {
    /// A short name for progress messages.
    pub fn name(&self) -> &'static str {
        match self {
            TransferStatus::Future => "Future",
            TransferStatus::Ready => "Ready",
            TransferStatus::Broadcast(_) => "Broadcast",
            TransferStatus::InBlock { .. } => "InBlock",
            TransferStatus::Retracted(_) => "Retracted",
            TransferStatus::FinalityTimeout(_) => "FinalityTimeout",
            TransferStatus::Finalized { .. } => "Finalized",
            TransferStatus::Usurped(_) => "Usurped",
            TransferStatus::Dropped => "Dropped",
            TransferStatus::Invalid => "Invalid",
            TransferStatus::Error(_) => "Error",
        }
    }
}

/// Why a transfer did not go through.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TransferFailure {
    /// The runtime rejected the transfer while executing it.
    Dispatch(String),
    /// The pool dropped, invalidated or replaced it, or finality timed out.
    Rejected(&'static str),
    /// The chain client reported an error of its own.
    Client(String),
    /// The status stream ended before anything terminal was reported.
    StreamClosed,
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferFailure::Dispatch(e) => write!(f, "Transaction Error: {e}"),
            TransferFailure::Rejected(status) => write!(f, "Transaction Error: {status}"),
            TransferFailure::Client(e) => write!(f, "Error: {e}"),
            TransferFailure::StreamClosed => {
                f.write_str("Error: status updates stopped before the transfer was finalized")
            }
        }
    }
}

/// The terminal result of a transfer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TransferOutcome {
    Finalized { block: String },
    Failed(TransferFailure),
}

/// Consumes statuses until one of them is terminal.
#[derive(Debug, Default)]
pub struct TransferTracker {
    settled: bool,
}

impl TransferTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an outcome has already been reported.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Feed the next status.
    ///
    /// Returns the outcome the first time a terminal status is seen, and None for
    /// anything else, including every status after the outcome was reported.
    pub fn observe(&mut self, status: TransferStatus) -> Option<TransferOutcome> {
        if self.settled {
            log::debug!(
                target: LOG_TARGET,
                "Ignoring {} after the transfer settled",
                status.name()
            );
            return None;
        }
        log::debug!(target: LOG_TARGET, "Transfer status: {}", status.name());

        let outcome = match status {
            TransferStatus::Future
            | TransferStatus::Ready
            | TransferStatus::Broadcast(_)
            | TransferStatus::Retracted(_)
            | TransferStatus::InBlock {
                dispatch_error: None,
                ..
            } => return None,
            TransferStatus::InBlock {
                dispatch_error: Some(e),
                ..
            }
            | TransferStatus::Finalized {
                dispatch_error: Some(e),
                ..
            } => TransferOutcome::Failed(TransferFailure::Dispatch(e)),
            TransferStatus::Finalized {
                block,
                dispatch_error: None,
            } => TransferOutcome::Finalized { block },
            TransferStatus::FinalityTimeout(_) => {
                TransferOutcome::Failed(TransferFailure::Rejected("FinalityTimeout"))
            }
            TransferStatus::Usurped(_) => {
                TransferOutcome::Failed(TransferFailure::Rejected("Usurped"))
            }
            TransferStatus::Dropped => {
                TransferOutcome::Failed(TransferFailure::Rejected("Dropped"))
            }
            TransferStatus::Invalid => {
                TransferOutcome::Failed(TransferFailure::Rejected("Invalid"))
            }
            TransferStatus::Error(e) => TransferOutcome::Failed(TransferFailure::Client(e)),
        };

        self.settled = true;
        Some(outcome)
    }

    /// Call when the status stream ends. Reports a failure unless an outcome was
    /// already produced.
    pub fn close(&mut self) -> Option<TransferOutcome> {
        if self.settled {
            return None;
        }
        self.settled = true;
        Some(TransferOutcome::Failed(TransferFailure::StreamClosed))
    }
}
