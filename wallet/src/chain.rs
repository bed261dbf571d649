//! Submitting gift transfers and following them until they settle.

use std::{
    collections::VecDeque,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    task::{Context, Poll},
};

use futures::{Stream, StreamExt};
use gift_core::transfer::{TransferFailure, TransferOutcome, TransferStatus, TransferTracker};
use jsonrpsee::{core::client::Subscription, ws_client::WsClient};
use sp_core::hashing::blake2_256;

use crate::rpc::{self, RpcTransactionStatus};

/// Where transfers are sent.
pub enum Chain {
    /// A real node reached over RPC.
    Node(WsClient),
    /// A local stand-in chain.
    Dev(DevChain),
}

impl Chain {
    /// Connect to the node at `endpoint`, or use the dev chain.
    pub async fn connect(endpoint: &str, dev: bool) -> anyhow::Result<Self> {
        if dev {
            log::info!("Using the local dev chain. Transfers finalize immediately.");
            return Ok(Chain::Dev(DevChain::finalizing()));
        }
        Ok(Chain::Node(rpc::connect(endpoint).await?))
    }

    /// The genesis hash of the chain, if there is a real one.
    pub async fn genesis_hash(&self) -> anyhow::Result<Option<String>> {
        match self {
            Chain::Node(client) => rpc::node_genesis_hash(client).await.map(Some),
            Chain::Dev(_) => Ok(None),
        }
    }

    /// Whether a transfer that fails to dispatch is reported as failed.
    ///
    /// A node's pool only tells us where the transfer ended up, not how the runtime
    /// dispatched it.
    pub fn reports_dispatch_errors(&self) -> bool {
        matches!(self, Chain::Dev(_))
    }

    /// Submit a signed transfer and start watching it.
    pub async fn submit(&self, extrinsic: &[u8]) -> anyhow::Result<StatusWatch> {
        match self {
            Chain::Node(client) => Ok(StatusWatch::Node(
                rpc::submit_and_watch(extrinsic, client).await?,
            )),
            Chain::Dev(dev) => Ok(dev.watch(extrinsic)),
        }
    }
}

/// A chain that plays back statuses instead of talking to a node.
///
/// By default every transfer is finalized. A script replaces that with a fixed status
/// sequence, which is how failing transfers are rehearsed.
#[derive(Clone, Default)]
pub struct DevChain {
    script: Option<Vec<TransferStatus>>,
    open_watches: Arc<AtomicUsize>,
}

impl DevChain {
    pub fn finalizing() -> Self {
        Self::default()
    }

    pub fn scripted(statuses: Vec<TransferStatus>) -> Self {
        DevChain {
            script: Some(statuses),
            ..Self::default()
        }
    }

    /// Watches handed out and not unsubscribed yet.
    pub fn open_watches(&self) -> usize {
        self.open_watches.load(Ordering::SeqCst)
    }

    fn watch(&self, extrinsic: &[u8]) -> StatusWatch {
        let statuses = match &self.script {
            Some(script) => script.iter().cloned().collect(),
            None => finalizing_statuses(extrinsic),
        };
        self.open_watches.fetch_add(1, Ordering::SeqCst);
        StatusWatch::Dev {
            statuses,
            open_watches: self.open_watches.clone(),
        }
    }
}

/// The statuses the dev chain reports for a transfer it accepts.
fn finalizing_statuses(extrinsic: &[u8]) -> VecDeque<TransferStatus> {
    let block = format!("0x{:0<64}", hex::encode(&extrinsic[..extrinsic.len().min(32)]));
    VecDeque::from([
        TransferStatus::Ready,
        TransferStatus::InBlock {
            block: block.clone(),
            dispatch_error: None,
        },
        TransferStatus::Finalized {
            block,
            dispatch_error: None,
        },
    ])
}

/// The hash a node files an extrinsic under: blake2-256 of its encoding.
pub fn extrinsic_hash(extrinsic: &[u8]) -> String {
    format!("0x{}", hex::encode(blake2_256(extrinsic)))
}

/// A live stream of status updates for one transfer.
pub enum StatusWatch {
    Node(Subscription<RpcTransactionStatus>),
    Dev {
        statuses: VecDeque<TransferStatus>,
        open_watches: Arc<AtomicUsize>,
    },
}

impl StatusWatch {
    /// Stop receiving updates.
    pub async fn unsubscribe(self) -> anyhow::Result<()> {
        match self {
            StatusWatch::Node(subscription) => Ok(subscription.unsubscribe().await?),
            StatusWatch::Dev { open_watches, .. } => {
                open_watches.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}

impl Stream for StatusWatch {
    type Item = anyhow::Result<TransferStatus>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match &mut *self {
            StatusWatch::Node(subscription) => subscription.poll_next_unpin(cx).map(|next| {
                next.map(|status| status.map(TransferStatus::from).map_err(Into::into))
            }),
            StatusWatch::Dev { statuses, .. } => Poll::Ready(statuses.pop_front().map(Ok)),
        }
    }
}

/// Read statuses until the transfer settles and return its outcome.
///
/// Stops reading at the first terminal status. The caller is expected to unsubscribe
/// right after, whatever the outcome.
pub async fn follow<S>(statuses: &mut S) -> TransferOutcome
where
    S: Stream<Item = anyhow::Result<TransferStatus>> + Unpin,
{
    let mut tracker = TransferTracker::new();

    while let Some(next) = statuses.next().await {
        let status = next.unwrap_or_else(|e| TransferStatus::Error(e.to_string()));
        match &status {
            TransferStatus::InBlock { block, .. } => {
                println!("Transaction in block {}...", abbreviate(block));
            }
            status => println!("Transaction status: {}", status.name()),
        }
        if let Some(outcome) = tracker.observe(status) {
            return outcome;
        }
    }

    tracker
        .close()
        .unwrap_or(TransferOutcome::Failed(TransferFailure::StreamClosed))
}

/// The first ten characters of a hash, enough to recognize it.
pub(crate) fn abbreviate(hash: &str) -> &str {
    hash.get(..10).unwrap_or(hash)
}
