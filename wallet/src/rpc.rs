//! Strongly typed helper functions for communicating with the Node's
//! RPC endpoint.

use anyhow::anyhow;
use gift_core::transfer::TransferStatus;
use jsonrpsee::{
    core::client::{ClientT, Subscription, SubscriptionClientT},
    rpc_params,
    ws_client::{WsClient, WsClientBuilder},
};
use serde::Deserialize;

/// Transaction pool status as the node reports it on a watch subscription.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub enum RpcTransactionStatus {
    Future,
    Ready,
    Broadcast(Vec<String>),
    InBlock(String),
    Retracted(String),
    FinalityTimeout(String),
    Finalized(String),
    Usurped(String),
    Dropped,
    Invalid,
}

// The pool does not know how the runtime dispatched the transfer. Finding that out
// means decoding the block's events, which is left to the signer's tooling, so no
// dispatch error is ever reported from here.
impl From<RpcTransactionStatus> for TransferStatus {
    fn from(status: RpcTransactionStatus) -> Self {
        match status {
            RpcTransactionStatus::Future => TransferStatus::Future,
            RpcTransactionStatus::Ready => TransferStatus::Ready,
            RpcTransactionStatus::Broadcast(peers) => TransferStatus::Broadcast(peers),
            RpcTransactionStatus::InBlock(block) => TransferStatus::InBlock {
                block,
                dispatch_error: None,
            },
            RpcTransactionStatus::Retracted(block) => TransferStatus::Retracted(block),
            RpcTransactionStatus::FinalityTimeout(block) => TransferStatus::FinalityTimeout(block),
            RpcTransactionStatus::Finalized(block) => TransferStatus::Finalized {
                block,
                dispatch_error: None,
            },
            RpcTransactionStatus::Usurped(tx) => TransferStatus::Usurped(tx),
            RpcTransactionStatus::Dropped => TransferStatus::Dropped,
            RpcTransactionStatus::Invalid => TransferStatus::Invalid,
        }
    }
}

/// Open a websocket connection to the node.
pub async fn connect(endpoint: &str) -> anyhow::Result<WsClient> {
    WsClientBuilder::default()
        .build(endpoint)
        .await
        .map_err(|e| anyhow!("Could not connect to the node at {endpoint}: {e}"))
}

/// Typed helper to get the Node's genesis block hash
pub async fn node_genesis_hash(client: &WsClient) -> anyhow::Result<String> {
    let params = rpc_params![0u32];
    let rpc_response: Option<String> = client.request("chain_getBlockHash", params).await?;
    rpc_response.ok_or(anyhow!("Node did not report a genesis block hash"))
}

/// Submit an already signed extrinsic and subscribe to its status updates.
pub async fn submit_and_watch(
    extrinsic: &[u8],
    client: &WsClient,
) -> anyhow::Result<Subscription<RpcTransactionStatus>> {
    let params = rpc_params![format!("0x{}", hex::encode(extrinsic))];
    let subscription = client
        .subscribe(
            "author_submitAndWatchExtrinsic",
            params,
            "author_unwatchExtrinsic",
        )
        .await?;
    Ok(subscription)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RpcTransactionStatus {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn node_statuses_deserialize() {
        assert_eq!(parse(r#""ready""#), RpcTransactionStatus::Ready);
        assert_eq!(parse(r#""dropped""#), RpcTransactionStatus::Dropped);
        assert_eq!(
            parse(r#"{"broadcast":["12D3KooW"]}"#),
            RpcTransactionStatus::Broadcast(vec!["12D3KooW".into()])
        );
        assert_eq!(
            parse(r#"{"inBlock":"0xb1"}"#),
            RpcTransactionStatus::InBlock("0xb1".into())
        );
        assert_eq!(
            parse(r#"{"finalityTimeout":"0xb1"}"#),
            RpcTransactionStatus::FinalityTimeout("0xb1".into())
        );
    }

    #[test]
    fn finalized_maps_without_dispatch_error() {
        assert_eq!(
            TransferStatus::from(parse(r#"{"finalized":"0xb2"}"#)),
            TransferStatus::Finalized {
                block: "0xb2".into(),
                dispatch_error: None,
            }
        );
    }
}
