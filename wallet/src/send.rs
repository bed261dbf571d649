//! Wallet features related to sending gifts.

use anyhow::{anyhow, bail};
use gift_core::{
    service::{GiftRequest, SentGift},
    traits::AccountProvider,
    transfer::TransferOutcome,
    types::short_address,
    GiftService, GiftStore,
};

use crate::{
    chain::{abbreviate, extrinsic_hash, follow, Chain},
    cli::SendGiftArgs,
};

/// Block explorer page for an extrinsic, by hash.
const EXPLORER_EXTRINSIC_URL: &str = "https://polkadot.subscan.io/extrinsic";

/// Shown when a finalized transfer may still have failed to dispatch.
const UNCHECKED_DISPATCH_NOTICE: &str =
    "Note: the node does not report whether the transfer dispatched successfully. \
     Check the transaction in a block explorer before sharing the link.";

/// Transfer the gift amount on chain, then record the gift and print its claim link.
///
/// The gift only exists once the transfer is finalized. Any other ending leaves the
/// ledger untouched and is reported as an error.
pub async fn send_gift<S>(
    service: &mut GiftService<S>,
    accounts: &impl AccountProvider,
    chain: &Chain,
    args: SendGiftArgs,
) -> anyhow::Result<SentGift>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let sender = accounts.select(args.from.as_deref())?;
    println!("From: {} ({})", sender.name, short_address(&sender.address));

    let extrinsic = match (args.extrinsic, chain) {
        (Some(signed), _) => signed.0,
        (None, Chain::Dev(_)) => {
            format!("{}:{}:{}", sender.address, args.recipient, args.amount).into_bytes()
        }
        (None, Chain::Node(_)) => bail!(
            "A signed transfer is required when talking to a node. Sign a balances transfer of {} to {} with {} and pass it with --extrinsic.",
            args.amount,
            args.recipient,
            sender.source,
        ),
    };

    let request = GiftRequest {
        sender_address: sender.address,
        recipient_address: args.recipient,
        amount: args.amount,
    };
    log::debug!("Sending gift {request:?}");

    let tx_hash = extrinsic_hash(&extrinsic);
    println!("Waiting for transaction confirmation...");
    let mut watch = chain.submit(&extrinsic).await?;
    let outcome = follow(&mut watch).await;
    if let Err(e) = watch.unsubscribe().await {
        log::warn!("Failed to unsubscribe from transfer status updates: {e}");
    }

    let sent = service.record_transfer(&request, &outcome)?;
    match (sent, outcome) {
        (Some(sent), TransferOutcome::Finalized { block }) => {
            println!(
                "Gift sent successfully! Finalized in block {}... Share this link:",
                abbreviate(&block)
            );
            println!("{}", sent.claim_link);
            println!("Transaction hash: {tx_hash} ({EXPLORER_EXTRINSIC_URL}/{tx_hash})");
            if !chain.reports_dispatch_errors() {
                println!("{UNCHECKED_DISPATCH_NOTICE}");
            }
            Ok(sent)
        }
        (_, TransferOutcome::Failed(failure)) => Err(anyhow!("{failure}")),
        (None, TransferOutcome::Finalized { .. }) => {
            bail!("Transaction successful, but failed to create gift record.")
        }
    }
}
