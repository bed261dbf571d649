//! Wallet features related to looking at and claiming gifts.

use anyhow::bail;
use gift_core::{
    claim::{format_millis, ClaimOutcome, GiftLookup},
    traits::{AccountError, AccountProvider},
    types::short_address,
    GiftId, GiftRecord, GiftService, GiftStatus, GiftStore,
};

use crate::cli::ClaimGiftArgs;

/// Pretty print a single gift.
pub fn print_gift(gift: &GiftRecord) {
    println!("Gift {}", gift.id);
    println!("  Amount:    {}", gift.amount);
    println!("  Sent from: {}", short_address(&gift.sender_address));
    println!("  Sent to:   {}", short_address(&gift.recipient_address));
    println!("  Created:   {}", format_millis(gift.created_at));
    match &gift.status {
        GiftStatus::Claimed {
            claimer_address,
            claimed_at,
        } => {
            println!("  Claimed by: {}", short_address(claimer_address));
            println!("  Claimed on: {}", format_millis(*claimed_at));
        }
        status => println!("  Status:    {}", status.name()),
    }
}

/// Print every gift in the wallet, oldest first.
pub fn list_gifts<S>(service: &GiftService<S>) -> anyhow::Result<()>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let gifts = service.ledger().gifts()?;
    if gifts.is_empty() {
        println!("No gifts yet.");
    }
    for gift in gifts {
        println!(
            "{} {:>10} {:<8} {}",
            gift.id,
            gift.amount,
            gift.status.name(),
            service.claim_link(&gift.id)
        );
    }
    Ok(())
}

/// Show a single gift by id.
pub fn show_gift<S>(service: &GiftService<S>, id: &GiftId) -> anyhow::Result<()>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let Some(gift) = service.ledger().find(id)? else {
        bail!("No gift with id {id}");
    };
    print_gift(&gift);
    println!("  Link:      {}", service.claim_link(id));
    Ok(())
}

/// Resolve a claim link and report what is behind it.
pub fn load_gift<S>(service: &GiftService<S>, link: &str) -> anyhow::Result<GiftLookup>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let lookup = service.lookup(link)?;
    println!("{lookup}");
    if let Some(gift) = lookup.record() {
        print_gift(gift);
    }
    Ok(lookup)
}

/// Claim the gift behind a link into one of the wallet's accounts.
pub fn claim_gift<S>(
    service: &mut GiftService<S>,
    accounts: &impl AccountProvider,
    args: ClaimGiftArgs,
) -> anyhow::Result<ClaimOutcome>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let id = match load_gift(service, &args.link)? {
        GiftLookup::Ready(gift) => gift.id,
        GiftLookup::InvalidLink(e) => bail!(e),
        GiftLookup::NotFound(id) => bail!("No gift with id {id}"),
        GiftLookup::AlreadyClaimed(gift) | GiftLookup::Unclaimable(gift) => {
            bail!("Gift {} cannot be claimed", gift.id)
        }
    };

    let claimer = match accounts.select(args.from.as_deref()) {
        Ok(account) => Some(account),
        Err(AccountError::NotConnected) => None,
        Err(e) => return Err(e.into()),
    };
    if let Some(claimer) = &claimer {
        println!(
            "Claim to Account: {} ({})",
            claimer.name,
            short_address(&claimer.address)
        );
    }

    let outcome = service.confirm_claim(&id, claimer.as_ref())?;
    println!("{outcome}");
    if !outcome.is_claimed() {
        bail!("Gift {id} was not claimed");
    }
    Ok(outcome)
}
