//! The gift service: the one object the sender and claimer front-ends are handed.
//!
//! It bundles a [`GiftLedger`] with the origin that claim links point at, and runs the
//! two workflows on top of them.

use serde::{Deserialize, Serialize};

use crate::{
    claim::{ClaimOutcome, GiftLookup},
    ensure_or, settle,
    ledger::GiftLedger,
    link,
    store::GiftStore,
    transfer::TransferOutcome,
    types::{Account, GiftId, GiftRecord, GiftStatus},
    LOG_TARGET,
};

#[cfg(test)]
mod tests;

/// What the sender asked for. Collected and validated by the front-end.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GiftRequest {
    pub sender_address: String,
    pub recipient_address: String,
    pub amount: String,
}

/// A recorded gift together with the link to share.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SentGift {
    pub gift: GiftRecord,
    pub claim_link: String,
}

pub struct GiftService<S> {
    ledger: GiftLedger<S>,
    origin: String,
}

impl<S: GiftStore> GiftService<S> {
    /// Claim links will start with `origin`. A trailing slash is dropped.
    pub fn new(ledger: GiftLedger<S>, origin: impl Into<String>) -> Self {
        let mut origin = origin.into();
        while origin.ends_with('/') {
            origin.pop();
        }
        GiftService { ledger, origin }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn ledger(&self) -> &GiftLedger<S> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut GiftLedger<S> {
        &mut self.ledger
    }

    pub fn claim_link(&self, id: &GiftId) -> String {
        link::encode(&self.origin, id)
    }

    /// Record a gift whose transfer is already known to be final.
    pub fn create_gift(&mut self, request: &GiftRequest) -> Result<SentGift, S::Error> {
        let gift = self.ledger.create(
            &request.sender_address,
            &request.recipient_address,
            &request.amount,
        )?;
        let claim_link = self.claim_link(&gift.id);
        Ok(SentGift { gift, claim_link })
    }

    /// Record a gift if, and only if, its transfer was finalized cleanly.
    ///
    /// Failed transfers leave the ledger untouched and return None.
    pub fn record_transfer(
        &mut self,
        request: &GiftRequest,
        outcome: &TransferOutcome,
    ) -> Result<Option<SentGift>, S::Error> {
        match outcome {
            TransferOutcome::Finalized { block } => {
                log::info!(target: LOG_TARGET, "Transfer finalized in {block}. Recording gift.");
                self.create_gift(request).map(Some)
            }
            TransferOutcome::Failed(failure) => {
                log::warn!(target: LOG_TARGET, "Transfer failed, no gift recorded. {failure}");
                Ok(None)
            }
        }
    }

    /// Resolve a pasted link (absolute or relative to our origin) and look the gift up.
    pub fn lookup(&self, input: &str) -> Result<GiftLookup, S::Error> {
        match link::resolve(&self.origin, input) {
            Ok(id) => self.lookup_id(&id),
            Err(e) => Ok(GiftLookup::InvalidLink(e)),
        }
    }

    /// Look a gift up by id and classify it for the claim page.
    pub fn lookup_id(&self, id: &GiftId) -> Result<GiftLookup, S::Error> {
        let Some(record) = self.ledger.find(id)? else {
            settle!(GiftLookup::NotFound(id.clone()));
        };
        Ok(match record.status {
            GiftStatus::Pending => GiftLookup::Ready(record),
            GiftStatus::Claimed { .. } => GiftLookup::AlreadyClaimed(record),
            GiftStatus::Failed => GiftLookup::Unclaimable(record),
        })
    }

    /// Claim a gift on behalf of `claimer`.
    ///
    /// `None` means no wallet is connected. The claimer's address is not compared with
    /// the recipient address the sender entered.
    pub fn confirm_claim(
        &mut self,
        id: &GiftId,
        claimer: Option<&Account>,
    ) -> Result<ClaimOutcome, S::Error> {
        let Some(claimer) = claimer else {
            settle!(ClaimOutcome::NotConnected);
        };

        let record = match self.lookup_id(id)? {
            GiftLookup::Ready(record) => record,
            refused => settle!(Self::refusal(id, refused)),
        };
        ensure_or!(
            self.ledger.claim(id, &claimer.address)?,
            Self::refusal(id, self.lookup_id(id)?)
        );

        let claimed = self.ledger.find(id)?.unwrap_or(record);
        Ok(ClaimOutcome::Claimed(claimed))
    }

    fn refusal(id: &GiftId, lookup: GiftLookup) -> ClaimOutcome {
        match lookup {
            GiftLookup::AlreadyClaimed(record) => ClaimOutcome::AlreadyClaimed(record),
            GiftLookup::Unclaimable(record) | GiftLookup::Ready(record) => {
                ClaimOutcome::NotClaimable(record)
            }
            GiftLookup::NotFound(_) | GiftLookup::InvalidLink(_) => {
                ClaimOutcome::NotFound(id.clone())
            }
        }
    }
}
