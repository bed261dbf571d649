//! The gift ledger: create, find and claim gift records.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    store::GiftStore,
    types::{GiftId, GiftRecord, GiftStatus},
    LOG_TARGET,
};

#[cfg(test)]
mod tests;

/// Current unix time in milliseconds.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Owns a [`GiftStore`] and enforces the gift lifecycle on top of it.
///
/// Every operation runs to completion before returning. Callers that share a ledger
/// between tasks wrap it in a mutex and hold the lock for one operation at a time.
pub struct GiftLedger<S> {
    store: S,
    clock: fn() -> u64,
}

impl<S: GiftStore> GiftLedger<S> {
    /// A ledger stamping records with the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, unix_millis)
    }

    /// A ledger with a custom clock. Mostly useful in tests.
    pub fn with_clock(store: S, clock: fn() -> u64) -> Self {
        GiftLedger { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a new pending gift and return it, fresh id included.
    ///
    /// The inputs are stored as given. Checking the recipient address and the amount
    /// is the job of whoever collected them.
    pub fn create(
        &mut self,
        sender_address: &str,
        recipient_address: &str,
        amount: &str,
    ) -> Result<GiftRecord, S::Error> {
        let mut id = GiftId::generate();
        while self.store.contains(&id)? {
            log::warn!(target: LOG_TARGET, "Generated gift id {id} is already taken. Retrying.");
            id = GiftId::generate();
        }

        let record = GiftRecord {
            id,
            sender_address: sender_address.to_owned(),
            recipient_address: recipient_address.to_owned(),
            amount: amount.to_owned(),
            status: GiftStatus::Pending,
            created_at: (self.clock)(),
        };
        self.store.insert(record.clone())?;

        log::info!(
            target: LOG_TARGET,
            "Created gift {} of {} for {}",
            record.id,
            record.amount,
            record.recipient_address
        );
        Ok(record)
    }

    /// Look a gift up by id.
    pub fn find(&self, id: &GiftId) -> Result<Option<GiftRecord>, S::Error> {
        self.store.get(id)
    }

    /// Mark a pending gift as claimed by `claimer_address`.
    ///
    /// Returns false and changes nothing when the gift does not exist or is no longer
    /// pending. The claimer is deliberately not compared to the recipient address
    /// recorded at creation: holding the link is what authorizes the claim.
    pub fn claim(&mut self, id: &GiftId, claimer_address: &str) -> Result<bool, S::Error> {
        let Some(current) = self.store.get(id)? else {
            log::debug!(target: LOG_TARGET, "Claim of unknown gift {id}");
            return Ok(false);
        };
        if !current.is_pending() {
            log::debug!(
                target: LOG_TARGET,
                "Claim of gift {id} refused. Status is {}",
                current.status.name()
            );
            return Ok(false);
        }

        let claimed = GiftRecord {
            status: GiftStatus::Claimed {
                claimer_address: claimer_address.to_owned(),
                claimed_at: (self.clock)(),
            },
            ..current.clone()
        };
        let swapped = self.store.replace(&current, claimed)?;
        if swapped {
            log::info!(target: LOG_TARGET, "Marked gift {id} as claimed by {claimer_address}");
        } else {
            log::warn!(
                target: LOG_TARGET,
                "Gift {id} changed underneath the claim. Nothing written."
            );
        }
        Ok(swapped)
    }

    /// All gifts, oldest first. Gifts stamped with the same time keep the store's order.
    pub fn gifts(&self) -> Result<Vec<GiftRecord>, S::Error> {
        let mut records = self.store.records()?;
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}
