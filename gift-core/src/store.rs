//! Storage for gift records.
//!
//! The ledger never talks to a database directly. It goes through [`GiftStore`], so the
//! same lifecycle rules apply whether the records live in memory (tests, demos) or in
//! the wallet's durable database.

use core::convert::Infallible;

use crate::types::{GiftId, GiftRecord};

/// A place to keep gift records.
///
/// Stores are append-only: there is no way to delete a record, and the only way to
/// change one is [`GiftStore::replace`], which the ledger uses for the single
/// `pending -> claimed` transition.
pub trait GiftStore {
    /// The error raised by the backend. Use [`Infallible`] when nothing can go wrong.
    type Error: core::fmt::Debug;

    /// Fetch the first record with the given id.
    fn get(&self, id: &GiftId) -> Result<Option<GiftRecord>, Self::Error>;

    /// Append a new record. The caller guarantees the id is not in use.
    fn insert(&mut self, record: GiftRecord) -> Result<(), Self::Error>;

    /// Swap `current` for `new` only if the stored record still equals `current`.
    ///
    /// Returns false, without writing anything, when the stored record has changed or
    /// disappeared in the meantime.
    fn replace(&mut self, current: &GiftRecord, new: GiftRecord) -> Result<bool, Self::Error>;

    /// Every record in the store, in no particular order.
    fn records(&self) -> Result<Vec<GiftRecord>, Self::Error>;

    /// Whether some record already uses this id.
    fn contains(&self, id: &GiftId) -> Result<bool, Self::Error> {
        Ok(self.get(id)?.is_some())
    }
}

/// A volatile store backed by a vector. Everything is lost when it is dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<GiftRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GiftStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, id: &GiftId) -> Result<Option<GiftRecord>, Self::Error> {
        Ok(self.records.iter().find(|r| &r.id == id).cloned())
    }

    fn insert(&mut self, record: GiftRecord) -> Result<(), Self::Error> {
        self.records.push(record);
        Ok(())
    }

    fn replace(&mut self, current: &GiftRecord, new: GiftRecord) -> Result<bool, Self::Error> {
        let Some(slot) = self.records.iter_mut().find(|r| r.id == current.id) else {
            return Ok(false);
        };
        if slot != current {
            return Ok(false);
        }
        *slot = new;
        Ok(true)
    }

    fn records(&self) -> Result<Vec<GiftRecord>, Self::Error> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GiftStatus;

    fn record(id: &str) -> GiftRecord {
        GiftRecord {
            id: id.into(),
            sender_address: "SENDER".into(),
            recipient_address: "ADDR1".into(),
            amount: "1".into(),
            status: GiftStatus::Pending,
            created_at: 1,
        }
    }

    #[test]
    fn replace_refuses_stale_current() {
        let mut store = MemoryStore::new();
        store.insert(record("a")).unwrap();

        let stale = GiftRecord {
            amount: "2".into(),
            ..record("a")
        };
        let claimed = GiftRecord {
            status: GiftStatus::Failed,
            ..record("a")
        };

        assert_eq!(store.replace(&stale, claimed.clone()), Ok(false));
        assert_eq!(store.get(&"a".into()), Ok(Some(record("a"))));
        assert_eq!(store.replace(&record("a"), claimed.clone()), Ok(true));
        assert_eq!(store.get(&"a".into()), Ok(Some(claimed)));
    }

    #[test]
    fn replace_of_missing_record_writes_nothing() {
        let mut store = MemoryStore::new();

        assert_eq!(store.replace(&record("a"), record("a")), Ok(false));
        assert!(store.is_empty());
    }

    #[test]
    fn contains_follows_get() {
        let mut store = MemoryStore::new();
        store.insert(record("a")).unwrap();

        assert_eq!(store.contains(&"a".into()), Ok(true));
        assert_eq!(store.contains(&"b".into()), Ok(false));
    }
}
