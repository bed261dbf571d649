//! Unit tests for the gift ledger

use super::*;
use crate::store::MemoryStore;
use std::cell::Cell;

thread_local! {
    static NOW: Cell<u64> = Cell::new(1_000);
}

/// A clock that only moves when told to.
fn test_clock() -> u64 {
    NOW.with(|now| now.get())
}

fn advance(millis: u64) {
    NOW.with(|now| now.set(now.get() + millis));
}

fn ledger() -> GiftLedger<MemoryStore> {
    GiftLedger::with_clock(MemoryStore::new(), test_clock)
}

#[test]
fn create_returns_pending_record() {
    let mut ledger = ledger();

    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();

    assert_eq!(gift.sender_address, "SENDER");
    assert_eq!(gift.recipient_address, "ADDR1");
    assert_eq!(gift.amount, "2.5");
    assert_eq!(gift.status, GiftStatus::Pending);
    assert_eq!(gift.created_at, test_clock());
    assert_eq!(gift.claimer_address(), None);
    assert_eq!(gift.claimed_at(), None);
}

#[test]
fn create_keeps_amount_verbatim() {
    let mut ledger = ledger();

    let gift = ledger.create("SENDER", "ADDR1", "007.50").unwrap();

    assert_eq!(gift.amount, "007.50");
}

#[test]
fn create_issues_fresh_ids() {
    let mut ledger = ledger();

    let ids: Vec<_> = (0..50)
        .map(|_| ledger.create("SENDER", "ADDR1", "1").unwrap().id)
        .collect();

    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
    assert_eq!(ledger.store().len(), 50);
}

#[test]
fn find_after_create_returns_same_record() {
    let mut ledger = ledger();

    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();

    assert_eq!(ledger.find(&gift.id), Ok(Some(gift)));
}

#[test]
fn find_unknown_is_none() {
    let ledger = ledger();

    assert_eq!(ledger.find(&"nonexistent".into()), Ok(None));
}

#[test]
fn claim_pending_gift_works() {
    let mut ledger = ledger();
    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();
    advance(500);

    assert_eq!(ledger.claim(&gift.id, "ADDR2"), Ok(true));

    let stored = ledger.find(&gift.id).unwrap().unwrap();
    assert_eq!(
        stored.status,
        GiftStatus::Claimed {
            claimer_address: "ADDR2".into(),
            claimed_at: test_clock(),
        }
    );
    assert_eq!(stored.created_at, gift.created_at);
    assert_eq!(stored.recipient_address, "ADDR1");
}

#[test]
fn second_claim_fails_and_keeps_first_stamp() {
    let mut ledger = ledger();
    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();
    ledger.claim(&gift.id, "ADDR2").unwrap();
    let after_first = ledger.find(&gift.id).unwrap().unwrap();
    advance(500);

    assert_eq!(ledger.claim(&gift.id, "ADDR3"), Ok(false));

    let after_second = ledger.find(&gift.id).unwrap().unwrap();
    assert_eq!(after_second, after_first);
    assert_eq!(after_second.claimer_address(), Some("ADDR2"));
}

#[test]
fn claim_unknown_gift_fails_without_mutation() {
    let mut ledger = ledger();
    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();

    assert_eq!(ledger.claim(&"nonexistent".into(), "ADDR2"), Ok(false));

    assert_eq!(ledger.gifts(), Ok(vec![gift]));
}

#[test]
fn claim_of_failed_gift_is_refused() {
    let mut store = MemoryStore::new();
    let failed = GiftRecord {
        id: "f".into(),
        sender_address: "SENDER".into(),
        recipient_address: "ADDR1".into(),
        amount: "1".into(),
        status: GiftStatus::Failed,
        created_at: 1,
    };
    store.insert(failed.clone()).unwrap();
    let mut ledger = GiftLedger::with_clock(store, test_clock);

    assert_eq!(ledger.claim(&failed.id, "ADDR2"), Ok(false));
    assert_eq!(ledger.find(&failed.id), Ok(Some(failed)));
}

#[test]
fn claim_does_not_require_matching_recipient() {
    let mut ledger = ledger();
    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();

    assert_eq!(ledger.claim(&gift.id, "SOMEONE-ELSE"), Ok(true));
}

#[test]
fn gifts_are_listed_oldest_first() {
    let mut ledger = ledger();
    let first = ledger.create("SENDER", "ADDR1", "1").unwrap();
    advance(10);
    let second = ledger.create("SENDER", "ADDR1", "2").unwrap();

    let listed: Vec<_> = ledger.gifts().unwrap().into_iter().map(|g| g.id).collect();

    assert_eq!(listed, vec![first.id, second.id]);
}
