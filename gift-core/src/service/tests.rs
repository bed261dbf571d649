//! Unit tests for the gift service workflows

use super::*;
use crate::{
    claim::Severity,
    link::LinkError,
    store::MemoryStore,
    transfer::{TransferFailure, TransferStatus, TransferTracker},
};

fn service() -> GiftService<MemoryStore> {
    GiftService::new(GiftLedger::new(MemoryStore::new()), "https://app.test")
}

fn request() -> GiftRequest {
    GiftRequest {
        sender_address: "SENDER".into(),
        recipient_address: "ADDR1".into(),
        amount: "2.5".into(),
    }
}

fn account(address: &str) -> Account {
    Account {
        address: address.into(),
        name: "claimer".into(),
        source: "polkadot-js".into(),
    }
}

#[test]
fn origin_trailing_slash_is_dropped() {
    let service = GiftService::new(GiftLedger::new(MemoryStore::new()), "https://app.test//");

    assert_eq!(service.origin(), "https://app.test");
    assert_eq!(
        service.claim_link(&"abc".into()),
        "https://app.test/claim?giftId=abc"
    );
}

#[test]
fn finalized_transfer_records_gift_and_link() {
    let mut service = service();
    let outcome = TransferOutcome::Finalized {
        block: "0xb1".into(),
    };

    let sent = service.record_transfer(&request(), &outcome).unwrap().unwrap();

    assert_eq!(
        sent.claim_link,
        format!("https://app.test/claim?giftId={}", sent.gift.id)
    );
    assert_eq!(service.ledger().find(&sent.gift.id), Ok(Some(sent.gift)));
}

#[test]
fn failed_transfer_records_nothing() {
    let mut service = service();

    for failure in [
        TransferFailure::Dispatch("balances.InsufficientBalance".into()),
        TransferFailure::Rejected("Dropped"),
        TransferFailure::StreamClosed,
    ] {
        let outcome = TransferOutcome::Failed(failure);
        assert_eq!(service.record_transfer(&request(), &outcome), Ok(None));
    }

    assert_eq!(service.ledger().gifts(), Ok(vec![]));
}

#[test]
fn tracked_transfer_records_gift_once() {
    let mut service = service();
    let mut tracker = TransferTracker::new();
    let statuses = [
        TransferStatus::Ready,
        TransferStatus::InBlock {
            block: "0xb1".into(),
            dispatch_error: None,
        },
        TransferStatus::Finalized {
            block: "0xb1".into(),
            dispatch_error: None,
        },
        TransferStatus::Finalized {
            block: "0xb1".into(),
            dispatch_error: None,
        },
    ];

    for status in statuses {
        if let Some(outcome) = tracker.observe(status) {
            service.record_transfer(&request(), &outcome).unwrap();
        }
    }

    assert_eq!(service.ledger().gifts().unwrap().len(), 1);
}

#[test]
fn lookup_reports_link_problems() {
    let service = service();

    assert_eq!(
        service.lookup(""),
        Ok(GiftLookup::InvalidLink(LinkError::Empty))
    );
    assert_eq!(
        service.lookup("https://app.test/claim"),
        Ok(GiftLookup::InvalidLink(LinkError::MissingGiftId))
    );
    assert_eq!(
        service.lookup("https://app.test/claim?giftId=missing"),
        Ok(GiftLookup::NotFound("missing".into()))
    );
}

#[test]
fn lookup_resolves_relative_links() {
    let mut service = service();
    let sent = service.create_gift(&request()).unwrap();

    let lookup = service
        .lookup(&format!("/claim?giftId={}", sent.gift.id))
        .unwrap();

    assert_eq!(lookup, GiftLookup::Ready(sent.gift));
    assert_eq!(lookup.severity(), Severity::Success);
}

#[test]
fn claim_requires_connected_account() {
    let mut service = service();
    let sent = service.create_gift(&request()).unwrap();

    assert_eq!(
        service.confirm_claim(&sent.gift.id, None),
        Ok(ClaimOutcome::NotConnected)
    );
    assert_eq!(service.ledger().find(&sent.gift.id), Ok(Some(sent.gift)));
}

#[test]
fn claim_distinguishes_missing_and_claimed() {
    let mut service = service();
    let sent = service.create_gift(&request()).unwrap();

    assert_eq!(
        service.confirm_claim(&"nope".into(), Some(&account("ADDR2"))),
        Ok(ClaimOutcome::NotFound("nope".into()))
    );

    let first = service
        .confirm_claim(&sent.gift.id, Some(&account("ADDR2")))
        .unwrap();
    let ClaimOutcome::Claimed(claimed) = first else {
        panic!("first claim should succeed, got {first:?}");
    };

    assert_eq!(
        service.confirm_claim(&sent.gift.id, Some(&account("ADDR3"))),
        Ok(ClaimOutcome::AlreadyClaimed(claimed.clone()))
    );
    assert_eq!(
        service.lookup_id(&sent.gift.id),
        Ok(GiftLookup::AlreadyClaimed(claimed))
    );
}

#[test]
fn full_scenario() {
    let mut service = service();

    let gift = service.ledger_mut().create("SENDER", "ADDR1", "2.5").unwrap();
    let url = service.claim_link(&gift.id);
    assert_eq!(url, format!("https://app.test/claim?giftId={}", gift.id));

    let id = link::decode(&url).unwrap();
    assert_eq!(id, gift.id);

    let outcome = service.confirm_claim(&id, Some(&account("ADDR2"))).unwrap();
    assert!(outcome.is_claimed());

    let stored = service.ledger().find(&id).unwrap().unwrap();
    assert_eq!(stored.status.name(), "claimed");
    assert_eq!(stored.claimer_address(), Some("ADDR2"));
    assert_eq!(stored.recipient_address, "ADDR1");
}
