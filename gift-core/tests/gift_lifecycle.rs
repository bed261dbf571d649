use gift_core::{
    link::{self, LinkError},
    GiftId, GiftLedger, GiftStatus, MemoryStore,
};

#[test]
fn created_gift_is_pending_and_findable() {
    let mut ledger = GiftLedger::new(MemoryStore::new());

    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();

    assert_eq!(gift.status, GiftStatus::Pending);
    assert_eq!(gift.claimer_address(), None);
    assert_eq!(gift.claimed_at(), None);
    assert_eq!(ledger.find(&gift.id), Ok(Some(gift)));
}

#[test]
fn gift_is_claimed_exactly_once() {
    let mut ledger = GiftLedger::new(MemoryStore::new());
    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();

    assert_eq!(ledger.claim(&gift.id, "ADDR2"), Ok(true));
    let first = ledger.find(&gift.id).unwrap().unwrap();
    assert_eq!(ledger.claim(&gift.id, "ADDR3"), Ok(false));
    let second = ledger.find(&gift.id).unwrap().unwrap();

    assert_eq!(first.claimer_address(), Some("ADDR2"));
    assert_eq!(second, first);
}

#[test]
fn unknown_gift_cannot_be_claimed() {
    let mut ledger = GiftLedger::new(MemoryStore::new());

    assert_eq!(ledger.claim(&GiftId::from("nonexistent"), "ADDR2"), Ok(false));
    assert_eq!(ledger.gifts(), Ok(vec![]));
}

#[test]
fn claim_link_codec() {
    let url = link::encode("https://example.test", &"abc-123".into());

    assert_eq!(link::decode(&url), Some("abc-123".into()));
    assert_eq!(link::decode("not a url"), None);
    assert_eq!(link::decode("https://example.test/claim"), None);
    assert_eq!(
        link::resolve("https://example.test", "https://example.test/claim"),
        Err(LinkError::MissingGiftId)
    );
}

#[test]
fn send_share_and_claim() {
    let mut ledger = GiftLedger::new(MemoryStore::new());

    let gift = ledger.create("SENDER", "ADDR1", "2.5").unwrap();
    let url = link::encode("https://app.test", &gift.id);
    assert_eq!(url, format!("https://app.test/claim?giftId={}", gift.id));

    let id = link::decode(&url).expect("link carries the id");
    assert_eq!(id, gift.id);

    assert_eq!(ledger.claim(&id, "ADDR2"), Ok(true));
    let claimed = ledger.find(&id).unwrap().unwrap();
    assert!(matches!(
        claimed.status,
        GiftStatus::Claimed { ref claimer_address, .. } if claimer_address == "ADDR2"
    ));
}
