//! This crate is the core of the gift wallet.
//!
//! It owns the gift lifecycle (create, find, claim) and the claim-link protocol that
//! turns a gift id into a shareable URL and back. Everything chain related is left to
//! the caller: the core only learns about a transfer through the statuses it is fed.

pub mod claim;
pub mod ledger;
pub mod link;
pub mod service;
pub mod store;
pub mod traits;
pub mod transfer;
pub mod types;

mod support_macros;

pub use ledger::GiftLedger;
pub use service::GiftService;
pub use store::{GiftStore, MemoryStore};
pub use types::{Account, GiftId, GiftRecord, GiftStatus};

/// Log target used by everything in this crate.
pub const LOG_TARGET: &str = "gift-core";
