//! The common types that are shared by the ledger, the claim-link codec and the
//! workflows built on top of them.

use core::fmt;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// An opaque gift identifier.
///
/// Freshly generated ids are UUID v4 strings, but ids read back from a claim link are
/// taken as-is, so nothing here assumes a particular shape.
#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone,
)]
#[serde(transparent)]
pub struct GiftId(String);

impl GiftId {
    /// Generate a new random id.
    pub fn generate() -> Self {
        GiftId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GiftId {
    fn from(s: String) -> Self {
        GiftId(s)
    }
}

impl From<&str> for GiftId {
    fn from(s: &str) -> Self {
        GiftId(s.to_owned())
    }
}

impl AsRef<str> for GiftId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a gift is in its lifecycle.
///
/// The only transition the ledger ever performs is `Pending -> Claimed`. The claim
/// stamp lives inside the `Claimed` variant so a pending gift cannot carry one.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GiftStatus {
    /// Created after a finalized transfer and waiting for its recipient.
    Pending,
    /// Claimed exactly once.
    Claimed {
        #[serde(rename = "claimerAddress")]
        claimer_address: String,
        /// Unix time in milliseconds.
        #[serde(rename = "claimedAt")]
        claimed_at: u64,
    },
    /// Reserved. Nothing in the ledger produces it yet.
    Failed,
}

impl GiftStatus {
    /// The lowercase name used on the wire and in messages.
    pub fn name(&self) -> &'static str {
        match self {
            GiftStatus::Pending => "pending",
            GiftStatus::Claimed { .. } => "claimed",
            GiftStatus::Failed => "failed",
        }
    }
}

/// A single gift as the ledger stores it.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GiftRecord {
    pub id: GiftId,
    /// Address of the account that paid for the gift.
    pub sender_address: String,
    /// The address the sender typed in. The claimer is not checked against it.
    pub recipient_address: String,
    /// Decimal amount exactly as it was entered.
    pub amount: String,
    #[serde(flatten)]
    pub status: GiftStatus,
    /// Unix time in milliseconds.
    pub created_at: u64,
}

impl GiftRecord {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, GiftStatus::Pending)
    }

    pub fn claimer_address(&self) -> Option<&str> {
        match &self.status {
            GiftStatus::Claimed { claimer_address, .. } => Some(claimer_address),
            _ => None,
        }
    }

    pub fn claimed_at(&self) -> Option<u64> {
        match self.status {
            GiftStatus::Claimed { claimed_at, .. } => Some(claimed_at),
            _ => None,
        }
    }
}

/// An account handed to us by the wallet layer.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct Account {
    pub address: String,
    /// Human readable label.
    pub name: String,
    /// The signer that owns this account, e.g. the name of a browser extension.
    pub source: String,
}

/// Shorten an address for display: the first six and last four characters.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_owned();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
