//! Outcomes of the claimer workflow.
//!
//! Loading a link and confirming a claim each end in a tagged outcome. The UI decides
//! what to show from the variant and its [`Severity`], never from the message text.

use core::fmt;

use serde::Serialize;

use crate::{
    link::LinkError,
    types::{short_address, GiftId, GiftRecord},
};

/// How a message should be presented.
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Format a unix millisecond timestamp for people.
pub fn format_millis(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn claimed_by(record: &GiftRecord) -> String {
    match (record.claimer_address(), record.claimed_at()) {
        (Some(by), Some(at)) => format!("{} on {}", short_address(by), format_millis(at)),
        _ => "someone".to_owned(),
    }
}

/// What we found behind a claim link.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GiftLookup {
    /// The link itself is unusable.
    InvalidLink(LinkError),
    /// The link is fine but no gift has that id.
    NotFound(GiftId),
    /// A pending gift, ready to be claimed.
    Ready(GiftRecord),
    AlreadyClaimed(GiftRecord),
    /// Some other status. Nothing can be done with it.
    Unclaimable(GiftRecord),
}

impl GiftLookup {
    pub fn severity(&self) -> Severity {
        match self {
            GiftLookup::InvalidLink(_) | GiftLookup::NotFound(_) => Severity::Error,
            GiftLookup::Ready(_) | GiftLookup::AlreadyClaimed(_) => Severity::Success,
            GiftLookup::Unclaimable(_) => Severity::Info,
        }
    }

    /// The gift, when one was found.
    pub fn record(&self) -> Option<&GiftRecord> {
        match self {
            GiftLookup::Ready(r) | GiftLookup::AlreadyClaimed(r) | GiftLookup::Unclaimable(r) => {
                Some(r)
            }
            GiftLookup::InvalidLink(_) | GiftLookup::NotFound(_) => None,
        }
    }
}

impl fmt::Display for GiftLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiftLookup::InvalidLink(e) => write!(f, "Error: {e}"),
            GiftLookup::NotFound(_) => f.write_str("Error: Gift not found for the ID in the URL."),
            GiftLookup::Ready(_) => f.write_str("Gift loaded. Ready to confirm claim."),
            GiftLookup::AlreadyClaimed(r) => write!(f, "Gift already claimed by {}", claimed_by(r)),
            GiftLookup::Unclaimable(r) => write!(f, "Gift status: {}", r.status.name()),
        }
    }
}

/// The result of confirming a claim.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ClaimOutcome {
    /// The gift is now claimed. Holds the updated record.
    Claimed(GiftRecord),
    /// No account to claim with.
    NotConnected,
    NotFound(GiftId),
    AlreadyClaimed(GiftRecord),
    NotClaimable(GiftRecord),
}

impl ClaimOutcome {
    pub fn severity(&self) -> Severity {
        match self {
            ClaimOutcome::Claimed(_) => Severity::Success,
            _ => Severity::Error,
        }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed(_))
    }
}

impl fmt::Display for ClaimOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimOutcome::Claimed(_) => f.write_str("Claim confirmed successfully!"),
            ClaimOutcome::NotConnected => {
                f.write_str("Error: Please connect wallet to confirm claim.")
            }
            ClaimOutcome::NotFound(_) => {
                f.write_str("Error: Gift not found for the ID in the URL.")
            }
            ClaimOutcome::AlreadyClaimed(r) => {
                write!(f, "Error: Gift already claimed by {}.", claimed_by(r))
            }
            ClaimOutcome::NotClaimable(r) => write!(
                f,
                "Error: Gift cannot be claimed (status: {}).",
                r.status.name()
            ),
        }
    }
}
