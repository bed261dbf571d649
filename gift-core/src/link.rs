//! The claim-link codec.
//!
//! A claim link is `{origin}/claim?giftId={id}`. Encoding is pure string building;
//! decoding goes through a real URL parser so anything a browser would accept as a
//! link decodes the same way here.

use std::borrow::Cow;

use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::types::GiftId;

/// Path of the claim page.
pub const CLAIM_PATH: &str = "/claim";

/// Query parameter carrying the gift id.
pub const GIFT_ID_PARAM: &str = "giftId";

/// Why a pasted link could not be turned into a gift id.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LinkError {
    #[error("URL input is empty.")]
    Empty,
    #[error("Invalid URL format. Please paste the full gift link.")]
    Malformed,
    #[error("The provided URL does not contain a valid giftId parameter.")]
    MissingGiftId,
}

/// Build the shareable claim link for a gift.
///
/// The id is form-urlencoded, which leaves generated ids untouched and keeps odd ids
/// decodable.
pub fn encode(origin: &str, id: &GiftId) -> String {
    let id: String = form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect();
    format!("{origin}{CLAIM_PATH}?{GIFT_ID_PARAM}={id}")
}

/// Extract the gift id from an absolute URL.
///
/// None when the input is not a URL or carries no (or an empty) `giftId`.
pub fn decode(input: &str) -> Option<GiftId> {
    let url = Url::parse(input).ok()?;
    gift_id_param(&url)
}

/// Extract the gift id from whatever the user pasted.
///
/// Input that does not start with `http` is treated as relative to `origin`, so both
/// `/claim?giftId=..` and full links work.
pub fn resolve(origin: &str, input: &str) -> Result<GiftId, LinkError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LinkError::Empty);
    }

    let absolute = if input.starts_with("http") {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{origin}{input}"))
    };
    let url = Url::parse(&absolute).map_err(|_| LinkError::Malformed)?;

    gift_id_param(&url).ok_or(LinkError::MissingGiftId)
}

fn gift_id_param(url: &Url) -> Option<GiftId> {
    url.query_pairs()
        .find(|(key, _)| key.as_ref() == GIFT_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(GiftId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_link_format() {
        assert_eq!(
            encode("https://app.test", &"abc-123".into()),
            "https://app.test/claim?giftId=abc-123"
        );
    }

    #[test]
    fn decode_reverses_encode() {
        let id: GiftId = "abc-123".into();
        assert_eq!(decode(&encode("https://example.test", &id)), Some(id));
    }

    #[test]
    fn decode_reverses_encode_for_awkward_ids() {
        for raw in ["a b", "x&giftId=y", "100%", "#frag", "ünï"] {
            let id: GiftId = raw.into();
            assert_eq!(decode(&encode("https://example.test", &id)), Some(id));
        }
    }

    #[test]
    fn decode_rejects_non_urls() {
        assert_eq!(decode("not a url"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode("/claim?giftId=abc"), None);
    }

    #[test]
    fn decode_requires_gift_id() {
        assert_eq!(decode("https://example.test/claim"), None);
        assert_eq!(decode("https://example.test/claim?other=1"), None);
        assert_eq!(decode("https://example.test/claim?giftId="), None);
    }

    #[test]
    fn decode_takes_first_gift_id() {
        assert_eq!(
            decode("https://example.test/claim?giftId=one&giftId=two"),
            Some("one".into())
        );
    }

    #[test]
    fn resolve_distinguishes_failures() {
        let origin = "http://localhost:3000";

        assert_eq!(resolve(origin, "   "), Err(LinkError::Empty));
        assert_eq!(resolve(origin, "not a url"), Err(LinkError::Malformed));
        assert_eq!(resolve(origin, "http://"), Err(LinkError::Malformed));
        assert_eq!(
            resolve(origin, "https://example.test/claim"),
            Err(LinkError::MissingGiftId)
        );
    }

    #[test]
    fn resolve_accepts_relative_links() {
        assert_eq!(
            resolve("http://localhost:3000", "/claim?giftId=abc-123"),
            Ok("abc-123".into())
        );
    }

    #[test]
    fn resolve_accepts_absolute_links() {
        assert_eq!(
            resolve("http://localhost:3000", " https://app.test/claim?giftId=abc-123 "),
            Ok("abc-123".into())
        );
    }
}
