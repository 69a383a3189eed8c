//! Matching of queued job payloads against an advertisement id.
//!
//! Payloads are JSON text; the storage layer pre-filters rows with
//! [`PAYLOAD_LIKE_PATTERN`] and this module confirms each candidate.

use lazy_static::lazy_static;
use regex::Regex;

/// `LIKE` pattern selecting payloads that may reference an advertisement.
pub const PAYLOAD_LIKE_PATTERN: &str = "%advertisement_id%";

lazy_static! {
    static ref ADVERTISEMENT_ID: Regex =
        Regex::new(r#""advertisement_id"\s*:\s*"?(\d+)"?"#).unwrap();
}

/// True when the payload names `advertisement_id` as a whole number.
pub fn payload_references_advertisement(payload: &str, advertisement_id: i64) -> bool {
    ADVERTISEMENT_ID
        .captures_iter(payload)
        .any(|caps| caps[1].parse::<i64>().ok() == Some(advertisement_id))
}
