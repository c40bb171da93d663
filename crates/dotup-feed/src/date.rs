//! Release-date codec for the feed's `YYYY-M-D` strings.
//!
//! The feed does not zero-pad months or days. Parsing is locale-invariant and
//! never fails: unrecognized input maps to the [`UNDEFINED`] sentinel, which
//! resolution later rejects explicitly.

use chrono::NaiveDate;
use serde::de::{Deserialize, Deserializer};

/// Sentinel for an unparseable or missing date.
pub const UNDEFINED: NaiveDate = NaiveDate::MIN;

/// Parse a feed date; unparseable input yields [`UNDEFINED`].
pub fn parse(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").unwrap_or(UNDEFINED)
}

/// True for the sentinel values no real release can carry.
pub fn is_undefined(date: NaiveDate) -> bool {
    date == NaiveDate::MIN || date == NaiveDate::MAX
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(parse(&s))
}
