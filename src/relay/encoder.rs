//! Request body encoder
//!
//! Builds the form body for one exchange. The checksum is defined over a
//! byte window of the body *before* the checksum field is filled in, so the
//! body is serialized twice: once to take the window, once for the wire.

use std::ops::Range;

use url::form_urlencoded;

use super::fields::{self, FieldSet, CHECKSUM, HISTORY_SLOTS};

/// Byte window of the first-pass body that feeds the checksum
pub const CHECKSUM_WINDOW: Range<usize> = 9..35;

/// Copy the newest history lines into the numbered slots
///
/// Walks `history` newest first, filling `vText2`, `vText3`, ... up to
/// `vText8`. Slots beyond the available history keep whatever they held.
pub fn apply_history(fields: &mut FieldSet, history: &[String]) {
    for (slot, line) in HISTORY_SLOTS.zip(history.iter().rev()) {
        fields.set(&fields::history_slot(slot), line.as_str());
    }
}

/// Serialize the fields in wire order as an `application/x-www-form-urlencoded` body
pub fn serialize(fields: &FieldSet) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter())
        .finish()
}

/// MD5 hex digest of [`CHECKSUM_WINDOW`] of a serialized body
///
/// A body shorter than the window is hashed up to its end.
pub fn checksum(serialized: &str) -> String {
    let bytes = serialized.as_bytes();
    let end = CHECKSUM_WINDOW.end.min(bytes.len());
    let start = CHECKSUM_WINDOW.start.min(end);
    format!("{:x}", md5::compute(&bytes[start..end]))
}

/// Produce the final request body for a session
///
/// Updates the history slots and the checksum field of `fields` in place.
pub fn encode(fields: &mut FieldSet, history: &[String]) -> String {
    apply_history(fields, history);
    let first_pass = serialize(fields);
    fields.set(CHECKSUM, checksum(&first_pass));
    serialize(fields)
}
