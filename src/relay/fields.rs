//! Ordered protocol field set
//!
//! The chat-bot endpoint expects a fixed set of form fields in a fixed
//! order. Order matters because the request checksum is taken over a byte
//! window of the serialized body, so the set is an ordered list of
//! `(key, value)` pairs rather than a map.

use std::ops::RangeInclusive;

/// Slot holding the current question
pub const STIMULUS: &str = "stimulus";

/// Slot holding the anti-abuse checksum
pub const CHECKSUM: &str = "icognocheck";

/// Slot holding the upstream-assigned continuation token
pub const CONTINUATION: &str = "sessionid";

/// Numbered history slots, nearest first (`vText2` holds the newest line)
pub const HISTORY_SLOTS: RangeInclusive<usize> = 2..=8;

/// Protocol defaults, in wire order. Constant slots never change value.
const DEFAULT_FIELDS: [(&str, &str); 25] = [
    (STIMULUS, ""),
    ("cb_settings_language", ""),
    ("cb_settings_scripting", "no"),
    ("islearning", "1"),
    ("icognoid", "wsf"),
    (CHECKSUM, ""),
    ("start", "y"),
    (CONTINUATION, ""),
    ("vText8", ""),
    ("vText7", ""),
    ("vText6", ""),
    ("vText5", ""),
    ("vText4", ""),
    ("vText3", ""),
    ("vText2", ""),
    ("fno", "0"),
    ("prevref", ""),
    ("emotionaloutput", ""),
    ("emotionalhistory", ""),
    ("asbotname", ""),
    ("ttsvoice", ""),
    ("typing", ""),
    ("lineref", ""),
    ("sub", "Say"),
    ("cleanslate", "False"),
];

/// Name of history slot `n`
pub fn history_slot(n: usize) -> String {
    format!("vText{}", n)
}

/// Fixed, ordered mapping of protocol fields for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<(&'static str, String)>,
}

impl FieldSet {
    /// Value of `key`, if it is a protocol field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `key` in place, keeping its position
    ///
    /// Returns `false` (and changes nothing) when `key` is not part of the
    /// protocol; the field list never grows.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Fields in wire order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the set has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS
                .iter()
                .map(|(k, v)| (*k, (*v).to_string()))
                .collect(),
        }
    }
}
