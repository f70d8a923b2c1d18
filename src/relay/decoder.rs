//! Response decoder
//!
//! The chat-bot answers with flat text: records separated by six carriage
//! returns, fields within a record separated by one. The body is served as a
//! single-byte charset but actually carries UTF-8, so the answer has to be
//! re-read as UTF-8 after the Latin-1 decode.

use crate::error::{ApiaryError, Result};

/// Separator between records
pub const RECORD_SEPARATOR: &str = "\r\r\r\r\r\r";

/// Separator between fields of a record
pub const FIELD_SEPARATOR: char = '\r';

/// Marker in the continuation position meaning the caller was flagged as a bot
pub const DENIAL_MARKER: &str = "DENIED";

/// Structured reply of one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReply {
    /// Bot answer, UTF-8 restored
    pub answer: String,
    /// Opaque token correlating later requests
    pub continuation_token: String,
    /// Last field of the second record, when present (diagnostic only)
    pub trailing: Option<String>,
}

/// Decode raw bytes as Latin-1: every byte becomes the code point of the same value
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Undo a Latin-1 decode of UTF-8 bytes
///
/// # Errors
///
/// Returns [`ApiaryError::MalformedResponse`] if the text holds code points
/// above U+00FF or the recovered bytes are not UTF-8.
pub fn reinterpret_utf8(text: &str) -> Result<String> {
    let bytes = text
        .chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                ApiaryError::MalformedResponse(format!(
                    "character {:?} is outside the Latin-1 range",
                    c
                ))
            })
        })
        .collect::<std::result::Result<Vec<u8>, ApiaryError>>()?;

    String::from_utf8(bytes).map_err(|e| {
        ApiaryError::MalformedResponse(format!("answer is not valid UTF-8: {}", e)).into()
    })
}

/// Parse one response body
///
/// # Errors
///
/// - [`ApiaryError::RemoteDenied`] if the first record's second field is the
///   denial marker.
/// - [`ApiaryError::MalformedResponse`] if there is no terminated record, the
///   first record has fewer than two fields, or the answer cannot be
///   restored to UTF-8.
pub fn decode(text: &str) -> Result<DecodedReply> {
    let mut records: Vec<&str> = text.split(RECORD_SEPARATOR).collect();
    // Whatever follows the last separator is not a complete record
    records.pop();

    let first = records.first().ok_or_else(|| {
        ApiaryError::MalformedResponse("response contains no complete record".to_string())
    })?;

    let fields: Vec<&str> = first.split(FIELD_SEPARATOR).collect();
    if fields.len() < 2 {
        return Err(ApiaryError::MalformedResponse(format!(
            "first record has {} field(s), expected at least 2",
            fields.len()
        ))
        .into());
    }

    if fields[1] == DENIAL_MARKER {
        return Err(ApiaryError::RemoteDenied.into());
    }

    let trailing = records
        .get(1)
        .and_then(|record| record.split(FIELD_SEPARATOR).last())
        .map(str::to_string);

    Ok(DecodedReply {
        answer: reinterpret_utf8(fields[0])?,
        continuation_token: fields[1].to_string(),
        trailing,
    })
}
