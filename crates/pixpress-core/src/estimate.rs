//! Transport encoding and compressed-size estimation.
//!
//! Encoded JPEG bytes are handed to the presentation layer as a base64 data
//! URL (`data:image/jpeg;base64,...`). The reported compressed size is
//! estimated from that text form rather than measured a second time:
//! `ceil(payload_len * 3 / 4)`. Because base64 pads to 4-character blocks the
//! estimate can exceed the true binary length by at most 2 bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// MIME type of every compressed output.
pub const OUTPUT_MIME: &str = "image/jpeg";

const DATA_URL_SCHEME: &str = "data:";

/// Wrap encoded bytes in a base64 data URL.
pub fn to_data_url(bytes: &[u8]) -> String {
    let payload = STANDARD.encode(bytes);
    let mut url = String::with_capacity(DATA_URL_SCHEME.len() + OUTPUT_MIME.len() + 8 + payload.len());
    url.push_str(DATA_URL_SCHEME);
    url.push_str(OUTPUT_MIME);
    url.push_str(";base64,");
    url.push_str(&payload);
    url
}

/// Return the base64 payload of a data URL, or the input itself when it has
/// no `data:` header.
pub fn transport_payload(encoded: &str) -> &str {
    let trimmed = encoded.trim();
    if trimmed.starts_with(DATA_URL_SCHEME) {
        trimmed
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    } else {
        trimmed
    }
}

/// Estimate the binary size behind a base64 payload or data URL.
///
/// Reverses base64's 4:3 expansion after stripping any `data:` header.
pub fn estimate_encoded_size(encoded: &str) -> usize {
    (transport_payload(encoded).len() * 3).div_ceil(4)
}
