//! Best-effort repair of client-supplied base64 image strings
//!
//! Browsers hand the relay whatever `FileReader.readAsDataURL` or a copy-paste
//! produced: data-URI prefixes, wrapped lines, dropped padding. The inference
//! endpoint wants bare, padded base64, so every recognized image field passes
//! through [`normalize`] before it is forwarded.

/// Number of characters kept at each end of an [`ImagePreview`]
pub const PREVIEW_CHARS: usize = 30;

const DATA_URI_SCHEME: &str = "data:";

/// Turn a possibly malformed base64 string into canonical padded base64
///
/// 1. A `data:` prefix is dropped up to and including the first `,`.
/// 2. All whitespace is removed.
/// 3. Padding is fixed by length modulo 4: a remainder of 2 gains `==`,
///    3 gains `=`, and 1 (no padding can fix it) loses its last character.
///
/// This is a heuristic, not a validator: the output is not guaranteed to
/// decode, and the remainder-1 truncation may discard real data.
pub fn normalize(input: &str) -> String {
    let body = strip_data_uri(input);
    let mut compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();

    match compact.len() % 4 {
        1 => {
            tracing::warn!(len = compact.len(), "base64 length is 1 mod 4, dropping last character");
            compact.pop();
        }
        2 => compact.push_str("=="),
        3 => compact.push('='),
        _ => {}
    }

    compact
}

fn strip_data_uri(input: &str) -> &str {
    if !input.starts_with(DATA_URI_SCHEME) {
        return input;
    }

    input.split_once(',').map_or(input, |(_, payload)| payload)
}

/// Length and both ends of an encoded image, for logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub len: usize,
    pub start: String,
    pub end: String,
}

impl ImagePreview {
    pub fn of(encoded: &str) -> Self {
        let len = encoded.chars().count();
        let start = encoded.chars().take(PREVIEW_CHARS).collect();
        let end = encoded.chars().skip(len.saturating_sub(PREVIEW_CHARS)).collect();

        Self { len, start, end }
    }
}
