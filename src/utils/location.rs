//! `Location` header encoding for stored target URLs.
//!
//! Stored URLs are kept verbatim, so they may contain bytes a header value
//! cannot carry. Those bytes are percent-encoded. Existing `%XX` escapes and
//! URL delimiters are left as they are.

/// Percent-encodes every byte of `url` that is not allowed in a redirect
/// target.
///
/// Controls, space, DEL, non-ASCII bytes and the characters `"<>{}` and the
/// backtick are encoded. A `%` is kept only when it starts a valid escape.
///
/// # Examples
///
/// ```
/// use linkpulse::utils::location::encode_location;
///
/// assert_eq!(encode_location("https://example.com/a b"), "https://example.com/a%20b");
/// assert_eq!(encode_location("https://example.com/%41"), "https://example.com/%41");
/// ```
pub fn encode_location(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(bytes.len());

    for (i, &b) in bytes.iter().enumerate() {
        let keep = match b {
            b'%' => is_escape(&bytes[i + 1..]),
            _ => is_location_safe(b),
        };

        if keep {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }

    out
}

fn is_location_safe(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'..=b';' | b'=' | b'?'..=b'_' | b'a'..=b'z' | b'|' | b'~'
    )
}

fn is_escape(rest: &[u8]) -> bool {
    rest.len() >= 2 && rest[0].is_ascii_hexdigit() && rest[1].is_ascii_hexdigit()
}
