//! Percent encoding for query strings
//!
//! ASCII alphanumerics and `-_.~` pass through, space becomes `+`, and every
//! other byte becomes `%XX` in uppercase hex.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Append the percent-encoded form of `src` to `out`
pub fn url_encode(out: &mut String, src: &str) {
    out.reserve(src.len());

    for &b in src.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else if b == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
}

/// Percent-encode `src` into a fresh string
pub fn encode(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    url_encode(&mut out, src);
    out
}
