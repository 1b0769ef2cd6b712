//! Line-protocol escaping
//!
//! Each reserved character gets exactly one backslash in front of it;
//! everything else is copied verbatim.

/// Reserved in measurement names
pub const MEASUREMENT: &[char] = &[',', ' '];

/// Reserved in tag keys, tag values and field keys
pub const KEY: &[char] = &[',', '=', ' '];

/// Reserved inside a double-quoted string field value
pub const STRING_VALUE: &[char] = &['"'];

/// Append `src` to `out`, backslash-escaping every char in `reserved`.
///
/// All reserved sets are ASCII, so every reserved match is one byte wide.
pub fn escape_into(out: &mut String, src: &str, reserved: &[char]) {
    let mut start = 0;
    while let Some(offset) = src[start..].find(reserved) {
        let pos = start + offset;
        out.push_str(&src[start..pos]);
        out.push('\\');
        out.push_str(&src[pos..pos + 1]);
        start = pos + 1;
    }
    out.push_str(&src[start..]);
}

/// Escape `src` into a fresh string
pub fn escape(src: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(src.len() + 4);
    escape_into(&mut out, src, reserved);
    out
}
