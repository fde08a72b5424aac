//! Default link policy: validation, encoding for `href`, decoding for display.

use std::sync::LazyLock;

use memchr::memchr;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Characters left untouched when encoding a URL. `%` stays in the set so
/// stray percent signs are encoded; valid `%XX` escapes are copied verbatim.
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

static BAD_PROTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(vbscript|javascript|file|data):").unwrap());
static GOOD_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/(gif|png|jpeg|webp);").unwrap());

/// Reject script-capable protocols. `data:` is allowed for common images only.
pub fn validate_link(url: &str) -> bool {
    let s = url.trim().to_lowercase();
    if BAD_PROTO_RE.is_match(&s) {
        GOOD_DATA_RE.is_match(&s)
    } else {
        true
    }
}

/// Percent-encode a destination for use in an attribute.
pub fn normalize_link(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let next = memchr(b'%', &bytes[pos..]).map_or(bytes.len(), |i| pos + i);
        out.extend(utf8_percent_encode(&url[pos..next], LINK_ENCODE_SET));
        if next >= bytes.len() {
            break;
        }

        let valid_escape = bytes.len() > next + 2
            && bytes[next + 1].is_ascii_hexdigit()
            && bytes[next + 2].is_ascii_hexdigit();
        if valid_escape {
            out.push_str(&url[next..next + 3]);
            pos = next + 3;
        } else {
            out.push_str("%25");
            pos = next + 1;
        }
    }

    out
}

/// Decode percent escapes for display. Invalid UTF-8 leaves the input as-is.
pub fn normalize_link_text(url: &str) -> String {
    match percent_decode_str(url).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => url.to_string(),
    }
}
