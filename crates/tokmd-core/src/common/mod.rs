//! Character classification, escaping and string helpers shared by rules.

pub mod html;
pub mod link;
pub mod linkify;
pub mod url;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static UNICODE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{P}\p{S}]$").unwrap());

static UNESCAPE_ALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"\\([!"#$%&'()*+,\-./:;<=>?@\[\\\]^_`{|}~])|&([A-Za-z#][A-Za-z0-9]{1,31});"##).unwrap()
});

static DIGITAL_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#(x[a-f0-9]{1,8}|[0-9]{1,8})$").unwrap());

/// Space or tab.
#[inline]
pub fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Whitespace as understood by the flanking rules.
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0b}' | '\u{0c}' | '\r' | ' ' | '\u{a0}' | '\u{1680}' | '\u{2000}'
            ..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}'
    )
}

/// ASCII punctuation that Markdown can backslash-escape.
#[inline]
pub fn is_md_ascii_punct(c: char) -> bool {
    c.is_ascii_punctuation()
}

/// Unicode punctuation or symbol (general categories P and S).
pub fn is_punct_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }
    let mut buf = [0u8; 4];
    UNICODE_PUNCT_RE.is_match(c.encode_utf8(&mut buf))
}

/// Punctuation test used by delimiter and quote scanning.
#[inline]
pub fn is_punctuation(c: char) -> bool {
    is_md_ascii_punct(c) || is_punct_char(c)
}

/// Whether a numeric character reference may be emitted as-is.
pub fn is_valid_entity_code(code: u32) -> bool {
    if (0xd800..=0xdfff).contains(&code) {
        return false;
    }
    if (0xfdd0..=0xfdef).contains(&code) {
        return false;
    }
    if (code & 0xffff) == 0xffff || (code & 0xffff) == 0xfffe {
        return false;
    }
    if code <= 0x08 || code == 0x0b || (0x0e..=0x1f).contains(&code) {
        return false;
    }
    if (0x7f..=0x9f).contains(&code) {
        return false;
    }
    code <= 0x10ffff
}

/// Decode a named HTML entity such as `amp` or `copy`.
pub fn decode_named_entity(name: &str) -> Option<String> {
    let raw = format!("&{};", name);
    let decoded = html_escape::decode_html_entities(&raw);
    if decoded == raw.as_str() {
        None
    } else {
        Some(decoded.into_owned())
    }
}

/// Decode a numeric reference body (`x41`, `65`) into a char.
pub fn decode_numeric_entity(body: &str) -> Option<char> {
    let code = if let Some(hex) = body.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<u32>().ok()?
    };
    if is_valid_entity_code(code) {
        char::from_u32(code)
    } else {
        None
    }
}

/// Resolve backslash escapes and entity references.
pub fn unescape_all(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '&']) {
        return Cow::Borrowed(s);
    }
    UNESCAPE_ALL_RE.replace_all(s, |caps: &Captures<'_>| {
        if let Some(escaped) = caps.get(1) {
            return escaped.as_str().to_string();
        }
        let whole = &caps[0];
        let name = &caps[2];
        if DIGITAL_ENTITY_RE.is_match(name) {
            return match decode_numeric_entity(&name[1..]) {
                Some(c) => c.to_string(),
                None => whole.to_string(),
            };
        }
        decode_named_entity(name).unwrap_or_else(|| whole.to_string())
    })
}

/// Escape text for HTML output.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Normalize a link label for reference lookup: collapse whitespace, fold case.
pub fn normalize_reference(label: &str) -> String {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase().to_uppercase()
}

/// Byte length of the char starting at `pos`, or 1 past the end.
#[inline]
pub(crate) fn char_len_at(s: &str, pos: usize) -> usize {
    s.get(pos..)
        .and_then(|rest| rest.chars().next())
        .map_or(1, char::len_utf8)
}
