//! Link label, destination and title scanners.
//!
//! Destination and title scanners work on any string. Reference definitions
//! feed them text one line at a time; an unterminated title can be resumed
//! once the next line is appended.

use crate::common::{char_len_at, unescape_all};
use crate::inline::InlineState;

/// A successfully scanned link component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPart {
    /// Byte offset just past the component.
    pub pos: usize,
    /// Newlines crossed while scanning.
    pub lines: usize,
    /// Unescaped value.
    pub value: String,
}

/// Find the `]` closing the label whose `[` sits at `start`.
///
/// Nested constructs are skipped with the inline chain in silent mode, so a
/// `]` inside a code span does not close the label. With `disable_nested`,
/// a nested `[` that is not itself a complete label aborts the scan.
pub fn parse_link_label(
    state: &mut InlineState<'_>,
    start: usize,
    disable_nested: bool,
) -> Option<usize> {
    let max = state.pos_max;
    let old_pos = state.pos;
    let md = state.md;
    let mut level = 1;
    let mut found = false;

    state.pos = start + 1;
    while state.pos < max {
        let marker = state.byte(state.pos);
        if marker == b']' {
            level -= 1;
            if level == 0 {
                found = true;
                break;
            }
        }

        let prev_pos = state.pos;
        md.inline.skip_token(state);
        if marker == b'[' {
            if prev_pos == state.pos - 1 {
                level += 1;
            } else if disable_nested {
                state.pos = old_pos;
                return None;
            }
        }
    }

    let label_end = found.then_some(state.pos);
    state.pos = old_pos;
    label_end
}

/// Scan a link destination, `<bracketed>` or bare with balanced parentheses.
pub fn parse_link_destination(s: &str, start: usize, max: usize) -> Option<LinkPart> {
    let bytes = s.as_bytes();
    let mut pos = start;

    if bytes.get(pos) == Some(&b'<') {
        pos += 1;
        while pos < max {
            match bytes[pos] {
                b'\n' | b'<' => return None,
                b'>' => {
                    return Some(LinkPart {
                        pos: pos + 1,
                        lines: 0,
                        value: unescape_all(&s[start + 1..pos]).into_owned(),
                    });
                }
                b'\\' if pos + 1 < max => pos += 1 + char_len_at(s, pos + 1),
                _ => pos += 1,
            }
        }
        return None;
    }

    let mut level = 0u32;
    while pos < max {
        let code = bytes[pos];
        if code == b' ' || code < 0x20 || code == 0x7f {
            break;
        }
        if code == b'\\' && pos + 1 < max {
            if bytes[pos + 1] == b' ' {
                break;
            }
            pos += 1 + char_len_at(s, pos + 1);
            continue;
        }
        if code == b'(' {
            level += 1;
            if level > 32 {
                return None;
            }
        }
        if code == b')' {
            if level == 0 {
                break;
            }
            level -= 1;
        }
        pos += 1;
    }

    if start == pos || level != 0 {
        return None;
    }
    let pos = pos.min(max);

    Some(LinkPart {
        pos,
        lines: 0,
        value: unescape_all(&s[start..pos]).into_owned(),
    })
}

/// Scan a link title in `"..."`, `'...'` or `(...)`, possibly spanning lines.
pub fn parse_link_title(s: &str, start: usize, max: usize) -> Option<LinkPart> {
    match scan_link_title(s, start, start + 1, max) {
        TitleScan::Done(part) => Some(part),
        TitleScan::Open(_) | TitleScan::Invalid => None,
    }
}

/// Outcome of [`scan_link_title`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TitleScan {
    /// The closing marker was found.
    Done(LinkPart),
    /// Input ran out first; scanning may resume at this offset once more
    /// text is appended.
    Open(usize),
    /// Not a title.
    Invalid,
}

/// Scan the title opened at `start`, continuing from `resume`.
pub(crate) fn scan_link_title(s: &str, start: usize, resume: usize, max: usize) -> TitleScan {
    let bytes = s.as_bytes();
    if start >= max {
        return TitleScan::Invalid;
    }
    let marker = match bytes[start] {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return TitleScan::Invalid,
    };

    let mut pos = resume.max(start + 1);
    while pos < max {
        let code = bytes[pos];
        if code == marker {
            let value = &s[start + 1..pos];
            return TitleScan::Done(LinkPart {
                pos: pos + 1,
                lines: memchr::memchr_iter(b'\n', value.as_bytes()).count(),
                value: unescape_all(value).into_owned(),
            });
        } else if code == b'(' && marker == b')' {
            return TitleScan::Invalid;
        } else if code == b'\\' && pos + 1 < max {
            pos += char_len_at(s, pos + 1);
        }
        pos += 1;
    }

    TitleScan::Open(pos)
}
