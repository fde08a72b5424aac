//! Inline linkify: recognise `scheme://` links as they are typed.
//!
//! Fires on the `:` of `://`, taking the scheme back from pending text.
//! Catching links here (rather than only in the core pass) keeps emphasis
//! markers inside URLs from being paired.

use crate::common::linkify::match_at_start;
use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

/// Schemes the inline rule links, longest first.
const SCHEMES: [&str; 3] = ["https", "http", "ftp"];

/// Length of the scheme name ending `pending`, if it is a linkable one.
///
/// Only the tail of `pending` is inspected.
fn trailing_scheme(pending: &str) -> Option<usize> {
    let bytes = pending.as_bytes();
    SCHEMES.iter().find_map(|scheme| {
        let start = bytes.len().checked_sub(scheme.len())?;
        if !bytes[start..].eq_ignore_ascii_case(scheme.as_bytes()) {
            return None;
        }
        let bounded = start == 0 || !is_scheme_byte(bytes[start - 1]);
        bounded.then_some(scheme.len())
    })
}

fn is_scheme_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-')
}

pub(crate) fn linkify(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    let md = state.md;
    if !md.options.linkify || state.link_level > 0 {
        return RuleResult::NoMatch;
    }

    let pos = state.pos;
    if pos + 3 > state.pos_max {
        return RuleResult::NoMatch;
    }
    if state.byte(pos) != b':' || state.byte(pos + 1) != b'/' || state.byte(pos + 2) != b'/' {
        return RuleResult::NoMatch;
    }

    let Some(proto_len) = trailing_scheme(&state.pending) else {
        return RuleResult::NoMatch;
    };
    let Some(link_start) = pos.checked_sub(proto_len) else {
        return RuleResult::NoMatch;
    };

    let src = state.src;
    let Some(link) = src.get(link_start..state.pos_max).and_then(match_at_start) else {
        return RuleResult::NoMatch;
    };
    if link.url.len() <= proto_len {
        return RuleResult::NoMatch;
    }

    // Emphasis markers right after a URL are not part of it.
    let url = link.url.trim_end_matches('*');
    let full_url = (md.normalize_link)(url);
    if !(md.validate_link)(&full_url) {
        return RuleResult::NoMatch;
    }

    if !silent {
        let keep = state.pending.len() - proto_len;
        state.pending.truncate(keep);

        let token = state.push("link_open", "a", Nesting::Open);
        token.attr_push("href", full_url);
        token.markup = "linkify".to_string();
        token.info = "auto".to_string();

        state.push("text", "", Nesting::Leaf).content = (md.normalize_link_text)(url);

        let token = state.push("link_close", "a", Nesting::Close);
        token.markup = "linkify".to_string();
        token.info = "auto".to_string();
    }

    state.pos += url.len() - proto_len;
    RuleResult::Matched
}
