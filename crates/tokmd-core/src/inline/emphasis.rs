//! `*emphasis*`, `_emphasis_`, `**strong**` and `__strong__`.

use crate::inline::{Delimiter, InlineState};
use crate::token::Nesting;
use crate::RuleResult;

/// Push one placeholder per marker char, each with its own delimiter.
pub(crate) fn tokenize(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    if silent {
        return RuleResult::NoMatch;
    }
    let start = state.pos;
    let marker = state.byte(start);
    if marker != b'_' && marker != b'*' {
        return RuleResult::NoMatch;
    }

    let scanned = state.scan_delims(start, marker == b'*');
    let ch = (marker as char).to_string();

    for _ in 0..scanned.length {
        state.push("text", "", Nesting::Leaf).content = ch.clone();
        let token = state.tokens.len() - 1;
        state.delimiters().push(Delimiter {
            marker,
            length: scanned.length,
            token,
            end: None,
            open: scanned.can_open,
            close: scanned.can_close,
        });
    }

    state.pos += scanned.length;
    RuleResult::Matched
}

fn process_list(state: &mut InlineState<'_>, list: usize) {
    let delimiters = &state.delimiter_lists[list];
    let mut rewrites = Vec::new();

    // Walk backwards so inner pairs are seen before the outer pair that may
    // combine with them into `strong`.
    let mut i = delimiters.len();
    while i > 0 {
        i -= 1;
        let start = delimiters[i];
        if start.marker != b'_' && start.marker != b'*' {
            continue;
        }
        let Some(end_idx) = start.end else {
            continue;
        };
        let end = delimiters[end_idx];

        // Two adjacent pairs nested exactly around the same content: strong.
        let is_strong = i > 0
            && delimiters[i - 1].end == Some(end_idx + 1)
            && delimiters[i - 1].marker == start.marker
            && delimiters[i - 1].token + 1 == start.token
            && delimiters.get(end_idx + 1).map(|d| d.token) == Some(end.token + 1);

        rewrites.push((start.token, end.token, start.marker, is_strong));
        if is_strong {
            rewrites.push((delimiters[i - 1].token, delimiters[end_idx + 1].token, 0, true));
            i -= 1;
        }
    }

    for (open_idx, close_idx, marker, is_strong) in rewrites {
        if marker == 0 {
            // Outer markers of a strong pair vanish.
            state.tokens[open_idx].content.clear();
            state.tokens[close_idx].content.clear();
            continue;
        }

        let ch = marker as char;
        let markup = if is_strong { format!("{ch}{ch}") } else { ch.to_string() };
        let (open_kind, close_kind, tag) = if is_strong {
            ("strong_open", "strong_close", "strong")
        } else {
            ("em_open", "em_close", "em")
        };

        let open = &mut state.tokens[open_idx];
        open.kind = open_kind;
        open.tag = tag;
        open.nesting = Nesting::Open;
        open.markup = markup.clone();
        open.content.clear();

        let close = &mut state.tokens[close_idx];
        close.kind = close_kind;
        close.tag = tag;
        close.nesting = Nesting::Close;
        close.markup = markup;
        close.content.clear();
    }
}

/// Rewrite matched emphasis placeholders into open/close tokens.
pub(crate) fn post_process(state: &mut InlineState<'_>) {
    process_list(state, 0);
    for meta in 0..state.tokens_meta.len() {
        if let Some(list) = state.tokens_meta[meta] {
            process_list(state, list);
        }
    }
}
