//! `~~strikethrough~~`.
//!
//! Tokenizing pushes one `~~` placeholder per pair of tildes; pairing happens
//! in `balance_pairs`, and [`post_process`] rewrites matched placeholders.

use crate::inline::{Delimiter, InlineState};
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn tokenize(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    if silent {
        return RuleResult::NoMatch;
    }
    let start = state.pos;
    if state.byte(start) != b'~' {
        return RuleResult::NoMatch;
    }

    let scanned = state.scan_delims(start, true);
    let mut len = scanned.length;
    if len < 2 {
        return RuleResult::NoMatch;
    }

    if len % 2 == 1 {
        state.push("text", "", Nesting::Leaf).content = "~".to_string();
        len -= 1;
    }

    for _ in 0..len / 2 {
        state.push("text", "", Nesting::Leaf).content = "~~".to_string();
        let token = state.tokens.len() - 1;
        state.delimiters().push(Delimiter {
            marker: b'~',
            length: 0,
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
    let mut lone_markers = Vec::new();

    for i in 0..state.delimiter_lists[list].len() {
        let start = state.delimiter_lists[list][i];
        if start.marker != b'~' {
            continue;
        }
        let Some(end) = start.end else {
            continue;
        };
        let end = state.delimiter_lists[list][end];

        let open = &mut state.tokens[start.token];
        open.kind = "s_open";
        open.tag = "s";
        open.nesting = Nesting::Open;
        open.markup = "~~".to_string();
        open.content.clear();

        let close = &mut state.tokens[end.token];
        close.kind = "s_close";
        close.tag = "s";
        close.nesting = Nesting::Close;
        close.markup = "~~".to_string();
        close.content.clear();

        let before = &state.tokens[end.token - 1];
        if before.kind == "text" && before.content == "~" {
            lone_markers.push(end.token - 1);
        }
    }

    // A lone `~` before a closer goes after it: `~~a~~~` is `<s>a</s>~`.
    while let Some(i) = lone_markers.pop() {
        let mut j = i + 1;
        while j < state.tokens.len() && state.tokens[j].kind == "s_close" {
            j += 1;
        }
        j -= 1;
        if i != j {
            state.tokens.swap(i, j);
        }
    }
}

/// Rewrite matched `~~` placeholders into `s_open`/`s_close`.
pub(crate) fn post_process(state: &mut InlineState<'_>) {
    process_list(state, 0);
    for meta in 0..state.tokens_meta.len() {
        if let Some(list) = state.tokens_meta[meta] {
            process_list(state, list);
        }
    }
}
