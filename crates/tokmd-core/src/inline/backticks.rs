//! Code spans: `` `code` ``.

use memchr::memchr;

use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn backticks(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    let mut pos = state.pos;
    if state.byte(pos) != b'`' {
        return RuleResult::NoMatch;
    }

    let src = state.src;
    let bytes = src.as_bytes();
    let start = pos;
    let max = state.pos_max;
    pos += 1;
    while pos < max && bytes[pos] == b'`' {
        pos += 1;
    }

    let marker = &src[start..pos];
    let opener_length = marker.len();

    // A full scan already showed no closer of this length follows.
    if state.backticks_scanned
        && state.backticks.get(&opener_length).copied().unwrap_or(0) <= start
    {
        if !silent {
            state.pending.push_str(marker);
        }
        state.pos += opener_length;
        return RuleResult::Matched;
    }

    let mut match_end = pos;
    while let Some(offset) = memchr(b'`', &bytes[match_end..]) {
        let match_start = match_end + offset;
        match_end = match_start + 1;
        while match_end < max && bytes[match_end] == b'`' {
            match_end += 1;
        }

        let closer_length = match_end - match_start;
        if closer_length == opener_length {
            if !silent {
                let content = strip_code_padding(src[pos..match_start].replace('\n', " "));
                let token = state.push("code_inline", "code", Nesting::Leaf);
                token.markup = marker.to_string();
                token.content = content;
            }
            state.pos = match_end;
            return RuleResult::Matched;
        }

        // Remember the last run of each length to skip hopeless scans later.
        state.backticks.insert(closer_length, match_start);
    }

    state.backticks_scanned = true;
    if !silent {
        state.pending.push_str(marker);
    }
    state.pos += opener_length;
    RuleResult::Matched
}

/// Drop one space on each side when both are present around other content.
fn strip_code_padding(content: String) -> String {
    let bytes = content.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b' ' && bytes[bytes.len() - 1] == b' ' {
        content[1..content.len() - 1].to_string()
    } else {
        content
    }
}
