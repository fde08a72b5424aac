//! Backslash escapes and backslash hard breaks.

use crate::common::{char_len_at, is_space};
use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

const ESCAPABLE: &[u8] = b"\\!\"#$%&'()*+,./:;<=>?@[]^_`{|}~-";

pub(crate) fn escape(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    let mut pos = state.pos;
    let max = state.pos_max;
    if state.byte(pos) != b'\\' {
        return RuleResult::NoMatch;
    }
    pos += 1;
    if pos >= max {
        return RuleResult::NoMatch;
    }

    if state.byte(pos) == b'\n' {
        if !silent {
            state.push("hardbreak", "br", Nesting::Leaf);
        }
        pos += 1;
        while pos < max && is_space(state.byte(pos)) {
            pos += 1;
        }
        state.pos = pos;
        return RuleResult::Matched;
    }

    let src = state.src;
    let len = char_len_at(src, pos);
    let escaped = &src[pos..pos + len];
    let original = &src[pos - 1..pos + len];

    if !silent {
        let is_escapable = len == 1 && ESCAPABLE.contains(&src.as_bytes()[pos]);
        let token = state.push("text_special", "", Nesting::Leaf);
        token.content = if is_escapable { escaped } else { original }.to_string();
        token.markup = original.to_string();
        token.info = "escape".to_string();
    }

    state.pos = pos + len;
    RuleResult::Matched
}
