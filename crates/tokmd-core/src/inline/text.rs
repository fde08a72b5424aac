//! Runs of characters that cannot start any inline construct.

use crate::inline::InlineState;
use crate::RuleResult;

/// Characters that may begin some inline rule. Everything else is plain text.
///
/// `!`, `#`, `$`, `%`, `+`, `-`, `:`, `=`, `@`, `^`, `{`, `}` are listed for
/// plugins (sub/sup, math, footnotes, linkify) that hook these characters.
#[inline]
fn is_terminator_char(ch: u8) -> bool {
    matches!(
        ch,
        b'\n' | b'!'
            | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'*'
            | b'+'
            | b'-'
            | b':'
            | b'<'
            | b'='
            | b'@'
            | b'['
            | b'\\'
            | b']'
            | b'^'
            | b'_'
            | b'`'
            | b'{'
            | b'}'
            | b'~'
    )
}

pub(crate) fn text(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    let bytes = state.src.as_bytes();
    let mut pos = state.pos;
    while pos < state.pos_max && !is_terminator_char(bytes[pos]) {
        pos += 1;
    }
    if pos == state.pos {
        return RuleResult::NoMatch;
    }

    if !silent {
        let src = state.src;
        state.pending.push_str(&src[state.pos..pos]);
    }
    state.pos = pos;
    RuleResult::Matched
}
