//! Raw inline HTML: tags, comments, processing instructions, declarations
//! and CDATA.

use crate::common::html::{is_link_close, is_link_open, HTML_TAG_RE};
use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn html_inline(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    if !state.md.options.html {
        return RuleResult::NoMatch;
    }

    let pos = state.pos;
    let max = state.pos_max;
    if state.byte(pos) != b'<' || pos + 2 >= max {
        return RuleResult::NoMatch;
    }

    let ch = state.byte(pos + 1);
    if ch != b'!' && ch != b'?' && ch != b'/' && !ch.is_ascii_alphabetic() {
        return RuleResult::NoMatch;
    }

    let src = state.src;
    let Some(found) = HTML_TAG_RE.find(&src[pos..max]) else {
        return RuleResult::NoMatch;
    };
    let html = found.as_str();

    if !silent {
        state.push("html_inline", "", Nesting::Leaf).content = html.to_string();
        if is_link_open(html) {
            state.link_level += 1;
        }
        if is_link_close(html) {
            state.link_level = state.link_level.saturating_sub(1);
        }
    }

    state.pos += html.len();
    RuleResult::Matched
}
