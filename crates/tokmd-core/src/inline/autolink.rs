//! `<scheme:uri>` and `<user@host>` autolinks.

use std::sync::LazyLock;

use regex::Regex;

use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

static AUTOLINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]{1,31}:[^<>\x00-\x20]*$").unwrap());

pub(crate) fn autolink(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    let start = state.pos;
    let max = state.pos_max;
    if state.byte(start) != b'<' {
        return RuleResult::NoMatch;
    }

    let mut pos = start;
    loop {
        pos += 1;
        if pos >= max {
            return RuleResult::NoMatch;
        }
        match state.byte(pos) {
            b'<' => return RuleResult::NoMatch,
            b'>' => break,
            _ => {}
        }
    }

    let md = state.md;
    let src = state.src;
    let url = &src[start + 1..pos];
    let full_url = if AUTOLINK_RE.is_match(url) {
        (md.normalize_link)(url)
    } else if EMAIL_RE.is_match(url) {
        (md.normalize_link)(&format!("mailto:{url}"))
    } else {
        return RuleResult::NoMatch;
    };
    if !(md.validate_link)(&full_url) {
        return RuleResult::NoMatch;
    }

    if !silent {
        let text = (md.normalize_link_text)(url);

        let token = state.push("link_open", "a", Nesting::Open);
        token.attr_push("href", full_url);
        token.markup = "autolink".to_string();
        token.info = "auto".to_string();

        state.push("text", "", Nesting::Leaf).content = text;

        let token = state.push("link_close", "a", Nesting::Close);
        token.markup = "autolink".to_string();
        token.info = "auto".to_string();
    }

    state.pos = pos + 1;
    RuleResult::Matched
}
