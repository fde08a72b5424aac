//! `&name;`, `&#123;` and `&#x1F;` entity references.

use std::sync::LazyLock;

use regex::Regex;

use crate::common::{decode_named_entity, decode_numeric_entity};
use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

static DIGITAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^&#((?:x[a-f0-9]{1,6}|[0-9]{1,7}));").unwrap());
static NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^&([a-z][a-z0-9]{1,31});").unwrap());

pub(crate) fn entity(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    let pos = state.pos;
    let max = state.pos_max;
    if state.byte(pos) != b'&' || pos + 1 >= max {
        return RuleResult::NoMatch;
    }

    let src = state.src;
    let (markup, content) = if state.byte(pos + 1) == b'#' {
        let Some(caps) = DIGITAL_RE.captures(&src[pos..]) else {
            return RuleResult::NoMatch;
        };
        // Out-of-range and surrogate codes decode to the replacement char.
        let decoded = decode_numeric_entity(&caps[1]).unwrap_or('\u{FFFD}');
        (caps.get(0).map_or("", |m| m.as_str()), decoded.to_string())
    } else {
        let Some(caps) = NAMED_RE.captures(&src[pos..]) else {
            return RuleResult::NoMatch;
        };
        let Some(decoded) = decode_named_entity(&caps[1]) else {
            return RuleResult::NoMatch;
        };
        (caps.get(0).map_or("", |m| m.as_str()), decoded)
    };

    if !silent {
        let token = state.push("text_special", "", Nesting::Leaf);
        token.content = content;
        token.markup = markup.to_string();
        token.info = "entity".to_string();
    }

    state.pos += markup.len();
    RuleResult::Matched
}
