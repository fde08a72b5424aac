//! `![alt](src "title")` and reference images.
//!
//! The image is a leaf token; its alt text is parsed into `children` so
//! renderers can flatten it.

use crate::common::link::{parse_link_destination, parse_link_label, parse_link_title};
use crate::inline::link::{resolve_reference, skip_ws};
use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn image(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    if state.byte(state.pos) != b'!' || state.byte(state.pos + 1) != b'[' {
        return RuleResult::NoMatch;
    }

    let md = state.md;
    let src = state.src;
    let old_pos = state.pos;
    let max = state.pos_max;
    let label_start = state.pos + 2;
    let Some(label_end) = parse_link_label(state, state.pos + 1, false) else {
        return RuleResult::NoMatch;
    };

    let mut href = String::new();
    let mut title = String::new();
    let mut pos = label_end + 1;

    if pos < max && state.byte(pos) == b'(' {
        pos = skip_ws(src, pos + 1, max);
        if pos >= max {
            return RuleResult::NoMatch;
        }

        if let Some(dest) = parse_link_destination(src, pos, max) {
            href = (md.normalize_link)(&dest.value);
            if (md.validate_link)(&href) {
                pos = dest.pos;
            } else {
                href.clear();
            }
        }

        let start = pos;
        pos = skip_ws(src, pos, max);
        if pos < max && start != pos {
            if let Some(part) = parse_link_title(src, pos, max) {
                title = part.value;
                pos = skip_ws(src, part.pos, max);
            }
        }

        if pos >= max || state.byte(pos) != b')' {
            state.pos = old_pos;
            return RuleResult::NoMatch;
        }
        pos += 1;
    } else {
        match resolve_reference(state, label_start, label_end, pos) {
            Some((ref_href, ref_title, end)) => {
                href = ref_href;
                title = ref_title;
                pos = end;
            }
            None => {
                state.pos = old_pos;
                return RuleResult::NoMatch;
            }
        }
    }

    if !silent {
        let content = src[label_start..label_end].to_string();
        let mut children = Vec::new();
        md.inline.parse_nested(&content, md, &mut *state.env, &mut children, state.level + 1);

        let token = state.push("image", "img", Nesting::Leaf);
        token.attr_push("src", href);
        token.attr_push("alt", "");
        if !title.is_empty() {
            token.attr_push("title", title);
        }
        token.children = children;
        token.content = content;
    }

    state.pos = pos;
    state.pos_max = max;
    RuleResult::Matched
}
