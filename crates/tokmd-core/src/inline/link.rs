//! `[text](destination "title")` and reference links `[text][label]`.

use crate::common::is_space;
use crate::common::link::{parse_link_destination, parse_link_label, parse_link_title};
use crate::common::normalize_reference;
use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

/// Skip spaces and newlines.
pub(super) fn skip_ws(src: &str, mut pos: usize, max: usize) -> usize {
    let bytes = src.as_bytes();
    while pos < max && (is_space(bytes[pos]) || bytes[pos] == b'\n') {
        pos += 1;
    }
    pos
}

/// Resolve `[label]`, `[]` or nothing after a link text ending at
/// `label_end`. Returns the `(href, title)` of the definition and the
/// position after the construct.
pub(super) fn resolve_reference(
    state: &mut InlineState<'_>,
    label_start: usize,
    label_end: usize,
    mut pos: usize,
) -> Option<(String, String, usize)> {
    let src = state.src;
    let max = state.pos_max;
    let mut label = None;

    if pos < max && state.byte(pos) == b'[' {
        let start = pos + 1;
        match parse_link_label(state, pos, false) {
            Some(end) => {
                label = Some(&src[start..end]).filter(|l| !l.is_empty());
                pos = end + 1;
            }
            None => pos = label_end + 1,
        }
    } else {
        pos = label_end + 1;
    }

    let label = label.unwrap_or(&src[label_start..label_end]);
    let reference = state.env.references.get(&normalize_reference(label))?;
    Some((reference.href.clone(), reference.title.clone(), pos))
}

pub(crate) fn link(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    if state.byte(state.pos) != b'[' {
        return RuleResult::NoMatch;
    }

    let md = state.md;
    let src = state.src;
    let old_pos = state.pos;
    let max = state.pos_max;
    let label_start = state.pos + 1;
    let Some(label_end) = parse_link_label(state, state.pos, true) else {
        return RuleResult::NoMatch;
    };

    let mut href = String::new();
    let mut title = String::new();
    let mut pos = label_end + 1;
    let mut parse_reference = true;

    if pos < max && state.byte(pos) == b'(' {
        // Inline link: [text](  <href>  "title"  )
        parse_reference = false;
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

            let start = pos;
            pos = skip_ws(src, pos, max);
            if pos < max && start != pos {
                if let Some(part) = parse_link_title(src, pos, max) {
                    title = part.value;
                    pos = skip_ws(src, part.pos, max);
                }
            }
        }

        if pos >= max || state.byte(pos) != b')' {
            // Not an inline link after all; try it as a reference.
            parse_reference = true;
        }
        pos += 1;
    }

    if parse_reference {
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
        state.pos = label_start;
        state.pos_max = label_end;

        let token = state.push("link_open", "a", Nesting::Open);
        token.attr_push("href", href);
        if !title.is_empty() {
            token.attr_push("title", title);
        }

        state.link_level += 1;
        md.inline.tokenize(state);
        state.link_level -= 1;

        state.push("link_close", "a", Nesting::Close);
    }

    state.pos = pos;
    state.pos_max = max;
    RuleResult::Matched
}
