//! Bullet and ordered lists.

use crate::block::BlockState;
use crate::common::is_space;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

/// Position after a `-`, `+` or `*` marker, if the line starts with one.
fn skip_bullet_list_marker(state: &BlockState<'_>, line: usize) -> Option<usize> {
    let max = state.e_marks[line];
    let mut pos = state.b_marks[line] + state.t_shift[line];

    let marker = state.byte(pos);
    pos += 1;
    if !matches!(marker, b'*' | b'-' | b'+') {
        return None;
    }
    if pos < max && !is_space(state.byte(pos)) {
        // " -test " is not a list item
        return None;
    }
    Some(pos)
}

/// Position after a `1.` or `1)` marker, if the line starts with one.
fn skip_ordered_list_marker(state: &BlockState<'_>, line: usize) -> Option<usize> {
    let start = state.b_marks[line] + state.t_shift[line];
    let max = state.e_marks[line];
    let mut pos = start;

    // List marker should have at least 2 chars (digit + dot).
    if pos + 1 >= max {
        return None;
    }

    let ch = state.byte(pos);
    pos += 1;
    if !ch.is_ascii_digit() {
        return None;
    }

    loop {
        if pos >= max {
            return None;
        }
        let ch = state.byte(pos);
        pos += 1;

        if ch.is_ascii_digit() {
            // At most 9 digits, so the number fits in an i32.
            if pos - start >= 10 {
                return None;
            }
            continue;
        }
        if ch == b')' || ch == b'.' {
            break;
        }
        return None;
    }

    if pos < max && !is_space(state.byte(pos)) {
        // " 1.test " is not a list item
        return None;
    }
    Some(pos)
}

/// Hide paragraph wrappers of a tight list that opened at token `idx`.
fn mark_tight_paragraphs(state: &mut BlockState<'_>, idx: usize) {
    let level = state.level + 2;
    let len = state.tokens.len().saturating_sub(2);
    let mut i = idx + 2;
    while i < len {
        if state.tokens[i].level == level && state.tokens[i].kind == "paragraph_open" {
            state.tokens[i + 2].hidden = true;
            state.tokens[i].hidden = true;
            i += 2;
        }
        i += 1;
    }
}

pub(crate) fn list(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    silent: bool,
) -> RuleResult {
    let mut next_line = start_line;
    let mut tight = true;

    if state.s_count[next_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    // A list item indented 4+ past its parent list is code, unless the
    // parent item's own content sits deeper.
    if state.list_indent >= 0
        && state.s_count[next_line] - state.list_indent >= 4
        && state.s_count[next_line] < state.blk_indent
    {
        return RuleResult::NoMatch;
    }

    // Lists may only interrupt a paragraph under some conditions.
    let is_terminating_paragraph =
        silent && state.parent_type == "paragraph" && state.s_count[next_line] >= state.blk_indent;

    let src = state.src;
    let is_ordered;
    let mut marker_value = 0u64;
    let mut start;
    let mut pos_after_marker;

    if let Some(pos) = skip_ordered_list_marker(state, next_line) {
        is_ordered = true;
        pos_after_marker = pos;
        start = state.b_marks[next_line] + state.t_shift[next_line];
        marker_value = src[start..pos - 1].parse().unwrap_or(0);

        // An ordered list can interrupt a paragraph only when it starts at 1.
        if is_terminating_paragraph && marker_value != 1 {
            return RuleResult::NoMatch;
        }
    } else if let Some(pos) = skip_bullet_list_marker(state, next_line) {
        is_ordered = false;
        pos_after_marker = pos;
        start = 0;
    } else {
        return RuleResult::NoMatch;
    }

    // An empty list item cannot interrupt a paragraph.
    if is_terminating_paragraph && state.skip_spaces(pos_after_marker) >= state.e_marks[next_line] {
        return RuleResult::NoMatch;
    }

    if silent {
        return RuleResult::Matched;
    }

    let marker_char = state.byte(pos_after_marker - 1);
    let markup = (marker_char as char).to_string();

    let list_tok_idx = state.tokens.len();
    if is_ordered {
        let token = state.push("ordered_list_open", "ol", Nesting::Open);
        if marker_value != 1 {
            token.attr_push("start", marker_value.to_string());
        }
    } else {
        state.push("bullet_list_open", "ul", Nesting::Open);
    }
    state.tokens[list_tok_idx].markup = markup.clone();

    let mut prev_empty_end = false;
    let md = state.md;
    let terminators = md.block.ruler.get_rules("list");

    let old_parent_type = state.parent_type;
    state.parent_type = "list";

    while next_line < end_line {
        let mut pos = pos_after_marker;
        let max = state.e_marks[next_line];

        let initial = state.s_count[next_line]
            + (pos_after_marker - (state.b_marks[next_line] + state.t_shift[next_line])) as i32;
        let mut offset = initial;

        while pos < max {
            match state.byte(pos) {
                b'\t' => offset += 4 - (offset + state.bs_count[next_line]) % 4,
                b' ' => offset += 1,
                _ => break,
            }
            pos += 1;
        }

        let content_start = pos;
        let mut indent_after_marker = if content_start >= max { 1 } else { offset - initial };

        // More than 4 spaces after the marker: the item starts with indented code.
        if indent_after_marker > 4 {
            indent_after_marker = 1;
        }

        // The content column children must reach to belong to this item.
        let indent = initial + indent_after_marker;

        let item_idx = state.tokens.len();
        let token = state.push("list_item_open", "li", Nesting::Open);
        token.markup = markup.clone();
        if is_ordered {
            token.info = src[start..pos_after_marker - 1].to_string();
        }

        let old_tight = state.tight;
        let old_t_shift = state.t_shift[next_line];
        let old_s_count = state.s_count[next_line];

        // `list_indent` tracks the parent list while the item's children run.
        let old_list_indent = state.list_indent;
        state.list_indent = state.blk_indent;
        state.blk_indent = indent;

        state.tight = true;
        state.t_shift[next_line] = content_start - state.b_marks[next_line];
        state.s_count[next_line] = offset;

        if content_start >= max && state.is_empty(next_line + 1) {
            // An item may begin with at most one blank line; this one is
            // empty. Skip the blank so the next item is not swallowed.
            state.line = (state.line + 2).min(end_line);
        } else {
            md.block.tokenize(state, next_line, end_line);
        }

        // A list is loose if any item is, or if items are separated by blanks.
        if !state.tight || prev_empty_end {
            tight = false;
        }
        prev_empty_end = state.line - next_line > 1 && state.is_empty(state.line - 1);

        state.blk_indent = state.list_indent;
        state.list_indent = old_list_indent;
        state.t_shift[next_line] = old_t_shift;
        state.s_count[next_line] = old_s_count;
        state.tight = old_tight;

        state.push("list_item_close", "li", Nesting::Close).markup = markup.clone();

        let item_start = next_line;
        next_line = state.line;
        state.tokens[item_idx].map = Some(Span::new(item_start, next_line));

        if next_line >= end_line {
            break;
        }

        // Try to continue the list with a sibling item.
        if state.s_count[next_line] < state.blk_indent {
            break;
        }
        if state.s_count[next_line] - state.blk_indent >= 4 {
            break;
        }

        let terminate = terminators
            .iter()
            .any(|rule| rule(state, next_line, end_line, true).is_match());
        if terminate {
            break;
        }

        let next_marker = if is_ordered {
            let found = skip_ordered_list_marker(state, next_line);
            start = state.b_marks[next_line] + state.t_shift[next_line];
            found
        } else {
            skip_bullet_list_marker(state, next_line)
        };
        match next_marker {
            Some(pos) => pos_after_marker = pos,
            None => break,
        }

        // A different marker char starts a new list.
        if marker_char != state.byte(pos_after_marker - 1) {
            break;
        }
    }

    let close = if is_ordered {
        state.push("ordered_list_close", "ol", Nesting::Close)
    } else {
        state.push("bullet_list_close", "ul", Nesting::Close)
    };
    close.markup = markup;

    state.tokens[list_tok_idx].map = Some(Span::new(start_line, next_line));
    state.line = next_line;
    state.parent_type = old_parent_type;

    if tight {
        mark_tight_paragraphs(state, list_tok_idx);
    }

    RuleResult::Matched
}
