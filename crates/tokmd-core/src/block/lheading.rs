//! Setext headings: a paragraph underlined with `===` or `---`.

use crate::block::heading::HEADING_TAGS;
use crate::block::BlockState;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn lheading(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    _silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    let md = state.md;
    let terminators = md.block.ruler.get_rules("paragraph");
    let old_parent_type = state.parent_type;
    state.parent_type = "paragraph";

    let mut level = 0;
    let mut marker = 0u8;
    let mut next_line = start_line + 1;

    while next_line < end_line && !state.is_empty(next_line) {
        // Deep indent here is a lazy continuation, not code.
        if state.s_count[next_line] - state.blk_indent > 3 {
            next_line += 1;
            continue;
        }

        // Underline check.
        if state.s_count[next_line] >= state.blk_indent {
            let mut pos = state.b_marks[next_line] + state.t_shift[next_line];
            let max = state.e_marks[next_line];
            if pos < max {
                marker = state.byte(pos);
                if marker == b'-' || marker == b'=' {
                    pos = state.skip_chars(pos, marker);
                    pos = state.skip_spaces(pos);
                    if pos >= max {
                        level = if marker == b'=' { 1 } else { 2 };
                        break;
                    }
                }
            }
        }

        // Lazy line from an enclosing blockquote.
        if state.s_count[next_line] < 0 {
            next_line += 1;
            continue;
        }

        let terminate = terminators
            .iter()
            .any(|rule| rule(state, next_line, end_line, true).is_match());
        if terminate {
            break;
        }
        next_line += 1;
    }

    if level == 0 {
        state.parent_type = old_parent_type;
        return RuleResult::NoMatch;
    }

    let content = state
        .get_lines(start_line, next_line, state.blk_indent.max(0) as usize, false)
        .trim()
        .to_string();
    state.line = next_line + 1;

    let tag = HEADING_TAGS[level - 1];
    let markup = (marker as char).to_string();

    let open = state.push("heading_open", tag, Nesting::Open);
    open.markup = markup.clone();
    open.map = Some(Span::new(start_line, next_line + 1));

    let inline = state.push("inline", "", Nesting::Leaf);
    inline.content = content;
    inline.map = Some(Span::new(start_line, next_line));

    state.push("heading_close", tag, Nesting::Close).markup = markup;

    state.parent_type = old_parent_type;
    RuleResult::Matched
}
