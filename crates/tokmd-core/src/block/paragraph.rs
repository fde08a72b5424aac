//! Paragraphs: the catch-all block rule.

use crate::block::BlockState;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn paragraph(
    state: &mut BlockState<'_>,
    start_line: usize,
    _end_line: usize,
    _silent: bool,
) -> RuleResult {
    let md = state.md;
    let terminators = md.block.ruler.get_rules("paragraph");
    let end_line = state.line_max;
    let old_parent_type = state.parent_type;
    state.parent_type = "paragraph";

    let mut next_line = start_line + 1;
    while next_line < end_line && !state.is_empty(next_line) {
        // Deep indent here is a lazy continuation, not code.
        if state.s_count[next_line] - state.blk_indent > 3 {
            next_line += 1;
            continue;
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

    let content = state
        .get_lines(start_line, next_line, state.blk_indent.max(0) as usize, false)
        .trim()
        .to_string();
    state.line = next_line;
    let map = Some(Span::new(start_line, next_line));

    state.push("paragraph_open", "p", Nesting::Open).map = map;
    let inline = state.push("inline", "", Nesting::Leaf);
    inline.content = content;
    inline.map = map;
    state.push("paragraph_close", "p", Nesting::Close);

    state.parent_type = old_parent_type;
    RuleResult::Matched
}
