//! ATX headings: `# Title`.

use crate::block::BlockState;
use crate::common::is_space;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

pub(crate) fn heading(
    state: &mut BlockState<'_>,
    start_line: usize,
    _end_line: usize,
    silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    let mut pos = state.b_marks[start_line] + state.t_shift[start_line];
    let mut max = state.e_marks[start_line];
    if state.byte(pos) != b'#' || pos >= max {
        return RuleResult::NoMatch;
    }

    let mut level = 1;
    pos += 1;
    while state.byte(pos) == b'#' && pos < max && level <= 6 {
        level += 1;
        pos += 1;
    }
    if level > 6 || (pos < max && !is_space(state.byte(pos))) {
        return RuleResult::NoMatch;
    }
    if silent {
        return RuleResult::Matched;
    }

    // Strip trailing spaces and an optional closing `###` sequence.
    max = state.skip_spaces_back(max, pos);
    let tmp = state.skip_chars_back(max, b'#', pos);
    if tmp > pos && is_space(state.byte(tmp - 1)) {
        max = tmp;
    }

    state.line = start_line + 1;
    let map = Some(Span::new(start_line, state.line));
    let tag = HEADING_TAGS[level - 1];
    let markup = "#".repeat(level);
    let content = state.src[pos..max].trim().to_string();

    let open = state.push("heading_open", tag, Nesting::Open);
    open.markup = markup.clone();
    open.map = map;

    let inline = state.push("inline", "", Nesting::Leaf);
    inline.content = content;
    inline.map = map;

    state.push("heading_close", tag, Nesting::Close).markup = markup;
    RuleResult::Matched
}
