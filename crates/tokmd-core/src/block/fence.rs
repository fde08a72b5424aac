//! Fenced code blocks: ```` ``` ```` and `~~~`.

use crate::block::BlockState;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn fence(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    let mut pos = state.b_marks[start_line] + state.t_shift[start_line];
    let max = state.e_marks[start_line];
    if pos + 3 > max {
        return RuleResult::NoMatch;
    }

    let marker = state.byte(pos);
    if marker != b'~' && marker != b'`' {
        return RuleResult::NoMatch;
    }

    let mem = pos;
    pos = state.skip_chars(pos, marker);
    let len = pos - mem;
    if len < 3 {
        return RuleResult::NoMatch;
    }

    let markup = &state.src[mem..pos];
    let params = &state.src[pos..max];
    if marker == b'`' && params.as_bytes().contains(&b'`') {
        return RuleResult::NoMatch;
    }
    if silent {
        return RuleResult::Matched;
    }

    let mut next_line = start_line;
    let mut have_end_marker = false;
    loop {
        next_line += 1;
        // Unclosed fences run to the end of the container.
        if next_line >= end_line {
            break;
        }

        let line_start = state.b_marks[next_line] + state.t_shift[next_line];
        let line_max = state.e_marks[next_line];
        if line_start < line_max && state.s_count[next_line] < state.blk_indent {
            break;
        }
        if state.byte(line_start) != marker {
            continue;
        }
        if state.s_count[next_line] - state.blk_indent >= 4 {
            continue;
        }

        let after = state.skip_chars(line_start, marker);
        if after - line_start < len {
            continue;
        }
        if state.skip_spaces(after) < line_max {
            continue;
        }

        have_end_marker = true;
        break;
    }

    let indent = state.s_count[start_line].max(0) as usize;
    state.line = next_line + usize::from(have_end_marker);

    let (info, markup) = (params.to_string(), markup.to_string());
    let content = state.get_lines(start_line + 1, next_line, indent, true);
    let end = state.line;
    let token = state.push("fence", "code", Nesting::Leaf);
    token.info = info;
    token.content = content;
    token.markup = markup;
    token.map = Some(Span::new(start_line, end));
    RuleResult::Matched
}
