//! Block quotes, with lazy continuation lines.

use crate::block::BlockState;
use crate::common::is_space;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

/// Saved line-table entries for lines rewritten while the quote is parsed.
#[derive(Default)]
struct SavedLines {
    b_marks: Vec<usize>,
    bs_count: Vec<i32>,
    s_count: Vec<i32>,
    t_shift: Vec<usize>,
}

impl SavedLines {
    fn save(&mut self, state: &BlockState<'_>, line: usize) {
        self.b_marks.push(state.b_marks[line]);
        self.bs_count.push(state.bs_count[line]);
        self.s_count.push(state.s_count[line]);
        self.t_shift.push(state.t_shift[line]);
    }

    fn restore(&self, state: &mut BlockState<'_>, start_line: usize) {
        for i in 0..self.t_shift.len() {
            state.b_marks[start_line + i] = self.b_marks[i];
            state.t_shift[start_line + i] = self.t_shift[i];
            state.s_count[start_line + i] = self.s_count[i];
            state.bs_count[start_line + i] = self.bs_count[i];
        }
    }
}

pub(crate) fn blockquote(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    let start = state.b_marks[start_line] + state.t_shift[start_line];
    if state.byte(start) != b'>' {
        return RuleResult::NoMatch;
    }
    if silent {
        return RuleResult::Matched;
    }

    let md = state.md;
    let terminators = md.block.ruler.get_rules("blockquote");
    let old_line_max = state.line_max;
    let old_parent_type = state.parent_type;
    state.parent_type = "blockquote";

    let mut saved = SavedLines::default();
    let mut last_line_empty = false;
    let mut next_line = start_line;

    while next_line < end_line {
        // An outdented `>` belongs to an enclosing list item, not to us.
        let is_outdented = state.s_count[next_line] < state.blk_indent;

        let mut pos = state.b_marks[next_line] + state.t_shift[next_line];
        let max = state.e_marks[next_line];
        if pos >= max {
            // Empty line outside of a quote marker ends the quote.
            break;
        }

        let is_marker = state.byte(pos) == b'>';
        pos += 1;
        if is_marker && !is_outdented {
            let mut initial = state.s_count[next_line] + 1;
            let space_after_marker;
            let adjust_tab;

            match state.byte(pos) {
                b' ' => {
                    pos += 1;
                    initial += 1;
                    adjust_tab = false;
                    space_after_marker = true;
                }
                b'\t' => {
                    space_after_marker = true;
                    if (state.bs_count[next_line] + initial) % 4 == 3 {
                        pos += 1;
                        initial += 1;
                        adjust_tab = false;
                    } else {
                        // Only one column of the tab belongs to the marker.
                        adjust_tab = true;
                    }
                }
                _ => {
                    space_after_marker = false;
                    adjust_tab = false;
                }
            }

            let mut offset = initial;
            saved.b_marks.push(state.b_marks[next_line]);
            state.b_marks[next_line] = pos;

            while pos < max {
                let ch = state.byte(pos);
                if !is_space(ch) {
                    break;
                }
                if ch == b'\t' {
                    offset += 4 - (offset + state.bs_count[next_line] + i32::from(adjust_tab)) % 4;
                } else {
                    offset += 1;
                }
                pos += 1;
            }

            last_line_empty = pos >= max;

            saved.bs_count.push(state.bs_count[next_line]);
            state.bs_count[next_line] =
                state.s_count[next_line] + 1 + i32::from(space_after_marker);

            saved.s_count.push(state.s_count[next_line]);
            state.s_count[next_line] = offset - initial;

            saved.t_shift.push(state.t_shift[next_line]);
            state.t_shift[next_line] = pos - state.b_marks[next_line];

            next_line += 1;
            continue;
        }

        // Lazy continuation is not allowed after an empty quoted line.
        if last_line_empty {
            break;
        }

        let terminate = terminators
            .iter()
            .any(|rule| rule(state, next_line, end_line, true).is_match());
        if terminate {
            // Restrict the nested tokenizer to the quoted lines.
            state.line_max = next_line;
            if state.blk_indent != 0 {
                saved.save(state, next_line);
                state.s_count[next_line] -= state.blk_indent;
            }
            break;
        }

        saved.save(state, next_line);
        // Negative indent marks a paragraph continuation line.
        state.s_count[next_line] = -1;
        next_line += 1;
    }

    let old_indent = state.blk_indent;
    state.blk_indent = 0;

    let open_idx = state.tokens.len();
    state.push("blockquote_open", "blockquote", Nesting::Open).markup = ">".to_string();

    md.block.tokenize(state, start_line, next_line);

    state.push("blockquote_close", "blockquote", Nesting::Close).markup = ">".to_string();

    state.line_max = old_line_max;
    state.parent_type = old_parent_type;
    state.tokens[open_idx].map = Some(Span::new(start_line, state.line));

    saved.restore(state, start_line);
    state.blk_indent = old_indent;

    RuleResult::Matched
}
