//! GFM pipe tables.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::BlockState;
use crate::common::is_space;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

/// Cap on cells filled in for short rows, against quadratic blowup.
const MAX_AUTOCOMPLETED_CELLS: i64 = 0x10000;

static ALIGN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    None,
    Left,
    Center,
    Right,
}

impl Align {
    fn style(self) -> Option<&'static str> {
        match self {
            Align::None => None,
            Align::Left => Some("text-align:left"),
            Align::Center => Some("text-align:center"),
            Align::Right => Some("text-align:right"),
        }
    }
}

fn get_line<'s>(state: &BlockState<'s>, line: usize) -> &'s str {
    let pos = state.b_marks[line] + state.t_shift[line];
    let max = state.e_marks[line];
    let src: &'s str = state.src;
    &src[pos..max]
}

/// Split a row on unescaped pipes. `\|` becomes a literal pipe.
fn escaped_split(s: &str) -> Vec<String> {
    let bytes = s.as_bytes();
    let mut result = Vec::new();
    let mut current = String::new();
    let mut last_pos = 0;
    let mut is_escaped = false;

    for (pos, &ch) in bytes.iter().enumerate() {
        if ch == b'|' {
            if !is_escaped {
                current.push_str(&s[last_pos..pos]);
                result.push(std::mem::take(&mut current));
                last_pos = pos + 1;
            } else {
                // Drop the backslash, keep the pipe.
                current.push_str(&s[last_pos..pos - 1]);
                last_pos = pos;
            }
        }
        is_escaped = ch == b'\\';
    }

    current.push_str(&s[last_pos..]);
    result.push(current);
    result
}

/// Split a row and drop the empty cells produced by leading/trailing pipes.
fn split_row(line: &str) -> Vec<String> {
    let mut columns = escaped_split(line);
    if columns.first().is_some_and(|c| c.is_empty()) {
        columns.remove(0);
    }
    if columns.last().is_some_and(|c| c.is_empty()) {
        columns.pop();
    }
    columns
}

pub(crate) fn table(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    silent: bool,
) -> RuleResult {
    // A table needs at least a header and a delimiter row.
    if start_line + 2 > end_line {
        return RuleResult::NoMatch;
    }

    let mut next_line = start_line + 1;
    if state.s_count[next_line] < state.blk_indent {
        return RuleResult::NoMatch;
    }
    if state.s_count[next_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    // The delimiter row may only hold `|`, `-`, `:` and spaces; check the
    // first two chars quickly before splitting.
    let mut pos = state.b_marks[next_line] + state.t_shift[next_line];
    let delim_max = state.e_marks[next_line];
    if pos >= delim_max {
        return RuleResult::NoMatch;
    }
    let first_ch = state.byte(pos);
    pos += 1;
    if !matches!(first_ch, b'|' | b'-' | b':') {
        return RuleResult::NoMatch;
    }
    if pos >= delim_max {
        return RuleResult::NoMatch;
    }
    let second_ch = state.byte(pos);
    pos += 1;
    if !matches!(second_ch, b'|' | b'-' | b':') && !is_space(second_ch) {
        return RuleResult::NoMatch;
    }
    // `-` followed by a space is a bullet list, not a delimiter row.
    if first_ch == b'-' && is_space(second_ch) {
        return RuleResult::NoMatch;
    }
    while pos < delim_max {
        let ch = state.byte(pos);
        if !matches!(ch, b'|' | b'-' | b':') && !is_space(ch) {
            return RuleResult::NoMatch;
        }
        pos += 1;
    }

    let delimiter_row = get_line(state, start_line + 1);
    let cells: Vec<&str> = delimiter_row.split('|').collect();
    let mut aligns = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let t = cell.trim();
        if t.is_empty() {
            // Leading and trailing pipes yield empty edge cells.
            if i == 0 || i == cells.len() - 1 {
                continue;
            }
            return RuleResult::NoMatch;
        }
        if !ALIGN_RE.is_match(t) {
            return RuleResult::NoMatch;
        }
        let starts = t.starts_with(':');
        let ends = t.ends_with(':');
        aligns.push(match (starts, ends) {
            (true, true) => Align::Center,
            (false, true) => Align::Right,
            (true, false) => Align::Left,
            (false, false) => Align::None,
        });
    }

    let header = get_line(state, start_line).trim();
    if !header.contains('|') {
        return RuleResult::NoMatch;
    }
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    let columns = split_row(header);
    let column_count = columns.len();
    if column_count == 0 || column_count != aligns.len() {
        return RuleResult::NoMatch;
    }
    if silent {
        return RuleResult::Matched;
    }

    let old_parent_type = state.parent_type;
    state.parent_type = "table";

    // Rows end where a blockquote-terminating construct begins.
    let md = state.md;
    let terminators = md.block.ruler.get_rules("blockquote");

    let table_idx = state.tokens.len();
    state.push("table_open", "table", Nesting::Open);
    state.push("thead_open", "thead", Nesting::Open).map =
        Some(Span::new(start_line, start_line + 1));
    state.push("tr_open", "tr", Nesting::Open).map = Some(Span::new(start_line, start_line + 1));

    for (i, column) in columns.iter().enumerate() {
        let th = state.push("th_open", "th", Nesting::Open);
        if let Some(style) = aligns[i].style() {
            th.attr_push("style", style);
        }
        state.push("inline", "", Nesting::Leaf).content = column.trim().to_string();
        state.push("th_close", "th", Nesting::Close);
    }

    state.push("tr_close", "tr", Nesting::Close);
    state.push("thead_close", "thead", Nesting::Close);

    let mut tbody_idx = None;
    let mut autocompleted_cells: i64 = 0;

    next_line = start_line + 2;
    while next_line < end_line {
        if state.s_count[next_line] < state.blk_indent {
            break;
        }

        let terminate = terminators
            .iter()
            .any(|rule| rule(state, next_line, end_line, true).is_match());
        if terminate {
            break;
        }

        let line = get_line(state, next_line).trim();
        if line.is_empty() {
            break;
        }
        if state.s_count[next_line] - state.blk_indent >= 4 {
            break;
        }

        let columns = split_row(line);
        autocompleted_cells += column_count as i64 - columns.len() as i64;
        if autocompleted_cells > MAX_AUTOCOMPLETED_CELLS {
            break;
        }

        if tbody_idx.is_none() {
            tbody_idx = Some(state.tokens.len());
            state.push("tbody_open", "tbody", Nesting::Open);
        }

        state.push("tr_open", "tr", Nesting::Open).map = Some(Span::new(next_line, next_line + 1));
        for (i, align) in aligns.iter().enumerate().take(column_count) {
            let td = state.push("td_open", "td", Nesting::Open);
            if let Some(style) = align.style() {
                td.attr_push("style", style);
            }
            let content = columns.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
            state.push("inline", "", Nesting::Leaf).content = content;
            state.push("td_close", "td", Nesting::Close);
        }
        state.push("tr_close", "tr", Nesting::Close);

        next_line += 1;
    }

    if let Some(idx) = tbody_idx {
        state.push("tbody_close", "tbody", Nesting::Close);
        state.tokens[idx].map = Some(Span::new(start_line + 2, next_line));
    }
    state.push("table_close", "table", Nesting::Close);
    state.tokens[table_idx].map = Some(Span::new(start_line, next_line));

    state.parent_type = old_parent_type;
    state.line = next_line;
    RuleResult::Matched
}
