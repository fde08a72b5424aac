//! Raw HTML blocks, the seven CommonMark start conditions.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::BlockState;
use crate::common::html::{BLOCK_NAMES, HTML_OPEN_CLOSE_TAG_RE};
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

struct HtmlSequence {
    open: Regex,
    close: Regex,
    /// Whether this kind may interrupt a paragraph.
    can_terminate: bool,
}

static HTML_SEQUENCES: LazyLock<Vec<HtmlSequence>> = LazyLock::new(|| {
    let seq = |open: &str, close: &str, can_terminate| HtmlSequence {
        open: Regex::new(open).unwrap(),
        close: Regex::new(close).unwrap(),
        can_terminate,
    };
    vec![
        seq(
            r"(?i)^<(script|pre|style|textarea)(?:\s|>|$)",
            r"(?i)</(script|pre|style|textarea)>",
            true,
        ),
        seq(r"^<!--", r"-->", true),
        seq(r"^<\?", r"\?>", true),
        seq(r"^<![A-Z]", r">", true),
        seq(r"^<!\[CDATA\[", r"\]\]>", true),
        seq(
            &format!(r"(?i)^</?({})(?:\s|/?>|$)", BLOCK_NAMES.join("|")),
            r"^$",
            true,
        ),
        seq(&format!(r"{}\s*$", HTML_OPEN_CLOSE_TAG_RE.as_str()), r"^$", false),
    ]
});

pub(crate) fn html_block(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }
    if !state.md.options.html {
        return RuleResult::NoMatch;
    }

    let src = state.src;
    let pos = state.b_marks[start_line] + state.t_shift[start_line];
    let max = state.e_marks[start_line];
    if state.byte(pos) != b'<' {
        return RuleResult::NoMatch;
    }

    let line_text = &src[pos..max];
    let Some(sequence) = HTML_SEQUENCES.iter().find(|seq| seq.open.is_match(line_text)) else {
        return RuleResult::NoMatch;
    };

    if silent {
        return sequence.can_terminate.into();
    }

    let mut next_line = start_line + 1;

    // Unless the closing condition is on the opening line, scan for it.
    if !sequence.close.is_match(line_text) {
        while next_line < end_line {
            if state.s_count[next_line] < state.blk_indent {
                break;
            }
            let pos = state.b_marks[next_line] + state.t_shift[next_line];
            let max = state.e_marks[next_line];
            let line_text = &src[pos..max];
            if sequence.close.is_match(line_text) {
                if !line_text.is_empty() {
                    next_line += 1;
                }
                break;
            }
            next_line += 1;
        }
    }

    state.line = next_line;
    let content = state.get_lines(start_line, next_line, state.blk_indent.max(0) as usize, true);
    let token = state.push("html_block", "", Nesting::Leaf);
    token.map = Some(Span::new(start_line, next_line));
    token.content = content;
    RuleResult::Matched
}
