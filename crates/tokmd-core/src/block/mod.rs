//! Block-level tokenizer.
//!
//! Drives [`BlockState`] through the block rule chain one line range at a
//! time. Container rules (blockquote, list) re-enter [`BlockParser::tokenize`]
//! over the lines they own.

mod blockquote;
mod code;
mod fence;
mod heading;
mod hr;
mod html_block;
mod lheading;
mod list;
mod paragraph;
mod reference;
mod state;
mod table;

use std::sync::Arc;

use tracing::trace;

pub use state::BlockState;

use crate::ruler::Ruler;
use crate::token::Token;
use crate::{Env, Markdown, RuleResult};

/// A block rule: `(state, start_line, end_line, silent)`.
///
/// In silent mode the rule only reports whether it would match and must not
/// emit tokens or move `state.line`.
pub type BlockRule =
    Arc<dyn Fn(&mut BlockState<'_>, usize, usize, bool) -> RuleResult + Send + Sync>;

/// The block tokenizer and its rule registry.
#[derive(Clone)]
pub struct BlockParser {
    /// Block rules in precedence order.
    pub ruler: Ruler<BlockRule>,
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser {
    /// Create a parser with every built-in block rule registered.
    pub fn new() -> Self {
        let mut ruler: Ruler<BlockRule> = Ruler::new();
        ruler.push("table", Arc::new(table::table), &["paragraph", "reference"]);
        ruler.push("code", Arc::new(code::code), &[]);
        ruler.push(
            "fence",
            Arc::new(fence::fence),
            &["paragraph", "reference", "blockquote", "list"],
        );
        ruler.push(
            "blockquote",
            Arc::new(blockquote::blockquote),
            &["paragraph", "reference", "blockquote", "list"],
        );
        ruler.push("hr", Arc::new(hr::hr), &["paragraph", "reference", "blockquote", "list"]);
        ruler.push("list", Arc::new(list::list), &["paragraph", "reference", "blockquote"]);
        ruler.push("reference", Arc::new(reference::reference), &[]);
        ruler.push(
            "html_block",
            Arc::new(html_block::html_block),
            &["paragraph", "reference", "blockquote"],
        );
        ruler.push(
            "heading",
            Arc::new(heading::heading),
            &["paragraph", "reference", "blockquote"],
        );
        ruler.push("lheading", Arc::new(lheading::lheading), &[]);
        ruler.push("paragraph", Arc::new(paragraph::paragraph), &[]);
        Self { ruler }
    }

    /// Tokenize lines `[start_line, end_line)`.
    ///
    /// # Panics
    ///
    /// Panics if a rule reports a match without advancing `state.line`, or if
    /// no rule matches a line. Neither happens with the built-in rules.
    pub fn tokenize(&self, state: &mut BlockState<'_>, start_line: usize, end_line: usize) {
        let rules = self.ruler.get_rules("");
        let max_nesting = state.md.options.max_nesting;
        let mut line = start_line;
        let mut has_empty_lines = false;

        while line < end_line {
            line = state.skip_empty_lines(line);
            state.line = line;
            if line >= end_line {
                break;
            }

            // Outdented past the container: the caller owns the rest.
            if state.s_count[line] < state.blk_indent {
                break;
            }

            if state.level >= max_nesting {
                trace!(line, level = state.level, "block nesting limit reached");
                state.line = end_line;
                break;
            }

            let prev_line = state.line;
            let mut matched = false;
            for rule in rules {
                if rule(state, line, end_line, false).is_match() {
                    if prev_line >= state.line {
                        panic!("block rule didn't increment state.line");
                    }
                    matched = true;
                    break;
                }
            }
            if !matched {
                panic!("none of the block rules matched");
            }

            state.tight = !has_empty_lines;

            // A trailing blank line inside the block makes the next one loose.
            if state.line > 0 && state.is_empty(state.line - 1) {
                has_empty_lines = true;
            }

            line = state.line;
            if line < end_line && state.is_empty(line) {
                has_empty_lines = true;
                line += 1;
                state.line = line;
            }
        }
    }

    /// Tokenize a whole source string, appending to `tokens`.
    pub fn parse(&self, src: &str, md: &Markdown, env: &mut Env, tokens: &mut Vec<Token>) {
        if src.is_empty() {
            return;
        }
        let mut state = BlockState::new(src, md, env, std::mem::take(tokens));
        let (start, end) = (state.line, state.line_max);
        self.tokenize(&mut state, start, end);
        *tokens = state.tokens;
    }
}
