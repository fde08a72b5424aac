//! Inline tokenizer and delimiter post-processing.
//!
//! The tokenizer makes one forward pass over the content. Each position is
//! offered to the inline rule chain; if nothing matches, the character joins
//! the pending text buffer. A second chain ("inline2") then pairs emphasis and
//! strikethrough delimiters and tidies the token list.

mod autolink;
mod backticks;
mod balance_pairs;
mod emphasis;
mod entity;
mod escape;
mod fragments_join;
mod html_inline;
mod image;
mod link;
mod linkify;
mod newline;
mod state;
mod strikethrough;
mod text;

use std::sync::Arc;

use tracing::trace;

pub use state::{DelimScan, Delimiter, InlineState};

use crate::common::char_len_at;
use crate::ruler::Ruler;
use crate::token::Token;
use crate::{Env, Markdown, RuleResult};

/// An inline rule: `(state, silent)`.
///
/// In silent mode the rule only advances `state.pos` past what it would
/// consume, without emitting tokens.
pub type InlineRule = Arc<dyn Fn(&mut InlineState<'_>, bool) -> RuleResult + Send + Sync>;

/// A post-processing rule run once after tokenization.
pub type PostProcessRule = Arc<dyn Fn(&mut InlineState<'_>) + Send + Sync>;

/// The inline tokenizer and its two rule registries.
#[derive(Clone)]
pub struct InlineParser {
    /// Tokenizing rules.
    pub ruler: Ruler<InlineRule>,
    /// Post-processing rules.
    pub ruler2: Ruler<PostProcessRule>,
}

impl Default for InlineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineParser {
    /// Create a parser with every built-in inline rule registered.
    pub fn new() -> Self {
        let mut ruler: Ruler<InlineRule> = Ruler::new();
        ruler.push("text", Arc::new(text::text), &[]);
        ruler.push("linkify", Arc::new(linkify::linkify), &[]);
        ruler.push("newline", Arc::new(newline::newline), &[]);
        ruler.push("escape", Arc::new(escape::escape), &[]);
        ruler.push("backticks", Arc::new(backticks::backticks), &[]);
        ruler.push("strikethrough", Arc::new(strikethrough::tokenize), &[]);
        ruler.push("emphasis", Arc::new(emphasis::tokenize), &[]);
        ruler.push("link", Arc::new(link::link), &[]);
        ruler.push("image", Arc::new(image::image), &[]);
        ruler.push("autolink", Arc::new(autolink::autolink), &[]);
        ruler.push("html_inline", Arc::new(html_inline::html_inline), &[]);
        ruler.push("entity", Arc::new(entity::entity), &[]);

        let mut ruler2: Ruler<PostProcessRule> = Ruler::new();
        ruler2.push("balance_pairs", Arc::new(balance_pairs::balance_pairs), &[]);
        ruler2.push("strikethrough", Arc::new(strikethrough::post_process), &[]);
        ruler2.push("emphasis", Arc::new(emphasis::post_process), &[]);
        ruler2.push("fragments_join", Arc::new(fragments_join::fragments_join), &[]);

        Self { ruler, ruler2 }
    }

    /// Advance `state.pos` past one token without emitting anything.
    ///
    /// Used by lookahead such as link label scanning; results are memoized
    /// per start position.
    ///
    /// # Panics
    ///
    /// Panics if a rule reports a match without advancing `state.pos`.
    pub fn skip_token(&self, state: &mut InlineState<'_>) {
        let pos = state.pos;
        if let Some(&end) = state.cache.get(&pos) {
            state.pos = end;
            return;
        }

        let rules = self.ruler.get_rules("");
        let max_nesting = state.md.options.max_nesting;
        let mut matched = false;

        if state.level < max_nesting {
            for rule in rules {
                // Nested constructs count towards the nesting limit even
                // when only probed.
                state.level += 1;
                let result = rule(state, true);
                state.level -= 1;

                if result.is_match() {
                    if pos >= state.pos {
                        panic!("inline rule didn't increment state.pos");
                    }
                    matched = true;
                    break;
                }
            }
        } else {
            // Too deep: treat the rest of the region as text. Nested links
            // and emphasis cannot survive past this point anyway.
            trace!(pos, "inline nesting limit reached while skipping");
            state.pos = state.pos_max;
            matched = true;
        }

        if !matched {
            state.pos += char_len_at(state.src, state.pos);
        }
        state.cache.insert(pos, state.pos);
    }

    /// Tokenize `state.src[state.pos..state.pos_max]`.
    ///
    /// # Panics
    ///
    /// Panics if a rule reports a match without advancing `state.pos`.
    pub fn tokenize(&self, state: &mut InlineState<'_>) {
        let rules = self.ruler.get_rules("");
        let end = state.pos_max;
        let max_nesting = state.md.options.max_nesting;

        while state.pos < end {
            let prev_pos = state.pos;
            let mut matched = false;

            if state.level < max_nesting {
                for rule in rules {
                    if rule(state, false).is_match() {
                        if prev_pos >= state.pos {
                            panic!("inline rule didn't increment state.pos");
                        }
                        matched = true;
                        break;
                    }
                }
            }

            if matched {
                if state.pos >= end {
                    break;
                }
                continue;
            }

            let len = char_len_at(state.src, state.pos);
            let next = (state.pos + len).min(end);
            state.pending.push_str(&state.src[state.pos..next]);
            state.pos = next;
        }

        if !state.pending.is_empty() {
            state.push_pending();
        }
    }

    /// Tokenize `src` and run the post-processing chain, appending to `out`.
    pub fn parse(&self, src: &str, md: &Markdown, env: &mut Env, out: &mut Vec<Token>) {
        self.parse_nested(src, md, env, out, 0);
    }

    /// Like [`InlineParser::parse`], for content nested `level` deep inside
    /// another inline run (image alt text). The nesting limit counts from
    /// there; `fragments_join` resets token levels to start at 0.
    pub(crate) fn parse_nested(
        &self,
        src: &str,
        md: &Markdown,
        env: &mut Env,
        out: &mut Vec<Token>,
        level: usize,
    ) {
        let mut state = InlineState::new(src, md, env, std::mem::take(out));
        state.level = level;
        state.pending_level = level;
        self.tokenize(&mut state);

        for rule in self.ruler2.get_rules("") {
            rule(&mut state);
        }

        *out = state.tokens;
    }
}
