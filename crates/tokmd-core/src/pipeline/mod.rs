//! The top-level pipeline.
//!
//! Core rules run once per document, in order: normalize the source, build
//! block tokens, tokenize every `inline` placeholder, then the typographic
//! and linkify passes over the finished stream.

mod block;
mod inline;
mod linkify;
mod normalize;
mod replacements;
mod smartquotes;
mod text_join;

use std::sync::Arc;

use tracing::debug;

use crate::ruler::Ruler;
use crate::token::Token;
use crate::{Env, Markdown};

/// A core rule, run once over the whole document.
pub type CoreRule = Arc<dyn Fn(&mut CoreState<'_>) + Send + Sync>;

/// Document-level state threaded through the core chain.
pub struct CoreState<'a> {
    /// Source text; `normalize` rewrites it in place.
    pub src: String,
    /// The owning parser.
    pub md: &'a Markdown,
    /// Per-document environment.
    pub env: &'a mut Env,
    /// The token stream.
    pub tokens: Vec<Token>,
    /// Parse `src` as a single inline run instead of blocks.
    pub inline_mode: bool,
}

impl<'a> CoreState<'a> {
    /// Create a state for one parse of `src`.
    pub fn new(src: &str, md: &'a Markdown, env: &'a mut Env) -> Self {
        Self {
            src: src.to_string(),
            md,
            env,
            tokens: Vec::new(),
            inline_mode: false,
        }
    }
}

/// The core chain.
#[derive(Clone)]
pub struct CoreParser {
    /// Core rules in execution order.
    pub ruler: Ruler<CoreRule>,
}

impl Default for CoreParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreParser {
    /// Create the chain with every built-in core rule.
    pub fn new() -> Self {
        let mut ruler: Ruler<CoreRule> = Ruler::new();
        ruler.push("normalize", Arc::new(normalize::normalize), &[]);
        ruler.push("block", Arc::new(block::block), &[]);
        ruler.push("inline", Arc::new(inline::inline), &[]);
        ruler.push("linkify", Arc::new(linkify::linkify), &[]);
        ruler.push("replacements", Arc::new(replacements::replace), &[]);
        ruler.push("smartquotes", Arc::new(smartquotes::smartquotes), &[]);
        ruler.push("text_join", Arc::new(text_join::text_join), &[]);
        Self { ruler }
    }

    /// Run every enabled core rule over `state`.
    pub fn process(&self, state: &mut CoreState<'_>) {
        for rule in self.ruler.get_rules("") {
            rule(state);
        }
        debug!(
            bytes = state.src.len(),
            tokens = state.tokens.len(),
            inline_mode = state.inline_mode,
            "core pipeline finished"
        );
    }
}
