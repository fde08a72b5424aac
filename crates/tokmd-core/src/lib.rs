//! # tokmd core
//!
//! A rule-based Markdown compiler producing a flat token stream.
//!
//! Parsing runs in three stages, each driven by a [`Ruler`](ruler::Ruler) of
//! named rules: the core chain normalizes input and sequences the rest, the
//! block engine splits the document into block tokens, and the inline engine
//! tokenizes the text of each block. Tokens render to HTML through a
//! per-kind rule table.
//!
//! ## Quick Start
//!
//! ```rust
//! use tokmd_core::Markdown;
//!
//! let md = Markdown::new();
//! let html = md.render("# Hello\n\nSome *emphasis*.");
//! assert_eq!(html, "<h1>Hello</h1>\n<p>Some <em>emphasis</em>.</p>\n");
//! ```
//!
//! ## Tokens
//!
//! ```rust
//! use tokmd_core::{Env, Markdown};
//!
//! let md = Markdown::new();
//! let mut env = Env::default();
//! let tokens = md.parse("**bold**", &mut env);
//!
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(kinds, ["paragraph_open", "inline", "paragraph_close"]);
//! assert_eq!(tokens[1].children.len(), 3);
//! ```
//!
//! ## Presets
//!
//! - `Preset::Default` - every rule, typographer and linkify off
//! - `Preset::CommonMark` - CommonMark rules only, raw HTML on
//! - `Preset::Zero` - paragraphs and text; enable what you need

pub mod block;
pub mod common;
pub mod error;
pub mod inline;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod ruler;
pub mod span;
pub mod token;

use std::collections::HashMap;

use tracing::debug;

pub use error::RulerError;
pub use options::{Highlighter, Options, Preset};
pub use render::Renderer;
pub use token::{Nesting, Token};

use crate::block::BlockParser;
use crate::pipeline::{CoreParser, CoreState};
use crate::inline::InlineParser;

/// Outcome of offering input to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleResult {
    /// The rule consumed input (or, when probing, would have).
    Matched,
    /// The rule does not apply here.
    NoMatch,
}

impl RuleResult {
    /// Whether the rule matched.
    #[inline]
    pub fn is_match(self) -> bool {
        self == RuleResult::Matched
    }
}

impl From<bool> for RuleResult {
    #[inline]
    fn from(matched: bool) -> Self {
        if matched {
            RuleResult::Matched
        } else {
            RuleResult::NoMatch
        }
    }
}

/// A link reference definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reference {
    /// Normalized destination.
    pub href: String,
    /// Title, empty when absent.
    pub title: String,
}

/// Per-document state shared between the block and inline stages.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Env {
    /// Reference definitions keyed by normalized label. The first
    /// definition of a label wins.
    pub references: HashMap<String, Reference>,
}

/// A configured parser and renderer.
///
/// Parsing takes `&self`, so one instance can serve many documents, across
/// threads if needed. Configuration (options, rule toggles, plugins) needs
/// `&mut self`.
#[derive(Clone)]
pub struct Markdown {
    /// Parse and render options.
    pub options: Options,
    /// The core chain.
    pub core: CoreParser,
    /// The block engine.
    pub block: BlockParser,
    /// The inline engine.
    pub inline: InlineParser,
    /// The HTML renderer.
    pub renderer: Renderer,
    /// Accept or reject a normalized link destination.
    pub validate_link: fn(&str) -> bool,
    /// Encode a link destination for output.
    pub normalize_link: fn(&str) -> String,
    /// Decode a link destination for display as text.
    pub normalize_link_text: fn(&str) -> String,
}

impl std::fmt::Debug for Markdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Markdown")
            .field("options", &self.options)
            .field("core", &self.core.ruler)
            .field("block", &self.block.ruler)
            .field("inline", &self.inline.ruler)
            .field("inline2", &self.inline.ruler2)
            .finish_non_exhaustive()
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Markdown {
    /// A parser with the default preset.
    pub fn new() -> Self {
        Self {
            options: Options::default(),
            core: CoreParser::new(),
            block: BlockParser::new(),
            inline: InlineParser::new(),
            renderer: Renderer::new(),
            validate_link: common::url::validate_link,
            normalize_link: common::url::normalize_link,
            normalize_link_text: common::url::normalize_link_text,
        }
    }

    /// A parser configured by `preset`: its options and its rule selection.
    pub fn with_preset(preset: Preset) -> Self {
        let mut md = Self::new();
        md.options = preset.options();
        if let Some(rules) = preset.rules() {
            // Every preset name is registered, so nothing can be missing.
            let _ = md.core.ruler.enable_only(rules.core, true);
            let _ = md.block.ruler.enable_only(rules.block, true);
            let _ = md.inline.ruler.enable_only(rules.inline, true);
            let _ = md.inline.ruler2.enable_only(rules.inline2, true);
        }
        md
    }

    /// Replace the options.
    pub fn set_options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    fn toggle(
        &mut self,
        names: &[&str],
        enabled: bool,
        ignore_invalid: bool,
    ) -> Result<&mut Self, RulerError> {
        // Each ruler ignores names it lacks; only names found nowhere count.
        let results = if enabled {
            [
                self.core.ruler.enable(names, true),
                self.block.ruler.enable(names, true),
                self.inline.ruler.enable(names, true),
                self.inline.ruler2.enable(names, true),
            ]
        } else {
            [
                self.core.ruler.disable(names, true),
                self.block.ruler.disable(names, true),
                self.inline.ruler.disable(names, true),
                self.inline.ruler2.disable(names, true),
            ]
        };
        let found: Vec<String> = results.into_iter().flat_map(Result::unwrap_or_default).collect();

        if !ignore_invalid {
            if let Some(missing) = names.iter().find(|n| !found.iter().any(|f| f == *n)) {
                return Err(RulerError::unknown_rule(*missing));
            }
        }
        Ok(self)
    }

    /// Enable rules by name in every chain that has them.
    ///
    /// A name registered in no chain is an error unless `ignore_invalid`.
    pub fn enable(
        &mut self,
        names: &[&str],
        ignore_invalid: bool,
    ) -> Result<&mut Self, RulerError> {
        self.toggle(names, true, ignore_invalid)
    }

    /// Disable rules by name in every chain that has them.
    pub fn disable(
        &mut self,
        names: &[&str],
        ignore_invalid: bool,
    ) -> Result<&mut Self, RulerError> {
        self.toggle(names, false, ignore_invalid)
    }

    /// Apply a plugin: any function that reconfigures the parser.
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Markdown),
    {
        plugin(self);
        self
    }

    fn run(&self, src: &str, env: &mut Env, inline_mode: bool) -> Vec<Token> {
        debug!(bytes = src.len(), inline_mode, "parse started");
        let mut state = CoreState::new(src, self, env);
        state.inline_mode = inline_mode;
        self.core.process(&mut state);
        state.tokens
    }

    /// Parse a document into block tokens with inline children.
    ///
    /// `env` receives reference definitions and can be inspected afterwards.
    pub fn parse(&self, src: &str, env: &mut Env) -> Vec<Token> {
        self.run(src, env, false)
    }

    /// Parse `src` as a single inline run: one `inline` token, no blocks.
    pub fn parse_inline(&self, src: &str, env: &mut Env) -> Vec<Token> {
        self.run(src, env, true)
    }

    /// Parse and render a document to HTML.
    pub fn render(&self, src: &str) -> String {
        let mut env = Env::default();
        let tokens = self.parse(src, &mut env);
        self.renderer.render(&tokens, &self.options, &env)
    }

    /// Parse and render `src` as inline content, without a paragraph wrapper.
    pub fn render_inline(&self, src: &str) -> String {
        let mut env = Env::default();
        let tokens = self.parse_inline(src, &mut env);
        self.renderer.render(&tokens, &self.options, &env)
    }
}
