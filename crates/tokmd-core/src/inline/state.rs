//! Character-oriented state for inline parsing.

use std::collections::HashMap;

use crate::common::{is_punctuation, is_whitespace};
use crate::token::{Nesting, Token};
use crate::{Env, Markdown};

/// One emphasis or strikethrough marker awaiting a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    /// Marker byte: `*`, `_` or `~`.
    pub marker: u8,
    /// Length of the whole run, for the rule of 3. Zero disables the check.
    pub length: usize,
    /// Index of the placeholder text token for this marker.
    pub token: usize,
    /// Index of the matching closer in the same delimiter list.
    pub end: Option<usize>,
    /// Whether this run can open a span.
    pub open: bool,
    /// Whether this run can close a span.
    pub close: bool,
}

/// Result of [`InlineState::scan_delims`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimScan {
    /// Left-flanking under the marker's rules.
    pub can_open: bool,
    /// Right-flanking under the marker's rules.
    pub can_close: bool,
    /// Number of marker characters in the run.
    pub length: usize,
}

/// Parser state for one inline content string.
///
/// Delimiters live in separate lists, one per nesting level opened by a
/// token (links, images). List 0 holds top-level markers; `tokens_meta`
/// records which list each opening token started, so post-processing can
/// visit them all and markers never pair across a link boundary.
pub struct InlineState<'a> {
    /// The inline content being parsed.
    pub src: &'a str,
    /// The owning parser.
    pub md: &'a Markdown,
    /// Per-document environment (reference definitions).
    pub env: &'a mut Env,
    /// Output token sink.
    pub tokens: Vec<Token>,
    /// For each token, the delimiter list it opened.
    pub tokens_meta: Vec<Option<usize>>,

    /// Current byte offset.
    pub pos: usize,
    /// End of the region being tokenized.
    pub pos_max: usize,
    /// Current nesting level.
    pub level: usize,
    /// Text not yet flushed into a token.
    pub pending: String,
    /// Level of the pending text.
    pub pending_level: usize,
    /// Memo for `skip_token`: start position to end position.
    pub cache: HashMap<usize, usize>,

    /// All delimiter lists of this content.
    pub delimiter_lists: Vec<Vec<Delimiter>>,
    /// Index of the list new delimiters go to.
    pub current_delimiters: usize,
    /// Lists suspended by opening tokens.
    pub prev_delimiters: Vec<usize>,

    /// Position of the last backtick run of each length.
    pub backticks: HashMap<usize, usize>,
    /// Whether `backticks` covers the whole content.
    pub backticks_scanned: bool,
    /// Depth inside links, to forbid nesting them.
    pub link_level: usize,
}

impl<'a> InlineState<'a> {
    /// Create a state over `src`, appending to `tokens`.
    pub fn new(src: &'a str, md: &'a Markdown, env: &'a mut Env, tokens: Vec<Token>) -> Self {
        let tokens_meta = vec![None; tokens.len()];
        Self {
            src,
            md,
            env,
            tokens,
            tokens_meta,
            pos: 0,
            pos_max: src.len(),
            level: 0,
            pending: String::new(),
            pending_level: 0,
            cache: HashMap::new(),
            delimiter_lists: vec![Vec::new()],
            current_delimiters: 0,
            prev_delimiters: Vec::new(),
            backticks: HashMap::new(),
            backticks_scanned: false,
            link_level: 0,
        }
    }

    /// Byte at `pos`, or 0 past the end.
    #[inline]
    pub fn byte(&self, pos: usize) -> u8 {
        self.src.as_bytes().get(pos).copied().unwrap_or(0)
    }

    /// The delimiter list markers currently go to.
    pub fn delimiters(&mut self) -> &mut Vec<Delimiter> {
        &mut self.delimiter_lists[self.current_delimiters]
    }

    /// Flush pending text into a `text` token.
    pub fn push_pending(&mut self) -> &mut Token {
        let mut token = Token::new("text", "", Nesting::Leaf);
        token.content = std::mem::take(&mut self.pending);
        token.level = self.pending_level;
        self.tokens.push(token);
        self.tokens_meta.push(None);
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    /// Append a token, flushing pending text first.
    ///
    /// Opening tokens start a fresh delimiter list; closing tokens return to
    /// the list that was active before the matching opener.
    pub fn push(&mut self, kind: &'static str, tag: &'static str, nesting: Nesting) -> &mut Token {
        if !self.pending.is_empty() {
            self.push_pending();
        }

        let mut token = Token::new(kind, tag, nesting);
        let mut meta = None;

        if nesting == Nesting::Close {
            self.level = self.level.saturating_sub(1);
            self.current_delimiters = self.prev_delimiters.pop().unwrap_or(0);
        }
        token.level = self.level;
        if nesting == Nesting::Open {
            self.level += 1;
            self.prev_delimiters.push(self.current_delimiters);
            self.delimiter_lists.push(Vec::new());
            self.current_delimiters = self.delimiter_lists.len() - 1;
            meta = Some(self.current_delimiters);
        }

        self.pending_level = self.level;
        self.tokens.push(token);
        self.tokens_meta.push(meta);
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    /// Classify the delimiter run starting at `start`.
    ///
    /// `can_split_word` is true for `*` and `~`, false for `_`, which may not
    /// open or close inside a word.
    pub fn scan_delims(&self, start: usize, can_split_word: bool) -> DelimScan {
        let max = self.pos_max;
        let marker = self.byte(start);

        let last_char = self.src[..start].chars().next_back().unwrap_or(' ');

        let mut pos = start;
        while pos < max && self.byte(pos) == marker {
            pos += 1;
        }
        let count = pos - start;

        let next_char = if pos < max {
            self.src[pos..].chars().next().unwrap_or(' ')
        } else {
            ' '
        };

        let is_last_punct = is_punctuation(last_char);
        let is_next_punct = is_punctuation(next_char);
        let is_last_whitespace = is_whitespace(last_char);
        let is_next_whitespace = is_whitespace(next_char);

        let left_flanking =
            !is_next_whitespace && (!is_next_punct || is_last_whitespace || is_last_punct);
        let right_flanking =
            !is_last_whitespace && (!is_last_punct || is_next_whitespace || is_next_punct);

        DelimScan {
            can_open: left_flanking && (can_split_word || !right_flanking || is_last_punct),
            can_close: right_flanking && (can_split_word || !left_flanking || is_next_punct),
            length: count,
        }
    }
}
