//! Merge adjacent text left behind by unmatched delimiters and fix levels.

use crate::inline::InlineState;
use crate::token::{Nesting, Token};

/// Join adjacent `text` tokens, drop empty ones, and recompute `level`
/// now that placeholders have become open/close tokens.
pub(crate) fn fragments_join(state: &mut InlineState<'_>) {
    let mut level = 0usize;
    let mut joined: Vec<Token> = Vec::with_capacity(state.tokens.len());

    for mut token in state.tokens.drain(..) {
        if token.nesting == Nesting::Close {
            level = level.saturating_sub(1);
        }
        token.level = level;
        if token.nesting == Nesting::Open {
            level += 1;
        }

        if token.kind == "text" {
            if token.content.is_empty() {
                continue;
            }
            if let Some(prev) = joined.last_mut().filter(|t| t.kind == "text") {
                prev.content.push_str(&token.content);
                continue;
            }
        }
        joined.push(token);
    }

    state.tokens = joined;
}
