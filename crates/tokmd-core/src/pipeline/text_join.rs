//! Fold `text_special` tokens back into plain text.
//!
//! Escapes and entities stay separate until here so earlier passes
//! (linkify, typographer) leave them alone.

use crate::pipeline::CoreState;
use crate::token::Token;

fn join(tokens: &mut Vec<Token>) {
    for token in tokens.iter_mut() {
        if token.kind == "text_special" {
            token.kind = "text";
        }
        if token.kind == "image" {
            join(&mut token.children);
        }
    }

    let mut joined: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens.drain(..) {
        if token.kind == "text" {
            if let Some(prev) = joined.last_mut().filter(|t| t.kind == "text") {
                prev.content.push_str(&token.content);
                continue;
            }
        }
        joined.push(token);
    }
    *tokens = joined;
}

pub(crate) fn text_join(state: &mut CoreState<'_>) {
    for token in state.tokens.iter_mut().filter(|t| t.kind == "inline") {
        join(&mut token.children);
    }
}
