//! Run the block tokenizer, or wrap the source in one `inline` token.

use crate::pipeline::CoreState;
use crate::span::Span;
use crate::token::{Nesting, Token};

pub(crate) fn block(state: &mut CoreState<'_>) {
    if state.inline_mode {
        let mut token = Token::new("inline", "", Nesting::Leaf);
        token.content = state.src.clone();
        token.map = Some(Span::new(0, 1));
        state.tokens.push(token);
        return;
    }

    let md = state.md;
    md.block.parse(&state.src, md, &mut *state.env, &mut state.tokens);
}
