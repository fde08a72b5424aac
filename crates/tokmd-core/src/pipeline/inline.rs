//! Tokenize every `inline` placeholder into its children.

use crate::pipeline::CoreState;

pub(crate) fn inline(state: &mut CoreState<'_>) {
    let md = state.md;
    for token in state.tokens.iter_mut().filter(|t| t.kind == "inline") {
        md.inline.parse(&token.content, md, &mut *state.env, &mut token.children);
    }
}
