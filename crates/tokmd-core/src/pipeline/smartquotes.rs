//! Curly quotes and apostrophes.
//!
//! Quotes pair up per nesting level with a stack of candidate openers; a
//! quote that cannot open or close inside a word becomes an apostrophe.

use crate::common::{is_md_ascii_punct, is_punct_char, is_whitespace};
use crate::pipeline::CoreState;
use crate::token::Token;

const APOSTROPHE: &str = "\u{2019}";

struct OpenQuote {
    token: usize,
    pos: usize,
    single: bool,
    level: usize,
}

fn replace_at(s: &mut String, index: usize, with: &str) {
    s.replace_range(index..index + 1, with);
}

fn is_break(token: &Token) -> bool {
    token.kind == "softbreak" || token.kind == "hardbreak"
}

/// Last char before the quote, looking back across tokens up to a line break.
fn last_char(tokens: &[Token], i: usize, index: usize) -> char {
    if let Some(c) = tokens[i].content[..index].chars().next_back() {
        return c;
    }
    for token in tokens[..i].iter().rev() {
        if is_break(token) {
            break;
        }
        if let Some(c) = token.content.chars().next_back() {
            return c;
        }
    }
    ' '
}

/// First char after the quote, looking ahead across tokens up to a line break.
fn next_char(tokens: &[Token], i: usize, pos: usize) -> char {
    if let Some(c) = tokens[i].content[pos..].chars().next() {
        return c;
    }
    for token in &tokens[i + 1..] {
        if is_break(token) {
            break;
        }
        if let Some(c) = token.content.chars().next() {
            return c;
        }
    }
    ' '
}

fn process_inlines(tokens: &mut [Token], quotes: &[String; 4]) {
    let mut stack: Vec<OpenQuote> = Vec::new();

    for i in 0..tokens.len() {
        let this_level = tokens[i].level;
        while stack.last().is_some_and(|q| q.level > this_level) {
            stack.pop();
        }
        if tokens[i].kind != "text" {
            continue;
        }

        let mut pos = 0;
        'outer: while pos < tokens[i].content.len() {
            let Some(offset) = tokens[i].content[pos..].find(['\'', '"']) else {
                break;
            };
            let index = pos + offset;
            let is_single = tokens[i].content.as_bytes()[index] == b'\'';
            pos = index + 1;

            let last = last_char(tokens, i, index);
            let next = next_char(tokens, i, pos);

            let is_last_punct = is_md_ascii_punct(last) || is_punct_char(last);
            let is_next_punct = is_md_ascii_punct(next) || is_punct_char(next);
            let is_last_whitespace = is_whitespace(last);
            let is_next_whitespace = is_whitespace(next);

            let mut can_open =
                !is_next_whitespace && (!is_next_punct || is_last_whitespace || is_last_punct);
            let mut can_close =
                !is_last_whitespace && (!is_last_punct || is_next_whitespace || is_next_punct);

            // 1"" - the first quote is an inch mark.
            if next == '"' && !is_single && last.is_ascii_digit() {
                can_open = false;
                can_close = false;
            }

            if can_open && can_close {
                // Inside punctuation runs only: `foo-"-bar-"-baz`.
                can_open = is_last_punct;
                can_close = is_next_punct;
            }

            if !can_open && !can_close {
                if is_single {
                    replace_at(&mut tokens[i].content, index, APOSTROPHE);
                    pos += APOSTROPHE.len() - 1;
                }
                continue;
            }

            if can_close {
                let mut j = stack.len();
                while j > 0 {
                    j -= 1;
                    if stack[j].level < this_level {
                        break;
                    }
                    if stack[j].single != is_single || stack[j].level != this_level {
                        continue;
                    }

                    let (open, close) = if is_single {
                        (&quotes[2], &quotes[3])
                    } else {
                        (&quotes[0], &quotes[1])
                    };
                    let opener = &stack[j];

                    // Closer first: the opener sits earlier, possibly in the
                    // same token, and its index must stay valid.
                    replace_at(&mut tokens[i].content, index, close);
                    replace_at(&mut tokens[opener.token].content, opener.pos, open);

                    pos += close.len() - 1;
                    if opener.token == i {
                        pos += open.len() - 1;
                    }
                    stack.truncate(j);
                    continue 'outer;
                }
            }

            if can_open {
                stack.push(OpenQuote {
                    token: i,
                    pos: index,
                    single: is_single,
                    level: this_level,
                });
            } else if can_close && is_single {
                replace_at(&mut tokens[i].content, index, APOSTROPHE);
                pos += APOSTROPHE.len() - 1;
            }
        }
    }
}

pub(crate) fn smartquotes(state: &mut CoreState<'_>) {
    let options = &state.md.options;
    if !options.typographer {
        return;
    }

    for token in state.tokens.iter_mut().rev() {
        if token.kind != "inline" || !token.content.contains(['\'', '"']) {
            continue;
        }
        process_inlines(&mut token.children, &options.quotes);
    }
}
