//! Turn bare URLs, `www.` hosts and email addresses in text into links.
//!
//! Scans each inline run backwards and splices all replacements in one
//! rebuild of the token list. Text inside Markdown links and raw `<a>`
//! elements is left alone.

use crate::common::html::{is_link_close, is_link_open};
use crate::common::linkify::{find_all, pretest};
use crate::pipeline::CoreState;
use crate::token::{Nesting, Token};
use crate::Markdown;

fn text_token(content: &str, level: usize) -> Token {
    let mut token = Token::new("text", "", Nesting::Leaf);
    token.content = content.to_string();
    token.level = level;
    token
}

/// Link text as displayed, without the scheme the matcher added.
fn display_text(md: &Markdown, schema: &str, text: &str) -> String {
    if schema.is_empty() {
        let decoded = (md.normalize_link_text)(&format!("http://{text}"));
        decoded.strip_prefix("http://").unwrap_or(&decoded).to_string()
    } else if schema == "mailto:"
        && !text.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("mailto:"))
    {
        let decoded = (md.normalize_link_text)(&format!("mailto:{text}"));
        decoded.strip_prefix("mailto:").unwrap_or(&decoded).to_string()
    } else {
        (md.normalize_link_text)(text)
    }
}

fn linkify_children(md: &Markdown, tokens: &mut Vec<Token>) {
    let mut html_link_level = 0usize;
    // Replacement runs by token index, collected back to front.
    let mut replacements: Vec<(usize, Vec<Token>)> = Vec::new();
    let mut i = tokens.len();

    while i > 0 {
        i -= 1;

        // Skip the contents of Markdown links.
        if tokens[i].kind == "link_close" {
            let level = tokens[i].level;
            while i > 0 {
                i -= 1;
                if tokens[i].level == level || tokens[i].kind == "link_open" {
                    break;
                }
            }
            continue;
        }

        // Walking backwards, a closing `</a>` enters a raw HTML link.
        if tokens[i].kind == "html_inline" {
            if is_link_open(&tokens[i].content) && html_link_level > 0 {
                html_link_level -= 1;
            }
            if is_link_close(&tokens[i].content) {
                html_link_level += 1;
            }
        }
        if html_link_level > 0 || tokens[i].kind != "text" {
            continue;
        }

        let text = tokens[i].content.clone();
        let mut links = find_all(&text);
        if links.is_empty() {
            continue;
        }
        // `http\://example.com` must not link its tail.
        if links[0].index == 0 && i > 0 && tokens[i - 1].kind == "text_special" {
            links.remove(0);
        }

        let mut level = tokens[i].level;
        let mut last_pos = 0;
        let mut nodes = Vec::new();

        for link in links {
            let full_url = (md.normalize_link)(&link.url);
            if !(md.validate_link)(&full_url) {
                continue;
            }

            if link.index > last_pos {
                nodes.push(text_token(&text[last_pos..link.index], level));
            }

            let mut open = Token::new("link_open", "a", Nesting::Open);
            open.attr_push("href", full_url);
            open.level = level;
            open.markup = "linkify".to_string();
            open.info = "auto".to_string();
            nodes.push(open);
            level += 1;

            nodes.push(text_token(&display_text(md, link.schema, &link.text), level));

            level -= 1;
            let mut close = Token::new("link_close", "a", Nesting::Close);
            close.level = level;
            close.markup = "linkify".to_string();
            close.info = "auto".to_string();
            nodes.push(close);

            last_pos = link.last_index;
        }

        if nodes.is_empty() {
            continue;
        }
        if last_pos < text.len() {
            nodes.push(text_token(&text[last_pos..], level));
        }
        replacements.push((i, nodes));
    }

    if replacements.is_empty() {
        return;
    }
    replacements.reverse();

    let old = std::mem::take(tokens);
    tokens.reserve(old.len() + replacements.iter().map(|(_, nodes)| nodes.len()).sum::<usize>());
    let mut pending = replacements.into_iter().peekable();
    for (idx, token) in old.into_iter().enumerate() {
        match pending.next_if(|(at, _)| *at == idx) {
            Some((_, nodes)) => tokens.extend(nodes),
            None => tokens.push(token),
        }
    }
}

pub(crate) fn linkify(state: &mut CoreState<'_>) {
    let md = state.md;
    if !md.options.linkify {
        return;
    }

    for token in state.tokens.iter_mut() {
        if token.kind != "inline" || !pretest(&token.content) {
            continue;
        }
        linkify_children(md, &mut token.children);
    }
}
