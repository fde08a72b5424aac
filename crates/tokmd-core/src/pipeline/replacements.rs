//! Typographic replacements: `(c)` to ©, `+-` to ±, `...` to …, dashes.
//!
//! Applied to text tokens only, never inside autolinks or linkified URLs.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::pipeline::CoreState;
use crate::token::Token;

static RARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+-|\.\.|\?\?\?\?|!!!!|,,|--").unwrap());
static SCOPED_ABBR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\((c|tm|r)\)").unwrap());

static ELLIPSIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());
static PUNCT_ELLIPSIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?!])…").unwrap());
static REPEATED_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?!]){4,}").unwrap());
static COMMAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",{2,}").unwrap());

fn scoped_abbr(caps: &Captures<'_>) -> &'static str {
    match caps[1].to_ascii_lowercase().as_str() {
        "c" => "©",
        "r" => "®",
        _ => "™",
    }
}

/// Replace dash runs: exactly three become an em dash, exactly two an en
/// dash when both sides are alike (spaced or unspaced). Other runs stay.
fn replace_dashes(text: &str) -> Cow<'_, str> {
    if !text.contains("--") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(start) = rest.find('-') {
        let head = &rest[..start];
        out.push_str(head);
        if let Some(c) = head.chars().next_back() {
            prev = Some(c);
        }

        let run = rest[start..].bytes().take_while(|&b| b == b'-').count();
        let tail = &rest[start + run..];
        let next = tail.chars().next();

        let at_start = prev.map_or(true, |c| c == '\n');
        let at_end = next.map_or(true, |c| c == '\n');
        let prev_space = prev.is_some_and(char::is_whitespace);
        let next_space = next.is_some_and(char::is_whitespace);

        match run {
            3 => out.push('\u{2014}'),
            2 if ((at_start || prev_space) && (at_end || next_space))
                || ((at_start || !prev_space) && (at_end || !next_space)) =>
            {
                out.push('\u{2013}')
            }
            _ => out.push_str(&rest[start..start + run]),
        }

        prev = Some('-');
        rest = tail;
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn replace_rare(text: &str) -> String {
    let text = text.replace("+-", "±");
    let text = ELLIPSIS_RE.replace_all(&text, "…");
    let text = PUNCT_ELLIPSIS_RE.replace_all(&text, "${1}..");
    let text = REPEATED_PUNCT_RE.replace_all(&text, "${1}${1}${1}");
    let text = COMMAS_RE.replace_all(&text, ",");
    replace_dashes(&text).into_owned()
}

/// Apply `f` to text tokens outside autolinks, walking backwards.
fn for_each_text(tokens: &mut [Token], f: impl Fn(&str) -> Option<String>) {
    let mut inside_autolink = 0i32;
    for token in tokens.iter_mut().rev() {
        if token.kind == "text" && inside_autolink == 0 {
            if let Some(replaced) = f(&token.content) {
                token.content = replaced;
            }
        }
        if token.kind == "link_open" && token.info == "auto" {
            inside_autolink -= 1;
        }
        if token.kind == "link_close" && token.info == "auto" {
            inside_autolink += 1;
        }
    }
}

pub(crate) fn replace(state: &mut CoreState<'_>) {
    if !state.md.options.typographer {
        return;
    }

    for token in state.tokens.iter_mut().rev() {
        if token.kind != "inline" {
            continue;
        }
        if SCOPED_ABBR_RE.is_match(&token.content) {
            for_each_text(&mut token.children, |text| {
                match SCOPED_ABBR_RE.replace_all(text, scoped_abbr) {
                    Cow::Owned(s) => Some(s),
                    Cow::Borrowed(_) => None,
                }
            });
        }
        if RARE_RE.is_match(&token.content) {
            for_each_text(&mut token.children, |text| {
                RARE_RE.is_match(text).then(|| replace_rare(text))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashes() {
        assert_eq!(replace_dashes("a---b"), "a\u{2014}b");
        assert_eq!(replace_dashes("a -- b"), "a \u{2013} b");
        assert_eq!(replace_dashes("1--2"), "1\u{2013}2");
        assert_eq!(replace_dashes("a --b"), "a --b");
        assert_eq!(replace_dashes("a----b"), "a----b");
    }

    #[test]
    fn test_rare() {
        assert_eq!(replace_rare("wait..."), "wait…");
        assert_eq!(replace_rare("what?...."), "what?..");
        assert_eq!(replace_rare("no!!!!!!"), "no!!!");
        assert_eq!(replace_rare("a,, b"), "a, b");
        assert_eq!(replace_rare("+-1"), "±1");
    }
}
