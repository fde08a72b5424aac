//! Bare URL and email detection for the linkify rules.
//!
//! Recognises `http://`, `https://` and `ftp://` URLs, `www.` hosts and email
//! addresses (optionally prefixed with `mailto:`). Trailing punctuation and
//! unbalanced closing brackets are not part of a link.

use std::sync::LazyLock;

use regex::Regex;

static PRETEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:https?:|ftp:|mailto:|www\.|@)").unwrap());

static SCHEME_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^(?:https?|ftp)://[^\s<>"]+"#).unwrap());

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)(?P<url>\b(?:https?|ftp)://[^\s<>"]+)"#,
        r#"|(?P<www>\bwww\.[a-z0-9-]+(?:\.[a-z0-9-]+)+(?:[:/?#][^\s<>"]*)?)"#,
        r"|(?P<email>(?:\bmailto:)?[a-z0-9._%+-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,})",
    ))
    .unwrap()
});

/// A link found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// `http:`, `https:`, `ftp:`, `mailto:`, or empty for `www.` hosts.
    pub schema: &'static str,
    /// Byte offset where the link starts.
    pub index: usize,
    /// Byte offset just past the link.
    pub last_index: usize,
    /// The matched text.
    pub text: String,
    /// The target URL, with a scheme added when missing.
    pub url: String,
}

/// Cheap check whether `text` may contain a link at all.
pub fn pretest(text: &str) -> bool {
    PRETEST_RE.is_match(text)
}

/// All links in `text`, in order.
pub fn find_all(text: &str) -> Vec<LinkMatch> {
    let mut links = Vec::new();
    for caps in LINK_RE.captures_iter(text) {
        if let Some(m) = caps.name("url").or_else(|| caps.name("www")) {
            let raw = m.as_str();
            let end = trim_trailing(raw);
            let matched = &raw[..end];
            let is_www = caps.name("www").is_some();
            let schema = if is_www {
                ""
            } else {
                scheme_of(matched)
            };
            if !is_www && matched.len() <= schema.len() + 2 {
                continue;
            }
            links.push(LinkMatch {
                schema,
                index: m.start(),
                last_index: m.start() + end,
                text: matched.to_string(),
                url: if is_www {
                    format!("http://{}", matched)
                } else {
                    matched.to_string()
                },
            });
        } else if let Some(m) = caps.name("email") {
            let matched = m.as_str();
            let has_prefix = matched.len() > 7 && matched[..7].eq_ignore_ascii_case("mailto:");
            links.push(LinkMatch {
                schema: "mailto:",
                index: m.start(),
                last_index: m.end(),
                text: matched.to_string(),
                url: if has_prefix {
                    matched.to_string()
                } else {
                    format!("mailto:{}", matched)
                },
            });
        }
    }
    links
}

/// A scheme link starting exactly at the beginning of `text`.
///
/// Only looks as far as the link itself can reach, so callers may probe
/// every `://` in a document.
pub fn match_at_start(text: &str) -> Option<LinkMatch> {
    let m = SCHEME_LINK_RE.find(text)?;
    let raw = m.as_str();
    let end = trim_trailing(raw);
    let matched = &raw[..end];
    let schema = scheme_of(matched);
    if matched.len() <= schema.len() + 2 {
        return None;
    }
    Some(LinkMatch {
        schema,
        index: 0,
        last_index: end,
        text: matched.to_string(),
        url: matched.to_string(),
    })
}

fn scheme_of(url: &str) -> &'static str {
    let lower = url.get(..6).unwrap_or(url).to_ascii_lowercase();
    if lower.starts_with("https:") {
        "https:"
    } else if lower.starts_with("http:") {
        "http:"
    } else {
        "ftp:"
    }
}

/// Length of `raw` without trailing punctuation and unbalanced closers.
fn trim_trailing(raw: &str) -> usize {
    let mut parens = Balance::of(raw, '(', ')');
    let mut brackets = Balance::of(raw, '[', ']');
    let mut braces = Balance::of(raw, '{', '}');

    let mut end = raw.len();
    while let Some(last) = raw[..end].chars().next_back() {
        let trimmed = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' => true,
            ')' => parens.pop_unbalanced(),
            ']' => brackets.pop_unbalanced(),
            '}' => braces.pop_unbalanced(),
            _ => false,
        };
        if !trimmed {
            break;
        }
        end -= last.len_utf8();
    }
    end
}

/// Open and close counts of one bracket pair.
struct Balance {
    open: usize,
    close: usize,
}

impl Balance {
    fn of(s: &str, open: char, close: char) -> Self {
        Self {
            open: s.matches(open).count(),
            close: s.matches(close).count(),
        }
    }

    /// Whether a trailing closer is unmatched; if so it is dropped from the count.
    fn pop_unbalanced(&mut self) -> bool {
        if self.close > self.open {
            self.close -= 1;
            true
        } else {
            false
        }
    }
}
