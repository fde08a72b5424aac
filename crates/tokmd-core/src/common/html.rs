//! Regular expressions recognising raw HTML.

use std::sync::LazyLock;

use regex::Regex;

const ATTR_NAME: &str = r"[a-zA-Z_:][a-zA-Z0-9:._-]*";
const UNQUOTED: &str = r#"[^"'=<>`\x00-\x20]+"#;
const SINGLE_QUOTED: &str = r"'[^']*'";
const DOUBLE_QUOTED: &str = r#""[^"]*""#;

fn open_tag() -> String {
    let attr_value = format!("(?:{}|{}|{})", UNQUOTED, SINGLE_QUOTED, DOUBLE_QUOTED);
    let attribute = format!(r"(?:\s+{}(?:\s*=\s*{})?)", ATTR_NAME, attr_value);
    format!(r"<[A-Za-z][A-Za-z0-9\-]*{}*\s*/?>", attribute)
}

const CLOSE_TAG: &str = r"</[A-Za-z][A-Za-z0-9\-]*\s*>";
const COMMENT: &str = r"<!---?>|<!--(?:[^-]|-[^-]|--[^>])*-->";
const PROCESSING: &str = r"<[?][\s\S]*?[?]>";
const DECLARATION: &str = r"<![A-Za-z][^>]*>";
const CDATA: &str = r"<!\[CDATA\[[\s\S]*?\]\]>";

/// Any inline HTML construct at the start of the input.
pub static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^(?:{}|{}|{}|{}|{}|{})",
        open_tag(),
        CLOSE_TAG,
        COMMENT,
        PROCESSING,
        DECLARATION,
        CDATA
    ))
    .unwrap()
});

/// A complete open or close tag at the start of the input.
pub static HTML_OPEN_CLOSE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^(?:{}|{})", open_tag(), CLOSE_TAG)).unwrap());

static LINK_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^<a[>\s]").unwrap());
static LINK_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^</a\s*>").unwrap());

/// Raw HTML that opens an anchor.
pub fn is_link_open(s: &str) -> bool {
    LINK_OPEN_RE.is_match(s)
}

/// Raw HTML that closes an anchor.
pub fn is_link_close(s: &str) -> bool {
    LINK_CLOSE_RE.is_match(s)
}

/// Element names that start an HTML block of kind 6.
pub const BLOCK_NAMES: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];
