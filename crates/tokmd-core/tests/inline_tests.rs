//! Integration tests for the inline tokenizer

use pretty_assertions::assert_eq;
use rstest::rstest;
use tokmd_core::{Env, Markdown, Options, Token};

fn children_with(md: &Markdown, src: &str) -> Vec<Token> {
    let tokens = md.parse_inline(src, &mut Env::default());
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, "inline");
    tokens.into_iter().next().map(|t| t.children).unwrap_or_default()
}

fn children(src: &str) -> Vec<Token> {
    children_with(&Markdown::new(), src)
}

fn kinds(tokens: &[Token]) -> Vec<&'static str> {
    tokens.iter().map(|t| t.kind).collect()
}

// ============================================================================
// Text, Escapes and Entities
// ============================================================================

#[test]
fn test_plain_text_is_one_token() {
    let tokens = children("just some words");
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, "just some words");
}

#[test]
fn test_escapes_join_into_text() {
    let tokens = children(r"a\*b\c");
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, r"a*b\c");
}

#[test]
fn test_escape_kept_apart_without_text_join() {
    let mut md = Markdown::new();
    md.disable(&["text_join"], false).unwrap();
    let tokens = children_with(&md, r"\*");
    assert_eq!(kinds(&tokens), ["text_special"]);
    assert_eq!(tokens[0].content, "*");
    assert_eq!(tokens[0].markup, r"\*");
    assert_eq!(tokens[0].info, "escape");
}

#[rstest]
#[case("&amp;", "&")]
#[case("&copy; 2024", "\u{a9} 2024")]
#[case("&#65;&#x42;", "AB")]
#[case("&#0;", "\u{fffd}")]
#[case("&bogus;", "&bogus;")]
#[case("& alone", "& alone")]
fn test_entities(#[case] src: &str, #[case] expected: &str) {
    let tokens = children(src);
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, expected);
}

#[test]
fn test_multibyte_text_is_preserved() {
    let tokens = children("héllo *wörld* 日本");
    assert_eq!(kinds(&tokens), ["text", "em_open", "text", "em_close", "text"]);
    assert_eq!(tokens[2].content, "wörld");
    assert_eq!(tokens[4].content, " 日本");
}

// ============================================================================
// Line Breaks
// ============================================================================

#[test]
fn test_softbreak() {
    let tokens = children("a \n  b");
    assert_eq!(kinds(&tokens), ["text", "softbreak", "text"]);
    assert_eq!(tokens[0].content, "a");
    assert_eq!(tokens[2].content, "b");
}

#[rstest]
#[case("a   \nb")]
#[case("a\\\nb")]
fn test_hardbreak(#[case] src: &str) {
    let tokens = children(src);
    assert_eq!(kinds(&tokens), ["text", "hardbreak", "text"]);
    assert_eq!(tokens[0].content, "a");
}

// ============================================================================
// Code Spans
// ============================================================================

#[test]
fn test_code_span() {
    let tokens = children("use `x * y` here");
    assert_eq!(kinds(&tokens), ["text", "code_inline", "text"]);
    assert_eq!(tokens[1].content, "x * y");
    assert_eq!(tokens[1].markup, "`");
}

#[test]
fn test_code_span_strips_one_space_and_joins_lines() {
    let tokens = children("`` a`b ``");
    assert_eq!(tokens[0].content, "a`b");

    let tokens = children("`a\nb`");
    assert_eq!(tokens[0].content, "a b");
}

#[test]
fn test_unmatched_backticks_are_text() {
    let tokens = children("``a`");
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, "``a`");
}

// ============================================================================
// Links and Images
// ============================================================================

#[test]
fn test_inline_link() {
    let tokens = children(r#"[a *b*](http://x.com "T")"#);
    assert_eq!(
        kinds(&tokens),
        ["link_open", "text", "em_open", "text", "em_close", "link_close"]
    );
    assert_eq!(tokens[0].attr_get("href"), Some("http://x.com"));
    assert_eq!(tokens[0].attr_get("title"), Some("T"));
    assert_eq!(tokens[1].level, 1);
    assert_eq!(tokens[3].level, 2);
}

#[test]
fn test_link_destination_is_encoded() {
    let tokens = children("[a](<my url>)");
    assert_eq!(tokens[0].attr_get("href"), Some("my%20url"));

    let tokens = children("[a](/caf%C3%A9?q=ü)");
    assert_eq!(tokens[0].attr_get("href"), Some("/caf%C3%A9?q=%C3%BC"));
}

#[test]
fn test_empty_destination() {
    let tokens = children("[a]()");
    assert_eq!(kinds(&tokens), ["link_open", "text", "link_close"]);
    assert_eq!(tokens[0].attr_get("href"), Some(""));
}

#[test]
fn test_unsafe_link_is_text() {
    let tokens = children("[x](javascript:alert(1))");
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, "[x](javascript:alert(1))");
}

#[test]
fn test_reference_links() {
    let md = Markdown::new();
    let mut env = Env::default();
    let tokens = md.parse("[full][Ref] [ref][] [ref]\n\n[ref]: /u 't'", &mut env);
    let inline = &tokens[1].children;

    let hrefs: Vec<_> = inline.iter().filter_map(|t| t.attr_get("href")).collect();
    assert_eq!(hrefs, ["/u", "/u", "/u"]);
    assert!(inline
        .iter()
        .filter(|t| t.kind == "link_open")
        .all(|t| t.attr_get("title") == Some("t")));
}

#[test]
fn test_reference_title_continuation_drops_indent() {
    let md = Markdown::new();
    assert_eq!(
        md.render("[foo]: /url\n   'the\n   title'\n\n[foo]"),
        "<p><a href=\"/url\" title=\"the\ntitle\">foo</a></p>\n"
    );
}

#[test]
fn test_reference_label_across_lines() {
    let md = Markdown::new();
    let mut env = Env::default();
    let tokens = md.parse("[multi\n   line]:\n  /u\n\n[multi line]", &mut env);
    assert_eq!(env.references["MULTI LINE"].href, "/u");
    assert_eq!(tokens[1].children[0].kind, "link_open");
}

#[test]
fn test_reference_inside_blockquote() {
    let md = Markdown::new();
    let mut env = Env::default();
    md.parse("> [a]: /u\n> 'quoted\n> title'\n\n[a]", &mut env);
    assert_eq!(env.references["A"].title, "quoted\ntitle");
}

#[test]
fn test_unknown_reference_is_text() {
    let tokens = children("[nope][missing]");
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, "[nope][missing]");
}

#[test]
fn test_links_do_not_nest() {
    let tokens = children("[a [b](/inner)](/outer)");
    let opens: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == "link_open")
        .filter_map(|t| t.attr_get("href"))
        .collect();
    assert_eq!(opens, ["/inner"]);
}

#[test]
fn test_image() {
    let tokens = children(r#"![alt *x*](/i.png "T")"#);
    assert_eq!(kinds(&tokens), ["image"]);

    let image = &tokens[0];
    assert_eq!(image.attr_get("src"), Some("/i.png"));
    assert_eq!(image.attr_get("alt"), Some(""));
    assert_eq!(image.attr_get("title"), Some("T"));
    assert_eq!(image.content, "alt *x*");
    assert_eq!(kinds(&image.children), ["text", "em_open", "text", "em_close"]);
}

#[test]
fn test_link_inside_emphasis_keeps_delimiters_apart() {
    // The `*` inside the link text cannot pair with the one outside.
    let tokens = children("*[a*](/u)");
    assert_eq!(kinds(&tokens), ["text", "link_open", "text", "link_close"]);
    assert_eq!(tokens[0].content, "*");
    assert_eq!(tokens[2].content, "a*");
}

// ============================================================================
// Autolinks and Raw HTML
// ============================================================================

#[test]
fn test_autolink() {
    let tokens = children("<http://a.b/c>");
    assert_eq!(kinds(&tokens), ["link_open", "text", "link_close"]);
    assert_eq!(tokens[0].attr_get("href"), Some("http://a.b/c"));
    assert_eq!(tokens[0].markup, "autolink");
    assert_eq!(tokens[0].info, "auto");
    assert_eq!(tokens[1].content, "http://a.b/c");
}

#[test]
fn test_email_autolink() {
    let tokens = children("<me@example.org>");
    assert_eq!(tokens[0].attr_get("href"), Some("mailto:me@example.org"));
    assert_eq!(tokens[1].content, "me@example.org");
}

#[test]
fn test_html_inline_requires_option() {
    let tokens = children("a <b>x</b>");
    assert_eq!(kinds(&tokens), ["text"]);

    let mut md = Markdown::new();
    md.set_options(Options::default().with_html(true));
    let tokens = children_with(&md, "a <b>x</b>");
    assert_eq!(kinds(&tokens), ["text", "html_inline", "text", "html_inline"]);
    assert_eq!(tokens[1].content, "<b>");
    assert_eq!(tokens[3].content, "</b>");
}

// ============================================================================
// Linkify
// ============================================================================

fn linkify_md() -> Markdown {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_linkify(true));
    md
}

#[test]
fn test_linkify_scheme_url() {
    let tokens = children_with(&linkify_md(), "see http://example.com/a_b_c.");
    assert_eq!(kinds(&tokens), ["text", "link_open", "text", "link_close", "text"]);
    assert_eq!(tokens[0].content, "see ");
    assert_eq!(tokens[1].attr_get("href"), Some("http://example.com/a_b_c"));
    assert_eq!(tokens[1].markup, "linkify");
    assert_eq!(tokens[1].info, "auto");
    assert_eq!(tokens[2].content, "http://example.com/a_b_c");
    assert_eq!(tokens[4].content, ".");
}

#[test]
fn test_linkify_www_and_email() {
    let tokens = children_with(&linkify_md(), "visit www.example.com or mail me@example.org");
    let hrefs: Vec<_> = tokens.iter().filter_map(|t| t.attr_get("href")).collect();
    assert_eq!(hrefs, ["http://www.example.com", "mailto:me@example.org"]);

    let texts: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == "text")
        .map(|t| t.content.as_str())
        .collect();
    assert_eq!(texts, ["visit ", "www.example.com", " or mail ", "me@example.org"]);
}

#[test]
fn test_linkify_skips_existing_links() {
    let tokens = children_with(&linkify_md(), "[http://a.com](http://b.com)");
    let hrefs: Vec<_> = tokens.iter().filter_map(|t| t.attr_get("href")).collect();
    assert_eq!(hrefs, ["http://b.com"]);
}

#[test]
fn test_linkify_off_by_default() {
    let tokens = children("http://example.com");
    assert_eq!(kinds(&tokens), ["text"]);
}

// ============================================================================
// Typographer
// ============================================================================

fn typographer_md() -> Markdown {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_typographer(true));
    md
}

#[rstest]
#[case("(c) (TM) (r)", "\u{a9} \u{2122} \u{ae}")]
#[case("a -- b --- c", "a \u{2013} b \u{2014} c")]
#[case("wait... what?....", "wait\u{2026} what?..")]
#[case("+-5", "\u{b1}5")]
#[case("\"Hello\" it's", "\u{201c}Hello\u{201d} it\u{2019}s")]
#[case("'single'", "\u{2018}single\u{2019}")]
fn test_typographer(#[case] src: &str, #[case] expected: &str) {
    let tokens = children_with(&typographer_md(), src);
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, expected);
}

#[test]
fn test_typographer_quotes_across_emphasis() {
    let tokens = children_with(&typographer_md(), "\"*a*\"");
    assert_eq!(tokens[0].content, "\u{201c}");
    assert_eq!(tokens[4].content, "\u{201d}");
}

#[test]
fn test_custom_quotes() {
    let mut md = Markdown::new();
    md.set_options(
        Options::default()
            .with_typographer(true)
            .with_quotes(["\u{ab}\u{a0}", "\u{a0}\u{bb}", "\u{2039}", "\u{203a}"]),
    );
    let tokens = children_with(&md, "\"a\" and \"b\"");
    assert_eq!(
        tokens[0].content,
        "\u{ab}\u{a0}a\u{a0}\u{bb} and \u{ab}\u{a0}b\u{a0}\u{bb}"
    );
}

#[test]
fn test_typographer_leaves_code_alone() {
    let tokens = children_with(&typographer_md(), "`(c) \"x\"`");
    assert_eq!(kinds(&tokens), ["code_inline"]);
    assert_eq!(tokens[0].content, "(c) \"x\"");
}

// ============================================================================
// Nesting Limits
// ============================================================================

#[test]
fn test_inline_nesting_limit_falls_back_to_text() {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_max_nesting(2));
    let tokens = children_with(&md, "[[[[a](/1)](/2)](/3)](/4)");
    let links = tokens.iter().filter(|t| t.kind == "link_open").count();
    assert!(links <= 1);
}
