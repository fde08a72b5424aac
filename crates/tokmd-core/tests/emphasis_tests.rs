//! Delimiter pairing: emphasis, strong and strikethrough

use pretty_assertions::assert_eq;
use rstest::rstest;
use tokmd_core::{Env, Markdown, Preset, Token};

fn children(src: &str) -> Vec<Token> {
    let md = Markdown::new();
    let mut tokens = md.parse(src, &mut Env::default());
    assert_eq!(tokens[1].kind, "inline");
    std::mem::take(&mut tokens[1].children)
}

fn kinds(tokens: &[Token]) -> Vec<&'static str> {
    tokens.iter().map(|t| t.kind).collect()
}

fn render_inline(src: &str) -> String {
    Markdown::new().render_inline(src)
}

// ============================================================================
// Basic Spans
// ============================================================================

#[test]
fn test_strong() {
    let tokens = children("**bold**");
    assert_eq!(kinds(&tokens), ["strong_open", "text", "strong_close"]);
    assert_eq!(tokens[0].markup, "**");
    assert_eq!(tokens[1].content, "bold");
    assert_eq!(tokens[1].level, 1);
}

#[test]
fn test_two_independent_emphasis_spans() {
    let tokens = children("*a* _b_");
    assert_eq!(
        kinds(&tokens),
        ["em_open", "text", "em_close", "text", "em_open", "text", "em_close"]
    );
    assert_eq!(tokens[0].markup, "*");
    assert_eq!(tokens[3].content, " ");
    assert_eq!(tokens[4].markup, "_");
}

#[test]
fn test_strikethrough() {
    let tokens = children("~~gone~~");
    assert_eq!(kinds(&tokens), ["s_open", "text", "s_close"]);
    assert_eq!(tokens[0].markup, "~~");
    assert_eq!(tokens[1].content, "gone");
}

#[test]
fn test_single_tilde_is_text() {
    let tokens = children("~a~");
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, "~a~");
}

#[test]
fn test_strikethrough_disabled_in_commonmark() {
    let md = Markdown::with_preset(Preset::CommonMark);
    assert_eq!(md.render_inline("~~x~~"), "~~x~~");
}

#[test]
fn test_unterminated_marker_is_literal() {
    let tokens = children("*unterminated");
    assert_eq!(kinds(&tokens), ["text"]);
    assert_eq!(tokens[0].content, "*unterminated");
}

// ============================================================================
// Flanking Rules
// ============================================================================

#[rstest]
#[case("a * b *", "a * b *")]
#[case("snake_case_name", "snake_case_name")]
#[case("in*word*emphasis", "in<em>word</em>emphasis")]
#[case("_a_b", "_a_b")]
#[case("*(*a*)*", "<em>(<em>a</em>)</em>")]
#[case("**a*", "*<em>a</em>")]
#[case("*a**", "<em>a</em>*")]
fn test_flanking(#[case] src: &str, #[case] html: &str) {
    assert_eq!(render_inline(src), html);
}

#[test]
fn test_unicode_punctuation_flanking() {
    // `«` is punctuation, so the closer after it is right-flanking.
    assert_eq!(render_inline("*«a»*"), "<em>«a»</em>");
}

// ============================================================================
// Rule of 3
// ============================================================================

#[test]
fn test_triple_markers_nest_once() {
    // CommonMark order: em outside, strong inside. Strong-outside is the
    // other reading of `***foo***` and is not what this parser produces.
    let tokens = children("***foo***");
    assert_eq!(
        kinds(&tokens),
        ["em_open", "strong_open", "text", "strong_close", "em_close"]
    );
    assert_eq!(tokens[2].content, "foo");
    assert_eq!(tokens[2].level, 2);
}

#[rstest]
#[case("*foo**bar**baz*", "<em>foo<strong>bar</strong>baz</em>")]
#[case("*foo**bar*", "<em>foo**bar</em>")]
#[case("**foo*bar*baz**", "<strong>foo<em>bar</em>baz</strong>")]
#[case("foo***bar***baz", "foo<em><strong>bar</strong></em>baz")]
#[case(
    "foo******bar*********baz",
    "foo<strong><strong><strong>bar</strong></strong></strong>***baz"
)]
#[case("*a **b** c*", "<em>a <strong>b</strong> c</em>")]
fn test_rule_of_three(#[case] src: &str, #[case] html: &str) {
    assert_eq!(render_inline(src), html);
}

// ============================================================================
// Mixed Markers
// ============================================================================

#[rstest]
#[case("~~a *b*~~", "<s>a <em>b</em></s>")]
#[case("*a ~~b~~*", "<em>a <s>b</s></em>")]
#[case("~~~a~~~", "~<s>a</s>~")]
#[case("_a *b_ c*", "<em>a *b</em> c*")]
fn test_mixed_markers(#[case] src: &str, #[case] html: &str) {
    assert_eq!(render_inline(src), html);
}

#[test]
fn test_levels_after_pairing() {
    let tokens = children("**a *b* c**");
    let levels: Vec<_> = tokens.iter().map(|t| (t.kind, t.level)).collect();
    assert_eq!(
        levels,
        [
            ("strong_open", 0),
            ("text", 1),
            ("em_open", 1),
            ("text", 2),
            ("em_close", 1),
            ("text", 1),
            ("strong_close", 0)
        ]
    );
}

#[test]
fn test_long_alternating_runs_stay_fast() {
    let src = "*_".repeat(5000);
    let html = render_inline(&src);
    assert!(html.len() >= src.len());
}
