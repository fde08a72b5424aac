//! Integration tests for the block tokenizer

use pretty_assertions::assert_eq;
use rstest::rstest;
use tokmd_core::span::Span;
use tokmd_core::{Env, Markdown, Options, Preset, Token};

fn parse(src: &str) -> Vec<Token> {
    Markdown::new().parse(src, &mut Env::default())
}

fn kinds(tokens: &[Token]) -> Vec<&'static str> {
    tokens.iter().map(|t| t.kind).collect()
}

// ============================================================================
// Headings and Paragraphs
// ============================================================================

#[test]
fn test_atx_heading() {
    let tokens = parse("## Hello ##");
    assert_eq!(kinds(&tokens), ["heading_open", "inline", "heading_close"]);
    assert_eq!(tokens[0].tag, "h2");
    assert_eq!(tokens[0].markup, "##");
    assert_eq!(tokens[0].map, Some(Span::new(0, 1)));
    assert_eq!(tokens[1].content, "Hello");
}

#[rstest]
#[case("#Hello")]
#[case("####### seven")]
fn test_not_a_heading(#[case] src: &str) {
    let tokens = parse(src);
    assert_eq!(kinds(&tokens), ["paragraph_open", "inline", "paragraph_close"]);
}

#[test]
fn test_setext_heading() {
    let tokens = parse("Title\n-----");
    assert_eq!(kinds(&tokens), ["heading_open", "inline", "heading_close"]);
    assert_eq!(tokens[0].tag, "h2");
    assert_eq!(tokens[0].markup, "-");
    assert_eq!(tokens[1].content, "Title");
    assert_eq!(tokens[0].map, Some(Span::new(0, 2)));
}

#[test]
fn test_paragraph_spans_lines() {
    let tokens = parse("one\ntwo\n\nthree");
    assert_eq!(
        kinds(&tokens),
        [
            "paragraph_open",
            "inline",
            "paragraph_close",
            "paragraph_open",
            "inline",
            "paragraph_close"
        ]
    );
    assert_eq!(tokens[1].content, "one\ntwo");
    assert_eq!(tokens[0].map, Some(Span::new(0, 2)));
    assert_eq!(tokens[3].map, Some(Span::new(3, 4)));
    assert!(tokens.iter().all(|t| t.block));
}

#[test]
fn test_empty_input() {
    assert!(parse("").is_empty());
    assert!(parse("\n\n  \n").is_empty());
}

// ============================================================================
// Blockquotes
// ============================================================================

#[test]
fn test_blockquote_lazy_continuation() {
    // CommonMark lazy continuation: the unmarked line joins the quoted
    // paragraph instead of starting a paragraph after the quote.
    let tokens = parse("> quoted\npara");
    assert_eq!(
        kinds(&tokens),
        [
            "blockquote_open",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "blockquote_close"
        ]
    );
    assert_eq!(tokens[2].content, "quoted\npara");
}

#[test]
fn test_blockquote_then_paragraph() {
    let tokens = parse("> quoted\n\npara");
    assert_eq!(
        kinds(&tokens),
        [
            "blockquote_open",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "blockquote_close",
            "paragraph_open",
            "inline",
            "paragraph_close"
        ]
    );
    assert_eq!(tokens[0].level, 0);
    assert_eq!(tokens[1].level, 1);
    assert_eq!(tokens[5].level, 0);
    assert_eq!(tokens[6].content, "para");
}

#[test]
fn test_nested_blockquotes() {
    let tokens = parse("> a\n>> b");
    let opens = tokens.iter().filter(|t| t.kind == "blockquote_open").count();
    assert_eq!(opens, 2);
    assert_eq!(tokens[0].map, Some(Span::new(0, 2)));
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_tight_bullet_list() {
    let tokens = parse("- a\n- b");
    assert_eq!(
        kinds(&tokens),
        [
            "bullet_list_open",
            "list_item_open",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "list_item_close",
            "list_item_open",
            "paragraph_open",
            "inline",
            "paragraph_close",
            "list_item_close",
            "bullet_list_close"
        ]
    );
    for token in tokens.iter().filter(|t| t.kind.starts_with("paragraph_")) {
        assert!(token.hidden, "tight list paragraphs are hidden");
    }
    assert_eq!(tokens[0].markup, "-");
    assert_eq!(tokens[1].map, Some(Span::new(0, 1)));
    assert_eq!(tokens[6].map, Some(Span::new(1, 2)));
}

#[test]
fn test_loose_bullet_list() {
    let tokens = parse("- a\n\n- b");
    assert!(tokens.iter().all(|t| !t.hidden));
}

#[test]
fn test_ordered_list_start() {
    let tokens = parse("3. x\n4. y");
    assert_eq!(tokens[0].kind, "ordered_list_open");
    assert_eq!(tokens[0].attr_get("start"), Some("3"));
    assert_eq!(tokens[1].info, "3");
    assert_eq!(tokens[1].markup, ".");

    let tokens = parse("1) x");
    assert_eq!(tokens[0].attr_get("start"), None);
    assert_eq!(tokens[0].markup, ")");
}

#[test]
fn test_marker_change_starts_new_list() {
    let tokens = parse("- a\n+ b");
    let lists = tokens.iter().filter(|t| t.kind == "bullet_list_open").count();
    assert_eq!(lists, 2);
}

#[test]
fn test_nested_list() {
    let tokens = parse("- a\n  - b\n- c");
    let lists: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == "bullet_list_open")
        .map(|t| t.level)
        .collect();
    assert_eq!(lists, [0, 2]);
}

#[test]
fn test_ordered_list_cannot_interrupt_paragraph_unless_one() {
    let tokens = parse("text\n2. no");
    assert_eq!(kinds(&tokens), ["paragraph_open", "inline", "paragraph_close"]);

    let tokens = parse("text\n1. yes");
    assert!(kinds(&tokens).contains(&"ordered_list_open"));
}

// ============================================================================
// Code, Fences and Rules
// ============================================================================

#[test]
fn test_indented_code() {
    let tokens = parse("    let x;\n      y\n");
    assert_eq!(kinds(&tokens), ["code_block"]);
    assert_eq!(tokens[0].content, "let x;\n  y\n");
}

#[test]
fn test_fence() {
    let tokens = parse("```rust\nfn main() {}\n```");
    assert_eq!(kinds(&tokens), ["fence"]);
    assert_eq!(tokens[0].info, "rust");
    assert_eq!(tokens[0].markup, "```");
    assert_eq!(tokens[0].content, "fn main() {}\n");
    assert_eq!(tokens[0].map, Some(Span::new(0, 3)));
}

#[test]
fn test_unclosed_fence_runs_to_end() {
    let tokens = parse("~~~\na\n\nb");
    assert_eq!(kinds(&tokens), ["fence"]);
    assert_eq!(tokens[0].content, "a\n\nb");
}

#[test]
fn test_fence_interrupts_paragraph() {
    let tokens = parse("text\n```\ncode\n```");
    assert_eq!(kinds(&tokens), ["paragraph_open", "inline", "paragraph_close", "fence"]);
}

#[rstest]
#[case("***", "***")]
#[case("- - -", "---")]
#[case("___", "___")]
fn test_thematic_break(#[case] src: &str, #[case] markup: &str) {
    let tokens = parse(src);
    assert_eq!(kinds(&tokens), ["hr"]);
    assert_eq!(tokens[0].markup, markup);
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table() {
    let tokens = parse("| a | b |\n|:--|--:|\n| 1 | 2 |");
    assert_eq!(
        kinds(&tokens),
        [
            "table_open",
            "thead_open",
            "tr_open",
            "th_open",
            "inline",
            "th_close",
            "th_open",
            "inline",
            "th_close",
            "tr_close",
            "thead_close",
            "tbody_open",
            "tr_open",
            "td_open",
            "inline",
            "td_close",
            "td_open",
            "inline",
            "td_close",
            "tr_close",
            "tbody_close",
            "table_close"
        ]
    );
    assert_eq!(tokens[3].attr_get("style"), Some("text-align:left"));
    assert_eq!(tokens[6].attr_get("style"), Some("text-align:right"));
    assert_eq!(tokens[14].content, "1");
    assert_eq!(tokens[0].map, Some(Span::new(0, 3)));
}

#[test]
fn test_table_escaped_pipe_and_short_row() {
    let tokens = parse("a | b\n--- | ---\nx \\| y");
    let cells: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == "inline")
        .map(|t| t.content.as_str())
        .collect();
    assert_eq!(cells, ["a", "b", "x | y", ""]);
}

#[test]
fn test_table_column_mismatch_is_paragraph() {
    let tokens = parse("| a | b |\n|---|\n");
    assert_eq!(tokens[0].kind, "paragraph_open");
}

#[test]
fn test_commonmark_preset_has_no_tables() {
    let md = Markdown::with_preset(Preset::CommonMark);
    let tokens = md.parse("| a |\n|---|", &mut Env::default());
    assert_eq!(tokens[0].kind, "paragraph_open");
}

// ============================================================================
// References and HTML Blocks
// ============================================================================

#[test]
fn test_reference_definition() {
    let md = Markdown::new();
    let mut env = Env::default();
    let tokens = md.parse("[Foo  Bar]: /url \"title\"\n\n[foo bar]", &mut env);

    let reference = &env.references["FOO BAR"];
    assert_eq!(reference.href, "/url");
    assert_eq!(reference.title, "title");

    // The definition emits no tokens of its own.
    assert_eq!(kinds(&tokens), ["paragraph_open", "inline", "paragraph_close"]);
    assert_eq!(tokens[0].map, Some(Span::new(2, 3)));
}

#[test]
fn test_first_reference_wins() {
    let md = Markdown::new();
    let mut env = Env::default();
    md.parse("[a]: /one\n[a]: /two", &mut env);
    assert_eq!(env.references["A"].href, "/one");
}

#[test]
fn test_reference_title_on_next_line() {
    let md = Markdown::new();
    let mut env = Env::default();
    let tokens = md.parse("[a]: /u\n  'multi\nline'\nafter", &mut env);
    assert_eq!(env.references["A"].title, "multi\nline");
    assert_eq!(tokens[1].content, "after");
}

#[test]
fn test_html_block_requires_option() {
    let src = "<div>\nhi\n</div>\n";

    let tokens = parse(src);
    assert_eq!(tokens[0].kind, "paragraph_open");

    let mut md = Markdown::new();
    md.set_options(Options::default().with_html(true));
    let tokens = md.parse(src, &mut Env::default());
    assert_eq!(kinds(&tokens), ["html_block"]);
    assert_eq!(tokens[0].content, src);
}

#[test]
fn test_html_comment_block_ends_at_close() {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_html(true));
    let tokens = md.parse("<!-- a\nb -->\npara", &mut Env::default());
    assert_eq!(kinds(&tokens), ["html_block", "paragraph_open", "inline", "paragraph_close"]);
    assert_eq!(tokens[0].content, "<!-- a\nb -->\n");
}

// ============================================================================
// Nesting Limits
// ============================================================================

#[test]
fn test_block_nesting_limit_truncates() {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_max_nesting(3));
    let src = format!("{}deep", "> ".repeat(10));
    let tokens = md.parse(&src, &mut Env::default());

    let depth = tokens.iter().filter(|t| t.kind == "blockquote_open").count();
    assert_eq!(depth, 3);
    assert!(tokens.iter().all(|t| t.kind != "inline"));
}

#[test]
fn test_disabled_rule_is_skipped() {
    let mut md = Markdown::new();
    md.disable(&["heading"], false).unwrap();
    let tokens = md.parse("# not a heading", &mut Env::default());
    assert_eq!(tokens[0].kind, "paragraph_open");
}
