//! Whole-pipeline properties: totality, balanced nesting, stable re-render,
//! and block counts cross-checked against pulldown-cmark.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use pulldown_cmark::{Event, Options as CmarkOptions, Parser as CmarkParser, Tag, TagEnd};
use rstest::rstest;
use tokmd_core::token::build_tree;
use tokmd_core::{Env, Markdown, Nesting, Options, Preset, Token};

fn full_featured() -> Markdown {
    let mut md = Markdown::new();
    md.set_options(
        Options::default()
            .with_html(true)
            .with_linkify(true)
            .with_typographer(true)
            .with_breaks(true),
    );
    md
}

/// Every opener is closed by the same tag, and levels track the stack depth.
fn assert_balanced(tokens: &[Token]) {
    let mut stack: Vec<&str> = Vec::new();
    for token in tokens {
        match token.nesting {
            Nesting::Open => {
                assert_eq!(token.level, stack.len(), "level of {}", token.kind);
                stack.push(token.tag);
            }
            Nesting::Close => {
                let open = stack.pop().unwrap_or_else(|| panic!("stray {}", token.kind));
                assert_eq!(open, token.tag, "mismatched {}", token.kind);
                assert_eq!(token.level, stack.len(), "level of {}", token.kind);
            }
            Nesting::Leaf => {
                assert_eq!(token.level, stack.len(), "level of {}", token.kind);
            }
        }
        if !token.children.is_empty() {
            assert!(
                token.kind == "inline" || token.kind == "image",
                "{} carries children",
                token.kind
            );
            assert_balanced(&token.children);
        }
    }
    assert!(stack.is_empty(), "unclosed: {stack:?}");
}

fn assert_maps_in_bounds(tokens: &[Token], line_count: usize) {
    for token in tokens {
        if let Some(map) = token.map {
            assert!(map.start <= map.end, "{} map {map:?}", token.kind);
            assert!(map.end <= line_count, "{} map {map:?} past {line_count}", token.kind);
        }
    }
}

// ============================================================================
// Totality
// ============================================================================

#[rstest]
#[case::deep_quotes("> ".repeat(5_000) + "a")]
#[case::deep_lists("- ".repeat(2_000) + "a")]
#[case::deep_ordered("1. ".repeat(1_000) + "a")]
#[case::open_brackets("[".repeat(2_000))]
#[case::image_brackets("![".repeat(1_000) + "](x)")]
#[case::nested_links("[a".repeat(500) + &"](b)".repeat(500))]
#[case::star_runs("*a".repeat(3_000))]
#[case::mixed_markers("**_~~".repeat(1_000))]
#[case::backtick_ladder((1..200).map(|n| "`".repeat(n) + " ").collect::<String>())]
#[case::angle_brackets("<".repeat(3_000))]
#[case::html_comment_start("<!--".repeat(1_000))]
#[case::backslashes("\\".repeat(3_000))]
#[case::hard_breaks("a  \n".repeat(1_000))]
#[case::tabs("\t>\t-\t1.\t```\t\n".repeat(100))]
#[case::table_pipes("|".repeat(500) + "\n" + &"-|".repeat(500) + "\n" + &"|".repeat(500))]
#[case::control_chars("a\u{0}b\r\nc\rd\u{7f}\u{1b}".to_string())]
#[case::entities("&#x110000; &#0; &#xD800; &amp &nosuch; &#99999999;".to_string())]
#[case::multibyte("é*ü*ñ_ß_ «~~δ~~» 中文**字** ‘x’ http://例え.jp ...".to_string())]
#[case::quotes("\"'".repeat(2_000))]
#[case::dangling_reference("[a]: <\n[b]:\n[c]: /u 'open".to_string())]
#[case::setext_and_hr("***\n---\n___\nx\n===\n- - -".to_string())]
#[case::unclosed_fences("```\n~~~\n````".repeat(50))]
#[case::nested_images("![".repeat(1_000) + "a" + &"](x)".repeat(1_000))]
fn test_totality(#[case] src: String) {
    let presets = [
        full_featured(),
        Markdown::with_preset(Preset::CommonMark),
        Markdown::with_preset(Preset::Zero),
    ];
    for md in presets {
        let mut env = Env::default();
        let tokens = md.parse(&src, &mut env);
        assert_balanced(&tokens);
        let line_count = src.replace("\r\n", "\n").split(['\n', '\r']).count();
        assert_maps_in_bounds(&tokens, line_count);

        let inline = md.parse_inline(&src, &mut Env::default());
        assert_balanced(&inline);

        let _ = md.renderer.render(&tokens, &md.options, &env);
    }
}

#[test]
fn test_nesting_limit_degrades_silently() {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_max_nesting(20));
    let src = "> ".repeat(100) + "deep";
    let tokens = md.parse(&src, &mut Env::default());
    assert_balanced(&tokens);
    let depth = tokens.iter().filter(|t| t.kind == "blockquote_open").count();
    assert!(depth <= 20, "{depth} blockquotes");
}

// ============================================================================
// Scaling
// ============================================================================

/// Fastest of three parses, floored so tiny inputs don't skew the ratio.
fn parse_time(md: &Markdown, src: &str) -> Duration {
    let best = (0..3)
        .map(|_| {
            let start = Instant::now();
            let tokens = md.parse(src, &mut Env::default());
            let elapsed = start.elapsed();
            assert!(!tokens.is_empty());
            elapsed
        })
        .min()
        .unwrap_or_default();
    best.max(Duration::from_millis(2))
}

/// Eight times the input must cost well under 64 times the time.
fn assert_linear(md: &Markdown, unit: &str) {
    let small = parse_time(md, &unit.repeat(500));
    let large = parse_time(md, &unit.repeat(4_000));
    assert!(
        large < small * 24,
        "{unit:?}: 500 units took {small:?}, 4000 units took {large:?}"
    );
}

#[test]
fn test_inline_linkify_scales_linearly() {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_linkify(true));
    assert_linear(&md, "http://a.b ");

    let src = "http://a.b ".repeat(1_000);
    let tokens = md.parse(&src, &mut Env::default());
    let links = tokens[1].children.iter().filter(|t| t.kind == "link_open").count();
    assert_eq!(links, 1_000);
}

#[test]
fn test_core_linkify_scales_linearly() {
    let mut md = Markdown::new();
    md.set_options(Options::default().with_linkify(true));
    assert_linear(&md, "*a* www.a.com ");
}

#[test]
fn test_reference_definitions_scale_linearly() {
    let md = Markdown::new();
    let units: String = (0..4_000).map(|i| format!("[r{i}]: /u{i}\n")).collect();
    let small_src: String = units.lines().take(500).map(|l| format!("{l}\n")).collect();

    let small = parse_time(&md, &(small_src + "x"));
    let large = parse_time(&md, &(units.clone() + "x"));
    assert!(large < small * 24, "500 definitions took {small:?}, 4000 took {large:?}");

    let mut env = Env::default();
    md.parse(&units, &mut env);
    assert_eq!(env.references.len(), 4_000);
    assert_eq!(env.references["R3999"].href, "/u3999");
}

// ============================================================================
// Stable Re-render
// ============================================================================

#[rstest]
#[case("# Title\n\nSome *emphasis* and **strong** with `code`.")]
#[case("- a\n- b\n\n1. x\n2. y")]
#[case("- loose\n\n- list")]
#[case("> quote\n> more\n\n---\n\ntext")]
#[case("```rust\nfn main() {}\n\n// blank above\n```")]
#[case("    indented\n    code")]
#[case("| a | b |\n|:-:|--:|\n| 1 | 2 |")]
#[case("[link](/u \"t\") ![img](/i.png) <http://x.org> a &amp; b")]
#[case("a\nb  \nc ~~gone~~")]
fn test_rerender_is_stable(#[case] src: &str) {
    let md = Markdown::new();
    let reparse = {
        let mut md = Markdown::new();
        md.set_options(Options::default().with_html(true));
        md
    };

    let once = md.render(src);
    let twice = reparse.render(&once);
    assert_eq!(twice, once);
}

// ============================================================================
// Tree View
// ============================================================================

#[test]
fn test_build_tree() {
    let md = Markdown::new();
    let tokens = md.parse("- a *b*\n- c", &mut Env::default());
    let tree = build_tree(&tokens);

    assert_eq!(tree.len(), 1);
    let list = &tree[0];
    assert_eq!(list.token.kind, "bullet_list_open");
    assert_eq!(list.children.len(), 2);

    let paragraph = &list.children[0].children[0];
    assert_eq!(paragraph.token.kind, "paragraph_open");
    let inline = &paragraph.children[0];
    assert_eq!(inline.token.kind, "inline");

    let kinds: Vec<&str> = inline.children.iter().map(|n| n.token.kind).collect();
    assert_eq!(kinds, vec!["text", "em_open"]);
    assert_eq!(inline.children[1].children[0].token.content, "b");
}

#[test]
fn test_build_tree_image_children() {
    let md = Markdown::new();
    let tokens = md.parse_inline("![a *b*](/i)", &mut Env::default());
    let tree = build_tree(&tokens);
    let image = &tree[0].children[0];
    assert_eq!(image.token.kind, "image");
    assert_eq!(image.children.len(), 2);
}

// ============================================================================
// Scenarios
// ============================================================================

fn kinds(tokens: &[Token]) -> Vec<&'static str> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_scenario_strong() {
    let tokens = Markdown::new().parse("**bold**", &mut Env::default());
    assert_eq!(kinds(&tokens), vec!["paragraph_open", "inline", "paragraph_close"]);
    assert_eq!(kinds(&tokens[1].children), vec!["strong_open", "text", "strong_close"]);
    assert_eq!(tokens[1].children[1].content, "bold");
}

#[test]
fn test_scenario_tight_list() {
    let tokens = Markdown::new().parse("- a\n- b", &mut Env::default());
    assert_eq!(
        kinds(&tokens),
        vec![
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
            "bullet_list_close",
        ]
    );
    let hidden: Vec<bool> = tokens
        .iter()
        .filter(|t| t.kind.starts_with("paragraph"))
        .map(|t| t.hidden)
        .collect();
    assert_eq!(hidden, vec![true; 4]);
}

#[test]
fn test_scenario_unterminated() {
    let tokens = Markdown::new().parse("*unterminated", &mut Env::default());
    assert_eq!(kinds(&tokens[1].children), vec!["text"]);
    assert_eq!(tokens[1].children[0].content, "*unterminated");
}

// ============================================================================
// Block Counts Against pulldown-cmark
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Counts {
    headings: u32,
    paragraphs: u32,
    lists: u32,
    list_items: u32,
    tables: u32,
    code_blocks: u32,
    quotes: u32,
}

fn count_tokmd(src: &str) -> Counts {
    let tokens = Markdown::new().parse(src, &mut Env::default());
    let mut counts = Counts::default();
    let mut list_depth = 0;

    for token in &tokens {
        match token.kind {
            "heading_open" => counts.headings += 1,
            "paragraph_open" if list_depth == 0 => counts.paragraphs += 1,
            "bullet_list_open" | "ordered_list_open" => {
                counts.lists += 1;
                list_depth += 1;
            }
            "bullet_list_close" | "ordered_list_close" => list_depth -= 1,
            "list_item_open" => counts.list_items += 1,
            "table_open" => counts.tables += 1,
            "code_block" | "fence" => counts.code_blocks += 1,
            "blockquote_open" => counts.quotes += 1,
            _ => {}
        }
    }
    counts
}

fn count_pulldown(src: &str) -> Counts {
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_TABLES);
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);

    let mut counts = Counts::default();
    let mut list_depth = 0;

    for event in CmarkParser::new_ext(src, options) {
        match event {
            Event::Start(Tag::Heading { .. }) => counts.headings += 1,
            Event::Start(Tag::Paragraph) if list_depth == 0 => counts.paragraphs += 1,
            Event::Start(Tag::List(_)) => {
                counts.lists += 1;
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => list_depth -= 1,
            Event::Start(Tag::Item) => counts.list_items += 1,
            Event::Start(Tag::Table(_)) => counts.tables += 1,
            Event::Start(Tag::CodeBlock(_)) => counts.code_blocks += 1,
            Event::Start(Tag::BlockQuote) => counts.quotes += 1,
            _ => {}
        }
    }
    counts
}

const SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, **strong text**, and `inline code`.
It spans two lines.

Setext heading
--------------

- First item
- Second item
  - Nested item
- Third item

1. Step one

2. Step two

```rust
fn main() {}
```

    indented code

> A quote
> > nested quote

| Name | Speed |
| ---- | ----: |
| Fast | 100ms |

***

Closing paragraph.
"#;

#[rstest]
#[case::sample(SAMPLE)]
#[case::lists_and_quotes("> - a\n>   - b\n> c\n\n* x\n+ y")]
#[case::interrupts("para\n# heading\npara\n```\ncode\n```\npara\n> quote")]
fn test_block_counts_match_pulldown(#[case] src: &str) {
    assert_eq!(count_tokmd(src), count_pulldown(src));
}
