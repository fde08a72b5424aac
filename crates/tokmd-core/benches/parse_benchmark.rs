//! Benchmarks comparing tokmd against pulldown-cmark
//!
//! Run with: cargo bench -p tokmd-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pulldown_cmark::{html, Options as CmarkOptions, Parser as CmarkParser};
use tokmd_core::{Env, Markdown, Options};

const SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, **strong text**, and `inline code`.
It demonstrates the basic capabilities of the format.

## Lists

- First item with some content
- Second item with more content
- Third item concluding the list

1. Step one of the process
2. Step two continues
3. Step three completes

## Code Example

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}
```

## Callout

> **Note: Performance**
>
> Rules run in order and the first match wins.
> No backtracking across blocks.

## Table

| Name    | Speed   | Memory |
| ------- | ------- | ------ |
| Fast    | 100ms   | 10MB   |
| Medium  | 500ms   | 50MB   |
| Slow    | 1000ms  | 100MB  |

## Links

See [the docs](https://example.com/docs "Docs"), <https://example.com>,
and a [reference link][ref]. ~~Old~~ text & "quotes".

[ref]: https://example.com/ref

---

End of document.
"#;

fn cmark_options() -> CmarkOptions {
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_TABLES);
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);
    options
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(SAMPLE.len() as u64));

    let md = Markdown::new();
    group.bench_function("tokmd_tokens", |b| {
        b.iter(|| {
            let mut env = Env::default();
            let tokens = md.parse(black_box(SAMPLE), &mut env);
            black_box(tokens.len())
        })
    });

    group.bench_function("pulldown_events", |b| {
        b.iter(|| {
            let parser = CmarkParser::new_ext(black_box(SAMPLE), cmark_options());
            let events: Vec<_> = parser.collect();
            black_box(events.len())
        })
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Bytes(SAMPLE.len() as u64));

    let md = Markdown::new();
    group.bench_function("tokmd", |b| b.iter(|| black_box(md.render(black_box(SAMPLE)))));

    let mut typographer = Markdown::new();
    typographer.set_options(Options::default().with_typographer(true).with_linkify(true));
    group.bench_function("tokmd_typographer_linkify", |b| {
        b.iter(|| black_box(typographer.render(black_box(SAMPLE))))
    });

    group.bench_function("pulldown", |b| {
        b.iter(|| {
            let mut out = String::with_capacity(SAMPLE.len() * 2);
            html::push_html(&mut out, CmarkParser::new_ext(black_box(SAMPLE), cmark_options()));
            black_box(out)
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let md = Markdown::new();

    for size in [1, 5, 10, 20].iter() {
        let content: String = SAMPLE.repeat(*size);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("tokmd", size), &content, |b, content| {
            b.iter(|| black_box(md.render(black_box(content))))
        });

        group.bench_with_input(BenchmarkId::new("pulldown", size), &content, |b, content| {
            b.iter(|| {
                let mut out = String::new();
                let parser = CmarkParser::new_ext(black_box(content), cmark_options());
                html::push_html(&mut out, parser);
                black_box(out)
            })
        });
    }

    group.finish();
}

fn bench_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");
    let text =
        "This has *emphasis*, **strong**, `code`, [link](https://example.com), and ~~strike~~.";
    let md = Markdown::new();

    group.bench_function("tokmd_inline", |b| {
        b.iter(|| {
            let tokens = md.parse_inline(black_box(text), &mut Env::default());
            black_box(tokens.len())
        })
    });

    group.bench_function("pulldown_inline", |b| {
        b.iter(|| {
            let events: Vec<_> = CmarkParser::new_ext(black_box(text), cmark_options()).collect();
            black_box(events.len())
        })
    });

    // Pathological delimiter runs stay linear.
    let runs = "*a_".repeat(2_000);
    group.bench_function("tokmd_delimiter_runs", |b| {
        b.iter(|| black_box(md.render_inline(black_box(&runs))))
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render, bench_scaling, bench_inline);
criterion_main!(benches);
