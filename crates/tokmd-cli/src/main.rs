//! tokmd CLI - Render, tokenize, and inspect Markdown documents
//!
//! Usage:
//!   tokmd [OPTIONS] [FILE]
//!   tokmd tokens [--json] [OPTIONS] [FILE]
//!   tokmd stats [--json] [OPTIONS] [FILE]
//!
//! Without a file, input is read from stdin.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokmd_core::{Env, Markdown, Nesting, Options, Preset, Token};

#[derive(Parser)]
#[command(name = "tokmd")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    input: InputArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render to HTML (default)
    Render {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Dump the token stream
    Tokens {
        #[command(flatten)]
        input: InputArgs,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Show document statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Args, Clone)]
struct InputArgs {
    /// Input file (stdin when omitted)
    file: Option<PathBuf>,

    /// Rule and option preset: default, commonmark or zero
    #[arg(long, default_value = "default")]
    preset: Preset,

    /// JSON options file, applied over the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pass raw HTML through
    #[arg(long)]
    html: bool,

    /// Turn bare URLs into links
    #[arg(long)]
    linkify: bool,

    /// Smart quotes and typographic replacements
    #[arg(long)]
    typographer: bool,

    /// Render soft line breaks as <br>
    #[arg(long)]
    breaks: bool,

    /// Close void tags XHTML-style
    #[arg(long)]
    xhtml: bool,

    /// Rules to enable (comma separated)
    #[arg(long, value_delimiter = ',')]
    enable: Vec<String>,

    /// Rules to disable (comma separated)
    #[arg(long, value_delimiter = ',')]
    disable: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None => cmd_render(&cli.input),
        Some(Command::Render { input }) => cmd_render(&input),
        Some(Command::Tokens { input, json }) => cmd_tokens(&input, json),
        Some(Command::Stats { input, json }) => cmd_stats(&input, json),
    }
}

fn read_input(args: &InputArgs) -> Result<String> {
    match &args.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn build_markdown(args: &InputArgs) -> Result<Markdown> {
    let mut md = Markdown::with_preset(args.preset);

    let mut options = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            serde_json::from_str::<Options>(&raw)
                .with_context(|| format!("invalid options in '{}'", path.display()))?
        }
        None => md.options.clone(),
    };

    options.html |= args.html;
    options.linkify |= args.linkify;
    options.typographer |= args.typographer;
    options.breaks |= args.breaks;
    options.xhtml_out |= args.xhtml;
    md.set_options(options);

    let enable: Vec<&str> = args.enable.iter().map(String::as_str).collect();
    let disable: Vec<&str> = args.disable.iter().map(String::as_str).collect();
    md.enable(&enable, false).context("--enable")?;
    md.disable(&disable, false).context("--disable")?;

    Ok(md)
}

// =============================================================================
// Render Command
// =============================================================================

fn cmd_render(args: &InputArgs) -> Result<()> {
    let md = build_markdown(args)?;
    let input = read_input(args)?;

    let html = md.render(&input);
    io::stdout().write_all(html.as_bytes())?;
    Ok(())
}

// =============================================================================
// Tokens Command
// =============================================================================

fn cmd_tokens(args: &InputArgs, json: bool) -> Result<()> {
    let md = build_markdown(args)?;
    let input = read_input(args)?;

    let mut env = Env::default();
    let tokens = md.parse(&input, &mut env);

    if json {
        let doc = serde_json::json!({
            "tokens": tokens,
            "references": env.references,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        let mut out = String::new();
        describe_tokens(&tokens, 0, &mut out);
        io::stdout().write_all(out.as_bytes())?;
    }
    Ok(())
}

fn describe_tokens(tokens: &[Token], indent: usize, out: &mut String) {
    for token in tokens {
        let depth = indent + token.level;
        out.push_str(&"  ".repeat(depth));
        out.push_str(&describe_token(token));
        out.push('\n');
        if !token.children.is_empty() {
            describe_tokens(&token.children, depth + 1, out);
        }
    }
}

fn describe_token(token: &Token) -> String {
    let mut line = String::from(token.kind);

    let nesting = match token.nesting {
        Nesting::Open => "+1",
        Nesting::Leaf => "0",
        Nesting::Close => "-1",
    };
    line.push_str(&format!(" ({nesting})"));

    if let Some(map) = token.map {
        line.push_str(&format!(" [{}..{})", map.start, map.end));
    }
    if token.hidden {
        line.push_str(" hidden");
    }
    if !token.markup.is_empty() {
        line.push_str(&format!(" markup={:?}", token.markup));
    }
    if !token.info.is_empty() {
        line.push_str(&format!(" info={:?}", token.info));
    }
    for (name, value) in &token.attrs {
        line.push_str(&format!(" {name}={value:?}"));
    }
    if !token.content.is_empty() && token.children.is_empty() {
        let preview: String = token.content.chars().take(60).collect();
        let ellipsis = if token.content.chars().count() > 60 { "..." } else { "" };
        line.push_str(&format!(" {:?}{}", preview, ellipsis));
    }
    line
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(args: &InputArgs, json: bool) -> Result<()> {
    let md = build_markdown(args)?;
    let input = read_input(args)?;

    let mut env = Env::default();
    let tokens = md.parse(&input, &mut env);
    let stats = DocumentStats::from_tokens(&tokens, &input, env.references.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Document Statistics");
    println!("-------------------");
    println!("Preset:       {:?}", args.preset);
    println!("Tokens:       {}", stats.tokens);
    println!("References:   {}", stats.references);
    println!();
    println!("Blocks:");
    for (kind, count) in &stats.blocks {
        println!("  {:<16}{}", format!("{kind}:"), count);
    }
    println!();
    println!("Inline:");
    for (kind, count) in &stats.inlines {
        println!("  {:<16}{}", format!("{kind}:"), count);
    }
    println!();
    println!("Size:");
    println!("  Characters:     {}", stats.chars);
    println!("  Words (est.):   {}", stats.words);
    println!("  Lines:          {}", stats.lines);

    Ok(())
}

#[derive(Serialize)]
struct DocumentStats {
    tokens: usize,
    references: usize,
    blocks: BTreeMap<&'static str, usize>,
    inlines: BTreeMap<&'static str, usize>,
    chars: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn from_tokens(tokens: &[Token], input: &str, references: usize) -> Self {
        let mut stats = Self {
            tokens: 0,
            references,
            blocks: BTreeMap::new(),
            inlines: BTreeMap::new(),
            chars: input.chars().count(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
        };

        for token in tokens {
            stats.tokens += 1;
            if token.nesting != Nesting::Close && token.kind != "inline" {
                *stats.blocks.entry(display_kind(token.kind)).or_default() += 1;
            }
            stats.count_inline(&token.children);
        }
        stats
    }

    fn count_inline(&mut self, tokens: &[Token]) {
        for token in tokens {
            self.tokens += 1;
            if token.nesting != Nesting::Close {
                *self.inlines.entry(display_kind(token.kind)).or_default() += 1;
            }
            self.count_inline(&token.children);
        }
    }
}

/// `em_open` counts as `em`.
fn display_kind(kind: &'static str) -> &'static str {
    kind.strip_suffix("_open").unwrap_or(kind)
}
