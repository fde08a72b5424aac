//! HTML rendering of a token stream.
//!
//! Each token kind may have a render rule; tokens without one go through
//! [`Renderer::render_token`], which emits the tag with its attributes.
//! Rules can be replaced per kind with [`Renderer::set_rule`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::common::{escape_html, unescape_all};
use crate::options::Options;
use crate::token::{Nesting, Token};
use crate::Env;

/// A render rule: `(tokens, idx, options, env, renderer) -> html`.
pub type RenderRule =
    Arc<dyn Fn(&[Token], usize, &Options, &Env, &Renderer) -> String + Send + Sync>;

/// Token-stream to HTML renderer.
#[derive(Clone)]
pub struct Renderer {
    rules: HashMap<String, RenderRule>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("Renderer").field("rules", &kinds).finish()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn code_inline(tokens: &[Token], idx: usize, _: &Options, _: &Env, r: &Renderer) -> String {
    let token = &tokens[idx];
    format!("<code{}>{}</code>", r.render_attrs(token), escape_html(&token.content))
}

fn code_block(tokens: &[Token], idx: usize, _: &Options, _: &Env, r: &Renderer) -> String {
    let token = &tokens[idx];
    format!(
        "<pre{}><code>{}</code></pre>\n",
        r.render_attrs(token),
        escape_html(&token.content)
    )
}

fn fence(tokens: &[Token], idx: usize, options: &Options, _: &Env, r: &Renderer) -> String {
    let token = &tokens[idx];
    let info = if token.info.is_empty() {
        String::new()
    } else {
        unescape_all(&token.info).trim().to_string()
    };

    // First word is the language; anything after the whitespace goes to
    // the highlighter as attributes.
    let (lang_name, lang_attrs) = match info.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (info.as_str(), ""),
    };

    let highlighted = options
        .highlight
        .as_ref()
        .map(|highlight| highlight(&token.content, lang_name, lang_attrs))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| escape_html(&token.content).into_owned());

    if highlighted.starts_with("<pre") {
        return highlighted + "\n";
    }

    if info.is_empty() {
        return format!("<pre><code{}>{}</code></pre>\n", r.render_attrs(token), highlighted);
    }

    // Add the language class to a copy; the token itself stays untouched.
    let mut tmp = Token::new(token.kind, token.tag, token.nesting);
    tmp.attrs = token.attrs.clone();
    tmp.attr_join("class", &format!("{}{}", options.lang_prefix, lang_name));
    format!("<pre><code{}>{}</code></pre>\n", r.render_attrs(&tmp), highlighted)
}

fn image(tokens: &[Token], idx: usize, options: &Options, env: &Env, r: &Renderer) -> String {
    let mut token = tokens[idx].clone();
    let alt = r.render_inline_as_text(&token.children, options, env);
    token.attr_set("alt", alt);
    r.render_token(std::slice::from_ref(&token), 0, options)
}

fn line_break(options: &Options) -> &'static str {
    if options.xhtml_out {
        "<br />\n"
    } else {
        "<br>\n"
    }
}

fn hardbreak(_: &[Token], _: usize, options: &Options, _: &Env, _: &Renderer) -> String {
    line_break(options).to_string()
}

fn softbreak(_: &[Token], _: usize, options: &Options, _: &Env, _: &Renderer) -> String {
    if options.breaks {
        line_break(options).to_string()
    } else {
        "\n".to_string()
    }
}

fn text(tokens: &[Token], idx: usize, _: &Options, _: &Env, _: &Renderer) -> String {
    escape_html(&tokens[idx].content).into_owned()
}

fn raw_html(tokens: &[Token], idx: usize, _: &Options, _: &Env, _: &Renderer) -> String {
    tokens[idx].content.clone()
}

impl Renderer {
    /// Create a renderer with the default rules.
    pub fn new() -> Self {
        let mut renderer = Self { rules: HashMap::new() };
        renderer.set_rule("code_inline", Arc::new(code_inline));
        renderer.set_rule("code_block", Arc::new(code_block));
        renderer.set_rule("fence", Arc::new(fence));
        renderer.set_rule("image", Arc::new(image));
        renderer.set_rule("hardbreak", Arc::new(hardbreak));
        renderer.set_rule("softbreak", Arc::new(softbreak));
        renderer.set_rule("text", Arc::new(text));
        renderer.set_rule("html_block", Arc::new(raw_html));
        renderer.set_rule("html_inline", Arc::new(raw_html));
        renderer
    }

    /// Install or replace the rule for `kind`.
    pub fn set_rule(&mut self, kind: &str, rule: RenderRule) {
        self.rules.insert(kind.to_string(), rule);
    }

    /// The rule for `kind`, if one is installed.
    pub fn rule(&self, kind: &str) -> Option<&RenderRule> {
        self.rules.get(kind)
    }

    /// Remove the rule for `kind`, falling back to [`Renderer::render_token`].
    pub fn remove_rule(&mut self, kind: &str) -> Option<RenderRule> {
        self.rules.remove(kind)
    }

    /// Render a block-level token stream.
    pub fn render(&self, tokens: &[Token], options: &Options, env: &Env) -> String {
        let mut out = String::new();
        for (idx, token) in tokens.iter().enumerate() {
            if token.kind == "inline" {
                out.push_str(&self.render_inline(&token.children, options, env));
            } else if let Some(rule) = self.rules.get(token.kind) {
                out.push_str(&rule(tokens, idx, options, env, self));
            } else {
                out.push_str(&self.render_token(tokens, idx, options));
            }
        }
        out
    }

    /// Render the children of an `inline` token.
    pub fn render_inline(&self, tokens: &[Token], options: &Options, env: &Env) -> String {
        let mut out = String::new();
        for (idx, token) in tokens.iter().enumerate() {
            match self.rules.get(token.kind) {
                Some(rule) => out.push_str(&rule(tokens, idx, options, env, self)),
                None => out.push_str(&self.render_token(tokens, idx, options)),
            }
        }
        out
    }

    /// Flatten inline tokens to plain text, as for an image's `alt`.
    pub fn render_inline_as_text(&self, tokens: &[Token], options: &Options, env: &Env) -> String {
        let mut out = String::new();
        for token in tokens {
            match token.kind {
                "text" | "text_special" | "html_inline" | "html_block" => {
                    out.push_str(&token.content)
                }
                "image" => out.push_str(&self.render_inline_as_text(&token.children, options, env)),
                "softbreak" | "hardbreak" => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// Default rendering: the token's tag with its attributes.
    pub fn render_token(&self, tokens: &[Token], idx: usize, options: &Options) -> String {
        let token = &tokens[idx];
        if token.hidden {
            return String::new();
        }

        let mut out = String::new();

        // Newline between a hidden paragraph and the next block tag.
        if token.block && token.nesting != Nesting::Close && idx > 0 && tokens[idx - 1].hidden {
            out.push('\n');
        }

        out.push_str(if token.nesting == Nesting::Close { "</" } else { "<" });
        out.push_str(token.tag);
        out.push_str(&self.render_attrs(token));

        if token.nesting == Nesting::Leaf && options.xhtml_out {
            out.push_str(" /");
        }

        let mut need_lf = false;
        if token.block {
            need_lf = true;
            if token.nesting == Nesting::Open {
                if let Some(next) = tokens.get(idx + 1) {
                    if next.kind == "inline" || next.hidden {
                        // Block-level tag containing inline text.
                        need_lf = false;
                    } else if next.nesting == Nesting::Close && next.tag == token.tag {
                        // Empty element, opening and closing tag together.
                        need_lf = false;
                    }
                }
            }
        }

        out.push_str(if need_lf { ">\n" } else { ">" });
        out
    }

    /// ` name="value"` for each attribute, escaped.
    pub fn render_attrs(&self, token: &Token) -> String {
        let mut out = String::new();
        for (name, value) in &token.attrs {
            out.push(' ');
            out.push_str(&escape_html(name));
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out
    }
}
