//! Parser options and presets.

use std::fmt;
use std::sync::Arc;

/// Syntax highlighting hook: `(code, lang, attrs) -> markup`.
///
/// Returning an empty string falls back to escaped code. Output starting with
/// `<pre` is used as-is, without the default wrapper.
pub type Highlighter = Arc<dyn Fn(&str, &str, &str) -> String + Send + Sync>;

/// Options controlling parsing and rendering.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Pass raw HTML through.
    pub html: bool,
    /// Self-close void tags (`<br />`).
    pub xhtml_out: bool,
    /// Render soft line breaks as `<br>`.
    pub breaks: bool,
    /// Class prefix for fenced code languages.
    pub lang_prefix: String,
    /// Detect bare URLs and emails.
    pub linkify: bool,
    /// Enable typographic replacements and smart quotes.
    pub typographer: bool,
    /// Double open, double close, single open, single close.
    pub quotes: [String; 4],
    /// Fenced code highlighter.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub highlight: Option<Highlighter>,
    /// Recursion cap for nested blocks and inline constructs.
    pub max_nesting: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            html: false,
            xhtml_out: false,
            breaks: false,
            lang_prefix: "language-".to_string(),
            linkify: false,
            typographer: false,
            quotes: [
                "\u{201c}".to_string(),
                "\u{201d}".to_string(),
                "\u{2018}".to_string(),
                "\u{2019}".to_string(),
            ],
            highlight: None,
            max_nesting: 100,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("html", &self.html)
            .field("xhtml_out", &self.xhtml_out)
            .field("breaks", &self.breaks)
            .field("lang_prefix", &self.lang_prefix)
            .field("linkify", &self.linkify)
            .field("typographer", &self.typographer)
            .field("quotes", &self.quotes)
            .field("highlight", &self.highlight.is_some())
            .field("max_nesting", &self.max_nesting)
            .finish()
    }
}

impl Options {
    /// Allow raw HTML.
    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    /// Self-close void tags.
    pub fn with_xhtml_out(mut self, xhtml_out: bool) -> Self {
        self.xhtml_out = xhtml_out;
        self
    }

    /// Turn soft breaks into `<br>`.
    pub fn with_breaks(mut self, breaks: bool) -> Self {
        self.breaks = breaks;
        self
    }

    /// Set the fenced code class prefix.
    pub fn with_lang_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.lang_prefix = prefix.into();
        self
    }

    /// Autolink bare URLs.
    pub fn with_linkify(mut self, linkify: bool) -> Self {
        self.linkify = linkify;
        self
    }

    /// Enable replacements and smart quotes.
    pub fn with_typographer(mut self, typographer: bool) -> Self {
        self.typographer = typographer;
        self
    }

    /// Set the smart quote glyphs.
    pub fn with_quotes(mut self, quotes: [&str; 4]) -> Self {
        self.quotes = quotes.map(str::to_string);
        self
    }

    /// Install a fenced code highlighter.
    pub fn with_highlight(mut self, highlight: Highlighter) -> Self {
        self.highlight = Some(highlight);
        self
    }

    /// Set the recursion cap.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }
}

/// Built-in configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Preset {
    /// Every rule registered; typographer and linkify off by default.
    #[default]
    Default,
    /// Strict CommonMark: no tables, strikethrough, or typographer.
    CommonMark,
    /// Paragraphs and text only. Enable rules on top of it.
    Zero,
}

/// Rule names a preset enables in each chain.
pub(crate) struct PresetRules {
    pub core: &'static [&'static str],
    pub block: &'static [&'static str],
    pub inline: &'static [&'static str],
    pub inline2: &'static [&'static str],
}

impl Preset {
    /// Options used by this preset.
    pub fn options(self) -> Options {
        match self {
            Preset::Default => Options::default(),
            Preset::CommonMark => Options {
                html: true,
                xhtml_out: true,
                max_nesting: 20,
                ..Options::default()
            },
            Preset::Zero => Options {
                max_nesting: 20,
                ..Options::default()
            },
        }
    }

    /// Rule selection, or `None` when every registered rule stays enabled.
    pub(crate) fn rules(self) -> Option<PresetRules> {
        match self {
            Preset::Default => None,
            Preset::CommonMark => Some(PresetRules {
                core: &["normalize", "block", "inline", "text_join"],
                block: &[
                    "blockquote",
                    "code",
                    "fence",
                    "heading",
                    "hr",
                    "html_block",
                    "lheading",
                    "list",
                    "reference",
                    "paragraph",
                ],
                inline: &[
                    "autolink",
                    "backticks",
                    "emphasis",
                    "entity",
                    "escape",
                    "html_inline",
                    "image",
                    "link",
                    "newline",
                    "text",
                ],
                inline2: &["balance_pairs", "emphasis", "fragments_join"],
            }),
            Preset::Zero => Some(PresetRules {
                core: &["normalize", "block", "inline", "text_join"],
                block: &["paragraph"],
                inline: &["text"],
                inline2: &["balance_pairs", "fragments_join"],
            }),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Preset::Default),
            "commonmark" => Ok(Preset::CommonMark),
            "zero" => Ok(Preset::Zero),
            other => Err(format!("unknown preset: {}", other)),
        }
    }
}
