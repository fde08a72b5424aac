//! The token type produced by every parsing stage.
//!
//! The parser emits a flat array of tokens. Tree structure is encoded by
//! paired open/close tokens plus a `level` counter; only `inline` tokens (and
//! `image`, for its alt text) own a vector of child tokens. [`build_tree`]
//! offers a real tree view for consumers that want one.

use crate::span::Span;

/// Whether a token opens, closes, or is self-contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(i8)]
pub enum Nesting {
    /// Closing tag, level decreases before the token.
    Close = -1,
    /// Self-contained token.
    Leaf = 0,
    /// Opening tag, level increases after the token.
    Open = 1,
}

impl Nesting {
    /// The signed nesting delta.
    #[inline]
    pub const fn delta(self) -> i8 {
        self as i8
    }
}

/// One node of the output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// Type discriminator, e.g. `paragraph_open`, `text`, `em_open`.
    pub kind: &'static str,
    /// Target element name, e.g. `p`, `em`.
    pub tag: &'static str,
    /// Ordered attribute pairs.
    pub attrs: Vec<(String, String)>,
    /// Source lines `[start, end)` for block tokens.
    pub map: Option<Span>,
    /// Open, close or leaf.
    pub nesting: Nesting,
    /// Nesting depth at emission time.
    pub level: usize,
    /// Child tokens, only for `inline` and `image`.
    pub children: Vec<Token>,
    /// Text payload for leaf tokens.
    pub content: String,
    /// The literal syntax that produced this token (`*`, `` ``` ``, `-`).
    pub markup: String,
    /// Rule specific payload: fence info string, list item number, `auto`.
    pub info: String,
    /// Free-form payload for plugins.
    pub meta: Option<String>,
    /// True for block-level tokens.
    pub block: bool,
    /// Skip tag emission when rendering (tight list paragraphs).
    pub hidden: bool,
}

impl Token {
    /// Create a token with empty payloads.
    pub fn new(kind: &'static str, tag: &'static str, nesting: Nesting) -> Self {
        Self {
            kind,
            tag,
            attrs: Vec::new(),
            map: None,
            nesting,
            level: 0,
            children: Vec::new(),
            content: String::new(),
            markup: String::new(),
            info: String::new(),
            meta: None,
            block: false,
            hidden: false,
        }
    }

    /// Index of the attribute named `name`.
    pub fn attr_index(&self, name: &str) -> Option<usize> {
        self.attrs.iter().position(|(k, _)| k == name)
    }

    /// Value of the first attribute named `name`.
    pub fn attr_get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append an attribute, even if one with the same name exists.
    pub fn attr_push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    /// Replace the value of `name`, or append it.
    pub fn attr_set(&mut self, name: &str, value: impl Into<String>) {
        match self.attr_index(name) {
            Some(idx) => self.attrs[idx].1 = value.into(),
            None => self.attrs.push((name.to_string(), value.into())),
        }
    }

    /// Append `value` to an existing attribute separated by a space, or set it.
    ///
    /// Useful for class lists.
    pub fn attr_join(&mut self, name: &str, value: &str) {
        match self.attr_index(name) {
            Some(idx) => {
                let current = &mut self.attrs[idx].1;
                current.push(' ');
                current.push_str(value);
            }
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }
}

/// A node of the tree view over a token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    /// The opening (or leaf) token of this node.
    pub token: &'a Token,
    /// Nested nodes, in order.
    pub children: Vec<Node<'a>>,
}

/// Build a tree view of a flat token stream.
///
/// Opening tokens become parents, closing tokens end them and leaves attach
/// to the innermost open node. Children of `inline` and `image` tokens are
/// expanded recursively. Unclosed openers are attached where they stand.
pub fn build_tree(tokens: &[Token]) -> Vec<Node<'_>> {
    let mut roots = Vec::new();
    let mut stack: Vec<Node<'_>> = Vec::new();

    fn attach<'a>(roots: &mut Vec<Node<'a>>, stack: &mut [Node<'a>], node: Node<'a>) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    for token in tokens {
        match token.nesting {
            Nesting::Open => stack.push(Node {
                token,
                children: Vec::new(),
            }),
            Nesting::Close => {
                if let Some(node) = stack.pop() {
                    attach(&mut roots, &mut stack, node);
                }
            }
            Nesting::Leaf => {
                let node = Node {
                    token,
                    children: build_tree(&token.children),
                };
                attach(&mut roots, &mut stack, node);
            }
        }
    }

    while let Some(node) = stack.pop() {
        attach(&mut roots, &mut stack, node);
    }

    roots
}
