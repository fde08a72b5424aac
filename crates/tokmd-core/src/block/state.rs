//! Line-oriented state for block parsing.

use memchr::memchr;

use crate::common::is_space;
use crate::token::{Nesting, Token};
use crate::{Env, Markdown};

/// Parser state shared by all block rules.
///
/// The five line tables are indexed by line number and include one sentinel
/// entry past the last line. Container rules rewrite entries for the lines
/// they own and restore them before returning.
pub struct BlockState<'a> {
    /// Normalized source text.
    pub src: &'a str,
    /// The owning parser, for options and nested tokenization.
    pub md: &'a Markdown,
    /// Per-document environment (reference definitions).
    pub env: &'a mut Env,
    /// Output token sink.
    pub tokens: Vec<Token>,

    /// Byte offset where each line starts.
    pub b_marks: Vec<usize>,
    /// Byte offset where each line ends (at the newline).
    pub e_marks: Vec<usize>,
    /// Bytes of leading whitespace (or container markup) per line.
    pub t_shift: Vec<usize>,
    /// Indent width per line, tabs expanded; `-1` marks lazy continuations.
    pub s_count: Vec<i32>,
    /// Columns consumed by enclosing block markers, for tab expansion.
    pub bs_count: Vec<i32>,

    /// Indent required by the current container.
    pub blk_indent: i32,
    /// Current line.
    pub line: usize,
    /// One past the last line this parse may touch.
    pub line_max: usize,
    /// Whether the current container renders paragraphs without wrappers.
    pub tight: bool,
    /// Indent of the enclosing list, `-1` outside lists.
    pub list_indent: i32,
    /// Name of the innermost container rule (`root`, `blockquote`, `list`, ...).
    pub parent_type: &'static str,
    /// Current nesting level of emitted tokens.
    pub level: usize,
}

impl<'a> BlockState<'a> {
    /// Build line tables for `src`.
    pub fn new(src: &'a str, md: &'a Markdown, env: &'a mut Env, tokens: Vec<Token>) -> Self {
        let bytes = src.as_bytes();
        let estimate = bytes.len() / 32 + 2;
        let mut b_marks = Vec::with_capacity(estimate);
        let mut e_marks = Vec::with_capacity(estimate);
        let mut t_shift = Vec::with_capacity(estimate);
        let mut s_count = Vec::with_capacity(estimate);
        let mut bs_count = Vec::with_capacity(estimate);

        let mut start = 0;
        while start < bytes.len() {
            let end = memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |i| start + i);

            let mut indent = 0;
            let mut offset = 0i32;
            for &b in &bytes[start..end] {
                if !is_space(b) {
                    break;
                }
                indent += 1;
                if b == b'\t' {
                    offset += 4 - offset % 4;
                } else {
                    offset += 1;
                }
            }

            b_marks.push(start);
            e_marks.push(end);
            t_shift.push(indent);
            s_count.push(offset);
            bs_count.push(0);

            start = end + 1;
        }

        // Sentinel entry keeps lookups at `line_max` in bounds.
        b_marks.push(bytes.len());
        e_marks.push(bytes.len());
        t_shift.push(0);
        s_count.push(0);
        bs_count.push(0);

        let line_max = b_marks.len() - 1;

        Self {
            src,
            md,
            env,
            tokens,
            b_marks,
            e_marks,
            t_shift,
            s_count,
            bs_count,
            blk_indent: 0,
            line: 0,
            line_max,
            tight: false,
            list_indent: -1,
            parent_type: "root",
            level: 0,
        }
    }

    /// Byte at `pos`, or 0 past the end.
    #[inline]
    pub fn byte(&self, pos: usize) -> u8 {
        self.src.as_bytes().get(pos).copied().unwrap_or(0)
    }

    /// Append a block token and return it for further setup.
    pub fn push(&mut self, kind: &'static str, tag: &'static str, nesting: Nesting) -> &mut Token {
        let mut token = Token::new(kind, tag, nesting);
        token.block = true;

        if nesting == Nesting::Close {
            self.level = self.level.saturating_sub(1);
        }
        token.level = self.level;
        if nesting == Nesting::Open {
            self.level += 1;
        }

        self.tokens.push(token);
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    /// Whether `line` holds only whitespace.
    #[inline]
    pub fn is_empty(&self, line: usize) -> bool {
        self.b_marks[line] + self.t_shift[line] >= self.e_marks[line]
    }

    /// First non-empty line at or after `from`.
    pub fn skip_empty_lines(&self, mut from: usize) -> usize {
        while from < self.line_max {
            if self.b_marks[from] + self.t_shift[from] < self.e_marks[from] {
                break;
            }
            from += 1;
        }
        from
    }

    /// Skip spaces and tabs forward from `pos`.
    pub fn skip_spaces(&self, mut pos: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        pos
    }

    /// Skip spaces and tabs backward from `pos`, not past `min`.
    pub fn skip_spaces_back(&self, mut pos: usize, min: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos > min {
            if !is_space(bytes[pos - 1]) {
                return pos;
            }
            pos -= 1;
        }
        pos
    }

    /// Skip repetitions of `code` forward from `pos`.
    pub fn skip_chars(&self, mut pos: usize, code: u8) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && bytes[pos] == code {
            pos += 1;
        }
        pos
    }

    /// Skip repetitions of `code` backward from `pos`, not past `min`.
    pub fn skip_chars_back(&self, mut pos: usize, code: u8, min: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos > min {
            if bytes[pos - 1] != code {
                return pos;
            }
            pos -= 1;
        }
        pos
    }

    /// Text of lines `[begin, end)` with up to `indent` columns stripped.
    ///
    /// Tabs that straddle the indent boundary are partially expanded into
    /// spaces. Lines keep their newline except the last one, unless
    /// `keep_last_lf` is set.
    pub fn get_lines(&self, begin: usize, end: usize, indent: usize, keep_last_lf: bool) -> String {
        if begin >= end {
            return String::new();
        }

        let bytes = self.src.as_bytes();
        let mut out = String::new();

        for line in begin..end {
            let line_start = self.b_marks[line];
            let mut first = line_start;
            let last = if line + 1 < end || keep_last_lf {
                (self.e_marks[line] + 1).min(bytes.len())
            } else {
                self.e_marks[line]
            };

            let mut line_indent = 0usize;
            while first < last && line_indent < indent {
                let ch = bytes[first];
                if is_space(ch) {
                    if ch == b'\t' {
                        let bs = self.bs_count[line].max(0) as usize;
                        line_indent += 4 - (line_indent + bs) % 4;
                    } else {
                        line_indent += 1;
                    }
                } else if first - line_start < self.t_shift[line] {
                    // Container markup masked as indentation.
                    line_indent += 1;
                } else {
                    break;
                }
                first += 1;
            }

            if line_indent > indent {
                out.extend(std::iter::repeat(' ').take(line_indent - indent));
            }
            out.push_str(&self.src[first..last]);
        }

        out
    }
}
