//! Link reference definitions: `[label]: destination "title"`.

use crate::block::BlockState;
use crate::common::is_space;
use crate::common::link::{parse_link_destination, scan_link_title, TitleScan};
use crate::common::normalize_reference;
use crate::{Reference, RuleResult};

pub(crate) fn reference(
    state: &mut BlockState<'_>,
    start_line: usize,
    _end_line: usize,
    silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    let mut pos = state.b_marks[start_line] + state.t_shift[start_line];
    let max = state.e_marks[start_line];
    if state.byte(pos) != b'[' {
        return RuleResult::NoMatch;
    }

    // Quick reject of `[link](url)` at the start of a line.
    loop {
        pos += 1;
        if pos >= max {
            break;
        }
        if state.byte(pos) == b']' && state.byte(pos - 1) != b'\\' {
            if pos + 1 == max || state.byte(pos + 1) != b':' {
                return RuleResult::NoMatch;
            }
            break;
        }
    }

    let old_parent_type = state.parent_type;
    state.parent_type = "reference";
    let result = scan_definition(state, start_line, silent);
    state.parent_type = old_parent_type;
    result
}

/// Definition text gathered line by line, only as far as the scanners need.
///
/// Each line is taken from `b_marks + t_shift`, so continuation lines lose
/// their indentation and container markup.
struct DefinitionText {
    text: String,
    /// First line not yet appended.
    next_line: usize,
}

impl DefinitionText {
    fn new(state: &BlockState<'_>, start_line: usize) -> Self {
        let mut def = Self {
            text: String::new(),
            next_line: start_line,
        };
        def.append(state);
        def
    }

    fn append(&mut self, state: &BlockState<'_>) {
        let line = self.next_line;
        let start = state.b_marks[line] + state.t_shift[line];
        let end = (state.e_marks[line] + 1).min(state.src.len());
        self.text.push_str(&state.src[start..end]);
        self.next_line += 1;
    }

    /// Append the next line if it may continue the definition.
    fn pull(&mut self, state: &mut BlockState<'_>) -> bool {
        let line = self.next_line;
        let end_line = state.line_max;
        if line >= end_line || state.is_empty(line) {
            return false;
        }

        // Deep indent is a lazy continuation, not code; a negative count was
        // already checked by an enclosing blockquote.
        let continuation = state.s_count[line] - state.blk_indent > 3 || state.s_count[line] < 0;
        if !continuation {
            let md = state.md;
            let terminate = md
                .block
                .ruler
                .get_rules("reference")
                .iter()
                .any(|rule| rule(state, line, end_line, true).is_match());
            if terminate {
                return false;
            }
        }

        self.append(state);
        true
    }

    /// Skip spaces, tabs and newlines from `pos`, pulling lines as needed.
    fn skip_whitespace(&mut self, state: &mut BlockState<'_>, mut pos: usize) -> usize {
        loop {
            let byte = self.text.as_bytes().get(pos).copied();
            match byte {
                Some(b'\n') => {
                    self.pull(state);
                }
                Some(b) if is_space(b) => {}
                _ => return pos,
            }
            pos += 1;
        }
    }
}

fn scan_definition(state: &mut BlockState<'_>, start_line: usize, silent: bool) -> RuleResult {
    let md = state.md;
    let mut def = DefinitionText::new(state, start_line);

    // The caller checked the opening `[`.
    let mut label_end = None;
    let mut pos = 1;
    while pos < def.text.len() {
        let byte = def.text.as_bytes()[pos];
        match byte {
            b'[' => return RuleResult::NoMatch,
            b']' => {
                label_end = Some(pos);
                break;
            }
            b'\n' => {
                def.pull(state);
            }
            b'\\' => {
                pos += 1;
                let escaped = def.text.as_bytes().get(pos).copied();
                if escaped == Some(b'\n') {
                    def.pull(state);
                }
            }
            _ => {}
        }
        pos += 1;
    }

    let Some(label_end) = label_end else {
        return RuleResult::NoMatch;
    };
    if def.text.as_bytes().get(label_end + 1) != Some(&b':') {
        return RuleResult::NoMatch;
    }

    // [label]:   destination   'title'
    //         ^^^ optional whitespace, newlines included
    let pos = def.skip_whitespace(state, label_end + 2);

    let Some(dest) = parse_link_destination(&def.text, pos, def.text.len()) else {
        return RuleResult::NoMatch;
    };
    let href = (md.normalize_link)(&dest.value);
    if !(md.validate_link)(&href) {
        return RuleResult::NoMatch;
    }

    // Rollback point when the title turns out to be invalid.
    let dest_end_pos = dest.pos;
    let dest_end_line = def.next_line;

    let title_start = def.skip_whitespace(state, dest.pos);

    let mut title = None;
    if title_start != dest_end_pos {
        let mut resume = title_start + 1;
        loop {
            match scan_link_title(&def.text, title_start, resume, def.text.len()) {
                TitleScan::Done(part) => {
                    title = Some(part);
                    break;
                }
                TitleScan::Open(at) if def.pull(state) => resume = at,
                TitleScan::Open(_) | TitleScan::Invalid => break,
            }
        }
    }

    let (mut pos, mut title) = match title {
        Some(part) => (part.pos, part.value),
        None => {
            def.next_line = dest_end_line;
            (dest_end_pos, String::new())
        }
    };

    let bytes = def.text.as_bytes();
    let max = bytes.len();

    // Only spaces may follow on the line.
    pos = skip_spaces_in(bytes, pos, max);
    if pos < max && bytes[pos] != b'\n' && !title.is_empty() {
        // Garbage after the title: fall back to a definition without one.
        title.clear();
        pos = skip_spaces_in(bytes, dest_end_pos, max);
        def.next_line = dest_end_line;
    }
    if pos < max && bytes[pos] != b'\n' {
        return RuleResult::NoMatch;
    }

    let label = normalize_reference(&def.text[1..label_end]);
    if label.is_empty() {
        return RuleResult::NoMatch;
    }

    // A definition never interrupts anything; silent mode is a formality.
    if silent {
        return RuleResult::Matched;
    }

    state
        .env
        .references
        .entry(label)
        .or_insert(Reference { href, title });

    state.line = def.next_line;
    RuleResult::Matched
}

fn skip_spaces_in(bytes: &[u8], mut pos: usize, max: usize) -> usize {
    while pos < max && is_space(bytes[pos]) {
        pos += 1;
    }
    pos
}
