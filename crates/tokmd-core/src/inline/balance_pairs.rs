//! Pair up emphasis-like delimiters.
//!
//! For every closer, search backwards for the nearest compatible opener.
//! Failed searches record a lower bound per (marker, can-open, length % 3) so
//! later closers never rescan the same range, and matched ranges are skipped
//! through `jumps`. Together these keep the pass linear on inputs like
//! `*_*_*_*_...`.

use std::collections::HashMap;

use crate::inline::{Delimiter, InlineState};

fn process_delimiters(delimiters: &mut [Delimiter]) {
    let max = delimiters.len();
    if max == 0 {
        return;
    }

    let mut openers_bottom: HashMap<u8, [isize; 6]> = HashMap::new();
    let mut header_idx = 0usize;
    let mut last_token_idx: isize = -2;
    let mut jumps: Vec<isize> = Vec::with_capacity(max);

    for closer_idx in 0..max {
        let closer = delimiters[closer_idx];
        jumps.push(0);

        // Markers belong to the same run if their tokens are adjacent and
        // the marker chars match.
        if delimiters[header_idx].marker != closer.marker
            || last_token_idx != closer.token as isize - 1
        {
            header_idx = closer_idx;
        }
        last_token_idx = closer.token as isize;

        if !closer.close {
            continue;
        }

        let bucket = (if closer.open { 3 } else { 0 }) + closer.length % 3;
        let bottoms = openers_bottom.entry(closer.marker).or_insert([-1; 6]);
        let min_opener_idx = bottoms[bucket];

        let mut opener_idx = header_idx as isize - jumps[header_idx] - 1;
        let mut new_min_opener_idx = opener_idx;

        while opener_idx > min_opener_idx {
            let oi = opener_idx as usize;
            let opener = delimiters[oi];

            if opener.marker == closer.marker && opener.open && opener.end.is_none() {
                // Rule of 3: if either side can both open and close, the
                // run lengths must not sum to a multiple of 3 unless both
                // are multiples of 3.
                let is_odd_match = (opener.close || closer.open)
                    && (opener.length + closer.length) % 3 == 0
                    && (opener.length % 3 != 0 || closer.length % 3 != 0);

                if !is_odd_match {
                    // If the previous delimiter cannot open, the whole
                    // sequence can be skipped by future searches.
                    let last_jump = if oi > 0 && !delimiters[oi - 1].open {
                        jumps[oi - 1] + 1
                    } else {
                        0
                    };

                    jumps[closer_idx] = closer_idx as isize - opener_idx + last_jump;
                    jumps[oi] = last_jump;

                    delimiters[closer_idx].open = false;
                    delimiters[oi].end = Some(closer_idx);
                    delimiters[oi].close = false;
                    new_min_opener_idx = -1;
                    // Treat the next token as the start of a new run.
                    last_token_idx = -2;
                    break;
                }
            }

            opener_idx -= jumps[oi] + 1;
        }

        if new_min_opener_idx != -1 {
            // No opener below this point can match a closer of this kind.
            openers_bottom.entry(closer.marker).or_insert([-1; 6])[bucket] = new_min_opener_idx;
        }
    }
}

/// Resolve every delimiter list of the content.
pub(crate) fn balance_pairs(state: &mut InlineState<'_>) {
    process_delimiters(&mut state.delimiter_lists[0]);
    for meta in 0..state.tokens_meta.len() {
        if let Some(list) = state.tokens_meta[meta] {
            process_delimiters(&mut state.delimiter_lists[list]);
        }
    }
}
