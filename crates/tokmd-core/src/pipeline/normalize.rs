//! Line ending and NUL normalization.

use crate::pipeline::CoreState;

pub(crate) fn normalize(state: &mut CoreState<'_>) {
    if state.src.contains('\r') {
        state.src = state.src.replace("\r\n", "\n").replace('\r', "\n");
    }
    if state.src.contains('\0') {
        state.src = state.src.replace('\0', "\u{FFFD}");
    }
}
