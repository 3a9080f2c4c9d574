use crate::order::LineId;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LINE_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a fresh cart line id.
///
/// Process-wide monotonic counter: ids are never reused, not even across
/// session resets, so a stale id held by a closed wizard can never address a
/// line of a newer session.
pub fn next_line_id() -> LineId {
    LineId::from_raw(NEXT_LINE_ID.fetch_add(1, Ordering::Relaxed))
}
