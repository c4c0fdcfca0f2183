//! Position scheduling
//!
//! Pure, stateless window resolution: given a position, a playback
//! timestamp, and the distribution's windows, pick the single window that
//! should drive visibility, or none. Invoked once per tick per tracked
//! position.

use crate::model::TimeWindow;

/// Resolve the window active at `position` for `timestamp_ms`.
///
/// A window matches when its position matches and
/// `start_ms <= timestamp_ms < end_ms`. When several overlap (layered or
/// mis-authored content), the tie-break is total and deterministic so the
/// same input always yields the same winner regardless of input order:
/// earliest `start_ms` first, then smallest `external_id`, then earliest
/// `end_ms`.
pub fn resolve_active<'a>(
    position: &str,
    timestamp_ms: u64,
    windows: &'a [TimeWindow],
) -> Option<&'a TimeWindow> {
    windows
        .iter()
        .filter(|w| w.position == position && w.contains(timestamp_ms))
        .min_by(|a, b| {
            a.start_ms
                .cmp(&b.start_ms)
                .then_with(|| a.external_id.cmp(&b.external_id))
                .then_with(|| a.end_ms.cmp(&b.end_ms))
        })
}
