/// Points earned for one tick of upward camera scroll.
///
/// Scoring: the integer floor of the scroll distance in pixels. Fractions are
/// dropped per tick, never carried over. Non-positive or non-finite input scores 0.
pub fn scroll_score(diff: f32) -> u64 {
    if diff.is_finite() && diff > 0.0 {
        diff.floor() as u64
    } else {
        0
    }
}
