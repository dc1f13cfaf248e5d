use crate::util::EPSILON;

pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Centralized logic to check if a line fits in the remaining space of a column.
///
/// * `cursor_y`: The height already consumed at the top of the column.
/// * `child_height`: The required height for the line.
/// * `available`: The total height of the column.
pub fn check_child_fit(cursor_y: f32, child_height: f32, available: f32) -> BreakAnalysis {
    let remaining = (available - cursor_y).max(0.0);
    BreakAnalysis {
        should_break: child_height > remaining + EPSILON,
        remaining_height: remaining,
    }
}
