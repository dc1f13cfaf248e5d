/// Tolerance used for every height and width comparison in the layout.
pub const EPSILON: f32 = 0.01;

/// Robust floating point comparison for layout calculations.
pub fn floats_fuzzy_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Helper for comparing slices of floats (e.g., column heights).
pub fn float_slices_fuzzy_eq(a: &[f32], b: &[f32]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| floats_fuzzy_eq(*x, *y))
}

/// `true` when `value` does not exceed `limit` beyond the layout tolerance.
pub fn fits_within(value: f32, limit: f32) -> bool {
    value <= limit + EPSILON
}
