use std::fmt::Debug;

/// Supplies break opportunities inside a single word.
///
/// Offsets are byte offsets into `word`, strictly increasing, each on a `char`
/// boundary and strictly between `0` and `word.len()`. The caller decides which
/// of them to use; an empty result means the word cannot be split.
pub trait Hyphenator: Send + Sync + Debug {
    fn break_points(&self, word: &str) -> Vec<usize>;
}
