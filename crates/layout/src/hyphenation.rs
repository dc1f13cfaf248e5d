//! Hyphenators and the policy that filters their break points.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use verso_traits::Hyphenator;

const SOFT_HYPHEN: char = '\u{00AD}';

/// Limits applied to every hyphenator's answer, counted in `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HyphenationPolicy {
    /// Words shorter than this are never split.
    pub min_word: usize,
    /// Characters that must stay on the first line.
    pub min_prefix: usize,
    /// Characters that must move to the next line.
    pub min_suffix: usize,
}

impl Default for HyphenationPolicy {
    fn default() -> Self {
        Self {
            min_word: 5,
            min_prefix: 2,
            min_suffix: 3,
        }
    }
}

impl HyphenationPolicy {
    /// Break offsets of `word` that the hyphenator proposes and the policy allows,
    /// ascending and deduplicated.
    pub fn break_points(&self, hyphenator: &dyn Hyphenator, word: &str) -> Vec<usize> {
        let total = word.chars().count();
        if total < self.min_word {
            return Vec::new();
        }
        let mut points: Vec<usize> = hyphenator
            .break_points(word)
            .into_iter()
            .filter(|&offset| offset > 0 && offset < word.len() && word.is_char_boundary(offset))
            .filter(|&offset| {
                let prefix = word[..offset].chars().count();
                prefix >= self.min_prefix && total - prefix >= self.min_suffix
            })
            .collect();
        points.sort_unstable();
        points.dedup();
        points
    }
}

/// Never splits a word.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHyphenation;

impl Hyphenator for NoHyphenation {
    fn break_points(&self, _word: &str) -> Vec<usize> {
        Vec::new()
    }
}

/// Splits after every soft hyphen (U+00AD) already present in the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftHyphenHyphenator;

impl Hyphenator for SoftHyphenHyphenator {
    fn break_points(&self, word: &str) -> Vec<usize> {
        word.char_indices()
            .filter(|(_, c)| *c == SOFT_HYPHEN)
            .map(|(i, c)| i + c.len_utf8())
            .filter(|&offset| offset < word.len())
            .collect()
    }
}

/// Looks words up in an explicit break table such as `"right-eous-ness"`.
///
/// Lookup ignores case and any leading or trailing punctuation on the word.
#[derive(Debug, Clone, Default)]
pub struct DictionaryHyphenator {
    // Lowercased word -> char positions of its breaks.
    entries: HashMap<String, Vec<usize>>,
}

impl DictionaryHyphenator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new();
        for entry in entries {
            dictionary.insert(entry.as_ref());
        }
        dictionary
    }

    /// Adds one hyphen-separated entry, e.g. `"be-gin-ning"`.
    pub fn insert(&mut self, entry: &str) {
        let mut word = String::new();
        let mut breaks = Vec::new();
        let mut chars = 0;
        for c in entry.chars() {
            if c == '-' {
                if chars > 0 {
                    breaks.push(chars);
                }
            } else {
                word.extend(c.to_lowercase());
                chars += 1;
            }
        }
        breaks.retain(|&b| b < chars);
        if !word.is_empty() {
            self.entries.insert(word, breaks);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Hyphenator for DictionaryHyphenator {
    fn break_points(&self, word: &str) -> Vec<usize> {
        let Some(start) = word.find(char::is_alphabetic) else {
            return Vec::new();
        };
        let end = word
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(word.len());
        let core = &word[start..end];
        let Some(breaks) = self.entries.get(&core.to_lowercase()) else {
            return Vec::new();
        };

        let offsets: Vec<usize> = core.char_indices().map(|(i, _)| i).collect();
        breaks
            .iter()
            .filter_map(|&position| offsets.get(position))
            .map(|&offset| start + offset)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_hyphen_points() {
        let word = "be\u{AD}gin\u{AD}ning";
        let points = SoftHyphenHyphenator.break_points(word);
        assert_eq!(points.len(), 2);
        assert_eq!(&word[..points[0]], "be\u{AD}");
        assert_eq!(&word[points[1]..], "ning");
    }

    #[test]
    fn test_dictionary_ignores_case_and_punctuation() {
        let dictionary = DictionaryHyphenator::from_entries(["right-eous-ness"]);
        let word = "(Righteousness,";
        let points = dictionary.break_points(word);
        assert_eq!(points.len(), 2);
        assert_eq!(&word[..points[0]], "(Right");
        assert_eq!(&word[..points[1]], "(Righteous");
        assert!(dictionary.break_points("wickedness").is_empty());
    }

    #[test]
    fn test_policy_filters_short_fragments() {
        let dictionary = DictionaryHyphenator::from_entries(["a-bun-dant-ly", "to-day"]);
        let policy = HyphenationPolicy::default();

        let word = "abundantly";
        let points = policy.break_points(&dictionary, word);
        // "a-" leaves too short a prefix, "-ly" too short a suffix.
        let prefixes: Vec<&str> = points.iter().map(|&p| &word[..p]).collect();
        assert_eq!(prefixes, vec!["abun"]);

        // "today" has five characters but "day" is the only legal suffix.
        let points = policy.break_points(&dictionary, "today");
        assert_eq!(points, vec![2]);

        let strict = HyphenationPolicy {
            min_word: 6,
            ..policy
        };
        assert!(strict.break_points(&dictionary, "today").is_empty());
    }

    #[test]
    fn test_no_hyphenation() {
        assert!(NoHyphenation.break_points("everlasting").is_empty());
    }
}
