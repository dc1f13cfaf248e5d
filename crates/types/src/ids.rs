//! Newtype wrappers for semantic IDs
//!
//! Footnote ids are compared and hashed constantly during pagination, so they are
//! backed by `Arc<str>` and clone without allocating.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The identifier linking a footnote marker in the body text to its footnote record.
/// Unique within a chapter.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FootnoteId(Arc<str>);

impl FootnoteId {
    /// Creates a new FootnoteId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this footnote ID
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualifies a chapter-local id with the chapter it belongs to: `"Gen 2/1a"`.
    pub fn scoped(scope: &str, id: &FootnoteId) -> Self {
        Self::from(format!("{}/{}", scope, id))
    }
}

impl From<String> for FootnoteId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for FootnoteId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<Arc<str>> for FootnoteId {
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FootnoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FootnoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FootnoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FootnoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FootnoteId::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footnote_id_serializes_as_plain_string() {
        let id = FootnoteId::from("note-1a");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"note-1a\"");
        let back: FootnoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_scoped_ids_keep_chapters_apart() {
        let local = FootnoteId::from("1a");
        assert_eq!(FootnoteId::scoped("Gen 2", &local).as_str(), "Gen 2/1a");
        assert_ne!(
            FootnoteId::scoped("Gen 1", &local),
            FootnoteId::scoped("Gen 2", &local)
        );
    }
}
