use crate::LayoutError;
use std::collections::HashMap;
use verso_types::{FootnoteId, FootnoteRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteEntry {
    pub record: FootnoteRecord,
    pub label: String,
}

/// Footnote records keyed by id, with their display labels resolved.
///
/// Records without an explicit label are lettered per verse in the order
/// they are listed: `1a`, `1b`, ... `1z`, `1aa`.
#[derive(Debug, Clone, Default)]
pub struct FootnoteTable {
    entries: HashMap<FootnoteId, FootnoteEntry>,
}

impl FootnoteTable {
    pub fn new(records: &[FootnoteRecord]) -> Result<Self, LayoutError> {
        let mut entries = HashMap::with_capacity(records.len());
        let mut per_verse: HashMap<u32, usize> = HashMap::new();

        for record in records {
            let ordinal = per_verse.entry(record.verse).or_insert(0);
            let label = match &record.label {
                Some(label) => label.clone(),
                None => format!("{}{}", record.verse, letters(*ordinal)),
            };
            *ordinal += 1;

            let entry = FootnoteEntry {
                record: record.clone(),
                label,
            };
            if entries.insert(record.id.clone(), entry).is_some() {
                return Err(LayoutError::DuplicateFootnote {
                    id: record.id.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Re-keys every entry under `scope`, keeping its resolved label.
    pub fn scoped(self, scope: &str) -> Self {
        let entries = self
            .entries
            .into_values()
            .map(|mut entry| {
                let id = FootnoteId::scoped(scope, &entry.record.id);
                entry.record.id = id.clone();
                (id, entry)
            })
            .collect();
        Self { entries }
    }

    /// Moves the entries of `other` into this table.
    pub fn merge(&mut self, other: FootnoteTable) -> Result<(), LayoutError> {
        for (id, entry) in other.entries {
            if self.entries.contains_key(&id) {
                return Err(LayoutError::DuplicateFootnote { id });
            }
            self.entries.insert(id, entry);
        }
        Ok(())
    }

    pub fn get(&self, id: &FootnoteId) -> Option<&FootnoteEntry> {
        self.entries.get(id)
    }

    pub fn require(&self, id: &FootnoteId) -> Result<&FootnoteEntry, LayoutError> {
        self.get(id)
            .ok_or_else(|| LayoutError::MissingFootnote { id: id.clone() })
    }

    pub fn contains(&self, id: &FootnoteId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// 0 -> "a", 25 -> "z", 26 -> "aa".
fn letters(mut ordinal: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'a' + (ordinal % 26) as u8);
        if ordinal < 26 {
            break;
        }
        ordinal = ordinal / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
