//! Output types from the layout engine.
//!
//! A [`LayoutTree`] is the complete, ordered result of paginating one chapter.
//! It is read-only once produced and is handed to a renderer as-is.

use crate::column::Column;
use crate::text::{FittedLine, ItemKind, Role};
use serde::Serialize;
use std::fmt;
use verso_types::{ContentUnit, FootnoteId, TextRun};

/// A footnote's rendering confined to one footnote column.
///
/// A footnote taller than a whole column is split at line boundaries into
/// consecutive columns of the same page; `continued` and `continues` mark the pieces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootnoteSlot {
    pub id: FootnoteId,
    pub label: String,
    pub lines: Vec<FittedLine>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub continued: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub continues: bool,
}

impl FootnoteSlot {
    pub fn height(&self) -> f32 {
        self.lines.iter().map(|line| line.height).sum()
    }

    /// Body text of this piece without the label.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .flat_map(|line| line.items.iter())
            .filter(|item| item.kind != ItemKind::Label)
            .map(|item| item.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootnoteColumn {
    pub slots: Vec<FootnoteSlot>,
    pub height: f32,
}

impl FootnoteColumn {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// First and last verse with content on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerseRange {
    pub first: u32,
    pub last: u32,
}

impl VerseRange {
    /// `"Genesis 1:3–9"`, or `"Genesis 1:3"` for a single verse.
    pub fn label(&self, title: &str) -> String {
        if self.first == self.last {
            format!("{}:{}", title, self.first)
        } else {
            format!("{}:{}\u{2013}{}", title, self.first, self.last)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Zero-based position within the chapter.
    pub index: usize,
    pub body: Vec<Column>,
    pub footnotes: Vec<FootnoteColumn>,
    pub body_height: f32,
    /// Tallest footnote column plus the separator; zero without footnotes.
    pub footnote_area_height: f32,
    /// Footnotes placed first because the previous page deferred them.
    pub carried_in: usize,
    /// Footnotes referenced here that did not fit and open the next page.
    pub deferred: Vec<FootnoteId>,
    pub verses: Option<VerseRange>,
    pub range_label: Option<String>,
}

impl Page {
    /// Body lines in reading order: left column, then right.
    pub fn lines(&self) -> impl Iterator<Item = &FittedLine> {
        self.body.iter().flat_map(|column| column.lines.iter())
    }

    pub fn markers(&self) -> impl Iterator<Item = &FootnoteId> {
        self.lines().flat_map(|line| line.markers())
    }

    pub fn slots(&self) -> impl Iterator<Item = &FootnoteSlot> {
        self.footnotes.iter().flat_map(|column| column.slots.iter())
    }

    /// Ids of footnotes placed on this page, each once, in grid order.
    pub fn footnote_ids(&self) -> Vec<&FootnoteId> {
        self.slots()
            .filter(|slot| !slot.continued)
            .map(|slot| &slot.id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none() && self.slots().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutWarning {
    /// A cluster wider than its column was placed alone on an overfull line.
    #[serde(rename_all = "camelCase")]
    UnbreakableContent {
        page: usize,
        text: String,
        width: f32,
        column_width: f32,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::UnbreakableContent {
                page,
                text,
                width,
                column_width,
            } => write!(
                f,
                "page {}: '{}' is {:.2}pt wide but the column is {:.2}pt",
                page + 1,
                text,
                width,
                column_width
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTree {
    pub title: String,
    pub pages: Vec<Page>,
    pub warnings: Vec<LayoutWarning>,
}

impl LayoutTree {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn body_lines(&self) -> impl Iterator<Item = &FittedLine> {
        self.pages.iter().flat_map(|page| page.lines())
    }

    /// Index of the page holding the first piece of footnote `id`.
    pub fn footnote_page(&self, id: &FootnoteId) -> Option<usize> {
        self.pages
            .iter()
            .position(|page| page.slots().any(|slot| &slot.id == id))
    }

    /// Every marker occurrence with the page it sits on.
    pub fn marker_pages(&self) -> Vec<(FootnoteId, usize)> {
        self.pages
            .iter()
            .flat_map(|page| page.markers().map(move |id| (id.clone(), page.index)))
            .collect()
    }

    /// Rebuilds the body's content units from the placed lines.
    ///
    /// For any chapter this returns exactly the units it was paginated from.
    pub fn body_units(&self) -> Vec<ContentUnit> {
        let mut units: Vec<ContentUnit> = Vec::new();
        let mut current: Option<usize> = None;

        for item in self.body_lines().flat_map(|line| line.items.iter()) {
            if current == Some(item.unit) {
                match units.last_mut() {
                    Some(ContentUnit::Heading { text }) => text.push_str(&item.text),
                    Some(ContentUnit::TextRun(run)) => run.text.push_str(&item.text),
                    _ => {}
                }
                continue;
            }
            current = Some(item.unit);
            let unit = match &item.kind {
                ItemKind::Verse { number } => ContentUnit::VerseStart { number: *number },
                ItemKind::Marker { id } => ContentUnit::FootnoteMarker { id: id.clone() },
                ItemKind::Text | ItemKind::Space | ItemKind::Label if item.role == Role::Heading => {
                    ContentUnit::Heading {
                        text: item.text.clone(),
                    }
                }
                ItemKind::Text | ItemKind::Space | ItemKind::Label => {
                    ContentUnit::TextRun(TextRun::new(item.text.clone(), item.style))
                }
            };
            units.push(unit);
        }
        units
    }
}
