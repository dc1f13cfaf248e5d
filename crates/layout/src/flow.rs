//! The body stream a paginator lays out.
//!
//! A flow is either a single chapter or a whole book read as one stream. In a
//! book flow only the first chapter opens a page; every later chapter starts
//! inline below an in-column heading. Footnotes stay chapter-scoped: each
//! chapter's records are labelled on their own and their ids are qualified
//! with the chapter title (see [`FootnoteId::scoped`]).

use crate::LayoutError;
use crate::footnotes::FootnoteTable;
use crate::output::VerseRange;
use verso_types::{Chapter, ContentUnit, FootnoteId};

/// A chapter of the flow and the verse in effect at some unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersePlace {
    pub chapter: usize,
    pub verse: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Flow {
    title: String,
    units: Vec<ContentUnit>,
    chapters: Vec<String>,
    places: Vec<Option<VersePlace>>,
    table: FootnoteTable,
}

impl Flow {
    /// One chapter, with its footnote ids as given.
    pub fn chapter(chapter: &Chapter) -> Result<Self, LayoutError> {
        let table = checked_table(chapter)?;
        let mut flow = Self {
            title: chapter.title.clone(),
            table,
            ..Default::default()
        };
        flow.chapters.push(chapter.title.clone());
        for unit in &chapter.units {
            flow.push(0, unit.clone());
        }
        Ok(flow)
    }

    /// The chapters of one book as a single continuous stream.
    ///
    /// A chapter after the first gets a heading with its title unless its
    /// units already open with one.
    pub fn book(title: impl Into<String>, chapters: &[Chapter]) -> Result<Self, LayoutError> {
        let mut flow = Self {
            title: title.into(),
            ..Default::default()
        };
        for (index, chapter) in chapters.iter().enumerate() {
            let scope = chapter.title.as_str();
            flow.table.merge(checked_table(chapter)?.scoped(scope))?;
            flow.chapters.push(chapter.title.clone());

            let has_heading = matches!(chapter.units.first(), Some(ContentUnit::Heading { .. }));
            if index > 0 && !has_heading {
                flow.push(index, ContentUnit::heading(scope));
            }
            for unit in &chapter.units {
                let unit = match unit {
                    ContentUnit::FootnoteMarker { id } => ContentUnit::FootnoteMarker {
                        id: FootnoteId::scoped(scope, id),
                    },
                    other => other.clone(),
                };
                flow.push(index, unit);
            }
        }
        log::debug!(
            "'{}': {} chapters, {} units, {} footnotes in one flow",
            flow.title,
            flow.chapters.len(),
            flow.units.len(),
            flow.table.len()
        );
        Ok(flow)
    }

    // The verse in effect is the latest verse start of the same chapter.
    fn push(&mut self, chapter: usize, unit: ContentUnit) {
        let previous = self.places.last().copied().flatten();
        let place = match &unit {
            ContentUnit::VerseStart { number } => Some(VersePlace {
                chapter,
                verse: *number,
            }),
            _ => previous.filter(|place| place.chapter == chapter),
        };
        self.places.push(place);
        self.units.push(unit);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn units(&self) -> &[ContentUnit] {
        &self.units
    }

    pub fn table(&self) -> &FootnoteTable {
        &self.table
    }

    pub fn chapter_titles(&self) -> &[String] {
        &self.chapters
    }

    pub fn place(&self, unit: usize) -> Option<VersePlace> {
        self.places.get(unit).copied().flatten()
    }

    /// `"Gen 1:3–9"` within one chapter; `"Gen 1:30–2:3"` across chapters of
    /// one book, or both titles in full when the book names differ.
    pub fn range_label(&self, first: VersePlace, last: VersePlace) -> String {
        let title = |place: VersePlace| {
            self.chapters
                .get(place.chapter)
                .map(String::as_str)
                .unwrap_or(self.title.as_str())
        };
        if first.chapter == last.chapter {
            let range = VerseRange {
                first: first.verse,
                last: last.verse,
            };
            return range.label(title(first));
        }

        let (from, to) = (title(first), title(last));
        match (split_chapter_title(from), split_chapter_title(to)) {
            ((Some(a), _), (Some(b), number)) if a == b => {
                format!("{}:{}\u{2013}{}:{}", from, first.verse, number, last.verse)
            }
            _ => format!("{}:{}\u{2013}{}:{}", from, first.verse, to, last.verse),
        }
    }
}

/// Splits `"1 Kings 3"` into the book name and the chapter number. A title
/// without a trailing number has no book part.
pub fn split_chapter_title(title: &str) -> (Option<&str>, &str) {
    match title.trim_end().rsplit_once(' ') {
        Some((book, number)) if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => {
            (Some(book.trim_end()), number)
        }
        _ => (None, title),
    }
}

/// The book a run of chapters belongs to, named after its first chapter.
pub fn book_title(chapters: &[Chapter]) -> String {
    match chapters.first() {
        Some(chapter) => {
            let (book, _) = split_chapter_title(&chapter.title);
            book.unwrap_or(&chapter.title).to_string()
        }
        None => String::new(),
    }
}

// Every marker must resolve within its own chapter.
fn checked_table(chapter: &Chapter) -> Result<FootnoteTable, LayoutError> {
    let table = FootnoteTable::new(&chapter.footnotes)?;
    for id in chapter.marker_ids() {
        table.require(id)?;
    }
    Ok(table)
}
