//! Stitching per-chapter layout trees into one book.

use serde::Serialize;
use std::fmt;
use verso_layout::{LayoutTree, LayoutWarning, Page};

/// One paginated stream's pages, positioned within the book: a chapter, or
/// the whole book when it was laid out as one flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterLayout {
    /// One-based book page number of the chapter's first page.
    pub first_page: usize,
    #[serde(flatten)]
    pub tree: LayoutTree,
}

impl ChapterLayout {
    pub fn title(&self) -> &str {
        &self.tree.title
    }

    pub fn page_count(&self) -> usize {
        self.tree.page_count()
    }
}

/// Chapters in reading order with continuous page numbering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookLayout {
    pub chapters: Vec<ChapterLayout>,
}

impl BookLayout {
    /// Numbers pages across `trees` in the order given, starting at 1.
    pub fn from_trees(trees: Vec<LayoutTree>) -> Self {
        let mut next_page = 1;
        let chapters = trees
            .into_iter()
            .map(|tree| {
                let first_page = next_page;
                next_page += tree.page_count();
                ChapterLayout { first_page, tree }
            })
            .collect();
        Self { chapters }
    }

    pub fn page_count(&self) -> usize {
        self.chapters.iter().map(ChapterLayout::page_count).sum()
    }

    pub fn pages(&self) -> impl Iterator<Item = BookPage<'_>> {
        self.chapters.iter().flat_map(|chapter| {
            chapter
                .tree
                .pages
                .iter()
                .map(move |page| BookPage {
                    number: chapter.first_page + page.index,
                    chapter: chapter.title(),
                    page,
                })
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = (&str, &LayoutWarning)> {
        self.chapters.iter().flat_map(|chapter| {
            chapter
                .tree
                .warnings
                .iter()
                .map(move |warning| (chapter.title(), warning))
        })
    }

    pub fn chapter(&self, title: &str) -> Option<&ChapterLayout> {
        self.chapters.iter().find(|chapter| chapter.title() == title)
    }
}

/// A page together with its book-wide number.
#[derive(Debug, Clone, Copy)]
pub struct BookPage<'a> {
    pub number: usize,
    pub chapter: &'a str,
    pub page: &'a Page,
}

impl fmt::Display for BookPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.page;
        let label = page.range_label.as_deref().unwrap_or(self.chapter);
        let lines: Vec<usize> = page.body.iter().map(|column| column.lines.len()).collect();
        write!(
            f,
            "{:>4}  {:<24} body {:?} lines, {} footnotes",
            self.number,
            label,
            lines,
            page.footnote_ids().len()
        )?;
        if page.carried_in > 0 {
            write!(f, ", {} carried in", page.carried_in)?;
        }
        if !page.deferred.is_empty() {
            write!(f, ", {} deferred", page.deferred.len())?;
        }
        Ok(())
    }
}
