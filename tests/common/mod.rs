#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Arc;
use verso::{
    BookLayout, BookPipeline, Chapter, ExecutorImpl, FootnoteId, LayoutConfig, NoHyphenation,
    PipelineBuilder, PipelineError,
};
use verso_layout::util::fits_within;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A pipeline over the small fixture page, measured with fixed 5pt glyphs.
pub fn fixed_pipeline(parallel: bool) -> Result<BookPipeline, PipelineError> {
    pipeline_with(fixtures::small_config(), parallel)
}

pub fn pipeline_with(config: LayoutConfig, parallel: bool) -> Result<BookPipeline, PipelineError> {
    PipelineBuilder::new()
        .with_config(config)
        .with_oracle(fixtures::fixed_metrics())
        .with_hyphenator(Arc::new(NoHyphenation))
        .with_executor(ExecutorImpl::choose(parallel))
        .build()
}

/// Checks every chapter of `book` against the chapter it was built from:
/// body order, one slot per marker on the same or next page, and no overflow.
pub fn assert_book_invariants(chapters: &[Chapter], book: &BookLayout, config: &LayoutConfig) {
    assert_eq!(chapters.len(), book.chapters.len());

    for (chapter, layout) in chapters.iter().zip(&book.chapters) {
        let tree = &layout.tree;
        assert_eq!(tree.title, chapter.title);
        assert_eq!(tree.body_units(), chapter.units, "'{}' lost or reordered content", chapter.title);

        let mut slot_pages: HashMap<FootnoteId, Vec<usize>> = HashMap::new();
        for page in &tree.pages {
            for id in page.footnote_ids() {
                slot_pages.entry(id.clone()).or_default().push(page.index);
            }
        }
        let mut first_markers: HashMap<FootnoteId, usize> = HashMap::new();
        for (id, page) in tree.marker_pages() {
            first_markers.entry(id).or_insert(page);
        }
        assert_eq!(slot_pages.len(), first_markers.len(), "'{}' has stray slots", chapter.title);
        for (id, marker_page) in &first_markers {
            let pages = &slot_pages[id];
            assert_eq!(pages.len(), 1, "footnote '{}' placed {} times", id, pages.len());
            assert!(
                pages[0] == *marker_page || pages[0] == marker_page + 1,
                "footnote '{}' on page {} but its marker is on page {}",
                id,
                pages[0],
                marker_page
            );
        }

        let content = config.page.content_height;
        for page in &tree.pages {
            for column in &page.body {
                let used: f32 = column.lines.iter().map(|line| line.height).sum();
                assert!(fits_within(used, column.height));
            }
            let grid = content - page.body_height - config.footnote_area.separator_height;
            for column in &page.footnotes {
                let used: f32 = column.slots.iter().map(|slot| slot.height()).sum();
                assert!(fits_within(used, column.height));
                assert!(fits_within(column.height, grid));
            }
            assert!(fits_within(page.body_height + page.footnote_area_height, content));
        }
    }
}
