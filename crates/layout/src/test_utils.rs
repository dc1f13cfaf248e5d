use crate::LayoutError;
use crate::config::{
    BalancingConfig, FootnoteAreaPolicy, LayoutConfig, PageGeometry, Typography,
};
use crate::fonts::FixedAdvanceMetrics;
use crate::hyphenation::NoHyphenation;
use crate::output::LayoutTree;
use crate::paginator::Paginator;
use crate::util::fits_within;
use std::collections::HashMap;
use verso_types::{Chapter, ContentUnit, FootnoteId, FootnoteRecord, TextRun};

/// Glyphs advance 5pt and lines are 12pt at every role's size.
pub fn test_metrics() -> FixedAdvanceMetrics {
    FixedAdvanceMetrics::new(0.5, 1.2)
}

/// A 120pt tall page: two 100pt body columns (20 glyphs, 10 lines each) and
/// three 60pt footnote columns. The footnote area may take half the page.
pub fn test_config() -> LayoutConfig {
    LayoutConfig {
        page: PageGeometry {
            content_height: 120.0,
            body_column_width: 100.0,
            footnote_column_width: 60.0,
        },
        footnote_area: FootnoteAreaPolicy {
            min_height: 0.0,
            max_height: 60.0,
            separator_height: 0.0,
        },
        typography: Typography {
            family: "Test".to_string(),
            body_size: 10.0,
            heading_size: 10.0,
            verse_number_size: 10.0,
            footnote_size: 10.0,
            footnote_label_size: 10.0,
        },
        balancing: BalancingConfig {
            slack_tolerance: 0.0,
            balance_final_page: false,
        },
        ..Default::default()
    }
}

pub fn paginate_chapter(chapter: &Chapter, config: &LayoutConfig) -> Result<LayoutTree, LayoutError> {
    let metrics = test_metrics();
    let paginator = Paginator::new(chapter, config, &metrics, &NoHyphenation)?;
    paginator.paginate()
}

/// Paginates `chapters` as one flow; also returns the flow's units.
pub fn paginate_book(
    title: &str,
    chapters: &[Chapter],
    config: &LayoutConfig,
) -> Result<(LayoutTree, Vec<ContentUnit>), LayoutError> {
    let metrics = test_metrics();
    let paginator = Paginator::for_book(title, chapters, config, &metrics, &NoHyphenation)?;
    let tree = paginator.paginate()?;
    Ok((tree, paginator.flow().units().to_vec()))
}

/// `count` repetitions of a four-glyph word.
pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}

/// A verse of seven words: exactly two lines in a 100pt column.
pub fn two_line_verse(number: u32) -> Vec<ContentUnit> {
    vec![ContentUnit::verse(number), ContentUnit::text(words(7))]
}

pub fn chapter_of_verses(title: &str, count: u32) -> Chapter {
    let mut chapter = Chapter::new(title);
    for number in 1..=count {
        chapter.units.extend(two_line_verse(number));
    }
    chapter
}

/// Ten words: five lines in a 60pt footnote column behind a `"1a"` label.
pub fn five_line_note(id: &str, verse: u32) -> FootnoteRecord {
    FootnoteRecord::new(id, verse, vec![TextRun::plain(vec!["note"; 10].join(" "))])
}

pub fn ids(names: &[&str]) -> Vec<FootnoteId> {
    names.iter().map(|name| FootnoteId::from(*name)).collect()
}

/// Checks order preservation, marker correspondence and the height limits.
pub fn assert_layout_invariants(chapter: &Chapter, tree: &LayoutTree, config: &LayoutConfig) {
    assert_flow_invariants(&chapter.units, tree, config);
}

pub fn assert_flow_invariants(units: &[ContentUnit], tree: &LayoutTree, config: &LayoutConfig) {
    assert_eq!(tree.body_units(), units, "body units were not preserved");

    let mut slots: HashMap<FootnoteId, Vec<usize>> = HashMap::new();
    for page in &tree.pages {
        for id in page.footnote_ids() {
            slots.entry(id.clone()).or_default().push(page.index);
        }
    }
    let mut seen = Vec::new();
    for (id, marker_page) in tree.marker_pages() {
        if seen.contains(&id) {
            continue;
        }
        let pages = slots.get(&id).unwrap_or_else(|| panic!("no slot for marker '{}'", id));
        assert_eq!(pages.len(), 1, "footnote '{}' placed more than once", id);
        assert!(
            pages[0] == marker_page || pages[0] == marker_page + 1,
            "footnote '{}' on page {} but its marker is on page {}",
            id,
            pages[0],
            marker_page
        );
        seen.push(id);
    }

    let content = config.page.content_height;
    for page in &tree.pages {
        for column in &page.body {
            let used: f32 = column.lines.iter().map(|line| line.height).sum();
            assert!(fits_within(used, column.height), "body column overflows on page {}", page.index);
        }
        let grid = content - page.body_height - config.footnote_area.separator_height;
        for column in &page.footnotes {
            assert!(fits_within(column.height, grid), "footnote column overflows on page {}", page.index);
        }
        assert!(fits_within(page.body_height + page.footnote_area_height, content));
    }
}
