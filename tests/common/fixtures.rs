use std::sync::Arc;
use verso::{
    Chapter, ContentUnit, FixedAdvanceMetrics, FootnoteRecord, LayoutConfig, MeasurementOracle,
    TextRun,
};

/// The small fixture page as a configuration file would spell it.
///
/// 120pt tall, two 100pt body columns (20 glyphs, 10 lines each), three 60pt
/// footnote columns and a footnote area of at most half the page.
pub const SMALL_CONFIG_JSON: &str = r#"{
    "page": {
        "contentHeight": 120.0,
        "bodyColumnWidth": 100.0,
        "footnoteColumnWidth": 60.0
    },
    "footnoteArea": {
        "minHeight": 0.0,
        "maxHeight": 60.0,
        "separatorHeight": 0.0
    },
    "typography": {
        "family": "Test",
        "bodySize": 10.0,
        "headingSize": 10.0,
        "verseNumberSize": 10.0,
        "footnoteSize": 10.0,
        "footnoteLabelSize": 10.0
    },
    "balancing": {
        "slackTolerance": 0.0,
        "balanceFinalPage": false
    }
}"#;

pub fn small_config() -> LayoutConfig {
    serde_json::from_str(SMALL_CONFIG_JSON).expect("fixture config parses")
}

/// Glyphs advance 5pt and lines are 12pt at size 10.
pub fn fixed_metrics() -> Arc<dyn MeasurementOracle> {
    Arc::new(FixedAdvanceMetrics::new(0.5, 1.2))
}

pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}

/// `count` verses of seven words: two lines each, so ten verses fill a page.
pub fn plain_chapter(title: &str, count: u32) -> Chapter {
    let mut chapter = Chapter::new(title);
    for number in 1..=count {
        chapter.units.push(ContentUnit::verse(number));
        chapter.units.push(ContentUnit::text(words(7)));
    }
    chapter
}

/// Verses of nine words with a three-word footnote on every `every`th verse.
pub fn annotated_chapter(title: &str, count: u32, every: u32) -> Chapter {
    let mut chapter = Chapter::new(title);
    for number in 1..=count {
        chapter.units.push(ContentUnit::verse(number));
        chapter.units.push(ContentUnit::text(words(5)));
        if number % every == 0 {
            let id = format!("{}-{}", title, number);
            chapter.units.push(ContentUnit::marker(id.as_str()));
            chapter.footnotes.push(FootnoteRecord::new(
                id.as_str(),
                number,
                vec![TextRun::plain(words(3))],
            ));
        }
        chapter.units.push(ContentUnit::text(format!(" {}", words(4))));
    }
    chapter
}

/// Five verses each citing a five-line note: more than one footnote area holds.
pub fn heavily_annotated_chapter(title: &str) -> Chapter {
    let mut chapter = Chapter::new(title);
    for number in 1..=5u32 {
        let id = format!("n{}", number);
        chapter.units.push(ContentUnit::verse(number));
        chapter.units.push(ContentUnit::text(words(7)));
        chapter.units.push(ContentUnit::marker(id.as_str()));
        chapter.footnotes.push(FootnoteRecord::new(
            id.as_str(),
            number,
            vec![TextRun::plain(vec!["note"; 10].join(" "))],
        ));
    }
    for number in 6..=20u32 {
        chapter.units.push(ContentUnit::verse(number));
        chapter.units.push(ContentUnit::text(words(7)));
    }
    chapter
}
