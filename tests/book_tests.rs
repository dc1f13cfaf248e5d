mod common;

use common::fixtures::{annotated_chapter, fixed_metrics, plain_chapter, small_config};
use common::{TestResult, assert_book_invariants, fixed_pipeline};
use std::sync::Arc;
use verso::{
    Chapter, ContentUnit, ExecutorImpl, FlowMode, FootnoteId, LayoutError, NoHyphenation,
    PipelineError, paginate_book,
};

#[test]
fn test_pages_are_numbered_across_chapters() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let chapters = vec![
        plain_chapter("Ruth 1", 10),
        plain_chapter("Ruth 2", 11),
        plain_chapter("Ruth 3", 4),
    ];

    let book = fixed_pipeline(false)?.paginate(chapters.clone())?;

    assert_eq!(book.page_count(), 4);
    let firsts: Vec<usize> = book.chapters.iter().map(|c| c.first_page).collect();
    assert_eq!(firsts, vec![1, 2, 4]);

    let labels: Vec<(usize, Option<&str>)> = book
        .pages()
        .map(|page| (page.number, page.page.range_label.as_deref()))
        .collect();
    assert_eq!(
        labels,
        vec![
            (1, Some("Ruth 1:1\u{2013}10")),
            (2, Some("Ruth 2:1\u{2013}10")),
            (3, Some("Ruth 2:11")),
            (4, Some("Ruth 3:1\u{2013}4")),
        ]
    );
    assert_book_invariants(&chapters, &book, &small_config());
    Ok(())
}

#[test]
fn test_parallel_and_sequential_layouts_agree() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let chapters: Vec<Chapter> = (1..=8)
        .map(|n| annotated_chapter(&format!("Ps {}", n), 10 + 3 * n, 1 + n % 3))
        .collect();

    let sequential = fixed_pipeline(false)?.paginate(chapters.clone())?;
    let parallel = fixed_pipeline(true)?.paginate(chapters.clone())?;

    assert_eq!(sequential, parallel);
    assert_book_invariants(&chapters, &parallel, &small_config());
    Ok(())
}

#[test]
fn test_failing_chapter_is_named() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut broken = plain_chapter("Ruth 2", 3);
    broken.units.push(ContentUnit::marker("ghost"));
    let chapters = vec![plain_chapter("Ruth 1", 3), broken, plain_chapter("Ruth 3", 3)];

    let err = fixed_pipeline(true)?.paginate(chapters).unwrap_err();
    match &err {
        PipelineError::Chapter { title, source } => {
            assert_eq!(title, "Ruth 2");
            assert_eq!(
                source,
                &LayoutError::MissingFootnote {
                    id: FootnoteId::from("ghost")
                }
            );
        }
        other => panic!("expected a chapter error, got {other:?}"),
    }
    assert!(err.to_string().contains("Ruth 2"));
    assert!(err.layout_error().is_some());
    Ok(())
}

#[test]
fn test_paginate_book_with_explicit_capabilities() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Arc::new(small_config());
    let chapters = vec![annotated_chapter("Ps 119", 40, 3), Chapter::new("Ps 120")];

    let book = paginate_book(
        chapters.clone(),
        Arc::clone(&config),
        fixed_metrics(),
        Arc::new(NoHyphenation),
        &ExecutorImpl::choose(false),
    )?;

    assert!(book.chapters[0].page_count() > 1);
    assert_eq!(book.chapters[1].page_count(), 0);
    assert_eq!(book.chapters[1].first_page, book.page_count() + 1);
    assert_book_invariants(&chapters, &book, &config);
    Ok(())
}

#[test]
fn test_invalid_configuration_fails_before_layout() {
    let mut config = small_config();
    config.footnote_area.max_height = 500.0;
    let err = paginate_book(
        vec![plain_chapter("Ruth 1", 2)],
        Arc::new(config),
        fixed_metrics(),
        Arc::new(NoHyphenation),
        &ExecutorImpl::choose(false),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Layout(LayoutError::InvalidConfig(_))
    ));
}

#[test]
fn test_book_layout_serializes_for_renderers() -> TestResult {
    let book = fixed_pipeline(false)?.paginate(vec![plain_chapter("Jonah 1", 3)])?;
    let json = serde_json::to_value(&book)?;

    let chapter = &json["chapters"][0];
    assert_eq!(chapter["firstPage"], 1);
    assert_eq!(chapter["title"], "Jonah 1");
    assert_eq!(chapter["pages"][0]["rangeLabel"], "Jonah 1:1\u{2013}3");
    assert!(chapter["pages"][0]["body"].as_array().is_some_and(|b| b.len() == 2));
    Ok(())
}

#[test]
fn test_continuous_flow_only_opens_a_page_for_the_first_chapter() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let chapters = vec![
        plain_chapter("Ruth 1", 10),
        plain_chapter("Ruth 2", 11),
        plain_chapter("Ruth 3", 4),
    ];

    let pipeline = fixed_pipeline(false)?.with_mode(FlowMode::Continuous);
    let book = pipeline.paginate(chapters)?;

    assert_eq!(book.chapters.len(), 1);
    assert_eq!(book.chapters[0].title(), "Ruth");
    assert_eq!(book.page_count(), 3);

    let labels: Vec<(usize, Option<&str>)> = book
        .pages()
        .map(|page| (page.number, page.page.range_label.as_deref()))
        .collect();
    assert_eq!(
        labels,
        vec![
            (1, Some("Ruth 1:1\u{2013}10")),
            (2, Some("Ruth 2:1\u{2013}10")),
            (3, Some("Ruth 2:10\u{2013}3:4")),
        ]
    );

    let headings: Vec<String> = book.chapters[0]
        .tree
        .body_lines()
        .filter(|line| line.text().starts_with("Ruth"))
        .map(|line| line.text().trim().to_string())
        .collect();
    assert_eq!(headings, vec!["Ruth 2", "Ruth 3"]);
    Ok(())
}

#[test]
fn test_continuous_flow_scopes_footnotes_by_chapter() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let chapters: Vec<Chapter> = (1..=3)
        .map(|n| annotated_chapter(&format!("Ps {}", n), 12, 2))
        .collect();

    let continuous = fixed_pipeline(false)?
        .with_mode(FlowMode::Continuous)
        .paginate(chapters.clone())?;

    let tree = &continuous.chapters[0].tree;
    let placed: Vec<&FootnoteId> = tree.pages.iter().flat_map(|page| page.footnote_ids()).collect();
    let expected: usize = chapters.iter().map(|chapter| chapter.footnotes.len()).sum();
    assert_eq!(placed.len(), expected);
    assert!(placed.iter().any(|id| id.as_str() == "Ps 2/Ps 2-4"));
    for (id, marker_page) in tree.marker_pages() {
        let page = tree.footnote_page(&id).ok_or("footnote was never placed")?;
        assert!(page == marker_page || page == marker_page + 1, "{id}");
    }
    Ok(())
}

#[test]
fn test_continuous_flow_failure_names_the_book() -> TestResult {
    let mut broken = plain_chapter("Ruth 2", 3);
    broken.units.push(ContentUnit::marker("ghost"));
    let chapters = vec![plain_chapter("Ruth 1", 3), broken];

    let err = fixed_pipeline(false)?
        .with_mode(FlowMode::Continuous)
        .paginate(chapters)
        .unwrap_err();
    match err {
        PipelineError::Chapter { title, source } => {
            assert_eq!(title, "Ruth");
            assert_eq!(
                source,
                LayoutError::MissingFootnote {
                    id: FootnoteId::from("ghost")
                }
            );
        }
        other => panic!("expected a chapter error, got {other:?}"),
    }
    Ok(())
}
