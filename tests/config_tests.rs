mod common;

use common::fixtures::{
    SMALL_CONFIG_JSON, annotated_chapter, fixed_metrics, plain_chapter, small_config,
};
use common::TestResult;
use std::fs;
use std::sync::Arc;
use verso::{
    Hyphenator, LayoutConfig, LayoutError, PipelineBuilder, PipelineError, load_config,
    load_hyphenation_dictionary,
};

#[test]
fn test_config_file_round_trips_into_layout_config() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("layout.json");
    fs::write(&path, SMALL_CONFIG_JSON)?;

    let config = load_config(&path)?;
    assert_eq!(config, small_config());
    assert_eq!(config.page.content_height, 120.0);
    assert!(!config.balancing.balance_final_page);
    Ok(())
}

#[test]
fn test_partial_config_keeps_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("layout.json");
    fs::write(&path, r#"{ "footnoteArea": { "maxHeight": 200.0 }, "cacheCapacity": 64 }"#)?;

    let config = load_config(&path)?;
    let defaults = LayoutConfig::default();
    assert_eq!(config.footnote_area.max_height, 200.0);
    assert_eq!(config.footnote_area.separator_height, defaults.footnote_area.separator_height);
    assert_eq!(config.page, defaults.page);
    assert_eq!(config.typography, defaults.typography);
    assert_eq!(config.cache_capacity, 64);
    Ok(())
}

#[test]
fn test_malformed_config_is_a_json_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("layout.json");
    fs::write(&path, r#"{ "page": { "contentHeight": "tall" } }"#)?;

    assert!(matches!(load_config(&path), Err(PipelineError::Json(_))));
    Ok(())
}

#[test]
fn test_label_wider_than_the_footnote_column_fails_its_chapter() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("layout.json");
    let mut config = small_config();
    config.page.footnote_column_width = 10.0;
    fs::write(&path, serde_json::to_string(&config)?)?;

    let pipeline = PipelineBuilder::new()
        .with_config_file(&path)?
        .with_oracle(fixed_metrics())
        .build()?;
    let err = pipeline
        .paginate(vec![annotated_chapter("Ps 1", 3, 1)])
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Chapter {
            source: LayoutError::InvalidConfig(_),
            ..
        }
    ));
    Ok(())
}

#[test]
fn test_hyphenation_dictionary_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("hyphenation.txt");
    fs::write(&path, "# English\nbe-gin-ning\n\n  fir-ma-ment  \n")?;

    let dictionary = load_hyphenation_dictionary(&path)?;
    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.break_points("beginning"), vec![2, 5]);
    assert_eq!(dictionary.break_points("Firmament,"), vec![3, 5]);
    Ok(())
}

#[test]
fn test_dictionary_hyphenates_inside_the_pipeline() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    let dictionary = dir.path().join("hyphenation.txt");
    fs::write(&dictionary, "ab-un-dant-ly\n")?;

    let mut config = small_config();
    config.hyphenation.min_suffix = 2;
    let mut chapter = plain_chapter("Gen 1", 0);
    chapter.units.push(verso::ContentUnit::verse(1));
    chapter.units.push(verso::ContentUnit::text("let it bring abundantly"));

    let pipeline = PipelineBuilder::new()
        .with_config(config)
        .with_oracle(fixed_metrics())
        .with_hyphenation_file(&dictionary)?
        .with_parallelism(false)
        .build()?;
    let book = pipeline.paginate(vec![chapter.clone()])?;

    let lines: Vec<String> = book.chapters[0].tree.body_lines().map(|l| l.text()).collect();
    assert!(lines.iter().any(|line| line.ends_with('-')), "{lines:?}");
    assert_eq!(book.chapters[0].tree.body_units(), chapter.units);
    Ok(())
}

#[test]
fn test_paginate_file_reads_chapter_arrays() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("chapters.json");
    let chapters = vec![plain_chapter("Obad 1", 3), plain_chapter("Jonah 1", 12)];
    fs::write(&path, serde_json::to_string(&chapters)?)?;

    let pipeline = PipelineBuilder::new()
        .with_config(small_config())
        .with_oracle(fixed_metrics())
        .with_hyphenator(Arc::new(verso::NoHyphenation))
        .build()?;
    let book = pipeline.paginate_file(&path)?;

    assert_eq!(book.chapters.len(), 2);
    assert_eq!(book.page_count(), 3);
    assert_eq!(book.chapters[1].first_page, 2);
    Ok(())
}
