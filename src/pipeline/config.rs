//! Loading layout configuration, chapters and hyphenation dictionaries from disk.

use crate::error::PipelineError;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use verso_layout::{DictionaryHyphenator, LayoutConfig};
use verso_types::Chapter;

fn read(path: &Path, what: &str) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {} from '{}': {}", what, path.display(), e),
        ))
    })
}

/// Reads a camelCase JSON layout configuration. Missing fields take their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LayoutConfig, PipelineError> {
    let source = read(path.as_ref(), "layout configuration")?;
    Ok(serde_json::from_str(&source)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChapterInput {
    Many(Vec<Chapter>),
    One(Chapter),
}

/// Reads either a single chapter object or an array of chapters.
pub fn load_chapters<P: AsRef<Path>>(path: P) -> Result<Vec<Chapter>, PipelineError> {
    let source = read(path.as_ref(), "chapters")?;
    parse_chapters(&source)
}

pub fn parse_chapters(source: &str) -> Result<Vec<Chapter>, PipelineError> {
    Ok(match serde_json::from_str(source)? {
        ChapterInput::Many(chapters) => chapters,
        ChapterInput::One(chapter) => vec![chapter],
    })
}

/// One hyphen-separated entry per line (`be-gin-ning`); blank lines and `#` comments are skipped.
pub fn load_hyphenation_dictionary<P: AsRef<Path>>(
    path: P,
) -> Result<DictionaryHyphenator, PipelineError> {
    let source = read(path.as_ref(), "hyphenation dictionary")?;
    let entries = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));
    let dictionary = DictionaryHyphenator::from_entries(entries);
    log::debug!(
        "Loaded {} hyphenation entries from '{}'",
        dictionary.len(),
        path.as_ref().display()
    );
    Ok(dictionary)
}
