//! The typed scripture content consumed by the layout engine.
//!
//! Everything here is produced upstream by the normalizer and is read-only to the
//! layout crates.

use crate::font::{FontStyle, FontWeight};
use crate::ids::FootnoteId;
use serde::{Deserialize, Serialize};

/// Inline emphasis of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextStyle {
    #[default]
    Regular,
    Italic,
    Bold,
    BoldItalic,
}

impl TextStyle {
    pub fn weight(self) -> FontWeight {
        match self {
            TextStyle::Bold | TextStyle::BoldItalic => FontWeight::Bold,
            TextStyle::Regular | TextStyle::Italic => FontWeight::Regular,
        }
    }

    pub fn font_style(self) -> FontStyle {
        match self {
            TextStyle::Italic | TextStyle::BoldItalic => FontStyle::Italic,
            TextStyle::Regular | TextStyle::Bold => FontStyle::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextStyle::Regular)
    }
}

/// One atomic piece of the chapter's reading-order stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentUnit {
    Heading { text: String },
    VerseStart { number: u32 },
    TextRun(TextRun),
    FootnoteMarker { id: FootnoteId },
}

impl ContentUnit {
    pub fn heading(text: impl Into<String>) -> Self {
        ContentUnit::Heading { text: text.into() }
    }

    pub fn verse(number: u32) -> Self {
        ContentUnit::VerseStart { number }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ContentUnit::TextRun(TextRun::plain(text))
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        ContentUnit::TextRun(TextRun::new(text, style))
    }

    pub fn marker(id: impl Into<FootnoteId>) -> Self {
        ContentUnit::FootnoteMarker { id: id.into() }
    }
}

/// The body of one footnote, owned by the verse that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteRecord {
    pub id: FootnoteId,
    pub verse: u32,
    pub body: Vec<TextRun>,
    /// Display label. When absent the layout assigns `"{verse}{letter}"`.
    #[serde(default)]
    pub label: Option<String>,
}

impl FootnoteRecord {
    pub fn new(id: impl Into<FootnoteId>, verse: u32, body: Vec<TextRun>) -> Self {
        Self {
            id: id.into(),
            verse,
            body,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A chapter as delivered by the normalizer: the unit of pagination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub units: Vec<ContentUnit>,
    #[serde(default)]
    pub footnotes: Vec<FootnoteRecord>,
}

impl Chapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Marker ids in reading order, including repeats.
    pub fn marker_ids(&self) -> impl Iterator<Item = &FootnoteId> {
        self.units.iter().filter_map(|unit| match unit {
            ContentUnit::FootnoteMarker { id } => Some(id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_unit_json_shape() {
        let json = r#"[
            {"type": "heading", "text": "Chapter 1"},
            {"type": "verseStart", "number": 1},
            {"type": "textRun", "text": "In the beginning", "style": "italic"},
            {"type": "footnoteMarker", "id": "1a"}
        ]"#;
        let units: Vec<ContentUnit> = serde_json::from_str(json).unwrap();
        assert_eq!(
            units,
            vec![
                ContentUnit::heading("Chapter 1"),
                ContentUnit::verse(1),
                ContentUnit::styled("In the beginning", TextStyle::Italic),
                ContentUnit::marker("1a"),
            ]
        );
    }

    #[test]
    fn test_text_style_maps_to_font_axes() {
        assert_eq!(TextStyle::BoldItalic.weight(), FontWeight::Bold);
        assert_eq!(TextStyle::BoldItalic.font_style(), FontStyle::Italic);
        assert_eq!(TextStyle::Regular.font_style(), FontStyle::Normal);
    }
}
