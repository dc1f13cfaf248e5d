//! Two-column scripture pagination with a balanced three-column footnote grid.
//!
//! The entry point is [`Paginator`]: it consumes one [`Chapter`](verso_types::Chapter),
//! or a book of chapters read as one [`Flow`], and produces a [`LayoutTree`] of sealed pages. Glyph metrics and hyphenation are
//! injected through the `verso-traits` capabilities.

use thiserror::Error;
use verso_types::FootnoteId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
    #[error("Footnote marker '{id}' has no matching footnote record.")]
    MissingFootnote { id: FootnoteId },
    #[error("Footnote '{id}' is defined more than once.")]
    DuplicateFootnote { id: FootnoteId },
    #[error("Line has a height of {0:.2} which exceeds the empty column height of {1:.2}.")]
    ElementTooLarge(f32, f32),
    #[error("Footnote '{id}' needs {height:.2}pt but a full page holds only {capacity:.2}pt.")]
    FootnoteTooLarge {
        id: FootnoteId,
        height: f32,
        capacity: f32,
    },
    #[error(
        "{count} footnotes deferred from '{first}' need {height:.2}pt together but a full page holds only {capacity:.2}pt."
    )]
    DeferredFootnotesTooLarge {
        first: FootnoteId,
        count: usize,
        height: f32,
        capacity: f32,
    },
    #[error("Internal layout defect: {0}")]
    Internal(String),
}

pub mod algorithms;
pub mod cache;
pub mod column;
pub mod config;
pub mod flow;
pub mod fonts;
pub mod footnotes;
pub mod hyphenation;
pub mod output;
pub mod paginator;
pub mod text;
pub mod util;

pub use self::cache::MeasurementCache;
pub use self::column::{Column, FillStatus, LineSource};
pub use self::config::{
    BalancingConfig, FootnoteAreaPolicy, LayoutConfig, PageGeometry, Typography, BODY_COLUMNS,
    FOOTNOTE_COLUMNS,
};
pub use self::flow::{Flow, VersePlace, book_title};
pub use self::fonts::{FixedAdvanceMetrics, FontMetrics};
pub use self::footnotes::{BalanceResult, FootnoteBalancer, FootnoteTable};
pub use self::hyphenation::{
    DictionaryHyphenator, HyphenationPolicy, NoHyphenation, SoftHyphenHyphenator,
};
pub use self::output::{
    FootnoteColumn, FootnoteSlot, LayoutTree, LayoutWarning, Page, VerseRange,
};
pub use self::paginator::{CarriedState, PaginationState, Paginator};
pub use self::text::{Cursor, FittedLine, ItemKind, LineBreaker, LineItem, Role, TokenStream};

#[cfg(test)]
mod test_utils;
