//! # verso
//!
//! Paginates scripture chapters into two body columns over a balanced
//! three-column footnote grid, keeping every footnote on its marker's page or
//! the page immediately after.
//!
//! The layout engine itself lives in `verso-layout`; this crate wires it to
//! configuration files, font files and an executor, and numbers pages across
//! a whole book, either chapter by chapter or as one continuous flow.
//!
//! ```ignore
//! use verso::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new().with_config_file("layout.json")?.build()?;
//! let book = pipeline.paginate_file("genesis.json")?;
//! for page in book.pages() {
//!     println!("{page}");
//! }
//! ```

mod book;
pub mod error;
pub mod pipeline;

use std::sync::Arc;

pub use book::{BookLayout, BookPage, ChapterLayout};
pub use error::PipelineError;
pub use pipeline::{
    BookPipeline, FlowMode, PipelineBuilder, load_chapters, load_config,
    load_hyphenation_dictionary,
};

pub use verso_executor::{Executor, ExecutorImpl};
pub use verso_layout::{
    DictionaryHyphenator, FixedAdvanceMetrics, FontMetrics, LayoutConfig, LayoutError,
    LayoutTree, LayoutWarning, MeasurementCache, NoHyphenation, Page, SoftHyphenHyphenator,
};
pub use verso_traits::{Hyphenator, MeasurementOracle};
pub use verso_types::{Chapter, ContentUnit, FootnoteId, FootnoteRecord, TextRun, TextStyle};

/// Paginates `chapters` independently through `executor` and numbers pages across the book.
///
/// The configuration is validated against `oracle` before any chapter is laid out.
pub fn paginate_book(
    chapters: Vec<Chapter>,
    config: Arc<LayoutConfig>,
    oracle: Arc<dyn MeasurementOracle>,
    hyphenator: Arc<dyn Hyphenator>,
    executor: &ExecutorImpl,
) -> Result<BookLayout, PipelineError> {
    config.validate(oracle.as_ref())?;
    BookPipeline::new(config, oracle, hyphenator, executor.clone()).paginate(chapters)
}
