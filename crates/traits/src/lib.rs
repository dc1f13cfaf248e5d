//! Capability traits consumed by the verso layout engine.
//!
//! The layout algorithm never reaches for fonts, dictionaries or threads directly.
//! Each of those is injected through one of the narrow contracts below so that
//! alternate backends can be substituted without touching the paginator.
//!
//! ## Traits
//!
//! - [`MeasurementOracle`] - glyph advances and line height for a text run
//! - [`Hyphenator`] - candidate break offsets inside a word
//! - [`Executor`] - runs independent work items (chapters), possibly in parallel
//!
//! ## Default Implementations
//!
//! - [`SyncExecutor`] - Sequential execution, no threading
//!
//! Concrete oracles and hyphenators live in `verso-layout`; the rayon executor
//! lives in `verso-executor`.

mod executor;
mod hyphenation;
mod metrics;

pub use executor::{Executor, SyncExecutor};
pub use hyphenation::Hyphenator;
pub use metrics::{FontError, Measurement, MeasurementOracle};
