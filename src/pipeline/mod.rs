//! Book pagination pipeline.
//!
//! - [`PipelineBuilder`]: Fluent builder choosing configuration, metrics, hyphenation and executor
//! - [`BookPipeline`]: Fans chapters out to the executor and stitches the results,
//!   or lays a whole book out as one flow under [`FlowMode::Continuous`]
//!
//! # Example
//!
//! ```ignore
//! use verso::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_config_file("layout.json")?
//!     .with_font_file("Palatino.ttf")?
//!     .build()?;
//!
//! let book = pipeline.paginate_file("genesis.json")?;
//! ```

mod builder;
pub mod config;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use config::{load_chapters, load_config, load_hyphenation_dictionary, parse_chapters};
pub use orchestrator::{BookPipeline, FlowMode};
