use super::config::{load_config, load_hyphenation_dictionary};
use super::orchestrator::{BookPipeline, FlowMode};
use crate::error::PipelineError;
use std::path::Path;
use std::sync::Arc;
use verso_executor::ExecutorImpl;
use verso_layout::{
    FixedAdvanceMetrics, FontMetrics, LayoutConfig, MeasurementCache, SoftHyphenHyphenator,
};
use verso_traits::{Hyphenator, MeasurementOracle};

/// A builder for creating a `BookPipeline`.
#[derive(Debug)]
pub struct PipelineBuilder {
    config: LayoutConfig,
    oracle: Option<Arc<dyn MeasurementOracle>>,
    fonts: Option<FontMetrics>,
    hyphenator: Arc<dyn Hyphenator>,
    executor: ExecutorImpl,
    mode: FlowMode,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            oracle: None,
            fonts: None,
            hyphenator: Arc::new(SoftHyphenHyphenator),
            executor: ExecutorImpl::default(),
            mode: FlowMode::default(),
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder with default geometry, fixed-advance metrics and soft-hyphen breaking.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.config = load_config(path)?;
        Ok(self)
    }

    /// Measures with a caller-supplied oracle. Takes precedence over `with_font_file`.
    pub fn with_oracle(mut self, oracle: Arc<dyn MeasurementOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Measures every role with the outlines of one TrueType/OpenType file.
    pub fn with_font_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.fonts = Some(FontMetrics::from_file(path)?);
        Ok(self)
    }

    pub fn with_hyphenator(mut self, hyphenator: Arc<dyn Hyphenator>) -> Self {
        self.hyphenator = hyphenator;
        self
    }

    pub fn with_hyphenation_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.hyphenator = Arc::new(load_hyphenation_dictionary(path)?);
        Ok(self)
    }

    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = executor;
        self
    }

    /// Paginates chapters on the rayon pool when `parallel` is set.
    pub fn with_parallelism(self, parallel: bool) -> Self {
        self.with_executor(ExecutorImpl::choose(parallel))
    }

    pub fn with_flow_mode(mut self, mode: FlowMode) -> Self {
        self.mode = mode;
        self
    }

    /// Flows later chapters on from the previous one instead of opening a page.
    pub fn with_continuous_flow(self, continuous: bool) -> Self {
        let mode = if continuous {
            FlowMode::Continuous
        } else {
            FlowMode::PerChapter
        };
        self.with_flow_mode(mode)
    }

    /// Consumes the builder, validating the configuration against the chosen metrics.
    pub fn build(self) -> Result<BookPipeline, PipelineError> {
        let capacity = self.config.cache_capacity;
        let oracle: Arc<dyn MeasurementOracle> = match (self.oracle, self.fonts) {
            (Some(oracle), _) => oracle,
            (None, Some(fonts)) => {
                log::info!("Measuring with font outlines.");
                Arc::new(MeasurementCache::new(fonts, capacity))
            }
            (None, None) => {
                log::info!("No font given. Measuring with fixed advances.");
                Arc::new(MeasurementCache::new(FixedAdvanceMetrics::default(), capacity))
            }
        };

        self.config.validate(oracle.as_ref())?;

        Ok(BookPipeline::new(
            Arc::new(self.config),
            oracle,
            self.hyphenator,
            self.executor,
        )
        .with_mode(self.mode))
    }
}
