use super::config::load_chapters;
use crate::book::BookLayout;
use crate::error::PipelineError;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use verso_executor::{Executor, ExecutorImpl};
use verso_layout::{LayoutConfig, LayoutError, LayoutTree, Paginator, book_title};
use verso_traits::{Hyphenator, MeasurementOracle};
use verso_types::Chapter;

/// How the chapters of a book share pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowMode {
    /// Every chapter opens a page and is paginated on its own, in parallel
    /// when the executor allows.
    #[default]
    PerChapter,
    /// The chapters form one stream: only the first opens a page and later
    /// ones start below an inline heading. Footnote ids and labels stay
    /// scoped to their chapter.
    Continuous,
}

/// Paginates whole books, chapter by chapter or as one continuous flow.
#[derive(Debug, Clone)]
pub struct BookPipeline {
    config: Arc<LayoutConfig>,
    oracle: Arc<dyn MeasurementOracle>,
    hyphenator: Arc<dyn Hyphenator>,
    executor: ExecutorImpl,
    mode: FlowMode,
}

impl BookPipeline {
    pub fn new(
        config: Arc<LayoutConfig>,
        oracle: Arc<dyn MeasurementOracle>,
        hyphenator: Arc<dyn Hyphenator>,
        executor: ExecutorImpl,
    ) -> Self {
        Self {
            config,
            oracle,
            hyphenator,
            executor,
            mode: FlowMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: FlowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> FlowMode {
        self.mode
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn executor_name(&self) -> &'static str {
        self.executor.name()
    }

    pub fn paginate_chapter(&self, chapter: &Chapter) -> Result<LayoutTree, PipelineError> {
        paginate_one(chapter, &self.config, self.oracle.as_ref(), self.hyphenator.as_ref())
            .map_err(|source| PipelineError::Chapter {
                title: chapter.title.clone(),
                source,
            })
    }

    /// Paginates every chapter and numbers the pages across the book.
    ///
    /// Per chapter, all chapters are attempted and the first failure in
    /// reading order is returned.
    pub fn paginate(&self, chapters: Vec<Chapter>) -> Result<BookLayout, PipelineError> {
        match self.mode {
            FlowMode::PerChapter => self.paginate_chapters(chapters),
            FlowMode::Continuous => self.paginate_continuous(&chapters),
        }
    }

    /// Lays the chapters out as one stream with a single paginator.
    pub fn paginate_continuous(&self, chapters: &[Chapter]) -> Result<BookLayout, PipelineError> {
        if chapters.is_empty() {
            return Ok(BookLayout::default());
        }
        let start = Instant::now();
        let title = book_title(chapters);
        info!(
            "Paginating {} chapters of '{}' as one flow.",
            chapters.len(),
            title
        );

        let tree = Paginator::for_book(
            title.as_str(),
            chapters,
            &self.config,
            self.oracle.as_ref(),
            self.hyphenator.as_ref(),
        )
        .and_then(|paginator| paginator.paginate())
        .map_err(|source| PipelineError::Chapter {
            title: title.clone(),
            source,
        })?;

        let book = BookLayout::from_trees(vec![tree]);
        info!(
            "Paginated '{}' into {} pages in {:.2?}.",
            title,
            book.page_count(),
            start.elapsed()
        );
        Ok(book)
    }

    fn paginate_chapters(&self, chapters: Vec<Chapter>) -> Result<BookLayout, PipelineError> {
        let start = Instant::now();
        let count = chapters.len();
        info!(
            "Paginating {} chapters with {} (parallelism {}).",
            count,
            self.executor.name(),
            self.executor.parallelism()
        );

        let config = Arc::clone(&self.config);
        let oracle = Arc::clone(&self.oracle);
        let hyphenator = Arc::clone(&self.hyphenator);
        let results = self.executor.execute_all_fallible(chapters, move |chapter: Chapter| {
            let chapter_start = Instant::now();
            let tree = paginate_one(&chapter, &config, oracle.as_ref(), hyphenator.as_ref())
                .map_err(|source| PipelineError::Chapter {
                    title: chapter.title.clone(),
                    source,
                })?;
            debug!(
                "'{}': {} pages in {:.2?}",
                chapter.title,
                tree.page_count(),
                chapter_start.elapsed()
            );
            Ok::<_, PipelineError>(tree)
        });

        let trees = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        let book = BookLayout::from_trees(trees);
        info!(
            "Paginated {} chapters into {} pages in {:.2?}.",
            count,
            book.page_count(),
            start.elapsed()
        );
        Ok(book)
    }

    pub fn paginate_file<P: AsRef<Path>>(&self, path: P) -> Result<BookLayout, PipelineError> {
        self.paginate(load_chapters(path)?)
    }
}

fn paginate_one(
    chapter: &Chapter,
    config: &LayoutConfig,
    oracle: &dyn MeasurementOracle,
    hyphenator: &dyn Hyphenator,
) -> Result<LayoutTree, LayoutError> {
    Paginator::new(chapter, config, oracle, hyphenator)?.paginate()
}
