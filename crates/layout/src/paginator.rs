//! The page assembly state machine.
//!
//! ```text
//! FillingBody -> BalancingFootnotes -> SealingPage -> FillingBody | Done
//! ```
//!
//! The only state carried from one page to the next is [`CarriedState`]:
//! the footnotes the previous page deferred and the token cursor where its
//! body stopped. Every other structure is owned by the page being built.

use crate::LayoutError;
use crate::column::{Column, FillStatus, LineSource, fill};
use crate::config::{BODY_COLUMNS, FOOTNOTE_COLUMNS, LayoutConfig};
use crate::flow::{Flow, VersePlace};
use crate::footnotes::{BalanceResult, FootnoteBalancer};
use crate::output::{FootnoteColumn, LayoutTree, LayoutWarning, Page, VerseRange};
use crate::text::{Cursor, FittedLine, LineBreaker, Role, TokenStream};
use crate::util::{EPSILON, fits_within};
use std::collections::HashSet;
use verso_traits::{Hyphenator, MeasurementOracle};
use verso_types::{Chapter, ContentUnit, FootnoteId, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    FillingBody,
    BalancingFootnotes,
    SealingPage,
    Done,
}

/// Everything one page hands to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarriedState {
    /// Footnotes that must open the next page's grid, in order.
    pub deferred: Vec<FootnoteId>,
    /// First body token not yet placed.
    pub cursor: Cursor,
}

struct PageDraft<'b> {
    index: usize,
    source: LineSource<'b>,
    columns: Vec<Column>,
    body_height: f32,
    grid: BalanceResult,
    deferred: Vec<FootnoteId>,
}

impl PageDraft<'_> {
    fn flow(&mut self) -> FillStatus {
        for column in &mut self.columns {
            if fill(&mut self.source, column) == FillStatus::Exhausted {
                return FillStatus::Exhausted;
            }
        }
        FillStatus::Full
    }

    /// Pours the page's lines back into the source and fills again at `height`.
    fn reflow(&mut self, height: f32) -> FillStatus {
        let mut lines = Vec::new();
        for column in &mut self.columns {
            lines.extend(column.take_lines());
            column.height = height;
        }
        self.source.push_front_all(lines);
        self.body_height = height;
        self.flow()
    }

    fn lines(&self) -> impl Iterator<Item = &FittedLine> {
        self.columns.iter().flat_map(|column| column.lines.iter())
    }
}

/// Paginates one chapter, or a whole book as one continuous [`Flow`].
///
/// Construction validates the configuration and the content; a marker
/// without a footnote record fails here, before any page is built.
#[derive(Debug)]
pub struct Paginator<'a> {
    config: &'a LayoutConfig,
    oracle: &'a dyn MeasurementOracle,
    hyphenator: &'a dyn Hyphenator,
    flow: Flow,
    stream: TokenStream,
    line_step: f32,
}

impl<'a> Paginator<'a> {
    pub fn new(
        chapter: &Chapter,
        config: &'a LayoutConfig,
        oracle: &'a dyn MeasurementOracle,
        hyphenator: &'a dyn Hyphenator,
    ) -> Result<Self, LayoutError> {
        config.validate(oracle)?;
        Self::with_flow(Flow::chapter(chapter)?, config, oracle, hyphenator)
    }

    /// Paginates `chapters` as one stream titled `title`: only the first
    /// chapter opens a page.
    pub fn for_book(
        title: impl Into<String>,
        chapters: &[Chapter],
        config: &'a LayoutConfig,
        oracle: &'a dyn MeasurementOracle,
        hyphenator: &'a dyn Hyphenator,
    ) -> Result<Self, LayoutError> {
        config.validate(oracle)?;
        Self::with_flow(Flow::book(title, chapters)?, config, oracle, hyphenator)
    }

    fn with_flow(
        flow: Flow,
        config: &'a LayoutConfig,
        oracle: &'a dyn MeasurementOracle,
        hyphenator: &'a dyn Hyphenator,
    ) -> Result<Self, LayoutError> {
        let paginator = Self {
            config,
            oracle,
            hyphenator,
            stream: TokenStream::from_units(flow.units()),
            flow,
            line_step: config.typography.body_line_height(oracle),
        };
        paginator.check_labels()?;
        Ok(paginator)
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    // Verse numbers and footnote labels are never split or force-placed.
    fn check_labels(&self) -> Result<(), LayoutError> {
        let typography = &self.config.typography;
        let label_width = |text: &str, role: Role| {
            let font = typography.resolve(role, TextStyle::Regular);
            self.oracle.width(text, &font.spec, font.size)
                + self.oracle.width(" ", &font.spec, font.size)
        };

        let body_width = self.config.page.body_column_width;
        for unit in self.flow.units() {
            if let ContentUnit::VerseStart { number } = unit {
                let width = label_width(&number.to_string(), Role::VerseNumber);
                if !fits_within(width, body_width) {
                    return Err(LayoutError::InvalidConfig(format!(
                        "verse number {} ({:.2}pt) is wider than the body column ({:.2}pt)",
                        number, width, body_width
                    )));
                }
            }
        }

        let footnote_width = self.config.page.footnote_column_width;
        for label in self.flow.table().labels() {
            let width = label_width(label, Role::FootnoteLabel);
            if !fits_within(width, footnote_width) {
                return Err(LayoutError::InvalidConfig(format!(
                    "footnote label '{}' ({:.2}pt) is wider than a footnote column ({:.2}pt)",
                    label, width, footnote_width
                )));
            }
        }
        Ok(())
    }

    pub fn paginate(&self) -> Result<LayoutTree, LayoutError> {
        let breaker = LineBreaker::new(
            self.oracle,
            self.hyphenator,
            &self.config.typography,
            self.config.hyphenation,
        );
        let mut balancer = FootnoteBalancer::new(
            self.flow.table(),
            &breaker,
            self.config.page.footnote_column_width,
            FOOTNOTE_COLUMNS,
            self.config.balancing.slack_tolerance,
        );

        let mut tree = LayoutTree {
            title: self.flow.title().to_string(),
            ..Default::default()
        };
        let mut carried = CarriedState::default();
        let mut placed: HashSet<FootnoteId> = HashSet::new();
        let mut draft: Option<PageDraft<'_>> = None;
        let mut state = if self.stream.is_exhausted(Cursor::START) {
            PaginationState::Done
        } else {
            PaginationState::FillingBody
        };

        loop {
            match state {
                PaginationState::FillingBody => {
                    draft = Some(self.fill_body(&breaker, tree.pages.len(), &carried)?);
                    state = PaginationState::BalancingFootnotes;
                }
                PaginationState::BalancingFootnotes => {
                    let page = draft.as_mut().ok_or_else(|| missing_draft(state))?;
                    self.balance_footnotes(page, &mut balancer, &carried, &placed)?;
                    state = PaginationState::SealingPage;
                }
                PaginationState::SealingPage => {
                    let page = draft.take().ok_or_else(|| missing_draft(state))?;
                    let (page, next) = self.seal(page, &carried, &mut tree.warnings)?;
                    placed.extend(page.footnote_ids().into_iter().cloned());
                    tree.pages.push(page);

                    let exhausted = self.stream.is_exhausted(next.cursor);
                    carried = next;
                    state = if exhausted && carried.deferred.is_empty() {
                        PaginationState::Done
                    } else {
                        PaginationState::FillingBody
                    };
                }
                PaginationState::Done => break,
            }
        }

        let unreferenced = self.flow.table().len().saturating_sub(placed.len());
        if unreferenced > 0 {
            log::debug!(
                "'{}': {} footnote records have no marker",
                self.flow.title(),
                unreferenced
            );
        }
        Ok(tree)
    }

    fn fill_body<'b>(
        &'b self,
        breaker: &'b LineBreaker<'b>,
        index: usize,
        carried: &CarriedState,
    ) -> Result<PageDraft<'b>, LayoutError> {
        let page = &self.config.page;
        let body_height = page.content_height - self.config.footnote_area.min_height;
        let mut draft = PageDraft {
            index,
            source: LineSource::new(breaker, &self.stream, page.body_column_width, carried.cursor),
            columns: (0..BODY_COLUMNS)
                .map(|_| Column::new(page.body_column_width, body_height))
                .collect(),
            body_height,
            grid: empty_grid(),
            deferred: Vec::new(),
        };
        draft.flow();

        if draft.lines().next().is_none() {
            if let Some(height) = draft.source.peek_height() {
                return Err(LayoutError::ElementTooLarge(height, body_height));
            }
        }
        Ok(draft)
    }

    fn page_footnotes(
        &self,
        draft: &PageDraft<'_>,
        carried: &CarriedState,
        placed: &HashSet<FootnoteId>,
    ) -> Vec<FootnoteId> {
        let mut ids = carried.deferred.clone();
        for column in &draft.columns {
            for id in column.markers() {
                if !placed.contains(id) && !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }

    fn balance_footnotes(
        &self,
        draft: &mut PageDraft<'_>,
        balancer: &mut FootnoteBalancer<'_>,
        carried: &CarriedState,
        placed: &HashSet<FootnoteId>,
    ) -> Result<(), LayoutError> {
        let content_height = self.config.page.content_height;
        let separator = self.config.footnote_area.separator_height;
        let full_page = content_height - separator;

        loop {
            let ids = self.page_footnotes(draft, carried, placed);
            if ids.is_empty() {
                draft.grid = empty_grid();
                draft.deferred.clear();
                return Ok(());
            }

            let available = content_height - draft.body_height - separator;
            let result = balancer.balance(&ids, available)?;
            if result.overflow.is_empty() {
                draft.grid = result;
                draft.deferred.clear();
                return Ok(());
            }

            let forced = carried
                .deferred
                .iter()
                .any(|id| result.overflow.contains(id));
            if let Some(height) = self.grown_body(draft, forced, carried) {
                log::debug!(
                    "page {}: {} footnotes overflow; body {:.2}pt -> {:.2}pt",
                    draft.index + 1,
                    result.overflow.len(),
                    draft.body_height,
                    height
                );
                draft.reflow(height);
                continue;
            }
            if forced {
                return Err(self.overflow_error(balancer, &carried.deferred)?);
            }

            // The next page must be able to take every deferred footnote at once.
            if !balancer.fits(&result.overflow, full_page)? {
                if let Some(height) = self.grown_body(draft, true, carried) {
                    log::debug!(
                        "page {}: {} footnotes would not fit the next page; body {:.2}pt -> {:.2}pt",
                        draft.index + 1,
                        result.overflow.len(),
                        draft.body_height,
                        height
                    );
                    draft.reflow(height);
                    continue;
                }
                return Err(self.overflow_error(balancer, &result.overflow)?);
            }

            log::debug!(
                "page {}: deferring {} footnotes to the next page",
                draft.index + 1,
                result.overflow.len()
            );
            draft.deferred = result.overflow.clone();
            draft.grid = result;
            return Ok(());
        }
    }

    /// Describes why `ids` cannot share one full page: a single footnote too
    /// tall for the whole grid, or their combined height.
    fn overflow_error(
        &self,
        balancer: &mut FootnoteBalancer<'_>,
        ids: &[FootnoteId],
    ) -> Result<LayoutError, LayoutError> {
        let full_page = self.config.page.content_height - self.config.footnote_area.separator_height;
        let capacity = full_page * FOOTNOTE_COLUMNS as f32;
        for id in ids {
            if !balancer.fits(std::slice::from_ref(id), full_page)? {
                return Ok(LayoutError::FootnoteTooLarge {
                    id: id.clone(),
                    height: balancer.height_of(id)?,
                    capacity,
                });
            }
        }
        let mut height = 0.0;
        for id in ids {
            height += balancer.height_of(id)?;
        }
        let first = ids
            .first()
            .cloned()
            .ok_or_else(|| LayoutError::Internal("no footnotes to defer".to_string()))?;
        Ok(LayoutError::DeferredFootnotesTooLarge {
            first,
            count: ids.len(),
            height,
            capacity,
        })
    }

    /// The next, smaller body height to retry with, if the area may still grow.
    ///
    /// With `whole_page` the area may take the entire page: carried footnotes
    /// need room, or this page's overflow would not fit the next one. Otherwise
    /// it stops at the policy maximum. Without carried footnotes the page
    /// always keeps its first line.
    fn grown_body(
        &self,
        draft: &PageDraft<'_>,
        whole_page: bool,
        carried: &CarriedState,
    ) -> Option<f32> {
        if draft.body_height <= EPSILON {
            return None;
        }
        let content_height = self.config.page.content_height;
        let limit = if whole_page {
            content_height
        } else {
            self.config.footnote_area.max_height
        };
        let floor = (content_height - limit).max(0.0);
        let next = (draft.body_height - self.line_step).max(floor);
        if next >= draft.body_height - EPSILON {
            return None;
        }

        if carried.deferred.is_empty() {
            let first = draft.lines().next().map(|line| line.height)?;
            if !fits_within(first, next) {
                return None;
            }
        }
        Some(next)
    }

    // Splits the last page's lines so the left column holds the smallest
    // prefix reaching half the total height. Keeps the greedy split when the
    // balanced one does not fit.
    fn balance_final_columns(&self, draft: &mut PageDraft<'_>) {
        let lines: Vec<FittedLine> = draft.lines().cloned().collect();
        if lines.len() < 2 {
            return;
        }
        let total: f32 = lines.iter().map(|line| line.height).sum();

        let mut split = lines.len();
        let mut running = 0.0;
        for (index, line) in lines.iter().enumerate() {
            running += line.height;
            if running + EPSILON >= total / 2.0 {
                split = index + 1;
                break;
            }
        }

        let width = self.config.page.body_column_width;
        let mut left = Column::new(width, draft.body_height);
        let mut right = Column::new(width, draft.body_height);
        let (head, tail) = lines.split_at(split);
        let placed = head.iter().all(|line| left.try_push(line.clone()).is_ok())
            && tail.iter().all(|line| right.try_push(line.clone()).is_ok());
        if placed {
            draft.columns = vec![left, right];
        }
    }

    fn seal(
        &self,
        mut draft: PageDraft<'_>,
        carried: &CarriedState,
        warnings: &mut Vec<LayoutWarning>,
    ) -> Result<(Page, CarriedState), LayoutError> {
        if self.config.balancing.balance_final_page && draft.source.is_exhausted() {
            self.balance_final_columns(&mut draft);
        }

        let content_height = self.config.page.content_height;
        let separator = self.config.footnote_area.separator_height;
        for (position, column) in draft.columns.iter().enumerate() {
            if !fits_within(column.used(), column.height) {
                return Err(LayoutError::Internal(format!(
                    "page {} body column {} holds {:.2}pt in {:.2}pt",
                    draft.index + 1,
                    position + 1,
                    column.used(),
                    column.height
                )));
            }
        }

        let footnote_area_height = if draft.grid.is_empty() {
            0.0
        } else {
            draft.grid.height() + separator
        };
        if !fits_within(draft.body_height + footnote_area_height, content_height) {
            return Err(LayoutError::Internal(format!(
                "page {} needs {:.2}pt of body and {:.2}pt of footnotes in {:.2}pt",
                draft.index + 1,
                draft.body_height,
                footnote_area_height,
                content_height
            )));
        }

        self.collect_warnings(&draft, warnings);

        let places = self.verse_places(&draft);
        let next = CarriedState {
            deferred: draft.deferred.clone(),
            cursor: draft.source.remainder(),
        };
        let page = Page {
            index: draft.index,
            body: draft.columns,
            footnotes: draft.grid.columns,
            body_height: draft.body_height,
            footnote_area_height,
            carried_in: carried.deferred.len(),
            deferred: draft.deferred,
            verses: places.map(|(first, last)| VerseRange {
                first: first.verse,
                last: last.verse,
            }),
            range_label: places.map(|(first, last)| self.flow.range_label(first, last)),
        };
        if page.is_empty() {
            return Err(LayoutError::Internal(format!(
                "page {} was sealed without content",
                page.index + 1
            )));
        }

        log::debug!(
            "page {} sealed: {} body lines, {} footnotes, {} deferred",
            page.index + 1,
            page.lines().count(),
            page.footnote_ids().len(),
            page.deferred.len()
        );
        Ok((page, next))
    }

    fn collect_warnings(&self, draft: &PageDraft<'_>, warnings: &mut Vec<LayoutWarning>) {
        let body = draft
            .lines()
            .map(|line| (line, self.config.page.body_column_width));
        let notes = draft
            .grid
            .columns
            .iter()
            .flat_map(|column| column.slots.iter())
            .flat_map(|slot| slot.lines.iter())
            .map(|line| (line, self.config.page.footnote_column_width));

        for (line, column_width) in body.chain(notes).filter(|(line, _)| line.overfull) {
            let warning = LayoutWarning::UnbreakableContent {
                page: draft.index,
                text: line.text().trim().to_string(),
                width: line.width,
                column_width,
            };
            log::warn!("{}", warning);
            warnings.push(warning);
        }
    }

    // First and last verse with content on the page.
    fn verse_places(&self, draft: &PageDraft<'_>) -> Option<(VersePlace, VersePlace)> {
        let mut places = draft
            .lines()
            .flat_map(|line| line.items.iter())
            .filter_map(|item| self.flow.place(item.unit));
        let first = places.next()?;
        let last = places.last().unwrap_or(first);
        Some((first, last))
    }
}

fn empty_grid() -> BalanceResult {
    BalanceResult {
        columns: vec![FootnoteColumn::default(); FOOTNOTE_COLUMNS],
        overflow: Vec::new(),
    }
}

fn missing_draft(state: PaginationState) -> LayoutError {
    LayoutError::Internal(format!("no page draft in state {:?}", state))
}

