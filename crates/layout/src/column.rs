//! Body columns and the line source that feeds them.

use crate::algorithms::pagination::check_child_fit;
use crate::text::{Cursor, FittedLine, LineBreaker, TokenStream};
use serde::Serialize;
use std::collections::VecDeque;
use verso_types::FootnoteId;

/// A fixed-size vertical container of fitted lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub width: f32,
    pub height: f32,
    pub lines: Vec<FittedLine>,
    #[serde(skip)]
    used: f32,
}

impl Column {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
            used: 0.0,
        }
    }

    pub fn used(&self) -> f32 {
        self.used
    }

    pub fn remaining(&self) -> f32 {
        (self.height - self.used).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends `line` if it fits below the lines already placed; hands it back otherwise.
    pub fn try_push(&mut self, line: FittedLine) -> Result<(), FittedLine> {
        if check_child_fit(self.used, line.height, self.height).should_break {
            return Err(line);
        }
        self.used += line.height;
        self.lines.push(line);
        Ok(())
    }

    /// Empties the column, returning its lines in order.
    pub fn take_lines(&mut self) -> Vec<FittedLine> {
        self.used = 0.0;
        std::mem::take(&mut self.lines)
    }

    pub fn markers(&self) -> impl Iterator<Item = &FootnoteId> {
        self.lines.iter().flat_map(|line| line.markers())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    /// The next line did not fit.
    Full,
    /// The token stream has no more content.
    Exhausted,
}

/// Produces fitted lines from the shared token remainder.
///
/// Lines handed back with [`push_front`](LineSource::push_front) are served
/// again before any new fitting, so a page can be re-flowed without re-measuring.
#[derive(Debug)]
pub struct LineSource<'a> {
    breaker: &'a LineBreaker<'a>,
    stream: &'a TokenStream,
    width: f32,
    cursor: Cursor,
    pending: VecDeque<FittedLine>,
}

impl<'a> LineSource<'a> {
    pub fn new(
        breaker: &'a LineBreaker<'a>,
        stream: &'a TokenStream,
        width: f32,
        cursor: Cursor,
    ) -> Self {
        Self {
            breaker,
            stream,
            width,
            cursor,
            pending: VecDeque::new(),
        }
    }

    pub fn next_line(&mut self) -> Option<FittedLine> {
        if let Some(line) = self.pending.pop_front() {
            return Some(line);
        }
        let (line, next) = self.breaker.fit(self.stream, self.cursor, self.width)?;
        self.cursor = next;
        Some(line)
    }

    pub fn push_front(&mut self, line: FittedLine) {
        self.pending.push_front(line);
    }

    /// Returns `lines` to the front of the source, keeping their order.
    pub fn push_front_all(&mut self, lines: Vec<FittedLine>) {
        for line in lines.into_iter().rev() {
            self.pending.push_front(line);
        }
    }

    /// The position of the first line not yet placed.
    pub fn remainder(&self) -> Cursor {
        self.pending
            .front()
            .map(|line| line.start)
            .unwrap_or(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty() && self.stream.is_exhausted(self.cursor)
    }

    /// Height of the next line, fitting it if necessary.
    pub fn peek_height(&mut self) -> Option<f32> {
        let line = self.next_line()?;
        let height = line.height;
        self.push_front(line);
        Some(height)
    }
}

/// Moves lines from `source` into `column` until one does not fit or the source runs dry.
pub fn fill(source: &mut LineSource<'_>, column: &mut Column) -> FillStatus {
    loop {
        let Some(line) = source.next_line() else {
            return FillStatus::Exhausted;
        };
        if let Err(line) = column.try_push(line) {
            source.push_front(line);
            return FillStatus::Full;
        }
    }
}
