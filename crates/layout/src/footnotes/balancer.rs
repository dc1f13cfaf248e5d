use super::table::FootnoteTable;
use crate::LayoutError;
use crate::algorithms::balance;
use crate::output::{FootnoteColumn, FootnoteSlot};
use crate::text::{FittedLine, LineBreaker, TokenStream};
use std::collections::HashMap;
use verso_types::FootnoteId;

/// A footnote laid out once at the footnote column width.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFootnote {
    pub id: FootnoteId,
    pub label: String,
    pub lines: Vec<FittedLine>,
    pub height: f32,
}

impl PreparedFootnote {
    fn line_heights(&self) -> Vec<f32> {
        self.lines.iter().map(|line| line.height).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceResult {
    pub columns: Vec<FootnoteColumn>,
    /// Trailing footnotes that did not fit, in their original order.
    pub overflow: Vec<FootnoteId>,
}

impl BalanceResult {
    /// Height of the tallest column.
    pub fn height(&self) -> f32 {
        self.columns
            .iter()
            .map(|column| column.height)
            .fold(0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(FootnoteColumn::is_empty)
    }

    pub fn placed(&self) -> impl Iterator<Item = &FootnoteId> {
        self.columns
            .iter()
            .flat_map(|column| column.slots.iter())
            .filter(|slot| !slot.continued)
            .map(|slot| &slot.id)
    }
}

/// Distributes a page's footnotes over the footnote columns.
///
/// Footnote bodies are fitted once and reused across every retry the
/// paginator makes while it grows the footnote area.
#[derive(Debug)]
pub struct FootnoteBalancer<'a> {
    table: &'a FootnoteTable,
    breaker: &'a LineBreaker<'a>,
    column_width: f32,
    columns: usize,
    slack_tolerance: f32,
    prepared: HashMap<FootnoteId, PreparedFootnote>,
}

impl<'a> FootnoteBalancer<'a> {
    pub fn new(
        table: &'a FootnoteTable,
        breaker: &'a LineBreaker<'a>,
        column_width: f32,
        columns: usize,
        slack_tolerance: f32,
    ) -> Self {
        Self {
            table,
            breaker,
            column_width,
            columns,
            slack_tolerance,
            prepared: HashMap::new(),
        }
    }

    /// Fits footnote `id` at the column width, or returns the cached result.
    pub fn prepare(&mut self, id: &FootnoteId) -> Result<&PreparedFootnote, LayoutError> {
        if !self.prepared.contains_key(id) {
            let entry = self.table.require(id)?;
            let stream = TokenStream::from_footnote(&entry.label, &entry.record.body);
            let lines = self.breaker.layout_all(&stream, self.column_width);
            let height = lines.iter().map(|line| line.height).sum();
            self.prepared.insert(
                id.clone(),
                PreparedFootnote {
                    id: id.clone(),
                    label: entry.label.clone(),
                    lines,
                    height,
                },
            );
        }
        self.prepared
            .get(id)
            .ok_or_else(|| LayoutError::Internal(format!("footnote '{}' was not prepared", id)))
    }

    /// Rendered height of footnote `id` at the column width.
    pub fn height_of(&mut self, id: &FootnoteId) -> Result<f32, LayoutError> {
        Ok(self.prepare(id)?.height)
    }

    /// Whether every footnote in `ids` fits in `available` height at once.
    pub fn fits(&mut self, ids: &[FootnoteId], available: f32) -> Result<bool, LayoutError> {
        let mut heights = Vec::with_capacity(ids.len());
        for id in ids {
            heights.push(self.prepare(id)?.line_heights());
        }
        Ok(balance::pack(&heights, available.max(0.0), self.columns).is_some())
    }

    /// Places the longest prefix of `ids` that fits in `available` height,
    /// balanced across the columns; the rest is returned as overflow.
    pub fn balance(&mut self, ids: &[FootnoteId], available: f32) -> Result<BalanceResult, LayoutError> {
        let mut heights = Vec::with_capacity(ids.len());
        for id in ids {
            heights.push(self.prepare(id)?.line_heights());
        }

        let available = available.max(0.0);
        let count = balance::placeable_prefix(&heights, available, self.columns);
        let prefix = &heights[..count];
        let placements = balance::balance(prefix, available, self.columns, self.slack_tolerance)
            .or_else(|| balance::pack(prefix, available, self.columns))
            .ok_or_else(|| {
                LayoutError::Internal(format!("{} placeable footnotes failed to pack", count))
            })?;

        let mut columns = vec![FootnoteColumn::default(); self.columns];
        for placement in placements {
            let prepared = self.prepare(&ids[placement.footnote])?;
            let lines = prepared.lines[placement.lines.clone()].to_vec();
            let slot = FootnoteSlot {
                id: prepared.id.clone(),
                label: prepared.label.clone(),
                continued: placement.lines.start > 0,
                continues: placement.lines.end < prepared.lines.len(),
                lines,
            };
            let column = columns.get_mut(placement.column).ok_or_else(|| {
                LayoutError::Internal(format!("placement in missing column {}", placement.column))
            })?;
            column.height += slot.height();
            column.slots.push(slot);
        }

        let overflow = ids[count..].to_vec();
        if !overflow.is_empty() {
            log::debug!(
                "{} of {} footnotes fit in {:.2}pt; {} overflow",
                count,
                ids.len(),
                available,
                overflow.len()
            );
        }
        Ok(BalanceResult { columns, overflow })
    }
}
