// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flowables — content that flows from page to page: paragraphs, tables, and
// summary tables.

pub mod paragraph;
pub mod summary;
pub mod table;

use rechnungswerk_core::error::Result;

use crate::canvas::FlowRow;

pub use paragraph::Paragraph;
pub use summary::SummaryTable;
pub use table::{Cell, Table};

/// Inner padding of table cells, in points.
pub const CELL_PADDING: f32 = 2.0;
/// Extra space below underlined table rows and below the title.
pub const PADDING_BOTTOM: f32 = 6.0;

/// A flowable after layout at a given width.
///
/// Rows are the unit of pagination: a page break never splits a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowLayout {
    /// Skipped at the top of a page.
    pub spacing_before: f32,
    pub spacing_after: f32,
    /// Repeated at the top of every page the body continues on.
    pub header: Vec<FlowRow>,
    pub rows: Vec<FlowRow>,
    /// Move the whole block to the next page rather than split it.
    pub keep_together: bool,
}

impl FlowLayout {
    pub fn header_height(&self) -> f32 {
        self.header.iter().map(|row| row.height).sum()
    }

    /// Height of header and body rows, without spacing.
    pub fn height(&self) -> f32 {
        self.header_height() + self.rows.iter().map(|row| row.height).sum::<f32>()
    }
}

/// Content that can be laid out at a given width.
pub trait Flowable {
    fn layout(&self, width: f32) -> Result<FlowLayout>;

    fn name(&self) -> &'static str {
        "flowable"
    }
}
