// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flow composer — turns an invoice into flowing content: title, intro,
// positions table, totals, and conditions.

pub mod policy;

use rechnungswerk_core::config::{InvoiceConfig, LayoutConfig};
use rechnungswerk_core::error::Result;
use rechnungswerk_core::{Alignment, ColumnTitles, Invoice, Position, mm_to_pt};

use crate::canvas::{Canvas, FontSpec};
use crate::flowable::{Cell, PADDING_BOTTOM, Paragraph, SummaryTable, Table};

pub use policy::{BreakReason, PageBreakPolicy};

/// Columns of the positions table.
pub const POSITION_COLUMNS: usize = 4;

/// Font and leading of one kind of table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub font: FontSpec,
    pub leading: f32,
}

/// How each kind of position becomes table cells.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionStrategies {
    pub heading1: RowStyle,
    pub heading2: RowStyle,
    pub item: RowStyle,
}

impl PositionStrategies {
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        let fonts = &layout.fonts;
        let leading = &layout.leading;
        Self {
            heading1: RowStyle {
                font: FontSpec::bold(fonts.h1_size),
                leading: leading.h1,
            },
            heading2: RowStyle {
                font: FontSpec::bold(fonts.h2_size),
                leading: leading.h2,
            },
            item: RowStyle {
                font: FontSpec::regular(fonts.size),
                leading: leading.default,
            },
        }
    }

    /// Cells for `position`; the last position closes the table with a rule.
    pub fn cells(&self, position: &Position, last: bool) -> Vec<Cell> {
        let finish = |cell: Cell| {
            if last {
                cell.padding_bottom(PADDING_BOTTOM).border_bottom()
            } else {
                cell
            }
        };

        match position {
            Position::Heading1 { text } => vec![finish(heading(text, self.heading1))],
            Position::Heading2 { text } => vec![finish(heading(text, self.heading2))],
            Position::Item(item) => {
                let style = self.item;
                let cell = |text: &str, alignment| {
                    finish(
                        Cell::new(text, style.font)
                            .leading(style.leading)
                            .alignment(alignment),
                    )
                };
                vec![
                    cell(&item.description, Alignment::Left),
                    cell(&item.quantity, Alignment::Right),
                    cell(&item.unit_price, Alignment::Right),
                    cell(&item.total, Alignment::Right),
                ]
            }
        }
    }
}

fn heading(text: &str, style: RowStyle) -> Cell {
    Cell::new(text, style.font)
        .leading(style.leading)
        .colspan(POSITION_COLUMNS)
}

/// Lays out the flowing part of an invoice.
pub struct FlowComposer<'a> {
    layout: &'a LayoutConfig,
    payment_conditions: Option<&'a [String]>,
    strategies: PositionStrategies,
    policy: PageBreakPolicy,
}

impl<'a> FlowComposer<'a> {
    pub fn new(config: &'a InvoiceConfig, slip_present: bool) -> Self {
        Self {
            layout: &config.layout,
            payment_conditions: config.payment_conditions.as_deref(),
            strategies: PositionStrategies::from_layout(&config.layout),
            policy: PageBreakPolicy::new(slip_present, &config.slip),
        }
    }

    pub fn with_strategies(mut self, strategies: PositionStrategies) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn policy(&self) -> &PageBreakPolicy {
        &self.policy
    }

    /// Add all flowing content of `invoice` to `canvas` and leave the cursor on
    /// the page that will carry the payment slip.
    pub fn compose<C: Canvas + ?Sized>(&self, canvas: &mut C, invoice: &Invoice) -> Result<()> {
        let layout = self.layout;
        let space_before = mm_to_pt(layout.space_before_mm);

        canvas.add(&self.title(&invoice.title))?;
        if let Some(intro) = &invoice.intro {
            canvas.add(&self.paragraph(intro.clone()))?;
        }

        canvas.add(&self.positions_table(&invoice.column_titles, &invoice.positions).spacing_before(space_before))?;

        let totals = SummaryTable::new(&invoice.total, Alignment::Right, layout)
            .description(self.payment_conditions.map(<[String]>::to_vec))
            .value_alignment(Alignment::Right)
            .spacing_before(space_before);
        canvas.add(&totals)?;

        if let Some(conditions) = &invoice.conditions {
            canvas.add(&self.paragraph(conditions.clone()).spacing_before(space_before))?;
        }

        self.policy.apply(canvas)?;
        Ok(())
    }

    /// Announce the last page and make sure it is emitted even when empty,
    /// so that last-page overlays are drawn.
    pub fn finish<C: Canvas + ?Sized>(canvas: &mut C) {
        canvas.mark_last_page();
        canvas.print_empty_page();
    }

    fn title(&self, title: &str) -> Paragraph {
        Paragraph::new(vec![title.to_string()], FontSpec::bold(self.layout.fonts.title_size))
            .leading(self.layout.leading.title)
            .spacing_after(PADDING_BOTTOM)
    }

    fn paragraph(&self, lines: Vec<String>) -> Paragraph {
        Paragraph::new(lines, FontSpec::regular(self.layout.fonts.size)).leading(self.layout.leading.default)
    }

    /// Positions with a header row that repeats on every page.
    pub fn positions_table(&self, titles: &ColumnTitles, positions: &[Position]) -> Table {
        let font = FontSpec::bold(self.layout.fonts.size);
        let leading = self.layout.leading.default;
        let title = |text: &str, alignment| {
            Cell::new(text, font)
                .leading(leading)
                .alignment(alignment)
                .padding_bottom(PADDING_BOTTOM)
                .border_bottom()
        };

        let mut table = Table::new(self.layout.table_widths.positions.to_vec()).header_rows(1);
        table.add_row(vec![
            title(&titles.description, Alignment::Left),
            title(&titles.quantity, Alignment::Right),
            title(&titles.unit_price, Alignment::Right),
            title(&titles.total, Alignment::Right),
        ]);
        for (index, position) in positions.iter().enumerate() {
            table.add_row(self.strategies.cells(position, index + 1 == positions.len()));
        }
        table
    }
}
