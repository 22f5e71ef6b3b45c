// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tables with relative column widths, column spans, and repeated header rows.

use rechnungswerk_core::Alignment;
use rechnungswerk_core::error::{RechnungswerkError, Result};

use super::paragraph::DEFAULT_LEADING;
use super::{CELL_PADDING, FlowLayout, Flowable};
use crate::canvas::surface::DESCENT_RATIO;
use crate::canvas::text::wrap_to_width;
use crate::canvas::{DrawCommand, FlowRow, FontSpec};

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    lines: Vec<String>,
    font: FontSpec,
    leading: f32,
    alignment: Alignment,
    colspan: usize,
    padding_bottom: f32,
    border_bottom: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>, font: FontSpec) -> Self {
        Self::lines(vec![text.into()], font)
    }

    pub fn lines(lines: Vec<String>, font: FontSpec) -> Self {
        Self {
            lines,
            font,
            leading: DEFAULT_LEADING,
            alignment: Alignment::Left,
            colspan: 1,
            padding_bottom: 0.0,
            border_bottom: false,
        }
    }

    pub fn leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn colspan(mut self, colspan: usize) -> Self {
        self.colspan = colspan.max(1);
        self
    }

    /// Extra space between the text and the bottom edge.
    pub fn padding_bottom(mut self, points: f32) -> Self {
        self.padding_bottom = points;
        self
    }

    /// Draw a grey rule along the bottom edge.
    pub fn border_bottom(mut self) -> Self {
        self.border_bottom = true;
        self
    }

    /// Draw commands for the cell text at `x`, `width` points wide, relative
    /// to the row top, plus the height the cell needs.
    fn render(&self, x: f32, width: f32) -> (Vec<DrawCommand>, f32) {
        let inner = (width - 2.0 * CELL_PADDING).max(0.0);
        let line_height = self.font.line_height(self.leading);
        let anchor_x = match self.alignment {
            Alignment::Left => x + CELL_PADDING,
            Alignment::Center => x + width / 2.0,
            Alignment::Right => x + width - CELL_PADDING,
        };

        let lines = wrap_to_width(&self.lines, inner, self.font);
        let mut commands = Vec::with_capacity(lines.len());
        let mut cursor = -CELL_PADDING;
        for line in &lines {
            cursor -= line_height;
            if !line.is_empty() {
                let baseline = cursor + DESCENT_RATIO * self.font.size;
                commands.push(DrawCommand::aligned_text(line, anchor_x, baseline, self.alignment, self.font));
            }
        }
        let height = lines.len() as f32 * line_height + 2.0 * CELL_PADDING + self.padding_bottom;
        (commands, height)
    }
}

/// Lay out one row of cells over the given column boundaries.
///
/// All cells of a row share its height; bottom borders are drawn at the
/// bottom of the row.
pub(crate) fn layout_row(cells: &[Cell], columns: &[f32]) -> Result<FlowRow> {
    let spanned: usize = cells.iter().map(|cell| cell.colspan).sum();
    if spanned != columns.len() {
        return Err(RechnungswerkError::Layout(format!(
            "row spans {} columns but the table has {}",
            spanned,
            columns.len()
        )));
    }

    let mut commands = Vec::new();
    let mut borders = Vec::new();
    let mut height: f32 = 0.0;
    let mut column = 0;
    let mut x = 0.0;
    for cell in cells {
        let width: f32 = columns[column..column + cell.colspan].iter().sum();
        let (cell_commands, cell_height) = cell.render(x, width);
        commands.extend(cell_commands);
        height = height.max(cell_height);
        if cell.border_bottom {
            borders.push((x, x + width));
        }
        column += cell.colspan;
        x += width;
    }
    commands.extend(borders.into_iter().map(|(x1, x2)| DrawCommand::rule(x1, x2, -height)));

    Ok(FlowRow { height, commands })
}

/// Absolute column widths for `relative` widths spread over `width` points.
pub(crate) fn column_widths(relative: &[f32], width: f32) -> Result<Vec<f32>> {
    let total: f32 = relative.iter().sum();
    if relative.is_empty() || total <= 0.0 {
        return Err(RechnungswerkError::Layout(
            "a table needs at least one column with a positive width".into(),
        ));
    }
    Ok(relative.iter().map(|w| width * w / total).collect())
}

/// A table spanning the full content width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    widths: Vec<f32>,
    header_rows: usize,
    rows: Vec<Vec<Cell>>,
    spacing_before: f32,
    spacing_after: f32,
    keep_together: bool,
}

impl Table {
    /// `widths` are relative to each other.
    pub fn new(widths: Vec<f32>) -> Self {
        Self {
            widths,
            header_rows: 0,
            rows: Vec::new(),
            spacing_before: 0.0,
            spacing_after: 0.0,
            keep_together: false,
        }
    }

    /// The first `count` rows repeat at the top of every page.
    pub fn header_rows(mut self, count: usize) -> Self {
        self.header_rows = count;
        self
    }

    pub fn spacing_before(mut self, points: f32) -> Self {
        self.spacing_before = points;
        self
    }

    pub fn spacing_after(mut self, points: f32) -> Self {
        self.spacing_after = points;
        self
    }

    pub fn keep_together(mut self, keep: bool) -> Self {
        self.keep_together = keep;
        self
    }

    pub fn add_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    pub fn columns(&self) -> usize {
        self.widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Flowable for Table {
    fn layout(&self, width: f32) -> Result<FlowLayout> {
        let columns = column_widths(&self.widths, width)?;
        let mut header = Vec::new();
        let mut rows = Vec::new();
        for (index, cells) in self.rows.iter().enumerate() {
            let row = layout_row(cells, &columns)?;
            if index < self.header_rows {
                header.push(row);
            } else {
                rows.push(row);
            }
        }

        Ok(FlowLayout {
            spacing_before: self.spacing_before,
            spacing_after: self.spacing_after,
            header,
            rows,
            keep_together: self.keep_together,
        })
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> FontSpec {
        FontSpec::regular(10.0)
    }

    #[test]
    fn row_height_is_the_tallest_cell() {
        let columns = [100.0, 100.0];
        let row = layout_row(
            &[
                Cell::lines(vec!["eins".into(), "zwei".into()], font()),
                Cell::new("drei", font()).padding_bottom(6.0).border_bottom(),
            ],
            &columns,
        )
        .unwrap();
        // Two lines of 12pt plus padding above and below.
        assert_eq!(row.height, 28.0);
        assert!(row.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Line { from, .. } if *from == (100.0, -28.0)
        )));
    }

    #[test]
    fn right_aligned_cells_respect_padding() {
        let row = layout_row(
            &[Cell::new("12", font()).alignment(Alignment::Right)],
            &[50.0],
        )
        .unwrap();
        let DrawCommand::Text { x, .. } = &row.commands[0] else {
            panic!("expected text");
        };
        assert_eq!(*x, 38.0);
    }

    #[test]
    fn colspan_must_match_the_column_count() {
        let err = layout_row(&[Cell::new("a", font()).colspan(3)], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, RechnungswerkError::Layout(_)));

        let row = layout_row(&[Cell::new("Titel", font()).colspan(2)], &[1.0, 1.0]);
        assert!(row.is_ok());
    }

    #[test]
    fn header_rows_are_split_off() {
        let mut table = Table::new(vec![3.0, 1.0]).header_rows(1).spacing_before(5.0);
        table.add_row(vec![Cell::new("A", font()), Cell::new("B", font())]);
        table.add_row(vec![Cell::new("1", font()), Cell::new("2", font())]);
        table.add_row(vec![Cell::new("3", font()), Cell::new("4", font())]);
        let layout = table.layout(400.0).unwrap();
        assert_eq!(layout.header.len(), 1);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.spacing_before, 5.0);
        let DrawCommand::Text { x, .. } = &layout.rows[0].commands[1] else {
            panic!("expected text");
        };
        assert_eq!(*x, 302.0);
    }

    #[test]
    fn rejects_tables_without_columns() {
        assert!(Table::new(Vec::new()).layout(100.0).is_err());
    }
}
