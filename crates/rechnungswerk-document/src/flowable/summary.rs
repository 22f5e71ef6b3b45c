// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Summary tables — label/value entries next to a free-text column. Used for
// the invoice totals and for the summary printed beside the address.

use rechnungswerk_core::config::LayoutConfig;
use rechnungswerk_core::error::Result;
use rechnungswerk_core::{Alignment, SummaryEntry};

use super::table::{column_widths, layout_row};
use super::{Cell, FlowLayout, Flowable, PADDING_BOTTOM};
use crate::canvas::{FlowRow, FontSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    entries: Vec<SummaryEntry>,
    description: Option<Vec<String>>,
    /// Side of the entries; the free-text column takes the other side.
    alignment: Alignment,
    value_alignment: Alignment,
    widths: [f32; 3],
    font_size: f32,
    leading: f32,
    spacing_before: f32,
}

impl SummaryTable {
    pub fn new(entries: &[SummaryEntry], alignment: Alignment, layout: &LayoutConfig) -> Self {
        Self {
            entries: entries.to_vec(),
            description: None,
            alignment,
            value_alignment: Alignment::Left,
            widths: layout.table_widths.summary(alignment),
            font_size: layout.fonts.size,
            leading: layout.leading.default,
            spacing_before: 0.0,
        }
    }

    /// Text for the free-text column, spanning all entries.
    pub fn description(mut self, lines: Option<Vec<String>>) -> Self {
        self.description = lines;
        self
    }

    pub fn value_alignment(mut self, alignment: Alignment) -> Self {
        self.value_alignment = alignment;
        self
    }

    pub fn spacing_before(mut self, points: f32) -> Self {
        self.spacing_before = points;
        self
    }

    fn entry_row(&self, entry: &SummaryEntry, columns: &[f32]) -> Result<FlowRow> {
        let font = if entry.bold {
            FontSpec::bold(self.font_size)
        } else {
            FontSpec::regular(self.font_size)
        };
        let mut label = Cell::new(entry.label.clone(), font).leading(self.leading);
        let mut value = Cell::new(entry.value.clone(), font)
            .leading(self.leading)
            .alignment(self.value_alignment);
        if entry.underlined {
            label = label.padding_bottom(PADDING_BOTTOM).border_bottom();
            value = value.padding_bottom(PADDING_BOTTOM).border_bottom();
        }
        layout_row(&[label, value], columns)
    }
}

impl Flowable for SummaryTable {
    fn layout(&self, width: f32) -> Result<FlowLayout> {
        let columns = column_widths(&self.widths, width)?;
        let (main_x, main_width, entries_x, entry_columns) = match self.alignment {
            Alignment::Left => (columns[0] + columns[1], columns[2], 0.0, [columns[0], columns[1]]),
            _ => (0.0, columns[0], columns[0], [columns[1], columns[2]]),
        };

        let mut commands = Vec::new();
        let mut entries_height = 0.0;
        for entry in &self.entries {
            let row = self.entry_row(entry, &entry_columns)?;
            commands.extend(
                row.commands
                    .iter()
                    .map(|command| command.translated(entries_x, -entries_height)),
            );
            entries_height += row.height;
        }

        let mut height = entries_height;
        if let Some(lines) = &self.description {
            let cell = Cell::lines(lines.clone(), FontSpec::regular(self.font_size)).leading(self.leading);
            let row = layout_row(&[cell], &[main_width])?;
            commands.extend(row.commands.iter().map(|command| command.translated(main_x, 0.0)));
            height = height.max(row.height);
        }

        Ok(FlowLayout {
            spacing_before: self.spacing_before,
            spacing_after: 0.0,
            header: Vec::new(),
            rows: vec![FlowRow { height, commands }],
            keep_together: true,
        })
    }

    fn name(&self) -> &'static str {
        "summary table"
    }
}
