// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paragraphs — wrapped lines of text in a single font.

use rechnungswerk_core::Alignment;
use rechnungswerk_core::error::Result;

use super::{FlowLayout, Flowable};
use crate::canvas::surface::DESCENT_RATIO;
use crate::canvas::text::wrap_to_width;
use crate::canvas::{DrawCommand, FlowRow, FontSpec};

/// Default leading for body text.
pub const DEFAULT_LEADING: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    lines: Vec<String>,
    font: FontSpec,
    leading: f32,
    alignment: Alignment,
    spacing_before: f32,
    spacing_after: f32,
    keep_together: bool,
}

impl Paragraph {
    pub fn new(lines: Vec<String>, font: FontSpec) -> Self {
        Self {
            lines,
            font,
            leading: DEFAULT_LEADING,
            alignment: Alignment::Left,
            spacing_before: 0.0,
            spacing_after: 0.0,
            keep_together: false,
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

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Flowable for Paragraph {
    fn layout(&self, width: f32) -> Result<FlowLayout> {
        let line_height = self.font.line_height(self.leading);
        let baseline = -line_height + DESCENT_RATIO * self.font.size;
        let anchor_x = match self.alignment {
            Alignment::Left => 0.0,
            Alignment::Center => width / 2.0,
            Alignment::Right => width,
        };

        let rows = wrap_to_width(&self.lines, width, self.font)
            .into_iter()
            .map(|line| {
                let commands = if line.is_empty() {
                    Vec::new()
                } else {
                    vec![DrawCommand::aligned_text(&line, anchor_x, baseline, self.alignment, self.font)]
                };
                FlowRow {
                    height: line_height,
                    commands,
                }
            })
            .collect();

        Ok(FlowLayout {
            spacing_before: self.spacing_before,
            spacing_after: self.spacing_after,
            header: Vec::new(),
            rows,
            keep_together: self.keep_together,
        })
    }

    fn name(&self) -> &'static str {
        "paragraph"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_wrapped_line() {
        let paragraph = Paragraph::new(
            vec!["Betreuung Januar 2018 Kita Kinderland".into(), String::new()],
            FontSpec::regular(10.0),
        )
        .leading(1.5);
        // 5pt per glyph: 16 characters per 80pt line.
        let layout = paragraph.layout(80.0).unwrap();
        assert_eq!(layout.rows.len(), 4);
        assert!(layout.rows.iter().all(|row| row.height == 15.0));
        assert!(layout.rows[3].commands.is_empty());
    }

    #[test]
    fn right_alignment_anchors_at_the_width() {
        let layout = Paragraph::new(vec!["1234".into()], FontSpec::regular(10.0))
            .alignment(Alignment::Right)
            .layout(100.0)
            .unwrap();
        let DrawCommand::Text { x, y, .. } = &layout.rows[0].commands[0] else {
            panic!("expected text");
        };
        assert_eq!(*x, 80.0);
        assert_eq!(*y, -10.0);
    }

    #[test]
    fn carries_spacing() {
        let layout = Paragraph::new(vec!["x".into()], FontSpec::bold(14.0))
            .spacing_before(5.0)
            .spacing_after(6.0)
            .layout(100.0)
            .unwrap();
        assert_eq!(layout.spacing_before, 5.0);
        assert_eq!(layout.spacing_after, 6.0);
        assert!(!layout.keep_together);
    }
}
