// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page surfaces — the draw commands recorded for one page before it is
// serialised to PDF.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rechnungswerk_core::Alignment;
use rechnungswerk_core::error::{RechnungswerkError, Result};
use rechnungswerk_core::mm_to_pt;

use super::text::{text_width, wrap_to_width};

/// Distance of the baseline above the bottom of a line, relative to the font size.
pub(crate) const DESCENT_RATIO: f32 = 0.2;
/// Grey used for table rules and underlines.
pub const RULE_GRAY: f32 = 0.5;
/// Stroke width of table rules and underlines.
pub const RULE_WIDTH: f32 = 0.5;

/// Font faces available to layouts. The PDF writer maps them onto the
/// configured builtin family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    /// Machine-readable face of the payment slip.
    Ocr,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub face: FontFace,
    pub size: f32,
}

impl FontSpec {
    pub fn regular(size: f32) -> Self {
        Self {
            face: FontFace::Regular,
            size,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            face: FontFace::Bold,
            size,
        }
    }

    pub fn ocr(size: f32) -> Self {
        Self {
            face: FontFace::Ocr,
            size,
        }
    }

    pub fn line_height(&self, leading: f32) -> f32 {
        self.size * leading
    }
}

/// Axis-aligned rectangle in points, anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Convert a box given in millimetres from the top-left page corner.
    pub fn from_top_left_mm(
        left_mm: f32,
        top_mm: f32,
        width_mm: f32,
        height_mm: f32,
        page_height_pt: f32,
    ) -> Self {
        let height = mm_to_pt(height_mm);
        Self {
            x: mm_to_pt(left_mm),
            y: page_height_pt - mm_to_pt(top_mm) - height,
            width: mm_to_pt(width_mm),
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

// -- Images -------------------------------------------------------------------

/// A decoded RGB image, shared between every page that shows it.
#[derive(Clone, PartialEq)]
pub struct ImageAsset {
    width_px: u32,
    height_px: u32,
    rgb: Vec<u8>,
}

impl ImageAsset {
    /// Decode PNG, JPEG, or any other format the `image` crate understands.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = ::image::load_from_memory(bytes).map_err(|err| {
            RechnungswerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        let rgb = decoded.to_rgb8();
        Ok(Self {
            width_px: rgb.width(),
            height_px: rgb.height(),
            rgb: rgb.into_raw(),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Height for the given width, keeping the aspect ratio.
    pub fn scaled_height(&self, width: f32) -> f32 {
        if self.width_px == 0 {
            return 0.0;
        }
        width * self.height_px as f32 / self.width_px as f32
    }
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .finish()
    }
}

// -- Draw commands ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Text starting at its left baseline point.
    Text {
        text: String,
        x: f32,
        y: f32,
        font: FontSpec,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        gray: f32,
    },
    Image {
        image: Arc<ImageAsset>,
        rect: Rect,
    },
}

impl DrawCommand {
    /// Move the command by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        match self {
            Self::Text { text, x, y, font } => Self::Text {
                text: text.clone(),
                x: x + dx,
                y: y + dy,
                font: *font,
            },
            Self::Line {
                from,
                to,
                width,
                gray,
            } => Self::Line {
                from: (from.0 + dx, from.1 + dy),
                to: (to.0 + dx, to.1 + dy),
                width: *width,
                gray: *gray,
            },
            Self::Image { image, rect } => Self::Image {
                image: Arc::clone(image),
                rect: Rect {
                    x: rect.x + dx,
                    y: rect.y + dy,
                    ..*rect
                },
            },
        }
    }

    /// Left-baseline text command, with `x` resolved for the alignment.
    pub fn aligned_text(text: &str, anchor_x: f32, y: f32, alignment: Alignment, font: FontSpec) -> Self {
        let width = text_width(text, font);
        let x = match alignment {
            Alignment::Left => anchor_x,
            Alignment::Center => anchor_x - width / 2.0,
            Alignment::Right => anchor_x - width,
        };
        Self::Text {
            text: text.to_string(),
            x,
            y,
            font,
        }
    }

    /// Horizontal rule between two x positions.
    pub fn rule(x1: f32, x2: f32, y: f32) -> Self {
        Self::Line {
            from: (x1, y),
            to: (x2, y),
            width: RULE_WIDTH,
            gray: RULE_GRAY,
        }
    }
}

/// A laid-out block of draw commands with a known height.
///
/// Commands are relative to the block's top-left corner: x grows to the
/// right and y is zero at the top and negative below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowRow {
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

// -- Page surface -------------------------------------------------------------

/// Everything drawn on one page, in two layers.
///
/// The under layer holds backgrounds and is written before the content
/// layer, so text always stays on top.
#[derive(Debug, Clone)]
pub struct PageSurface {
    page_number: usize,
    width: f32,
    height: f32,
    under: Vec<DrawCommand>,
    content: Vec<DrawCommand>,
}

impl PageSurface {
    pub fn new(page_number: usize, width: f32, height: f32) -> Self {
        Self {
            page_number,
            width,
            height,
            under: Vec::new(),
            content: Vec::new(),
        }
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.content.push(command);
    }

    pub fn push_under(&mut self, command: DrawCommand) {
        self.under.push(command);
    }

    /// Single line of text anchored at `(x, y)` according to `alignment`.
    pub fn show_text_aligned(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        alignment: Alignment,
        font: FontSpec,
    ) {
        if text.is_empty() {
            return;
        }
        self.push(DrawCommand::aligned_text(text, x, y, alignment, font));
    }

    /// Flow `lines` into `rect` from its top edge. Lines are wrapped to the
    /// rectangle width; whatever does not fit above its bottom is dropped.
    /// Returns the y position below the last written line.
    pub fn write_multi_line(
        &mut self,
        lines: &[String],
        rect: Rect,
        font: FontSpec,
        leading: f32,
        alignment: Alignment,
    ) -> f32 {
        let line_height = font.line_height(leading);
        let anchor_x = match alignment {
            Alignment::Left => rect.x,
            Alignment::Center => rect.x + rect.width / 2.0,
            Alignment::Right => rect.right(),
        };
        let mut cursor = rect.top();
        for line in wrap_to_width(lines, rect.width, font) {
            if cursor - line_height < rect.y - f32::EPSILON {
                break;
            }
            cursor -= line_height;
            self.show_text_aligned(&line, anchor_x, cursor + DESCENT_RATIO * font.size, alignment, font);
        }
        cursor
    }

    pub fn draw_rule(&mut self, x1: f32, x2: f32, y: f32) {
        self.push(DrawCommand::rule(x1, x2, y));
    }

    pub fn add_image(&mut self, image: &Arc<ImageAsset>, rect: Rect) {
        self.push(DrawCommand::Image {
            image: Arc::clone(image),
            rect,
        });
    }

    pub fn add_image_under(&mut self, image: &Arc<ImageAsset>, rect: Rect) {
        self.push_under(DrawCommand::Image {
            image: Arc::clone(image),
            rect,
        });
    }

    /// Place laid-out rows with their top-left corner at `(x, top)` and
    /// return the y position below the last row.
    pub fn place_rows(&mut self, rows: &[FlowRow], x: f32, top: f32) -> f32 {
        let mut cursor = top;
        for row in rows {
            self.place_row(row, x, cursor);
            cursor -= row.height;
        }
        cursor
    }

    pub(crate) fn place_row(&mut self, row: &FlowRow, x: f32, top: f32) {
        self.content
            .extend(row.commands.iter().map(|command| command.translated(x, top)));
    }

    /// Background commands first, then content.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.under.iter().chain(self.content.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }

    pub fn is_blank(&self) -> bool {
        self.under.is_empty() && self.content.is_empty()
    }
}
