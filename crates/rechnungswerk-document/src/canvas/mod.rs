// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas module — the paginating document canvas, its page surfaces, and the
// page-event contract through which overlays are drawn.

pub mod flow;
pub mod surface;
pub mod text;

use rechnungswerk_core::InvoiceConfig;
use rechnungswerk_core::error::Result;
use rechnungswerk_core::mm_to_pt;

use crate::flowable::Flowable;

pub use flow::{FlowCanvas, RenderedDocument};
pub use surface::{DrawCommand, FlowRow, FontFace, FontSpec, ImageAsset, PageSurface, Rect};

/// Receives every page right after the canvas has finished laying it out.
pub trait PageEventHandler {
    /// Draw onto the finished page before it is stored.
    fn on_end_page(&mut self, page: &mut PageSurface) -> Result<()>;

    /// Announce that the page currently being filled is the last one.
    fn mark_last_page(&mut self);
}

/// A paginating sink for flowing content.
///
/// Vertical positions are PDF coordinates: points from the bottom edge.
pub trait Canvas {
    /// 1-based number of the page currently being filled.
    fn page_number(&self) -> usize;

    /// Vertical position of the cursor on the current page.
    fn vertical_position(&self) -> f32;

    /// Width available to flowing content.
    fn content_width(&self) -> f32;

    /// Lay out `flowable` at the cursor, breaking pages as needed.
    fn add(&mut self, flowable: &dyn Flowable) -> Result<()>;

    /// Finish the current page. Does nothing on a page without content and
    /// returns whether a page was finished.
    fn new_page(&mut self) -> Result<bool>;

    /// Treat the current page as non-empty, so it is emitted even without content.
    fn print_empty_page(&mut self);

    /// Forward the last-page announcement to the subscribed page-event handler.
    fn mark_last_page(&mut self);
}

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageSetup {
    pub fn from_config(config: &InvoiceConfig) -> Self {
        let layout = &config.layout;
        let (width, height) = layout.paper_size.dimensions_pt();
        Self {
            width,
            height,
            margin_left: mm_to_pt(layout.margins.left_mm),
            margin_right: mm_to_pt(layout.margins.right_mm),
            margin_top: mm_to_pt(layout.margins.top_mm),
            margin_bottom: config.bottom_margin_pt(),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// y position where flowing content starts on every page.
    pub fn content_top(&self) -> f32 {
        self.height - self.margin_top
    }

    pub fn content_height(&self) -> f32 {
        self.content_top() - self.margin_bottom
    }
}
