// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory paginating canvas. Flowables are placed row by row; whenever a
// page is finished the subscribed page-event handler draws its overlays.

use rechnungswerk_core::error::{RechnungswerkError, Result};
use tracing::debug;

use super::surface::{FlowRow, PageSurface};
use super::{Canvas, PageEventHandler, PageSetup};
use crate::flowable::{FlowLayout, Flowable};

/// Tolerance when comparing row heights against the remaining space.
const FIT_TOLERANCE: f32 = 1e-3;

/// Finished pages, ready for serialisation.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    width: f32,
    height: f32,
    pages: Vec<PageSurface>,
}

impl RenderedDocument {
    /// Document from surfaces drawn outside a canvas.
    pub fn new(width: f32, height: f32, pages: Vec<PageSurface>) -> Self {
        Self { width, height, pages }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn pages(&self) -> &[PageSurface] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page by its 1-based number.
    pub fn page(&self, number: usize) -> Option<&PageSurface> {
        number.checked_sub(1).and_then(|index| self.pages.get(index))
    }
}

/// Paginating canvas that records draw commands per page.
pub struct FlowCanvas<'h> {
    setup: PageSetup,
    page_number: usize,
    cursor_y: f32,
    surface: PageSurface,
    /// No content yet and no request to emit the page anyway.
    page_empty: bool,
    /// At least one flowing row sits on the current page.
    has_flow: bool,
    finished: Vec<PageSurface>,
    handler: Option<Box<dyn PageEventHandler + 'h>>,
}

impl<'h> FlowCanvas<'h> {
    pub fn open(setup: PageSetup) -> Self {
        Self {
            setup,
            page_number: 1,
            cursor_y: setup.content_top(),
            surface: PageSurface::new(1, setup.width, setup.height),
            page_empty: true,
            has_flow: false,
            finished: Vec::new(),
            handler: None,
        }
    }

    /// Subscribe the handler that is called for every finished page.
    pub fn set_page_event(&mut self, handler: impl PageEventHandler + 'h) {
        self.handler = Some(Box::new(handler));
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Finish the last page, if it is not empty, and hand out all pages.
    pub fn close(mut self) -> Result<RenderedDocument> {
        if !self.page_empty {
            self.finish_page()?;
        }
        if self.finished.is_empty() {
            return Err(RechnungswerkError::Layout("the document has no pages".into()));
        }
        debug!(pages = self.finished.len(), "canvas closed");
        Ok(RenderedDocument {
            width: self.setup.width,
            height: self.setup.height,
            pages: self.finished,
        })
    }

    fn available(&self) -> f32 {
        (self.cursor_y - self.setup.margin_bottom).max(0.0)
    }

    fn fits(&self, height: f32) -> bool {
        height <= self.available() + FIT_TOLERANCE
    }

    fn place(&mut self, row: &FlowRow) {
        self.surface.place_row(row, self.setup.margin_left, self.cursor_y);
        self.cursor_y -= row.height;
        self.page_empty = false;
        self.has_flow = true;
    }

    fn place_header(&mut self, layout: &FlowLayout) {
        for row in &layout.header {
            self.place(row);
        }
    }

    /// Run the page event on the current page and store it.
    fn finish_page(&mut self) -> Result<()> {
        let next = PageSurface::new(self.page_number + 1, self.setup.width, self.setup.height);
        let mut page = std::mem::replace(&mut self.surface, next);
        if let Some(handler) = self.handler.as_mut() {
            handler.on_end_page(&mut page)?;
        }
        debug!(page = page.page_number(), "page finished");
        self.finished.push(page);
        Ok(())
    }

    fn break_page(&mut self) -> Result<()> {
        self.finish_page()?;
        self.page_number += 1;
        self.cursor_y = self.setup.content_top();
        self.page_empty = true;
        self.has_flow = false;
        Ok(())
    }
}

impl Canvas for FlowCanvas<'_> {
    fn page_number(&self) -> usize {
        self.page_number
    }

    fn vertical_position(&self) -> f32 {
        self.cursor_y
    }

    fn content_width(&self) -> f32 {
        self.setup.content_width()
    }

    fn add(&mut self, flowable: &dyn Flowable) -> Result<()> {
        let layout = flowable.layout(self.content_width())?;

        if layout.keep_together
            && self.has_flow
            && !self.fits(layout.spacing_before + layout.height())
            && layout.height() <= self.setup.content_height()
        {
            debug!(flowable = flowable.name(), "moving block to the next page");
            self.break_page()?;
        }

        if self.has_flow {
            self.cursor_y -= layout.spacing_before;
        }

        if layout.rows.is_empty() {
            if !layout.header.is_empty() {
                if self.has_flow && !self.fits(layout.header_height()) {
                    self.break_page()?;
                }
                self.place_header(&layout);
            }
        } else {
            let mut header_placed = false;
            for row in &layout.rows {
                let header = if header_placed { 0.0 } else { layout.header_height() };
                if self.has_flow && !self.fits(header + row.height) {
                    self.break_page()?;
                    header_placed = false;
                }
                if !header_placed {
                    self.place_header(&layout);
                    header_placed = true;
                }
                self.place(row);
            }
        }

        if self.cursor_y > self.setup.margin_bottom {
            self.cursor_y = (self.cursor_y - layout.spacing_after).max(self.setup.margin_bottom);
        }
        Ok(())
    }

    fn new_page(&mut self) -> Result<bool> {
        if self.page_empty {
            return Ok(false);
        }
        self.break_page()?;
        Ok(true)
    }

    fn print_empty_page(&mut self) {
        self.page_empty = false;
    }

    fn mark_last_page(&mut self) {
        if let Some(handler) = self.handler.as_mut() {
            handler.mark_last_page();
        }
    }
}
