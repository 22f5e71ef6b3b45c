// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-break policy — decides whether the payment slip needs a fresh page.

use rechnungswerk_core::config::{SlipConfig, slip_height_with_margin_pt};
use rechnungswerk_core::error::Result;
use tracing::debug;

use crate::canvas::Canvas;

/// Why the composer started a new page before the slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakReason {
    /// Flowing content already reaches into the slip zone.
    ReservedZone,
    /// The slip may not be printed on page 1.
    ForbiddenOnFirstPage,
}

/// Keeps the page that receives the slip free of overlapping content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBreakPolicy {
    slip_present: bool,
    y_offset: f32,
    not_on_page_one: bool,
}

impl PageBreakPolicy {
    pub fn new(slip_present: bool, config: &SlipConfig) -> Self {
        Self {
            slip_present,
            y_offset: config.y_offset_pt(),
            not_on_page_one: config.not_on_page_one,
        }
    }

    /// Lowest cursor position that leaves the slip zone untouched. QR bills
    /// are 1 mm shorter than the ESR slip and share the threshold.
    pub fn threshold(&self) -> f32 {
        slip_height_with_margin_pt() + self.y_offset
    }

    pub fn decide(&self, vertical_position: f32, page_number: usize) -> Option<BreakReason> {
        if !self.slip_present {
            return None;
        }
        if vertical_position < self.threshold() {
            return Some(BreakReason::ReservedZone);
        }
        if self.not_on_page_one && page_number == 1 {
            return Some(BreakReason::ForbiddenOnFirstPage);
        }
        None
    }

    /// Start a new page on `canvas` if the slip cannot go on the current one.
    pub fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<Option<BreakReason>> {
        let reason = self.decide(canvas.vertical_position(), canvas.page_number());
        if let Some(reason) = reason {
            debug!(
                ?reason,
                page = canvas.page_number(),
                position = canvas.vertical_position(),
                "page break before the payment slip"
            );
            canvas.new_page()?;
        }
        Ok(reason)
    }
}
