// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlays — fixed-position content drawn onto finished pages: letterhead
// texts, the address window, logos, and payment slips.

pub mod logo;
pub mod registry;
pub mod slip;
pub mod text;

use rechnungswerk_core::PageRule;
use rechnungswerk_core::config::LayoutConfig;
use rechnungswerk_core::error::Result;

use crate::canvas::PageSurface;

pub use logo::LogoOverlay;
pub use registry::OverlayRegistry;
pub use slip::{
    EsrSlipOverlay, FieldLayout, QrBillOverlay, SlipBackgroundImages, SlipRendering, SlipResources,
};
pub use text::{AddressOverlay, PhraseOverlay};

/// What an overlay draws.
#[derive(Debug, Clone)]
pub enum OverlayKind {
    Phrase(PhraseOverlay),
    Address(AddressOverlay),
    Logo(LogoOverlay),
    Esr(EsrSlipOverlay),
    QrBill(QrBillOverlay),
}

/// Content drawn at a fixed position on the pages selected by its rule.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub rule: PageRule,
    pub kind: OverlayKind,
}

impl Overlay {
    pub fn new(rule: PageRule, kind: OverlayKind) -> Self {
        Self { rule, kind }
    }

    pub fn render(&self, page: &mut PageSurface, layout: &LayoutConfig) -> Result<()> {
        match &self.kind {
            OverlayKind::Phrase(phrase) => {
                phrase.render(page, layout);
                Ok(())
            }
            OverlayKind::Address(address) => {
                address.render(page, layout);
                Ok(())
            }
            OverlayKind::Logo(logo) => {
                logo.render(page);
                Ok(())
            }
            OverlayKind::Esr(slip) => {
                slip.render(page, layout);
                Ok(())
            }
            OverlayKind::QrBill(bill) => bill.render(page),
        }
    }

    /// Short name for logs and error messages.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            OverlayKind::Phrase(_) => "phrase",
            OverlayKind::Address(_) => "address",
            OverlayKind::Logo(_) => "logo",
            OverlayKind::Esr(slip) => slip.name(),
            OverlayKind::QrBill(_) => "QR bill",
        }
    }
}
