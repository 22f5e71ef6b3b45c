// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-event dispatcher — draws the registered overlays onto every page the
// canvas finishes, honouring each overlay's page rule.

use rechnungswerk_core::config::LayoutConfig;
use rechnungswerk_core::error::Result;
use tracing::{debug, warn};

use crate::canvas::{PageEventHandler, PageSurface};
use crate::overlay::OverlayRegistry;

/// Raw drawing run on every page after the overlays.
pub type PageCallback<'a> = Box<dyn FnMut(&mut PageSurface) -> Result<()> + 'a>;

pub struct PageEventDispatcher<'a> {
    registry: OverlayRegistry,
    layout: &'a LayoutConfig,
    last_page: bool,
    callback: Option<PageCallback<'a>>,
}

impl<'a> PageEventDispatcher<'a> {
    pub fn new(registry: OverlayRegistry, layout: &'a LayoutConfig) -> Self {
        Self {
            registry,
            layout,
            last_page: false,
            callback: None,
        }
    }

    pub fn with_page_callback(mut self, callback: impl FnMut(&mut PageSurface) -> Result<()> + 'a) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn is_last_page(&self) -> bool {
        self.last_page
    }

    pub fn has_overlays(&self) -> bool {
        !self.registry.is_empty()
    }
}

impl PageEventHandler for PageEventDispatcher<'_> {
    fn on_end_page(&mut self, page: &mut PageSurface) -> Result<()> {
        let page_number = page.page_number();
        for overlay in self.registry.printable(page_number, self.last_page) {
            debug!(page = page_number, overlay = overlay.name(), rule = ?overlay.rule, "drawing overlay");
            overlay
                .render(page, self.layout)
                .map_err(|err| err.into_generation(format!("could not write component {}", overlay.name())))?;
        }

        if let Some(callback) = self.callback.as_mut() {
            callback(page).map_err(|err| err.into_generation("could not write page content"))?;
        }
        Ok(())
    }

    fn mark_last_page(&mut self) {
        if self.last_page {
            warn!("last page was already marked");
            return;
        }
        self.last_page = true;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::canvas::FontSpec;
    use crate::overlay::{Overlay, OverlayKind, PhraseOverlay, SlipRendering, SlipResources};
    use rechnungswerk_core::config::SlipConfig;
    use rechnungswerk_core::error::RechnungswerkError;
    use rechnungswerk_core::esr::{QrAddress, QrBill, QrBillGenerator, QrBillValidationError};
    use rechnungswerk_core::{Alignment, PageRule, PaymentSlip};
    use rust_decimal_macros::dec;

    fn phrase(rule: PageRule, text: &str) -> Overlay {
        Overlay::new(
            rule,
            OverlayKind::Phrase(PhraseOverlay::new(vec![text.into()], 20.0, 10.0, 100.0, 10.0)),
        )
    }

    fn registry() -> OverlayRegistry {
        let mut registry = OverlayRegistry::new();
        registry.register(phrase(PageRule::FirstOnly, "Erste"));
        registry.register(phrase(PageRule::AllButLast, "Weiter"));
        registry.register(phrase(PageRule::LastOnly, "Letzte"));
        registry
    }

    fn page(number: usize) -> PageSurface {
        PageSurface::new(number, 595.0, 842.0)
    }

    #[test]
    fn draws_by_rule_and_last_page_flag() {
        let layout = LayoutConfig::default();
        let mut dispatcher = PageEventDispatcher::new(registry(), &layout);

        let mut first = page(1);
        dispatcher.on_end_page(&mut first).unwrap();
        assert!(first.contains_text("Erste"));
        assert!(first.contains_text("Weiter"));
        assert!(!first.contains_text("Letzte"));

        dispatcher.mark_last_page();
        let mut second = page(2);
        dispatcher.on_end_page(&mut second).unwrap();
        assert!(!second.contains_text("Erste"));
        assert!(!second.contains_text("Weiter"));
        assert!(second.contains_text("Letzte"));
    }

    #[test]
    fn marking_twice_keeps_the_flag() {
        let layout = LayoutConfig::default();
        let mut dispatcher = PageEventDispatcher::new(OverlayRegistry::new(), &layout);
        assert!(!dispatcher.is_last_page());
        dispatcher.mark_last_page();
        dispatcher.mark_last_page();
        assert!(dispatcher.is_last_page());
    }

    #[test]
    fn callback_runs_after_the_overlays() {
        let layout = LayoutConfig::default();
        let mut calls = 0;
        {
            let mut dispatcher = PageEventDispatcher::new(registry(), &layout).with_page_callback(|page| {
                calls += 1;
                page.show_text_aligned("Zusammenfassung", 50.0, 600.0, Alignment::Left, FontSpec::regular(10.0));
                Ok(())
            });
            let mut first = page(1);
            dispatcher.on_end_page(&mut first).unwrap();
            assert_eq!(first.texts().last(), Some("Zusammenfassung"));
        }
        assert_eq!(calls, 1);
    }

    struct Rejecting;

    impl QrBillGenerator for Rejecting {
        fn render_png(&self, _bill: &QrBill) -> std::result::Result<Vec<u8>, QrBillValidationError> {
            Err(QrBillValidationError {
                field: "amount".into(),
                message_key: "amount_in_valid_range".into(),
            })
        }
    }

    #[test]
    fn overlay_failures_are_wrapped() {
        let address = QrAddress {
            name: "Kita Kinderland".into(),
            street: "Nussbaumstrasse".into(),
            house_number: "21".into(),
            postal_code: "3000".into(),
            town: "Bern".into(),
            country_code: "CH".into(),
        };
        let slip = PaymentSlip::qr(
            address.clone(),
            1236,
            dec!(10.00),
            "CH44 3199 9123 0008 8901 2",
            address,
            None,
            None,
        )
        .unwrap();
        let resources = SlipResources {
            backgrounds: None,
            qr_generator: Some(Arc::new(Rejecting)),
        };
        let mut registry = OverlayRegistry::new();
        registry.register(slip.renderer_for(&SlipConfig::default(), &resources, PageRule::All).unwrap());

        let layout = LayoutConfig::default();
        let mut dispatcher = PageEventDispatcher::new(registry, &layout);
        let err = dispatcher.on_end_page(&mut page(1)).unwrap_err();
        let RechnungswerkError::Generation { context, source } = err else {
            panic!("expected a generation error");
        };
        assert_eq!(context, "could not write component QR bill");
        assert!(matches!(*source, RechnungswerkError::QrBill { .. }));
    }
}
