// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay registry — overlays grouped by the pages they are printed on.

use std::collections::BTreeMap;

use rechnungswerk_core::PageRule;

use super::Overlay;

/// Overlays keyed by page rule.
///
/// Within one rule, overlays keep their registration order. Rules are
/// visited in a fixed order, so every page is drawn the same way.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    by_rule: BTreeMap<PageRule, Vec<Overlay>>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, overlay: Overlay) {
        self.by_rule.entry(overlay.rule).or_default().push(overlay);
    }

    pub fn extend(&mut self, overlays: impl IntoIterator<Item = Overlay>) {
        for overlay in overlays {
            self.register(overlay);
        }
    }

    /// Overlays whose rule selects the given page.
    pub fn printable(&self, page_number: usize, is_last_page: bool) -> impl Iterator<Item = &Overlay> {
        self.by_rule
            .iter()
            .filter(move |(rule, _)| rule.is_printable(page_number, is_last_page))
            .flat_map(|(_, overlays)| overlays.iter())
    }

    pub fn len(&self) -> usize {
        self.by_rule.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rule.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{OverlayKind, PhraseOverlay};

    fn phrase(rule: PageRule, text: &str) -> Overlay {
        Overlay::new(
            rule,
            OverlayKind::Phrase(PhraseOverlay::new(vec![text.into()], 0.0, 0.0, 50.0, 10.0)),
        )
    }

    fn names(registry: &OverlayRegistry, page: usize, last: bool) -> Vec<String> {
        registry
            .printable(page, last)
            .map(|overlay| match &overlay.kind {
                OverlayKind::Phrase(_) => format!("{:?}", overlay.rule),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn selects_overlays_by_page() {
        let mut registry = OverlayRegistry::new();
        registry.extend([
            phrase(PageRule::LastOnly, "Einzahlungsschein"),
            phrase(PageRule::All, "Kopf"),
            phrase(PageRule::FirstOnly, "Logo"),
            phrase(PageRule::AllButLast, "Platzhalter"),
        ]);
        assert_eq!(registry.len(), 4);

        assert_eq!(names(&registry, 1, false), vec!["All", "FirstOnly", "AllButLast"]);
        assert_eq!(names(&registry, 2, false), vec!["All", "AllButLast"]);
        assert_eq!(names(&registry, 2, true), vec!["All", "LastOnly"]);
        assert_eq!(names(&registry, 1, true), vec!["All", "FirstOnly", "LastOnly"]);
    }

    #[test]
    fn keeps_registration_order_within_a_rule() {
        let mut registry = OverlayRegistry::new();
        registry.register(phrase(PageRule::All, "eins"));
        registry.register(phrase(PageRule::All, "zwei"));
        let lines: Vec<_> = registry
            .printable(1, false)
            .map(|overlay| format!("{:?}", overlay.kind))
            .collect();
        assert!(lines[0].contains("eins"));
        assert!(lines[1].contains("zwei"));
    }

    #[test]
    fn starts_empty() {
        assert!(OverlayRegistry::new().is_empty());
    }
}
