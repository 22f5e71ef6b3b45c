// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render plan — the static overlays shared by every document a generator
// produces, resolved once from the configuration.

use rechnungswerk_core::InvoiceConfig;
use rechnungswerk_core::PaymentSlip;
use rechnungswerk_core::error::Result;
use tracing::debug;

use crate::overlay::{
    LogoOverlay, Overlay, OverlayKind, OverlayRegistry, PhraseOverlay, SlipBackgroundImages,
    SlipRendering, SlipResources,
};

/// Immutable list of static overlays plus the slip resources.
#[derive(Debug, Clone, Default)]
pub struct RenderPlan {
    overlays: Vec<Overlay>,
    slip_resources: SlipResources,
}

impl RenderPlan {
    /// Resolve header, footer, logo, and the placeholder slip, loading every
    /// image the configuration names.
    pub fn build(config: &InvoiceConfig) -> Result<Self> {
        let mut overlays = Vec::new();

        if let Some(header) = &config.header {
            overlays.push(Overlay::new(header.rule, OverlayKind::Phrase(PhraseOverlay::from_box(header))));
        }
        if let Some(footer) = &config.footer {
            overlays.push(Overlay::new(footer.rule, OverlayKind::Phrase(PhraseOverlay::from_box(footer))));
        }
        if let Some(logo) = &config.logo {
            overlays.push(Overlay::new(logo.rule, OverlayKind::Logo(LogoOverlay::load(logo)?)));
        }

        let backgrounds = config
            .slip
            .background
            .as_ref()
            .map(SlipBackgroundImages::load)
            .transpose()?;
        let slip_resources = SlipResources {
            backgrounds,
            qr_generator: None,
        };

        if let Some(rule) = config.slip.dummy_rule {
            overlays.push(PaymentSlip::dummy().renderer_for(&config.slip, &slip_resources, rule)?);
        }

        debug!(overlays = overlays.len(), "render plan built");
        Ok(Self {
            overlays,
            slip_resources,
        })
    }

    /// Copy of the plan with one more overlay.
    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlays.push(overlay);
        self
    }

    pub fn with_slip_resources(mut self, resources: SlipResources) -> Self {
        self.slip_resources = resources;
        self
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn slip_resources(&self) -> &SlipResources {
        &self.slip_resources
    }

    /// Fresh registry holding the static overlays.
    pub fn registry(&self) -> OverlayRegistry {
        let mut registry = OverlayRegistry::new();
        registry.extend(self.overlays.iter().cloned());
        registry
    }
}
