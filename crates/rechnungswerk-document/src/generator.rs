// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Invoice generator — wires the render plan, the per-invoice overlays, the
// page-event dispatcher and the flow composer into one document session.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use rechnungswerk_core::config::{InvoiceConfig, LayoutConfig};
use rechnungswerk_core::error::Result;
use rechnungswerk_core::esr::QrBillGenerator;
use rechnungswerk_core::{Alignment, Invoice, PageRule, mm_to_pt};
use tracing::{debug, info, instrument};

use crate::canvas::{FlowCanvas, PageSetup, PageSurface, RenderedDocument};
use crate::composer::FlowComposer;
use crate::dispatcher::PageEventDispatcher;
use crate::flowable::{Flowable, SummaryTable};
use crate::overlay::{AddressOverlay, Overlay, OverlayKind, SlipRendering};
use crate::pdf::PdfWriter;
use crate::plan::RenderPlan;

/// Open a canvas with `dispatcher` subscribed, let `compose` fill it, then
/// emit the last page and close the document.
///
/// Any failure while composing is fatal for the whole document.
pub fn render_document<'a, F>(
    setup: PageSetup,
    dispatcher: PageEventDispatcher<'a>,
    compose: F,
) -> Result<RenderedDocument>
where
    F: FnOnce(&mut FlowCanvas<'a>) -> Result<()>,
{
    let mut canvas = FlowCanvas::open(setup);
    canvas.set_page_event(dispatcher);
    compose(&mut canvas).map_err(|err| err.into_generation("could not generate document"))?;
    FlowComposer::finish(&mut canvas);
    canvas
        .close()
        .map_err(|err| err.into_generation("could not close document"))
}

/// Renders invoices with a fixed configuration.
///
/// The generator is immutable once built; every call to [`render`] or
/// [`generate`] starts a fresh document session, so one generator can serve
/// a whole batch of invoices.
///
/// [`render`]: InvoiceGenerator::render
/// [`generate`]: InvoiceGenerator::generate
#[derive(Debug, Clone)]
pub struct InvoiceGenerator {
    config: InvoiceConfig,
    plan: RenderPlan,
}

impl InvoiceGenerator {
    /// Validate `config` and resolve its static overlays.
    pub fn new(config: InvoiceConfig) -> Result<Self> {
        config.validate()?;
        let plan = RenderPlan::build(&config)?;
        Ok(Self { config, plan })
    }

    /// Generator with one more static overlay.
    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.plan = self.plan.with_overlay(overlay);
        self
    }

    /// Generator that can print QR bills with `generator`.
    pub fn with_qr_bill_generator(mut self, generator: Arc<dyn QrBillGenerator>) -> Self {
        let mut resources = self.plan.slip_resources().clone();
        resources.qr_generator = Some(generator);
        self.plan = self.plan.with_slip_resources(resources);
        self
    }

    pub fn config(&self) -> &InvoiceConfig {
        &self.config
    }

    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// Lay out `invoice` without serialising it.
    pub fn render(&self, invoice: &Invoice) -> Result<RenderedDocument> {
        let layout = &self.config.layout;

        let mut registry = self.plan.registry();
        registry.register(Overlay::new(
            layout.address.rule,
            OverlayKind::Address(AddressOverlay::new(
                invoice.recipient.clone(),
                layout.address.clone(),
            )),
        ));
        if let Some(slip) = &invoice.payment_slip {
            registry.register(slip.renderer_for(
                &self.config.slip,
                self.plan.slip_resources(),
                PageRule::LastOnly,
            )?);
        }
        debug!(overlays = registry.len(), "overlays registered");

        let setup = PageSetup::from_config(&self.config);
        let summary = SummaryTable::new(&invoice.summary, layout.summary_alignment, layout)
            .value_alignment(Alignment::Left);
        let has_summary = !invoice.summary.is_empty();
        let dispatcher = PageEventDispatcher::new(registry, layout).with_page_callback(move |page| {
            if has_summary {
                draw_page_summary(page, &summary, layout, &setup)?;
            }
            Ok(())
        });

        let composer = FlowComposer::new(&self.config, invoice.payment_slip.is_some());
        render_document(setup, dispatcher, |canvas| composer.compose(canvas, invoice))
    }

    /// Render `invoice` to PDF bytes.
    #[instrument(skip(self, invoice), fields(title = %invoice.title))]
    pub fn generate(&self, invoice: &Invoice) -> Result<Vec<u8>> {
        let document = self.render(invoice)?;

        let mut writer = PdfWriter::new(self.config.layout.fonts.family);
        writer.set_title(&invoice.title);
        if let Some(producer) = &self.config.producer {
            writer.set_producer(producer);
        }
        let bytes = writer.write(&document)?;

        info!(
            pages = document.page_count(),
            bytes = bytes.len(),
            "Invoice generated"
        );
        Ok(bytes)
    }

    /// Render `invoice` and write the PDF to `out`.
    pub fn generate_to(&self, invoice: &Invoice, out: &mut impl Write) -> Result<()> {
        let bytes = self.generate(invoice)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    /// Render `invoice` into the file at `path`.
    pub fn write_to_file(&self, invoice: &Invoice, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.generate(invoice)?;
        std::fs::write(path.as_ref(), bytes)?;
        info!(path = %path.as_ref().display(), "Invoice written");
        Ok(())
    }
}

/// Repeat the summary table on the page, level with the address window.
fn draw_page_summary(
    page: &mut PageSurface,
    summary: &SummaryTable,
    layout: &LayoutConfig,
    setup: &PageSetup,
) -> Result<()> {
    let rows = summary
        .layout(setup.content_width())
        .map_err(|err| err.into_generation("summary table creation failed"))?
        .rows;
    let top = page.height() - mm_to_pt(layout.address.top_mm);
    page.place_rows(&rows, setup.margin_left, top);
    Ok(())
}
