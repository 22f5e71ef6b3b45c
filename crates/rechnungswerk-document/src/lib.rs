// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rechnungswerk-document — Page composition and PDF output for Rechnungswerk.
//
// Provides a paginating canvas with page events, flowables (paragraphs,
// tables, summary tables), page-selective overlays including the payment
// slips, and the invoice generator that ties them together.

pub mod canvas;
pub mod composer;
pub mod dispatcher;
pub mod flowable;
pub mod generator;
pub mod overlay;
pub mod pdf;
pub mod plan;

// Re-export the primary types so callers can use `rechnungswerk_document::InvoiceGenerator` etc.
pub use canvas::{Canvas, FlowCanvas, PageEventHandler, PageSetup, PageSurface, RenderedDocument};
pub use composer::{BreakReason, FlowComposer, PageBreakPolicy};
pub use dispatcher::PageEventDispatcher;
pub use flowable::{Flowable, Paragraph, SummaryTable, Table};
pub use generator::{InvoiceGenerator, render_document};
pub use overlay::{Overlay, OverlayKind, OverlayRegistry, SlipRendering, SlipResources};
pub use pdf::{PdfReader, PdfWriter};
pub use plan::RenderPlan;
