// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Rechnungswerk invoices.

use serde::{Deserialize, Serialize};

use crate::esr::PaymentSlip;

/// Millimetres per inch.
const MM_PER_INCH: f32 = 25.4;
/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (mm_to_pt(w as f32), mm_to_pt(h as f32))
    }
}

/// Horizontal alignment of text and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// On which pages of a document an overlay is printed.
///
/// Overlays are rendered when a page is finished, at which point the page
/// number is known and the composer may already have announced that the
/// current page is the last one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum PageRule {
    /// Every page.
    #[default]
    All,
    /// Page 1 only.
    FirstOnly,
    /// The page finished after the last page was announced.
    LastOnly,
    /// Every page finished before the last page was announced.
    AllButLast,
}

impl PageRule {
    /// Whether an overlay with this rule belongs on the page being finished.
    pub fn is_printable(self, page_number: usize, is_last_page: bool) -> bool {
        match self {
            Self::All => true,
            Self::FirstOnly => page_number == 1,
            Self::LastOnly => is_last_page,
            Self::AllButLast => !is_last_page,
        }
    }
}

/// One row of a summary or totals table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub underlined: bool,
}

impl SummaryEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            bold: false,
            underlined: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underlined = true;
        self
    }
}

/// A billable line of the positions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub total: String,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            total: total.into(),
        }
    }
}

/// An entry of the positions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Position {
    /// Level-1 section heading spanning the whole row.
    Heading1 { text: String },
    /// Level-2 section heading spanning the whole row.
    Heading2 { text: String },
    /// A regular billable line.
    Item(LineItem),
}

/// Header labels of the positions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTitles {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub total: String,
}

impl Default for ColumnTitles {
    fn default() -> Self {
        Self {
            description: "Beschreibung".into(),
            quantity: "Menge".into(),
            unit_price: "Preis".into(),
            total: "Total".into(),
        }
    }
}

/// Everything printed on one invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub title: String,
    #[serde(default)]
    pub column_titles: ColumnTitles,
    /// Recipient address lines shown in the address window.
    #[serde(default)]
    pub recipient: Vec<String>,
    /// Key figures printed next to the address window on every page.
    #[serde(default)]
    pub summary: Vec<SummaryEntry>,
    #[serde(default)]
    pub intro: Option<Vec<String>>,
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Totals printed below the positions table.
    #[serde(default)]
    pub total: Vec<SummaryEntry>,
    #[serde(default)]
    pub conditions: Option<Vec<String>>,
    #[serde(default)]
    pub payment_slip: Option<PaymentSlip>,
}

impl Invoice {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            column_titles: ColumnTitles::default(),
            recipient: Vec::new(),
            summary: Vec::new(),
            intro: None,
            positions: Vec::new(),
            total: Vec::new(),
            conditions: None,
            payment_slip: None,
        }
    }
}
