// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Invoice layout, font, and payment-slip configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RechnungswerkError, Result};
use crate::types::{Alignment, PageRule, PaperSize, mm_to_pt};

/// Height of the payment slip strip at the bottom of the page.
pub fn slip_height_pt() -> f32 {
    mm_to_pt(106.0)
}

/// Slip height plus the clearance kept between flowing content and the slip.
pub fn slip_height_with_margin_pt() -> f32 {
    slip_height_pt() + 12.0
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub left_mm: f32,
    pub right_mm: f32,
    /// Leaves room for the letterhead and the address window on every page.
    pub top_mm: f32,
    pub bottom_mm: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            left_mm: 20.0,
            right_mm: 20.0,
            top_mm: 100.0,
            bottom_mm: 15.0,
        }
    }
}

/// Builtin PDF font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

/// Font family and sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: FontFamily,
    pub size: f32,
    pub title_size: f32,
    pub h1_size: f32,
    pub h2_size: f32,
    /// Size of the OCR texts on the payment slip.
    pub ocr_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: FontFamily::Helvetica,
            size: 10.0,
            title_size: 14.0,
            h1_size: 12.0,
            h2_size: 10.0,
            ocr_size: 12.0,
        }
    }
}

/// Line height as a multiple of the font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leading {
    pub default: f32,
    pub title: f32,
    pub h1: f32,
    pub h2: f32,
    pub address: f32,
}

impl Default for Leading {
    fn default() -> Self {
        Self {
            default: 1.2,
            title: 2.4,
            h1: 1.8,
            h2: 1.8,
            address: 1.2,
        }
    }
}

/// Relative column widths of the positions and summary tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableWidths {
    /// Description, quantity, unit price, total.
    pub positions: [f32; 4],
    /// Column for free text next to the summary entries.
    pub summary_main: f32,
    pub summary_label: f32,
    pub summary_value: f32,
}

impl TableWidths {
    /// Summary column widths; a left-aligned summary puts the free text last.
    pub fn summary(&self, alignment: Alignment) -> [f32; 3] {
        match alignment {
            Alignment::Left => [self.summary_label, self.summary_value, self.summary_main],
            _ => [self.summary_main, self.summary_label, self.summary_value],
        }
    }
}

impl Default for TableWidths {
    fn default() -> Self {
        Self {
            positions: [60.0, 10.0, 15.0, 15.0],
            summary_main: 60.0,
            summary_label: 21.0,
            summary_value: 19.0,
        }
    }
}

/// Position of the recipient address window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressBox {
    /// Franking line printed above the address, e.g. "P.P. CH-3000 Bern".
    #[serde(default)]
    pub pp_line: Option<String>,
    pub left_mm: f32,
    pub top_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    #[serde(default)]
    pub rule: PageRule,
}

impl AddressBox {
    /// Default window: on the right when the summary sits on the left, and
    /// vice versa.
    pub fn for_summary(alignment: Alignment) -> Self {
        let left_mm = match alignment {
            Alignment::Left => 140.0,
            _ => 20.0,
        };
        Self {
            pp_line: None,
            left_mm,
            top_mm: 50.0,
            width_mm: 65.0,
            height_mm: 40.0,
            rule: PageRule::All,
        }
    }
}

impl Default for AddressBox {
    fn default() -> Self {
        Self::for_summary(Alignment::Right)
    }
}

/// Page geometry and typography shared by every generated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub paper_size: PaperSize,
    pub margins: PageMargins,
    /// Vertical gap before tables and closing paragraphs.
    pub space_before_mm: f32,
    pub leading: Leading,
    pub fonts: FontConfig,
    pub table_widths: TableWidths,
    /// Side on which the summary table is printed next to the address.
    pub summary_alignment: Alignment,
    pub address: AddressBox,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margins: PageMargins::default(),
            space_before_mm: 5.0,
            leading: Leading::default(),
            fonts: FontConfig::default(),
            table_widths: TableWidths::default(),
            summary_alignment: Alignment::Right,
            address: AddressBox::default(),
        }
    }
}

/// Pre-printed slip background images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipBackground {
    pub post_image: PathBuf,
    pub bank_image: PathBuf,
}

/// Placement of the payment slip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipConfig {
    /// Shift to the right, for printers that do not hit the form exactly.
    pub left_offset_mm: f32,
    /// Shift downwards.
    pub top_offset_mm: f32,
    /// Never print the slip on page 1, so the first sheet can be kept.
    pub not_on_page_one: bool,
    /// Print the slip form itself, for plain paper.
    pub background: Option<SlipBackground>,
    /// Print a placeholder slip on the pages selected by this rule.
    pub dummy_rule: Option<PageRule>,
}

impl SlipConfig {
    pub fn x_offset_pt(&self) -> f32 {
        mm_to_pt(self.left_offset_mm)
    }

    /// Vertical offset in PDF coordinates, which grow upwards.
    pub fn y_offset_pt(&self) -> f32 {
        -mm_to_pt(self.top_offset_mm)
    }
}

/// A fixed text box such as a letterhead or footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseBox {
    pub lines: Vec<String>,
    pub left_mm: f32,
    pub top_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    #[serde(default)]
    pub rule: PageRule,
    #[serde(default)]
    pub alignment: Alignment,
    /// Overrides the default leading.
    #[serde(default)]
    pub leading: Option<f32>,
    /// Overrides the default font size.
    #[serde(default)]
    pub font_size: Option<f32>,
}

/// A logo image placed at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoConfig {
    pub path: PathBuf,
    pub left_mm: f32,
    pub top_mm: f32,
    /// Height follows from the image aspect ratio.
    pub width_mm: f32,
    #[serde(default)]
    pub rule: PageRule,
}

/// Complete configuration of the invoice generator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub layout: LayoutConfig,
    pub slip: SlipConfig,
    /// Printed next to the totals.
    pub payment_conditions: Option<Vec<String>>,
    pub header: Option<PhraseBox>,
    pub footer: Option<PhraseBox>,
    pub logo: Option<LogoConfig>,
    /// Written to the PDF metadata.
    pub producer: Option<String>,
}

impl InvoiceConfig {
    /// Load a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Print a placeholder slip on the pages selected by `rule` and keep the
    /// slip zone free of flowing content on every page.
    pub fn with_dummy_slip(mut self, rule: PageRule) -> Self {
        self.slip.dummy_rule = Some(rule);
        self
    }

    /// Bottom margin in points, raised to the slip zone when a dummy slip
    /// may appear on any page.
    pub fn bottom_margin_pt(&self) -> f32 {
        match self.slip.dummy_rule {
            Some(_) => slip_height_with_margin_pt() + self.slip.y_offset_pt(),
            None => mm_to_pt(self.layout.margins.bottom_mm),
        }
    }

    /// Reject values that would make the page geometry meaningless.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.layout.paper_size.dimensions_mm();
        let margins = &self.layout.margins;
        if margins.left_mm + margins.right_mm >= width as f32 {
            return Err(RechnungswerkError::Config(
                "left and right margins leave no room for content".into(),
            ));
        }
        if margins.top_mm + margins.bottom_mm >= height as f32 {
            return Err(RechnungswerkError::Config(
                "top and bottom margins leave no room for content".into(),
            ));
        }
        let widths = &self.layout.table_widths;
        if widths.positions.iter().any(|w| *w <= 0.0) {
            return Err(RechnungswerkError::Config(
                "position column widths must be positive".into(),
            ));
        }
        Ok(())
    }
}
