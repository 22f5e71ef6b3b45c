// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Payment slip overlays — the orange ESR slip (post, bank, and placeholder)
// printed onto the pre-printed form, and the QR bill image.

use std::fmt;
use std::sync::Arc;

use rechnungswerk_core::config::{LayoutConfig, SlipBackground, SlipConfig};
use rechnungswerk_core::error::{RechnungswerkError, Result};
use rechnungswerk_core::esr::{QrBill, QrBillGenerator, SlipVariant};
use rechnungswerk_core::{Alignment, PageRule, PaymentSlip, mm_to_pt};
use tracing::debug;

use super::{Overlay, OverlayKind};
use crate::canvas::{FontSpec, ImageAsset, PageSurface, Rect};

// -- Form geometry ------------------------------------------------------------
//
// The ESR form is laid out on a grid of tenths of an inch horizontally and
// sixths of an inch vertically, measured from the lower-left page corner.

const FORM_WIDTH: i32 = 595;
const POINTS_PER_INCH: i32 = 72;
const CELLS_PER_INCH: i32 = 10;
const ROWS_PER_INCH: i32 = 6;
const CELL: i32 = POINTS_PER_INCH / CELLS_PER_INCH;

const fn cells(count: i32) -> i32 {
    count * POINTS_PER_INCH / CELLS_PER_INCH
}

const fn rows(count: i32) -> i32 {
    count * POINTS_PER_INCH / ROWS_PER_INCH
}

const RECEIPT_X: i32 = 2 * CELL + 3;
const RECEIPT_WIDTH: i32 = cells(20) - 3;
const PAYMENT_X: i32 = 25 * CELL + 3;
const PAYMENT_WIDTH: i32 = cells(22);

const CODING_LINE: (i32, i32) = (FORM_WIDTH - cells(3) - 3, rows(4));
const REFERENCE: (i32, i32) = (FORM_WIDTH - 4 * CELL, rows(16) + 2);
const RECEIPT_REFERENCE: (i32, i32) = (RECEIPT_X, rows(10) + 2);
const RECEIPT_REFERENCE_SIZE: f32 = 9.0;

const AMOUNT_Y: i32 = rows(12) + 2;
const FRANCS_X: [i32; 2] = [16 * CELL, 41 * CELL];
const RAPPEN_X: [i32; 2] = [20 * CELL, 45 * CELL];

const ACCOUNT_X: [i32; 2] = [11 * CELL, 36 * CELL];
const ACCOUNT_Y: i32 = rows(14) + 4;

/// Width of the QR bill image.
const QR_BILL_WIDTH_MM: f32 = 220.0;

/// A text box on the form, anchored at its lower-left corner.
#[derive(Debug, Clone, Copy)]
struct FormBox {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl FormBox {
    const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn rect(self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x as f32 + dx,
            y: self.y as f32 + dy,
            width: self.width as f32,
            height: self.height as f32,
        }
    }
}

/// Payment part first, receipt second.
const PAYER: [FormBox; 2] = [
    FormBox::new(50 * CELL + 1, rows(6) + 6, cells(31), rows(7)),
    FormBox::new(RECEIPT_X, rows(3) + 6, RECEIPT_WIDTH, rows(6)),
];
const POST_PAYEE: [FormBox; 2] = [
    FormBox::new(PAYMENT_X, rows(15) + 6, PAYMENT_WIDTH, rows(7)),
    FormBox::new(RECEIPT_X, rows(15) + 6, RECEIPT_WIDTH, rows(7)),
];
const BANK_PAYEE: [FormBox; 2] = [
    FormBox::new(PAYMENT_X, rows(21) + 4, PAYMENT_WIDTH, rows(2)),
    FormBox::new(RECEIPT_X, rows(21) + 4, RECEIPT_WIDTH, rows(2)),
];
const BENEFICIARY: [FormBox; 2] = [
    FormBox::new(PAYMENT_X, rows(15) + 4, PAYMENT_WIDTH, rows(5)),
    FormBox::new(RECEIPT_X, rows(15) + 4, RECEIPT_WIDTH, rows(5)),
];

fn at(value: i32, offset: f32) -> f32 {
    value as f32 + offset
}

// -- ESR slip -----------------------------------------------------------------

/// Where the payee goes: post slips have one tall box, bank slips a short
/// bank box above the final beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    Post,
    Bank,
}

/// The orange ESR slip printed at the bottom of a page.
#[derive(Debug, Clone)]
pub struct EsrSlipOverlay {
    slip: PaymentSlip,
    fields: FieldLayout,
    background: Option<Arc<ImageAsset>>,
    x_offset: f32,
    y_offset: f32,
}

impl EsrSlipOverlay {
    pub fn new(slip: PaymentSlip, fields: FieldLayout, config: &SlipConfig) -> Self {
        Self {
            slip,
            fields,
            background: None,
            x_offset: config.x_offset_pt(),
            y_offset: config.y_offset_pt(),
        }
    }

    /// Print the form itself below the texts.
    pub fn with_background(mut self, image: Arc<ImageAsset>) -> Self {
        self.background = Some(image);
        self
    }

    pub fn fields(&self) -> FieldLayout {
        self.fields
    }

    pub fn name(&self) -> &'static str {
        match self.slip.variant() {
            SlipVariant::Dummy => "dummy slip",
            _ => match self.fields {
                FieldLayout::Post => "post slip",
                FieldLayout::Bank => "bank slip",
            },
        }
    }

    pub fn render(&self, page: &mut PageSurface, layout: &LayoutConfig) {
        let (dx, dy) = (self.x_offset, self.y_offset);
        let slip = &self.slip;

        if let Some(background) = &self.background {
            let width = page.width();
            let rect = Rect {
                x: dx,
                y: dy,
                width,
                height: background.scaled_height(width),
            };
            page.add_image_under(background, rect);
        }

        let regular = FontSpec::regular(layout.fonts.size);
        let ocr = FontSpec::ocr(layout.fonts.ocr_size);
        let leading = layout.leading.default;

        for x in ACCOUNT_X {
            page.show_text_aligned(slip.account_display(), at(x, dx), at(ACCOUNT_Y, dy), Alignment::Left, regular);
        }

        let francs = slip.amount_francs_display();
        for x in FRANCS_X {
            page.show_text_aligned(&francs, at(x, dx), at(AMOUNT_Y, dy), Alignment::Right, ocr);
        }
        let rappen = slip.amount_rappen_text();
        for x in RAPPEN_X {
            page.show_text_aligned(&rappen, at(x, dx), at(AMOUNT_Y, dy), Alignment::Left, ocr);
        }

        page.show_text_aligned(
            &slip.reference_display_text(),
            at(REFERENCE.0, dx),
            at(REFERENCE.1, dy),
            Alignment::Right,
            regular,
        );
        page.show_text_aligned(
            &slip.reference_receipt_text(),
            at(RECEIPT_REFERENCE.0, dx),
            at(RECEIPT_REFERENCE.1, dy),
            Alignment::Left,
            FontSpec::regular(RECEIPT_REFERENCE_SIZE),
        );

        let payer = slip.payer_lines();
        for form_box in PAYER {
            page.write_multi_line(&payer, form_box.rect(dx, dy), regular, leading, Alignment::Left);
        }

        let payee = slip.payee_lines();
        match self.fields {
            FieldLayout::Post => {
                for form_box in POST_PAYEE {
                    page.write_multi_line(&payee, form_box.rect(dx, dy), regular, leading, Alignment::Left);
                }
            }
            FieldLayout::Bank => {
                let beneficiary = slip.beneficiary_lines();
                for form_box in BANK_PAYEE {
                    page.write_multi_line(&payee, form_box.rect(dx, dy), regular, leading, Alignment::Left);
                }
                for form_box in BENEFICIARY {
                    page.write_multi_line(&beneficiary, form_box.rect(dx, dy), regular, leading, Alignment::Left);
                }
            }
        }

        page.show_text_aligned(
            &slip.coding_line(),
            at(CODING_LINE.0, dx),
            at(CODING_LINE.1, dy),
            Alignment::Right,
            ocr,
        );
    }
}

// -- QR bill ------------------------------------------------------------------

/// The QR bill payment part, rendered by an external generator.
#[derive(Clone)]
pub struct QrBillOverlay {
    bill: QrBill,
    generator: Arc<dyn QrBillGenerator>,
    x_offset: f32,
    y_offset: f32,
}

impl QrBillOverlay {
    pub fn new(bill: QrBill, generator: Arc<dyn QrBillGenerator>, config: &SlipConfig) -> Self {
        Self {
            bill,
            generator,
            x_offset: config.x_offset_pt(),
            y_offset: config.y_offset_pt(),
        }
    }

    pub fn bill(&self) -> &QrBill {
        &self.bill
    }

    pub fn render(&self, page: &mut PageSurface) -> Result<()> {
        let png = self.generator.render_png(&self.bill)?;
        let image = Arc::new(ImageAsset::from_bytes(&png)?);
        let width = mm_to_pt(QR_BILL_WIDTH_MM);
        let rect = Rect {
            x: self.x_offset,
            y: self.y_offset,
            width,
            height: image.scaled_height(width),
        };
        debug!(
            width_px = image.width_px(),
            height_px = image.height_px(),
            "QR bill rendered"
        );
        page.add_image_under(&image, rect);
        Ok(())
    }
}

impl fmt::Debug for QrBillOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrBillOverlay")
            .field("bill", &self.bill)
            .field("x_offset", &self.x_offset)
            .field("y_offset", &self.y_offset)
            .finish_non_exhaustive()
    }
}

// -- Slip selection -----------------------------------------------------------

/// Decoded slip form images.
#[derive(Debug, Clone)]
pub struct SlipBackgroundImages {
    pub post: Arc<ImageAsset>,
    pub bank: Arc<ImageAsset>,
}

impl SlipBackgroundImages {
    pub fn load(background: &SlipBackground) -> Result<Self> {
        let load = |path: &std::path::Path| {
            ImageAsset::from_path(path)
                .map(Arc::new)
                .map_err(|err| err.into_generation(format!("could not load slip form {}", path.display())))
        };
        Ok(Self {
            post: load(&background.post_image)?,
            bank: load(&background.bank_image)?,
        })
    }
}

/// Everything a slip overlay may need beyond the slip itself.
#[derive(Clone, Default)]
pub struct SlipResources {
    pub backgrounds: Option<SlipBackgroundImages>,
    pub qr_generator: Option<Arc<dyn QrBillGenerator>>,
}

impl fmt::Debug for SlipResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlipResources")
            .field("backgrounds", &self.backgrounds)
            .field("qr_generator", &self.qr_generator.is_some())
            .finish()
    }
}

/// Turns a payment slip into the overlay that prints it.
pub trait SlipRendering {
    fn renderer_for(&self, config: &SlipConfig, resources: &SlipResources, rule: PageRule) -> Result<Overlay>;
}

impl SlipRendering for PaymentSlip {
    fn renderer_for(&self, config: &SlipConfig, resources: &SlipResources, rule: PageRule) -> Result<Overlay> {
        let esr = |fields: FieldLayout| {
            let overlay = EsrSlipOverlay::new(self.clone(), fields, config);
            let background = resources.backgrounds.as_ref().map(|images| match fields {
                FieldLayout::Post => Arc::clone(&images.post),
                FieldLayout::Bank => Arc::clone(&images.bank),
            });
            let overlay = match background {
                Some(image) => overlay.with_background(image),
                None => overlay,
            };
            OverlayKind::Esr(overlay)
        };

        let kind = match self.variant() {
            SlipVariant::Post(_) | SlipVariant::Dummy => esr(FieldLayout::Post),
            SlipVariant::Bank { .. } => esr(FieldLayout::Bank),
            SlipVariant::Qr(_) => {
                let generator = resources
                    .qr_generator
                    .clone()
                    .ok_or(RechnungswerkError::QrBillGeneratorMissing)?;
                let bill = self
                    .qr_bill()
                    .ok_or_else(|| RechnungswerkError::Layout("QR slip without bill data".into()))?;
                OverlayKind::QrBill(QrBillOverlay::new(bill, generator, config))
            }
        };
        Ok(Overlay::new(rule, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;
    use rechnungswerk_core::PaperSize;
    use rechnungswerk_core::esr::{QrAddress, QrBillValidationError};
    use rust_decimal_macros::dec;

    fn a4_page() -> PageSurface {
        let (width, height) = PaperSize::A4.dimensions_pt();
        PageSurface::new(1, width, height)
    }

    fn position_of(page: &PageSurface, needle: &str) -> Vec<(f32, f32)> {
        page.commands()
            .filter_map(|command| match command {
                DrawCommand::Text { text, x, y, .. } if text == needle => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    fn post_slip() -> PaymentSlip {
        PaymentSlip::post(
            vec!["Kita Kinderland".into(), "3000 Bern".into()],
            120000000000234478943216899,
            dec!(3949.75),
            "01-162-8",
            vec!["Familie Muster".into()],
        )
        .unwrap()
    }

    fn render(slip: &PaymentSlip, config: &SlipConfig) -> PageSurface {
        let overlay = slip
            .renderer_for(config, &SlipResources::default(), PageRule::LastOnly)
            .unwrap();
        let mut page = a4_page();
        overlay.render(&mut page, &LayoutConfig::default()).unwrap();
        page
    }

    #[test]
    fn form_grid_matches_the_slip() {
        assert_eq!(CODING_LINE, (571, 48));
        assert_eq!(REFERENCE, (567, 194));
        assert_eq!(RECEIPT_REFERENCE, (17, 122));
        assert_eq!((FRANCS_X, RAPPEN_X, AMOUNT_Y), ([112, 287], [140, 315], 146));
        assert_eq!((ACCOUNT_X, ACCOUNT_Y), ([77, 252], 172));
        assert_eq!(
            (PAYER[0].x, PAYER[0].y, PAYER[0].width, PAYER[0].height),
            (351, 78, 223, 84)
        );
        assert_eq!(
            (BANK_PAYEE[1].x, BANK_PAYEE[1].y, BANK_PAYEE[1].width, BANK_PAYEE[1].height),
            (17, 256, 141, 24)
        );
        assert_eq!((BENEFICIARY[0].y, BENEFICIARY[0].height), (184, 60));
    }

    #[test]
    fn post_slip_prints_every_field_twice() {
        let page = render(&post_slip(), &SlipConfig::default());
        assert_eq!(position_of(&page, "01-162-8"), vec![(77.0, 172.0), (252.0, 172.0)]);
        assert_eq!(position_of(&page, "3949").len(), 2);
        assert_eq!(position_of(&page, "75"), vec![(140.0, 146.0), (315.0, 146.0)]);
        assert_eq!(position_of(&page, "Kita Kinderland").len(), 2);
        assert_eq!(position_of(&page, "Familie Muster").len(), 2);
        assert!(page.contains_text("12 00000 00000 23447 89432 16899"));
        assert!(page.contains_text("0100003949753>120000000000234478943216899+ 010001628>"));
    }

    #[test]
    fn offsets_shift_the_whole_slip() {
        let config = SlipConfig {
            left_offset_mm: 2.0,
            top_offset_mm: 1.0,
            ..SlipConfig::default()
        };
        let page = render(&post_slip(), &config);
        let (x, y) = position_of(&page, "01-162-8")[0];
        assert!((x - (77.0 + mm_to_pt(2.0))).abs() < 1e-3);
        assert!((y - (172.0 - mm_to_pt(1.0))).abs() < 1e-3);
    }

    #[test]
    fn bank_slip_adds_the_beneficiary() {
        let slip = PaymentSlip::bank(
            vec!["Berner Kantonalbank".into()],
            vec!["Kita Kinderland".into()],
            1236,
            dec!(10.00),
            "01-162-8",
            vec!["Familie Muster".into()],
        )
        .unwrap();
        let page = render(&slip, &SlipConfig::default());
        assert_eq!(position_of(&page, "Berner Kantonalbank").len(), 2);
        assert_eq!(position_of(&page, "Kita Kinderland").len(), 2);
        assert!(page.contains_text("1236"));
    }

    #[test]
    fn dummy_slip_prints_placeholders() {
        let page = render(&PaymentSlip::dummy(), &SlipConfig::default());
        assert!(page.contains_text("XXXXXXX"));
        assert!(!page.contains_text("CHF"));
        assert!(page.texts().all(|text| text.chars().all(|c| c == 'X')));
    }

    fn address(name: &str) -> QrAddress {
        QrAddress {
            name: name.into(),
            street: "Nussbaumstrasse".into(),
            house_number: "21".into(),
            postal_code: "3000".into(),
            town: "Bern".into(),
            country_code: "CH".into(),
        }
    }

    fn qr_slip() -> PaymentSlip {
        PaymentSlip::qr(
            address("Kita Kinderland"),
            210000000003139471430009017,
            dec!(199.95),
            "CH44 3199 9123 0008 8901 2",
            address("Familie Muster"),
            None,
            None,
        )
        .unwrap()
    }

    struct Rejecting;

    impl QrBillGenerator for Rejecting {
        fn render_png(&self, _bill: &QrBill) -> std::result::Result<Vec<u8>, QrBillValidationError> {
            Err(QrBillValidationError {
                field: "account".into(),
                message_key: "account_is_ch_li_iban".into(),
            })
        }
    }

    #[test]
    fn qr_slip_needs_a_generator() {
        let err = qr_slip()
            .renderer_for(&SlipConfig::default(), &SlipResources::default(), PageRule::LastOnly)
            .unwrap_err();
        assert!(matches!(err, RechnungswerkError::QrBillGeneratorMissing));
    }

    #[test]
    fn generator_errors_surface_as_qr_bill_errors() {
        let resources = SlipResources {
            backgrounds: None,
            qr_generator: Some(Arc::new(Rejecting)),
        };
        let overlay = qr_slip()
            .renderer_for(&SlipConfig::default(), &resources, PageRule::LastOnly)
            .unwrap();
        assert_eq!(overlay.name(), "QR bill");
        let mut page = a4_page();
        let err = overlay.render(&mut page, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, RechnungswerkError::QrBill { ref field, .. } if field == "account"));
    }
}
