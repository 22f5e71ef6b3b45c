// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialise rendered pages to PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::collections::HashMap;
use std::sync::Arc;

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Pt, RawImage, RawImageData, RawImageFormat, Rgb, TextItem, XObjectId, XObjectTransform,
};
use rechnungswerk_core::config::FontFamily;
use rechnungswerk_core::error::Result;
use tracing::{debug, info, instrument};

use crate::canvas::{DrawCommand, FontFace, ImageAsset, RenderedDocument};

/// Resolution images are embedded at before scaling to their target box.
const IMAGE_DPI: f32 = 300.0;

/// Writes rendered documents as PDF with the builtin fonts.
pub struct PdfWriter {
    family: FontFamily,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    producer: Option<String>,
}

impl PdfWriter {
    pub fn new(family: FontFamily) -> Self {
        Self {
            family,
            title: None,
            producer: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_producer(&mut self, producer: impl Into<String>) {
        self.producer = Some(producer.into());
    }

    /// Builtin font for a face of the configured family. The OCR face has no
    /// builtin equivalent and is set in Courier.
    pub fn builtin_font(&self, face: FontFace) -> BuiltinFont {
        match (face, self.family) {
            (FontFace::Ocr, _) => BuiltinFont::Courier,
            (FontFace::Regular, FontFamily::Helvetica) => BuiltinFont::Helvetica,
            (FontFace::Bold, FontFamily::Helvetica) => BuiltinFont::HelveticaBold,
            (FontFace::Regular, FontFamily::Times) => BuiltinFont::TimesRoman,
            (FontFace::Bold, FontFamily::Times) => BuiltinFont::TimesBold,
            (FontFace::Regular, FontFamily::Courier) => BuiltinFont::Courier,
            (FontFace::Bold, FontFamily::Courier) => BuiltinFont::CourierBold,
        }
    }

    /// Serialise every page of `document`.
    #[instrument(skip(self, document), fields(pages = document.page_count()))]
    pub fn write(&self, document: &RenderedDocument) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Rechnungswerk Document");
        info!(title, family = ?self.family, "Creating invoice PDF");

        let mut doc = PdfDocument::new(title);
        if let Some(producer) = &self.producer {
            doc.metadata.info.producer = producer.clone();
        }

        let (page_w, page_h) = (pt_to_mm(document.width()), pt_to_mm(document.height()));
        // Shared assets are embedded once, keyed by their allocation.
        let mut images: HashMap<usize, XObjectId> = HashMap::new();
        let mut pages: Vec<PdfPage> = Vec::with_capacity(document.page_count());

        for surface in document.pages() {
            let mut ops: Vec<Op> = Vec::new();
            for command in surface.commands() {
                match command {
                    DrawCommand::Text { text, x, y, font } => {
                        let builtin = self.builtin_font(font.face);
                        ops.push(Op::StartTextSection);
                        ops.push(Op::SetTextCursor {
                            pos: Point { x: Pt(*x), y: Pt(*y) },
                        });
                        ops.push(Op::SetFontSizeBuiltinFont {
                            size: Pt(font.size),
                            font: builtin,
                        });
                        ops.push(Op::WriteTextBuiltinFont {
                            items: vec![TextItem::Text(text.clone())],
                            font: builtin,
                        });
                        ops.push(Op::EndTextSection);
                    }
                    DrawCommand::Line {
                        from,
                        to,
                        width,
                        gray,
                    } => {
                        ops.push(Op::SaveGraphicsState);
                        ops.push(Op::SetOutlineColor {
                            col: Color::Rgb(Rgb::new(*gray, *gray, *gray, None)),
                        });
                        ops.push(Op::SetOutlineThickness { pt: Pt(*width) });
                        ops.push(Op::DrawLine {
                            line: Line {
                                points: vec![line_point(*from), line_point(*to)],
                                is_closed: false,
                            },
                        });
                        ops.push(Op::RestoreGraphicsState);
                    }
                    DrawCommand::Image { image, rect } => {
                        if image.width_px() == 0 || image.height_px() == 0 {
                            continue;
                        }
                        let id = images
                            .entry(Arc::as_ptr(image) as usize)
                            .or_insert_with(|| doc.add_image(&raw_image(image)))
                            .clone();

                        // Native size at IMAGE_DPI, scaled onto the target box.
                        let native_w = image.width_px() as f32 / IMAGE_DPI * 72.0;
                        let native_h = image.height_px() as f32 / IMAGE_DPI * 72.0;
                        ops.push(Op::UseXobject {
                            id,
                            transform: XObjectTransform {
                                translate_x: Some(Pt(rect.x)),
                                translate_y: Some(Pt(rect.y)),
                                scale_x: Some(rect.width / native_w),
                                scale_y: Some(rect.height / native_h),
                                dpi: Some(IMAGE_DPI),
                                rotate: None,
                            },
                        });
                    }
                }
            }
            pages.push(PdfPage::new(Mm(page_w), Mm(page_h), ops));
        }

        doc.with_pages(pages);
        debug!(
            pages = doc.pages.len(),
            images = images.len(),
            "Page operations complete"
        );

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }
}

fn pt_to_mm(points: f32) -> f32 {
    points * 25.4 / 72.0
}

fn line_point((x, y): (f32, f32)) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn raw_image(image: &ImageAsset) -> RawImage {
    RawImage {
        pixels: RawImageData::U8(image.rgb().to_vec()),
        width: image.width_px() as usize,
        height: image.height_px() as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{FontSpec, PageSurface, Rect};
    use crate::pdf::PdfReader;
    use rechnungswerk_core::Alignment;

    fn document(pages: usize) -> RenderedDocument {
        let surfaces = (1..=pages)
            .map(|number| {
                let mut page = PageSurface::new(number, 595.0, 842.0);
                page.show_text_aligned(
                    &format!("Seite {number}"),
                    50.0,
                    800.0,
                    Alignment::Left,
                    FontSpec::regular(10.0),
                );
                page.draw_rule(50.0, 545.0, 790.0);
                page
            })
            .collect();
        RenderedDocument::new(595.0, 842.0, surfaces)
    }

    #[test]
    fn maps_faces_onto_the_family() {
        let writer = PdfWriter::new(FontFamily::Times);
        assert!(matches!(writer.builtin_font(FontFace::Bold), BuiltinFont::TimesBold));
        assert!(matches!(writer.builtin_font(FontFace::Ocr), BuiltinFont::Courier));
        let writer = PdfWriter::new(FontFamily::Helvetica);
        assert!(matches!(writer.builtin_font(FontFace::Regular), BuiltinFont::Helvetica));
    }

    #[test]
    fn writes_one_pdf_page_per_surface() {
        let mut writer = PdfWriter::new(FontFamily::Helvetica);
        writer.set_title("Rechnung");
        let bytes = writer.write(&document(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);
        let (width, height) = reader.page_size(2).unwrap();
        assert!((width - 595.0).abs() < 0.5);
        assert!((height - 842.0).abs() < 0.5);
    }

    #[test]
    fn embeds_images() {
        let mut png = Vec::new();
        ::image::RgbImage::from_pixel(4, 2, ::image::Rgb([200, 10, 10]))
            .write_to(&mut std::io::Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();
        let asset = Arc::new(ImageAsset::from_bytes(&png).unwrap());

        let mut page = PageSurface::new(1, 595.0, 842.0);
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
        };
        page.add_image_under(&asset, rect);
        page.add_image(&asset, rect);
        let document = RenderedDocument::new(595.0, 842.0, vec![page]);

        let bytes = PdfWriter::new(FontFamily::Courier).write(&document).unwrap();
        assert_eq!(PdfReader::from_bytes(&bytes).unwrap().page_count(), 1);
    }
}
