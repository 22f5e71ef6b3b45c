// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text overlays: free phrases (letterhead, footer) and the address window.

use rechnungswerk_core::config::{AddressBox, LayoutConfig, PhraseBox};
use rechnungswerk_core::{Alignment, mm_to_pt};

use crate::canvas::surface::DESCENT_RATIO;
use crate::canvas::text::{text_width, wrap_to_width};
use crate::canvas::{DrawCommand, FontSpec, PageSurface, Rect};

/// Gap between the franking line and the address.
const PP_SPACING_MM: f32 = 3.0;
/// Distance of the underline below the baseline, relative to the font size.
const UNDERLINE_OFFSET: f32 = 0.1;

/// Lines of text in a fixed box.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseOverlay {
    lines: Vec<String>,
    left_mm: f32,
    top_mm: f32,
    width_mm: f32,
    height_mm: f32,
    alignment: Alignment,
    leading: Option<f32>,
    font_size: Option<f32>,
}

impl PhraseOverlay {
    pub fn new(lines: Vec<String>, left_mm: f32, top_mm: f32, width_mm: f32, height_mm: f32) -> Self {
        Self {
            lines,
            left_mm,
            top_mm,
            width_mm,
            height_mm,
            alignment: Alignment::Left,
            leading: None,
            font_size: None,
        }
    }

    pub fn from_box(phrase: &PhraseBox) -> Self {
        Self {
            alignment: phrase.alignment,
            leading: phrase.leading,
            font_size: phrase.font_size,
            ..Self::new(
                phrase.lines.clone(),
                phrase.left_mm,
                phrase.top_mm,
                phrase.width_mm,
                phrase.height_mm,
            )
        }
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn render(&self, page: &mut PageSurface, layout: &LayoutConfig) {
        let rect = Rect::from_top_left_mm(
            self.left_mm,
            self.top_mm,
            self.width_mm,
            self.height_mm,
            page.height(),
        );
        let font = FontSpec::regular(self.font_size.unwrap_or(layout.fonts.size));
        let leading = self.leading.unwrap_or(layout.leading.default);
        page.write_multi_line(&self.lines, rect, font, leading, self.alignment);
    }
}

/// The recipient address, optionally below an underlined franking line.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressOverlay {
    lines: Vec<String>,
    window: AddressBox,
}

impl AddressOverlay {
    pub fn new(lines: Vec<String>, window: AddressBox) -> Self {
        Self { lines, window }
    }

    pub fn render(&self, page: &mut PageSurface, layout: &LayoutConfig) {
        let window = &self.window;
        let rect = Rect::from_top_left_mm(
            window.left_mm,
            window.top_mm,
            window.width_mm,
            window.height_mm,
            page.height(),
        );

        let mut top = rect.top();
        if let Some(pp) = &window.pp_line {
            let font = FontSpec::bold(layout.fonts.size);
            let line_height = font.line_height(layout.leading.default);
            for line in wrap_to_width(std::slice::from_ref(pp), rect.width, font) {
                if top - line_height < rect.y {
                    break;
                }
                top -= line_height;
                let baseline = top + DESCENT_RATIO * font.size;
                page.show_text_aligned(&line, rect.x, baseline, Alignment::Left, font);
                let underline = baseline - UNDERLINE_OFFSET * font.size;
                page.push(DrawCommand::Line {
                    from: (rect.x, underline),
                    to: (rect.x + text_width(&line, font), underline),
                    width: 0.5,
                    gray: 0.0,
                });
            }
            top -= mm_to_pt(PP_SPACING_MM);
        }

        if top <= rect.y {
            return;
        }
        let remaining = Rect {
            height: top - rect.y,
            ..rect
        };
        page.write_multi_line(
            &self.lines,
            remaining,
            FontSpec::regular(layout.fonts.size),
            layout.leading.address,
            Alignment::Left,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rechnungswerk_core::PaperSize;

    fn a4_page() -> PageSurface {
        let (width, height) = PaperSize::A4.dimensions_pt();
        PageSurface::new(1, width, height)
    }

    fn baseline_of(page: &PageSurface, needle: &str) -> f32 {
        page.commands()
            .find_map(|command| match command {
                DrawCommand::Text { text, y, .. } if text == needle => Some(*y),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn phrase_uses_its_own_font_size() {
        let mut phrase = PhraseBox {
            lines: vec!["Kita Kinderland".into()],
            left_mm: 20.0,
            top_mm: 10.0,
            width_mm: 100.0,
            height_mm: 20.0,
            rule: Default::default(),
            alignment: Alignment::Right,
            leading: None,
            font_size: Some(8.0),
        };
        let mut page = a4_page();
        PhraseOverlay::from_box(&phrase).render(&mut page, &LayoutConfig::default());
        let Some(DrawCommand::Text { font, .. }) = page.commands().next() else {
            panic!("expected text");
        };
        assert_eq!(font.size, 8.0);

        phrase.font_size = None;
        let mut page = a4_page();
        PhraseOverlay::from_box(&phrase).render(&mut page, &LayoutConfig::default());
        let Some(DrawCommand::Text { font, .. }) = page.commands().next() else {
            panic!("expected text");
        };
        assert_eq!(font.size, 10.0);
    }

    #[test]
    fn franking_line_is_underlined_and_spaced() {
        let window = AddressBox {
            pp_line: Some("P.P. CH-3000 Bern".into()),
            ..AddressBox::default()
        };
        let lines = vec!["Familie Muster".into(), "Nussbaumstrasse 35".into()];
        let mut page = a4_page();
        AddressOverlay::new(lines.clone(), window).render(&mut page, &LayoutConfig::default());

        assert!(page.commands().any(|c| matches!(c, DrawCommand::Line { gray, .. } if *gray == 0.0)));
        let pp = baseline_of(&page, "P.P. CH-3000 Bern");
        let name = baseline_of(&page, "Familie Muster");
        // One address line plus the franking gap.
        assert!((pp - name - (12.0 + mm_to_pt(PP_SPACING_MM))).abs() < 1e-3);

        let mut plain = a4_page();
        AddressOverlay::new(lines, AddressBox::default()).render(&mut plain, &LayoutConfig::default());
        assert!((baseline_of(&plain, "Familie Muster") - pp).abs() < 1e-3);
    }
}
