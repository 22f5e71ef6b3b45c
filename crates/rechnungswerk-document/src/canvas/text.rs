// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text measurement and wrapping for the builtin PDF fonts.

use super::surface::{FontFace, FontSpec};

/// Average glyph width relative to the font size. Helvetica and Times
/// average roughly half an em; the monospaced OCR face is 0.6 em.
fn average_glyph_width(face: FontFace) -> f32 {
    match face {
        FontFace::Regular | FontFace::Bold => 0.50,
        FontFace::Ocr => 0.60,
    }
}

/// Estimated rendered width of `text` in points.
pub fn text_width(text: &str, font: FontSpec) -> f32 {
    text.chars().count() as f32 * average_glyph_width(font.face) * font.size
}

/// Characters that fit into `width` points, at least one.
pub fn chars_per_line(width: f32, font: FontSpec) -> usize {
    let glyph = average_glyph_width(font.face) * font.size;
    if glyph <= 0.0 {
        return usize::MAX;
    }
    ((width / glyph).floor() as usize).max(1)
}

/// Wrap every line of `lines` to `width` points.
pub fn wrap_to_width(lines: &[String], width: f32, font: FontSpec) -> Vec<String> {
    let max_chars = chars_per_line(width, font);
    lines
        .iter()
        .flat_map(|line| wrap_text(line, max_chars))
        .collect()
}

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then performs simple word-wrap within
/// each paragraph. Words longer than `max_width` are force-broken.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0usize;

        for word in words {
            let word_len = word.chars().count();
            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        result.push(chunk.iter().collect());
                    } else {
                        current = chunk.iter().collect();
                        current_len = chunk.len();
                    }
                }
            } else if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("Betreuung Januar 2018 Kita Kinderland", 16);
        assert_eq!(lines, vec!["Betreuung Januar", "2018 Kita", "Kinderland"]);
    }

    #[test]
    fn force_breaks_long_words_without_splitting_umlauts() {
        let lines = wrap_text("Grössenänderungsgebühr", 8);
        assert_eq!(lines, vec!["Grössenä", "nderungs", "gebühr"]);
    }

    #[test]
    fn keeps_blank_lines() {
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn ocr_face_is_wider() {
        let regular = text_width("0100003949753>", FontSpec::regular(12.0));
        let ocr = text_width("0100003949753>", FontSpec::ocr(12.0));
        assert!(ocr > regular);
    }
}
