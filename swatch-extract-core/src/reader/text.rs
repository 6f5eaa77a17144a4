//! Positioned word extraction from page content streams.
//!
//! The `pdf` crate exposes raw content operators, so word boxes are
//! reconstructed by replaying the text state machine: text and line
//! matrices, font size, character/word spacing, horizontal scaling,
//! leading, and rise. Each text-show operator yields one [`Word`]
//! with its device-space bounding box.

use crate::geometry::Rect;
use crate::page::Word;
use pdf::content::{Matrix, Op, TextDrawAdjusted};
use pdf::error::PdfError;
use pdf::font::{Font, FontData, FontDescriptor, ToUnicodeMap, Widths};
use pdf::object::{Page, Resolve};
use pdf::primitive::PdfString;
use std::collections::HashMap;

// Used when a font carries no descriptor metrics (1000-unit glyph space).
const DEFAULT_ASCENT: f32 = 800.0;
const DEFAULT_DESCENT: f32 = -200.0;

/// Row-major 2x3 matrix product, `left` applied after `right`
pub(crate) fn matrix_mul(left: &Matrix, right: &Matrix) -> Matrix {
    Matrix {
        a: left.a * right.a + left.b * right.c,
        b: left.a * right.b + left.b * right.d,
        c: left.c * right.a + left.d * right.c,
        d: left.c * right.b + left.d * right.d,
        e: left.e * right.a + left.f * right.c + right.e,
        f: left.e * right.b + left.f * right.d + right.f,
    }
}

/// Transform a point by a matrix
pub(crate) fn apply_matrix(matrix: &Matrix, point: (f32, f32)) -> (f32, f32) {
    (
        matrix.a * point.0 + matrix.c * point.1 + matrix.e,
        matrix.b * point.0 + matrix.d * point.1 + matrix.f,
    )
}

fn translation(tx: f32, ty: f32) -> Matrix {
    Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: tx,
        f: ty,
    }
}

/// Text state carried across text operators
struct TextState {
    current_font: Option<String>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    text_rise: f32,
    text_matrix: Matrix,
    text_line_matrix: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            current_font: None,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 100.0,
            leading: 0.0,
            text_rise: 0.0,
            text_matrix: Matrix::default(),
            text_line_matrix: Matrix::default(),
        }
    }
}

impl TextState {
    fn begin_text(&mut self) {
        self.text_matrix = Matrix::default();
        self.text_line_matrix = Matrix::default();
    }

    fn set_text_matrix(&mut self, matrix: Matrix) {
        self.text_matrix = matrix;
        self.text_line_matrix = matrix;
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        self.text_line_matrix = matrix_mul(&self.text_line_matrix, &translation(tx, ty));
        self.text_matrix = self.text_line_matrix;
    }

    fn newline(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    fn advance(&mut self, tx: f32) {
        self.text_matrix = matrix_mul(&self.text_matrix, &translation(tx, 0.0));
    }
}

/// Per-font data needed for width and Unicode lookup
pub(crate) struct ResolvedFont {
    widths: Option<Widths>,
    to_unicode: Option<ToUnicodeMap>,
    is_cid: bool,
    metrics: Option<(f32, f32)>,
}

impl ResolvedFont {
    fn from_font(font: &Font, resolver: &impl Resolve) -> Result<Self, PdfError> {
        let widths = font.widths(resolver)?;
        let to_unicode = match font.to_unicode(resolver) {
            Some(map) => Some(map?),
            None => None,
        };
        Ok(Self {
            widths,
            to_unicode,
            is_cid: font.is_cid(),
            metrics: font_metrics(font),
        })
    }

    fn decode(&self, text: &PdfString) -> DecodedRun {
        let bytes = text.as_bytes();
        if self.is_cid {
            decode_cid(bytes, self.to_unicode.as_ref())
        } else {
            decode_simple(bytes, self.to_unicode.as_ref())
        }
    }

    fn glyph_width(&self, code: u16) -> f32 {
        self.widths
            .as_ref()
            .map(|w| w.get(code as usize))
            .unwrap_or(1000.0)
    }
}

fn descriptor_metrics(descriptor: &FontDescriptor) -> (f32, f32) {
    let ascent = descriptor.ascent.unwrap_or(descriptor.font_bbox.top);
    let descent = descriptor.descent.unwrap_or(descriptor.font_bbox.bottom);
    (ascent, descent)
}

fn font_metrics(font: &Font) -> Option<(f32, f32)> {
    match &font.data {
        FontData::Type0(type0) => type0
            .descendant_fonts
            .first()
            .and_then(|descendant| font_metrics(descendant)),
        FontData::Type1(info) | FontData::TrueType(info) => {
            info.font_descriptor.as_ref().map(descriptor_metrics)
        }
        FontData::CIDFontType0(cid) | FontData::CIDFontType2(cid) => {
            Some(descriptor_metrics(&cid.font_descriptor))
        }
        _ => None,
    }
}

/// A decoded text run with the glyph codes used for width lookup
struct DecodedRun {
    text: String,
    codes: Vec<u16>,
}

fn decode_simple(bytes: &[u8], map: Option<&ToUnicodeMap>) -> DecodedRun {
    let mut text = String::new();
    let mut codes = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        let code = byte as u16;
        codes.push(code);
        if let Some(map) = map {
            if let Some(value) = map.get(code) {
                text.push_str(value);
                continue;
            }
        }
        text.push(char::from_u32(code as u32).unwrap_or('\u{FFFD}'));
    }
    DecodedRun { text, codes }
}

fn decode_cid(bytes: &[u8], map: Option<&ToUnicodeMap>) -> DecodedRun {
    let mut text = String::new();
    let mut codes = Vec::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks(2) {
        if chunk.len() != 2 {
            continue;
        }
        let code = u16::from_be_bytes([chunk[0], chunk[1]]);
        codes.push(code);
        if let Some(map) = map {
            if let Some(value) = map.get(code) {
                text.push_str(value);
                continue;
            }
        }
        text.push(char::from_u32(code as u32).unwrap_or('\u{FFFD}'));
    }
    DecodedRun { text, codes }
}

fn fallback_decode(text: &PdfString) -> DecodedRun {
    DecodedRun {
        text: text.to_string_lossy(),
        codes: text.as_bytes().iter().map(|&b| b as u16).collect(),
    }
}

/// Horizontal advance of a run in unscaled text space
fn run_displacement(font: Option<&ResolvedFont>, codes: &[u16], state: &TextState) -> f32 {
    let mut total = 0.0;
    for &code in codes {
        let glyph_width = font.map(|f| f.glyph_width(code)).unwrap_or(1000.0);
        let mut advance = (glyph_width / 1000.0) * state.font_size;
        advance += state.char_spacing;
        if code == 32 {
            advance += state.word_spacing;
        }
        total += advance;
    }
    total * (state.horizontal_scale / 100.0)
}

/// Device-space bounding box of a run: ascent/descent band over the
/// run's advance, pushed through the text matrix.
fn run_bounds(state: &TextState, displacement: f32, metrics: (f32, f32)) -> Rect {
    let (raw_ascent, raw_descent) = metrics;
    let ascent = (raw_ascent / 1000.0) * state.font_size;
    let descent = (raw_descent / 1000.0) * state.font_size;
    let rise = state.text_rise;
    let corners = [
        (0.0, descent + rise),
        (displacement, descent + rise),
        (0.0, ascent + rise),
        (displacement, ascent + rise),
    ];
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for &(x, y) in &corners {
        let (tx, ty) = apply_matrix(&state.text_matrix, (x, y));
        min_x = min_x.min(tx);
        max_x = max_x.max(tx);
        min_y = min_y.min(ty);
        max_y = max_y.max(ty);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

fn show_text(
    state: &mut TextState,
    fonts: &HashMap<String, ResolvedFont>,
    text: &PdfString,
    words: &mut Vec<Word>,
) {
    let font = state
        .current_font
        .as_ref()
        .and_then(|name| fonts.get(name));
    let decoded = match font {
        Some(resolved) => resolved.decode(text),
        None => fallback_decode(text),
    };
    if decoded.text.trim().is_empty() {
        // Still advance the cursor for spacing-only runs
        let displacement = run_displacement(font, &decoded.codes, state);
        if displacement != 0.0 {
            state.advance(displacement);
        }
        return;
    }
    let displacement = run_displacement(font, &decoded.codes, state);
    let metrics = font
        .and_then(|resolved| resolved.metrics)
        .unwrap_or((DEFAULT_ASCENT, DEFAULT_DESCENT));
    let rect = run_bounds(state, displacement, metrics);
    words.push(Word::new(rect, decoded.text));
    if displacement != 0.0 {
        state.advance(displacement);
    }
}

/// Resolve the page's fonts by resource name. A font that fails to
/// resolve is dropped; its runs fall back to byte decoding.
pub(crate) fn collect_fonts(
    page: &Page,
    resolver: &impl Resolve,
) -> HashMap<String, ResolvedFont> {
    let mut fonts = HashMap::new();
    if let Ok(resources) = page.resources() {
        for (name, font) in resources.fonts.iter() {
            match font
                .load(resolver)
                .and_then(|font| ResolvedFont::from_font(&font, resolver))
            {
                Ok(resolved) => {
                    fonts.insert(name.as_str().to_owned(), resolved);
                }
                Err(err) => {
                    tracing::debug!(font = name.as_str(), %err, "skipping unresolvable font");
                }
            }
        }
    }
    fonts
}

/// Replay the content stream's text operators and collect one
/// positioned [`Word`] per text-show run.
pub(crate) fn collect_words(ops: &[Op], fonts: &HashMap<String, ResolvedFont>) -> Vec<Word> {
    let mut state = TextState::default();
    let mut words = Vec::new();
    for op in ops {
        match op {
            Op::BeginText => state.begin_text(),
            Op::SetTextMatrix { matrix } => state.set_text_matrix(*matrix),
            Op::MoveTextPosition { translation } => {
                state.translate_line(translation.x, translation.y)
            }
            Op::TextNewline => state.newline(),
            Op::TextFont { name, size } => {
                state.current_font = Some(name.as_str().to_owned());
                state.font_size = *size;
            }
            Op::CharSpacing { char_space } => state.char_spacing = *char_space,
            Op::WordSpacing { word_space } => state.word_spacing = *word_space,
            Op::TextScaling { horiz_scale } => state.horizontal_scale = *horiz_scale,
            Op::Leading { leading } => state.leading = *leading,
            Op::TextRise { rise } => state.text_rise = *rise,
            Op::TextDraw { text } => show_text(&mut state, fonts, text, &mut words),
            Op::TextDrawAdjusted { array } => {
                for item in array {
                    match item {
                        TextDrawAdjusted::Text(text) => {
                            show_text(&mut state, fonts, text, &mut words)
                        }
                        TextDrawAdjusted::Spacing(amount) => {
                            let adjustment = -amount / 1000.0
                                * state.font_size
                                * (state.horizontal_scale / 100.0);
                            if adjustment != 0.0 {
                                state.advance(adjustment);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    words
}

/// Join run texts in content order into the page's full text
pub(crate) fn join_page_text(words: &[Word]) -> String {
    let mut text = String::new();
    for word in words {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&word.text);
    }
    text
}
