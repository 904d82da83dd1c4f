//! Page text sources
//!
//! Produces the per-page line sequences the pipeline consumes, either from a
//! PDF (via lopdf) or from layout-preserving text where pages are separated
//! by form feeds, as written by `pdftotext -layout`.
//!
//! PDF pages are rebuilt from positioned text: every shown string is placed
//! at its text-space origin, strings sharing a baseline form one line, and
//! horizontal positions are converted to character columns so gaps between
//! strings survive as runs of spaces.

use crate::TableError;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

const FORM_FEED: char = '\x0c';

/// Average glyph advance as a fraction of the font size
const CHAR_WIDTH_EM: f32 = 0.6;

/// Baselines closer than this fraction of the font size share a line
const BASELINE_TOLERANCE_EM: f32 = 0.4;

/// A string shown on a page, with its origin in page space
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

/// Read pages from a PDF file
pub fn pages_from_pdf<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>, TableError> {
    let doc = Document::load(path)?;
    Ok(pages_from_doc(&doc))
}

/// Read pages from a PDF memory buffer
pub fn pages_from_pdf_mem(buffer: &[u8]) -> Result<Vec<Vec<String>>, TableError> {
    let doc = Document::load_mem(buffer)?;
    Ok(pages_from_doc(&doc))
}

/// Rebuild each page separately so page numbers stay aligned.
/// A page whose content cannot be read yields no lines.
fn pages_from_doc(doc: &Document) -> Vec<Vec<String>> {
    doc.get_pages()
        .iter()
        .map(|(&page_num, &page_id)| match page_items(doc, page_id) {
            Ok(items) => layout_lines(items),
            Err(e) => {
                log::warn!("page {}: text extraction failed: {}", page_num, e);
                Vec::new()
            }
        })
        .collect()
}

/// Multiply two 2D transformation matrices `[a, b, c, d, e, f]`
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Text state while walking a content stream
struct TextState {
    ctm: [f32; 6],
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    font: Vec<u8>,
    font_size: f32,
    leading: Option<f32>,
}

impl TextState {
    const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

    fn new() -> Self {
        Self {
            ctm: Self::IDENTITY,
            text_matrix: Self::IDENTITY,
            line_matrix: Self::IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            leading: None,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        let translate = [1.0, 0.0, 0.0, 1.0, tx, ty];
        self.line_matrix = multiply_matrices(&translate, &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading.unwrap_or(self.font_size * 1.2);
        self.move_line(0.0, -leading);
    }

    /// Rendered size after text matrix and CTM scaling
    fn rendered_size(&self) -> f32 {
        let m = multiply_matrices(&self.text_matrix, &self.ctm);
        let scale = (m[2].powi(2) + m[3].powi(2)).sqrt();
        self.font_size * scale
    }

    fn place(&self, text: String) -> PlacedText {
        let m = multiply_matrices(&self.text_matrix, &self.ctm);
        PlacedText {
            text,
            x: m[4],
            y: m[5],
            font_size: self.rendered_size(),
        }
    }

    /// Advance along the baseline by `chars` average glyph widths
    fn advance(&mut self, chars: f32) {
        self.text_matrix[4] += chars * self.font_size * CHAR_WIDTH_EM * self.text_matrix[0];
    }
}

/// Collect the strings shown on a page with their positions
pub fn page_items(doc: &Document, page_id: ObjectId) -> Result<Vec<PlacedText>, TableError> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content_data = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_data)?;

    let mut items = Vec::new();
    let mut state = TextState::new();
    let mut ctm_stack: Vec<[f32; 6]> = Vec::new();

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    state.ctm = saved;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    state.ctm = multiply_matrices(&m, &state.ctm);
                }
            }
            "BT" => {
                state.text_matrix = TextState::IDENTITY;
                state.line_matrix = TextState::IDENTITY;
            }
            "Tf" => {
                if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                    state.font = name.to_vec();
                }
                if let Some(size) = operands.get(1).and_then(get_number) {
                    state.font_size = size;
                }
            }
            "TL" => state.leading = operands.first().and_then(get_number),
            "Td" | "TD" => {
                let tx = operands.first().and_then(get_number).unwrap_or(0.0);
                let ty = operands.get(1).and_then(get_number).unwrap_or(0.0);
                if op.operator == "TD" {
                    state.leading = Some(-ty);
                }
                state.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "T*" => state.next_line(),
            "Tj" | "'" | "\"" => {
                if op.operator != "Tj" {
                    state.next_line();
                }
                // `"` carries word and char spacing before the string
                if let Some(text) = operands
                    .last()
                    .and_then(|o| decode_operand(o, doc, &fonts, &state.font))
                {
                    show_text(&mut state, text, &mut items);
                }
            }
            "TJ" => {
                if let Some(Ok(array)) = operands.first().map(|o| o.as_array()) {
                    let text = decode_tj_array(array, doc, &fonts, &state.font);
                    show_text(&mut state, text, &mut items);
                }
            }
            _ => {}
        }
    }

    Ok(items)
}

fn show_text(state: &mut TextState, text: String, items: &mut Vec<PlacedText>) {
    let chars = text.chars().count() as f32;
    if !text.trim().is_empty() {
        items.push(state.place(text));
    }
    state.advance(chars);
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn matrix_operand(operands: &[Object]) -> Option<[f32; 6]> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0f32; 6];
    for (slot, operand) in m.iter_mut().zip(operands) {
        *slot = get_number(operand)?;
    }
    Some(m)
}

/// Decode a TJ array; large negative kerning becomes spaces
fn decode_tj_array(
    array: &[Object],
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font: &[u8],
) -> String {
    let mut text = String::new();
    for item in array {
        if let Some(decoded) = decode_operand(item, doc, fonts, font) {
            text.push_str(&decoded);
        } else if let Some(adjust) = get_number(item) {
            // Adjustments are in thousandths of an em, negative moves right
            let spaces = (-adjust / 1000.0 / CHAR_WIDTH_EM).round();
            if spaces >= 1.0 {
                text.extend(std::iter::repeat(' ').take(spaces as usize));
            }
        }
    }
    text
}

/// Decode a string operand with the current font's encoding
fn decode_operand(
    obj: &Object,
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font: &[u8],
) -> Option<String> {
    let Object::String(bytes, _) = obj else {
        return None;
    };

    if let Some(font_dict) = fonts.get(font) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return Some(text);
            }
        }
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return Some(String::from_utf16_lossy(&utf16));
    }

    // Latin-1
    Some(bytes.iter().map(|&b| b as char).collect())
}

/// Group placed strings into text lines, top of page first.
///
/// Strings on one baseline are ordered by x and padded to the character
/// column their x position maps to, so horizontal gaps become spaces.
pub fn layout_lines(mut items: Vec<PlacedText>) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }

    // Stable sort keeps stream order for strings on the same baseline
    items.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));

    let mut rows: Vec<Vec<PlacedText>> = Vec::new();
    for item in items {
        let tolerance = item.font_size.max(1.0) * BASELINE_TOLERANCE_EM;
        match rows.last_mut() {
            Some(row) if (row[0].y - item.y).abs() <= tolerance => row.push(item),
            _ => rows.push(vec![item]),
        }
    }

    let origin = rows
        .iter()
        .flatten()
        .map(|i| i.x)
        .fold(f32::INFINITY, f32::min);

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            render_row(&row, origin)
        })
        .collect()
}

fn render_row(row: &[PlacedText], origin: f32) -> String {
    let mut line = String::new();
    let mut width = 0usize;
    for item in row {
        let char_width = (item.font_size * CHAR_WIDTH_EM).max(0.1);
        let column = ((item.x - origin) / char_width).round().max(0.0) as usize;
        if column > width {
            line.extend(std::iter::repeat(' ').take(column - width));
            width = column;
        } else if width > 0 && !line.ends_with(char::is_whitespace) {
            line.push(' ');
            width += 1;
        }
        line.push_str(&item.text);
        width += item.text.chars().count();
    }
    line
}

/// Split layout text into pages on form feeds, then into lines
pub fn pages_from_layout_text(text: &str) -> Vec<Vec<String>> {
    if text.is_empty() {
        return Vec::new();
    }
    let body = text.strip_suffix(FORM_FEED).unwrap_or(text);
    body.split(FORM_FEED).map(split_lines).collect()
}

/// Read pages from a file: `.pdf` is parsed as PDF, anything else as layout text
pub fn pages_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>, TableError> {
    let path = path.as_ref();
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        pages_from_pdf(path)
    } else {
        let text = std::fs::read_to_string(path)?;
        Ok(pages_from_layout_text(&text))
    }
}

/// Split on newlines, dropping carriage returns
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, x: f32, y: f32) -> PlacedText {
        PlacedText {
            text: text.into(),
            x,
            y,
            font_size: 10.0,
        }
    }

    #[test]
    fn test_layout_text_pages() {
        let text = "a   b\nc   d\x0cpage two\n\x0c";
        let pages = pages_from_layout_text(text);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], vec!["a   b", "c   d"]);
        assert_eq!(pages[1], vec!["page two"]);
    }

    #[test]
    fn test_empty_page_kept() {
        let pages = pages_from_layout_text("one\x0c\x0cthree");
        assert_eq!(pages.len(), 3);
        assert!(pages[1].is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(pages_from_layout_text("").is_empty());
    }

    #[test]
    fn test_crlf_stripped() {
        let pages = pages_from_layout_text("x   1\r\ny   2\r\n");
        assert_eq!(pages[0], vec!["x   1", "y   2"]);
    }

    #[test]
    fn test_spacing_preserved() {
        let pages = pages_from_layout_text("   indented     gap   ");
        assert_eq!(pages[0][0], "   indented     gap   ");
    }

    #[test]
    fn test_invalid_pdf_mem() {
        assert!(pages_from_pdf_mem(b"not a pdf").is_err());
    }

    #[test]
    fn test_layout_lines_top_down() {
        let lines = layout_lines(vec![
            item("second", 50.0, 680.0),
            item("first", 50.0, 700.0),
        ]);
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_layout_lines_columns_from_x() {
        // 10pt font: one character column is 6pt wide
        let lines = layout_lines(vec![
            item("Name", 50.0, 700.0),
            item("Age", 98.0, 700.0),
            item("Alice", 50.0, 688.0),
            item("30", 98.0, 688.5),
        ]);
        assert_eq!(lines, vec!["Name    Age", "Alice   30"]);
    }

    #[test]
    fn test_layout_lines_overlap_keeps_separator() {
        let lines = layout_lines(vec![item("abcdef", 0.0, 10.0), item("xyz", 12.0, 10.0)]);
        assert_eq!(lines, vec!["abcdef xyz"]);
    }

    #[test]
    fn test_layout_lines_empty() {
        assert!(layout_lines(Vec::new()).is_empty());
    }

    #[test]
    fn test_text_state_moves() {
        let mut state = TextState::new();
        state.font_size = 10.0;
        state.move_line(50.0, 700.0);
        state.leading = Some(14.0);
        state.next_line();
        let placed = state.place("x".into());
        assert_eq!((placed.x, placed.y), (50.0, 686.0));
        assert_eq!(placed.font_size, 10.0);
    }

    #[test]
    fn test_tj_kerning_becomes_spaces() {
        let doc = Document::with_version("1.5");
        let fonts = BTreeMap::new();
        let array = vec![
            Object::string_literal("Name"),
            Object::Integer(-1800),
            Object::string_literal("Age"),
            Object::Integer(-50),
            Object::string_literal("!"),
        ];
        assert_eq!(decode_tj_array(&array, &doc, &fonts, b"F1"), "Name   Age!");
    }
}
