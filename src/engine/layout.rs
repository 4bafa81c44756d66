//! Text-region computation from page content streams.
//!
//! Interprets the text-positioning subset of a page's content stream,
//! collects shown text into positioned spans, and groups spans into lines
//! and lines into blocks with approximate bounding boxes. Output geometry
//! uses a top-left page origin (top < bottom for upright text).

use lopdf::{content::Content, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

use super::lopdf_engine::{get_number, pdf_string};
use super::{RawBlock, RawBlockKind, Rect};

/// A text span with position information.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    /// X position (left edge).
    x: f64,
    /// Y position (baseline).
    y: f64,
    /// Estimated advance width.
    width: f64,
    /// Font size in points.
    font_size: f64,
}

impl TextSpan {
    fn new(text: String, x: f64, y: f64, font_size: f64) -> Self {
        // Width estimate: no glyph metrics here, assume half an em per char.
        let width = text.chars().count() as f64 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }
}

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
struct TextLine {
    spans: Vec<TextSpan>,
    /// Y position (baseline).
    y: f64,
    /// Leftmost X position.
    x: f64,
    /// Dominant font size in this line.
    font_size: f64,
}

impl TextLine {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted: f64 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f64)
            .sum();
        let font_size = if total_chars > 0 {
            weighted / total_chars as f64
        } else {
            spans.first().map(|s| s.font_size).unwrap_or(12.0)
        };

        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Combined text of all spans, inserting spaces across X gaps.
    fn text(&self) -> String {
        if self.spans.len() == 1 {
            return self.spans[0].text.clone();
        }

        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev = &self.spans[i - 1];
            let gap = span.x - (prev.x + prev.width);

            let char_count = prev.text.chars().count();
            let avg_char_width = if char_count > 0 && prev.width > 0.0 {
                prev.width / char_count as f64
            } else {
                prev.font_size * 0.5
            };

            let prev_last = prev.text.chars().last();
            let curr_first = span.text.chars().next();
            let both_spaceless = prev_last.map(is_spaceless_script_char).unwrap_or(false)
                && curr_first.map(is_spaceless_script_char).unwrap_or(false);

            let has_space = prev.text.ends_with(' ') || span.text.starts_with(' ');

            if gap > avg_char_width * 0.2 && !both_spaceless && !has_space {
                result.push(' ');
            }
            result.push_str(&span.text);
        }

        result
    }

    fn right(&self) -> f64 {
        self.spans
            .iter()
            .map(|s| s.x + s.width)
            .fold(f64::MIN, f64::max)
    }
}

/// Text matrix for tracking position in the content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
    leading: f64,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, m: [f64; 6]) {
        self.a = m[0];
        self.b = m[1];
        self.c = m[2];
        self.d = m[3];
        self.e = m[4];
        self.f = m[5];
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f64, f64) {
        (self.e, self.f)
    }

    fn scale(&self) -> f64 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Compute a page's text regions in engine reading order.
pub(crate) fn extract_blocks(
    doc: &LopdfDocument,
    page_id: ObjectId,
    bounds: Rect,
) -> Result<Vec<RawBlock>> {
    let content = page_content(doc, page_id)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let content = Content::decode(&content)
        .map_err(|e| Error::BlockExtract(format!("invalid content stream: {}", e)))?;

    let spans = collect_spans(&content);
    let lines = group_spans_into_lines(spans);
    let blocks = group_lines_into_blocks(lines);

    Ok(blocks
        .into_iter()
        .enumerate()
        .map(|(index, lines)| block_from_lines(lines, index, bounds))
        .collect())
}

/// Get the page's (decompressed, concatenated) content stream bytes.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::BlockExtract(format!("unreadable page dictionary: {}", e)))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        // A page without /Contents is empty, not malformed
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s
                    .decompressed_content()
                    .map_err(|e| Error::BlockExtract(format!("invalid content stream: {}", e)));
            }
            Err(Error::BlockExtract("invalid content stream".to_string()))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        Object::Stream(s) => s
            .decompressed_content()
            .map_err(|e| Error::BlockExtract(format!("invalid content stream: {}", e))),
        _ => Err(Error::BlockExtract("invalid content stream".to_string())),
    }
}

/// Walk the operations, collecting positioned text spans.
fn collect_spans(content: &Content) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut font_size: f64 = 12.0;
    let mut tm = TextMatrix::default();
    let mut in_text = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                tm = TextMatrix::default();
            }
            "ET" => {
                in_text = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(tl) = op.operands.first().and_then(get_number) {
                    tm.leading = tl;
                }
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    tm.translate(tx, ty);
                }
            }
            "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    tm.leading = -ty;
                    tm.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let mut m = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                    for (slot, operand) in m.iter_mut().zip(&op.operands) {
                        if let Some(n) = get_number(operand) {
                            *slot = n;
                        }
                    }
                    tm.set(m);
                }
            }
            "T*" => {
                tm.next_line();
            }
            "Tj" | "TJ" => {
                if in_text {
                    let text = if op.operator == "TJ" {
                        decode_tj_array(op.operands.first())
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        pdf_string(bytes)
                    } else {
                        String::new()
                    };
                    push_span(&mut spans, text, &tm, font_size);
                }
            }
            "'" | "\"" => {
                tm.next_line();
                if in_text {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = pdf_string(bytes);
                        push_span(&mut spans, text, &tm, font_size);
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

fn push_span(spans: &mut Vec<TextSpan>, text: String, tm: &TextMatrix, font_size: f64) {
    if text.trim().is_empty() {
        return;
    }
    let (x, y) = tm.position();
    let effective_size = font_size * tm.scale();
    spans.push(TextSpan::new(text, x, y, effective_size));
}

/// Decode a TJ operand array: strings interleaved with kerning adjustments.
///
/// Adjustments beyond 200/1000 em are treated as word spaces.
fn decode_tj_array(operand: Option<&Object>) -> String {
    let Some(Object::Array(arr)) = operand else {
        return String::new();
    };

    let mut combined = String::new();
    let space_threshold = 200.0;

    for item in arr {
        match item {
            Object::String(bytes, _) => combined.push_str(&pdf_string(bytes)),
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = -get_number(item).unwrap_or(0.0);
                if adjustment > space_threshold
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                {
                    if let Some(last) = combined.chars().last() {
                        if !is_spaceless_script_char(last) {
                            combined.push(' ');
                        }
                    }
                }
            }
            _ => {}
        }
    }

    combined
}

/// Y-based line grouping: sort top-down, merge spans within a baseline
/// tolerance of 30% of the font size.
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f64> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;

        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks on vertical spacing and font size changes.
fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    if lines.is_empty() {
        return Vec::new();
    }

    let avg_spacing = average_line_spacing(&lines);

    let mut blocks: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            let spacing = (prev.y - line.y).abs();
            let font_jump = (prev.font_size - line.font_size).abs() > 1.0;
            if spacing > avg_spacing * 1.5 || font_jump {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn average_line_spacing(lines: &[TextLine]) -> f64 {
    let spacings: Vec<f64> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f64>() / spacings.len() as f64
}

/// Build the reported block: joined line text and an approximate bounding
/// box converted to a top-left page origin.
fn block_from_lines(lines: Vec<TextLine>, index: usize, bounds: Rect) -> RawBlock {
    let left = lines.iter().map(|l| l.x).fold(f64::MAX, f64::min);
    let right = lines.iter().map(TextLine::right).fold(f64::MIN, f64::max);

    // Approximate ascenders/descenders from the font size
    let ascent = lines
        .iter()
        .map(|l| l.y + l.font_size * 0.8)
        .fold(f64::MIN, f64::max);
    let descent = lines
        .iter()
        .map(|l| l.y - l.font_size * 0.2)
        .fold(f64::MAX, f64::min);

    let text = lines
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n");

    RawBlock {
        left: left - bounds.x0,
        top: bounds.y1 - ascent,
        right: right - bounds.x0,
        bottom: bounds.y1 - descent,
        text,
        index,
        kind: RawBlockKind::Text,
    }
}

/// Check if a character is from a script that does not use word spaces
/// (CJK ideographs, kana, CJK punctuation).
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}
