use unicode_width::UnicodeWidthChar;

/// Terminal columns taken by `text`; control characters count as zero.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Widest physical line of `text`; hard line breaks split the measurement.
pub fn max_line_width(text: &str) -> usize {
    text.split('\n').map(display_width).max().unwrap_or(0)
}

/// Cut `text` to at most `width` display columns.
pub fn truncate(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = char_width(ch);
        if used + w > width {
            return &text[..idx];
        }
        used += w;
    }
    text
}

/// Word-wrap `text` into lines of at most `width` columns.
///
/// Hard line breaks are honoured first and each resulting unit is wrapped on
/// its own; an empty unit produces one empty line. Whitespace counts against
/// the width like any other character: a run that does not fit continues on
/// the next line, so joining the lines of a unit gives the unit back
/// unchanged. A word longer than `width` is split across lines rather than
/// overflowing.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for unit in text.split('\n') {
        wrap_unit(unit, width, &mut lines);
    }
    lines
}

/// Split a unit into (content, trailing whitespace) pieces. Leading
/// whitespace becomes the content of the first piece so indentation is kept.
fn pieces(unit: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut rest = unit;
    if let Some(first_non_ws) = rest.find(|c: char| !c.is_whitespace()) {
        if first_non_ws > 0 {
            out.push((&rest[..first_non_ws], ""));
            rest = &rest[first_non_ws..];
        }
    } else if !rest.is_empty() {
        out.push((rest, ""));
        return out;
    }
    while !rest.is_empty() {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let ws_end = rest[word_end..]
            .find(|c: char| !c.is_whitespace())
            .map(|i| word_end + i)
            .unwrap_or(rest.len());
        out.push((&rest[..word_end], &rest[word_end..ws_end]));
        rest = &rest[ws_end..];
    }
    out
}

/// The line being filled and its display width.
#[derive(Default)]
struct OpenLine {
    text: String,
    width: usize,
}

impl OpenLine {
    fn finish(&mut self, lines: &mut Vec<String>) {
        lines.push(std::mem::take(&mut self.text));
        self.width = 0;
    }

    /// Append `chunk` one character at a time, starting a new line whenever
    /// the next character would pass `width`.
    fn push_breaking(&mut self, chunk: &str, width: usize, lines: &mut Vec<String>) {
        for ch in chunk.chars() {
            let w = char_width(ch);
            if !self.text.is_empty() && self.width + w > width {
                self.finish(lines);
            }
            self.text.push(ch);
            self.width += w;
        }
    }
}

fn wrap_unit(unit: &str, width: usize, lines: &mut Vec<String>) {
    let pieces = pieces(unit);
    if pieces.is_empty() {
        lines.push(String::new());
        return;
    }

    let mut line = OpenLine::default();
    for (content, ws) in pieces {
        // A word that fits on a fresh line is never split.
        if !line.text.is_empty() && line.width + display_width(content) > width {
            line.finish(lines);
        }
        line.push_breaking(content, width, lines);
        line.push_breaking(ws, width, lines);
    }
    line.finish(lines);
}
