//! Paged rendering boundary.
//!
//! Converts composed markdown into a paginated document model: lines wrapped
//! greedily at word boundaries, `**` emphasis markers parsed into per-line
//! bold spans and stripped from the text. Extracted text is identical to the
//! composed text modulo emphasis markers and wrap points, which is what an
//! ATS parser sees. Byte-level encoding of the final artifact lives outside
//! this crate; this model is what an encoder consumes.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Page shape in character cells.
///
/// Defaults match a US-letter page at 11pt with 1" margins: roughly 82
/// average-width characters per line and 45 usable line slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetrics {
    pub chars_per_line: usize,
    pub lines_per_page: usize,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            chars_per_line: 82,
            lines_per_page: 45,
        }
    }
}

/// Byte range of the bolded text within a rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoldSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedLine {
    pub text: String,
    pub bold: Option<BoldSpan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub lines: Vec<RenderedLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub pages: Vec<RenderedPage>,
}

impl RenderedDocument {
    /// Reconstructs the document as plain text: one string, wrap points as
    /// newlines, emphasis dropped. This is the "copy-paste" view an ATS
    /// extractor produces.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            for line in &page.lines {
                out.push_str(&line.text);
                out.push('\n');
            }
        }
        out
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|page| page.lines.len()).sum()
    }
}

/// Splits one composed line into its plain text and the bold span marked by
/// the first `**...**` pair, if any. Lines without a complete pair pass
/// through untouched.
pub fn strip_emphasis(line: &str) -> (String, Option<BoldSpan>) {
    let Some(open) = line.find("**") else {
        return (line.to_string(), None);
    };
    let after = &line[open + 2..];
    let Some(close) = after.find("**") else {
        return (line.to_string(), None);
    };
    let mut plain = String::with_capacity(line.len());
    plain.push_str(&line[..open]);
    let start = plain.len();
    plain.push_str(&after[..close]);
    let end = plain.len();
    plain.push_str(&after[close + 2..]);
    (plain, Some(BoldSpan { start, end }))
}

/// Paginates composed text into the rendered document model.
pub fn paginate(text: &str, metrics: &PageMetrics) -> RenderedDocument {
    let mut lines: Vec<RenderedLine> = Vec::new();
    for source in text.lines() {
        let (plain, bold) = strip_emphasis(source);
        for row in wrap_line(&plain, metrics.chars_per_line) {
            let row_bold = bold.as_ref().and_then(|span| {
                let start = span.start.max(row.start);
                let end = span.end.min(row.end);
                (start < end).then(|| BoldSpan {
                    start: start - row.start,
                    end: end - row.start,
                })
            });
            lines.push(RenderedLine {
                text: plain[row.clone()].to_string(),
                bold: row_bold,
            });
        }
    }

    let mut pages: Vec<RenderedPage> = Vec::new();
    let mut current: Vec<RenderedLine> = Vec::new();
    for line in lines {
        if current.len() == metrics.lines_per_page {
            pages.push(RenderedPage {
                lines: std::mem::take(&mut current),
            });
        }
        current.push(line);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(RenderedPage { lines: current });
    }
    RenderedDocument { pages }
}

/// Greedy word wrap. Returns byte ranges of `plain` forming the wrapped rows.
///
/// Words never split: a word longer than `width` gets a row of its own. An
/// empty line yields one empty row so vertical spacing survives pagination.
fn wrap_line(plain: &str, width: usize) -> Vec<Range<usize>> {
    let mut words: Vec<Range<usize>> = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in plain.char_indices() {
        if c == ' ' {
            if let Some(s) = start.take() {
                words.push(s..i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push(s..plain.len());
    }
    if words.is_empty() {
        return vec![0..0];
    }

    let mut rows: Vec<Range<usize>> = Vec::new();
    let mut row: Option<Range<usize>> = None;
    for word in words {
        row = Some(match row.take() {
            None => word,
            Some(current) => {
                if word.end - current.start <= width {
                    current.start..word.end
                } else {
                    rows.push(current);
                    word
                }
            }
        });
    }
    if let Some(current) = row {
        rows.push(current);
    }
    rows
}
