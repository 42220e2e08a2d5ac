//! Inline emphasis handling shared by both structure recovery passes.
//!
//! Two conventions mark emphasis in explanation text: a `**` pair around a
//! run, and a heading-like run that ends in a colon.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Span, plain_text};

/// A `**` pair on a single line. Pairs never span a line break.
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\n]*?)\*\*").expect("valid regex"));

/// True when `text` holds at least one complete marker pair.
pub fn has_marker_pair(text: &str) -> bool {
    EMPHASIS_RE.is_match(text)
}

/// Rewrite every marker pair inside plain runs into a bold run.
///
/// Bold runs pass through untouched and an unmatched marker stays literal,
/// so rewriting already-rewritten spans is a no-op.
pub fn rewrite_emphasis(spans: Vec<Span>) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            Span::Text(text) => split_marker_pairs(&text, &mut out),
            bold @ Span::Bold(_) => out.push(bold),
        }
    }
    out
}

/// Rewrite a single raw line.
pub fn emphasize_line(line: &str) -> Vec<Span> {
    rewrite_emphasis(vec![Span::Text(line.to_string())])
}

fn split_marker_pairs(text: &str, out: &mut Vec<Span>) {
    let mut last = 0;
    for caps in EMPHASIS_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Span::Text(text[last..whole.start()].to_string()));
        }
        out.push(Span::Bold(inner.as_str().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Span::Text(text[last..].to_string()));
    }
}

/// Emphasize the whole run when its text ends with a colon.
pub fn trailing_colon(spans: Vec<Span>) -> Vec<Span> {
    let text = plain_text(&spans);
    if text.trim_end().ends_with(':') {
        vec![Span::Bold(text)]
    } else {
        spans
    }
}

/// Drop the first `len` bytes of the flattened span text.
///
/// `len` must fall on a char boundary of the flattened text; callers pass the
/// length of an ASCII prefix they matched.
pub(crate) fn drop_prefix(spans: &[Span], mut len: usize) -> Vec<Span> {
    let mut out = Vec::new();
    for span in spans {
        let text = span.text();
        if len >= text.len() {
            len -= text.len();
            continue;
        }
        let rest = text.get(len..).unwrap_or_default().to_string();
        len = 0;
        out.push(match span {
            Span::Text(_) => Span::Text(rest),
            Span::Bold(_) => Span::Bold(rest),
        });
    }
    out
}
