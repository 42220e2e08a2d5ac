use crate::block::{Block, BulletStyle, Document, List, Span};
use crate::config::{Config, TypstConfig};

/// Convert a document to Typst markup
pub fn to_typst(doc: &Document, config: &Config) -> String {
    let typst = &config.typst;
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");

    if let Some(title) = &doc.title {
        for _ in 0..typst.title_level {
            out.push('=');
        }
        out.push(' ');
        escape_start_into(title, &mut out);
        out.push_str("\n\n");
    }

    for block in &doc.blocks {
        emit_block(block, typst, &mut out);
    }

    out
}

fn emit_block(block: &Block, typst: &TypstConfig, out: &mut String) {
    match block {
        Block::Paragraph { content } => {
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Answer { content } => {
            out.push_str(&format!(
                "#block(fill: {}, inset: 8pt, radius: 4pt)[",
                typst.answer_fill
            ));
            spans_to_typst(content, out);
            out.push_str("]\n\n");
        }
        Block::List(list) => {
            // Keep small lists on one page, let long ones break
            if count_list_items(list) <= typst.keep_together_max_items {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(list, typst, out);
                out.push_str("\n]\n\n");
            } else {
                list_to_typst(list, typst, out);
                out.push_str("\n\n");
            }
        }
    }
}

fn count_list_items(list: &List) -> usize {
    let mut count = list.items.len();
    for item in &list.items {
        if let Some(ref nested) = item.nested {
            count += count_list_items(nested);
        }
    }
    count
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for (i, span) in spans.iter().enumerate() {
        match span {
            Span::Text(text) if i == 0 => escape_start_into(text, out),
            Span::Text(text) => escape_into(text, out),
            Span::Bold(text) => {
                // Typst rejects empty strong markup
                if text.trim().is_empty() {
                    escape_into(text, out);
                } else {
                    out.push('*');
                    escape_into(text, out);
                    out.push('*');
                }
            }
        }
    }
}

/// Escape characters with markup meaning in Typst
fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-' | '+'
            | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Like `escape_into`, but also escapes a leading `1.` that Typst would
/// otherwise read as a numbered list item.
fn escape_start_into(text: &str, out: &mut String) {
    let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    match text[digits..].strip_prefix('.') {
        Some(rest) if digits > 0 => {
            out.push_str(&text[..digits]);
            out.push_str("\\.");
            escape_into(rest, out);
        }
        _ => escape_into(text, out),
    }
}

/// Lists are written in call form so each level can carry its own marker.
fn list_to_typst(list: &List, typst: &TypstConfig, out: &mut String) {
    out.push_str("#list(");
    if list.style == BulletStyle::Square {
        out.push_str("marker: [");
        escape_into(&typst.square_marker, out);
        out.push_str("], ");
    }

    for (i, item) in list.items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('[');
        spans_to_typst(&item.content, out);
        if let Some(ref nested) = item.nested {
            out.push(' ');
            list_to_typst(nested, typst, out);
        }
        out.push(']');
    }

    out.push(')');
}
