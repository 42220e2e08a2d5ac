use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{Block, BulletStyle, Document, List, Span};
use crate::config::{Config, HtmlConfig};

/// Convert a document to HTML
pub fn to_html(doc: &Document, config: &Config) -> String {
    let html = &config.html;
    let mut out = String::new();

    let wrapped = !html.wrapper_class.is_empty();
    if wrapped {
        out.push_str("<div class=\"");
        out.push_str(&encode_double_quoted_attribute(&html.wrapper_class));
        out.push_str("\">\n");
    }

    if let Some(title) = &doc.title {
        out.push_str(&format!(
            "<{tag}>{}</{tag}>\n",
            encode_text(title),
            tag = html.title_tag
        ));
    }

    for block in &doc.blocks {
        emit_block(block, html, &mut out);
    }

    if wrapped {
        out.push_str("</div>\n");
    }
    out
}

fn emit_block(block: &Block, html: &HtmlConfig, out: &mut String) {
    match block {
        Block::Paragraph { content } => {
            out.push_str("<p>");
            spans_to_html(content, out);
            out.push_str("</p>\n");
        }
        Block::Answer { content } => {
            out.push_str("<p class=\"");
            out.push_str(&encode_double_quoted_attribute(&html.answer_class));
            out.push_str("\">");
            spans_to_html(content, out);
            out.push_str("</p>\n");
        }
        Block::List(list) => list_to_html(list, html, out),
    }
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(&encode_text(text)),
            Span::Bold(text) => {
                out.push_str("<strong>");
                out.push_str(&encode_text(text));
                out.push_str("</strong>");
            }
        }
    }
}

fn list_to_html(list: &List, html: &HtmlConfig, out: &mut String) {
    match list.style {
        BulletStyle::Disc | BulletStyle::Lettered => out.push_str("<ul>\n"),
        BulletStyle::Square => {
            out.push_str("<ul style=\"");
            out.push_str(&encode_double_quoted_attribute(&html.square_style));
            out.push_str("\">\n");
        }
    }

    for item in &list.items {
        out.push_str("<li>");
        spans_to_html(&item.content, out);
        if let Some(ref nested) = item.nested {
            out.push('\n');
            list_to_html(nested, html, out);
        }
        out.push_str("</li>\n");
    }

    out.push_str("</ul>\n");
}
