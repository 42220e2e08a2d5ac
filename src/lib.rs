//! Structure recovery for free-form multiple-choice explanations.
//!
//! An explanation string is routed by [`select_mode`]. Text with at least one
//! `**` pair is classified line by line ([`classify`]); anything else is
//! scanned for section headers ([`extract`]). Both produce a [`Document`] that
//! serializes to HTML ([`format`]) or to Typst and PDF.

mod block;
mod classifier;
mod config;
mod error;
mod extractor;
mod html;
mod inline;
mod typst;

pub use block::{Block, BulletStyle, Document, List, ListItem, Span, plain_text};
pub use classifier::{Classifier, LineKind, StateFlags, classify};
pub use config::{Config, HtmlConfig, PlaceholderConfig, TypstConfig};
pub use error::{ExplainError, Result};
pub use extractor::{
    Section, SectionKind, extract, normalize, presentation_fragments, split_choices,
    split_evidence, split_sections,
};
pub use html::to_html;
pub use inline::{emphasize_line, has_marker_pair, rewrite_emphasis, trailing_colon};
pub use typst::to_typst;

use tracing::{debug, instrument};
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Which recovery pass an explanation goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// At least one `**` pair: line classification.
    MarkedUp,
    /// No marker pairs: section extraction.
    Unmarked,
}

pub fn select_mode(raw: &str) -> Mode {
    if has_marker_pair(raw) {
        Mode::MarkedUp
    } else {
        Mode::Unmarked
    }
}

/// Recover the document tree. Blank input gives an empty document.
#[instrument(level = "debug", skip_all, fields(len = raw.len()))]
pub fn parse(raw: &str) -> Document {
    if raw.trim().is_empty() {
        return Document::default();
    }

    let mode = select_mode(raw);
    let doc = match mode {
        Mode::MarkedUp => Document {
            title: None,
            blocks: classify(raw),
        },
        Mode::Unmarked => extract(raw),
    };
    debug!(?mode, blocks = doc.blocks.len(), "parsed explanation");
    doc
}

/// Format an explanation as HTML using the bundled config.
pub fn format(raw: &str) -> String {
    format_with_config(raw, &Config::compiled_default())
}

/// Format an explanation as HTML.
///
/// Blank input yields the configured placeholder text and no markup.
pub fn format_with_config(raw: &str, config: &Config) -> String {
    if raw.trim().is_empty() {
        return config.placeholder.text.clone();
    }
    to_html(&parse(raw), config)
}

/// Convert an explanation to Typst markup using the bundled config.
pub fn explanation_to_typst(raw: &str) -> String {
    explanation_to_typst_with_config(raw, &Config::compiled_default())
}

pub fn explanation_to_typst_with_config(raw: &str, config: &Config) -> String {
    if raw.trim().is_empty() {
        let placeholder = Document {
            title: None,
            blocks: vec![Block::Paragraph {
                content: vec![Span::Text(config.placeholder.text.clone())],
            }],
        };
        return to_typst(&placeholder, config);
    }
    to_typst(&parse(raw), config)
}

/// Convert an explanation to PDF bytes using the bundled config.
pub fn explanation_to_pdf(raw: &str) -> Result<Vec<u8>> {
    explanation_to_pdf_with_config(raw, &Config::compiled_default())
}

pub fn explanation_to_pdf_with_config(raw: &str, config: &Config) -> Result<Vec<u8>> {
    use typst_library::layout::PagedDocument;

    let typst_content = explanation_to_typst_with_config(raw, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| ExplainError::Typst(format!("{:?}", e)))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| ExplainError::Pdf(format!("{:?}", e)))
}
