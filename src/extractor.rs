//! Outline recovery for explanations written as one run-on paragraph with no
//! emphasis markers.
//!
//! The text is scanned for three fixed section headers. Each section body is
//! then split by its own convention: capitalized `Label:` chunks for the
//! supporting evidence, lettered choices for the incorrect answers.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::block::{Block, BulletStyle, Document, List, ListItem, Span};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\. ").expect("valid regex"));

/// A run of capitalized words ending in a colon, e.g. "Physical Exam:".
static EVIDENCE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)([A-Z][\w'/-]*(?:\s[A-Z][\w'/-]*)*):").expect("valid regex")
});

static CHOICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)([A-E])\.\s").expect("valid regex"));

static WHY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Why it['’]s incorrect:").expect("valid regex"));

static CLASSIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Classic Presentation:").expect("valid regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)[•*-]\s+").expect("valid regex"));

static FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)[•*-]\s+|\.(?:\s+|$)").expect("valid regex"));

/// The three topical divisions, in the wording authors use for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    PrimaryDiagnosis,
    KeySupportingEvidence,
    IncorrectAnswerExplanations,
}

impl SectionKind {
    const ALL: [SectionKind; 3] = [
        SectionKind::PrimaryDiagnosis,
        SectionKind::KeySupportingEvidence,
        SectionKind::IncorrectAnswerExplanations,
    ];

    /// Header token as it appears in the text.
    pub fn header(self) -> &'static str {
        match self {
            SectionKind::PrimaryDiagnosis => "Primary Diagnosis:",
            SectionKind::KeySupportingEvidence => "Key Supporting Evidence:",
            SectionKind::IncorrectAnswerExplanations => "Incorrect Answer Explanations",
        }
    }

    /// Label used on the outline item.
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::PrimaryDiagnosis => "Primary Diagnosis",
            SectionKind::KeySupportingEvidence => "Key Supporting Evidence",
            SectionKind::IncorrectAnswerExplanations => "Incorrect Answer Explanations",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub raw_body: String,
}

/// Recover a titled outline from unmarked explanation text.
pub fn extract(text: &str) -> Document {
    let text = normalize(text);
    if text.is_empty() {
        return Document::default();
    }

    let (lead, sections) = split_sections(&text);
    let lead = lead.trim();
    let title = TITLE_RE.is_match(lead).then(|| lead.to_string());
    debug!(
        has_title = title.is_some(),
        sections = sections.len(),
        "extracted sections"
    );

    if title.is_none() && sections.is_empty() {
        // Nothing recognizable: keep the text rather than lose it.
        return Document {
            title: None,
            blocks: vec![Block::Paragraph {
                content: vec![Span::Text(text)],
            }],
        };
    }

    let items: Vec<ListItem> = sections.iter().map(expand_section).collect();
    let blocks = if items.is_empty() {
        Vec::new()
    } else {
        vec![Block::List(List::new(BulletStyle::Disc, items))]
    };
    Document { title, blocks }
}

/// Collapse every whitespace run to a single space and trim.
pub fn normalize(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Split normalized text into the text before the first header and the
/// sections that follow it, in order.
pub fn split_sections(text: &str) -> (&str, Vec<Section>) {
    let mut sections = Vec::new();
    let Some(mut current) = next_header(text, 0) else {
        return (text, sections);
    };
    let lead = &text[..current.start];

    loop {
        let next = next_header(text, current.end);
        let body_end = next.as_ref().map_or(text.len(), |h| h.start);
        let raw_body = text[current.end..body_end]
            .trim()
            .trim_start_matches(':')
            .trim_start()
            .to_string();
        trace!(kind = ?current.kind, body_len = raw_body.len(), "section");
        sections.push(Section {
            kind: current.kind,
            raw_body,
        });
        match next {
            Some(header) => current = header,
            None => break,
        }
    }

    (lead, sections)
}

struct HeaderMatch {
    kind: SectionKind,
    start: usize,
    end: usize,
}

/// Earliest header token at or after `from`.
fn next_header(text: &str, from: usize) -> Option<HeaderMatch> {
    let rest = &text[from..];
    SectionKind::ALL
        .into_iter()
        .filter_map(|kind| {
            rest.find(kind.header()).map(|pos| HeaderMatch {
                kind,
                start: from + pos,
                end: from + pos + kind.header().len(),
            })
        })
        .min_by_key(|header| header.start)
}

fn expand_section(section: &Section) -> ListItem {
    let body = section.raw_body.as_str();
    match section.kind {
        SectionKind::PrimaryDiagnosis => labeled_item(section.kind.label(), body),
        SectionKind::KeySupportingEvidence => {
            let (lead, items) = split_evidence(body);
            parent_item(section.kind.label(), lead, BulletStyle::Square, items)
        }
        SectionKind::IncorrectAnswerExplanations => {
            let (lead, items) = split_choices(body);
            parent_item(section.kind.label(), lead, BulletStyle::Lettered, items)
        }
    }
}

/// Split a supporting-evidence body into one item per `Label:` chunk.
///
/// Text before the first label is returned separately.
pub fn split_evidence(body: &str) -> (&str, Vec<ListItem>) {
    let labels: Vec<(usize, usize, &str)> = EVIDENCE_LABEL_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?;
            Some((label.start(), whole.end(), label.as_str()))
        })
        .collect();

    let lead_end = labels.first().map_or(body.len(), |(start, _, _)| *start);
    let items = labels
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start, label))| {
            let body_end = labels.get(i + 1).map_or(body.len(), |(start, _, _)| *start);
            evidence_item(label, body[body_start..body_end].trim())
        })
        .collect();

    (body[..lead_end].trim(), items)
}

fn evidence_item(label: &str, chunk: &str) -> ListItem {
    let mut pieces = BULLET_RE.split(chunk).map(str::trim);
    let text = pieces.next().unwrap_or_default();
    let bullets: Vec<ListItem> = pieces
        .filter(|piece| !piece.is_empty())
        .map(|piece| ListItem::new(vec![Span::Text(piece.to_string())]))
        .collect();

    let mut item = labeled_item(label, text);
    if !bullets.is_empty() {
        item.nested = Some(Box::new(List::new(BulletStyle::Square, bullets)));
    }
    item
}

/// Split an incorrect-answer body into one item per lettered choice A to E.
///
/// A marker only starts a choice when a title follows it, so a sentence
/// ending in "vitamin E." stays with the choice it belongs to. Text before
/// the first choice is returned separately.
pub fn split_choices(body: &str) -> (&str, Vec<ListItem>) {
    let candidates: Vec<usize> = CHOICE_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.start()))
        .collect();
    let starts: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|&(i, &start)| {
            let end = candidates.get(i + 1).copied().unwrap_or(body.len());
            has_choice_title(body[start..end].trim())
        })
        .map(|(_, &start)| start)
        .collect();

    let lead_end = starts.first().copied().unwrap_or(body.len());
    let items = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(body.len());
            choice_item(body[start..end].trim())
        })
        .collect();

    (body[..lead_end].trim(), items)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ChoiceField {
    Why,
    Classic,
}

/// Optional sub-headings of a choice chunk, in order of appearance.
fn choice_fields(chunk: &str) -> Vec<(usize, usize, ChoiceField)> {
    let mut fields: Vec<(usize, usize, ChoiceField)> = [
        (WHY_RE.find(chunk), ChoiceField::Why),
        (CLASSIC_RE.find(chunk), ChoiceField::Classic),
    ]
    .into_iter()
    .filter_map(|(found, field)| found.map(|m| (m.start(), m.end(), field)))
    .collect();
    fields.sort_by_key(|(start, _, _)| *start);
    fields
}

/// Title text is the label plus everything up to the first sub-heading.
fn choice_title(chunk: &str, fields: &[(usize, usize, ChoiceField)]) -> String {
    let title_end = fields.first().map_or(chunk.len(), |(start, _, _)| *start);
    chunk[..title_end].trim().to_string()
}

/// The chunk starts with an "X." label (two ASCII bytes); something must follow it.
fn has_choice_title(chunk: &str) -> bool {
    let title = choice_title(chunk, &choice_fields(chunk));
    title.get(2..).is_some_and(|rest| !rest.trim().is_empty())
}

fn choice_item(chunk: &str) -> ListItem {
    let fields = choice_fields(chunk);
    let mut details = Vec::new();
    for (i, &(start, end, field)) in fields.iter().enumerate() {
        let body_end = fields.get(i + 1).map_or(chunk.len(), |(next, _, _)| *next);
        let label = &chunk[start..end];
        let body = chunk[end..body_end].trim();
        match field {
            ChoiceField::Why => details.push(labeled_item(label, body)),
            ChoiceField::Classic => details.extend(classic_items(label, body)),
        }
    }

    let mut item = ListItem::new(vec![Span::Bold(choice_title(chunk, &fields))]);
    if !details.is_empty() {
        item.nested = Some(Box::new(List::new(BulletStyle::Square, details)));
    }
    item
}

/// The bold label followed by one sibling item per presentation fragment.
fn classic_items(label: &str, body: &str) -> Vec<ListItem> {
    let mut items = vec![ListItem::new(vec![Span::Bold(label.to_string())])];
    items.extend(
        presentation_fragments(body)
            .into_iter()
            .map(|fragment| ListItem::new(vec![Span::Text(fragment.to_string())])),
    );
    items
}

/// Sentence-like fragments, split on bullet markers and terminal periods.
pub fn presentation_fragments(body: &str) -> Vec<&str> {
    FRAGMENT_RE
        .split(body)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// `**Label:** body`, with the colon added when the label lacks one.
fn labeled_item(label: &str, body: &str) -> ListItem {
    let label = if label.ends_with(':') {
        label.to_string()
    } else {
        format!("{label}:")
    };
    let mut content = vec![Span::Bold(label)];
    if !body.is_empty() {
        content.push(Span::Text(format!(" {body}")));
    }
    ListItem::new(content)
}

fn parent_item(label: &str, lead: &str, style: BulletStyle, children: Vec<ListItem>) -> ListItem {
    let mut item = labeled_item(label, lead);
    if !children.is_empty() {
        item.nested = Some(Box::new(List::new(style, children)));
    }
    item
}
