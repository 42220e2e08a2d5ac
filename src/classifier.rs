//! Line-oriented recovery of structure from explanations that carry `**`
//! emphasis markers.
//!
//! Each line is matched against a fixed priority list of line kinds and fed
//! through a small state machine that owns at most one open top-level list
//! plus an optional sub-list under its last item.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::block::{Block, BulletStyle, List, ListItem, Span, plain_text};
use crate::inline::{drop_prefix, emphasize_line, trailing_colon};

static ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^The correct answer is [A-Z]:").expect("valid regex"));

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(wrong answers|incorrect answers|key points)\s*:?\s*$")
        .expect("valid regex")
});

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\s+").expect("valid regex"));

static CHOICE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\)").expect("valid regex"));

static LETTERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\. ").expect("valid regex"));

const KEY_POINT_DASH: &str = "- ";

/// Classify marked-up explanation text into blocks.
pub fn classify(text: &str) -> Vec<Block> {
    let mut classifier = Classifier::new();
    for line in text.lines() {
        classifier.push_line(line);
    }
    classifier.finish()
}

/// What a single line was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    AnswerReveal,
    SectionHeading,
    ChoiceBullet,
    SubBullet,
    LetteredItem,
    KeyPoint,
    PlainText,
}

/// The open top-level list. A sub-list can only hang under a bullet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Context {
    #[default]
    Closed,
    Bullet {
        sub_open: bool,
    },
    Lettered,
    KeyPoints,
}

/// Flag view of the classifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags {
    pub in_bullet_list: bool,
    pub in_sub_bullet_list: bool,
    pub in_letter_list: bool,
    pub in_key_points_list: bool,
}

impl StateFlags {
    /// At most one top-level list is open, and a sub-list only under a bullet list.
    pub fn is_consistent(&self) -> bool {
        let open = [
            self.in_bullet_list,
            self.in_letter_list,
            self.in_key_points_list,
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count();
        open <= 1 && (!self.in_sub_bullet_list || self.in_bullet_list)
    }
}

/// Incremental classifier. Feed lines with [`Classifier::push_line`] and
/// collect the blocks with [`Classifier::finish`].
#[derive(Debug, Default)]
pub struct Classifier {
    context: Context,
    items: Vec<ListItem>,
    sub_items: Vec<ListItem>,
    blocks: Vec<Block>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> StateFlags {
        match self.context {
            Context::Closed => StateFlags::default(),
            Context::Bullet { sub_open } => StateFlags {
                in_bullet_list: true,
                in_sub_bullet_list: sub_open,
                ..StateFlags::default()
            },
            Context::Lettered => StateFlags {
                in_letter_list: true,
                ..StateFlags::default()
            },
            Context::KeyPoints => StateFlags {
                in_key_points_list: true,
                ..StateFlags::default()
            },
        }
    }

    /// Classify one line. Blank lines are skipped.
    pub fn push_line(&mut self, line: &str) -> Option<LineKind> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let spans = emphasize_line(line);
        let flat = plain_text(&spans);
        let bullet_len = BULLET_RE.find(&flat).map(|m| m.end());
        let body = drop_prefix(&spans, bullet_len.unwrap_or(0));

        let kind = if ANSWER_RE.is_match(&flat) {
            self.close_all();
            self.blocks.push(Block::Answer { content: spans });
            LineKind::AnswerReveal
        } else if let Some(caps) = SECTION_RE.captures(&flat) {
            self.close_all();
            let key_points = caps[1].eq_ignore_ascii_case("key points");
            self.blocks.push(Block::Paragraph {
                content: vec![Span::Bold(flat.clone())],
            });
            self.context = if key_points {
                Context::KeyPoints
            } else {
                Context::Bullet { sub_open: false }
            };
            LineKind::SectionHeading
        } else if starts_with_choice_label(&body) {
            self.push_choice(body);
            LineKind::ChoiceBullet
        } else if bullet_len.is_some() {
            self.push_bullet(body);
            LineKind::SubBullet
        } else if LETTERED_RE.is_match(&flat) {
            if self.context != Context::Lettered {
                self.close_all();
                self.context = Context::Lettered;
            }
            // The match is ASCII, so two bytes is exactly "X."
            let mut content = vec![Span::Bold(flat[..2].to_string())];
            content.extend(trailing_colon(drop_prefix(&spans, 2)));
            self.items.push(ListItem::new(content));
            LineKind::LetteredItem
        } else if self.context == Context::KeyPoints && flat.starts_with(KEY_POINT_DASH) {
            let content = trailing_colon(drop_prefix(&spans, KEY_POINT_DASH.len()));
            self.items.push(ListItem::new(content));
            LineKind::KeyPoint
        } else {
            self.close_all();
            self.blocks.push(Block::Paragraph {
                content: trailing_colon(spans),
            });
            LineKind::PlainText
        };

        trace!(?kind, line, "classified line");
        Some(kind)
    }

    /// Close every open list and return the blocks.
    pub fn finish(mut self) -> Vec<Block> {
        self.close_all();
        self.blocks
    }

    fn push_choice(&mut self, content: Vec<Span>) {
        if matches!(self.context, Context::Bullet { .. }) {
            self.close_sub();
        } else {
            self.close_all();
        }
        self.items.push(ListItem::new(content));
        self.context = Context::Bullet { sub_open: true };
    }

    fn push_bullet(&mut self, content: Vec<Span>) {
        match self.context {
            Context::Bullet { sub_open: true } => self.sub_items.push(ListItem::new(content)),
            Context::Bullet { sub_open: false } => self.items.push(ListItem::new(content)),
            _ => {
                self.close_all();
                self.context = Context::Bullet { sub_open: false };
                self.items.push(ListItem::new(content));
            }
        }
    }

    /// Attach pending sub-items under the last top-level item. No items, no list.
    fn close_sub(&mut self) {
        if let Context::Bullet { sub_open } = &mut self.context {
            *sub_open = false;
        }
        let items = std::mem::take(&mut self.sub_items);
        if items.is_empty() {
            return;
        }
        match self.items.last_mut() {
            Some(parent) => parent.nested = Some(Box::new(List::new(BulletStyle::Square, items))),
            None => self.items.extend(items),
        }
    }

    fn close_all(&mut self) {
        self.close_sub();
        let style = match self.context {
            Context::Closed => return,
            Context::Bullet { .. } | Context::KeyPoints => BulletStyle::Disc,
            Context::Lettered => BulletStyle::Lettered,
        };
        self.context = Context::Closed;
        let items = std::mem::take(&mut self.items);
        if !items.is_empty() {
            self.blocks.push(Block::List(List::new(style, items)));
        }
    }
}

fn starts_with_choice_label(spans: &[Span]) -> bool {
    match spans.first() {
        Some(Span::Bold(text)) => CHOICE_LABEL_RE.is_match(text.trim_start()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    fn bold(s: &str) -> Span {
        Span::Bold(s.to_string())
    }

    fn item(content: Vec<Span>) -> ListItem {
        ListItem::new(content)
    }

    fn kind_after(setup: &[&str], line: &str) -> Option<LineKind> {
        let mut classifier = Classifier::new();
        for l in setup {
            classifier.push_line(l);
        }
        classifier.push_line(line)
    }

    #[rstest]
    #[case("The correct answer is B: because", LineKind::AnswerReveal)]
    #[case("**The correct answer is B:** because", LineKind::AnswerReveal)]
    #[case("Wrong answers", LineKind::SectionHeading)]
    #[case("**INCORRECT ANSWERS:**", LineKind::SectionHeading)]
    #[case("key points", LineKind::SectionHeading)]
    #[case("**Key points** are worth reviewing here", LineKind::PlainText)]
    #[case("Wrong answers are common", LineKind::PlainText)]
    #[case("* **A)** First option", LineKind::ChoiceBullet)]
    #[case("**A)** First option", LineKind::ChoiceBullet)]
    #[case("* detail", LineKind::SubBullet)]
    #[case("* **bold** detail", LineKind::SubBullet)]
    #[case("B. Second choice", LineKind::LetteredItem)]
    #[case("b. lowercase choice", LineKind::PlainText)]
    #[case("BB. double letter", LineKind::PlainText)]
    #[case("- no key points open", LineKind::PlainText)]
    #[case("**bold text", LineKind::PlainText)]
    fn line_kinds(#[case] line: &str, #[case] expected: LineKind) {
        assert_eq!(kind_after(&[], line), Some(expected));
    }

    #[test]
    fn dash_line_is_key_point_only_under_key_points() {
        assert_eq!(kind_after(&["Key points"], "- remember this"), Some(LineKind::KeyPoint));
        assert_eq!(kind_after(&["Wrong answers"], "- not here"), Some(LineKind::PlainText));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(kind_after(&[], "   "), None);
        assert_eq!(classify("\n\n  \n"), Vec::<Block>::new());
    }

    #[test]
    fn choice_bullet_owns_square_sub_list() {
        let blocks = classify("**A)** First option\n* detail one\nThe correct answer is B: because");

        let mut choice = item(vec![bold("A)"), text(" First option")]);
        choice.nested = Some(Box::new(List::new(
            BulletStyle::Square,
            vec![item(vec![text("detail one")])],
        )));
        assert_eq!(
            blocks,
            vec![
                Block::List(List::new(BulletStyle::Disc, vec![choice])),
                Block::Answer {
                    content: vec![text("The correct answer is B: because")]
                },
            ]
        );
    }

    #[test]
    fn consecutive_choices_each_get_their_details() {
        let blocks = classify(
            "Wrong answers\n* **A)** One\n* a1\n* a2\n* **B)** Two\n* b1\nDone.",
        );

        let Block::List(list) = &blocks[1] else {
            panic!("expected list, got {:?}", blocks[1]);
        };
        assert_eq!(list.items.len(), 2);
        let a = list.items[0].nested.as_deref().expect("A has details");
        let b = list.items[1].nested.as_deref().expect("B has details");
        assert_eq!(a.items.len(), 2);
        assert_eq!(b.items[0].plain_text(), "b1");
        assert_eq!(
            blocks[2],
            Block::Paragraph {
                content: vec![text("Done.")]
            }
        );
    }

    #[test]
    fn choice_without_details_has_no_empty_sub_list() {
        let blocks = classify("* **A)** alone\nplain text");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].nested, None);
    }

    #[test]
    fn section_heading_emits_bold_paragraph_and_opens_bullets() {
        let blocks = classify("**Incorrect answers:**\n* first\n* second");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    content: vec![bold("Incorrect answers:")]
                },
                Block::List(List::new(
                    BulletStyle::Disc,
                    vec![item(vec![text("first")]), item(vec![text("second")])]
                )),
            ]
        );
    }

    #[test]
    fn key_points_collect_dash_lines() {
        let blocks = classify("**Key points**\n- Watch for:\n- murmur at apex\nThe end");
        assert_eq!(
            blocks[1],
            Block::List(List::new(
                BulletStyle::Disc,
                vec![
                    item(vec![bold("Watch for:")]),
                    item(vec![text("murmur at apex")]),
                ]
            ))
        );
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn heading_words_in_prose_open_no_list() {
        let blocks = classify("**Key points** are worth reviewing here\n- one");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    content: vec![bold("Key points"), text(" are worth reviewing here")]
                },
                Block::Paragraph {
                    content: vec![text("- one")]
                },
            ]
        );
    }

    #[test]
    fn lettered_items_bold_their_label() {
        let blocks = classify("**Choices**\nA. Aortic stenosis\nB. Findings:");
        assert_eq!(
            blocks[1],
            Block::List(List::new(
                BulletStyle::Lettered,
                vec![
                    item(vec![bold("A."), text(" Aortic stenosis")]),
                    item(vec![bold("B."), bold(" Findings:")]),
                ]
            ))
        );
    }

    #[test]
    fn lettered_line_closes_bullet_context() {
        let blocks = classify("* **A)** one\n* detail\nC. other");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[0], Block::List(l) if l.style == BulletStyle::Disc));
        assert!(matches!(&blocks[1], Block::List(l) if l.style == BulletStyle::Lettered));
    }

    #[test]
    fn plain_line_with_trailing_colon_is_bold() {
        assert_eq!(
            classify("**Note** Remember:"),
            vec![Block::Paragraph {
                content: vec![bold("Note Remember:")]
            }]
        );
    }

    #[test]
    fn sub_bullet_outside_lists_opens_bullet_list() {
        let blocks = classify("Key points\n- one\n* starred");
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[2],
            Block::List(List::new(BulletStyle::Disc, vec![item(vec![text("starred")])]))
        );
    }

    #[test]
    fn flags_track_contexts() {
        let mut classifier = Classifier::new();
        classifier.push_line("* **A)** one");
        assert_eq!(
            classifier.flags(),
            StateFlags {
                in_bullet_list: true,
                in_sub_bullet_list: true,
                ..StateFlags::default()
            }
        );
        classifier.push_line("Key points");
        assert!(classifier.flags().in_key_points_list);
        classifier.push_line("plain");
        assert_eq!(classifier.flags(), StateFlags::default());
    }

    #[test]
    fn inconsistent_flags_are_detected() {
        let flags = StateFlags {
            in_sub_bullet_list: true,
            ..StateFlags::default()
        };
        assert!(!flags.is_consistent());
    }
}
