use explain::{Block, BulletStyle, ListItem, format, parse};
use pretty_assertions::assert_eq;

fn nested(item: &ListItem) -> &explain::List {
    item.nested.as_deref().expect("item has children")
}

#[test]
fn choice_bullet_with_detail_then_answer() {
    let raw = "**A)** First option\n* detail one\nThe correct answer is B: because";

    let doc = parse(raw);
    let [Block::List(list), Block::Answer { .. }] = doc.blocks.as_slice() else {
        panic!("unexpected blocks {:?}", doc.blocks);
    };
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].plain_text(), "A) First option");
    assert_eq!(nested(&list.items[0]).style, BulletStyle::Square);
    assert_eq!(nested(&list.items[0]).items[0].plain_text(), "detail one");

    assert_eq!(
        format(raw),
        "<div class=\"explanation\">\n\
         <ul>\n\
         <li><strong>A)</strong> First option\n\
         <ul style=\"list-style-type: square\">\n\
         <li>detail one</li>\n\
         </ul>\n\
         </li>\n\
         </ul>\n\
         <p class=\"correct-answer\">The correct answer is B: because</p>\n\
         </div>\n"
    );
}

#[test]
fn unmarked_run_on_paragraph_becomes_outline() {
    let raw = "C. Papillary muscle rupture Primary Diagnosis: Acute MI Key Supporting Evidence: \
               Timeline: 3 days post-MI Incorrect Answer Explanations A. Free wall rupture \
               Why it's incorrect: wrong vessel Classic Presentation: sudden death.";

    let doc = parse(raw);
    assert_eq!(doc.title.as_deref(), Some("C. Papillary muscle rupture"));
    let [Block::List(outline)] = doc.blocks.as_slice() else {
        panic!("unexpected blocks {:?}", doc.blocks);
    };

    let labels: Vec<String> = outline.items.iter().map(ListItem::plain_text).collect();
    assert_eq!(
        labels,
        vec![
            "Primary Diagnosis: Acute MI",
            "Key Supporting Evidence:",
            "Incorrect Answer Explanations:",
        ]
    );

    let evidence = nested(&outline.items[1]);
    assert_eq!(evidence.items[0].plain_text(), "Timeline: 3 days post-MI");

    let choice = &nested(&outline.items[2]).items[0];
    assert_eq!(choice.plain_text(), "A. Free wall rupture");
    let details = nested(choice);
    assert_eq!(details.items[0].plain_text(), "Why it's incorrect: wrong vessel");
    assert_eq!(details.items[1].plain_text(), "Classic Presentation:");
    assert_eq!(details.items[1].nested, None);
    assert_eq!(details.items[2].plain_text(), "sudden death");
    assert_eq!(outline.depth(), 3);

    let html = format(raw);
    assert!(html.contains("<h3>C. Papillary muscle rupture</h3>\n"));
    assert!(html.contains("<li><strong>Primary Diagnosis:</strong> Acute MI</li>\n"));
    assert!(html.contains("<li><strong>Timeline:</strong> 3 days post-MI</li>\n"));
    assert!(html.contains("<li><strong>A. Free wall rupture</strong>\n"));
    assert!(html.contains("<li>sudden death</li>\n"));
}

#[test]
fn empty_input_is_placeholder_only() {
    assert_eq!(format(""), "No explanation available");
    assert!(parse("").is_empty());
}

#[test]
fn single_marker_is_kept_literally() {
    assert_eq!(
        format("**bold text"),
        "<div class=\"explanation\">\n<p>**bold text</p>\n</div>\n"
    );
}

#[test]
fn multi_line_unmarked_text_is_normalized() {
    let doc = parse("B. Angina\n\nPrimary Diagnosis:\n\tStable   angina");
    assert_eq!(doc.title.as_deref(), Some("B. Angina"));
    let [Block::List(outline)] = doc.blocks.as_slice() else {
        panic!("unexpected blocks {:?}", doc.blocks);
    };
    assert_eq!(outline.items[0].plain_text(), "Primary Diagnosis: Stable angina");
}
