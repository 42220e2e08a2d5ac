/// Inline text run. Emphasis comes from `**` pairs or the trailing-colon rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Text(text) | Span::Bold(text) => text,
        }
    }
}

/// How a list marks its items.
///
/// `Square` is reserved for nested sub-detail so it reads apart from the
/// list it hangs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletStyle {
    Disc,
    Square,
    Lettered,
}

/// A single list item, which can own one nested list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<Span>,
    pub nested: Option<Box<List>>,
}

impl ListItem {
    pub fn new(content: Vec<Span>) -> Self {
        Self {
            content,
            nested: None,
        }
    }

    /// Item text with emphasis dropped.
    pub fn plain_text(&self) -> String {
        plain_text(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub style: BulletStyle,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(style: BulletStyle, items: Vec<ListItem>) -> Self {
        Self { style, items }
    }

    /// Depth of list nesting, counting this list as 1.
    pub fn depth(&self) -> usize {
        1 + self
            .items
            .iter()
            .filter_map(|item| item.nested.as_deref())
            .map(List::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Block-level elements recovered from an explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph { content: Vec<Span> },
    /// The "The correct answer is X:" line, rendered distinctly.
    Answer { content: Vec<Span> },
    List(List),
}

/// A formatted explanation: an optional title plus its blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.blocks.is_empty()
    }
}

/// Concatenate span text, ignoring emphasis.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}
