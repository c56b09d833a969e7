//! In-memory document model
//!
//! Sections append blocks to a [`Document`]; the markup module lowers it to
//! Typst source. Nothing here knows about Typst syntax.

use std::collections::BTreeMap;

/// A run of text inside a paragraph or list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(value.into())
    }

    pub fn bold(value: impl Into<String>) -> Self {
        Inline::Bold(value.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Inline::Text(s) | Inline::Bold(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        spans: Vec<Inline>,
        align: Align,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Inline>>,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// A row of images, referenced by asset path
    Images(Vec<String>),
    /// Table of contents line with a dotted leader before the page number
    TocEntry {
        title: String,
        page: String,
    },
    Spacer,
    PageBreak,
}

/// Page footer settings, applied to every page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Footer {
    /// Centred footer line
    pub text: Option<String>,
    /// Right-aligned "Página N" marker
    pub page_numbers: bool,
}

impl Footer {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && !self.page_numbers
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
    /// Binary files referenced by the blocks, keyed by virtual path
    pub assets: BTreeMap<String, Vec<u8>>,
    pub footer: Footer,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn heading(&mut self, level: u8, text: impl Into<String>) {
        self.push(Block::Heading {
            level,
            text: text.into(),
        });
    }

    pub fn paragraph(&mut self, text: impl Into<String>) {
        self.spans(vec![Inline::text(text)]);
    }

    pub fn spans(&mut self, spans: Vec<Inline>) {
        self.push(Block::Paragraph {
            spans,
            align: Align::Start,
        });
    }

    pub fn aligned(&mut self, align: Align, spans: Vec<Inline>) {
        self.push(Block::Paragraph { spans, align });
    }

    /// "Label: value" with the label in bold
    pub fn labeled(&mut self, label: &str, value: impl Into<String>) {
        self.spans(vec![Inline::bold(format!("{label}: ")), Inline::text(value)]);
    }

    /// Text split into one paragraph per blank-line separated chunk
    pub fn paragraphs(&mut self, text: &str) {
        for chunk in text.split("\n\n").map(str::trim).filter(|c| !c.is_empty()) {
            self.paragraph(chunk);
        }
    }

    pub fn spacer(&mut self) {
        self.push(Block::Spacer);
    }

    pub fn page_break(&mut self) {
        self.push(Block::PageBreak);
    }

    /// Register an asset and return the path blocks should reference
    pub fn add_asset(&mut self, path: String, data: Vec<u8>) -> String {
        self.assets.insert(path.clone(), data);
        path
    }

    /// Plain text of every block, one line per block, for inspection and logs
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Heading { text, .. } => lines.push(text.clone()),
                Block::Paragraph { spans, .. } => lines.push(join_spans(spans)),
                Block::List { items, .. } => lines.extend(items.iter().map(|i| join_spans(i))),
                Block::Table { header, rows } => {
                    lines.push(header.join(" | "));
                    lines.extend(rows.iter().map(|r| r.join(" | ")));
                }
                Block::TocEntry { title, page } => lines.push(format!("{title} {page}")),
                Block::Images(_) | Block::Spacer | Block::PageBreak => {}
            }
        }
        lines.join("\n")
    }
}

fn join_spans(spans: &[Inline]) -> String {
    spans.iter().map(Inline::as_str).collect()
}
