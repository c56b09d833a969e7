//! Lowering of the document model to Typst markup
//!
//! All user text goes through [`escape`], so record fields can never inject
//! markup or code into the compiled source.

use std::fmt::Write;

use crate::document::{Align, Block, Document, Footer, Inline};

/// Characters with a meaning in Typst markup
const SPECIAL: &[char] = &[
    '\\', '#', '[', ']', '(', ')', '{', '}', '*', '_', '`', '$', '@', '<', '>', '=', '-', '+',
    '/', '~', '.',
];

const PREAMBLE: &str = r#"#set document(title: "Laudo de Inspeção Predial")
#set page(paper: "a4", margin: (x: 2.5cm, y: 2.5cm))
#set text(lang: "pt", size: 11pt)
#set par(justify: true)
#show heading.where(level: 1): set text(size: 14pt)
#show heading.where(level: 2): set text(size: 12pt)
#show heading: set block(above: 1.4em, below: 0.8em)
"#;

/// Escape text for use in markup; line breaks become forced breaks
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' => {}
            '\n' => out.push_str("\\\n"),
            c if SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Full Typst source for a document
pub fn lower(doc: &Document) -> String {
    let mut out = String::from(PREAMBLE);
    lower_footer(&doc.footer, &mut out);
    out.push('\n');

    for block in &doc.blocks {
        lower_block(block, &mut out);
        out.push('\n');
    }
    out
}

fn lower_footer(footer: &Footer, out: &mut String) {
    if footer.is_empty() {
        return;
    }
    out.push_str("#set page(footer: context [\n");
    if let Some(text) = &footer.text {
        let _ = writeln!(out, "  #align(center)[{}]", escape(text));
    }
    if footer.page_numbers {
        out.push_str("  #align(right)[Página #counter(page).display()]\n");
    }
    out.push_str("])\n");
}

fn lower_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, text } => {
            let marks = "=".repeat((*level).max(1) as usize);
            let _ = writeln!(out, "{} {}", marks, escape(text));
        }
        Block::Paragraph { spans, align } => {
            let body = lower_spans(spans);
            match align {
                Align::Start => {
                    let _ = writeln!(out, "{body}");
                }
                Align::Center => {
                    let _ = writeln!(out, "#align(center)[{body}]");
                }
                Align::Right => {
                    let _ = writeln!(out, "#align(right)[{body}]");
                }
            }
        }
        Block::List { ordered, items } => {
            let marker = if *ordered { '+' } else { '-' };
            for item in items {
                let _ = writeln!(out, "{} {}", marker, lower_spans(item));
            }
        }
        Block::Table { header, rows } => {
            let _ = writeln!(out, "#table(");
            let _ = writeln!(out, "  columns: {},", header.len().max(1));
            let _ = writeln!(out, "  inset: 6pt,");
            let header_cells: Vec<String> = header
                .iter()
                .map(|h| format!("[#strong[{}]]", escape(h)))
                .collect();
            let _ = writeln!(out, "  table.header({}),", header_cells.join(", "));
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| format!("[{}]", escape(c))).collect();
                let _ = writeln!(out, "  {},", cells.join(", "));
            }
            out.push_str(")\n");
        }
        Block::Images(paths) => {
            if paths.is_empty() {
                return;
            }
            let columns = vec!["1fr"; paths.len()].join(", ");
            let _ = writeln!(out, "#grid(");
            let _ = writeln!(out, "  columns: ({columns},),");
            let _ = writeln!(out, "  gutter: 8pt,");
            for path in paths {
                let _ = writeln!(out, "  image({}, width: 100%),", string_literal(path));
            }
            out.push_str(")\n");
        }
        Block::TocEntry { title, page } => {
            let _ = writeln!(
                out,
                "#strong[{}] #box(width: 1fr, repeat[.]) {}",
                escape(title),
                escape(page)
            );
        }
        Block::Spacer => out.push_str("#v(2em)\n"),
        Block::PageBreak => out.push_str("#pagebreak()\n"),
    }
}

fn lower_spans(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(text) => escape(text),
            Inline::Bold(text) => format!("#strong[{}]", escape(text)),
        })
        .collect()
}

/// Quoted Typst string literal
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
