//! Text renderings of a parsed document for `hl7 inspect`

use crate::catalog;
use anyhow::Result;
use clap::ValueEnum;
use hl7_codec::{Hl7Generator, SegmentOrder};
use hl7_model::{Document, Field, Segment, SegmentEntry, Visitor, walk};
use std::io::Write;

/// Output layout for `inspect`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    /// Canonical message text, one segment per line
    #[default]
    Raw,
    /// Indented hierarchy with display names
    Tree,
    /// CSV rows of segment, field, name, value
    Table,
}

/// Render `doc` in the chosen view
pub fn write_view<W: Write>(view: View, doc: &Document, mut out: W) -> Result<()> {
    match view {
        View::Raw => writeln!(out, "{}", render_raw(doc)?)?,
        View::Tree => write!(out, "{}", render_tree(doc))?,
        View::Table => write_table(doc, out)?,
    }
    Ok(())
}

/// Re-render in stored order with newlines between segments
pub fn render_raw(doc: &Document) -> Result<String> {
    let text = Hl7Generator::with_order(SegmentOrder::document_order()).generate(doc)?;
    Ok(text.replace('\r', "\n"))
}

/// Indented tree; repeated segments are labelled `NAME[i]`
pub fn render_tree(doc: &Document) -> String {
    let mut tree = TreeView {
        doc,
        lines: Vec::new(),
    };
    walk(doc, &mut tree);

    let mut text = tree.lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// CSV with a `segment,field,name,value` header, one row per stored field
pub fn write_table<W: Write>(doc: &Document, out: W) -> Result<()> {
    let mut rows = TableRows { doc, rows: Vec::new() };
    walk(doc, &mut rows);

    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(["segment", "field", "name", "value"])?;
    for row in &rows.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    tracing::debug!(rows = rows.rows.len(), "Wrote field table");
    Ok(())
}

/// Flat text for a field: non-empty components joined by `^`, repetitions by `~`
pub fn display_value(field: &Field) -> String {
    match field {
        Field::Simple(value) => value.clone(),
        Field::Composite(components) => components
            .values()
            .filter(|value| !value.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("^"),
        Field::Repeated(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join("~"),
    }
}

fn segment_label(doc: &Document, name: &str, occurrence: usize) -> String {
    if doc.entry(name).is_some_and(SegmentEntry::is_repeated) {
        format!("{name}[{occurrence}]")
    } else {
        name.to_string()
    }
}

struct TreeView<'a> {
    doc: &'a Document,
    lines: Vec<String>,
}

impl TreeView<'_> {
    fn push_value(&mut self, depth: usize, label: &str, field: &Field) {
        let indent = "  ".repeat(depth);
        match field {
            Field::Simple(value) => self.lines.push(format!("{indent}{label}: {value}")),
            Field::Composite(components) => {
                self.lines.push(format!("{indent}{label}"));
                for (component, value) in components {
                    self.lines.push(format!("{indent}  .{component}: {value}"));
                }
            }
            Field::Repeated(items) => {
                self.lines
                    .push(format!("{indent}{label} ({} repetitions)", items.len()));
                for (repetition, item) in items.iter().enumerate() {
                    self.push_value(depth + 1, &format!("[{repetition}]"), item);
                }
            }
        }
    }
}

impl Visitor for TreeView<'_> {
    fn enter_segment(&mut self, name: &str, occurrence: usize, _segment: &Segment) {
        let label = segment_label(self.doc, name, occurrence);
        match catalog::segment_name(name) {
            Some(description) => self.lines.push(format!("{label} ({description})")),
            None => self.lines.push(label),
        }
    }

    fn visit_field(&mut self, name: &str, _occurrence: usize, index: u32, field: &Field) {
        let label = format!("{name}-{index} {}", catalog::field_name(name, index));
        self.push_value(1, &label, field);
    }
}

struct TableRows<'a> {
    doc: &'a Document,
    rows: Vec<[String; 4]>,
}

impl Visitor for TableRows<'_> {
    fn visit_field(&mut self, name: &str, occurrence: usize, index: u32, field: &Field) {
        self.rows.push([
            segment_label(self.doc, name, occurrence),
            index.to_string(),
            catalog::field_name(name, index),
            display_value(field),
        ]);
    }
}
