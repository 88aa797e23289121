//! Visitor-based traversal of a document
//!
//! Segments are visited in the document's stored order, every occurrence of
//! a repeated segment in turn, and each stored field in position order.

use crate::document::Document;
use crate::field::Field;
use crate::segment::Segment;

/// Callbacks invoked while walking a document
pub trait Visitor {
    /// Called before the fields of a segment occurrence
    fn enter_segment(&mut self, _name: &str, _occurrence: usize, _segment: &Segment) {}

    /// Called for every stored field
    fn visit_field(&mut self, name: &str, occurrence: usize, index: u32, field: &Field);

    /// Called after the fields of a segment occurrence
    fn leave_segment(&mut self, _name: &str, _occurrence: usize, _segment: &Segment) {}

    /// Returns true if traversal should continue
    fn should_continue(&self) -> bool {
        true
    }
}

/// Walk every segment occurrence and stored field of a document
pub fn walk<V: Visitor>(doc: &Document, visitor: &mut V) {
    for (name, entry) in doc.iter() {
        for (occurrence, segment) in entry.occurrences().iter().enumerate() {
            if !visitor.should_continue() {
                return;
            }

            visitor.enter_segment(name, occurrence, segment);
            for (index, field) in segment.fields() {
                if !visitor.should_continue() {
                    return;
                }
                visitor.visit_field(name, occurrence, index, field);
            }
            visitor.leave_segment(name, occurrence, segment);
        }
    }
}
