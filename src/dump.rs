//! Diagnostic description of field nodes.

use std::fmt::Write;

use crate::node::FieldNode;

/// Sink for [FieldNode::dump]. Kinds pick the method matching their data.
pub trait Dumper {
    /// A field with nothing to show beyond its position.
    fn dump_label(&mut self, node: &FieldNode);
    /// A run of `length` raw bytes.
    fn dump_bytes(&mut self, node: &FieldNode, length: usize);
    /// Resolved logical values.
    fn dump_values(&mut self, node: &FieldNode, values: &[f64]);
}

/// Renders one line per dumped field into a string.
#[derive(Debug, Default)]
pub struct TextDumper {
    out: String,
}

impl TextDumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn header(&mut self, node: &FieldNode) {
        // Writing into a String cannot fail.
        let _ = write!(
            self.out,
            "{} ({}) @{}+{}",
            node.name(),
            node.kind().name(),
            node.offset(),
            node.length()
        );
    }
}

impl Dumper for TextDumper {
    fn dump_label(&mut self, node: &FieldNode) {
        self.header(node);
        self.out.push('\n');
    }

    fn dump_bytes(&mut self, node: &FieldNode, length: usize) {
        self.header(node);
        let _ = writeln!(self.out, ": {length} bytes");
    }

    fn dump_values(&mut self, node: &FieldNode, values: &[f64]) {
        self.header(node);
        self.out.push_str(" = [");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            let _ = write!(self.out, "{value}");
        }
        self.out.push_str("]\n");
    }
}
