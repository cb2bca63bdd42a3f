//! Layout: an ordered set of field nodes placed back to back.

use std::collections::BTreeMap;

use crate::{
    errors::LayoutError,
    kind::KindRegistry,
    node::FieldNode,
    structure::{Argument, Arguments, Structure},
};

/// Declaration of one field: name, kind, declared length and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: String,
    /// Declared length in bytes. Kinds with computed lengths ignore it.
    pub length: usize,
    pub args: Vec<Argument>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        FieldSpec {
            name: name.into(),
            kind: kind.into(),
            length: 0,
            args: Vec::new(),
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_arg(mut self, arg: impl Into<Argument>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for FieldSpec {
    fn from(value: crate::serde::FieldDef) -> Self {
        FieldSpec {
            name: value.name,
            kind: value.kind,
            length: value.length,
            args: value.args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Field nodes in declaration order, each starting where the previous ends.
/// Use [Layout::compile] to build from [FieldSpec]s.
#[derive(Debug, Clone)]
pub struct Layout {
    nodes: Vec<FieldNode>,
    index: BTreeMap<String, usize>,
    total_length: usize,
}

impl Layout {
    /// Creates one node per [FieldSpec], in order, starting at offset 0.
    pub fn compile(
        registry: &KindRegistry,
        specs: &[FieldSpec],
        structure: &dyn Structure,
    ) -> Result<Self, LayoutError> {
        let mut nodes: Vec<FieldNode> = Vec::with_capacity(specs.len());
        let mut index = BTreeMap::new();
        let mut offset = 0;

        for spec in specs {
            if index.contains_key(&spec.name) {
                return Err(LayoutError::DuplicateField(spec.name.clone()));
            }

            let kind = registry
                .get(&spec.kind)
                .ok_or_else(|| LayoutError::UnknownKind(spec.kind.clone()))?;

            let args = Arguments::new(spec.args.clone());
            let node = FieldNode::create(&spec.name, kind, offset, spec.length, structure, &args)
                .map_err(|source| LayoutError::Field {
                    name: spec.name.clone(),
                    source,
                })?;

            offset = node.next_offset();
            index.insert(spec.name.clone(), nodes.len());
            nodes.push(node);
        }

        Ok(Layout {
            nodes,
            index,
            total_length: offset,
        })
    }

    /// Places every node again from offset 0, letting each recompute its length.
    pub fn relayout(&mut self, structure: &dyn Structure) {
        let mut offset = 0;
        for node in &mut self.nodes {
            node.relocate(offset, structure);
            offset = node.next_offset();
        }
        self.total_length = offset;
    }

    /// Bytes covered by all fields.
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn get(&self, name: &str) -> Option<&FieldNode> {
        self.index.get(name).map(|i| &self.nodes[*i])
    }

    pub fn nodes(&self) -> &[FieldNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
