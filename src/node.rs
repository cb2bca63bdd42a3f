//! Runtime field instances and operation dispatch.

use std::{fmt, sync::Arc};

use crate::{
    boustrophedonic::BoustrophedonicConfig,
    dump::Dumper,
    errors::FieldError,
    kind::{Kind, Operation, Slot},
    padding::PadToMultipleConfig,
    structure::{Arguments, Structure},
};

/// Value type a field natively exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Undefined,
    Long,
    Double,
    String,
    Bytes,
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeType::Undefined => "undefined",
            NativeType::Long => "long",
            NativeType::Double => "double",
            NativeType::String => "string",
            NativeType::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// Kind-specific configuration, resolved once by the kind's `init`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldConfig {
    #[default]
    Plain,
    Boustrophedonic(BoustrophedonicConfig),
    PadToMultiple(PadToMultipleConfig),
}

/// One field inside a structured message.
///
/// A node knows its kind, byte position and resolved configuration. The data
/// itself lives in the owning [Structure], which every operation receives.
#[derive(Debug, Clone)]
pub struct FieldNode {
    name: String,
    kind: Arc<Kind>,
    offset: usize,
    length: usize,
    config: FieldConfig,
}

impl FieldNode {
    /// A node with no configuration. Does not run the kind's `init`.
    pub fn new(name: impl Into<String>, kind: Arc<Kind>, offset: usize, length: usize) -> Self {
        FieldNode {
            name: name.into(),
            kind,
            offset,
            length,
            config: FieldConfig::Plain,
        }
    }

    /// Builds a node and runs its kind's `init` against `structure` and `args`.
    pub fn create(
        name: impl Into<String>,
        kind: Arc<Kind>,
        offset: usize,
        length: usize,
        structure: &dyn Structure,
        args: &Arguments,
    ) -> Result<Self, FieldError> {
        let init = kind.table().init;
        let mut node = FieldNode::new(name, kind, offset, length);
        if let Slot::Implemented(init) = init {
            init(&mut node, structure, args)?;
        }
        Ok(node)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &Arc<Kind> {
        &self.kind
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub(crate) fn set_length(&mut self, length: usize) {
        self.length = length;
    }

    pub(crate) fn set_config(&mut self, config: FieldConfig) {
        self.config = config;
    }

    fn not_implemented(&self, operation: Operation) -> FieldError {
        FieldError::NotImplemented {
            kind: self.kind.name().to_string(),
            operation,
        }
    }

    pub(crate) fn missing_configuration(&self) -> FieldError {
        FieldError::MissingConfiguration {
            kind: self.kind.name().to_string(),
        }
    }

    /// Number of logical values; 0 when the kind does not count values.
    pub fn value_count(&self, structure: &dyn Structure) -> i64 {
        match self.kind.table().value_count {
            Slot::Implemented(f) => f(self, structure),
            Slot::Unsupported => 0,
        }
    }

    pub fn byte_count(&self) -> usize {
        match self.kind.table().byte_count {
            Slot::Implemented(f) => f(self),
            Slot::Unsupported => self.length,
        }
    }

    pub fn next_offset(&self) -> usize {
        match self.kind.table().next_offset {
            Slot::Implemented(f) => f(self),
            Slot::Unsupported => self.offset + self.length,
        }
    }

    pub fn native_type(&self) -> NativeType {
        match self.kind.table().native_type {
            Slot::Implemented(f) => f(self),
            Slot::Unsupported => NativeType::Undefined,
        }
    }

    /// Writes logical values into `out` and returns how many were written.
    pub fn unpack_double(
        &self,
        structure: &dyn Structure,
        out: &mut [f64],
    ) -> Result<usize, FieldError> {
        match self.kind.table().unpack_double {
            Slot::Implemented(f) => f(self, structure, out),
            Slot::Unsupported => Err(self.not_implemented(Operation::UnpackDouble)),
        }
    }

    /// Unpacks into a fresh buffer sized by [FieldNode::value_count], keeping
    /// only the values actually written.
    pub fn unpack_double_vec(&self, structure: &dyn Structure) -> Result<Vec<f64>, FieldError> {
        let count = usize::try_from(self.value_count(structure)).unwrap_or(0);
        let mut values = vec![0.0; count];
        let written = self.unpack_double(structure, &mut values)?;
        values.truncate(written);
        Ok(values)
    }

    pub fn pack_double(
        &self,
        structure: &mut dyn Structure,
        values: &[f64],
    ) -> Result<(), FieldError> {
        match self.kind.table().pack_double {
            Slot::Implemented(f) => f(self, structure, values),
            Slot::Unsupported => Err(self.not_implemented(Operation::PackDouble)),
        }
    }

    pub fn unpack_double_element(
        &self,
        structure: &dyn Structure,
        index: usize,
    ) -> Result<f64, FieldError> {
        match self.kind.table().unpack_double_element {
            Slot::Implemented(f) => f(self, structure, index),
            Slot::Unsupported => Err(self.not_implemented(Operation::UnpackDoubleElement)),
        }
    }

    /// Length this field wants at its current offset.
    pub fn preferred_size(&self, structure: &dyn Structure, from_handle: bool) -> usize {
        match self.kind.table().preferred_size {
            Slot::Implemented(f) => f(self, structure, from_handle),
            Slot::Unsupported => self.length,
        }
    }

    /// Moves the node to `offset` and recomputes its length for the new position.
    pub fn relocate(&mut self, offset: usize, structure: &dyn Structure) {
        self.offset = offset;
        self.length = self.preferred_size(structure, false);
    }

    /// Describes the field to `dumper`.
    pub fn dump(
        &self,
        structure: &dyn Structure,
        dumper: &mut dyn Dumper,
    ) -> Result<(), FieldError> {
        match self.kind.table().dump {
            Slot::Implemented(f) => f(self, structure, dumper),
            Slot::Unsupported => Err(self.not_implemented(Operation::Dump)),
        }
    }
}
