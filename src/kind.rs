//! Field kinds and the capability registry.
//!
//! A kind declares only the operations it overrides. Registering it resolves
//! every remaining slot from its parent's already-resolved table, so dispatch
//! never walks the ancestor chain at call time.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, OnceLock},
};

use log::debug;

use crate::{
    dump::Dumper,
    errors::{FieldError, RegistryError},
    node::{FieldNode, NativeType},
    structure::{Arguments, Structure},
};

/// Resolves kind-specific configuration and sets the initial length.
pub type InitFn = fn(&mut FieldNode, &dyn Structure, &Arguments) -> Result<(), FieldError>;
/// Writes a diagnostic description of the field to a [Dumper].
pub type DumpFn = fn(&FieldNode, &dyn Structure, &mut dyn Dumper) -> Result<(), FieldError>;
/// Number of logical values held by the field.
pub type ValueCountFn = fn(&FieldNode, &dyn Structure) -> i64;
/// Number of bytes the field occupies.
pub type ByteCountFn = fn(&FieldNode) -> usize;
/// Offset of the byte following the field.
pub type NextOffsetFn = fn(&FieldNode) -> usize;
pub type NativeTypeFn = fn(&FieldNode) -> NativeType;
/// Absorbs logical values and writes them back into the structure.
pub type PackDoubleFn = fn(&FieldNode, &mut dyn Structure, &[f64]) -> Result<(), FieldError>;
/// Fills the buffer with logical values; returns how many were written.
pub type UnpackDoubleFn = fn(&FieldNode, &dyn Structure, &mut [f64]) -> Result<usize, FieldError>;
pub type UnpackDoubleElementFn = fn(&FieldNode, &dyn Structure, usize) -> Result<f64, FieldError>;
/// Length the field would like to have at its current offset.
pub type PreferredSizeFn = fn(&FieldNode, &dyn Structure, bool) -> usize;

/// Names of the dispatchable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Dump,
    ValueCount,
    ByteCount,
    NextOffset,
    NativeType,
    PackDouble,
    UnpackDouble,
    UnpackDoubleElement,
    PreferredSize,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Dump => "dump",
            Operation::ValueCount => "value_count",
            Operation::ByteCount => "byte_count",
            Operation::NextOffset => "next_offset",
            Operation::NativeType => "native_type",
            Operation::PackDouble => "pack_double",
            Operation::UnpackDouble => "unpack_double",
            Operation::UnpackDoubleElement => "unpack_double_element",
            Operation::PreferredSize => "preferred_size",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of an operation table.
#[derive(Debug, Clone, Copy)]
pub enum Slot<F> {
    /// The routine handling the operation.
    Implemented(F),
    /// The kind does not support the operation.
    Unsupported,
}

impl<F: Copy> Slot<F> {
    pub fn routine(&self) -> Option<F> {
        match self {
            Slot::Implemented(f) => Some(*f),
            Slot::Unsupported => None,
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, Slot::Implemented(_))
    }
}

/// Operations a kind declares itself. `None` inherits from the parent;
/// `Some(Slot::Unsupported)` withdraws an inherited operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub init: Option<Slot<InitFn>>,
    pub dump: Option<Slot<DumpFn>>,
    pub value_count: Option<Slot<ValueCountFn>>,
    pub byte_count: Option<Slot<ByteCountFn>>,
    pub next_offset: Option<Slot<NextOffsetFn>>,
    pub native_type: Option<Slot<NativeTypeFn>>,
    pub pack_double: Option<Slot<PackDoubleFn>>,
    pub unpack_double: Option<Slot<UnpackDoubleFn>>,
    pub unpack_double_element: Option<Slot<UnpackDoubleElementFn>>,
    pub preferred_size: Option<Slot<PreferredSizeFn>>,
}

/// Fully resolved dispatch table: every slot is a routine or [Slot::Unsupported].
#[derive(Debug, Clone, Copy)]
pub struct OperationTable {
    pub init: Slot<InitFn>,
    pub dump: Slot<DumpFn>,
    pub value_count: Slot<ValueCountFn>,
    pub byte_count: Slot<ByteCountFn>,
    pub next_offset: Slot<NextOffsetFn>,
    pub native_type: Slot<NativeTypeFn>,
    pub pack_double: Slot<PackDoubleFn>,
    pub unpack_double: Slot<UnpackDoubleFn>,
    pub unpack_double_element: Slot<UnpackDoubleElementFn>,
    pub preferred_size: Slot<PreferredSizeFn>,
}

fn inherit<F: Copy>(own: Option<Slot<F>>, parent: Option<Slot<F>>) -> Slot<F> {
    own.or(parent).unwrap_or(Slot::Unsupported)
}

impl OperationTable {
    fn resolve(own: &Overrides, parent: Option<&OperationTable>) -> Self {
        OperationTable {
            init: inherit(own.init, parent.map(|p| p.init)),
            dump: inherit(own.dump, parent.map(|p| p.dump)),
            value_count: inherit(own.value_count, parent.map(|p| p.value_count)),
            byte_count: inherit(own.byte_count, parent.map(|p| p.byte_count)),
            next_offset: inherit(own.next_offset, parent.map(|p| p.next_offset)),
            native_type: inherit(own.native_type, parent.map(|p| p.native_type)),
            pack_double: inherit(own.pack_double, parent.map(|p| p.pack_double)),
            unpack_double: inherit(own.unpack_double, parent.map(|p| p.unpack_double)),
            unpack_double_element: inherit(
                own.unpack_double_element,
                parent.map(|p| p.unpack_double_element),
            ),
            preferred_size: inherit(own.preferred_size, parent.map(|p| p.preferred_size)),
        }
    }

    /// Whether the operation resolves to a routine.
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Init => self.init.is_implemented(),
            Operation::Dump => self.dump.is_implemented(),
            Operation::ValueCount => self.value_count.is_implemented(),
            Operation::ByteCount => self.byte_count.is_implemented(),
            Operation::NextOffset => self.next_offset.is_implemented(),
            Operation::NativeType => self.native_type.is_implemented(),
            Operation::PackDouble => self.pack_double.is_implemented(),
            Operation::UnpackDouble => self.unpack_double.is_implemented(),
            Operation::UnpackDoubleElement => self.unpack_double_element.is_implemented(),
            Operation::PreferredSize => self.preferred_size.is_implemented(),
        }
    }
}

/// Registration input: a kind name, its parent and the operations it overrides.
#[derive(Debug, Clone)]
pub struct KindDescriptor {
    pub name: String,
    pub parent: Option<String>,
    pub overrides: Overrides,
}

impl KindDescriptor {
    /// A root kind.
    pub fn root(name: impl Into<String>, overrides: Overrides) -> Self {
        KindDescriptor {
            name: name.into(),
            parent: None,
            overrides,
        }
    }

    pub fn child_of(
        name: impl Into<String>,
        parent: impl Into<String>,
        overrides: Overrides,
    ) -> Self {
        KindDescriptor {
            name: name.into(),
            parent: Some(parent.into()),
            overrides,
        }
    }
}

/// A registered kind with its resolved table. Immutable once built.
#[derive(Debug)]
pub struct Kind {
    name: String,
    parent: Option<Arc<Kind>>,
    table: OperationTable,
}

impl Kind {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Kind>> {
        self.parent.as_ref()
    }

    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    /// True if this kind is `name` or descends from it.
    pub fn is_a(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind.name == name {
                return true;
            }
            current = kind.parent.as_deref();
        }
        false
    }
}

/// Name-keyed set of resolved kinds.
#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<String, Arc<Kind>>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves and stores `descriptor`. The parent must already be registered.
    /// A name registered earlier is returned as-is without resolving again.
    pub fn register(&mut self, descriptor: KindDescriptor) -> Result<Arc<Kind>, RegistryError> {
        if let Some(existing) = self.kinds.get(&descriptor.name) {
            return Ok(Arc::clone(existing));
        }

        let parent = match &descriptor.parent {
            Some(parent_name) => Some(Arc::clone(self.kinds.get(parent_name).ok_or_else(
                || RegistryError::UnresolvedAncestor {
                    kind: descriptor.name.clone(),
                    parent: parent_name.clone(),
                },
            )?)),
            None => None,
        };

        let table =
            OperationTable::resolve(&descriptor.overrides, parent.as_deref().map(Kind::table));
        let kind = Arc::new(Kind {
            name: descriptor.name,
            parent,
            table,
        });

        debug!(
            "registered field kind `{}` (parent: {})",
            kind.name,
            kind.parent.as_ref().map_or("none", |p| p.name())
        );

        self.kinds.insert(kind.name.clone(), Arc::clone(&kind));
        Ok(kind)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Kind>> {
        self.kinds.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Registers the kinds shipped with this crate into `self`.
    pub fn register_builtin(&mut self) -> Result<(), RegistryError> {
        self.register(crate::generic::descriptor())?;
        self.register(crate::padding::bytes_descriptor())?;
        self.register(crate::padding::padding_descriptor())?;
        self.register(crate::padding::pad_to_multiple_descriptor())?;
        self.register(crate::boustrophedonic::descriptor())?;
        Ok(())
    }

    /// Process-wide registry of the built-in kinds, resolved on first use.
    pub fn builtin() -> &'static KindRegistry {
        static BUILTIN: OnceLock<KindRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut registry = KindRegistry::new();
            // Built-in descriptors are listed parent-first.
            if let Err(err) = registry.register_builtin() {
                panic!("built-in field kinds are misordered: {err}");
            }
            registry
        })
    }
}
