//! Error types for kind registration, structure lookups and field operations.

use thiserror::Error;

use crate::kind::Operation;

/// Errors produced while registering a [crate::kind::KindDescriptor].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The parent kind has not been registered yet.
    #[error("kind `{kind}` names parent `{parent}` which is not registered")]
    UnresolvedAncestor { kind: String, parent: String },
}

/// Errors produced by the owning [crate::structure::Structure] when a named
/// sibling or an argument cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// No entry with this name exists in the structure.
    #[error("no entry named `{0}`")]
    NotFound(String),
    /// The entry exists but holds a different kind of value.
    #[error("entry `{name}` is not {expected}")]
    TypeMismatch { name: String, expected: &'static str },
    /// The argument list is shorter than required.
    #[error("argument {0} is missing")]
    MissingArgument(usize),
    /// A name was expected at this argument position.
    #[error("argument {0} is not a name")]
    NotAName(usize),
}

/// Errors produced by field operations (unpack, pack, init, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Caller buffer is shorter than the number of values involved.
    #[error("buffer holds {provided} values but {required} are required")]
    BufferTooSmall { required: usize, provided: usize },
    /// Declared point count and stored array size disagree.
    #[error("boustrophedonic ordering error: ({count_name}={count}) != (sizeOf({values_name})={actual})")]
    Decoding {
        count_name: String,
        count: usize,
        values_name: String,
        actual: usize,
    },
    /// The row lengths do not add up to the declared point count.
    #[error("rows cover {covered} points but {count_name}={count}")]
    GridMismatch {
        count_name: String,
        count: usize,
        covered: usize,
    },
    /// The row lengths add up to more than `usize` can hold.
    #[error("row lengths overflow while covering {count_name}={count}")]
    RowOverflow { count_name: String, count: usize },
    /// A count or row length read from the structure is negative.
    #[error("`{name}` holds negative count {value}")]
    NegativeCount { name: String, value: i64 },
    /// The kind deliberately does not support this operation.
    #[error("operation `{operation}` is not implemented by kind `{kind}`")]
    NotImplemented { kind: String, operation: Operation },
    /// A required sibling field or argument could not be read.
    #[error(transparent)]
    ConfigurationRead(#[from] StructureError),
    /// The node was not initialised with the configuration its kind expects.
    #[error("field of kind `{kind}` carries no configuration for it")]
    MissingConfiguration { kind: String },
}

/// Errors produced when building a [crate::layout::Layout].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No kind with this name is registered.
    #[error("unknown field kind `{0}`")]
    UnknownKind(String),
    /// Two fields share one name.
    #[error("field `{0}` is declared twice")]
    DuplicateField(String),
    /// A field failed to initialise.
    #[error("field `{name}`: {source}")]
    Field {
        name: String,
        #[source]
        source: FieldError,
    },
}
