//! # gridfield
//!
//! Field accessors for structured binary grid messages.
//!
//! Every field of a message is a [node::FieldNode] of some [kind::Kind]. Kinds
//! form a single-inheritance chain; the [kind::KindRegistry] resolves each
//! kind's operation table once, at registration, so dispatch is a table lookup.
//! Nodes reach their sibling fields by name through the owning
//! [structure::Structure].
//!
//! Built-in kinds:
//! - `gen`: root kind, generic position and length bookkeeping.
//! - `bytes`, `padding`: raw byte runs.
//! - `padtomultiple`: padding whose length aligns the next field.
//! - `data_apply_boustrophedonic`: exposes a serpentine-scanned grid in
//!   row-major order.
//!
//! ## Example
//!
//! ```
//! use gridfield::kind::KindRegistry;
//! use gridfield::layout::{FieldSpec, Layout};
//! use gridfield::structure::Message;
//!
//! let message = Message::new()
//!     .with_long("Nj", 2)
//!     .with_long("Ni", 3)
//!     .with_long("numberOfPoints", 6)
//!     .with_doubles("codedValues", vec![1.0, 2.0, 3.0, 6.0, 5.0, 4.0]);
//!
//! let specs = vec![
//!     FieldSpec::new("values", "data_apply_boustrophedonic")
//!         .with_arg("codedValues")
//!         .with_arg("Nj")
//!         .with_arg("Ni")
//!         .with_arg("numberOfPoints"),
//! ];
//! let layout = Layout::compile(KindRegistry::builtin(), &specs, &message).unwrap();
//! let values = layout.get("values").unwrap().unpack_double_vec(&message).unwrap();
//! assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! ```

pub mod boustrophedonic;
pub mod dump;
pub mod errors;
pub mod generic;
pub mod kind;
pub mod layout;
pub mod node;
pub mod padding;
#[cfg(feature = "serde")]
pub mod serde;
pub mod structure;
