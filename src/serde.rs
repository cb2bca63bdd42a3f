//! JSON-deserializable layout description.
//!
//! These types describe the fields of a message section. They are meant to be
//! read from a definition file and converted into [crate::layout::FieldSpec]s
//! before calling [crate::layout::Layout::compile].

use serde::{Deserialize, Serialize};

use crate::{layout::FieldSpec, structure::Argument};

/// Top-level layout definition: fields in placement order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LayoutDef {
    pub fields: Vec<FieldDef>,
}

impl LayoutDef {
    pub fn into_specs(self) -> Vec<FieldSpec> {
        self.fields.into_iter().map(Into::into).collect()
    }
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Unique field name.
    pub name: String,
    /// Registered kind name, e.g. `padtomultiple`.
    pub kind: String,
    /// Declared length in bytes.
    #[serde(default)]
    pub length: usize,
    /// Positional arguments handed to the kind's `init`.
    #[serde(default)]
    pub args: Vec<ArgumentDef>,
}

/// A positional argument: an entry name or an integer constant.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ArgumentDef {
    Long(i64),
    Name(String),
}

impl From<ArgumentDef> for Argument {
    fn from(value: ArgumentDef) -> Self {
        match value {
            ArgumentDef::Long(value) => Argument::Long(value),
            ArgumentDef::Name(name) => Argument::Name(name),
        }
    }
}
