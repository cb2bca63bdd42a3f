//! The owning structure that field nodes read from and write to.
//!
//! Nodes never hold references to their siblings: every cross-field access goes
//! through a name lookup on a [Structure], so the structure can rebuild its
//! entries without invalidating existing nodes.

use std::collections::BTreeMap;

use crate::errors::StructureError;

/// Name-keyed access to the entries of a message.
pub trait Structure {
    /// Number of values held by `name` (1 for a scalar).
    fn get_array_size(&self, name: &str) -> Result<usize, StructureError>;

    fn get_numeric_array(&self, name: &str) -> Result<Vec<f64>, StructureError>;

    /// Replaces the contents and size of `name`.
    fn set_numeric_array(&mut self, name: &str, values: Vec<f64>) -> Result<(), StructureError>;

    fn get_integer(&self, name: &str) -> Result<i64, StructureError>;

    fn get_integer_array(&self, name: &str) -> Result<Vec<i64>, StructureError>;

    fn evaluate_expression(&self, expression: &Expression) -> Result<i64, StructureError> {
        match expression {
            Expression::Constant(value) => Ok(*value),
            Expression::Field(name) => self.get_integer(name),
        }
    }
}

/// An integer expression evaluated against a [Structure].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Constant(i64),
    /// Value of a named integer entry.
    Field(String),
}

/// One positional argument of a field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Name(String),
    Long(i64),
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Name(value.to_string())
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Long(value)
    }
}

/// Ordered argument list of a field declaration. Position is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    pub fn new(args: Vec<Argument>) -> Self {
        Arguments(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The entry name at `index`.
    pub fn name(&self, index: usize) -> Result<&str, StructureError> {
        match self.0.get(index) {
            Some(Argument::Name(name)) => Ok(name),
            Some(Argument::Long(_)) => Err(StructureError::NotAName(index)),
            None => Err(StructureError::MissingArgument(index)),
        }
    }

    /// The entry name at `index`, if the argument is present and is a name.
    pub fn optional_name(&self, index: usize) -> Option<&str> {
        self.name(index).ok()
    }

    /// The argument at `index` as an expression: names become field references.
    pub fn expression(&self, index: usize) -> Result<Expression, StructureError> {
        match self.0.get(index) {
            Some(Argument::Name(name)) => Ok(Expression::Field(name.clone())),
            Some(Argument::Long(value)) => Ok(Expression::Constant(*value)),
            None => Err(StructureError::MissingArgument(index)),
        }
    }
}

impl<A: Into<Argument>> FromIterator<A> for Arguments {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Arguments(iter.into_iter().map(Into::into).collect())
    }
}

/// A value stored in a [Message].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Long(i64),
    LongArray(Vec<i64>),
    DoubleArray(Vec<f64>),
}

/// In-memory [Structure] keyed by entry name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    entries: BTreeMap<String, Entry>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_long(mut self, name: &str, value: i64) -> Self {
        self.set(name, Entry::Long(value));
        self
    }

    pub fn with_longs(mut self, name: &str, values: Vec<i64>) -> Self {
        self.set(name, Entry::LongArray(values));
        self
    }

    pub fn with_doubles(mut self, name: &str, values: Vec<f64>) -> Self {
        self.set(name, Entry::DoubleArray(values));
        self
    }

    pub fn set(&mut self, name: &str, entry: Entry) -> Option<Entry> {
        self.entries.insert(name.to_string(), entry)
    }

    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    fn entry(&self, name: &str) -> Result<&Entry, StructureError> {
        self.entries
            .get(name)
            .ok_or_else(|| StructureError::NotFound(name.to_string()))
    }
}

impl Structure for Message {
    fn get_array_size(&self, name: &str) -> Result<usize, StructureError> {
        Ok(match self.entry(name)? {
            Entry::Long(_) => 1,
            Entry::LongArray(values) => values.len(),
            Entry::DoubleArray(values) => values.len(),
        })
    }

    fn get_numeric_array(&self, name: &str) -> Result<Vec<f64>, StructureError> {
        Ok(match self.entry(name)? {
            Entry::Long(value) => vec![*value as f64],
            Entry::LongArray(values) => values.iter().map(|v| *v as f64).collect(),
            Entry::DoubleArray(values) => values.clone(),
        })
    }

    fn set_numeric_array(&mut self, name: &str, values: Vec<f64>) -> Result<(), StructureError> {
        self.set(name, Entry::DoubleArray(values));
        Ok(())
    }

    fn get_integer(&self, name: &str) -> Result<i64, StructureError> {
        match self.entry(name)? {
            Entry::Long(value) => Ok(*value),
            _ => Err(StructureError::TypeMismatch {
                name: name.to_string(),
                expected: "an integer",
            }),
        }
    }

    fn get_integer_array(&self, name: &str) -> Result<Vec<i64>, StructureError> {
        match self.entry(name)? {
            Entry::Long(value) => Ok(vec![*value]),
            Entry::LongArray(values) => Ok(values.clone()),
            Entry::DoubleArray(_) => Err(StructureError::TypeMismatch {
                name: name.to_string(),
                expected: "an integer array",
            }),
        }
    }
}
