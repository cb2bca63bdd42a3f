//! Byte runs, padding and pad-to-multiple alignment.
//!
//! Kind chain: `gen` → `bytes` → `padding` → `padtomultiple`.

use log::warn;

use crate::{
    dump::Dumper,
    errors::FieldError,
    generic,
    kind::{KindDescriptor, Overrides, Slot},
    node::{FieldConfig, FieldNode, NativeType},
    structure::{Arguments, Expression, Structure},
};

pub const BYTES: &str = "bytes";
pub const PADDING: &str = "padding";
pub const PAD_TO_MULTIPLE: &str = "padtomultiple";

/// Alignment expressions of a `padtomultiple` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadToMultipleConfig {
    /// Base offset alignment is measured from.
    pub begin: Expression,
    /// Alignment quantum in bytes.
    pub multiple: Expression,
}

pub fn bytes_descriptor() -> KindDescriptor {
    KindDescriptor::child_of(
        BYTES,
        generic::NAME,
        Overrides {
            dump: Some(Slot::Implemented(dump_bytes)),
            native_type: Some(Slot::Implemented(bytes_native_type)),
            ..Default::default()
        },
    )
}

pub fn padding_descriptor() -> KindDescriptor {
    KindDescriptor::child_of(
        PADDING,
        BYTES,
        Overrides {
            value_count: Some(Slot::Implemented(padding_value_count)),
            ..Default::default()
        },
    )
}

pub fn pad_to_multiple_descriptor() -> KindDescriptor {
    KindDescriptor::child_of(
        PAD_TO_MULTIPLE,
        PADDING,
        Overrides {
            init: Some(Slot::Implemented(pad_to_multiple_init)),
            preferred_size: Some(Slot::Implemented(pad_to_multiple_preferred_size)),
            ..Default::default()
        },
    )
}

fn dump_bytes(
    node: &FieldNode,
    _: &dyn Structure,
    dumper: &mut dyn Dumper,
) -> Result<(), FieldError> {
    dumper.dump_bytes(node, node.length());
    Ok(())
}

fn bytes_native_type(_: &FieldNode) -> NativeType {
    NativeType::Bytes
}

fn padding_value_count(node: &FieldNode, _: &dyn Structure) -> i64 {
    node.length() as i64
}

/// Bytes needed after `offset` so the next field lands on a multiple of
/// `multiple` counted from `begin`.
///
/// An already aligned offset pads a whole `multiple`, so the result lies in
/// `1..=multiple`. A non-positive `multiple` pads nothing.
pub fn pad_to_multiple(offset: i64, begin: i64, multiple: i64) -> i64 {
    if multiple <= 0 {
        return 0;
    }

    // Widened so extreme `begin` values cannot overflow.
    let gap = i128::from(offset) - i128::from(begin);
    let padding = (-gap).rem_euclid(i128::from(multiple)) as i64;
    if padding == 0 { multiple } else { padding }
}

fn pad_to_multiple_init(
    node: &mut FieldNode,
    structure: &dyn Structure,
    args: &Arguments,
) -> Result<(), FieldError> {
    let config = PadToMultipleConfig {
        begin: args.expression(0)?,
        multiple: args.expression(1)?,
    };
    node.set_config(FieldConfig::PadToMultiple(config));

    let length = pad_to_multiple_preferred_size(node, structure, true);
    node.set_length(length);
    Ok(())
}

/// Evaluates `expression`, falling back to 0 when it cannot be resolved.
/// Existing layouts rely on this leniency.
fn evaluate_or_zero(
    node: &FieldNode,
    structure: &dyn Structure,
    what: &str,
    expression: &Expression,
) -> i64 {
    structure.evaluate_expression(expression).unwrap_or_else(|err| {
        warn!("`{}`: cannot evaluate {what} ({err}), using 0", node.name());
        0
    })
}

fn pad_to_multiple_preferred_size(
    node: &FieldNode,
    structure: &dyn Structure,
    _from_handle: bool,
) -> usize {
    let FieldConfig::PadToMultiple(config) = node.config() else {
        return node.length();
    };

    let begin = evaluate_or_zero(node, structure, "begin", &config.begin);
    let multiple = evaluate_or_zero(node, structure, "multiple", &config.multiple);
    let offset = i64::try_from(node.offset()).unwrap_or(i64::MAX);

    // Non-negative by construction.
    pad_to_multiple(offset, begin, multiple) as usize
}
