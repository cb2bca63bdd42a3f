//! Routines of the root kind `gen`, inherited by every other built-in kind.

use crate::{
    dump::Dumper,
    errors::FieldError,
    kind::{KindDescriptor, Overrides, Slot},
    node::{FieldNode, NativeType},
    structure::{Arguments, Structure},
};

pub const NAME: &str = "gen";

pub fn descriptor() -> KindDescriptor {
    KindDescriptor::root(
        NAME,
        Overrides {
            init: Some(Slot::Implemented(init)),
            dump: Some(Slot::Implemented(dump)),
            value_count: Some(Slot::Implemented(value_count)),
            byte_count: Some(Slot::Implemented(byte_count)),
            next_offset: Some(Slot::Implemented(next_offset)),
            native_type: Some(Slot::Implemented(native_type)),
            preferred_size: Some(Slot::Implemented(preferred_size)),
            ..Default::default()
        },
    )
}

// The declared length stands; nothing to resolve.
fn init(_: &mut FieldNode, _: &dyn Structure, _: &Arguments) -> Result<(), FieldError> {
    Ok(())
}

fn dump(node: &FieldNode, _: &dyn Structure, dumper: &mut dyn Dumper) -> Result<(), FieldError> {
    dumper.dump_label(node);
    Ok(())
}

fn value_count(_: &FieldNode, _: &dyn Structure) -> i64 {
    1
}

fn byte_count(node: &FieldNode) -> usize {
    node.length()
}

fn next_offset(node: &FieldNode) -> usize {
    node.offset() + node.length()
}

fn native_type(_: &FieldNode) -> NativeType {
    NativeType::Undefined
}

fn preferred_size(node: &FieldNode, _: &dyn Structure, _: bool) -> usize {
    node.length()
}
