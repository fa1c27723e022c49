mod bridge;
pub mod layout;

pub use bridge::{
    Field, FieldDescriptor, FieldKind, FieldValue, read_field, resolve_pointer, write_field,
};
