//! Module containing the APIs for the JVM type system.
pub mod field_type;
pub mod method_descriptor;

pub use field_type::{FieldType, PrimitiveType};
pub use method_descriptor::{InvalidDescriptor, MethodDescriptor, ReturnType};

/// Trait for types that have a descriptor.
pub trait Descriptor {
    /// Returns the descriptor of the type.
    fn descriptor(&self) -> String;
}
