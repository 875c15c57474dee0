//! Module containing the APIs for the JVM elements.

pub mod class_info;
pub mod class_loader;
pub mod parsing;
pub mod references;

pub use class_info::{ClassInfo, FieldInfo, MethodInfo};
pub use parsing::ClassFileParsingError;

/// The binary name of `java/lang/Object`, the root of every class hierarchy.
pub const OBJECT_CLASS: &str = "java/lang/Object";
