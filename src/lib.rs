#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rust_2021_compatibility
)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

//! `mokapot-remap` maps JVM class, field, method and package names between namespaces.
//!
//! It loads obfuscation mappings from several text formats into one [`Mappings`] model,
//! propagates member renames along the class hierarchy, and answers common-super-type queries
//! needed when re-verifying rewritten class files.
//!
//! ```
//! use mokapot_remap::mapping::{MappingFormat, Mappings};
//!
//! let srg = "CL: a b\nFD: a/c b/d\nMD: a/e ()I b/f ()I\n";
//! let mappings: Mappings = MappingFormat::Srg.parse(srg.as_bytes()).unwrap();
//! assert_eq!(mappings.map("a"), "b");
//! assert_eq!(mappings.map_field_name("a", "c", "I"), "d");
//! assert_eq!(mappings.map_method_name("a", "e", "()I"), "f");
//! assert_eq!(mappings.map("unmapped/Class"), "unmapped/Class");
//! ```
//!
//! ## Features
#![doc = document_features::document_features!()]

pub mod analysis;
pub mod jvm;
pub(crate) mod macros;
pub mod mapping;
pub mod types;

pub use mapping::Mappings;

/// Test utilities
#[cfg(test)]
pub(crate) mod tests;
