//! Analyses over the class hierarchy.
//!
//! All analyses consume class metadata through a
//! [`ClassInfoProvider`](crate::jvm::class_loader::ClassInfoProvider) and resolve super types
//! lazily, one class at a time.

pub mod common_super;
pub mod member_fill;
pub mod type_hierarchy;

pub use common_super::common_super_class;
pub use member_fill::{FillSummary, fill_all_super_members, fill_super_members};
pub use type_hierarchy::{recursive_resolve_super_classes, resolve_interfaces, resolve_super_class};
