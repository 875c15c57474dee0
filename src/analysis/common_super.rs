//! The nearest common super class of two classes, as needed when computing stack map frames.

use std::sync::Arc;

use indexmap::IndexSet;

use super::type_hierarchy::recursive_resolve_super_classes;
use crate::{
    jvm::{
        OBJECT_CLASS,
        class_loader::{ClassInfoProvider, ClassLoadingError},
    },
    macros::see_jvm_spec,
};

/// Finds the nearest common super class of the classes named `a` and `b`.
///
/// The result is `java/lang/Object` if either argument is `java/lang/Object`, an array type or
/// an interface, unless one of the arguments is a super type of the other. Equal arguments
/// yield that class.
#[doc = see_jvm_spec!(4, 10, 1, 2)]
///
/// # Errors
/// Any failure to resolve a class in either hierarchy. The result is never guessed.
pub fn common_super_class<P>(provider: &P, a: &str, b: &str) -> Result<String, ClassLoadingError>
where
    P: ClassInfoProvider + ?Sized,
{
    if a == OBJECT_CLASS || b == OBJECT_CLASS {
        return Ok(OBJECT_CLASS.to_owned());
    }
    if a == b {
        return Ok(a.to_owned());
    }
    if a.starts_with('[') || b.starts_with('[') {
        return Ok(OBJECT_CLASS.to_owned());
    }
    let class_a = provider.class_info(a)?;
    let class_b = provider.class_info(b)?;
    let supers_a = recursive_resolve_super_classes(provider, Arc::clone(&class_a), false)?;
    let supers_b = recursive_resolve_super_classes(provider, Arc::clone(&class_b), false)?;
    if supers_b.contains_key(a) {
        return Ok(a.to_owned());
    }
    if supers_a.contains_key(b) {
        return Ok(b.to_owned());
    }
    if class_a.is_interface() || class_b.is_interface() {
        return Ok(OBJECT_CLASS.to_owned());
    }
    // Walk the super class chain of `a`. Every class on it is in `supers_a`.
    let mut visited = IndexSet::new();
    let mut current = class_a.super_class.as_ref();
    while let Some(super_class) = current {
        let name = super_class.binary_name.as_str();
        if supers_b.contains_key(name) {
            return Ok(name.to_owned());
        }
        if !visited.insert(name) {
            break;
        }
        current = supers_a
            .get(name)
            .and_then(|it| it.super_class.as_ref());
    }
    Ok(OBJECT_CLASS.to_owned())
}
