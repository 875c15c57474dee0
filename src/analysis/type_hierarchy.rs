//! Walking the super types of a class through a [`ClassInfoProvider`].

use std::{collections::VecDeque, sync::Arc};

use indexmap::IndexMap;

use crate::jvm::{
    ClassInfo,
    class_loader::{ClassInfoProvider, ClassLoadingError},
};

/// Resolves the direct super class of `class`. Returns `None` only for the root class.
///
/// # Errors
/// See [`ClassLoadingError`].
pub fn resolve_super_class<P>(
    provider: &P,
    class: &ClassInfo,
) -> Result<Option<Arc<ClassInfo>>, ClassLoadingError>
where
    P: ClassInfoProvider + ?Sized,
{
    class
        .super_class
        .as_ref()
        .map(|it| provider.class_info(&it.binary_name))
        .transpose()
}

/// Resolves every interface directly implemented by `class`, in declaration order.
///
/// # Errors
/// The first lookup failure, typically [`ClassLoadingError::NotFound`].
pub fn resolve_interfaces<P>(
    provider: &P,
    class: &ClassInfo,
) -> Result<Vec<Arc<ClassInfo>>, ClassLoadingError>
where
    P: ClassInfoProvider + ?Sized,
{
    class
        .interfaces
        .iter()
        .map(|it| provider.class_info(&it.binary_name))
        .collect()
}

/// Resolves all super classes and super interfaces of `root`, keyed by binary name in
/// breadth-first order.
///
/// A class is recorded when it is visited and is never expanded twice, so cyclic hierarchies
/// terminate. With `include_self` set to `false` the root is removed after the traversal.
///
/// # Errors
/// The first lookup failure, typically [`ClassLoadingError::NotFound`].
pub fn recursive_resolve_super_classes<P>(
    provider: &P,
    root: Arc<ClassInfo>,
    include_self: bool,
) -> Result<IndexMap<String, Arc<ClassInfo>>, ClassLoadingError>
where
    P: ClassInfoProvider + ?Sized,
{
    let root_name = root.binary_name.clone();
    let mut resolved = IndexMap::new();
    resolved.insert(root_name.clone(), Arc::clone(&root));
    let mut queue = VecDeque::from([root]);
    while let Some(class) = queue.pop_front() {
        let super_types = class.super_class.iter().chain(class.interfaces.iter());
        for super_type in super_types {
            if resolved.contains_key(&super_type.binary_name) {
                continue;
            }
            let super_class = provider.class_info(&super_type.binary_name)?;
            resolved.insert(super_type.binary_name.clone(), Arc::clone(&super_class));
            queue.push_back(super_class);
        }
    }
    if !include_self {
        resolved.shift_remove(&root_name);
    }
    tracing::trace!(class = root_name, count = resolved.len(), "resolved super types");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::{
        OBJECT_CLASS,
        class_loader::{ClassInfoSet, ClassLoader},
    };

    fn hierarchy() -> ClassLoader<ClassInfoSet> {
        let classes: ClassInfoSet = [
            ClassInfo::object(),
            ClassInfo::interface("x/Named"),
            ClassInfo::interface("x/Tagged").with_interfaces(["x/Named"]),
            ClassInfo::new("x/Base", Some(OBJECT_CLASS)).with_interfaces(["x/Named"]),
            ClassInfo::new("x/Sub", Some("x/Base")).with_interfaces(["x/Tagged"]),
            ClassInfo::new("x/Broken", Some("x/Missing")),
        ]
        .into_iter()
        .collect();
        ClassLoader::new(vec![classes])
    }

    #[test]
    fn direct_super_types() {
        let loader = hierarchy();
        let sub = loader.class_info("x/Sub").unwrap();
        let base = resolve_super_class(&loader, &sub).unwrap().unwrap();
        assert_eq!(base.binary_name, "x/Base");
        let object = loader.class_info(OBJECT_CLASS).unwrap();
        assert!(resolve_super_class(&loader, &object).unwrap().is_none());
        let interfaces = resolve_interfaces(&loader, &sub).unwrap();
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].binary_name, "x/Tagged");
    }

    #[test]
    fn breadth_first_order() {
        let loader = hierarchy();
        let sub = loader.class_info("x/Sub").unwrap();
        let supers = recursive_resolve_super_classes(&loader, sub, false).unwrap();
        let names: Vec<_> = supers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["x/Base", "x/Tagged", OBJECT_CLASS, "x/Named"]);
    }

    #[test]
    fn include_self() {
        let loader = hierarchy();
        let base = loader.class_info("x/Base").unwrap();
        let supers = recursive_resolve_super_classes(&loader, base, true).unwrap();
        assert_eq!(supers.first().map(|(name, _)| name.as_str()), Some("x/Base"));
        assert_eq!(supers.len(), 3);
    }

    #[test]
    fn missing_super_class() {
        let loader = hierarchy();
        let broken = loader.class_info("x/Broken").unwrap();
        assert!(matches!(
            resolve_super_class(&loader, &broken),
            Err(ClassLoadingError::NotFound(name)) if name == "x/Missing"
        ));
        assert!(matches!(
            recursive_resolve_super_classes(&loader, broken, false),
            Err(ClassLoadingError::NotFound(_))
        ));
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let classes: ClassInfoSet = [
            ClassInfo::new("A", Some("B")),
            ClassInfo::new("B", Some(OBJECT_CLASS)).with_interfaces(["C"]),
            ClassInfo::interface("C").with_interfaces(["A"]),
            ClassInfo::object(),
        ]
        .into_iter()
        .collect();
        let loader = ClassLoader::new(vec![classes]);
        let a = loader.class_info("A").unwrap();
        let with_self = recursive_resolve_super_classes(&loader, Arc::clone(&a), true).unwrap();
        let mut names: Vec<_> = with_self
            .keys()
            .map(String::as_str)
            .filter(|it| *it != OBJECT_CLASS)
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["A", "B", "C"]);
        let without_self = recursive_resolve_super_classes(&loader, a, false).unwrap();
        assert!(!without_self.contains_key("A"));
        assert!(without_self.contains_key("C"));
    }
}
