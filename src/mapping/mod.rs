//! The unified mapping model and the parsers filling it.
//!
//! [`Mappings`] stores four independent rename tables: packages, classes, fields and methods.
//! Looking up a name without a registered rename yields the name itself.

use std::{
    borrow::Cow,
    hash::{Hash, Hasher},
    str::FromStr,
};

use indexmap::{Equivalent, IndexMap, IndexSet};

use crate::{
    jvm::references::ClassRef,
    types::{Descriptor, FieldType, InvalidDescriptor, MethodDescriptor},
};

mod error;
mod format;
mod line;
pub mod proguard;
pub mod retroguard;
pub mod srg;
pub mod tiny;
pub mod tsrg;

pub use error::MappingError;
pub use format::{MappingFormat, MappingParser, load_mappings, parse_detected};
pub use tiny::NamespacePair;

/// The key of a field rename: the owning class, the field name and, if the mapping format
/// records it, the field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldKey {
    /// The binary name of the class declaring or inheriting the field.
    pub owner: String,
    /// The name of the field.
    pub name: String,
    /// The descriptor of the field, absent for formats without field types.
    pub descriptor: Option<String>,
}

/// The key of a method rename: the owning class, the method name and its descriptor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MethodKey {
    /// The binary name of the class declaring or inheriting the method.
    pub owner: String,
    /// The name of the method.
    pub name: String,
    /// The descriptor of the method.
    pub descriptor: String,
}

// Borrowed forms of the keys. They hash exactly like the owned keys so that lookups do not
// allocate.
#[derive(Hash)]
struct FieldKeyRef<'a> {
    owner: &'a str,
    name: &'a str,
    descriptor: Option<&'a str>,
}

#[derive(Hash)]
struct MethodKeyRef<'a> {
    owner: &'a str,
    name: &'a str,
    descriptor: &'a str,
}

impl Hash for FieldKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        FieldKeyRef {
            owner: &self.owner,
            name: &self.name,
            descriptor: self.descriptor.as_deref(),
        }
        .hash(state);
    }
}

impl Hash for MethodKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        MethodKeyRef {
            owner: &self.owner,
            name: &self.name,
            descriptor: &self.descriptor,
        }
        .hash(state);
    }
}

impl Equivalent<FieldKey> for FieldKeyRef<'_> {
    fn equivalent(&self, key: &FieldKey) -> bool {
        self.owner == key.owner && self.name == key.name && self.descriptor == key.descriptor.as_deref()
    }
}

impl Equivalent<MethodKey> for MethodKeyRef<'_> {
    fn equivalent(&self, key: &MethodKey) -> bool {
        self.owner == key.owner && self.name == key.name && self.descriptor == key.descriptor
    }
}

/// Normalizes a package name to the form used as a key: empty for the root package, otherwise
/// ending with `/`. SRG writes the root package as `.`.
fn normalize_package(package: &str) -> String {
    let package = package.trim().trim_end_matches('/');
    if package.is_empty() || package == "." {
        String::new()
    } else {
        format!("{package}/")
    }
}

/// Renames of packages, classes, fields and methods.
///
/// All tables are insert-or-overwrite: registering a key twice keeps the last value.
/// Every query falls back to the original name when nothing is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    packages: IndexMap<String, String>,
    classes: IndexMap<String, String>,
    fields: IndexMap<FieldKey, String>,
    methods: IndexMap<MethodKey, String>,
}

impl Mappings {
    /// Creates an empty set of mappings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a package rename. Both names are normalized, so `a/b`, `a/b/` are the same
    /// package, and `""`, `"."` are the root package.
    /// Returns the previous rename of the package.
    pub fn add_package_mapping(&mut self, old: &str, new: &str) -> Option<String> {
        self.packages
            .insert(normalize_package(old), normalize_package(new))
    }

    /// Registers a class rename. Returns the previous rename of the class.
    pub fn add_class_mapping(
        &mut self,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Option<String> {
        self.classes.insert(old.into(), new.into())
    }

    /// Registers a field rename. `descriptor` is `None` for formats that do not record field
    /// types. Returns the previous rename of the same key.
    pub fn add_field_mapping(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: Option<&str>,
        new_name: impl Into<String>,
    ) -> Option<String> {
        let key = FieldKey {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.map(str::to_owned),
        };
        self.fields.insert(key, new_name.into())
    }

    /// Registers a method rename. Returns the previous rename of the same key.
    pub fn add_method_mapping(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Option<String> {
        let key = MethodKey {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        };
        self.methods.insert(key, new_name.into())
    }

    /// Maps a class name. Package renames are not applied, see [`Self::map_with_package`].
    #[must_use]
    pub fn map<'a>(&'a self, class: &'a str) -> &'a str {
        self.classes.get(class).map_or(class, String::as_str)
    }

    /// Maps a field name. The exact key is tried first, then the key without descriptor.
    #[must_use]
    pub fn map_field_name<'a>(&'a self, owner: &str, name: &'a str, descriptor: &str) -> &'a str {
        self.get_field_mapping(owner, name, Some(descriptor))
            .or_else(|| self.get_field_mapping(owner, name, None))
            .unwrap_or(name)
    }

    /// Maps a method name.
    #[must_use]
    pub fn map_method_name<'a>(&'a self, owner: &str, name: &'a str, descriptor: &str) -> &'a str {
        self.get_method_mapping(owner, name, descriptor)
            .unwrap_or(name)
    }

    /// Maps a package prefix using the longest registered package that is a prefix of it.
    /// `prefix` is a package name with or without the trailing `/`; `""` is the root package.
    #[must_use]
    pub fn map_class_package<'a>(&'a self, prefix: &'a str) -> Cow<'a, str> {
        let normalized = normalize_package(prefix);
        let best = self
            .packages
            .iter()
            .filter(|(old, _)| normalized.starts_with(old.as_str()))
            .max_by_key(|(old, _)| old.len());
        match best {
            Some((old, new)) => Cow::Owned(format!("{new}{}", &normalized[old.len()..])),
            None => Cow::Borrowed(prefix),
        }
    }

    /// Maps a class name, falling back to renaming its package when the class itself has no
    /// rename.
    #[must_use]
    pub fn map_with_package<'a>(&'a self, class: &'a str) -> Cow<'a, str> {
        if let Some(mapped) = self.classes.get(class) {
            return Cow::Borrowed(mapped);
        }
        let class_ref = ClassRef::new(class);
        match self.map_class_package(class_ref.package()) {
            Cow::Owned(package) => Cow::Owned(format!("{package}{}", class_ref.simple_name())),
            Cow::Borrowed(_) => Cow::Borrowed(class),
        }
    }

    /// Rewrites the class names in a field descriptor.
    ///
    /// # Errors
    /// Returns [`InvalidDescriptor`] if the descriptor cannot be parsed.
    pub fn map_descriptor(&self, descriptor: &str) -> Result<String, InvalidDescriptor> {
        let field_type = FieldType::from_str(descriptor)?;
        Ok(field_type
            .map_class_names(&|name: &str| self.map_with_package(name).into_owned())
            .descriptor())
    }

    /// Rewrites the class names in a method descriptor.
    ///
    /// # Errors
    /// Returns [`InvalidDescriptor`] if the descriptor cannot be parsed.
    pub fn map_method_descriptor(&self, descriptor: &str) -> Result<String, InvalidDescriptor> {
        let method_descriptor = MethodDescriptor::from_str(descriptor)?;
        Ok(method_descriptor
            .map_class_names(&|name: &str| self.map_with_package(name).into_owned())
            .descriptor())
    }

    /// Gets the rename registered for exactly this field key.
    #[must_use]
    pub fn get_field_mapping(
        &self,
        owner: &str,
        name: &str,
        descriptor: Option<&str>,
    ) -> Option<&str> {
        let key = FieldKeyRef {
            owner,
            name,
            descriptor,
        };
        self.fields.get(&key).map(String::as_str)
    }

    /// Gets the rename registered for exactly this method key.
    #[must_use]
    pub fn get_method_mapping(&self, owner: &str, name: &str, descriptor: &str) -> Option<&str> {
        let key = MethodKeyRef {
            owner,
            name,
            descriptor,
        };
        self.methods.get(&key).map(String::as_str)
    }

    /// Checks if a rename is registered for exactly this field key.
    #[must_use]
    pub fn has_field_mapping(&self, owner: &str, name: &str, descriptor: Option<&str>) -> bool {
        self.get_field_mapping(owner, name, descriptor).is_some()
    }

    /// Checks if a rename is registered for exactly this method key.
    #[must_use]
    pub fn has_method_mapping(&self, owner: &str, name: &str, descriptor: &str) -> bool {
        self.get_method_mapping(owner, name, descriptor).is_some()
    }

    /// Returns every class name used as a key or value of the class table or as the owner of a
    /// field or method rename, in insertion order.
    #[must_use]
    pub fn all_mentioned_classes(&self) -> IndexSet<&str> {
        let classes = self
            .classes
            .iter()
            .flat_map(|(old, new)| [old.as_str(), new.as_str()]);
        let field_owners = self.fields.keys().map(|it| it.owner.as_str());
        let method_owners = self.methods.keys().map(|it| it.owner.as_str());
        classes.chain(field_owners).chain(method_owners).collect()
    }

    /// Iterates over the package renames.
    pub fn packages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over the class renames.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over the field renames.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.fields.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Iterates over the method renames.
    pub fn methods(&self) -> impl Iterator<Item = (&MethodKey, &str)> {
        self.methods.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Returns the total number of renames in all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len() + self.classes.len() + self.fields.len() + self.methods.len()
    }

    /// Checks if no rename is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<Mappings> for Mappings {
    /// Adds every rename of the other mappings, overwriting existing keys.
    fn extend<T: IntoIterator<Item = Mappings>>(&mut self, iter: T) {
        for other in iter {
            self.packages.extend(other.packages);
            self.classes.extend(other.classes);
            self.fields.extend(other.fields);
            self.methods.extend(other.methods);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::arb_class_name;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unmapped_class_is_identity(class_name in arb_class_name()) {
            let mut mappings = Mappings::new();
            mappings.add_class_mapping("some/Other", "x/Y");
            prop_assume!(class_name != "some/Other");
            assert_eq!(mappings.map(&class_name), class_name);
            assert_eq!(mappings.map_method_name(&class_name, "run", "()V"), "run");
            assert_eq!(mappings.map_field_name(&class_name, "f", "I"), "f");
        }
    }

    #[test]
    fn last_write_wins() {
        let mut mappings = Mappings::new();
        assert_eq!(mappings.add_class_mapping("a", "b"), None);
        assert_eq!(mappings.add_class_mapping("a", "c"), Some("b".to_owned()));
        assert_eq!(mappings.map("a"), "c");
        mappings.add_method_mapping("a", "e", "()I", "f");
        mappings.add_method_mapping("a", "e", "()I", "g");
        assert_eq!(mappings.map_method_name("a", "e", "()I"), "g");
        assert_eq!(mappings.map_method_name("a", "e", "()J"), "e");
    }

    #[test]
    fn field_lookup_falls_back_to_name_only() {
        let mut mappings = Mappings::new();
        mappings.add_field_mapping("a", "c", None, "d");
        mappings.add_field_mapping("a", "x", Some("J"), "y");
        assert_eq!(mappings.map_field_name("a", "c", "I"), "d");
        assert_eq!(mappings.map_field_name("a", "x", "J"), "y");
        assert_eq!(mappings.map_field_name("a", "x", "I"), "x");
        mappings.add_field_mapping("a", "c", Some("I"), "exact");
        assert_eq!(mappings.map_field_name("a", "c", "I"), "exact");
        assert_eq!(mappings.map_field_name("a", "c", "Z"), "d");
    }

    #[test]
    fn package_longest_prefix() {
        let mut mappings = Mappings::new();
        mappings.add_package_mapping(".", "x");
        mappings.add_package_mapping("net/minecraft", "nm/");
        mappings.add_package_mapping("net/minecraft/client/", "client/");
        assert_eq!(mappings.map_class_package(""), "x/");
        assert_eq!(mappings.map_class_package("net/"), "x/net/");
        assert_eq!(mappings.map_class_package("net/minecraft/"), "nm/");
        assert_eq!(mappings.map_class_package("net/minecraft/world"), "nm/world/");
        assert_eq!(mappings.map_class_package("net/minecraft/client/gui/"), "client/gui/");
    }

    #[test]
    fn package_miss_is_identity() {
        let mut mappings = Mappings::new();
        mappings.add_package_mapping("a/", "b/");
        assert_eq!(mappings.map_class_package("ab/"), "ab/");
        assert_eq!(mappings.map_class_package("c"), "c");
    }

    #[test]
    fn root_package_only_affects_qualified_rewrites() {
        let mut mappings = Mappings::new();
        mappings.add_package_mapping("", "x/");
        mappings.add_class_mapping("a", "b");
        assert_eq!(mappings.map("Main"), "Main");
        assert_eq!(mappings.map_with_package("Main"), "x/Main");
        assert_eq!(mappings.map_with_package("a"), "b");
        assert_eq!(mappings.map_class_package(""), "x/");
    }

    #[test]
    fn descriptors() {
        let mut mappings = Mappings::new();
        mappings.add_class_mapping("a", "b");
        mappings.add_package_mapping("p/", "q/");
        assert_eq!(
            mappings.map_method_descriptor("(La;[Lp/C;I)La;"),
            Ok("(Lb;[Lq/C;I)Lb;".to_owned())
        );
        assert_eq!(mappings.map_descriptor("[[La;"), Ok("[[Lb;".to_owned()));
        assert!(mappings.map_descriptor("La").is_err());
    }

    #[test]
    fn mentioned_classes() {
        let mut mappings = Mappings::new();
        mappings.add_class_mapping("a", "b");
        mappings.add_field_mapping("c", "f", None, "g");
        mappings.add_method_mapping("a", "m", "()V", "n");
        mappings.add_method_mapping("d", "m", "()V", "n");
        mappings.add_package_mapping("p", "q");
        let mentioned: Vec<_> = mappings.all_mentioned_classes().into_iter().collect();
        assert_eq!(mentioned, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn extend_overwrites() {
        let mut first = Mappings::new();
        first.add_class_mapping("a", "b");
        first.add_class_mapping("c", "d");
        let mut second = Mappings::new();
        second.add_class_mapping("a", "z");
        first.extend([second]);
        assert_eq!(first.map("a"), "z");
        assert_eq!(first.map("c"), "d");
        assert_eq!(first.len(), 2);
        assert!(!first.is_empty());
    }
}
