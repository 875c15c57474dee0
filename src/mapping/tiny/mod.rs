//! Tiny mappings, versions 1 and 2.
//!
//! A Tiny file declares a list of namespaces in its header and gives the name of every class
//! and member in each of them. Member owners and descriptors are written in the first
//! namespace; they are translated into the source namespace of the requested pair.

use std::collections::HashMap;

use super::{MappingError, Mappings};
use crate::types::{Descriptor, FieldType, MethodDescriptor};

mod v1;
mod v2;

pub use v1::TinyV1Parser;
pub use v2::TinyV2Parser;

/// The source and target namespace of a Tiny file, e.g. `official` to `named`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacePair {
    /// The namespace of the original names.
    pub from: String,
    /// The namespace of the new names.
    pub to: String,
}

impl NamespacePair {
    /// Creates a namespace pair.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Finds the columns of the requested namespaces. Without a request, the first two namespaces
/// of the header are used.
fn resolve_columns(
    namespaces: &[&str],
    requested: Option<&NamespacePair>,
    format: &'static str,
) -> Result<(usize, usize), MappingError> {
    let column_of = |namespace: &str| {
        namespaces
            .iter()
            .position(|it| *it == namespace)
            .ok_or_else(|| MappingError::UnknownNamespace(namespace.to_owned()))
    };
    match requested {
        Some(pair) => Ok((column_of(&pair.from)?, column_of(&pair.to)?)),
        None if namespaces.len() >= 2 => Ok((0, 1)),
        None => Err(MappingError::MissingHeader(format)),
    }
}

#[derive(Debug)]
enum MemberDescriptor {
    Field(FieldType),
    Method(MethodDescriptor),
}

#[derive(Debug)]
struct PendingMember {
    owner: String,
    descriptor: MemberDescriptor,
    from_name: String,
    to_name: String,
}

/// Collects Tiny records and translates member owners and descriptors once every class is
/// known.
#[derive(Debug)]
struct TinyBuilder {
    namespace_count: usize,
    from: usize,
    to: usize,
    first_to_source: HashMap<String, String>,
    mappings: Mappings,
    members: Vec<PendingMember>,
}

impl TinyBuilder {
    fn new(namespace_count: usize, (from, to): (usize, usize)) -> Self {
        Self {
            namespace_count,
            from,
            to,
            first_to_source: HashMap::new(),
            mappings: Mappings::new(),
            members: Vec::new(),
        }
    }

    /// Returns the source and target names of a record, or `None` if the record has an
    /// unexpected number of names. A missing source name falls back to the first namespace.
    fn names<'a, S: AsRef<str>>(&self, names: &'a [S]) -> Option<(&'a str, &'a str, &'a str)> {
        if names.is_empty() || names.len() > self.namespace_count {
            return None;
        }
        let column = |index: usize| names.get(index).map_or("", |it| it.as_ref());
        let first = column(0);
        let from = match column(self.from) {
            "" => first,
            it => it,
        };
        Some((first, from, column(self.to)))
    }

    fn add_class<S: AsRef<str>>(&mut self, names: &[S]) -> bool {
        let Some((first, from, to)) = self.names(names) else {
            return false;
        };
        if first != from {
            self.first_to_source.insert(first.to_owned(), from.to_owned());
        }
        if !to.is_empty() {
            self.mappings.add_class_mapping(from, to);
        }
        true
    }

    fn add_member<S: AsRef<str>>(
        &mut self,
        owner: &str,
        descriptor: MemberDescriptor,
        names: &[S],
    ) -> bool {
        let Some((_, from, to)) = self.names(names) else {
            return false;
        };
        if !to.is_empty() {
            self.members.push(PendingMember {
                owner: owner.to_owned(),
                descriptor,
                from_name: from.to_owned(),
                to_name: to.to_owned(),
            });
        }
        true
    }

    fn finish(self) -> Mappings {
        let Self {
            first_to_source,
            mut mappings,
            members,
            ..
        } = self;
        let translate = |name: &str| {
            first_to_source
                .get(name)
                .map_or_else(|| name.to_owned(), Clone::clone)
        };
        for member in members {
            let owner = translate(member.owner.as_str());
            match member.descriptor {
                MemberDescriptor::Field(field_type) => {
                    let descriptor = field_type.map_class_names(&translate).descriptor();
                    mappings.add_field_mapping(
                        owner,
                        member.from_name,
                        Some(descriptor.as_str()),
                        member.to_name,
                    );
                }
                MemberDescriptor::Method(method_descriptor) => {
                    let descriptor = method_descriptor.map_class_names(&translate).descriptor();
                    mappings.add_method_mapping(owner, member.from_name, descriptor, member.to_name);
                }
            }
        }
        mappings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns() {
        let namespaces = ["official", "intermediary", "named"];
        assert_eq!(resolve_columns(&namespaces, None, "Tiny").unwrap(), (0, 1));
        let pair = NamespacePair::new("intermediary", "named");
        assert_eq!(resolve_columns(&namespaces, Some(&pair), "Tiny").unwrap(), (1, 2));
        let pair = NamespacePair::new("official", "mojang");
        assert!(matches!(
            resolve_columns(&namespaces, Some(&pair), "Tiny"),
            Err(MappingError::UnknownNamespace(ns)) if ns == "mojang"
        ));
        assert!(matches!(
            resolve_columns(&["official"], None, "Tiny"),
            Err(MappingError::MissingHeader(_))
        ));
    }

    #[test]
    fn members_are_translated_into_the_source_namespace() {
        let mut builder = TinyBuilder::new(3, (1, 2));
        assert!(builder.add_class(&["a", "class_1", "Foo"]));
        assert!(builder.add_class(&["b", "class_2", ""]));
        let descriptor = MemberDescriptor::Method("(La;)Lb;".parse().unwrap());
        assert!(builder.add_member("a", descriptor, &["c", "method_1", "run"]));
        assert!(!builder.add_class(&["x", "y", "z", "w"]));
        let mappings = builder.finish();
        assert_eq!(mappings.map("class_1"), "Foo");
        assert_eq!(mappings.map("class_2"), "class_2");
        assert_eq!(
            mappings.map_method_name("class_1", "method_1", "(Lclass_1;)Lclass_2;"),
            "run"
        );
    }
}
