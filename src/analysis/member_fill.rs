//! Propagating member renames along the class hierarchy.
//!
//! Mapping files usually rename a virtual member only on the class introducing it. A reference
//! to the member through a subclass, or an override in a subclass, must be renamed the same
//! way. [`fill_all_super_members`] adds the missing entries:
//!
//! - for every mapped member, each super type declaring the same member receives the same new
//!   name, and
//! - every class in scope receives the new names of the inheritable members its super types
//!   declare, the nearest super type first.
//!
//! Explicit entries are never overwritten, and both directions are repeated until nothing
//! changes, so filling twice gives the same mappings as filling once.

use std::{collections::HashMap, sync::Arc};

use indexmap::IndexSet;

use super::type_hierarchy::recursive_resolve_super_classes;
use crate::{
    jvm::{
        ClassInfo,
        class_loader::{ClassInfoProvider, ClassLoadingError},
    },
    mapping::{FieldKey, MethodKey, Mappings},
    types::Descriptor,
};

/// What a fill added to the mappings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillSummary {
    /// The number of rounds until no entry was added, including the last one.
    pub rounds: usize,
    /// The number of field entries added.
    pub fields_added: usize,
    /// The number of method entries added.
    pub methods_added: usize,
}

impl FillSummary {
    /// The total number of entries added.
    #[must_use]
    pub const fn added(&self) -> usize {
        self.fields_added + self.methods_added
    }
}

/// Fills inherited member renames for every owner of a member rename in `mappings` and every
/// class the provider can enumerate.
///
/// # Errors
/// The first failure to resolve a super type. `mappings` is left unchanged in that case.
pub fn fill_all_super_members<P>(
    mappings: &mut Mappings,
    provider: &P,
) -> Result<FillSummary, ClassLoadingError>
where
    P: ClassInfoProvider + ?Sized,
{
    fill_super_members(mappings, provider, std::iter::empty::<&str>())
}

/// Same as [`fill_all_super_members`], additionally filling the given classes.
///
/// # Errors
/// See [`fill_all_super_members`].
pub fn fill_super_members<P, I>(
    mappings: &mut Mappings,
    provider: &P,
    classes: I,
) -> Result<FillSummary, ClassLoadingError>
where
    P: ClassInfoProvider + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut scope: IndexSet<String> = IndexSet::new();
    scope.extend(provider.class_names()?);
    scope.extend(classes.into_iter().map(|it| it.as_ref().to_owned()));
    let mut filler = Filler {
        provider,
        ancestors: HashMap::new(),
    };
    let mut staged = mappings.clone();
    let summary = filler.fill(&mut staged, scope)?;
    *mappings = staged;
    Ok(summary)
}

/// The owners of field and method renames.
fn member_owners(mappings: &Mappings) -> Vec<String> {
    let field_owners = mappings.fields().map(|(key, _)| key.owner.as_str());
    let method_owners = mappings.methods().map(|(key, _)| key.owner.as_str());
    field_owners.chain(method_owners).map(str::to_owned).collect()
}

struct Filler<'p, P: ?Sized> {
    provider: &'p P,
    ancestors: HashMap<String, Arc<[Arc<ClassInfo>]>>,
}

impl<P: ClassInfoProvider + ?Sized> Filler<'_, P> {
    fn fill(
        &mut self,
        mappings: &mut Mappings,
        mut scope: IndexSet<String>,
    ) -> Result<FillSummary, ClassLoadingError> {
        let mut summary = FillSummary::default();
        loop {
            summary.rounds += 1;
            scope.extend(member_owners(mappings));
            let (fields_up, methods_up) = self.fill_upward(mappings)?;
            let (fields_down, methods_down) = self.fill_downward(mappings, &scope)?;
            let (fields, methods) = (fields_up + fields_down, methods_up + methods_down);
            tracing::debug!(
                round = summary.rounds,
                fields,
                methods,
                "filled inherited member mappings"
            );
            summary.fields_added += fields;
            summary.methods_added += methods;
            if fields + methods == 0 {
                return Ok(summary);
            }
        }
    }

    /// The super types of a class in breadth-first order.
    fn ancestors_of(&mut self, class: &str) -> Result<Arc<[Arc<ClassInfo>]>, ClassLoadingError> {
        if let Some(ancestors) = self.ancestors.get(class) {
            return Ok(Arc::clone(ancestors));
        }
        let class_info = self.provider.class_info(class)?;
        let ancestors: Arc<[Arc<ClassInfo>]> =
            recursive_resolve_super_classes(self.provider, class_info, false)?
                .into_values()
                .collect();
        self.ancestors.insert(class.to_owned(), Arc::clone(&ancestors));
        Ok(ancestors)
    }

    /// Gives every super type declaring a mapped member the same new name.
    fn fill_upward(&mut self, mappings: &mut Mappings) -> Result<(usize, usize), ClassLoadingError> {
        let fields: Vec<(FieldKey, String)> = mappings
            .fields()
            .map(|(key, new_name)| (key.clone(), new_name.to_owned()))
            .collect();
        let methods: Vec<(MethodKey, String)> = mappings
            .methods()
            .map(|(key, new_name)| (key.clone(), new_name.to_owned()))
            .collect();
        let mut fields_added = 0;
        for (key, new_name) in fields {
            for ancestor in self.ancestors_of(&key.owner)?.iter() {
                let declared = ancestor.fields.iter().any(|field| {
                    field.is_inheritable()
                        && field.name == key.name
                        && key
                            .descriptor
                            .as_ref()
                            .is_none_or(|it| *it == field.field_type.descriptor())
                });
                let owner = ancestor.binary_name.as_str();
                let descriptor = key.descriptor.as_deref();
                if declared && !mappings.has_field_mapping(owner, &key.name, descriptor) {
                    mappings.add_field_mapping(owner, key.name.as_str(), descriptor, new_name.as_str());
                    fields_added += 1;
                }
            }
        }
        let mut methods_added = 0;
        for (key, new_name) in methods {
            for ancestor in self.ancestors_of(&key.owner)?.iter() {
                let declared = ancestor.methods.iter().any(|method| {
                    method.is_inheritable()
                        && method.name == key.name
                        && method.descriptor.descriptor() == key.descriptor
                });
                let owner = ancestor.binary_name.as_str();
                if declared && !mappings.has_method_mapping(owner, &key.name, &key.descriptor) {
                    mappings.add_method_mapping(
                        owner,
                        key.name.as_str(),
                        key.descriptor.as_str(),
                        new_name.as_str(),
                    );
                    methods_added += 1;
                }
            }
        }
        Ok((fields_added, methods_added))
    }

    /// Gives every class in scope the new names of the inheritable members its super types
    /// declare.
    fn fill_downward(
        &mut self,
        mappings: &mut Mappings,
        scope: &IndexSet<String>,
    ) -> Result<(usize, usize), ClassLoadingError> {
        let mut fields_added = 0;
        let mut methods_added = 0;
        for class in scope {
            for ancestor in self.ancestors_of(class)?.iter() {
                let owner = ancestor.binary_name.as_str();
                for field in ancestor.fields.iter().filter(|it| it.is_inheritable()) {
                    let descriptor = field.field_type.descriptor();
                    let Some(new_name) = mappings
                        .get_field_mapping(owner, &field.name, Some(descriptor.as_str()))
                        .or_else(|| mappings.get_field_mapping(owner, &field.name, None))
                        .map(str::to_owned)
                    else {
                        continue;
                    };
                    let present = mappings.has_field_mapping(class, &field.name, Some(descriptor.as_str()))
                        || mappings.has_field_mapping(class, &field.name, None);
                    if !present {
                        mappings.add_field_mapping(
                            class.as_str(),
                            field.name.as_str(),
                            Some(descriptor.as_str()),
                            new_name,
                        );
                        fields_added += 1;
                    }
                }
                for method in ancestor.methods.iter().filter(|it| it.is_inheritable()) {
                    let descriptor = method.descriptor.descriptor();
                    let Some(new_name) = mappings
                        .get_method_mapping(owner, &method.name, &descriptor)
                        .map(str::to_owned)
                    else {
                        continue;
                    };
                    if !mappings.has_method_mapping(class, &method.name, &descriptor) {
                        mappings.add_method_mapping(
                            class.as_str(),
                            method.name.as_str(),
                            descriptor,
                            new_name,
                        );
                        methods_added += 1;
                    }
                }
            }
        }
        Ok((fields_added, methods_added))
    }
}
