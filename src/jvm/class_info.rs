//! The shape of a JVM class as seen by hierarchy analyses.

use std::borrow::Borrow;

use bitflags::bitflags;

use super::{OBJECT_CLASS, references::ClassRef};
use crate::{
    macros::see_jvm_spec,
    types::{field_type::FieldType, method_descriptor::MethodDescriptor},
};

/// The metadata of a class: its name, modifiers, direct super types and declared members.
///
/// A [`ClassInfo`] only records the names of its super class and interfaces.
/// The linked [`ClassInfo`]s are resolved on demand through a
/// [`ClassInfoProvider`](super::class_loader::ClassInfoProvider), see
/// [`type_hierarchy`](crate::analysis::type_hierarchy).
#[doc = see_jvm_spec!(4, 1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// The binary name of the class (e.g., `org/mokapot/jvm/Class`).
    pub binary_name: String,
    /// The access modifiers of the class.
    pub access_flags: AccessFlags,
    /// A reference to the superclass of the class.
    /// The class `java/lang/Object` has no superclass, so this field is `None` for that class.
    pub super_class: Option<ClassRef>,
    /// The interfaces implemented by the class, in declaration order.
    pub interfaces: Vec<ClassRef>,
    /// The fields declared in the class.
    pub fields: Vec<FieldInfo>,
    /// The methods declared in the class.
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    /// Creates a public class extending `super_class` with no interfaces and no members.
    #[must_use]
    pub fn new(binary_name: impl Into<String>, super_class: Option<&str>) -> Self {
        Self {
            binary_name: binary_name.into(),
            access_flags: AccessFlags::PUBLIC | AccessFlags::SUPER,
            super_class: super_class.map(ClassRef::new),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Creates the metadata of `java/lang/Object`.
    #[must_use]
    pub fn object() -> Self {
        Self::new(OBJECT_CLASS, None)
    }

    /// Creates a public interface. Interfaces extend `java/lang/Object` in class files.
    #[must_use]
    pub fn interface(binary_name: impl Into<String>) -> Self {
        Self::new(binary_name, Some(OBJECT_CLASS))
            .with_access_flags(AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT)
    }

    /// Replaces the access flags.
    #[must_use]
    pub fn with_access_flags(mut self, access_flags: AccessFlags) -> Self {
        self.access_flags = access_flags;
        self
    }

    /// Appends implemented interfaces.
    #[must_use]
    pub fn with_interfaces<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interfaces
            .extend(interfaces.into_iter().map(ClassRef::new));
        self
    }

    /// Appends a declared field.
    #[must_use]
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a declared method.
    #[must_use]
    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// Gets a method of the class by its name and descriptor.
    #[must_use]
    pub fn get_method<D>(&self, name: &str, descriptor: D) -> Option<&MethodInfo>
    where
        D: Borrow<MethodDescriptor>,
    {
        self.methods
            .iter()
            .find(|m| m.name == name && &m.descriptor == descriptor.borrow())
    }

    /// Gets a field of the class by its name and type.
    #[must_use]
    pub fn get_field<T>(&self, name: &str, field_type: T) -> Option<&FieldInfo>
    where
        T: Borrow<FieldType>,
    {
        self.fields
            .iter()
            .find(|f| f.name == name && &f.field_type == field_type.borrow())
    }

    /// Gets the first field of the class with the given name, regardless of its type.
    #[must_use]
    pub fn get_field_by_name(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Creates a [`ClassRef`] referring to the class.
    #[must_use]
    pub fn make_ref(&self) -> ClassRef {
        ClassRef::new(self.binary_name.clone())
    }

    /// Checks if the class is an interface.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        self.access_flags.contains(AccessFlags::INTERFACE)
    }

    /// Checks if the class is an abstract class.
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.access_flags.contains(AccessFlags::ABSTRACT)
    }

    /// Checks if this is the root of the class hierarchy, i.e., it has no superclass.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.super_class.is_none()
    }
}

/// A field declared in a class.
#[doc = see_jvm_spec!(4, 5)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// The access flags of the field.
    pub access_flags: FieldAccessFlags,
    /// The name of the field.
    pub name: String,
    /// The type of the field.
    pub field_type: FieldType,
}

impl FieldInfo {
    /// Creates a public field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            access_flags: FieldAccessFlags::PUBLIC,
            name: name.into(),
            field_type,
        }
    }

    /// Replaces the access flags.
    #[must_use]
    pub fn with_access_flags(mut self, access_flags: FieldAccessFlags) -> Self {
        self.access_flags = access_flags;
        self
    }

    /// Checks if the field is visible to subclasses.
    #[must_use]
    pub const fn is_inheritable(&self) -> bool {
        !self.access_flags.contains(FieldAccessFlags::PRIVATE)
    }
}

/// A method declared in a class.
#[doc = see_jvm_spec!(4, 6)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    /// The access flags of the method.
    pub access_flags: MethodAccessFlags,
    /// The name of the method.
    pub name: String,
    /// The descriptor of the method. The parameter types are available from it.
    pub descriptor: MethodDescriptor,
}

impl MethodInfo {
    /// The name of the constructor method.
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    /// The name of the class initialization method.
    pub const CLASS_INITIALIZER_NAME: &'static str = "<clinit>";

    /// Creates a public method.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Self {
            access_flags: MethodAccessFlags::PUBLIC,
            name: name.into(),
            descriptor,
        }
    }

    /// Replaces the access flags.
    #[must_use]
    pub fn with_access_flags(mut self, access_flags: MethodAccessFlags) -> Self {
        self.access_flags = access_flags;
        self
    }

    /// Checks if the method is a constructor or a class initializer.
    #[must_use]
    pub fn is_initializer(&self) -> bool {
        self.name == Self::CONSTRUCTOR_NAME || self.name == Self::CLASS_INITIALIZER_NAME
    }

    /// Checks if a reference through a subclass can resolve to this method.
    #[must_use]
    pub fn is_inheritable(&self) -> bool {
        !self.access_flags.contains(MethodAccessFlags::PRIVATE) && !self.is_initializer()
    }
}

bitflags! {
    /// The access flags of a [`ClassInfo`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct AccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Marked `private` in source.
        /// NOTE: The is not mentioned in the JVM Specification. However it is set in some class
        /// files, event for those in the JDK.
        const PRIVATE = 0x0002;
        /// Declared `final`; no subclasses allowed.
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by the invokespecial instruction.
        const SUPER = 0x0020;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared `abstract`; must not be instantiated.
        const ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface.
        const ANNOTATION = 0x2000;
        /// Declared as an enum class.
        const ENUM = 0x4000;
        /// Is a module, not a class or interface.
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// The access flags of a [`FieldInfo`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct FieldAccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `private`; accessible only within the defining class and other classes belonging to the same nest.
        const PRIVATE = 0x0002;
        /// Declared `protected`; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`; never directly assigned to after object construction.
        const FINAL = 0x0010;
        /// Declared `volatile`; cannot be cached.
        const VOLATILE = 0x0040;
        /// Declared `transient`; not written or read by a persistent object manager.
        const TRANSIENT = 0x0080;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an element of an `enum` class.
        const ENUM = 0x4000;
    }
}

bitflags! {
    /// The access flags of a [`MethodInfo`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct MethodAccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `private`; accessible only within the defining class and other classes belonging to the same nest.
        const PRIVATE = 0x0002;
        /// Declared `protected`; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`; must not be overridden.
        const FINAL = 0x0010;
        /// Declared `synchronized`; invocation is wrapped by a monitor use.
        const SYNCHRONIZED = 0x0020;
        /// A bridge method, generated by the compiler.
        const BRIDGE = 0x0040;
        /// Declared with variable number of arguments.
        const VARARGS = 0x0080;
        /// Declared `native`; implemented in a language other than Java.
        const NATIVE = 0x0100;
        /// Declared `abstract`; no implementation is provided.
        const ABSTRACT = 0x0400;
        /// In a class file whose major version number is at least 46 and at most 60, declared `strictfp`.
        const STRICT = 0x0800;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let descriptor = "(I)V".parse().unwrap();
        let class = ClassInfo::new("org/pkg/MyClass", Some(OBJECT_CLASS))
            .with_interfaces(["java/io/Closeable"])
            .with_field(FieldInfo::new("count", FieldType::Base(crate::types::PrimitiveType::Int)))
            .with_method(MethodInfo::new("run", descriptor));
        assert!(!class.is_interface());
        assert!(!class.is_root());
        assert_eq!(class.interfaces, vec![ClassRef::new("java/io/Closeable")]);
        assert!(class.get_field_by_name("count").is_some());
        let run: MethodDescriptor = "(I)V".parse().unwrap();
        assert!(class.get_method("run", &run).is_some());
        assert!(class.get_method("run", "()V".parse::<MethodDescriptor>().unwrap()).is_none());
    }

    #[test]
    fn object_is_root() {
        assert!(ClassInfo::object().is_root());
        assert!(ClassInfo::interface("java/lang/Runnable").is_interface());
    }

    #[test]
    fn inheritable_methods() {
        let descriptor: MethodDescriptor = "()V".parse().unwrap();
        let init = MethodInfo::new(MethodInfo::CONSTRUCTOR_NAME, descriptor.clone());
        let hidden = MethodInfo::new("hidden", descriptor.clone())
            .with_access_flags(MethodAccessFlags::PRIVATE);
        let helper = MethodInfo::new("helper", descriptor)
            .with_access_flags(MethodAccessFlags::PROTECTED | MethodAccessFlags::STATIC);
        assert!(!init.is_inheritable());
        assert!(!hidden.is_inheritable());
        assert!(helper.is_inheritable());
    }
}
