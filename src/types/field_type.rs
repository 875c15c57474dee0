//! Non-generic JVM field types.

use std::{fmt::Display, str::FromStr};

use crate::{jvm::references::ClassRef, macros::see_jvm_spec};

use super::{
    Descriptor,
    method_descriptor::{InvalidDescriptor, MethodDescriptor},
};

/// A primitive type in Java.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum PrimitiveType {
    /// The `boolean` type.
    Boolean,
    /// The `char` type.
    Char,
    /// The `float` type.
    Float,
    /// The `double` type.
    Double,
    /// The `byte` type.
    Byte,
    /// The `short` type.
    Short,
    /// The `int` type.
    Int,
    /// The `long` type.
    Long,
}

impl PrimitiveType {
    /// Returns the descriptor character of the primitive type.
    #[must_use]
    pub const fn descriptor_char(self) -> char {
        match self {
            Self::Boolean => 'Z',
            Self::Char => 'C',
            Self::Float => 'F',
            Self::Double => 'D',
            Self::Byte => 'B',
            Self::Short => 'S',
            Self::Int => 'I',
            Self::Long => 'J',
        }
    }

    /// Returns the keyword used for the primitive type in Java source code.
    #[must_use]
    pub const fn java_name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
        }
    }

    /// Looks up a primitive type by its Java keyword.
    #[must_use]
    pub fn from_java_name(name: &str) -> Option<Self> {
        let it = match name {
            "boolean" => Self::Boolean,
            "char" => Self::Char,
            "float" => Self::Float,
            "double" => Self::Double,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            _ => return None,
        };
        Some(it)
    }
}

impl TryFrom<char> for PrimitiveType {
    type Error = InvalidDescriptor;

    fn try_from(descriptor: char) -> Result<Self, Self::Error> {
        match descriptor {
            'Z' => Ok(Self::Boolean),
            'C' => Ok(Self::Char),
            'F' => Ok(Self::Float),
            'D' => Ok(Self::Double),
            'B' => Ok(Self::Byte),
            'S' => Ok(Self::Short),
            'I' => Ok(Self::Int),
            'J' => Ok(Self::Long),
            _ => Err(InvalidDescriptor),
        }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.java_name())
    }
}

/// A field type (non-generic).
#[doc = see_jvm_spec!(4, 3, 2)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum FieldType {
    /// A primitive type.
    Base(PrimitiveType),
    /// A reference type (except arrays).
    Object(ClassRef),
    /// An array type.
    Array(Box<FieldType>),
}

impl FieldType {
    /// Creates an array type with the given type as its elements.
    #[must_use]
    pub fn into_array_type(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// Creates an array type with `dim` dimensions of `element`.
    #[must_use]
    pub fn array_of(element: FieldType, dim: u8) -> Self {
        (0..dim).fold(element, |acc, _| acc.into_array_type())
    }

    /// Parses a type as written in Java source code, e.g. `int`, `java.lang.String[]` or
    /// `java/util/Map$Entry`.
    ///
    /// # Errors
    /// Returns [`InvalidDescriptor`] if the name is empty or has unbalanced array brackets.
    pub fn from_java_name(name: &str) -> Result<Self, InvalidDescriptor> {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            return Self::from_java_name(element).map(Self::into_array_type);
        }
        if name.is_empty() || name.contains(['[', ']', ';', '(', ')']) || name == "void" {
            return Err(InvalidDescriptor);
        }
        let field_type = match PrimitiveType::from_java_name(name) {
            Some(primitive) => Self::Base(primitive),
            None => Self::Object(ClassRef::new(name.replace('.', "/"))),
        };
        Ok(field_type)
    }

    /// Returns a copy of this type with every class name replaced by `rename`.
    #[must_use]
    pub fn map_class_names<F>(&self, rename: &F) -> Self
    where
        F: Fn(&str) -> String + ?Sized,
    {
        match self {
            Self::Base(it) => Self::Base(*it),
            Self::Object(class) => Self::Object(ClassRef::new(rename(class.binary_name.as_str()))),
            Self::Array(element) => element.map_class_names(rename).into_array_type(),
        }
    }
}

impl Descriptor for FieldType {
    fn descriptor(&self) -> String {
        match self {
            Self::Base(it) => it.descriptor_char().to_string(),
            Self::Object(ClassRef { binary_name }) => format!("L{binary_name};"),
            Self::Array(inner) => format!("[{}", inner.descriptor()),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base(it) => it.fmt(f),
            Self::Object(class) => class.fmt(f),
            Self::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

impl FromStr for FieldType {
    type Err = InvalidDescriptor;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let mut chars = descriptor.chars();
        let prefix = chars.next().ok_or(InvalidDescriptor)?;
        let field_type = MethodDescriptor::parse_single_param(prefix, &mut chars)?;
        if chars.next().is_some() {
            Err(InvalidDescriptor)
        } else {
            Ok(field_type)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    use crate::tests::arb_field_type;

    proptest! {
        #[test]
        fn descriptor_parses_back(field_type in arb_field_type()) {
            let parsed = FieldType::from_str(&field_type.descriptor());
            assert_eq!(parsed, Ok(field_type));
        }

        #[test]
        fn primitive_char_roundtrip(primitive in any::<PrimitiveType>()) {
            assert_eq!(PrimitiveType::try_from(primitive.descriptor_char()), Ok(primitive));
        }
    }

    #[test]
    fn java_names() {
        assert_eq!(
            FieldType::from_java_name("int").map(|it| it.descriptor()),
            Ok("I".to_owned())
        );
        assert_eq!(
            FieldType::from_java_name("java.lang.String[][]").map(|it| it.descriptor()),
            Ok("[[Ljava/lang/String;".to_owned())
        );
        assert!(FieldType::from_java_name("void").is_err());
        assert!(FieldType::from_java_name("").is_err());
        assert!(FieldType::from_java_name("int]").is_err());
    }

    #[test]
    fn trailing_characters() {
        assert!(FieldType::from_str("II").is_err());
        assert!(FieldType::from_str("Ljava/lang/Object;I").is_err());
        assert!(FieldType::from_str("[").is_err());
    }

    #[test]
    fn rename_classes() {
        let field_type = FieldType::from_str("[[La/B;").unwrap();
        let renamed = field_type.map_class_names(&|name: &str| format!("x/{name}"));
        assert_eq!(renamed.descriptor(), "[[Lx/a/B;");
        assert_eq!(renamed.to_string(), "x/a/B[][]");
    }
}
