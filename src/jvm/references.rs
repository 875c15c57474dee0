//! References to JVM elements.
use std::fmt::Display;

/// A reference to a class by its binary name.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct ClassRef {
    /// The binary name of the class.
    pub binary_name: String,
}

impl ClassRef {
    /// Creates a new [`ClassRef`] from a binary name.
    pub fn new<S: Into<String>>(binary_name: S) -> Self {
        ClassRef {
            binary_name: binary_name.into(),
        }
    }

    /// Returns the package part of the binary name including the trailing `/`, or an empty
    /// string for classes in the root package.
    #[must_use]
    pub fn package(&self) -> &str {
        self.binary_name
            .rfind('/')
            .map_or("", |idx| &self.binary_name[..=idx])
    }

    /// Returns the name of the class without its package.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.binary_name[self.package().len()..]
    }
}

impl Display for ClassRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.binary_name)
    }
}

impl AsRef<str> for ClassRef {
    fn as_ref(&self) -> &str {
        &self.binary_name
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::arb_class_name;

    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn package_and_simple_name(class_name in arb_class_name()) {
            let class = ClassRef::new(class_name.clone());
            let rebuilt = format!("{}{}", class.package(), class.simple_name());
            assert_eq!(rebuilt, class_name);
            assert!(!class.simple_name().contains('/'));
        }
    }

    #[test]
    fn root_package() {
        let class = ClassRef::new("Main");
        assert_eq!(class.package(), "");
        assert_eq!(class.simple_name(), "Main");
    }
}
