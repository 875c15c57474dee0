//! Reading the header of a class file into a [`ClassInfo`].
//!
//! Only the parts of a class file that describe its shape are decoded: the constant pool,
//! the access flags, the super types and the field and method declarations.
//! Attributes, including the code of methods, are skipped.

mod constant_pool;
mod reader_utils;

use std::io::{self, Read};

use constant_pool::ConstantPool;
use reader_utils::{ValueReaderExt, skip_bytes};

use super::{
    ClassInfo, FieldInfo, MethodInfo,
    class_info::{AccessFlags, FieldAccessFlags, MethodAccessFlags},
};
use crate::{
    macros::see_jvm_spec,
    types::{
        field_type::FieldType,
        method_descriptor::{InvalidDescriptor, MethodDescriptor},
    },
};

const JAVA_CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// An error that occurs when parsing a Java class file.
#[derive(Debug, thiserror::Error)]
pub enum ClassFileParsingError {
    /// An error that occurs when reading from a buffer.
    #[error("Failed to read from buffer: {0}")]
    ReadFail(#[from] io::Error),
    /// The format of the class file is invalid.
    #[error("MalformedClassFile: {0}")]
    MalformedClassFile(&'static str),
    /// The constant pool index does not point to a desired entry.
    #[error("Mismatched constant pool entry, expected {expected}, but found {found}")]
    MismatchedConstantPoolEntryType {
        /// The type of the constant pool entry that was expected.
        expected: &'static str,
        /// The type of the constant pool entry that was found.
        found: &'static str,
    },
    /// The constant pool index does not point to an entry.
    #[error("Bad constant pool index {0}")]
    BadConstantPoolIndex(u16),
    /// The constant pool tag is invalid.
    #[error("Unexpected constant pool tag {0}")]
    UnexpectedConstantPoolTag(u8),
    /// The flags cannot be recognized.
    #[error("Unknown access flag in {1}: {0:#x}")]
    UnknownFlags(u16, &'static str),
    /// The descriptor is invalid.
    #[error("Fail to parse descriptor: {0}")]
    InvalidDescriptor(#[from] InvalidDescriptor),
    /// A string in the constant pool is not valid modified UTF-8.
    #[error("Broken modified UTF-8 string in the constant pool")]
    BrokenUTF8,
}

impl ClassInfo {
    /// Parses the header of a class file from the given reader.
    #[doc = see_jvm_spec!(4, 1)]
    ///
    /// # Errors
    /// See [`ClassFileParsingError`] for more information.
    pub fn from_reader<R>(reader: &mut R) -> Result<Self, ClassFileParsingError>
    where
        R: Read,
    {
        let magic: u32 = reader.read_value()?;
        if magic != JAVA_CLASS_MAGIC {
            return Err(ClassFileParsingError::MalformedClassFile(
                "This is not a Java class file",
            ));
        }
        let _minor_version: u16 = reader.read_value()?;
        let _major_version: u16 = reader.read_value()?;
        let constant_pool = ConstantPool::parse(reader)?;
        let access_flags: u16 = reader.read_value()?;
        let access_flags = AccessFlags::from_bits(access_flags)
            .ok_or(ClassFileParsingError::UnknownFlags(access_flags, "class"))?;
        let this_class: u16 = reader.read_value()?;
        let binary_name = constant_pool.get_class_ref(this_class)?.binary_name;
        let super_class: u16 = reader.read_value()?;
        let super_class = match super_class {
            0 => None,
            index => Some(constant_pool.get_class_ref(index)?),
        };
        let interfaces_count: u16 = reader.read_value()?;
        let interfaces = (0..interfaces_count)
            .map(|_| {
                let index = reader.read_value()?;
                constant_pool.get_class_ref(index)
            })
            .collect::<Result<_, _>>()?;
        let fields_count: u16 = reader.read_value()?;
        let fields = (0..fields_count)
            .map(|_| parse_field(reader, &constant_pool))
            .collect::<Result<_, _>>()?;
        let methods_count: u16 = reader.read_value()?;
        let methods = (0..methods_count)
            .map(|_| parse_method(reader, &constant_pool))
            .collect::<Result<_, _>>()?;
        skip_attributes(reader)?;
        Ok(Self {
            binary_name,
            access_flags,
            super_class,
            interfaces,
            fields,
            methods,
        })
    }

    /// Parses the header of a class file from a byte slice.
    ///
    /// # Errors
    /// See [`ClassFileParsingError`] for more information.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClassFileParsingError> {
        let mut reader = bytes;
        Self::from_reader(&mut reader)
    }
}

#[doc = see_jvm_spec!(4, 5)]
fn parse_field<R: Read>(
    reader: &mut R,
    constant_pool: &ConstantPool,
) -> Result<FieldInfo, ClassFileParsingError> {
    let access_flags: u16 = reader.read_value()?;
    let access_flags = FieldAccessFlags::from_bits(access_flags)
        .ok_or(ClassFileParsingError::UnknownFlags(access_flags, "field"))?;
    let name_index = reader.read_value()?;
    let name = constant_pool.get_str(name_index)?.to_owned();
    let descriptor_index = reader.read_value()?;
    let field_type: FieldType = constant_pool.get_str(descriptor_index)?.parse()?;
    skip_attributes(reader)?;
    Ok(FieldInfo {
        access_flags,
        name,
        field_type,
    })
}

#[doc = see_jvm_spec!(4, 6)]
fn parse_method<R: Read>(
    reader: &mut R,
    constant_pool: &ConstantPool,
) -> Result<MethodInfo, ClassFileParsingError> {
    let access_flags: u16 = reader.read_value()?;
    let access_flags = MethodAccessFlags::from_bits(access_flags)
        .ok_or(ClassFileParsingError::UnknownFlags(access_flags, "method"))?;
    let name_index = reader.read_value()?;
    let name = constant_pool.get_str(name_index)?.to_owned();
    let descriptor_index = reader.read_value()?;
    let descriptor: MethodDescriptor = constant_pool.get_str(descriptor_index)?.parse()?;
    skip_attributes(reader)?;
    Ok(MethodInfo {
        access_flags,
        name,
        descriptor,
    })
}

#[doc = see_jvm_spec!(4, 7)]
fn skip_attributes<R: Read>(reader: &mut R) -> io::Result<()> {
    let attributes_count: u16 = reader.read_value()?;
    for _ in 0..attributes_count {
        let _name_index: u16 = reader.read_value()?;
        let length: u32 = reader.read_value()?;
        skip_bytes(reader, u64::from(length))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jvm::references::ClassRef, tests::ClassFileBuilder};

    #[test]
    fn parse_class_header() {
        let bytes = ClassFileBuilder::new("org/pkg/MyClass", Some("java/lang/Object"))
            .interface("java/lang/Cloneable")
            .field(0x0002, "test", "J")
            .method(0x0001, "<init>", "()V")
            .method(0x0009, "main", "([Ljava/lang/String;)V")
            .build();
        let class = ClassInfo::from_bytes(&bytes).unwrap();
        assert_eq!(class.binary_name, "org/pkg/MyClass");
        assert_eq!(class.access_flags, AccessFlags::PUBLIC | AccessFlags::SUPER);
        assert_eq!(class.super_class, Some(ClassRef::new("java/lang/Object")));
        assert_eq!(class.interfaces, vec![ClassRef::new("java/lang/Cloneable")]);
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.fields[0].field_type.to_string(), "long");
        assert!(!class.fields[0].is_inheritable());
        assert_eq!(class.methods.len(), 2);
        assert_eq!(class.methods[1].descriptor.to_string(), "([Ljava/lang/String;)V");
        assert!(
            class.methods[1]
                .access_flags
                .contains(MethodAccessFlags::STATIC)
        );
    }

    #[test]
    fn parse_root_class() {
        let bytes = ClassFileBuilder::new("java/lang/Object", None).build();
        let class = ClassInfo::from_bytes(&bytes).unwrap();
        assert!(class.is_root());
    }

    #[test]
    fn bad_magic() {
        let mut bytes = ClassFileBuilder::new("a", Some("java/lang/Object")).build();
        bytes[0] = 0x00;
        assert!(matches!(
            ClassInfo::from_bytes(&bytes),
            Err(ClassFileParsingError::MalformedClassFile(_))
        ));
    }

    #[test]
    fn truncated() {
        let bytes = ClassFileBuilder::new("a", Some("java/lang/Object"))
            .method(0x0001, "run", "()V")
            .build();
        assert!(matches!(
            ClassInfo::from_bytes(&bytes[..bytes.len() - 3]),
            Err(ClassFileParsingError::ReadFail(_))
        ));
    }

    #[test]
    fn invalid_descriptor() {
        let bytes = ClassFileBuilder::new("a", Some("java/lang/Object"))
            .method(0x0001, "run", "(V)V")
            .build();
        assert!(matches!(
            ClassInfo::from_bytes(&bytes),
            Err(ClassFileParsingError::InvalidDescriptor(_))
        ));
    }
}
