use std::io::Read;

use super::{
    ClassFileParsingError,
    reader_utils::{ValueReaderExt, read_byte_chunk, skip_bytes},
};
use crate::{jvm::references::ClassRef, macros::see_jvm_spec};

/// The constant pool entries needed to recover the shape of a class.
/// Entries that only matter to instructions are kept as their kind.
#[doc = see_jvm_spec!(4, 4)]
#[derive(Debug)]
pub(crate) struct ConstantPool {
    entries: Vec<Option<ConstantPoolEntry>>,
}

#[derive(Debug, Clone)]
pub(crate) enum ConstantPoolEntry {
    Utf8(String),
    BrokenUtf8,
    Class { name_index: u16 },
    Other(&'static str),
}

impl ConstantPool {
    pub(super) fn parse<R: Read>(reader: &mut R) -> Result<Self, ClassFileParsingError> {
        let count: u16 = reader.read_value()?;
        let mut entries = vec![None; count as usize];
        let mut counter: u16 = 1;
        while counter < count {
            let tag: u8 = reader.read_value()?;
            let entry = ConstantPoolEntry::parse(tag, reader)?;
            entries[counter as usize] = Some(entry);
            // Long and Double take up two slots.
            counter += if matches!(tag, 5 | 6) { 2 } else { 1 };
        }
        Ok(Self { entries })
    }

    fn get_entry(&self, index: u16) -> Result<&ConstantPoolEntry, ClassFileParsingError> {
        self.entries
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(ClassFileParsingError::BadConstantPoolIndex(index))
    }

    pub(super) fn get_str(&self, index: u16) -> Result<&str, ClassFileParsingError> {
        match self.get_entry(index)? {
            ConstantPoolEntry::Utf8(string) => Ok(string.as_str()),
            ConstantPoolEntry::BrokenUtf8 => Err(ClassFileParsingError::BrokenUTF8),
            entry => Err(ClassFileParsingError::MismatchedConstantPoolEntryType {
                expected: "CONSTANT_Utf8",
                found: entry.constant_kind(),
            }),
        }
    }

    pub(super) fn get_class_ref(&self, index: u16) -> Result<ClassRef, ClassFileParsingError> {
        let entry = self.get_entry(index)?;
        let &ConstantPoolEntry::Class { name_index } = entry else {
            return Err(ClassFileParsingError::MismatchedConstantPoolEntryType {
                expected: "CONSTANT_Class",
                found: entry.constant_kind(),
            });
        };
        self.get_str(name_index).map(ClassRef::new)
    }
}

impl ConstantPoolEntry {
    fn parse<R: Read>(tag: u8, reader: &mut R) -> Result<Self, ClassFileParsingError> {
        let entry = match tag {
            1 => {
                let length: u16 = reader.read_value()?;
                let content = read_byte_chunk(reader, length as usize)?;
                match cesu8::from_java_cesu8(content.as_slice()) {
                    Ok(result) => Self::Utf8(result.into_owned()),
                    Err(_) => Self::BrokenUtf8,
                }
            }
            7 => Self::Class {
                name_index: reader.read_value()?,
            },
            3 | 4 => Self::skip(reader, 4, "CONSTANT_Integer/Float")?,
            5 | 6 => Self::skip(reader, 8, "CONSTANT_Long/Double")?,
            8 => Self::skip(reader, 2, "CONSTANT_String")?,
            9..=11 => Self::skip(reader, 4, "CONSTANT_Fieldref/Methodref")?,
            12 => Self::skip(reader, 4, "CONSTANT_NameAndType")?,
            15 => Self::skip(reader, 3, "CONSTANT_MethodHandle")?,
            16 => Self::skip(reader, 2, "CONSTANT_MethodType")?,
            17 | 18 => Self::skip(reader, 4, "CONSTANT_Dynamic/InvokeDynamic")?,
            19 => Self::skip(reader, 2, "CONSTANT_Module")?,
            20 => Self::skip(reader, 2, "CONSTANT_Package")?,
            it => return Err(ClassFileParsingError::UnexpectedConstantPoolTag(it)),
        };
        Ok(entry)
    }

    fn skip<R: Read>(
        reader: &mut R,
        len: u64,
        kind: &'static str,
    ) -> Result<Self, ClassFileParsingError> {
        skip_bytes(reader, len)?;
        Ok(Self::Other(kind))
    }

    const fn constant_kind(&self) -> &'static str {
        match self {
            Self::Utf8(_) | Self::BrokenUtf8 => "CONSTANT_Utf8",
            Self::Class { .. } => "CONSTANT_Class",
            Self::Other(kind) => *kind,
        }
    }
}
