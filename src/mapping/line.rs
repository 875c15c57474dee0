//! Line access shared by the mapping parsers.

use std::{io::BufRead, str::FromStr};

use super::MappingError;
use crate::types::{Descriptor, FieldType, MethodDescriptor};

/// Reads the whole stream into lines, without line terminators and byte order mark.
pub(super) fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>, MappingError> {
    let mut lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    if let Some(first) = lines.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_owned();
        }
    }
    Ok(lines)
}

/// Numbers the lines from 1.
pub(super) fn numbered<'a>(
    format: &'static str,
    lines: &'a [String],
) -> impl Iterator<Item = Line<'a>> {
    lines.iter().enumerate().map(move |(index, text)| Line {
        number: index + 1,
        text,
        format,
    })
}

/// Splits an owner-qualified member path such as `a/b/C/name` at the last `/`.
pub(super) fn split_member_path(path: &str) -> Option<(&str, &str)> {
    path.rsplit_once('/')
        .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
}

/// A line of a mapping file.
#[derive(Debug, Clone, Copy)]
pub(super) struct Line<'a> {
    pub(super) number: usize,
    pub(super) text: &'a str,
    format: &'static str,
}

impl Line<'_> {
    pub(super) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub(super) fn is_blank_or_comment(&self) -> bool {
        let trimmed = self.text.trim_start();
        trimmed.is_empty() || trimmed.starts_with('#')
    }

    pub(super) fn malformed(&self, reason: &'static str) -> MappingError {
        MappingError::Malformed {
            format: self.format,
            line: self.number,
            content: self.text.to_owned(),
            reason,
        }
    }

    pub(super) fn invalid_descriptor(&self, descriptor: &str) -> MappingError {
        MappingError::InvalidDescriptor {
            format: self.format,
            line: self.number,
            descriptor: descriptor.to_owned(),
        }
    }

    /// Validates a field descriptor.
    pub(super) fn field_descriptor(&self, descriptor: &str) -> Result<FieldType, MappingError> {
        FieldType::from_str(descriptor).map_err(|_| self.invalid_descriptor(descriptor))
    }

    /// Validates a method descriptor.
    pub(super) fn method_descriptor(
        &self,
        descriptor: &str,
    ) -> Result<MethodDescriptor, MappingError> {
        MethodDescriptor::from_str(descriptor).map_err(|_| self.invalid_descriptor(descriptor))
    }

    /// Validates a field descriptor and returns it in canonical form.
    pub(super) fn checked_field_descriptor(&self, descriptor: &str) -> Result<String, MappingError> {
        self.field_descriptor(descriptor).map(|it| it.descriptor())
    }

    /// Validates a method descriptor and returns it in canonical form.
    pub(super) fn checked_method_descriptor(
        &self,
        descriptor: &str,
    ) -> Result<String, MappingError> {
        self.method_descriptor(descriptor).map(|it| it.descriptor())
    }
}
