//! ProGuard / R8 `mapping.txt` files.
//!
//! ```text
//! com.example.Foo -> a:
//!     int count -> b
//!     12:14:java.lang.String name(int,java.lang.Object[]):30:32 -> c
//! ```
//!
//! Names are Java source names; they are converted to binary names and descriptors. Frames of
//! inlined methods, which share the line range and new name of the entry that follows them, are
//! skipped.

use std::io::BufRead;

use super::{
    MappingError, MappingParser, Mappings,
    line::{Line, numbered, read_lines},
};
use crate::types::{Descriptor, FieldType, MethodDescriptor};

const FORMAT: &str = "ProGuard";

/// Parser of ProGuard mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProguardParser;

/// Splits the leading `start:end:` line range off a method entry.
fn split_line_range(entry: &str) -> (Option<&str>, &str) {
    if entry.starts_with(|c: char| c.is_ascii_digit()) {
        let mut separators = entry.match_indices(':').map(|(index, _)| index);
        if let (Some(_), Some(end)) = (separators.next(), separators.next()) {
            return (Some(&entry[..end]), &entry[end + 1..]);
        }
    }
    (None, entry)
}

/// The obfuscated line range and name of a method entry. R8 writes the frames of inlined
/// methods as consecutive entries sharing both, with the outermost frame last.
fn frame_key<'a>(line: &Line<'a>) -> Option<(&'a str, &'a str)> {
    let (entry, new_name) = line.text.trim().split_once(" -> ")?;
    let (range, _) = split_line_range(entry.trim());
    Some((range?, new_name.trim()))
}

fn binary_name(java_name: &str) -> String {
    java_name.replace('.', "/")
}

impl ProguardParser {
    fn parse_class(line: &Line<'_>, mappings: &mut Mappings) -> Result<String, MappingError> {
        let header = line
            .text
            .trim_end()
            .strip_suffix(':')
            .ok_or_else(|| line.malformed("class header must end with `:`"))?;
        let (old, new) = header
            .split_once(" -> ")
            .ok_or_else(|| line.malformed("expected `old -> new:`"))?;
        let (old, new) = (old.trim(), new.trim());
        if old.is_empty() || new.is_empty() {
            return Err(line.malformed("empty class name"));
        }
        let old = binary_name(old);
        mappings.add_class_mapping(old.clone(), binary_name(new));
        Ok(old)
    }

    fn parse_member(
        line: &Line<'_>,
        owner: &str,
        mappings: &mut Mappings,
    ) -> Result<(), MappingError> {
        let (entry, new_name) = line
            .text
            .trim()
            .split_once(" -> ")
            .ok_or_else(|| line.malformed("expected `type name -> new`"))?;
        let new_name = new_name.trim();
        let (_, member) = split_line_range(entry.trim());
        let (java_type, signature) = member
            .split_once(' ')
            .ok_or_else(|| line.malformed("expected a type and a name"))?;
        let signature = signature.trim();
        if new_name.is_empty() || signature.is_empty() {
            return Err(line.malformed("empty member name"));
        }
        if let Some((name, rest)) = signature.split_once('(') {
            let (parameters, _) = rest
                .split_once(')')
                .ok_or_else(|| line.malformed("unterminated parameter list"))?;
            if name.contains('.') {
                tracing::trace!(line = line.number, "skipping inlined method {name}");
                return Ok(());
            }
            let descriptor = MethodDescriptor::from_java_signature(java_type, parameters)
                .map_err(|_| line.invalid_descriptor(&format!("{java_type} ({parameters})")))?;
            mappings.add_method_mapping(owner, name, descriptor.descriptor(), new_name);
        } else {
            if signature.contains('.') {
                tracing::trace!(line = line.number, "skipping qualified field {signature}");
                return Ok(());
            }
            let field_type = FieldType::from_java_name(java_type)
                .map_err(|_| line.invalid_descriptor(java_type))?;
            let descriptor = field_type.descriptor();
            mappings.add_field_mapping(owner, signature, Some(descriptor.as_str()), new_name);
        }
        Ok(())
    }
}

impl MappingParser for ProguardParser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError> {
        let content = read_lines(reader)?;
        let mut mappings = Mappings::new();
        let mut current_class: Option<String> = None;
        let mut lines = numbered(FORMAT, &content)
            .filter(|it| !it.is_blank_or_comment())
            .peekable();
        while let Some(line) = lines.next() {
            if line.text.starts_with(char::is_whitespace) {
                let owner = current_class
                    .as_deref()
                    .ok_or_else(|| line.malformed("member outside of a class"))?;
                let inlined = frame_key(&line)
                    .is_some_and(|key| lines.peek().and_then(frame_key) == Some(key));
                if inlined {
                    tracing::trace!(line = line.number, "skipping inlined frame");
                    continue;
                }
                Self::parse_member(&line, owner, &mut mappings)?;
            } else {
                current_class = Some(Self::parse_class(&line, &mut mappings)?);
            }
        }
        tracing::debug!(entries = mappings.len(), "loaded {FORMAT} mappings");
        Ok(mappings)
    }
}
