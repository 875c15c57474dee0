//! Searge `.srg` mappings.
//!
//! ```text
//! PK: . net/minecraft/src
//! CL: a net/minecraft/src/Block
//! FD: a/b net/minecraft/src/Block/blockID
//! MD: a/c (La;)V net/minecraft/src/Block/tick (Lnet/minecraft/src/Block;)V
//! ```
//!
//! The extended flavour carrying field descriptors (`FD: a/b I Block/blockID I`) is accepted
//! as well.

use std::io::BufRead;

use super::{
    MappingError, MappingParser, Mappings,
    line::{Line, numbered, read_lines, split_member_path},
};

const FORMAT: &str = "SRG";

/// Parser of SRG mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrgParser;

fn member_path<'a>(line: &Line<'_>, path: &'a str) -> Result<(&'a str, &'a str), MappingError> {
    split_member_path(path).ok_or_else(|| line.malformed("expected `owner/name`"))
}

fn parse_record(line: &Line<'_>, mappings: &mut Mappings) -> Result<(), MappingError> {
    let (kind, rest) = line
        .text
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| line.malformed("missing record body"))?;
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    match (kind, tokens.as_slice()) {
        ("PK:", [old, new]) => {
            mappings.add_package_mapping(old, new);
        }
        ("CL:", [old, new]) => {
            mappings.add_class_mapping(*old, *new);
        }
        ("FD:", [old, new]) => {
            let (owner, name) = member_path(line, old)?;
            let (_, new_name) = member_path(line, new)?;
            mappings.add_field_mapping(owner, name, None, new_name);
        }
        ("FD:", [old, descriptor, new, _]) => {
            let descriptor = line.checked_field_descriptor(descriptor)?;
            let (owner, name) = member_path(line, old)?;
            let (_, new_name) = member_path(line, new)?;
            mappings.add_field_mapping(owner, name, Some(descriptor.as_str()), new_name);
        }
        ("MD:", [old, descriptor, new, new_descriptor]) => {
            let descriptor = line.checked_method_descriptor(descriptor)?;
            line.method_descriptor(new_descriptor)?;
            let (owner, name) = member_path(line, old)?;
            let (_, new_name) = member_path(line, new)?;
            mappings.add_method_mapping(owner, name, descriptor, new_name);
        }
        ("PK:" | "CL:" | "FD:" | "MD:", _) => {
            return Err(line.malformed("wrong number of tokens"));
        }
        _ => return Err(line.malformed("unknown record")),
    }
    Ok(())
}

impl MappingParser for SrgParser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError> {
        let lines = read_lines(reader)?;
        let mut mappings = Mappings::new();
        for line in numbered(FORMAT, &lines) {
            if line.is_blank_or_comment() {
                continue;
            }
            parse_record(&line, &mut mappings)?;
        }
        tracing::debug!(entries = mappings.len(), "loaded {FORMAT} mappings");
        Ok(mappings)
    }
}
