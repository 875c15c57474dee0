//! RetroGuard script `.rgs` mappings.
//!
//! ```text
//! .option Application
//! .class_map a net/minecraft/Block
//! .field_map a/b blockID
//! .method_map a/c (La;)V tick
//! .package_map net/minecraft/server net/minecraft/src
//! ```
//!
//! Obfuscation directives other than the `*_map` ones are skipped.

use std::io::BufRead;

use super::{
    MappingError, MappingParser, Mappings,
    line::{numbered, read_lines, split_member_path},
};

const FORMAT: &str = "RetroGuard";

const IGNORED_DIRECTIVES: [&str; 5] = [".option", ".attribute", ".class", ".field", ".method"];

/// Parser of RetroGuard mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetroguardParser;

impl MappingParser for RetroguardParser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError> {
        let lines = read_lines(reader)?;
        let mut mappings = Mappings::new();
        let mut skipped = 0_usize;
        for line in numbered(FORMAT, &lines) {
            if line.is_blank_or_comment() {
                continue;
            }
            let tokens: Vec<&str> = line.text.split_whitespace().collect();
            let member_path = |path: &str| {
                split_member_path(path)
                    .map(|(owner, name)| (owner.to_owned(), name.to_owned()))
                    .ok_or_else(|| line.malformed("expected `owner/name`"))
            };
            match tokens.as_slice() {
                [".class_map", old, new] => {
                    mappings.add_class_mapping(*old, *new);
                }
                [".package_map", old, new] => {
                    mappings.add_package_mapping(old, new);
                }
                [".field_map", old, new] => {
                    let (owner, name) = member_path(*old)?;
                    mappings.add_field_mapping(owner, name, None, *new);
                }
                [".method_map", old, descriptor, new] => {
                    let descriptor = line.checked_method_descriptor(descriptor)?;
                    let (owner, name) = member_path(*old)?;
                    mappings.add_method_mapping(owner, name, descriptor, *new);
                }
                [".class_map" | ".package_map" | ".field_map" | ".method_map", ..] => {
                    return Err(line.malformed("wrong number of tokens"));
                }
                [directive, ..] if IGNORED_DIRECTIVES.contains(directive) => {
                    skipped += 1;
                }
                _ => return Err(line.malformed("unknown directive")),
            }
        }
        tracing::debug!(entries = mappings.len(), skipped, "loaded {FORMAT} mappings");
        Ok(mappings)
    }
}
