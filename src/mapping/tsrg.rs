//! Compact Searge `.tsrg` mappings (version 1).
//!
//! ```text
//! net/minecraft/ net/minecraft/
//! a net/minecraft/Block
//! 	b blockID
//! 	c (La;)V tick
//! ```

use std::io::BufRead;

use super::{
    MappingError, MappingParser, Mappings,
    line::{numbered, read_lines},
};

const FORMAT: &str = "TSRG";

/// Parser of TSRG v1 mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsrgParser;

impl MappingParser for TsrgParser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError> {
        let lines = read_lines(reader)?;
        let mut mappings = Mappings::new();
        let mut current_class: Option<&str> = None;
        for line in numbered(FORMAT, &lines) {
            if line.is_blank_or_comment() {
                continue;
            }
            let tokens: Vec<&str> = line.text.split_whitespace().collect();
            if line.text.starts_with(char::is_whitespace) {
                let owner =
                    current_class.ok_or_else(|| line.malformed("member outside of a class"))?;
                match tokens.as_slice() {
                    [name, new_name] => {
                        mappings.add_field_mapping(owner, *name, None, *new_name);
                    }
                    [name, descriptor, new_name] => {
                        let descriptor = line.checked_method_descriptor(descriptor)?;
                        mappings.add_method_mapping(owner, *name, descriptor, *new_name);
                    }
                    _ => return Err(line.malformed("expected a field or a method")),
                }
                continue;
            }
            match tokens.as_slice() {
                ["tsrg2", ..] => return Err(MappingError::MissingHeader(FORMAT)),
                [old, new] if old.ends_with('/') => {
                    mappings.add_package_mapping(old, new);
                    current_class = None;
                }
                [old, new] => {
                    mappings.add_class_mapping(*old, *new);
                    current_class = Some(*old);
                }
                _ => return Err(line.malformed("expected `old new`")),
            }
        }
        tracing::debug!(entries = mappings.len(), "loaded {FORMAT} mappings");
        Ok(mappings)
    }
}
