use std::{borrow::Cow, io::BufRead};

use super::{MemberDescriptor, NamespacePair, TinyBuilder, resolve_columns};
use crate::mapping::{
    MappingError, MappingParser, Mappings,
    line::{Line, numbered, read_lines},
};

const FORMAT: &str = "Tiny v2";

/// Parser of Tiny v2 mappings.
///
/// ```text
/// tiny	2	0	official	named
/// c	a	com/example/Foo
/// 	f	I	b	count
/// 	m	(La;)V	c	merge
/// 		p	1		other
/// ```
///
/// Parameter, local variable and comment records are accepted and ignored.
#[derive(Debug, Clone, Default)]
pub struct TinyV2Parser {
    namespaces: Option<NamespacePair>,
}

impl TinyV2Parser {
    /// Creates a parser mapping between the given namespaces, or the first two namespaces of
    /// the header if `None`.
    #[must_use]
    pub fn new(namespaces: Option<NamespacePair>) -> Self {
        Self { namespaces }
    }
}

/// Reverses the escaping of names in files with the `escaped-names` property.
fn unescape(name: &str) -> Option<Cow<'_, str>> {
    if !name.contains('\\') {
        return Some(Cow::Borrowed(name));
    }
    let mut unescaped = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            '\\' => '\\',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            _ => return None,
        };
        unescaped.push(escaped);
    }
    Some(Cow::Owned(unescaped))
}

fn parse_header<'a>(header: Option<&Line<'a>>) -> Result<Vec<&'a str>, MappingError> {
    let columns: Vec<&str> = header
        .ok_or(MappingError::MissingHeader(FORMAT))?
        .text
        .split('\t')
        .collect();
    match columns.as_slice() {
        ["tiny", "2", minor, namespaces @ ..] if minor.parse::<u32>().is_ok() => {
            Ok(namespaces.to_vec())
        }
        _ => Err(MappingError::MissingHeader(FORMAT)),
    }
}

impl MappingParser for TinyV2Parser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError> {
        let lines = read_lines(reader)?;
        let mut lines = numbered(FORMAT, &lines);
        let namespaces = parse_header(lines.next().as_ref())?;
        let columns = resolve_columns(&namespaces, self.namespaces.as_ref(), FORMAT)?;
        let mut builder = TinyBuilder::new(namespaces.len(), columns);
        let mut escaped_names = false;
        let mut current_class: Option<String> = None;
        for line in lines {
            if line.is_blank() {
                continue;
            }
            let body = line.text.trim_start_matches('\t');
            let depth = line.text.len() - body.len();
            let columns: Vec<&str> = body.split('\t').collect();
            let escaped = escaped_names;
            let unescape_all = |names: &[&str]| -> Result<Vec<String>, MappingError> {
                names
                    .iter()
                    .map(|name| {
                        if escaped {
                            unescape(name)
                                .map(Cow::into_owned)
                                .ok_or_else(|| line.malformed("invalid escape sequence"))
                        } else {
                            Ok((*name).to_owned())
                        }
                    })
                    .collect()
            };
            let accepted = match (depth, columns.as_slice()) {
                (1, ["f" | "m", ..]) if current_class.is_none() => {
                    return Err(line.malformed("member outside of a class"));
                }
                (1, [property, ..]) if current_class.is_none() => {
                    if *property == "escaped-names" {
                        escaped_names = true;
                    }
                    true
                }
                (0, ["c", names @ ..]) => {
                    let names = unescape_all(names)?;
                    let accepted = builder.add_class(&names);
                    current_class = names.into_iter().next();
                    accepted
                }
                (1, [kind @ ("f" | "m"), descriptor, names @ ..]) => {
                    let owner = current_class
                        .as_deref()
                        .ok_or_else(|| line.malformed("member outside of a class"))?;
                    let descriptor = if *kind == "f" {
                        MemberDescriptor::Field(line.field_descriptor(descriptor)?)
                    } else {
                        MemberDescriptor::Method(line.method_descriptor(descriptor)?)
                    };
                    let names = unescape_all(names)?;
                    builder.add_member(owner, descriptor, &names)
                }
                (1, ["c", ..]) | (2.., ["p" | "v" | "c", ..]) => true,
                _ => return Err(line.malformed("unknown record")),
            };
            if !accepted {
                return Err(line.malformed("wrong number of names"));
            }
        }
        let mappings = builder.finish();
        tracing::debug!(entries = mappings.len(), "loaded {FORMAT} mappings");
        Ok(mappings)
    }
}
