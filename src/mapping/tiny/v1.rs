use std::io::BufRead;

use super::{MemberDescriptor, NamespacePair, TinyBuilder, resolve_columns};
use crate::mapping::{
    MappingError, MappingParser, Mappings,
    line::{numbered, read_lines},
};

const FORMAT: &str = "Tiny v1";

/// Parser of Tiny v1 mappings.
///
/// ```text
/// v1	official	named
/// CLASS	a	com/example/Foo
/// FIELD	a	I	b	count
/// METHOD	a	(La;)V	c	merge
/// ```
#[derive(Debug, Clone, Default)]
pub struct TinyV1Parser {
    namespaces: Option<NamespacePair>,
}

impl TinyV1Parser {
    /// Creates a parser mapping between the given namespaces, or the first two namespaces of
    /// the header if `None`.
    #[must_use]
    pub fn new(namespaces: Option<NamespacePair>) -> Self {
        Self { namespaces }
    }
}

impl MappingParser for TinyV1Parser {
    fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError> {
        let lines = read_lines(reader)?;
        let mut lines = numbered(FORMAT, &lines);
        let header = lines.next().ok_or(MappingError::MissingHeader(FORMAT))?;
        let namespaces: Vec<&str> = match header.text.strip_prefix("v1\t") {
            Some(namespaces) => namespaces.split('\t').collect(),
            None => return Err(MappingError::MissingHeader(FORMAT)),
        };
        let columns = resolve_columns(&namespaces, self.namespaces.as_ref(), FORMAT)?;
        let mut builder = TinyBuilder::new(namespaces.len(), columns);
        for line in lines {
            if line.is_blank_or_comment() {
                continue;
            }
            let columns: Vec<&str> = line.text.split('\t').collect();
            let accepted = match columns.as_slice() {
                ["CLASS", names @ ..] => builder.add_class(names),
                ["FIELD", owner, descriptor, names @ ..] => {
                    let descriptor = MemberDescriptor::Field(line.field_descriptor(descriptor)?);
                    builder.add_member(owner, descriptor, names)
                }
                ["METHOD", owner, descriptor, names @ ..] => {
                    let descriptor = MemberDescriptor::Method(line.method_descriptor(descriptor)?);
                    builder.add_member(owner, descriptor, names)
                }
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

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPINGS: &str = "v1\tofficial\tintermediary\tnamed
# INTERMEDIARY-COUNTER class 2
CLASS\ta\tnet/minecraft/class_1\tnet/minecraft/Block
CLASS\tb\tnet/minecraft/class_2\tnet/minecraft/World
FIELD\ta\tLb;\tc\tfield_1\tworld
METHOD\ta\t(Lb;I)V\td\tmethod_1\ttick
METHOD\ta\t()V\te\tmethod_2\t
";

    #[test]
    fn default_namespaces() {
        let mappings = TinyV1Parser::default().parse(MAPPINGS.as_bytes()).unwrap();
        assert_eq!(mappings.map("a"), "net/minecraft/class_1");
        assert_eq!(mappings.map_field_name("a", "c", "Lb;"), "field_1");
        assert_eq!(mappings.map_method_name("a", "d", "(Lb;I)V"), "method_1");
    }

    #[test]
    fn selected_namespaces() {
        let parser = TinyV1Parser::new(Some(NamespacePair::new("intermediary", "named")));
        let mappings = parser.parse(MAPPINGS.as_bytes()).unwrap();
        assert_eq!(mappings.map("net/minecraft/class_1"), "net/minecraft/Block");
        assert_eq!(
            mappings.map_field_name("net/minecraft/class_1", "field_1", "Lnet/minecraft/class_2;"),
            "world"
        );
        assert_eq!(
            mappings.map_method_name("net/minecraft/class_1", "method_1", "(Lnet/minecraft/class_2;I)V"),
            "tick"
        );
        assert!(!mappings.has_method_mapping("net/minecraft/class_1", "method_2", "()V"));
    }

    #[test]
    fn unknown_namespace() {
        let parser = TinyV1Parser::new(Some(NamespacePair::new("official", "mojang")));
        assert!(matches!(
            parser.parse(MAPPINGS.as_bytes()),
            Err(MappingError::UnknownNamespace(_))
        ));
    }

    #[test]
    fn missing_header() {
        assert!(matches!(
            TinyV1Parser::default().parse("CLASS\ta\tb\n".as_bytes()),
            Err(MappingError::MissingHeader(_))
        ));
        assert!(matches!(
            TinyV1Parser::default().parse("".as_bytes()),
            Err(MappingError::MissingHeader(_))
        ));
    }

    #[test]
    fn malformed_records() {
        let unknown = "v1\ta\tb\nPACKAGE\tx\ty\n";
        assert!(matches!(
            TinyV1Parser::default().parse(unknown.as_bytes()),
            Err(MappingError::Malformed { line: 2, .. })
        ));
        let too_many = "v1\ta\tb\nCLASS\tx\ty\tz\n";
        assert!(matches!(
            TinyV1Parser::default().parse(too_many.as_bytes()),
            Err(MappingError::Malformed { line: 2, .. })
        ));
        let bad_descriptor = "v1\ta\tb\nMETHOD\tx\t(I\ty\tz\n";
        assert!(matches!(
            TinyV1Parser::default().parse(bad_descriptor.as_bytes()),
            Err(MappingError::InvalidDescriptor { line: 2, .. })
        ));
    }
}
