use std::io;

/// An error that occurs when loading mappings.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The mapping stream could not be read.
    #[error("Failed to read mappings: {0}")]
    Io(#[from] io::Error),
    /// A line does not match the grammar of the format.
    #[error("Malformed {format} mappings at line {line} ({reason}): `{content}`")]
    Malformed {
        /// The name of the mapping format.
        format: &'static str,
        /// The 1-based line number.
        line: usize,
        /// The text of the offending line.
        content: String,
        /// What is wrong with the line.
        reason: &'static str,
    },
    /// A type or method descriptor in the mappings cannot be parsed.
    #[error("Invalid descriptor `{descriptor}` in {format} mappings at line {line}")]
    InvalidDescriptor {
        /// The name of the mapping format.
        format: &'static str,
        /// The 1-based line number.
        line: usize,
        /// The offending descriptor.
        descriptor: String,
    },
    /// A requested namespace is not declared in the header.
    #[error("Namespace `{0}` is not declared in the mapping header")]
    UnknownNamespace(String),
    /// The header line required by the format is missing or unsupported.
    #[error("Missing or unsupported {0} header")]
    MissingHeader(&'static str),
    /// The format of the mappings cannot be recognized.
    #[error("Unrecognized mapping format: {0}")]
    UnknownFormat(String),
}
