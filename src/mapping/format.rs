use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

use super::{
    MappingError, Mappings, NamespacePair,
    proguard::ProguardParser,
    retroguard::RetroguardParser,
    srg::SrgParser,
    tiny::{TinyV1Parser, TinyV2Parser},
    tsrg::TsrgParser,
};

const SRG_PREFIXES: [&str; 4] = ["PK: ", "CL: ", "FD: ", "MD: "];

const RETROGUARD_PREFIXES: [&str; 9] = [
    ".class_map ",
    ".field_map ",
    ".method_map ",
    ".package_map ",
    ".option ",
    ".attribute ",
    ".class ",
    ".field ",
    ".method ",
];

/// A parser of one mapping format.
pub trait MappingParser {
    /// Reads the whole stream and builds the mappings it describes.
    ///
    /// # Errors
    /// See [`MappingError`]. A single malformed line fails the whole load.
    fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError>;
}

/// The supported mapping formats.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MappingFormat {
    /// ProGuard / R8 `mapping.txt`.
    #[display("proguard")]
    Proguard,
    /// Tiny v1, optionally mapping between a specific pair of namespaces.
    #[display("tiny")]
    TinyV1(Option<NamespacePair>),
    /// Tiny v2, optionally mapping between a specific pair of namespaces.
    #[display("tiny2")]
    TinyV2(Option<NamespacePair>),
    /// Searge `.srg`.
    #[display("srg")]
    Srg,
    /// Compact Searge `.tsrg`.
    #[display("tsrg")]
    Tsrg,
    /// RetroGuard script `.rgs`.
    #[display("retroguard")]
    Retroguard,
}

impl MappingFormat {
    /// Parses mappings in this format.
    ///
    /// # Errors
    /// See [`MappingError`].
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Mappings, MappingError> {
        match self {
            Self::Proguard => ProguardParser.parse(reader),
            Self::TinyV1(namespaces) => TinyV1Parser::new(namespaces.clone()).parse(reader),
            Self::TinyV2(namespaces) => TinyV2Parser::new(namespaces.clone()).parse(reader),
            Self::Srg => SrgParser.parse(reader),
            Self::Tsrg => TsrgParser.parse(reader),
            Self::Retroguard => RetroguardParser.parse(reader),
        }
    }

    /// Guesses the format from the first non-empty, non-comment line of a mapping file.
    /// Tiny formats are detected with their default namespaces.
    #[must_use]
    pub fn detect(first_line: &str) -> Option<Self> {
        let line = first_line.trim_start_matches('\u{feff}').trim_end();
        if line.starts_with("v1\t") {
            Some(Self::TinyV1(None))
        } else if line.starts_with("tiny\t2\t") {
            Some(Self::TinyV2(None))
        } else if SRG_PREFIXES.iter().any(|it| line.starts_with(it)) {
            Some(Self::Srg)
        } else if RETROGUARD_PREFIXES.iter().any(|it| line.starts_with(it)) {
            Some(Self::Retroguard)
        } else if line.contains(" -> ") && line.ends_with(':') {
            Some(Self::Proguard)
        } else if !line.starts_with(char::is_whitespace) && line.split_whitespace().count() == 2 {
            Some(Self::Tsrg)
        } else {
            None
        }
    }
}

impl FromStr for MappingFormat {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proguard" => Ok(Self::Proguard),
            "tiny" => Ok(Self::TinyV1(None)),
            "tiny2" => Ok(Self::TinyV2(None)),
            "srg" => Ok(Self::Srg),
            "tsrg" => Ok(Self::Tsrg),
            "retroguard" => Ok(Self::Retroguard),
            _ => Err(MappingError::UnknownFormat(s.to_owned())),
        }
    }
}

/// Reads a mapping stream, detects its format from the first meaningful line and parses it.
///
/// # Errors
/// [`MappingError::UnknownFormat`] if the format cannot be recognized, otherwise see
/// [`MappingError`].
pub fn parse_detected<R: Read>(mut reader: R) -> Result<Mappings, MappingError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let first_line = content
        .lines()
        .map(|it| it.trim_start_matches('\u{feff}'))
        .find(|it| {
            let trimmed = it.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .unwrap_or_default();
    let format = MappingFormat::detect(first_line)
        .ok_or_else(|| MappingError::UnknownFormat(first_line.to_owned()))?;
    tracing::debug!(%format, "detected mapping format");
    format.parse(content.as_bytes())
}

/// Loads a mapping file in the given format.
///
/// # Errors
/// See [`MappingError`].
pub fn load_mappings(path: impl AsRef<Path>, format: &MappingFormat) -> Result<Mappings, MappingError> {
    let file = File::open(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), %format, "loading mappings");
    format.parse(BufReader::new(file))
}
