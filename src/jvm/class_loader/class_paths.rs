//! Implementations of [`ClassPath`].

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use walkdir::WalkDir;
#[cfg(feature = "jar")]
use zip::{ZipArchive, result::ZipError};

use super::{ClassLoadingError, ClassPath};
use crate::jvm::ClassInfo;

const CLASS_FILE_EXTENSION: &str = "class";

/// Class files that carry no type.
fn is_metadata_class(binary_name: &str) -> bool {
    binary_name.ends_with("module-info") || binary_name.ends_with("package-info")
}

/// A class path that searches for classes in a directory.
#[derive(Debug)]
pub struct DirectoryClassPath {
    directory: PathBuf,
}

impl DirectoryClassPath {
    /// Create a new directory class path.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn binary_name_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.directory).ok()?;
        if relative.extension()? != CLASS_FILE_EXTENSION {
            return None;
        }
        let segments = relative
            .with_extension("")
            .components()
            .map(|it| it.as_os_str().to_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()?;
        Some(segments.join("/"))
    }
}

impl ClassPath for DirectoryClassPath {
    fn find_class(&self, binary_name: &str) -> Result<ClassInfo, ClassLoadingError> {
        let class_file_path = self
            .directory
            .join(format!("{binary_name}.{CLASS_FILE_EXTENSION}"));
        if class_file_path.is_file() {
            let class_file = File::open(class_file_path)?;
            let mut buf_read = BufReader::new(class_file);
            let class = ClassInfo::from_reader(&mut buf_read)?;
            Ok(class)
        } else {
            Err(ClassLoadingError::NotFound(binary_name.to_owned()))
        }
    }

    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.directory).sort_by_file_name() {
            let entry = entry.map_err(|e| ClassLoadingError::Other(Box::new(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = self.binary_name_of(entry.path()) {
                if !is_metadata_class(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }
}

/// A class path that searches for classes in a JAR file.
#[derive(Debug)]
#[cfg(feature = "jar")]
#[cfg_attr(docsrs, doc(cfg(feature = "jar")))]
pub struct JarClassPath {
    jar_file: PathBuf,
}

#[cfg(feature = "jar")]
impl JarClassPath {
    /// Create a new JAR class path.
    pub fn new(jar_file: impl Into<PathBuf>) -> Self {
        Self {
            jar_file: jar_file.into(),
        }
    }

    fn open(&self) -> Result<ZipArchive<BufReader<File>>, ClassLoadingError> {
        let jar_file = File::open(&self.jar_file)?;
        let jar_reader = BufReader::new(jar_file);
        ZipArchive::new(jar_reader).map_err(|e| match e {
            ZipError::Io(io_err) => ClassLoadingError::IO(io_err),
            e => ClassLoadingError::Other(Box::new(e)),
        })
    }
}

#[cfg(feature = "jar")]
impl ClassPath for JarClassPath {
    fn find_class(&self, binary_name: &str) -> Result<ClassInfo, ClassLoadingError> {
        let mut jar_archive = self.open()?;
        let mut class_file =
            match jar_archive.by_name(&format!("{binary_name}.{CLASS_FILE_EXTENSION}")) {
                Ok(it) => it,
                Err(ZipError::FileNotFound) => {
                    Err(ClassLoadingError::NotFound(binary_name.to_owned()))?
                }
                Err(ZipError::Io(io_err)) => Err(ClassLoadingError::IO(io_err))?,
                Err(e) => Err(ClassLoadingError::Other(Box::new(e)))?,
            };
        ClassInfo::from_reader(&mut class_file).map_err(Into::into)
    }

    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        let jar_archive = self.open()?;
        let names = jar_archive
            .file_names()
            .filter(|it| !it.starts_with("META-INF/"))
            .filter_map(|it| it.strip_suffix(".class"))
            .filter(|it| !is_metadata_class(it))
            .map(str::to_owned)
            .collect();
        Ok(names)
    }
}

/// A class path holding class metadata in memory, e.g. metadata assembled by hand or
/// collected from another source.
#[derive(Debug, Clone, Default)]
pub struct ClassInfoSet {
    classes: IndexMap<String, ClassInfo>,
}

impl ClassInfoSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class, replacing any class with the same binary name.
    pub fn insert(&mut self, class: ClassInfo) -> Option<ClassInfo> {
        self.classes.insert(class.binary_name.clone(), class)
    }

    /// Gets a class by its binary name.
    #[must_use]
    pub fn get(&self, binary_name: &str) -> Option<&ClassInfo> {
        self.classes.get(binary_name)
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Checks if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<ClassInfo> for ClassInfoSet {
    fn from_iter<T: IntoIterator<Item = ClassInfo>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<ClassInfo> for ClassInfoSet {
    fn extend<T: IntoIterator<Item = ClassInfo>>(&mut self, iter: T) {
        for class in iter {
            self.insert(class);
        }
    }
}

impl ClassPath for ClassInfoSet {
    fn find_class(&self, binary_name: &str) -> Result<ClassInfo, ClassLoadingError> {
        self.classes
            .get(binary_name)
            .cloned()
            .ok_or_else(|| ClassLoadingError::NotFound(binary_name.to_owned()))
    }

    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        Ok(self.classes.keys().cloned().collect())
    }
}
