//! Discovering and loading class metadata.
//!
//! A [`ClassPath`] finds the [`ClassInfo`] of a class by its binary name.
//! A [`ClassLoader`] searches a list of class paths in order, and a [`CachingClassLoader`]
//! remembers every class it has loaded. Hierarchy analyses consume class metadata through the
//! [`ClassInfoProvider`] capability, which both loaders implement.

use std::{
    collections::HashMap,
    ops::Deref,
    sync::{Arc, RwLock},
};

use super::{ClassInfo, parsing::ClassFileParsingError};

pub mod class_paths;

pub use class_paths::{ClassInfoSet, DirectoryClassPath};
#[cfg(feature = "jar")]
pub use class_paths::JarClassPath;

/// An error that can occur while loading a class.
#[derive(thiserror::Error, Debug)]
pub enum ClassLoadingError {
    /// The class could not be found.
    #[error("Class not found: {0}")]
    NotFound(String),
    /// Error occurred while parsing the class bytes.
    #[error("Error parsing class bytes: {0}")]
    Malformed(#[from] ClassFileParsingError),
    /// Error occurred while reading the class bytes or locating the class file.
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    /// Other error occurred.
    #[error("Cause: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A class path that can be searched for classes.
pub trait ClassPath {
    /// Find a class by its binary name.
    ///
    /// # Errors
    /// See [`ClassLoadingError`].
    fn find_class(&self, binary_name: &str) -> Result<ClassInfo, ClassLoadingError>;

    /// Lists the binary names of the classes in this class path.
    /// Class paths that cannot be enumerated return an empty list.
    ///
    /// # Errors
    /// See [`ClassLoadingError`].
    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        Ok(Vec::new())
    }
}

impl<T> ClassPath for T
where
    T: Deref,
    <T as Deref>::Target: ClassPath,
{
    fn find_class(&self, binary_name: &str) -> Result<ClassInfo, ClassLoadingError> {
        self.deref().find_class(binary_name)
    }

    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        self.deref().class_names()
    }
}

/// A source of class metadata for hierarchy analyses.
///
/// Implementations must answer deterministically for a given name within one session.
/// Implementations used from multiple threads must be safe for concurrent lookups.
pub trait ClassInfoProvider {
    /// Gets the metadata of a class by its binary name.
    ///
    /// # Errors
    /// [`ClassLoadingError::NotFound`] if the class does not exist. Other variants if it cannot
    /// be read.
    fn class_info(&self, binary_name: &str) -> Result<Arc<ClassInfo>, ClassLoadingError>;

    /// Lists the binary names of the classes this provider can enumerate.
    /// Providers that cannot be enumerated return an empty list.
    ///
    /// # Errors
    /// See [`ClassLoadingError`].
    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        Ok(Vec::new())
    }
}

/// A class loader that can load classes from a list of class paths.
#[derive(Debug)]
pub struct ClassLoader<P> {
    class_path: Vec<P>,
}

impl<P: ClassPath> ClassLoader<P> {
    /// Loads a class from the first class path that contains it.
    ///
    /// # Errors
    /// See [`ClassLoadingError`].
    pub fn load_class(&self, binary_name: impl AsRef<str>) -> Result<ClassInfo, ClassLoadingError> {
        for class_path in &self.class_path {
            match class_path.find_class(binary_name.as_ref()) {
                Ok(class) => return Ok(class),
                Err(ClassLoadingError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Err(ClassLoadingError::NotFound(binary_name.as_ref().to_owned()))
    }

    /// Lists the classes of every class path, without duplicates, in class path order.
    ///
    /// # Errors
    /// See [`ClassLoadingError`].
    pub fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        let mut names = indexmap::IndexSet::new();
        for class_path in &self.class_path {
            names.extend(class_path.class_names()?);
        }
        Ok(names.into_iter().collect())
    }
}

impl<P> ClassLoader<P> {
    /// Create a new class loader with the given class paths.
    #[must_use]
    pub fn new(class_path: impl Into<Vec<P>>) -> Self {
        let class_path = class_path.into();
        Self { class_path }
    }

    /// Convert this class loader into a [`CachingClassLoader`].
    #[must_use]
    pub fn into_cached(self) -> CachingClassLoader<P> {
        CachingClassLoader {
            class_loader: self,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl<P: ClassPath> ClassInfoProvider for ClassLoader<P> {
    fn class_info(&self, binary_name: &str) -> Result<Arc<ClassInfo>, ClassLoadingError> {
        self.load_class(binary_name).map(Arc::new)
    }

    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        ClassLoader::class_names(self)
    }
}

/// A class loader that caches loaded classes.
///
/// The cache is populated on first lookup and never evicted, so each class is parsed at most
/// once for the lifetime of the loader, also when it is shared between threads.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CachingClassLoader<P> {
    class_loader: ClassLoader<P>,
    cache: RwLock<HashMap<String, Arc<ClassInfo>>>,
}

impl<P: ClassPath> CachingClassLoader<P> {
    /// Loads a class from the class loader's cache, or loads it from the class loader if it is
    /// not.
    ///
    /// # Errors
    /// See [`ClassLoadingError`].
    pub fn load_class(&self, binary_name: impl AsRef<str>) -> Result<Arc<ClassInfo>, ClassLoadingError> {
        let key_ref = binary_name.as_ref();
        let cache = match self.cache.read() {
            Ok(it) => it,
            Err(poison_err) => {
                // The operaion on `self.cache` should not panic.
                // When the other thread holding the lock get panic, the panic should happen before
                // modifying the cache.
                // Therefore, it is safe to take the lock even if it is poisoned.
                poison_err.into_inner()
            }
        };
        if let Some(class) = cache.get(key_ref) {
            return Ok(Arc::clone(class));
        }
        drop(cache);
        let mut cache = match self.cache.write() {
            Ok(it) => it,
            Err(poison_err) => poison_err.into_inner(),
        };
        // It is possible that the class is loaded before we get the write lock.
        // Therefore, we need to check the cache again.
        if let Some(class) = cache.get(key_ref) {
            return Ok(Arc::clone(class));
        }
        tracing::trace!(class = key_ref, "loading class metadata");
        let class = Arc::new(self.class_loader.load_class(key_ref)?);
        cache.insert(key_ref.to_owned(), Arc::clone(&class));
        Ok(class)
    }

    /// Returns the number of classes in the cache.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        match self.cache.read() {
            Ok(it) => it.len(),
            Err(poison_err) => poison_err.into_inner().len(),
        }
    }
}

impl<P: ClassPath> ClassInfoProvider for CachingClassLoader<P> {
    fn class_info(&self, binary_name: &str) -> Result<Arc<ClassInfo>, ClassLoadingError> {
        self.load_class(binary_name)
    }

    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        self.class_loader.class_names()
    }
}

impl<T> ClassInfoProvider for T
where
    T: Deref,
    <T as Deref>::Target: ClassInfoProvider,
{
    fn class_info(&self, binary_name: &str) -> Result<Arc<ClassInfo>, ClassLoadingError> {
        self.deref().class_info(binary_name)
    }

    fn class_names(&self) -> Result<Vec<String>, ClassLoadingError> {
        self.deref().class_names()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rayon::prelude::*;

    use super::*;

    #[derive(Debug)]
    struct CountingClassPath<'c> {
        inner: ClassInfoSet,
        counter: &'c AtomicUsize,
    }

    impl ClassPath for CountingClassPath<'_> {
        fn find_class(&self, binary_name: &str) -> Result<ClassInfo, ClassLoadingError> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            self.inner.find_class(binary_name)
        }
    }

    fn test_set() -> ClassInfoSet {
        [
            ClassInfo::object(),
            ClassInfo::new("org/pkg/MyClass", Some("java/lang/Object")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn load_from_first_matching_class_path() {
        let first: ClassInfoSet = [ClassInfo::new("a/A", Some("x/X"))].into_iter().collect();
        let second: ClassInfoSet = [ClassInfo::new("a/A", Some("y/Y"))].into_iter().collect();
        let class_loader = ClassLoader::new(vec![first, second]);
        let class = class_loader.load_class("a/A").unwrap();
        assert_eq!(class.super_class.unwrap().binary_name, "x/X");
    }

    #[test]
    fn load_absent_class() {
        let class_loader = ClassLoader::new(vec![test_set()]);
        let class = class_loader.load_class("org/pkg/MyAbsentClass");
        assert!(matches!(class, Err(ClassLoadingError::NotFound(name)) if name == "org/pkg/MyAbsentClass"));
    }

    #[test]
    fn caching_class_loader_load_once() {
        let counter = AtomicUsize::new(0);
        let class_path = CountingClassPath {
            inner: test_set(),
            counter: &counter,
        };
        let class_loader = ClassLoader::new(vec![&class_path]).into_cached();
        for _ in 0..10 {
            let class = class_loader.load_class("org/pkg/MyClass").unwrap();
            assert_eq!(class.binary_name, "org/pkg/MyClass");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(class_loader.cached_count(), 1);
    }

    #[test]
    fn caching_class_loader_concurrent_lookups() {
        let counter = AtomicUsize::new(0);
        let class_path = CountingClassPath {
            inner: test_set(),
            counter: &counter,
        };
        let class_loader = ClassLoader::new(vec![&class_path]).into_cached();
        (0..64).into_par_iter().for_each(|i| {
            let name = if i % 2 == 0 { "org/pkg/MyClass" } else { "java/lang/Object" };
            let class = class_loader.class_info(name).unwrap();
            assert_eq!(class.binary_name, name);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_lookups_are_not_cached() {
        let class_loader = ClassLoader::new(vec![test_set()]).into_cached();
        assert!(class_loader.load_class("a/Missing").is_err());
        assert!(class_loader.load_class("a/Missing").is_err());
        assert_eq!(class_loader.cached_count(), 0);
    }

    #[test]
    fn enumerate_class_names() {
        let class_loader = ClassLoader::new(vec![test_set(), test_set()]).into_cached();
        let names = ClassInfoProvider::class_names(&class_loader).unwrap();
        assert_eq!(names, vec!["java/lang/Object", "org/pkg/MyClass"]);
    }
}
