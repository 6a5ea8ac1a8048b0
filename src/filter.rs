//! Entry filters deciding which parts of the tree a search can see
use crate::config::SearchConfig;
use crate::entry::Entry;
use std::collections::BTreeSet;
use std::path::Path;

/// Predicate over a traversal entry. Implementations hold no mutable state
/// and may be shared between threads freely.
pub trait EntryFilter: Send + Sync {
    fn should_include(&self, path: &Path, entry: &Entry) -> bool;
}

/// Rejects directories by exact base name or by depth below the root.
///
/// A rejected directory is pruned by the walker, so nothing beneath it is
/// ever visited. Files always pass.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    exclude_dirs: BTreeSet<String>,
    max_depth: Option<usize>,
}

impl DirectoryFilter {
    pub fn new<I, S>(exclude_dirs: I, max_depth: Option<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude_dirs: exclude_dirs.into_iter().map(Into::into).collect(),
            max_depth,
        }
    }
}

impl EntryFilter for DirectoryFilter {
    fn should_include(&self, _path: &Path, entry: &Entry) -> bool {
        if !entry.is_dir {
            return true;
        }

        if self.exclude_dirs.contains(&*entry.name()) {
            return false;
        }

        match self.max_depth {
            Some(max) => entry.depth <= max,
            None => true,
        }
    }
}

/// Include/exclude sets of dotted extensions (`.rs`). Directories always pass.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, E, S>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }
}

impl EntryFilter for ExtensionFilter {
    fn should_include(&self, path: &Path, entry: &Entry) -> bool {
        if entry.is_dir {
            return true;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let ext = dotted_extension(&name);

        if !self.include.is_empty() && !self.include.contains(ext) {
            return false;
        }

        !self.exclude.contains(ext)
    }
}

/// Suffix of `name` starting at its last dot, or `""` when there is none.
/// `archive.tar.gz` gives `.gz`, `.bashrc` gives `.bashrc`.
pub fn dotted_extension(name: &str) -> &str {
    name.rfind('.').map_or("", |idx| &name[idx..])
}

/// Logical AND over an ordered list of filters.
#[derive(Default)]
pub struct CompositeFilter {
    filters: Vec<Box<dyn EntryFilter>>,
}

impl CompositeFilter {
    pub fn new(filters: Vec<Box<dyn EntryFilter>>) -> Self {
        Self { filters }
    }

    /// The standard chain: directory rules first, then extension rules.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(vec![
            Box::new(DirectoryFilter::new(
                config.exclude_dirs.iter().cloned(),
                config.max_depth,
            )),
            Box::new(ExtensionFilter::new(
                config.include_exts.iter().cloned(),
                config.exclude_exts.iter().cloned(),
            )),
        ])
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl EntryFilter for CompositeFilter {
    fn should_include(&self, path: &Path, entry: &Entry) -> bool {
        self.filters.iter().all(|f| f.should_include(path, entry))
    }
}
