//! Exclusion rules applied to every job's candidates.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path};

/// File names excluded unless the caller replaces the defaults.
pub const DEFAULT_EXCLUDE_FILES: &[&str] = &["consolidate.py"];

/// Path components excluded unless the caller replaces the defaults.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules", ".git", ".vscode", ".idea"];

/// Excluded file names and excluded path components.
///
/// Component matching is literal: a path is excluded when any of its
/// components equals an excluded name, so a top-level *file* called `.git`
/// is excluded as well as the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    files: BTreeSet<String>,
    components: BTreeSet<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::empty()
            .exclude_files(DEFAULT_EXCLUDE_FILES.iter().copied())
            .exclude_dirs(DEFAULT_EXCLUDE_DIRS.iter().copied())
    }
}

impl ExclusionRules {
    /// Creates rules that exclude nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            files: BTreeSet::new(),
            components: BTreeSet::new(),
        }
    }

    /// Adds file names to the exclusion list.
    #[must_use]
    pub fn exclude_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds path component names to the exclusion list.
    #[must_use]
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components.extend(names.into_iter().map(Into::into));
        self
    }

    /// Excluded file names, sorted.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Excluded path components, sorted.
    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(String::as_str)
    }

    /// Returns true if a single path component is excluded.
    ///
    /// Used to prune the directory walk early.
    #[must_use]
    pub fn is_excluded_component(&self, name: &OsStr) -> bool {
        self.components.contains(&*name.to_string_lossy())
    }

    /// Returns true if a root-relative path must not appear in any bundle.
    #[must_use]
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        let name_excluded = relative_path
            .file_name()
            .is_some_and(|name| self.files.contains(&*name.to_string_lossy()));

        if name_excluded {
            return true;
        }

        relative_path.components().any(|component| match component {
            Component::Normal(name) => self.is_excluded_component(name),
            _ => false,
        })
    }
}
