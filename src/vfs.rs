use indexmap::{map::Entry, IndexMap};
use miette::Diagnostic;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::{
    fmt,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid entry name: '{name}'")]
    #[diagnostic(
        code(planter::tree::invalid_name),
        help("A name must be a single non-empty path segment: no separators, no '.' or '..'")
    )]
    InvalidName { name: String },

    #[error("duplicate entry name: '{name}'")]
    #[diagnostic(
        code(planter::tree::duplicate_name),
        help("Each name may appear only once within a directory")
    )]
    DuplicateName { name: String },
}

/// A node of the in-memory tree describing the desired on-disk layout.
///
/// A [`VirtualNode::File`] holds its contents verbatim; nothing in this crate ever
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualNode {
    Directory(Directory),
    File(String),
}
impl VirtualNode {
    pub fn file(contents: impl Into<String>) -> Self {
        Self::File(contents.into())
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}
impl From<Directory> for VirtualNode {
    fn from(value: Directory) -> Self {
        Self::Directory(value)
    }
}

/// Counts of the entries below a [`Directory`], the directory itself excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub directories: usize,
    pub files: usize,
}

/// A directory of the virtual tree: an ordered mapping from entry name to child node.
///
/// Entries can only be added through [`Directory::insert`], so every instance holds
/// valid, unique names. Insertion order is kept and is the order the tree is walked in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory(IndexMap<String, VirtualNode>);
impl Directory {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }
    /// Builds a directory from `(name, node)` pairs, stopping at the first invalid
    /// or repeated name.
    pub fn from_entries<I, N>(entries: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = (N, VirtualNode)>,
        N: Into<String>,
    {
        let mut directory = Self::new();

        for (name, node) in entries {
            directory.insert(name, node)?;
        }

        Ok(directory)
    }
    /// Adds an entry.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidName`] if `name` is not a single usable path segment.
    /// - [`TreeError::DuplicateName`] if `name` is already present; the existing entry
    ///   is left untouched.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        node: impl Into<VirtualNode>,
    ) -> Result<(), TreeError> {
        let name = name.into();

        if !is_valid_name(&name) {
            return Err(TreeError::InvalidName { name });
        }

        match self.0.entry(name) {
            Entry::Occupied(entry) => Err(TreeError::DuplicateName {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(node.into());
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&VirtualNode> {
        self.0.get(name)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, VirtualNode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Lists every entry below this directory in pre-order, each paired with its path
    /// relative to this directory.
    pub fn walk(&self) -> Vec<(PathBuf, &VirtualNode)> {
        let mut visited = Vec::new();
        collect(self, Path::new(""), &mut visited);
        visited
    }

    pub fn stats(&self) -> TreeStats {
        self.walk()
            .into_iter()
            .fold(TreeStats::default(), |mut stats, (_, node)| {
                if node.is_dir() {
                    stats.directories += 1;
                } else {
                    stats.files += 1;
                }
                stats
            })
    }
}
impl<'a> IntoIterator for &'a Directory {
    type Item = (&'a String, &'a VirtualNode);
    type IntoIter = indexmap::map::Iter<'a, String, VirtualNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn collect<'a>(
    directory: &'a Directory,
    prefix: &Path,
    visited: &mut Vec<(PathBuf, &'a VirtualNode)>,
) {
    for (name, node) in directory {
        let path = prefix.join(name);

        visited.push((path.clone(), node));

        if let VirtualNode::Directory(children) = node {
            collect(children, &path, visited);
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.contains('\0') || name.chars().any(std::path::is_separator) {
        return false;
    }

    // rules out ".", ".." and drive prefixes
    let mut components = Path::new(name).components();

    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

struct DirectoryVisitor;
impl<'de> Visitor<'de> for DirectoryVisitor {
    type Value = Directory;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a table of directory entries")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut directory = Directory::new();

        while let Some((name, node)) = map.next_entry::<String, VirtualNode>()? {
            directory.insert(name, node).map_err(de::Error::custom)?;
        }

        Ok(directory)
    }
}

struct NodeVisitor;
impl<'de> Visitor<'de> for NodeVisitor {
    type Value = VirtualNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("file contents (a string) or a directory (a table)")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(VirtualNode::file(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(VirtualNode::File(value))
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        DirectoryVisitor.visit_map(map).map(VirtualNode::Directory)
    }
}

impl<'de> Deserialize<'de> for Directory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DirectoryVisitor)
    }
}
impl<'de> Deserialize<'de> for VirtualNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}
