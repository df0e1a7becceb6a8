use crate::{
    errors::{FileFormat, FileOperation, IoError, ParseError},
    vfs::Directory,
};
use miette::Diagnostic;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Name reported in diagnostics for the tree compiled into the binary.
pub const BUILTIN_TREE_NAME: &str = "<builtin>/farmers_trading_backend.toml";

const BUILTIN_TREE: &str = include_str!("../blueprints/farmers_trading_backend.toml");

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// Where the tree to plant comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    Builtin,
    File(PathBuf),
}
impl TreeSource {
    pub fn from_arg(tree: Option<&str>) -> Self {
        match tree {
            Some(path) => Self::File(PathBuf::from(path)),
            None => Self::Builtin,
        }
    }

    pub fn load(&self) -> Result<Directory, ConfigError> {
        match self {
            Self::Builtin => builtin_tree(),
            Self::File(path) => load_tree(path),
        }
    }
}

/// Parses the bundled backend boilerplate tree.
pub fn builtin_tree() -> Result<Directory, ConfigError> {
    parse_tree(BUILTIN_TREE, Path::new(BUILTIN_TREE_NAME))
}

/// Reads and parses a TOML tree file. Tables become directories, strings become files.
pub fn load_tree<P: AsRef<Path>>(path: P) -> Result<Directory, ConfigError> {
    let path = path.as_ref();

    log::debug!("loading tree from: {}", path.display());

    let content = fs::read_to_string(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

    parse_tree(&content, path)
}

fn parse_tree(content: &str, path: &Path) -> Result<Directory, ConfigError> {
    let tree = toml::from_str(content)
        .map_err(|error| ParseError::new(FileFormat::Toml, path.to_path_buf(), error))?;

    Ok(tree)
}
