use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("writing a file")]
    Write,
    #[error("creating a directory")]
    Mkdir,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{path}'")]
#[diagnostic(
    code(planter::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }
}

#[derive(Debug, Error, Diagnostic, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    #[error("toml")]
    Toml,
}
#[derive(Debug, Error, Diagnostic)]
#[error("Parsing error: {file_format} on '{path}'")]
#[diagnostic(
    code(planter::parse),
    help("Tables become directories and strings become files; no other value types are allowed")
)]
pub struct ParseError {
    pub file_format: FileFormat,
    pub path: PathBuf,
    #[source]
    pub source: toml::de::Error,
}
impl ParseError {
    pub fn new(file_format: FileFormat, path: PathBuf, error: toml::de::Error) -> Self {
        Self {
            file_format,
            path,
            source: error,
        }
    }
}
