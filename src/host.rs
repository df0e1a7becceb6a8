use crate::errors::{FileOperation, IoError};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

/// The filesystem operations a materialization run needs.
///
/// [`HostFilesystem`] is the real thing; tests plug in implementations that record
/// the call order or fail on purpose.
pub trait Filesystem {
    /// Creates `path` and any missing parents. An existing directory is not an error.
    fn create_dir_all(&mut self, path: &Path) -> Result<(), IoError>;
    /// Creates or truncates `path` and writes `contents` to it. Returns only once the
    /// data has been flushed and synced.
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<(), IoError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HostFilesystem;
impl Filesystem for HostFilesystem {
    fn create_dir_all(&mut self, path: &Path) -> Result<(), IoError> {
        fs::create_dir_all(path)
            .map_err(|error| IoError::new(FileOperation::Mkdir, path.to_path_buf(), error))
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<(), IoError> {
        let fail = |error: io::Error| IoError::new(FileOperation::Write, path.to_path_buf(), error);

        let mut writer = BufWriter::new(File::create(path).map_err(fail)?);

        writer.write_all(contents.as_bytes()).map_err(fail)?;

        // `into_inner` flushes; dropping the writer instead would discard a flush error
        let file = writer
            .into_inner()
            .map_err(|error| fail(error.into_error()))?;

        file.sync_all().map_err(fail)
    }
}
