use crate::{
    errors::IoError,
    host::{Filesystem, HostFilesystem},
    vfs::{Directory, VirtualNode},
};
use std::path::{Path, PathBuf};

/// An entry written to disk during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    Directory(PathBuf),
    File(PathBuf),
}
impl Created {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::File(path) => path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// Every entry a successful run created, in the order they were visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub created: Vec<Created>,
}
impl Report {
    pub fn directories(&self) -> usize {
        self.created.iter().filter(|c| !c.is_file()).count()
    }

    pub fn files(&self) -> usize {
        self.created.iter().filter(|c| c.is_file()).count()
    }
}

/// Writes `root` to the host filesystem beneath `base`.
///
/// `base` itself is expected to exist already. See [`materialize_with`] for the
/// traversal and failure semantics.
pub fn materialize(base: &Path, root: &Directory) -> Result<Report, IoError> {
    materialize_with(&mut HostFilesystem, base, root)
}

/// Walks `root` depth-first in pre-order, creating each directory before anything
/// inside it and writing each file's contents verbatim.
///
/// Existing directories are reused and existing files are truncated, so repeating a
/// run over the same `base` converges to the same result.
///
/// # Errors
///
/// Returns the first [`IoError`] raised by `fs`. Nothing is undone: entries created
/// before the failure stay where they are.
pub fn materialize_with<F>(fs: &mut F, base: &Path, root: &Directory) -> Result<Report, IoError>
where
    F: Filesystem + ?Sized,
{
    log::debug!(
        "materializing {} top-level entries under: {}",
        root.len(),
        base.display()
    );

    let mut report = Report::default();

    visit(fs, base, root, &mut report)?;

    log::info!(
        "created {} directories and {} files under: {}",
        report.directories(),
        report.files(),
        base.display()
    );

    Ok(report)
}

fn visit<F>(
    fs: &mut F,
    base: &Path,
    directory: &Directory,
    report: &mut Report,
) -> Result<(), IoError>
where
    F: Filesystem + ?Sized,
{
    for (name, node) in directory {
        let path = base.join(name);

        match node {
            VirtualNode::Directory(children) => {
                fs.create_dir_all(&path)?;
                log::debug!("...created dir: {}", path.display());

                report.created.push(Created::Directory(path.clone()));

                visit(fs, &path, children, report)?;
            }
            VirtualNode::File(contents) => {
                fs.write_file(&path, contents)?;
                log::debug!("...wrote file: {} ({} bytes)", path.display(), contents.len());

                report.created.push(Created::File(path));
            }
        }
    }

    Ok(())
}
