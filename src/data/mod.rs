use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ErrorKind;

/// Read access to the static input files, addressed by paths relative to the
/// resource root (e.g. `raw_heroes.json`, `localization/citadel_gc_english.json`).
///
/// A missing file must be reported as [`ErrorKind::DatafileNotFound`] so callers
/// can tell optional inputs apart from real I/O failures.
pub trait DataFileLoader {
    fn get(&self, path: &str) -> Result<Cow<'static, [u8]>, ErrorKind>;
}

pub struct DataFileWithCallback<F> {
    callback: F,
}

impl<F> DataFileWithCallback<F>
where
    F: Fn(&str) -> Result<Cow<'static, [u8]>, ErrorKind>,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> DataFileLoader for DataFileWithCallback<F>
where
    F: Fn(&str) -> Result<Cow<'static, [u8]>, ErrorKind>,
{
    fn get(&self, path: &str) -> Result<Cow<'static, [u8]>, ErrorKind> {
        (self.callback)(path)
    }
}

/// Loads data files from a directory on disk, usually the repository's `res/`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataFileLoader for DirectoryLoader {
    fn get(&self, path: &str) -> Result<Cow<'static, [u8]>, ErrorKind> {
        let full_path = self.root.join(path);
        debug!("reading data file: {}", full_path.display());

        match std::fs::read(&full_path) {
            Ok(data) => Ok(Cow::Owned(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ErrorKind::DatafileNotFound {
                path: full_path.display().to_string(),
            }),
            Err(err) => Err(ErrorKind::IoError(err)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn directory_loader_reports_missing_files() {
        let loader = DirectoryLoader::new(std::env::temp_dir().join("deadlock-assets-missing"));
        let err = loader.get("raw_heroes.json").unwrap_err();
        assert!(matches!(err, ErrorKind::DatafileNotFound { .. }));
    }

    #[test]
    fn directory_loader_reads_files() {
        let root = std::env::temp_dir().join(format!("deadlock-assets-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("raw_items.json"), b"{}").unwrap();

        let loader = DirectoryLoader::new(&root);
        assert_eq!(loader.get("raw_items.json").unwrap().as_ref(), b"{}");

        std::fs::remove_dir_all(&root).unwrap();
    }
}
