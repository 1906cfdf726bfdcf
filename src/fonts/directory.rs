//! The watched font directory and its startup bootstrap.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::lifecycle::StartupError;
use crate::observability::{EventCode, EventLog};

/// Location of the watched directory, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDirectory(PathBuf);

impl FontDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for FontDirectory {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for FontDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Makes sure the font directory exists and lists what is already there.
#[derive(Debug, Clone)]
pub struct DirectoryBootstrapper {
    log: EventLog,
}

impl DirectoryBootstrapper {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }

    /// Create `dir` if it is missing, then return the files directly inside it.
    ///
    /// Sub-directories are skipped and the result is sorted by path.
    pub fn ensure(&self, dir: &FontDirectory) -> Result<Vec<PathBuf>, StartupError> {
        let path = dir.as_path();

        match fs::metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(path).map_err(|source| StartupError::CreateDir {
                    path: path.to_path_buf(),
                    source,
                })?;
                self.log.info(
                    EventCode::DirectoryCreated,
                    format!("created shared font dir {}", dir),
                );
            }
            Err(source) => {
                return Err(StartupError::ReadDir {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        list_files(path).map_err(|source| StartupError::ReadDir {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn list_files(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}
