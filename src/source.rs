use crate::error::{Error, Result};
use crate::CsvFileRef;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supplies the files to process for a round.
pub trait FileSource: Send + Sync {
    fn list_files(&self) -> Result<Vec<CsvFileRef>>;

    /// Human readable location, used in `Error::NoInput`.
    fn location(&self) -> String;
}

/// Non-recursive listing of regular `*.csv` files (extension matched
/// case-insensitively). A missing directory lists as empty.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> DirectorySource {
        DirectorySource { dir: dir.into() }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

impl FileSource for DirectorySource {
    fn list_files(&self) -> Result<Vec<CsvFileRef>> {
        if !self.dir.is_dir() {
            warn!(dir = %self.dir.display(), "input directory not found");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|source| Error::FileAccess {
            path: self.dir.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %self.dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if !has_csv_extension(&path) {
                continue;
            }
            // follows symlinks, unlike DirEntry::metadata
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => files.push(CsvFileRef::new(path, meta.len())),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping file without metadata"),
            }
        }

        debug!(dir = %self.dir.display(), count = files.len(), "listed input files");
        Ok(files)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
