use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::StorageBackend;

/// File-per-key backend.
///
/// ## Layout
/// ```text
/// <dir>/
/// ├── cart.json           ← committed value
/// └── .cart.json.<pid>    ← in-flight write, renamed over cart.json
/// ```
///
/// Writes land in a temporary sibling and are renamed into place, so a crash
/// mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{}'", key),
            ));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = self
            .dir
            .join(format!(".{}.json.{}", key, std::process::id()));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage key");
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
