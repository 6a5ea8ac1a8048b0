use std::borrow::Cow;
use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

/// One node produced by the traversal. Built fresh from the filesystem at every
/// step and never cached.
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// Unix permission bits (`st_mode & 0o777` plus the file type bits).
    pub mode: u32,
    /// Number of path components between the search root and this entry.
    pub depth: usize,
}

impl Entry {
    pub fn from_metadata(path: PathBuf, depth: usize, metadata: &Metadata) -> Self {
        Self {
            path,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
            mode: mode_bits(metadata),
            depth,
        }
    }

    /// Base name of the entry; the root of a walk may have none (`/`, `..`).
    pub fn name(&self) -> Cow<'_, str> {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => self.path.as_os_str().to_string_lossy(),
        }
    }
}

#[cfg(unix)]
fn mode_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(metadata: &Metadata) -> u32 {
    let base = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    if metadata.is_dir() { base | 0o111 } else { base }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_entry_from_metadata() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("notes.txt");
        fs::write(&file_path, "twelve bytes").unwrap();

        let metadata = fs::metadata(&file_path).unwrap();
        let entry = Entry::from_metadata(file_path.clone(), 1, &metadata);

        assert!(!entry.is_dir);
        assert_eq!(entry.size, 12);
        assert_eq!(entry.depth, 1);
        assert_eq!(entry.name(), "notes.txt");
        assert!(entry.modified.is_some());
        assert_ne!(entry.mode & 0o777, 0);
    }

    #[test]
    fn test_directory_entry() {
        let dir = tempdir().unwrap();
        let metadata = fs::metadata(dir.path()).unwrap();
        let entry = Entry::from_metadata(dir.path().to_path_buf(), 0, &metadata);
        assert!(entry.is_dir);
    }
}
