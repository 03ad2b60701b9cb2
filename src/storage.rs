// ABOUTME: Output sinks for rendered Markdown, keyed by file name
// ABOUTME: Directory sink writes atomically with private permissions

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for rendered files. Writes overwrite existing keys.
pub trait OutputSink {
    fn write(&mut self, key: &str, content: &str) -> Result<()>;
}

/// Writes each key as a file under one output directory.
pub struct DirSink {
    pub out_dir: PathBuf,
}

impl DirSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        DirSink {
            out_dir: out_dir.into(),
        }
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&self.out_dir, perms)?;
        }
        Ok(())
    }
}

impl OutputSink for DirSink {
    fn write(&mut self, key: &str, content: &str) -> Result<()> {
        let path = self.out_dir.join(key);
        write_atomic(&path, content.as_bytes())?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }
}

/// Writes to a sibling temp file, then renames over `path`.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    use rand::Rng;

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    // Create temp file
    let random: u32 = rand::thread_rng().gen();
    let tmp_path = parent.join(format!(".{:x}.part", random));

    // Write to temp
    fs::write(&tmp_path, content)?;

    // Set permissions
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(&tmp_path, perms)?;
    }

    // Atomic rename
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = TempDir::new().unwrap();
        let sink = DirSink::new(temp.path().join("a").join("diary"));
        sink.ensure_dir().unwrap();
        assert!(sink.out_dir.is_dir());
    }

    #[test]
    #[cfg(unix)]
    fn test_ensure_dir_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let sink = DirSink::new(temp.path().join("diary"));
        sink.ensure_dir().unwrap();

        let perms = fs::metadata(&sink.out_dir).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o700);
    }

    #[test]
    fn test_sink_write_and_overwrite() {
        let temp = TempDir::new().unwrap();
        let mut sink = DirSink::new(temp.path().join("diary"));

        sink.write("2024-05-01_note.md", "first").unwrap();
        sink.write("2024-05-01_note.md", "second").unwrap();

        let path = temp.path().join("diary").join("2024-05-01_note.md");
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        // No temp files left behind
        let leftovers: Vec<_> = fs::read_dir(temp.path().join("diary"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_write_atomic_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("test.md");
        write_atomic(&target, b"hello").unwrap();

        let perms = fs::metadata(&target).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
    }
}
