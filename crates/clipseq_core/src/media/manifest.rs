//! concat demuxer manifests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the manifest inside the scratch area.
pub const MANIFEST_FILE_NAME: &str = "concat.txt";

/// Escape a path for a single-quoted `file '...'` entry.
///
/// A quote closes the string, is emitted escaped, and the string reopens.
pub fn escape_concat_path(path: &str) -> String {
    path.replace('\'', "'\\''")
}

/// Write `concat.txt` into `dir`, one `file '<absolute path>'` line per segment.
///
/// ffmpeg resolves relative entries against the manifest's own directory,
/// so every path is made absolute first. Paths that are not valid UTF-8
/// cannot be written to the manifest and fail with `InvalidData`.
pub fn write_concat_manifest(dir: &Path, segments: &[&Path]) -> io::Result<PathBuf> {
    let mut content = String::new();
    for segment in segments {
        let absolute = std::path::absolute(segment)?;
        let entry = absolute.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("segment path is not valid UTF-8: {}", absolute.display()),
            )
        })?;
        content.push_str("file '");
        content.push_str(&escape_concat_path(entry));
        content.push_str("'\n");
    }

    let manifest = dir.join(MANIFEST_FILE_NAME);
    fs::write(&manifest, content)?;
    Ok(manifest)
}

/// Paths listed in a manifest, with escaping undone.
pub fn read_concat_manifest(manifest: &Path) -> io::Result<Vec<PathBuf>> {
    let content = fs::read_to_string(manifest)?;
    Ok(content
        .lines()
        .filter_map(|line| line.strip_prefix("file '")?.strip_suffix('\''))
        .map(|entry| PathBuf::from(entry.replace("'\\''", "'")))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn escapes_single_quotes() {
        assert_eq!(escape_concat_path("/a/plain.mp3"), "/a/plain.mp3");
        assert_eq!(escape_concat_path("/a/it's.mp3"), "/a/it'\\''s.mp3");
    }

    #[test]
    fn writes_absolute_entries_in_order() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("one.mp3");
        let second = dir.path().join("Bob's take.mp3");

        let manifest =
            write_concat_manifest(dir.path(), &[first.as_path(), second.as_path()]).unwrap();

        assert_eq!(manifest, dir.path().join(MANIFEST_FILE_NAME));
        let content = fs::read_to_string(&manifest).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("file '{}'", first.display()));
        assert!(lines[1].ends_with("Bob'\\''s take.mp3'"));

        assert_eq!(read_concat_manifest(&manifest).unwrap(), vec![first, second]);
    }

    #[test]
    fn relative_entries_become_absolute() {
        let dir = tempdir().unwrap();
        let manifest = write_concat_manifest(dir.path(), &[Path::new("clips/a.mp3")]).unwrap();
        let entries = read_concat_manifest(&manifest).unwrap();
        assert!(entries[0].is_absolute());
        assert!(entries[0].ends_with("clips/a.mp3"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_segment_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let clip = dir.path().join(OsStr::from_bytes(b"caf\xe9.wav"));

        let err = write_concat_manifest(dir.path(), &[clip.as_path()]).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(!dir.path().join(MANIFEST_FILE_NAME).exists());
    }
}
