use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

/// Threshold in bytes above which we attempt to use mmap for reading.
/// Callers can override via API; this is a reasonable default.
pub const DEFAULT_MMAP_THRESHOLD_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

pub type LineIter = Box<dyn Iterator<Item = io::Result<String>> + Send + 'static>;

/// Failure to load a text file. An interactive caller recovers from any of
/// these by asking for another path.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Decide whether to use mmap based on file size and threshold.
pub fn should_use_mmap(file_size_bytes: u64, threshold_bytes: u64) -> bool {
    file_size_bytes >= threshold_bytes
}

/// Iterate lines from a file path using buffered reader (non-mmap). Lines
/// are decoded the same way as the mmap path.
pub fn iter_lines_bufread<P: AsRef<Path>>(path: P) -> io::Result<LineIter> {
    let file = File::open(&path)?;
    Ok(Box::new(BufLines {
        reader: BufReader::new(file),
        buf: Vec::new(),
    }))
}

struct BufLines {
    reader: BufReader<File>,
    buf: Vec<u8>,
}

impl Iterator for BufLines {
    type Item = io::Result<String>;
    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.buf.strip_suffix(b"\n").unwrap_or(self.buf.as_slice());
                Some(Ok(line_from_bytes(line)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Iterate lines from a file path using mmap. Scans for '\n' boundaries and
/// allocates one String per returned line.
pub fn iter_lines_mmap<P: AsRef<Path>>(path: P) -> io::Result<LineIter> {
    let file = File::open(&path)?;
    // SAFETY: the mapping is read-only and dropped with the iterator.
    let mmap = unsafe { Mmap::map(&file) }?;
    Ok(Box::new(MmapLines { mmap, pos: 0 }))
}

struct MmapLines {
    mmap: Mmap,
    pos: usize,
}

impl Iterator for MmapLines {
    type Item = io::Result<String>;
    fn next(&mut self) -> Option<Self::Item> {
        let data: &[u8] = &self.mmap;
        if self.pos >= data.len() {
            return None;
        }
        let start = self.pos;
        if let Some(off) = memchr::memchr(b'\n', &data[self.pos..]) {
            let end = self.pos + off;
            self.pos = end + 1;
            Some(Ok(line_from_bytes(&data[start..end])))
        } else {
            // Last line without trailing newline
            self.pos = data.len();
            Some(Ok(line_from_bytes(&data[start..])))
        }
    }
}

/// Invalid UTF-8 is replaced, never an error.
fn line_from_bytes(bytes: &[u8]) -> String {
    // Trim a trailing '\r' if present (handle Windows CRLF)
    let slice = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(slice).into_owned()
}

/// Choose mmap or bufread and return an iterator over lines.
pub fn iter_lines_auto<P: AsRef<Path>>(path: P, threshold_bytes: u64) -> io::Result<LineIter> {
    let meta = std::fs::metadata(&path)?;
    if meta.is_file() && should_use_mmap(meta.len(), threshold_bytes) {
        iter_lines_mmap(path)
    } else {
        iter_lines_bufread(path)
    }
}

/// Read every line of `path`, whitespace-trimmed, in file order.
pub fn load_lines<P: AsRef<Path>>(path: P, threshold_bytes: u64) -> Result<Vec<String>, LoadError> {
    let path = path.as_ref();
    let meta = std::fs::metadata(path).map_err(|e| LoadError::from_io(path, e))?;
    if !meta.is_file() {
        return Err(LoadError::NotAFile(path.to_path_buf()));
    }
    let iter = iter_lines_auto(path, threshold_bytes).map_err(|e| LoadError::from_io(path, e))?;
    let mut lines = Vec::new();
    for line in iter {
        let line = line.map_err(|e| LoadError::from_io(path, e))?;
        lines.push(line.trim().to_string());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load_lines(dir.path().join("nope.txt"), DEFAULT_MMAP_THRESHOLD_BYTES)
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let err = load_lines(dir.path(), DEFAULT_MMAP_THRESHOLD_BYTES).unwrap_err();
        assert!(matches!(err, LoadError::NotAFile(_)));
    }

    #[test]
    fn mmap_and_bufread_agree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("creds.txt");
        std::fs::write(&path, "alice:aaa\r\n  bob:bbb \ncarol:ccc").unwrap();
        let buffered = load_lines(&path, u64::MAX).unwrap();
        let mapped = load_lines(&path, 1).unwrap();
        assert_eq!(buffered, vec!["alice:aaa", "bob:bbb", "carol:ccc"]);
        assert_eq!(buffered, mapped);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily_on_both_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"j\xf6rg:aaa\nbob:bbb\n").unwrap();
        let buffered = load_lines(&path, u64::MAX).unwrap();
        let mapped = load_lines(&path, 1).unwrap();
        assert_eq!(buffered, vec!["j\u{fffd}rg:aaa", "bob:bbb"]);
        assert_eq!(buffered, mapped);
    }
}
