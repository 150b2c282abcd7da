use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;

/// Checks if `path` is a file holding at least one byte.
pub fn is_nonempty_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() == true && m.len() > 0)
        .unwrap_or(false)
}

/// Writes `contents` to `path` by way of a temporary file in the same
/// directory.
///
/// On error the destination is left as it was.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if p.as_os_str().is_empty() == false => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
