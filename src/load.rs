use crate::{Error, ErrorKind};
use std::path::Path;
use tracing::debug;

/// Read the whole save into memory.
///
/// A file that can't be read or that has no contents is a load failure and
/// is never handed to the decoder.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| {
        Error::new(ErrorKind::Load {
            path: path.to_path_buf(),
            source,
        })
    })?;

    if data.is_empty() {
        return Err(Error::new(ErrorKind::Empty {
            path: path.to_path_buf(),
        }));
    }

    debug!(path = %path.display(), bytes = data.len(), "loaded save");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("savedump-load-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(temp_path("does-not-exist")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Load { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_file() {
        let path = temp_path("empty");
        std::fs::write(&path, b"").unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err.kind(), ErrorKind::Empty { .. }));
    }

    #[test]
    fn test_reads_contents() {
        let path = temp_path("contents");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let data = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }
}
