//! SHA-256 checksums stored next to dataset files.
//!
//! A file `raw/students.csv` gets the sidecar `raw/students.sha256` holding
//! the lowercase hex digest.

use std::fs::File;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use crate::prelude::*;

/// Path of the checksum sidecar for `path`.
pub fn checksum_path(path: &Path) -> PathBuf {
    path.with_extension("sha256")
}

/// Lowercase hex SHA-256 digest of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PrepError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => PrepError::Io(e),
    })?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Computes the digest of `path` and writes it to the sidecar file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_checksum(path: &Path) -> Result<PathBuf> {
    let digest = sha256_file(path)?;
    let sidecar = checksum_path(path);
    std::fs::write(&sidecar, &digest)?;
    info!(checksum = %digest, sidecar = %sidecar.display(), "SHA256 checksum saved");
    Ok(sidecar)
}

/// Recomputes the digest of `path` and compares it with the sidecar.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn verify_checksum(path: &Path) -> Result<()> {
    let sidecar = checksum_path(path);
    let expected = std::fs::read_to_string(&sidecar)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PrepError::FileNotFound {
                path: sidecar.clone(),
            },
            _ => PrepError::Io(e),
        })?
        .trim()
        .to_lowercase();
    let actual = sha256_file(path)?;

    if expected != actual {
        warn!(%expected, %actual, "Checksum mismatch");
        return Err(PrepError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            checksum_path(Path::new("data/raw/students.csv")),
            PathBuf::from("data/raw/students.sha256")
        );
    }

    #[test]
    fn test_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.csv");
        std::fs::write(&path, "abc").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_write_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "id,label\n1,A\n").unwrap();

        let sidecar = write_checksum(&path).unwrap();
        assert_eq!(sidecar, dir.path().join("students.sha256"));
        verify_checksum(&path).unwrap();

        std::fs::write(&path, "id,label\n1,B\n").unwrap();
        let err = verify_checksum(&path).unwrap_err();
        assert!(matches!(err, PrepError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            sha256_file(&path).unwrap_err(),
            PrepError::FileNotFound { .. }
        ));

        std::fs::write(&path, "x").unwrap();
        assert!(matches!(
            verify_checksum(&path).unwrap_err(),
            PrepError::FileNotFound { .. }
        ));
    }
}
