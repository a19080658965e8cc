//! Input validation for user-supplied paths and names.

use std::path::{Component, Path};

use crate::error::{PrepError, Result};

/// Input validation utilities for strings.
pub struct InputValidator;

impl InputValidator {
    /// Validates a string length.
    pub fn validate_string_length(value: &str, max_length: usize, name: &str) -> Result<()> {
        if value.len() > max_length {
            return Err(PrepError::SecurityError(format!(
                "{name} too long: {} characters (max {max_length})",
                value.len()
            )));
        }
        Ok(())
    }

    /// Validates that a string doesn't contain null bytes.
    pub fn validate_no_null_bytes(value: &str, name: &str) -> Result<()> {
        if value.contains('\0') {
            return Err(PrepError::SecurityError(format!(
                "{name} cannot contain null bytes"
            )));
        }
        Ok(())
    }
}

/// Validation of paths that must stay below a base directory.
pub struct PathValidator;

impl PathValidator {
    const MAX_PATH_LENGTH: usize = 4096;

    /// Accepts only non-empty relative paths without `..` components.
    pub fn validate_relative(path: &Path) -> Result<()> {
        let display = path.to_string_lossy();
        InputValidator::validate_no_null_bytes(&display, "Path")?;
        InputValidator::validate_string_length(&display, Self::MAX_PATH_LENGTH, "Path")?;

        if path.as_os_str().is_empty() {
            return Err(PrepError::SecurityError("Path cannot be empty".to_string()));
        }

        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(PrepError::SecurityError(format!(
                        "Path '{display}' must not contain '..'"
                    )))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PrepError::SecurityError(format!(
                        "Path '{display}' must be relative"
                    )))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_validation() {
        assert!(InputValidator::validate_string_length("short", 100, "name").is_ok());
        assert!(InputValidator::validate_string_length("too long", 5, "name").is_err());
        assert!(InputValidator::validate_no_null_bytes("contains\0null", "name").is_err());
        assert!(InputValidator::validate_no_null_bytes("clean", "name").is_ok());
    }

    #[test]
    fn test_relative_paths() {
        assert!(PathValidator::validate_relative(Path::new("processed/train.csv")).is_ok());
        assert!(PathValidator::validate_relative(Path::new("./raw/a.csv")).is_ok());

        assert!(PathValidator::validate_relative(Path::new("")).is_err());
        assert!(PathValidator::validate_relative(Path::new("../a.csv")).is_err());
        assert!(PathValidator::validate_relative(Path::new("raw/../../a.csv")).is_err());
        assert!(PathValidator::validate_relative(Path::new("/tmp/a.csv")).is_err());
    }
}
