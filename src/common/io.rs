use std::{fs, io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("could not read source file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read a whole source file, normalising Windows line endings to `\n`.
pub fn read_source(path: impl Into<PathBuf>) -> Result<String, IoError> {
    let path = path.into();
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text.replace("\r\n", "\n")),
        Err(source) => Err(IoError::Read { path, source }),
    }
}

pub fn write_file(path: impl Into<PathBuf>, contents: &[u8]) -> Result<(), IoError> {
    let path = path.into();
    fs::write(&path, contents).map_err(|source| IoError::Write { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = read_source("definitely/not/here.tri");

        match result {
            Err(IoError::Read { path, .. }) => {
                assert_eq!(path, PathBuf::from("definitely/not/here.tri"))
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_crlf_is_normalised() {
        let path = std::env::temp_dir().join("triangle_io_crlf_test.tri");
        write_file(&path, b"let\r\nin\r\n").unwrap();

        assert_eq!(read_source(&path).unwrap(), "let\nin\n");
        let _ = fs::remove_file(path);
    }
}
