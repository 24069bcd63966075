//! Serialization of resolved layouts into exchange formats.
//!
//! Three formats share this module: a 2D plan drawing ([`svg`]), a binary
//! 3D scene ([`glb`]), and a spatial-hierarchy building model ([`ifc`]).
//! All three are pure functions of the layout: the same input serializes
//! to byte-identical output on every call.
//!
//! # Pipeline Position
//!
//! ```text
//! resolve -> extrude -> [export]
//! ```

use std::{fs::File, io::Write, path::Path};

use log::{error, info};

pub mod glb;
pub mod ifc;
pub mod svg;

/// Errors raised while serializing or writing an export artifact.
#[derive(Debug)]
pub enum Error {
    Serialize(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "Serialization error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

/// Writes an export artifact to the specified file.
pub fn write_artifact(path: &Path, content: &[u8]) -> Result<(), Error> {
    info!(path:% = path.display(); "Writing export artifact");
    let mut file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            error!(path:% = path.display(), err:err; "Failed to create artifact file");
            return Err(Error::Io(err));
        }
    };

    if let Err(err) = file.write_all(content) {
        error!(path:% = path.display(), err:err; "Failed to write artifact content");
        return Err(Error::Io(err));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_write_artifact_rejects_bad_path() {
        let result = write_artifact(Path::new("/nonexistent/dir/out.svg"), b"payload");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
