//! Optional image assets.
//!
//! The only asset is the logo drawn in the viewer sidebar. A missing logo is
//! an expected condition and simply means no logo is shown.

use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::{self, Settings};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_logo_is_skipped() {
        let path = Path::new("assets/does-not-exist.png");
        assert!(load_logo(path).is_none());
    }

    #[test]
    fn existing_logo_is_read() {
        let path = std::env::temp_dir().join("polviz_logo_test.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let logo = load_logo(&path).unwrap();
        assert_eq!(logo.bytes.len(), 4);
        assert_eq!(logo.path, path);
        fs::remove_file(&path).unwrap();
    }
}

/// Raw bytes of an image file, decoded by whichever renderer draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Reads the logo if the file exists. Read failures are logged and treated
/// like an absent file.
pub fn load_logo(path: &Path) -> Option<Logo> {
    if !path.exists() {
        tracing::debug!("No logo at {:?}, skipping", path);
        return None;
    }
    match fs::read(path) {
        Ok(bytes) => Some(Logo {
            path: path.to_path_buf(),
            bytes,
        }),
        Err(err) => {
            tracing::warn!("Failed to read logo {:?}: {}", path, err);
            None
        }
    }
}

/// Resolves the configured logo against the project root and loads it.
pub fn load_configured_logo(settings: &Settings) -> Option<Logo> {
    let path = Path::new(&settings.logo);
    if path.is_absolute() {
        return load_logo(path);
    }
    match settings::retrieve_project_root() {
        Ok(root) => load_logo(&root.join(path)),
        Err(err) => {
            tracing::debug!("{}, looking for the logo in the working directory", err);
            load_logo(path)
        }
    }
}
