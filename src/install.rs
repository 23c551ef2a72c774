//! Placing the `terminal-pet` executable into a bin directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PetError, Result};

#[cfg(windows)]
pub const BINARY_NAME: &str = "terminal-pet.exe";
#[cfg(not(windows))]
pub const BINARY_NAME: &str = "terminal-pet";

/// Platform default bin directory under `home`.
pub fn default_bin_dir(home: &Path) -> PathBuf {
    if cfg!(windows) {
        home.join("AppData")
            .join("Local")
            .join("Programs")
            .join("terminal-pet")
    } else {
        home.join(".local").join("bin")
    }
}

/// Where `install` puts the binary when no destination is given.
pub fn default_destination(bin_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match bin_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_bin_dir(&dirs::home_dir().ok_or(PetError::NoHomeDir)?),
    };
    Ok(dir.join(BINARY_NAME))
}

/// The installed binary, if one exists at the default location.
pub fn installed_binary(bin_dir: Option<&Path>) -> Option<PathBuf> {
    default_destination(bin_dir).ok().filter(|p| p.exists())
}

/// Write `bytes` to `dest` as an executable file.
pub fn write_executable(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, bytes)?;
    make_executable(dest)?;
    Ok(())
}

/// Copy the currently running executable to `dest`.
pub fn install_self(dest: &Path) -> Result<PathBuf> {
    let current = std::env::current_exe()?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&current, dest)?;
    make_executable(dest)?;
    tracing::info!(
        from = %current.display(),
        to = %dest.display(),
        "installed terminal-pet"
    );
    Ok(dest.to_path_buf())
}

#[cfg(unix)]
pub(crate) fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_destination_uses_configured_dir() {
        let dir = tempdir().unwrap();
        let dest = default_destination(Some(dir.path())).unwrap();
        assert_eq!(dest, dir.path().join(BINARY_NAME));
    }

    #[cfg(unix)]
    #[test]
    fn unix_default_is_local_bin() {
        assert_eq!(
            default_bin_dir(Path::new("/home/pet")),
            PathBuf::from("/home/pet/.local/bin")
        );
    }

    #[test]
    fn installed_binary_requires_existing_file() {
        let dir = tempdir().unwrap();
        assert!(installed_binary(Some(dir.path())).is_none());
        write_executable(&dir.path().join(BINARY_NAME), b"#!/bin/sh\n").unwrap();
        assert!(installed_binary(Some(dir.path())).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn write_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("sub").join("tool");
        write_executable(&dest, b"bin").unwrap();
        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn install_self_copies_running_executable() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("bin").join(BINARY_NAME);
        install_self(&dest).unwrap();
        let current = std::env::current_exe().unwrap();
        assert_eq!(
            fs::metadata(&dest).unwrap().len(),
            fs::metadata(current).unwrap().len()
        );
    }
}
