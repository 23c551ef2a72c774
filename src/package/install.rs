use std::path::{Path, PathBuf};

use super::{archive, PackageDescriptor};
use crate::error::{PetError, Result};

/// Install the descriptor's binary from `archive_bytes` into `bin_dir`.
///
/// The checksum is verified before anything touches the filesystem. Returns
/// the path of the installed executable.
pub fn install(descriptor: &PackageDescriptor, archive_bytes: &[u8], bin_dir: &Path) -> Result<PathBuf> {
    let actual = archive::sha256_hex(archive_bytes);
    let expected = descriptor.sha256.trim();
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(PetError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        });
    }

    if descriptor.binary.is_empty() || descriptor.binary.contains(['/', '\\']) {
        return Err(PetError::Descriptor(format!(
            "binary name '{}' must be a plain file name",
            descriptor.binary
        )));
    }

    let data = archive::find_binary(archive_bytes, &descriptor.binary)?
        .ok_or_else(|| PetError::MissingBinary(descriptor.binary.clone()))?;

    let dest = bin_dir.join(&descriptor.binary);
    crate::install::write_executable(&dest, &data)?;
    tracing::info!(
        package = %descriptor.name,
        version = %descriptor.version,
        dest = %dest.display(),
        "installed package"
    );
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::test_support::{descriptor_for, tarball};
    use tempfile::tempdir;

    #[test]
    fn installs_verified_binary() {
        let archive = tarball(&[("terminal-pet-v0.1.0/terminal-pet", "#!/bin/sh\necho pet\n")]);
        let d = descriptor_for(&archive);
        let bin = tempdir().unwrap();

        let dest = install(&d, &archive, bin.path()).unwrap();

        assert_eq!(dest, bin.path().join("terminal-pet"));
        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            "#!/bin/sh\necho pet\n"
        );
    }

    #[test]
    fn checksum_mismatch_aborts_before_writing() {
        let archive = tarball(&[("terminal-pet", "good")]);
        let d = descriptor_for(&archive);
        let tampered = tarball(&[("terminal-pet", "bad")]);
        let bin = tempdir().unwrap();

        let err = install(&d, &tampered, bin.path()).unwrap_err();

        assert!(matches!(err, PetError::ChecksumMismatch { .. }));
        assert!(!bin.path().join("terminal-pet").exists());
    }

    #[test]
    fn missing_binary_aborts() {
        let archive = tarball(&[("docs/README.md", "hi")]);
        let d = descriptor_for(&archive);
        let bin = tempdir().unwrap();

        let err = install(&d, &archive, bin.path()).unwrap_err();
        assert!(matches!(err, PetError::MissingBinary(name) if name == "terminal-pet"));
    }

    #[test]
    fn binary_name_cannot_escape_bin_dir() {
        let archive = tarball(&[("terminal-pet", "x")]);
        let mut d = descriptor_for(&archive);
        d.binary = "../terminal-pet".into();
        let bin = tempdir().unwrap();
        assert!(matches!(
            install(&d, &archive, bin.path()),
            Err(PetError::Descriptor(_))
        ));
    }
}
