use std::io::Read;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use tar::Archive;

use crate::error::{PetError, Result};

/// Where release archive bytes come from.
#[derive(Debug, Clone)]
pub enum ArchiveSource {
    File(PathBuf),
    Download(String),
}

impl ArchiveSource {
    pub fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => {
                let bytes = std::fs::read(path)?;
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "read archive");
                Ok(bytes)
            }
            Self::Download(url) => download(url),
        }
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Contents of the first regular file in the gzip tarball whose final path
/// component is `name`.
pub fn find_binary(archive: &[u8], name: &str) -> Result<Option<Vec<u8>>> {
    let mut tar = Archive::new(GzDecoder::new(archive));
    for entry in tar.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let matches = entry
            .path()?
            .file_name()
            .map(|f| f.to_string_lossy() == name)
            .unwrap_or(false);
        if matches {
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            return Ok(Some(data));
        }
    }
    Ok(None)
}

#[cfg(feature = "download")]
fn download(url: &str) -> Result<Vec<u8>> {
    let fail = |e: reqwest::Error| PetError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };
    tracing::info!(url, "downloading release archive");
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .user_agent(concat!("terminal-pet/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(fail)?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(fail)?;
    let bytes = response.bytes().map_err(fail)?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "download"))]
fn download(url: &str) -> Result<Vec<u8>> {
    Err(PetError::Download {
        url: url.to_string(),
        message: "built without the `download` feature".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::test_support::tarball;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn finds_binary_at_any_depth() {
        let archive = tarball(&[
            ("README.md", "readme"),
            ("terminal-pet-v0.1.0/terminal-pet", "\x7fELF"),
        ]);
        let found = find_binary(&archive, "terminal-pet").unwrap();
        assert_eq!(found.as_deref(), Some(&b"\x7fELF"[..]));
    }

    #[test]
    fn missing_binary_is_none() {
        let archive = tarball(&[("README.md", "readme")]);
        assert!(find_binary(&archive, "terminal-pet").unwrap().is_none());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(find_binary(b"definitely not gzip", "terminal-pet").is_err());
    }

    #[test]
    fn file_source_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.tar.gz");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(ArchiveSource::File(path).fetch().unwrap(), b"abc");
    }

    #[test]
    fn unreachable_url_is_a_download_error() {
        let url = "https://127.0.0.1:9/terminal-pet-v0.1.0.tar.gz";
        match ArchiveSource::Download(url.into()).fetch() {
            Err(PetError::Download { url: failed, .. }) => assert_eq!(failed, url),
            other => panic!("expected a download error, got {:?}", other.map(|b| b.len())),
        }
    }
}
