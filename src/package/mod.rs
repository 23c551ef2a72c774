//! Release packaging: the package descriptor (Homebrew formula) for a
//! pre-built release archive, its integrity checks, and the install step.
//!
//! A descriptor is authored once per release and consumed once per install.
//! The archive's SHA-256 must equal the declared checksum or nothing is
//! installed.

pub mod archive;
pub mod checks;
pub mod formula;
pub mod install;

use serde::{Deserialize, Serialize};

pub use archive::ArchiveSource;
pub use checks::{CheckEngine, CheckReport, CheckResult, CheckStatus, Verdict};
pub use install::install;

/// Placeholder checksum left in formulas that were never stamped.
pub const PLACEHOLDER_SHA256: &str = "REPLACE_WITH_REAL_SHA256";

/// Static metadata describing one release of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package identifier, kebab-case (`terminal-pet`).
    pub name: String,
    /// One-line summary.
    pub description: String,
    /// Informational URL.
    pub homepage: String,
    /// Location of the pre-built release archive.
    pub url: String,
    /// Expected SHA-256 of the archive, lowercase hex.
    pub sha256: String,
    /// Release version string.
    pub version: String,
    /// Executable installed from the archive.
    pub binary: String,
}

/// What the release pipeline knows when it authors a descriptor.
#[derive(Debug, Clone)]
pub struct ReleaseInfo {
    pub name: String,
    pub description: String,
    /// GitHub `owner/repo`.
    pub repo: String,
    pub version: semver::Version,
    /// Target triple the archive was built for.
    pub target: String,
}

impl ReleaseInfo {
    /// Archive file name produced by the release workflow.
    pub fn archive_name(&self) -> String {
        format!("{}-v{}-{}.tar.gz", self.name, self.version, self.target)
    }

    pub fn download_url(&self) -> String {
        format!(
            "https://github.com/{}/releases/download/v{}/{}",
            self.repo,
            self.version,
            self.archive_name()
        )
    }
}

impl PackageDescriptor {
    /// Descriptor for a GitHub release archive with a known checksum.
    pub fn for_release(release: &ReleaseInfo, sha256: impl Into<String>) -> Self {
        Self {
            name: release.name.clone(),
            description: release.description.clone(),
            homepage: format!("https://github.com/{}", release.repo),
            url: release.download_url(),
            sha256: sha256.into().to_lowercase(),
            version: release.version.to_string(),
            binary: release.name.clone(),
        }
    }

    /// Version embedded in the URL's release tag, e.g. `0.1.0` from
    /// `.../releases/download/v0.1.0/...`.
    pub fn url_tag_version(&self) -> Option<String> {
        url_tag_version(&self.url)
    }
}

pub(crate) fn url_tag_version(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let mut segments = parsed.path_segments()?;
    segments.find(|s| *s == "download")?;
    let tag = segments.next()?;
    let version = tag.strip_prefix('v').unwrap_or(tag);
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::release;
    use super::*;

    #[test]
    fn release_url_follows_github_layout() {
        assert_eq!(
            release().download_url(),
            "https://github.com/omapem/terminal-pet/releases/download/v0.1.0/terminal-pet-v0.1.0-x86_64-unknown-linux-gnu.tar.gz"
        );
    }

    #[test]
    fn for_release_lowercases_checksum() {
        let d = PackageDescriptor::for_release(&release(), "ABCDEF");
        assert_eq!(d.sha256, "abcdef");
        assert_eq!(d.binary, "terminal-pet");
        assert_eq!(d.homepage, "https://github.com/omapem/terminal-pet");
    }

    #[test]
    fn tag_version_is_read_from_url() {
        let d = PackageDescriptor::for_release(&release(), "00");
        assert_eq!(d.url_tag_version().as_deref(), Some("0.1.0"));
        assert_eq!(url_tag_version("https://example.com/pet.tar.gz"), None);
    }
}
