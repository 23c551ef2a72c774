use super::{Check, CheckContext, CheckStatus};
use crate::package::{archive, PLACEHOLDER_SHA256};

/// Returns all built-in packaging checks, in report order.
pub fn all_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(RequiredFields),
        Box::new(DownloadUrl),
        Box::new(ChecksumFormat),
        Box::new(VersionMatchesTag),
        Box::new(ArchiveChecksum),
        Box::new(BinaryPresent),
    ]
}

/// PKG-001: name, url, sha256, version and binary are all set.
struct RequiredFields;

impl Check for RequiredFields {
    fn id(&self) -> &'static str {
        "PKG-001"
    }

    fn name(&self) -> &'static str {
        "Required fields"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> (CheckStatus, String) {
        let d = ctx.descriptor;
        let missing: Vec<&str> = [
            ("name", &d.name),
            ("url", &d.url),
            ("sha256", &d.sha256),
            ("version", &d.version),
            ("binary", &d.binary),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            (CheckStatus::Pass, "all required fields present".into())
        } else {
            (
                CheckStatus::Fail,
                format!("missing: {}", missing.join(", ")),
            )
        }
    }
}

/// PKG-002: the archive URL is a valid https URL.
struct DownloadUrl;

impl Check for DownloadUrl {
    fn id(&self) -> &'static str {
        "PKG-002"
    }

    fn name(&self) -> &'static str {
        "Download URL"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> (CheckStatus, String) {
        match url::Url::parse(&ctx.descriptor.url) {
            Ok(u) if u.scheme() == "https" => (
                CheckStatus::Pass,
                format!("https://{}", u.host_str().unwrap_or("")),
            ),
            Ok(u) => (
                CheckStatus::Fail,
                format!("scheme '{}' is not https", u.scheme()),
            ),
            Err(e) => (CheckStatus::Fail, format!("invalid url: {}", e)),
        }
    }
}

/// PKG-003: the checksum is 64 hex digits and not the placeholder.
struct ChecksumFormat;

impl Check for ChecksumFormat {
    fn id(&self) -> &'static str {
        "PKG-003"
    }

    fn name(&self) -> &'static str {
        "Checksum format"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> (CheckStatus, String) {
        let sha = ctx.descriptor.sha256.trim();
        if sha == PLACEHOLDER_SHA256 {
            return (
                CheckStatus::Fail,
                "checksum is still the placeholder; run `package stamp`".into(),
            );
        }
        if sha.len() == 64 && sha.chars().all(|c| c.is_ascii_hexdigit()) {
            (CheckStatus::Pass, "64 hex digits".into())
        } else {
            (
                CheckStatus::Fail,
                format!("'{}' is not a SHA-256 hex digest", sha),
            )
        }
    }
}

/// PKG-004: the version is semver and agrees with the URL's release tag.
struct VersionMatchesTag;

impl Check for VersionMatchesTag {
    fn id(&self) -> &'static str {
        "PKG-004"
    }

    fn name(&self) -> &'static str {
        "Version matches release tag"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> (CheckStatus, String) {
        let d = ctx.descriptor;
        if let Err(e) = semver::Version::parse(&d.version) {
            return (
                CheckStatus::Fail,
                format!("'{}' is not a semantic version: {}", d.version, e),
            );
        }
        match d.url_tag_version() {
            Some(tag) if tag == d.version => (CheckStatus::Pass, format!("tag v{}", tag)),
            Some(tag) => (
                CheckStatus::Fail,
                format!("version {} but url is tagged v{}", d.version, tag),
            ),
            None => (
                CheckStatus::Pass,
                "url carries no release tag to compare".into(),
            ),
        }
    }
}

/// PKG-005: the archive hashes to the declared checksum.
struct ArchiveChecksum;

impl Check for ArchiveChecksum {
    fn id(&self) -> &'static str {
        "PKG-005"
    }

    fn name(&self) -> &'static str {
        "Archive checksum"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> (CheckStatus, String) {
        let Some(bytes) = ctx.archive else {
            return (CheckStatus::Skipped, "no archive supplied".into());
        };
        let actual = archive::sha256_hex(bytes);
        if actual.eq_ignore_ascii_case(ctx.descriptor.sha256.trim()) {
            (CheckStatus::Pass, actual)
        } else {
            (
                CheckStatus::Fail,
                format!("expected {}, got {}", ctx.descriptor.sha256, actual),
            )
        }
    }
}

/// PKG-006: the archive contains the binary the formula installs.
struct BinaryPresent;

impl Check for BinaryPresent {
    fn id(&self) -> &'static str {
        "PKG-006"
    }

    fn name(&self) -> &'static str {
        "Binary present in archive"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> (CheckStatus, String) {
        let Some(bytes) = ctx.archive else {
            return (CheckStatus::Skipped, "no archive supplied".into());
        };
        let binary = &ctx.descriptor.binary;
        match archive::find_binary(bytes, binary) {
            Ok(Some(data)) => (
                CheckStatus::Pass,
                format!("'{}' found ({} bytes)", binary, data.len()),
            ),
            Ok(None) => (
                CheckStatus::Fail,
                format!("'{}' not found in archive", binary),
            ),
            Err(e) => (CheckStatus::Fail, format!("unreadable archive: {}", e)),
        }
    }
}
