mod builtin;

use serde::{Deserialize, Serialize};

use super::PackageDescriptor;

/// Everything a packaging check may look at.
pub struct CheckContext<'a> {
    pub descriptor: &'a PackageDescriptor,
    /// Release archive bytes, when one was supplied or downloaded.
    pub archive: Option<&'a [u8]>,
}

/// A packaging-integrity check.
pub trait Check: Send + Sync {
    /// Stable identifier (e.g., "PKG-005").
    fn id(&self) -> &'static str;

    /// Human-readable check name.
    fn name(&self) -> &'static str;

    /// Run the check. Returns the status and an explanation.
    fn run(&self, ctx: &CheckContext<'_>) -> (CheckStatus, String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Needs an archive and none was given.
    Skipped,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

/// Final pass/fail decision over all check results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub pass: bool,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Verdict {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
        let failed = count(CheckStatus::Fail);
        Self {
            pass: failed == 0,
            passed: count(CheckStatus::Pass),
            failed,
            skipped: count(CheckStatus::Skipped),
        }
    }
}

/// Complete check report for one descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub package: String,
    pub version: String,
    pub results: Vec<CheckResult>,
    pub verdict: Verdict,
}

/// Runs every registered check against a descriptor.
pub struct CheckEngine {
    checks: Vec<Box<dyn Check>>,
}

impl CheckEngine {
    /// Create a new engine with all built-in checks registered.
    pub fn new() -> Self {
        Self {
            checks: builtin::all_checks(),
        }
    }

    pub fn run(&self, descriptor: &PackageDescriptor, archive: Option<&[u8]>) -> CheckReport {
        let ctx = CheckContext {
            descriptor,
            archive,
        };
        let results: Vec<CheckResult> = self
            .checks
            .iter()
            .map(|check| {
                let (status, message) = check.run(&ctx);
                if status == CheckStatus::Fail {
                    tracing::warn!(check = check.id(), %message, "package check failed");
                }
                CheckResult {
                    id: check.id().into(),
                    name: check.name().into(),
                    status,
                    message,
                }
            })
            .collect();
        let verdict = Verdict::from_results(&results);
        CheckReport {
            package: descriptor.name.clone(),
            version: descriptor.version.clone(),
            results,
            verdict,
        }
    }

    /// (id, name) of every registered check.
    pub fn list_checks(&self) -> Vec<(&'static str, &'static str)> {
        self.checks.iter().map(|c| (c.id(), c.name())).collect()
    }
}

impl Default for CheckEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::test_support::{descriptor_for, tarball};
    use crate::package::PLACEHOLDER_SHA256;

    fn status_of(report: &CheckReport, id: &str) -> CheckStatus {
        report
            .results
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
            .unwrap()
    }

    #[test]
    fn good_release_passes_everything() {
        let archive = tarball(&[("terminal-pet", "bin")]);
        let d = descriptor_for(&archive);
        let report = CheckEngine::new().run(&d, Some(&archive));
        assert!(report.verdict.pass, "{:?}", report.results);
        assert_eq!(report.verdict.failed, 0);
        assert_eq!(report.verdict.skipped, 0);
        assert_eq!(report.verdict.passed, CheckEngine::new().list_checks().len());
    }

    #[test]
    fn archive_checks_skip_without_archive() {
        let d = descriptor_for(b"whatever");
        let report = CheckEngine::new().run(&d, None);
        assert!(report.verdict.pass);
        assert_eq!(status_of(&report, "PKG-005"), CheckStatus::Skipped);
        assert_eq!(status_of(&report, "PKG-006"), CheckStatus::Skipped);
    }

    #[test]
    fn placeholder_checksum_fails() {
        let mut d = descriptor_for(b"x");
        d.sha256 = PLACEHOLDER_SHA256.into();
        let report = CheckEngine::new().run(&d, None);
        assert!(!report.verdict.pass);
        assert_eq!(status_of(&report, "PKG-003"), CheckStatus::Fail);
    }

    #[test]
    fn tampered_archive_fails_checksum() {
        let archive = tarball(&[("terminal-pet", "bin")]);
        let d = descriptor_for(&archive);
        let other = tarball(&[("terminal-pet", "evil")]);
        let report = CheckEngine::new().run(&d, Some(&other));
        assert_eq!(status_of(&report, "PKG-005"), CheckStatus::Fail);
        assert_eq!(status_of(&report, "PKG-006"), CheckStatus::Pass);
    }

    #[test]
    fn version_must_match_url_tag() {
        let mut d = descriptor_for(b"x");
        d.version = "0.2.0".into();
        let report = CheckEngine::new().run(&d, None);
        assert_eq!(status_of(&report, "PKG-004"), CheckStatus::Fail);
    }

    #[test]
    fn missing_binary_fails() {
        let archive = tarball(&[("README.md", "hi")]);
        let d = descriptor_for(&archive);
        let report = CheckEngine::new().run(&d, Some(&archive));
        assert_eq!(status_of(&report, "PKG-006"), CheckStatus::Fail);
    }
}
