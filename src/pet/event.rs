use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PetError;

/// Developer activity the pet reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Event {
    Commit,
    TestPass,
    TestFail,
    MergeConflict,
    Inactivity,
    NpmInstall,
    ForcePushMain,
    FridayDeploy,
    BugFix,
}

/// Suggestions further away than this are noise.
const MAX_SUGGESTION_DISTANCE: usize = 3;

impl Event {
    pub const ALL: [Event; 9] = [
        Event::Commit,
        Event::TestPass,
        Event::TestFail,
        Event::MergeConflict,
        Event::Inactivity,
        Event::NpmInstall,
        Event::ForcePushMain,
        Event::FridayDeploy,
        Event::BugFix,
    ];

    /// Kebab-case name used on the command line and in hooks.
    pub fn name(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::TestPass => "test-pass",
            Self::TestFail => "test-fail",
            Self::MergeConflict => "merge-conflict",
            Self::Inactivity => "inactivity",
            Self::NpmInstall => "npm-install",
            Self::ForcePushMain => "force-push-main",
            Self::FridayDeploy => "friday-deploy",
            Self::BugFix => "bug-fix",
        }
    }

    /// Accepts any case and `_` in place of `-`.
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|e| e.name() == normalized)
    }

    /// Closest known event name, if any is near enough to be a typo.
    pub fn suggest(s: &str) -> Option<&'static str> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .map(|e| (e.name(), levenshtein::levenshtein(&normalized, e.name())))
            .filter(|&(_, d)| d <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|&(_, d)| d)
            .map(|(name, _)| name)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Event {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_lenient(s).ok_or_else(|| PetError::UnknownEvent {
            name: s.to_string(),
            suggestion: Self::suggest(s).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_name() {
        for event in Event::ALL {
            assert_eq!(event.name().parse::<Event>().unwrap(), event);
        }
    }

    #[test]
    fn parsing_is_lenient() {
        assert_eq!(Event::from_str_lenient("TEST_PASS"), Some(Event::TestPass));
        assert_eq!(Event::from_str_lenient(" Bug-Fix "), Some(Event::BugFix));
    }

    #[test]
    fn unknown_event_suggests_closest() {
        let err = "comit".parse::<Event>().unwrap_err();
        match err {
            PetError::UnknownEvent { name, suggestion } => {
                assert_eq!(name, "comit");
                assert_eq!(suggestion.as_deref(), Some("commit"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn far_off_names_get_no_suggestion() {
        assert_eq!(Event::suggest("rewrite-history-everywhere"), None);
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Event::ForcePushMain).unwrap();
        assert_eq!(json, "\"force-push-main\"");
    }
}
