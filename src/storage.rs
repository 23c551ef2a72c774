//! Persisted pet state under the per-user state directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{PetError, Result};
use crate::pet::{Event, Mood, PetState};

pub const STATE_DIR_NAME: &str = ".terminal-pet";
pub const STATE_FILE: &str = "pet.json";
pub const CONFIG_FILE: &str = "config.toml";

/// On-disk form of the pet. Fields added after the first release are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPet {
    pub mood: Mood,
    pub energy: i32,
    pub xp: u32,
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event: Option<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedPet {
    pub fn from_state(state: &PetState, last_event: Option<Event>) -> Self {
        Self {
            mood: state.mood,
            energy: state.energy,
            xp: state.xp,
            level: state.level,
            last_event,
            updated_at: Some(Utc::now()),
        }
    }

    pub fn to_state(&self) -> PetState {
        PetState {
            mood: self.mood,
            energy: self.energy,
            xp: self.xp,
            level: self.level,
        }
    }
}

/// The state directory and the files that live in it.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<home>/.terminal-pet`, or `./.terminal-pet` when no home is known.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STATE_DIR_NAME)
    }

    /// Use the explicit directory if given, the default otherwise.
    pub fn resolve(dir: Option<PathBuf>) -> Self {
        Self::new(dir.unwrap_or_else(Self::default_dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn load(&self) -> Result<Option<PersistedPet>> {
        load(&self.state_path())
    }

    pub fn save(&self, pet: &PersistedPet) -> Result<()> {
        save(&self.state_path(), pet)
    }

    /// Persisted state, or a fresh pet if there is none or it cannot be read.
    pub fn load_or_new(&self) -> PetState {
        match self.load() {
            Ok(Some(persisted)) => persisted.to_state(),
            Ok(None) => PetState::new(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable pet state, starting fresh");
                PetState::new()
            }
        }
    }
}

/// Load state from `path`. A missing file is `Ok(None)`.
pub fn load(path: &Path) -> Result<Option<PersistedPet>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let pet = serde_json::from_str(&content).map_err(|e| PetError::State {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(pet))
}

/// Write state to `path` through a uniquely named temporary sibling and a
/// rename, so concurrent writers never share a temp file.
pub fn save(path: &Path, pet: &PersistedPet) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let json = serde_json::to_string_pretty(pet)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| PetError::Io(e.error))?;
    tracing::debug!(path = %path.display(), "saved pet state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.load_or_new(), PetState::new());
    }

    #[test]
    fn save_then_load_keeps_state() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("nested"));
        let mut state = PetState::new();
        state.apply_event(Event::BugFix);
        let persisted = PersistedPet::from_state(&state, Some(Event::BugFix));

        store.save(&persisted).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, persisted);
        assert_eq!(loaded.to_state(), state);
        let leftovers = fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn concurrent_saves_never_fail() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut errors = 0;
                    for i in 0..100u32 {
                        let mut state = PetState::new();
                        state.add_xp(t * 1000 + i);
                        if store.save(&PersistedPet::from_state(&state, None)).is_err() {
                            errors += 1;
                        }
                    }
                    errors
                })
            })
            .collect();
        let errors: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(errors, 0);
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.level, loaded.xp / 100 + 1);
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[test]
    fn reads_files_without_optional_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(
            &path,
            r#"{"mood":"sad","energy":10,"xp":42,"level":1}"#,
        )
        .unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.mood, Mood::Sad);
        assert_eq!(loaded.last_event, None);
        assert_eq!(loaded.updated_at, None);
    }

    #[test]
    fn reads_capitalized_moods() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(
            &path,
            r#"{"mood":"Scared","energy":50,"xp":0,"level":1}"#,
        )
        .unwrap();
        assert_eq!(load(&path).unwrap().unwrap().mood, Mood::Scared);
    }

    #[test]
    fn corrupt_file_is_an_error_but_load_or_new_recovers() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::write(store.state_path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(PetError::State { .. })));
        assert_eq!(store.load_or_new(), PetState::new());
    }
}
