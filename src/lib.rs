//! terminal-pet — a tiny terminal pet that reacts to your git activity.
//!
//! Events (commits, test runs, merge conflicts, ...) change the pet's mood,
//! energy and XP. State lives in a JSON file under `~/.terminal-pet`; git
//! hooks feed events automatically. The crate also ships the tooling for its
//! own release formula: render, verify and install from a release archive.
//!
//! # Quick Start
//!
//! ```no_run
//! use terminal_pet::storage::Store;
//!
//! let store = Store::resolve(None);
//! let saved = terminal_pet::record_event(&store, "commit").unwrap();
//! println!("Mood: {}, XP: {}", saved.mood, saved.xp);
//! ```

pub mod config;
pub mod error;
pub mod hooks;
pub mod install;
pub mod output;
pub mod package;
pub mod pet;
pub mod render;
pub mod storage;

use std::path::Path;

use error::Result;
use output::StatusReport;
use package::{ArchiveSource, CheckEngine, CheckReport, PackageDescriptor};
use pet::Event;
use storage::{PersistedPet, Store};

/// Apply a named event to the persisted pet and save the result.
///
/// Unreadable state is replaced by a fresh pet rather than blocking the event.
pub fn record_event(store: &Store, name: &str) -> Result<PersistedPet> {
    let event: Event = name.parse()?;
    let mut state = store.load_or_new();
    state.apply_event(event);
    let persisted = PersistedPet::from_state(&state, Some(event));
    store.save(&persisted)?;
    Ok(persisted)
}

/// Current pet status for display.
pub fn status(store: &Store) -> StatusReport {
    let persisted = match store.load() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable pet state");
            None
        }
    };
    StatusReport {
        state: persisted
            .as_ref()
            .map(PersistedPet::to_state)
            .unwrap_or_default(),
        persisted: persisted.is_some(),
        last_event: persisted.as_ref().and_then(|p| p.last_event),
        updated_at: persisted.as_ref().and_then(|p| p.updated_at),
        state_file: store.state_path(),
    }
}

/// Read and parse a formula file.
pub fn load_formula(path: &Path) -> Result<PackageDescriptor> {
    let text = std::fs::read_to_string(path)?;
    package::formula::parse(&text)
}

/// Run all package checks for a formula, optionally against an archive.
pub fn check_formula(path: &Path, source: Option<&ArchiveSource>) -> Result<CheckReport> {
    let descriptor = load_formula(path)?;
    let archive = source.map(ArchiveSource::fetch).transpose()?;
    Ok(CheckEngine::new().run(&descriptor, archive.as_deref()))
}

/// Install the binary described by a formula into `bin_dir`.
///
/// Without an explicit archive the formula's URL is downloaded.
pub fn install_formula(
    path: &Path,
    archive: Option<&Path>,
    bin_dir: &Path,
) -> Result<std::path::PathBuf> {
    let descriptor = load_formula(path)?;
    let source = match archive {
        Some(p) => ArchiveSource::File(p.to_path_buf()),
        None => ArchiveSource::Download(descriptor.url.clone()),
    };
    let bytes = source.fetch()?;
    package::install(&descriptor, &bytes, bin_dir)
}
