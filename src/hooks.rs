//! Git hook installation: a `post-commit` hook that feeds the pet.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PetError, Result};
use crate::pet::Event;

/// Marker line identifying hooks written by terminal-pet.
pub const HOOK_MARKER: &str = "terminal-pet hook";

/// Result of a hook installation.
#[derive(Debug, Clone)]
pub struct InstalledHooks {
    pub unix: PathBuf,
    pub windows: PathBuf,
}

/// POSIX shell variant. Always exits 0 so a missing pet never blocks a commit.
pub fn unix_script(binary: Option<&Path>, event: Event) -> String {
    let program = binary
        .map(|p| shell_quote(&p.display().to_string()))
        .unwrap_or_else(|| "terminal-pet".into());
    format!(
        "#!/bin/sh\n# {}\n{} event {} || true\n",
        HOOK_MARKER, program, event
    )
}

/// Batch variant for Git for Windows.
pub fn windows_script(binary: Option<&Path>, event: Event) -> String {
    let program = binary
        .map(|p| format!("\"{}\"", p.display()))
        .unwrap_or_else(|| "terminal-pet.exe".into());
    format!(
        "@echo off\r\nrem {}\r\n{} event {} || exit /b 0\r\n",
        HOOK_MARKER, program, event
    )
}

fn shell_quote(s: &str) -> String {
    if s.chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Install `post-commit` and `post-commit.bat` into `<repo>/.git/hooks`.
///
/// `binary` is the absolute path of an installed terminal-pet; when `None`
/// the hooks rely on `PATH`. Existing hooks not written by terminal-pet are
/// left alone unless `force` is set.
pub fn install_post_commit(repo: &Path, binary: Option<&Path>, force: bool) -> Result<InstalledHooks> {
    let hook_dir = git_dir(repo)?.join("hooks");
    fs::create_dir_all(&hook_dir)?;

    let unix = hook_dir.join("post-commit");
    let windows = hook_dir.join("post-commit.bat");
    for path in [&unix, &windows] {
        check_overwrite(path, force)?;
    }

    fs::write(&unix, unix_script(binary, Event::Commit))?;
    crate::install::make_executable(&unix)?;
    fs::write(&windows, windows_script(binary, Event::Commit))?;

    tracing::info!(
        hook = %unix.display(),
        binary = binary.map(|b| b.display().to_string()).unwrap_or_else(|| "PATH".into()),
        "installed post-commit hook"
    );
    Ok(InstalledHooks { unix, windows })
}

/// The directory holding `hooks/` for `repo`.
///
/// `.git` is usually a directory. In worktrees and submodules it is a file
/// with a `gitdir: <path>` line; a worktree's gitdir then names the shared
/// repository through its `commondir` file.
pub fn git_dir(repo: &Path) -> Result<PathBuf> {
    let dot_git = repo.join(".git");
    if dot_git.is_dir() {
        return Ok(dot_git);
    }
    let not_a_repo = || PetError::NotGitRepo(repo.to_path_buf());
    if !dot_git.is_file() {
        return Err(not_a_repo());
    }

    let content = fs::read_to_string(&dot_git)?;
    let pointer = content
        .lines()
        .find_map(|line| line.strip_prefix("gitdir:"))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(not_a_repo)?;
    let gitdir = repo.join(pointer);
    if !gitdir.is_dir() {
        return Err(not_a_repo());
    }

    match fs::read_to_string(gitdir.join("commondir")) {
        Ok(common) => Ok(gitdir.join(common.trim())),
        Err(_) => Ok(gitdir),
    }
}

fn check_overwrite(path: &Path, force: bool) -> Result<()> {
    if force || !path.exists() {
        return Ok(());
    }
    let existing = fs::read_to_string(path).unwrap_or_default();
    if existing.contains(HOOK_MARKER) {
        return Ok(());
    }
    Err(PetError::HookConflict(path.to_path_buf()))
}
