use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PetError, Result};

/// Top-level configuration from `config.toml` in the state directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pet: PetConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub hooks: HooksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetConfig {
    /// Seconds between state reloads in `pet` mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Delay between animation frames.
    #[serde(default = "default_frame_delay")]
    pub frame_delay_ms: u64,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_frame_delay() -> u64 {
    350
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            frame_delay_ms: default_frame_delay(),
        }
    }
}

impl PetConfig {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Directory the binary is installed into. Platform default when unset.
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Overwrite hooks that terminal-pet did not write.
    #[serde(default)]
    pub force: bool,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.pet.poll_interval_secs == 0 {
            return Err(PetError::Config(
                "pet.poll_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# terminal-pet configuration
# See https://github.com/omapem/terminal-pet for documentation.

[pet]
# Seconds between state reloads while `terminal-pet pet` runs.
poll_interval_secs = 5

# Milliseconds each animation frame stays on screen.
frame_delay_ms = 350

[install]
# Where `terminal-pet install` and `package install` put the binary.
# bin_dir = "/usr/local/bin"

[hooks]
# Overwrite existing git hooks that terminal-pet did not write.
force = false
"#
    }
}
