pub mod console;
pub mod json;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::package::CheckReport;
use crate::pet::{Event, PetState};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// What `status` reports about the pet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub state: PetState,
    /// False when no state file exists yet and the pet is brand new.
    pub persisted: bool,
    pub last_event: Option<Event>,
    pub updated_at: Option<DateTime<Utc>>,
    pub state_file: PathBuf,
}

pub fn render_status(report: &StatusReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render_status(report)),
        OutputFormat::Json => json::render(report),
    }
}

pub fn render_check_report(report: &CheckReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render_check_report(report)),
        OutputFormat::Json => json::render(report),
    }
}
