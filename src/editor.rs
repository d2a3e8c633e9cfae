use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Record, ValidationError};
use crate::store::schema::EditorPayload;

pub const FALLBACK_EDITOR: &str = "vim";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Invalid editor command: '{0}'")]
    InvalidCommand(String),
    #[error("Failed to launch editor '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Editor exited with {0}; nothing saved")]
    Cancelled(String),
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Editor file error: {0}")]
    Io(#[from] io::Error),
}

/// Hands records to the user for editing and returns what came back.
/// Blocks until the edit is finished.
pub trait EditorBridge {
    fn edit(&self, seeds: &[Record]) -> Result<Vec<Record>, EditorError>;
}

/// Editor command: configured value, then `$VISUAL`, then `$EDITOR`.
pub fn resolve_command(configured: Option<&str>, visual: Option<&str>, editor: Option<&str>) -> String {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|cmd| !cmd.is_empty())
        .unwrap_or(FALLBACK_EDITOR)
        .to_string()
}

/// Runs an external program on a temporary JSON file.
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Resolve the command from config and the environment.
    pub fn from_env(configured: Option<&str>) -> Self {
        let visual = std::env::var("VISUAL").ok();
        let editor = std::env::var("EDITOR").ok();
        Self::new(resolve_command(configured, visual.as_deref(), editor.as_deref()))
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn launch(&self, path: &Path) -> Result<(), EditorError> {
        let parts =
            shlex::split(&self.command).ok_or_else(|| EditorError::InvalidCommand(self.command.clone()))?;
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| EditorError::InvalidCommand(self.command.clone()))?;
        debug!(command = %self.command, path = %path.display(), "launching editor");
        let status = Command::new(program)
            .args(args)
            .arg(path)
            .status()
            .map_err(|source| EditorError::Launch {
                command: self.command.clone(),
                source,
            })?;
        if !status.success() {
            return Err(EditorError::Cancelled(status.to_string()));
        }
        Ok(())
    }
}

impl EditorBridge for ExternalEditor {
    fn edit(&self, seeds: &[Record]) -> Result<Vec<Record>, EditorError> {
        let file = tempfile::Builder::new()
            .prefix("tcal-")
            .suffix(".json")
            .tempfile()?;
        let seed_json = serde_json::to_string_pretty(&EditorPayload::from_records(seeds))?;
        fs::write(file.path(), seed_json)?;

        self.launch(file.path())?;

        let content = fs::read_to_string(file.path())?;
        let records = parse_editor_output(&content)?;
        info!(seeds = seeds.len(), results = records.len(), "editor returned");
        Ok(records)
    }
}

/// Parse what the user saved. A blank file means nothing to save.
pub fn parse_editor_output(content: &str) -> Result<Vec<Record>, EditorError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let payload: EditorPayload = serde_json::from_str(content)?;
    Ok(payload.into_records()?)
}
