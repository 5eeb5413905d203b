//! Errors raised while reading `project.toml` and `feed.ini`.

use owo_colors::{Stream, Style};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::logger::paint;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed project file")]
    Toml(#[from] toml::de::Error),

    #[error("malformed feed config `{0}`")]
    Ini(PathBuf, #[source] ini::ParseError),

    // no #[from]: the diagnostics already render every problem
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One bad setting, addressed as `section.key`.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: String,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = paint(&self.field, Style::new().cyan().bold(), Stream::Stderr);
        write!(f, "  {field} {}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {hint}", paint("try:", Style::new().yellow(), Stream::Stderr))?;
        }
        Ok(())
    }
}

/// Collects every bad setting before giving up, so one run reports them all.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(field.into(), message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field.into(), message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: String, message: String, hint: Option<String>) {
        self.errors.push(ConfigDiagnostic { field, message, hint });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// `Err` carrying every collected diagnostic, if there is any.
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Diagnostics(self))
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "setting" } else { "settings" };
        let header = format!("{count} invalid {noun}:");
        f.write_str(&paint(&header, Style::new().red().bold(), Stream::Stderr))?;
        for diag in &self.errors {
            write!(f, "\n{diag}")?;
        }
        Ok(())
    }
}
