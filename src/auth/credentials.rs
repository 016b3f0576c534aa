// src/auth/credentials.rs
use crate::errors::{ExportError, Result};
use std::path::PathBuf;

/// Supplies the bearer token used on every API request.
pub trait CredentialProvider {
    fn token(&self) -> Result<String>;

    /// Human-readable origin, safe to log (never the token itself).
    fn describe(&self) -> String;
}

/// Token read from an environment variable (e.g. a CI secret).
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredential {
    fn token(&self) -> Result<String> {
        let value = std::env::var(&self.var).map_err(|_| {
            ExportError::Credential(format!("Missing {} environment variable", self.var))
        })?;

        let token = value.trim();
        if token.is_empty() {
            return Err(ExportError::Credential(format!(
                "{} environment variable is empty",
                self.var
            )));
        }
        Ok(token.to_string())
    }

    fn describe(&self) -> String {
        format!("env:{}", self.var)
    }
}

/// Token read from a file, such as a mounted secret.
#[derive(Debug, Clone)]
pub struct FileCredential {
    path: PathBuf,
}

impl FileCredential {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for FileCredential {
    fn token(&self) -> Result<String> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            ExportError::Credential(format!(
                "Failed to read token file {}: {e}",
                self.path.display()
            ))
        })?;

        let token = raw.trim();
        if token.is_empty() {
            return Err(ExportError::Credential(format!(
                "Token file {} is empty",
                self.path.display()
            )));
        }
        Ok(token.to_string())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
