// src/config.rs
use crate::auth::{CredentialProvider, EnvCredential, FileCredential};
use crate::errors::{ExportError, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_START_URL: &str = "https://api.reverb.com/api/my/listings?state=all";
pub const DEFAULT_OUTPUT: &str = "ReverbCityMusic.xlsx";
pub const DEFAULT_TOKEN_ENV: &str = "REVERB_TOKEN";
pub const DEFAULT_SHEET_TITLE: &str = "Reverb Listings";

/// Export a seller's Reverb listings into an XLSX workbook.
#[derive(Parser, Debug, Clone)]
#[command(name = "reverb_export", version, about)]
pub struct CliArgs {
    /// First listings page to fetch
    #[arg(long, env = "REVERB_START_URL", default_value = DEFAULT_START_URL)]
    pub start_url: String,

    /// Workbook to write
    #[arg(short = 'o', long, env = "REVERB_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Environment variable holding the bearer token
    #[arg(long, value_name = "VAR", default_value = DEFAULT_TOKEN_ENV)]
    pub token_env: String,

    /// Read the bearer token from this file instead (e.g. a mounted secret)
    #[arg(long, env = "REVERB_TOKEN_FILE", value_name = "PATH")]
    pub token_file: Option<PathBuf>,

    /// Pause between page requests, in milliseconds
    #[arg(long, env = "REVERB_PAGE_DELAY_MS", default_value_t = 150)]
    pub page_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "REVERB_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Worksheet name
    #[arg(long, default_value = DEFAULT_SHEET_TITLE)]
    pub sheet_title: String,
}

/// Where the bearer token comes from. Never a compiled-in literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Env(String),
    File(PathBuf),
}

impl CredentialSource {
    pub fn provider(&self) -> Box<dyn CredentialProvider> {
        match self {
            CredentialSource::Env(var) => Box::new(EnvCredential::new(var.clone())),
            CredentialSource::File(path) => Box::new(FileCredential::new(path.clone())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub start_url: Url,
    pub output_path: PathBuf,
    pub credential: CredentialSource,
    pub page_delay: Duration,
    pub timeout: Duration,
    pub sheet_title: String,
}

impl ExportConfig {
    /// Load `.env` (if any), parse the command line and validate it.
    pub fn load() -> Result<Self> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let start_url = parse_start_url(&args.start_url)?;

        if args.output.as_os_str().is_empty() {
            return Err(ExportError::Config("output path is empty".into()));
        }

        let sheet_title = args.sheet_title.trim().to_string();
        if sheet_title.is_empty() {
            return Err(ExportError::Config("sheet title is empty".into()));
        }

        let credential = match args.token_file {
            Some(path) => CredentialSource::File(path),
            None => {
                let var = args.token_env.trim();
                if var.is_empty() {
                    return Err(ExportError::Config("token env var name is empty".into()));
                }
                CredentialSource::Env(var.to_string())
            }
        };

        Ok(Self {
            start_url,
            output_path: args.output,
            credential,
            page_delay: Duration::from_millis(args.page_delay_ms),
            timeout: Duration::from_secs(args.timeout_secs),
            sheet_title,
        })
    }
}

fn parse_start_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ExportError::Config(format!("invalid start url '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExportError::Config(format!(
            "start url must be http(s), got '{other}'"
        ))),
    }
}
