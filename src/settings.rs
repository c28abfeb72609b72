use crate::Error;
use clap::Parser;
use serde::Deserialize;
use std::{net::SocketAddr, path::PathBuf};

/// Command line of the `read-and-sign` binary. Flags override the config file.
#[derive(Debug, Parser)]
#[command(name = "read-and-sign", version, about = "Stamp drawn signatures onto PDFs")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "READ_AND_SIGN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:3000
    #[arg(long, env = "READ_AND_SIGN_BIND")]
    pub bind: Option<SocketAddr>,

    /// Log filter, e.g. `debug` or `info,read_and_sign=trace`
    #[arg(long, env = "READ_AND_SIGN_LOG")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub bind: SocketAddr,
    /// Directory holding the source documents.
    pub public_dir: PathBuf,
    /// Directory signed documents are written to.
    pub output_dir: PathBuf,
    /// JSON file with the per signer daily counters.
    pub activity_log: PathBuf,
    pub max_body_bytes: usize,
    pub log_level: String,
    /// Also log to files in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            public_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("signedDocuments"),
            activity_log: PathBuf::from("userLogs.json"),
            max_body_bytes: 10 * 1024 * 1024,
            log_level: "info".to_owned(),
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|err| Error::Other(format!("Invalid config: {}", err)))
    }

    /// Read the config file named on the command line (if any) and apply the flags.
    pub fn load(cli: &Cli) -> Result<Self, Error> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        if let Some(bind) = cli.bind {
            settings.bind = bind;
        }
        if let Some(log_level) = &cli.log_level {
            settings.log_level = log_level.clone();
        }
        Ok(settings)
    }
}
