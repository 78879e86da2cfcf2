#![forbid(unsafe_code)]

use crate::logging::LogFormat;
use anyhow::Context;
use std::net::IpAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORAGE_DIR: &str = "./.doc_audit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind: IpAddr,

    /// The port to listen for HTTP requests on.
    pub port: u16,

    /// Directory holding the SQLite database file.
    pub storage_dir: PathBuf,

    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind = lookup("DOC_AUDIT_BIND")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .context("DOC_AUDIT_BIND should be an IP address")?;

        let port = match lookup("DOC_AUDIT_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("DOC_AUDIT_PORT should be a number")?,
            None => DEFAULT_PORT,
        };

        let storage_dir = lookup("DOC_AUDIT_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        let log_format = match lookup("DOC_AUDIT_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw)
                .with_context(|| format!("unsupported DOC_AUDIT_LOG_FORMAT {raw:?}"))?,
            None => LogFormat::Pretty,
        };

        Ok(Config {
            bind,
            port,
            storage_dir,
            log_format,
        })
    }
}
