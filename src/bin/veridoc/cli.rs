//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;
use veridoc::{VerifierConfig, VerifyRequest};

/// Verify that an issued financial document is authentic and unexpired.
#[derive(Parser, Debug)]
#[command(name = "veridoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verification link carrying hash and tx query parameters.
    #[arg(long, conflicts_with = "hash")]
    pub link: Option<String>,

    /// Document hash to verify.
    #[arg(long, env = "VERIDOC_HASH")]
    pub hash: Option<String>,

    /// Ledger transaction reference, used when the record lacks one.
    #[arg(long, env = "VERIDOC_TX")]
    pub tx: Option<String>,

    /// Root directory for locally cached documents.
    #[arg(long, env = "VERIDOC_ROOT_DIR")]
    pub root_dir: Option<PathBuf>,

    /// Base URL of the remote document service.
    #[arg(long, env = "VERIDOC_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Skip the remote document service and verify locally only.
    #[arg(long)]
    pub offline: bool,

    /// Log level.
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Path to configuration file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Convert CLI arguments into a config and a verification request.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be
    /// loaded, or if the verification link cannot be parsed.
    pub fn into_parts(self) -> color_eyre::Result<(VerifierConfig, VerifyRequest)> {
        // Start with default config or load from file
        let mut config = if let Some(ref path) = self.config {
            VerifierConfig::from_file(path)?
        } else {
            VerifierConfig::default()
        };

        // Override with CLI arguments
        if let Some(root_dir) = self.root_dir {
            config.root_dir = root_dir;
        }
        if let Some(remote_url) = self.remote_url {
            config.remote.base_url = Some(remote_url);
        }
        if self.offline {
            config.remote.enabled = false;
        }
        config.log_level = self.log_level;

        let request = if let Some(ref link) = self.link {
            VerifyRequest::from_link(link)?
        } else if let Some(hash) = self.hash {
            VerifyRequest::new(hash, self.tx)
        } else {
            VerifyRequest::empty()
        };

        Ok((config, request))
    }
}
