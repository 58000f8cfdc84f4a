//! Command execution context
//!
//! Loads configuration and the session snapshot once, so handlers only deal
//! with their own command.

use std::path::PathBuf;

use crate::cache::RequestCache;
use crate::cli::{Cli, OutputFormat};
use crate::client::HttpTransport;
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;

/// Context for command execution
pub struct CommandContext {
    /// Loaded configuration (defaults when no file exists)
    pub config: Config,
    /// Resolved config file path
    pub config_path: PathBuf,
    /// Resolved session snapshot path
    pub session_path: PathBuf,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Build the context from parsed CLI flags.
    ///
    /// `--session` beats `session_path` in the config file, which beats the
    /// default location.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = Config::resolve_path(cli.config.as_deref())?;
        let config = Config::load_at(cli.config.as_deref())?;

        let session_path = match cli.session {
            Some(ref path) => PathBuf::from(path),
            None => config.session_path()?,
        };

        Ok(Self {
            config,
            config_path,
            session_path,
            format: cli.format,
        })
    }

    /// Load the persisted session snapshot
    pub fn load_session(&self) -> Result<Session> {
        Session::load_from(&self.session_path)
    }

    /// Load the session for `can`, `permissions` and `menu`, which deny
    /// rather than fail when the file is unreadable
    pub fn load_session_for_checks(&self) -> Result<Session> {
        Session::load_or_signed_out(&self.session_path)
    }

    /// Create a request cache configured from the cache settings
    pub fn request_cache(&self) -> Result<RequestCache<HttpTransport>> {
        let policy = self.config.cache.policy();
        let transport = match policy.request_timeout {
            Some(timeout) => HttpTransport::with_timeout(timeout)?,
            None => HttpTransport::unbounded()?,
        };
        Ok(RequestCache::new(transport, policy))
    }
}
