//! Persisted session snapshot
//!
//! Sign-in writes the grants list and the string-encoded legacy menu to a
//! JSON file. Every command reads it at bootstrap; sign-out deletes it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::access::{Action, ModuleAccess, PermissionResolver, Permissions};
use crate::error::{ConfigError, Result, SessionError};
use crate::menu::{MenuItem, MenuSnapshot, legacy_tree};

/// On-disk shape of the session file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// `null` until structured grants are known
    #[serde(default)]
    pub module_access: Option<Vec<ModuleAccess>>,

    /// Legacy menu snapshot, itself a JSON document encoded as a string
    #[serde(default)]
    pub menus: Option<String>,
}

/// Loaded session state with its permission resolver
#[derive(Debug, Default)]
pub struct Session {
    snapshot: SessionSnapshot,
    resolver: PermissionResolver,
}

impl Session {
    /// Default session file path (~/.wardgate/session.json)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".wardgate").join("session.json"))
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let resolver = PermissionResolver::with_menu_snapshot(snapshot.menus.clone());
        Self { snapshot, resolver }
    }

    /// Load the session at `path`; a missing file is a signed-out session
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No session file at {}", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Io(format!("{}: {}", path.display(), e)))?;
        let snapshot: SessionSnapshot = serde_json::from_str(&contents)
            .map_err(|e| SessionError::ParseError(e.to_string()))?;

        Ok(Self::from_snapshot(snapshot))
    }

    /// Load for a permission check: an unparsable file counts as signed out.
    ///
    /// I/O failures still propagate.
    pub fn load_or_signed_out(path: &Path) -> Result<Self> {
        match Self::load_from(path) {
            Err(crate::error::Error::Session(SessionError::ParseError(e))) => {
                log::warn!("Ignoring unreadable session at {}: {}", path.display(), e);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Persist the session to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.snapshot)?;
        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear_at(path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SessionError::Io(format!("{}: {}", path.display(), e)).into()),
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn grants(&self) -> Option<&[ModuleAccess]> {
        self.snapshot.module_access.as_deref()
    }

    pub fn set_grants(&mut self, grants: Option<Vec<ModuleAccess>>) {
        self.snapshot.module_access = grants;
    }

    pub fn set_menus(&mut self, menus: Option<String>) {
        self.resolver.set_menu_snapshot(menus.clone());
        self.snapshot.menus = menus;
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub fn menu_snapshot(&self) -> &MenuSnapshot {
        self.resolver.menu_snapshot()
    }

    pub fn can(&self, module_path: &str, action: Action) -> bool {
        self.resolver.can_perform(self.grants(), module_path, action)
    }

    pub fn permissions_for(&self, module_path: &str) -> Permissions {
        self.resolver.permissions_for(self.grants(), module_path)
    }

    /// Navigation tree built from the legacy snapshot
    pub fn menu_tree(&self) -> Vec<MenuItem> {
        legacy_tree(self.menu_snapshot().entries())
    }

    pub fn is_signed_in(&self) -> bool {
        self.snapshot.module_access.is_some() || self.snapshot.menus.is_some()
    }
}
