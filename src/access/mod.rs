//! Permission resolution
//!
//! Answers whether the current user may add, edit, delete or view a module.
//! The structured grants list is authoritative whenever it is non-empty;
//! otherwise the persisted legacy menu snapshot is consulted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::menu::MenuSnapshot;
use crate::menu::legacy::{LegacySubMenu, flag};

pub mod snapshot;

pub use snapshot::MenuSnapshotCache;

/// Action gated by a permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Edit,
    Delete,
    View,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Add, Action::Edit, Action::Delete, Action::View];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::View => "view",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Action::Add),
            "edit" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            "view" => Ok(Action::View),
            other => Err(format!(
                "unknown action '{}', expected one of: add, edit, delete, view",
                other
            )),
        }
    }
}

/// Structured per-module grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccess {
    pub module_path: String,

    #[serde(default)]
    pub module_name: String,

    #[serde(default, deserialize_with = "flag")]
    pub add: u8,
    #[serde(default, deserialize_with = "flag")]
    pub edit: u8,
    #[serde(default, deserialize_with = "flag")]
    pub delete: u8,
    #[serde(default, deserialize_with = "flag")]
    pub view: u8,
}

impl ModuleAccess {
    pub fn allows(&self, action: Action) -> bool {
        let value = match action {
            Action::Add => self.add,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
            Action::View => self.view,
        };
        value == 1
    }
}

impl LegacySubMenu {
    pub fn allows(&self, action: Action) -> bool {
        let value = match action {
            Action::Add => self.add,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
            Action::View => self.view,
        };
        value == 1
    }
}

/// All four action decisions for one module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Permissions {
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
    pub view: bool,
}

impl Permissions {
    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::Add => self.add,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
            Action::View => self.view,
        }
    }
}

/// Resolve one permission against grants and an already parsed snapshot.
///
/// Never fails: a malformed or absent snapshot denies everything.
pub fn resolve(
    grants: Option<&[ModuleAccess]>,
    menus: &MenuSnapshot,
    module_path: &str,
    action: Action,
) -> bool {
    if let Some(grants) = grants.filter(|g| !g.is_empty()) {
        return grants
            .iter()
            .find(|grant| grant.module_path == module_path)
            .is_some_and(|grant| grant.allows(action));
    }

    for entry in menus.entries() {
        // Top-level presence grants every action in the legacy model
        if entry.menu.path == module_path {
            return true;
        }
        if let Some(sub) = entry.menu.sub_menu.iter().find(|s| s.path == module_path) {
            return sub.allows(action);
        }
    }

    false
}

/// Session-scoped permission resolver.
///
/// Holds the memoized legacy snapshot used by the fallback path.
#[derive(Debug, Default)]
pub struct PermissionResolver {
    menus: MenuSnapshotCache,
}

impl PermissionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_menu_snapshot(raw: Option<String>) -> Self {
        Self {
            menus: MenuSnapshotCache::new(raw),
        }
    }

    /// Replace the persisted snapshot; re-parsing only follows a content change
    pub fn set_menu_snapshot(&mut self, raw: Option<String>) -> bool {
        self.menus.update(raw)
    }

    pub fn menu_snapshot(&self) -> &MenuSnapshot {
        self.menus.snapshot()
    }

    pub fn snapshot_cache(&self) -> &MenuSnapshotCache {
        &self.menus
    }

    /// Can the current user perform `action` on `module_path`?
    pub fn can_perform(
        &self,
        grants: Option<&[ModuleAccess]>,
        module_path: &str,
        action: Action,
    ) -> bool {
        let allowed = resolve(grants, self.menus.snapshot(), module_path, action);
        log::trace!("can_perform({}, {}) = {}", module_path, action, allowed);
        allowed
    }

    pub fn permissions_for(
        &self,
        grants: Option<&[ModuleAccess]>,
        module_path: &str,
    ) -> Permissions {
        Permissions {
            add: self.can_perform(grants, module_path, Action::Add),
            edit: self.can_perform(grants, module_path, Action::Edit),
            delete: self.can_perform(grants, module_path, Action::Delete),
            view: self.can_perform(grants, module_path, Action::View),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"[
        {"menu": {"id": 1, "name": "Dashboard", "path": "dashboard", "icon": "home", "sub_menu": []}},
        {"menu": {"id": 2, "name": "Staff", "path": "staff", "icon": "people", "sub_menu": [
            {"id": 1, "name": "Users", "path": "users", "view": 1, "edit": 1},
            {"id": 2, "name": "Rosters", "path": "rosters", "view": 1, "add": 1, "delete": 1}
        ]}}
    ]"#;

    fn grant(path: &str, add: u8, edit: u8, delete: u8, view: u8) -> ModuleAccess {
        ModuleAccess {
            module_path: path.to_string(),
            module_name: path.to_string(),
            add,
            edit,
            delete,
            view,
        }
    }

    fn resolver() -> PermissionResolver {
        PermissionResolver::with_menu_snapshot(Some(SNAPSHOT.to_string()))
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("view".parse::<Action>(), Ok(Action::View));
        assert_eq!("DELETE".parse::<Action>(), Ok(Action::Delete));
        assert!("approve".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_display_round_trips() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_grants_are_authoritative() {
        let grants = vec![grant("admin/settings", 0, 0, 0, 1)];
        let resolver = resolver();

        assert!(resolver.can_perform(Some(&grants), "admin/settings", Action::View));
        assert!(!resolver.can_perform(Some(&grants), "admin/settings", Action::Edit));
    }

    #[test]
    fn test_grants_do_not_fall_back_to_menu() {
        let grants = vec![grant("admin/settings", 1, 1, 1, 1)];
        let resolver = resolver();

        // "dashboard" is a top-level menu, but grants exist so it is not consulted
        assert!(!resolver.can_perform(Some(&grants), "dashboard", Action::View));
    }

    #[test]
    fn test_grant_flags_other_than_one_deny() {
        let grants = vec![grant("pharmacy", 2, 0, 0, 1)];
        let resolver = PermissionResolver::new();

        assert!(!resolver.can_perform(Some(&grants), "pharmacy", Action::Add));
        assert!(resolver.can_perform(Some(&grants), "pharmacy", Action::View));
    }

    #[test]
    fn test_fallback_top_level_grants_everything() {
        let resolver = resolver();

        for action in Action::ALL {
            assert!(resolver.can_perform(Some(&[]), "dashboard", action));
            assert!(resolver.can_perform(None, "staff", action));
        }
    }

    #[test]
    fn test_fallback_sub_menu_uses_flags() {
        let resolver = resolver();

        assert!(resolver.can_perform(None, "users", Action::Edit));
        assert!(resolver.can_perform(None, "users", Action::View));
        assert!(!resolver.can_perform(None, "users", Action::Add));
        assert!(!resolver.can_perform(None, "users", Action::Delete));

        assert!(resolver.can_perform(Some(&[]), "rosters", Action::Delete));
        assert!(!resolver.can_perform(Some(&[]), "rosters", Action::Edit));
    }

    #[test]
    fn test_fallback_unknown_module_denied() {
        let resolver = resolver();
        assert!(!resolver.can_perform(None, "billing", Action::View));
    }

    #[test]
    fn test_malformed_snapshot_denies() {
        let resolver = PermissionResolver::with_menu_snapshot(Some("{not json".to_string()));

        assert!(resolver.menu_snapshot().is_malformed());
        for action in Action::ALL {
            assert!(!resolver.can_perform(None, "dashboard", action));
        }
    }

    #[test]
    fn test_absent_snapshot_and_no_grants_denies() {
        let resolver = PermissionResolver::new();
        assert!(!resolver.can_perform(None, "dashboard", Action::View));
    }

    #[test]
    fn test_snapshot_replacement_changes_answers() {
        let mut resolver = resolver();
        assert!(resolver.can_perform(None, "dashboard", Action::View));

        let changed = resolver.set_menu_snapshot(Some(
            r#"[{"menu":{"id":9,"name":"Lab","path":"lab","sub_menu":[]}}]"#.to_string(),
        ));

        assert!(changed);
        assert!(!resolver.can_perform(None, "dashboard", Action::View));
        assert!(resolver.can_perform(None, "lab", Action::Delete));
    }

    #[test]
    fn test_permissions_for() {
        let resolver = resolver();

        let perms = resolver.permissions_for(None, "rosters");
        assert_eq!(
            perms,
            Permissions {
                add: true,
                edit: false,
                delete: true,
                view: true,
            }
        );
        assert!(perms.get(Action::Add));
    }

    #[test]
    fn test_module_access_deserializes_missing_flags_as_zero() {
        let grant: ModuleAccess =
            serde_json::from_str(r#"{"module_path":"wards","view":1}"#).unwrap();

        assert!(grant.allows(Action::View));
        assert!(!grant.allows(Action::Edit));
        assert_eq!(grant.module_name, "");
    }

    #[test]
    fn test_odd_sub_menu_flag_leaves_other_entries_resolvable() {
        let resolver = PermissionResolver::with_menu_snapshot(Some(
            r#"[
                {"menu": {"id": 1, "path": "dashboard", "sub_menu": []}},
                {"menu": {"id": 2, "name": "Staff", "path": "staff", "sub_menu": [
                    {"id": 1, "name": "Users", "path": "users", "view": "1", "edit": 1}
                ]}}
            ]"#
            .to_string(),
        ));

        assert!(!resolver.menu_snapshot().is_malformed());
        assert!(resolver.can_perform(None, "dashboard", Action::View));
        assert!(resolver.can_perform(None, "users", Action::Edit));
        assert!(!resolver.can_perform(None, "users", Action::View));
    }
}
