//! Menu normalization
//!
//! Turns the legacy nested menu description into flat [`MenuItem`] records
//! and assembles flat records into a sorted tree for navigation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub mod legacy;

pub use legacy::{LegacyMenu, LegacyMenuEntry, LegacySubMenu, MenuSnapshot, parse_menu_snapshot};

/// Added to every sub-menu source id so children never share an id with a parent
pub const CHILD_ID_OFFSET: i64 = 1000;

/// Normalized navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub title: String,
    /// Stable identifier derived from the path, e.g. `PATIENT_RECORDS`
    pub code: String,
    /// `None` for a parent that has children
    pub href: Option<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub sort_order: i64,
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

/// Derive a menu code from its path: uppercase, hyphens to underscores
pub fn menu_code(path: &str) -> String {
    path.to_uppercase().replace('-', "_")
}

fn href_for(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Map legacy entries to flat menu items.
///
/// Each top-level entry is followed by its sub-menu items. `sort_order` is
/// the position within the entry's own level.
pub fn normalize_legacy(entries: &[LegacyMenuEntry]) -> Vec<MenuItem> {
    let mut items = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let menu = &entry.menu;
        let has_children = !menu.sub_menu.is_empty();

        items.push(MenuItem {
            id: menu.id,
            title: menu.name.clone(),
            code: menu_code(&menu.path),
            href: (!has_children).then(|| href_for(&menu.path)),
            icon: menu.icon.clone(),
            sort_order: index as i64,
            parent_id: None,
            children: Vec::new(),
        });

        for (child_index, sub) in menu.sub_menu.iter().enumerate() {
            let Some(id) = sub.id.checked_add(CHILD_ID_OFFSET) else {
                log::warn!("Skipping sub-menu '{}': id {} is out of range", sub.path, sub.id);
                continue;
            };
            items.push(MenuItem {
                id,
                title: sub.name.clone(),
                code: menu_code(&sub.path),
                href: Some(href_for(&sub.path)),
                icon: String::new(),
                sort_order: child_index as i64,
                parent_id: Some(menu.id),
                children: Vec::new(),
            });
        }
    }

    items
}

/// Normalize a legacy snapshot straight into a tree
pub fn legacy_tree(entries: &[LegacyMenuEntry]) -> Vec<MenuItem> {
    build_tree(&normalize_legacy(entries))
}

/// Assemble flat items into a tree sorted by `sort_order` at every level.
///
/// Items whose parent id is missing are dropped. When an id repeats, the
/// first occurrence wins.
pub fn build_tree(flat: &[MenuItem]) -> Vec<MenuItem> {
    let mut seen = HashSet::new();
    let mut by_parent: HashMap<Option<i64>, Vec<MenuItem>> = HashMap::new();

    for item in flat {
        if !seen.insert(item.id) {
            log::debug!("Skipping duplicate menu id {}", item.id);
            continue;
        }
        let node = MenuItem {
            children: Vec::new(),
            ..item.clone()
        };
        by_parent.entry(item.parent_id).or_default().push(node);
    }

    let mut roots = by_parent.remove(&None).unwrap_or_default();
    for root in &mut roots {
        attach_children(root, &mut by_parent);
    }
    sort_level(&mut roots);

    let orphans: usize = by_parent.values().map(Vec::len).sum();
    if orphans > 0 {
        log::debug!("Dropped {} menu items with no reachable parent", orphans);
    }

    roots
}

fn attach_children(node: &mut MenuItem, by_parent: &mut HashMap<Option<i64>, Vec<MenuItem>>) {
    if let Some(mut children) = by_parent.remove(&Some(node.id)) {
        for child in &mut children {
            attach_children(child, by_parent);
        }
        sort_level(&mut children);
        node.children = children;
    }
}

fn sort_level(items: &mut [MenuItem]) {
    items.sort_by_key(|item| item.sort_order);
}

/// Pre-order flat view of a tree, children lists emptied
pub fn flatten(tree: &[MenuItem]) -> Vec<MenuItem> {
    let mut out = Vec::new();
    for item in tree {
        out.push(MenuItem {
            children: Vec::new(),
            ..item.clone()
        });
        out.extend(flatten(&item.children));
    }
    out
}
