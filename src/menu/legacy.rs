//! Legacy menu snapshot format
//!
//! The persisted snapshot is a JSON array of `{ "menu": { ... } }` records,
//! each carrying its sub-menu entries and their action flags.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SnapshotError;

/// One top-level record of a legacy snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMenuEntry {
    pub menu: LegacyMenu,
}

/// Top-level menu as stored by the legacy format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMenu {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    pub path: String,

    #[serde(default, deserialize_with = "lenient")]
    pub icon: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_menu: Vec<LegacySubMenu>,
}

/// Sub-menu entry with its action flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySubMenu {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    pub path: String,

    #[serde(default, deserialize_with = "flag")]
    pub add: u8,
    #[serde(default, deserialize_with = "flag")]
    pub edit: u8,
    #[serde(default, deserialize_with = "flag")]
    pub delete: u8,
    #[serde(default, deserialize_with = "flag")]
    pub view: u8,
}

/// A persisted menu snapshot after parsing.
///
/// Parsing never fails outright: unreadable input becomes `Malformed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuSnapshot {
    /// Nothing persisted yet
    Absent,
    Legacy(Vec<LegacyMenuEntry>),
    Malformed(SnapshotError),
}

impl MenuSnapshot {
    /// Entries of a legacy snapshot, empty for any other variant
    pub fn entries(&self) -> &[LegacyMenuEntry] {
        match self {
            MenuSnapshot::Legacy(entries) => entries,
            MenuSnapshot::Absent | MenuSnapshot::Malformed(_) => &[],
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, MenuSnapshot::Malformed(_))
    }
}

/// Parse the string-encoded snapshot
pub fn parse_menu_snapshot(raw: Option<&str>) -> MenuSnapshot {
    let text = match raw.map(str::trim) {
        None | Some("") | Some("null") => return MenuSnapshot::Absent,
        Some(text) => text,
    };

    match serde_json::from_str::<Vec<LegacyMenuEntry>>(text) {
        Ok(entries) => MenuSnapshot::Legacy(entries),
        Err(e) => {
            log::debug!("Menu snapshot is malformed: {}", e);
            MenuSnapshot::Malformed(SnapshotError::Malformed(e.to_string()))
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Descriptive field the lookup never reads: null or an off-type value becomes the default
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Action flag: integer `1` or `true` grants, any other value denies
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) if n.as_u64() == Some(1) => 1,
        Value::Bool(true) => 1,
        _ => 0,
    })
}
