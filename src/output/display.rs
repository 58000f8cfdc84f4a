//! Display models for table output

use serde::Serialize;
use tabled::Tabled;

use crate::access::Permissions;
use crate::menu::MenuItem;

/// One module's permissions as a table row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PermissionRow {
    #[tabled(rename = "MODULE")]
    pub module: String,

    #[tabled(rename = "ADD")]
    pub add: String,

    #[tabled(rename = "EDIT")]
    pub edit: String,

    #[tabled(rename = "DELETE")]
    pub delete: String,

    #[tabled(rename = "VIEW")]
    pub view: String,
}

fn yes_no(allowed: bool) -> String {
    if allowed { "yes" } else { "no" }.to_string()
}

impl PermissionRow {
    pub fn new(module: &str, perms: Permissions) -> Self {
        Self {
            module: module.to_string(),
            add: yes_no(perms.add),
            edit: yes_no(perms.edit),
            delete: yes_no(perms.delete),
            view: yes_no(perms.view),
        }
    }
}

/// Menu entry as a table row, children listed after their parent
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MenuRow {
    #[tabled(rename = "ID")]
    pub id: i64,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "CODE")]
    pub code: String,

    #[tabled(rename = "HREF")]
    pub href: String,

    #[tabled(rename = "PARENT")]
    pub parent: String,
}

impl From<&MenuItem> for MenuRow {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            code: item.code.clone(),
            href: item.href.clone().unwrap_or_else(|| "--".to_string()),
            parent: item
                .parent_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "--".to_string()),
        }
    }
}

/// Render a menu tree as indented lines
pub fn render_menu_tree(tree: &[MenuItem]) -> String {
    fn walk(items: &[MenuItem], depth: usize, out: &mut Vec<String>) {
        for item in items {
            let target = item.href.as_deref().unwrap_or("");
            out.push(
                format!("{}{} [{}] {}", "  ".repeat(depth), item.title, item.code, target)
                    .trim_end()
                    .to_string(),
            );
            walk(&item.children, depth + 1, out);
        }
    }

    let mut lines = Vec::new();
    walk(tree, 0, &mut lines);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(id: i64, title: &str, href: Option<&str>, parent_id: Option<i64>) -> MenuItem {
        MenuItem {
            id,
            title: title.to_string(),
            code: title.to_uppercase(),
            href: href.map(str::to_string),
            icon: String::new(),
            sort_order: 0,
            parent_id,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_permission_row() {
        let row = PermissionRow::new(
            "pharmacy",
            Permissions {
                view: true,
                edit: true,
                ..Permissions::default()
            },
        );

        assert_eq!(row.module, "pharmacy");
        assert_eq!(row.view, "yes");
        assert_eq!(row.edit, "yes");
        assert_eq!(row.add, "no");
        assert_eq!(row.delete, "no");
    }

    #[test]
    fn test_menu_row_placeholders() {
        let row = MenuRow::from(&menu(2, "Admin", None, None));

        assert_eq!(row.href, "--");
        assert_eq!(row.parent, "--");
    }

    #[test]
    fn test_menu_row_child() {
        let row = MenuRow::from(&menu(1005, "Users", Some("/users"), Some(2)));

        assert_eq!(row.href, "/users");
        assert_eq!(row.parent, "2");
    }

    #[test]
    fn test_render_menu_tree_indents_children() {
        let mut admin = menu(2, "Admin", None, None);
        admin.children = vec![menu(1005, "Users", Some("/users"), Some(2))];

        let rendered = render_menu_tree(&[admin]);

        assert_eq!(rendered, "Admin [ADMIN]\n  Users [USERS] /users");
    }
}
