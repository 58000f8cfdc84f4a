//! Table output

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Render rows as a rounded table, or `empty` when there are none
pub fn format_table<T: Tabled>(rows: &[T], empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::display::PermissionRow;

    fn row(module: &str, view: bool) -> PermissionRow {
        PermissionRow {
            module: module.to_string(),
            add: "no".to_string(),
            edit: "no".to_string(),
            delete: "no".to_string(),
            view: if view { "yes" } else { "no" }.to_string(),
        }
    }

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<PermissionRow> = vec![];
        assert_eq!(format_table(&rows, "No modules."), "No modules.");
    }

    #[test]
    fn test_format_table_headers_and_rows() {
        let rows = vec![row("wards", true), row("billing", false)];

        let result = format_table(&rows, "");

        assert!(result.contains("MODULE"));
        assert!(result.contains("VIEW"));
        assert!(result.contains("wards"));
        assert!(result.contains("billing"));
    }

    #[test]
    fn test_format_table_uses_rounded_style() {
        let result = format_table(&[row("wards", true)], "");

        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }
}
