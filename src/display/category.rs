//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format a list of categories as a table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            kind: c.kind.to_string(),
            status: if c.archived { "archived" } else { "" },
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKind, FamilyId};

    #[test]
    fn test_format_category_list() {
        let family = FamilyId::new();
        let mut archived = Category::new(family, "Old Hobby", CategoryKind::Expense);
        archived.archive();
        let categories = vec![
            Category::new(family, "Groceries", CategoryKind::Expense),
            Category::new(family, "Salary", CategoryKind::Income),
            archived,
        ];

        let output = format_category_list(&categories);
        assert!(output.contains("Groceries"));
        assert!(output.contains("Income"));
        assert!(output.contains("archived"));
    }

    #[test]
    fn test_empty_list() {
        assert!(format_category_list(&[]).contains("No categories found"));
    }
}
