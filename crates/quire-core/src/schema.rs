//! Column schema edits.
//!
//! Pure operations over a database's column list. The store wraps them in a
//! read-modify-write transaction.

use crate::defaults;
use crate::error::{Error, Result};
use crate::models::{Column, ColumnType};

/// Slug used for column ids: lowercase, every char outside `[a-z0-9]`
/// replaced by `-`.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}

/// Make `base` unique among `taken` by appending `-2`, `-3`, ...
pub fn unique_slug<'a, I>(base: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let exists = |candidate: &str| taken.clone().into_iter().any(|t| t == candidate);
    if !exists(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Append a new column and return its id.
pub fn add_column(
    columns: &mut Vec<Column>,
    name: &str,
    column_type: ColumnType,
    options: Option<Vec<String>>,
) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Column name must not be empty".into()));
    }
    let id = unique_slug(&slugify(name), columns.iter().map(|c| c.id.as_str()));
    let options = match column_type {
        ColumnType::Select => Some(options.unwrap_or_default()),
        _ => None,
    };
    columns.push(Column {
        id: id.clone(),
        name: name.to_string(),
        column_type,
        options,
        width: Some(defaults::COLUMN_WIDTH),
    });
    Ok(id)
}

/// Rename a column in place.
pub fn rename_column(columns: &mut [Column], column_id: &str, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Column name must not be empty".into()));
    }
    let column = columns
        .iter_mut()
        .find(|c| c.id == column_id)
        .ok_or_else(|| Error::NotFound(format!("Column {} not found", column_id)))?;
    column.name = name.to_string();
    Ok(())
}

/// Remove a column by id.
pub fn remove_column(columns: &mut Vec<Column>, column_id: &str) -> Result<Column> {
    let idx = columns
        .iter()
        .position(|c| c.id == column_id)
        .ok_or_else(|| Error::NotFound(format!("Column {} not found", column_id)))?;
    Ok(columns.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_columns;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Due Date"), "due-date");
        assert_eq!(slugify("Status"), "status");
        assert_eq!(slugify("Cost ($)"), "cost----");
        assert_eq!(slugify("  Owner "), "owner");
    }

    #[test]
    fn test_unique_slug() {
        let taken = ["status", "status-2"];
        assert_eq!(unique_slug("status", taken.iter().copied()), "status-3");
        assert_eq!(unique_slug("owner", taken.iter().copied()), "owner");
    }

    #[test]
    fn test_add_column_dedupes_id() {
        let mut cols = default_columns();
        let id = add_column(&mut cols, "Status", ColumnType::Select, None).unwrap();
        assert_eq!(id, "status-2");
        let added = cols.last().unwrap();
        assert_eq!(added.name, "Status");
        assert_eq!(added.options, Some(vec![]));
        assert_eq!(added.width, Some(150));
    }

    #[test]
    fn test_add_column_drops_options_for_non_select() {
        let mut cols = Vec::new();
        add_column(&mut cols, "Notes", ColumnType::Text, Some(vec!["a".into()])).unwrap();
        assert_eq!(cols[0].options, None);
    }

    #[test]
    fn test_add_column_rejects_blank_name() {
        let mut cols = Vec::new();
        let err = add_column(&mut cols, "   ", ColumnType::Text, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(cols.is_empty());
    }

    #[test]
    fn test_rename_keeps_id() {
        let mut cols = default_columns();
        rename_column(&mut cols, "assignee", "Owner").unwrap();
        let col = cols.iter().find(|c| c.id == "assignee").unwrap();
        assert_eq!(col.name, "Owner");
    }

    #[test]
    fn test_rename_and_remove_missing_column() {
        let mut cols = default_columns();
        assert!(matches!(
            rename_column(&mut cols, "nope", "X"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            remove_column(&mut cols, "nope"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_column() {
        let mut cols = default_columns();
        let removed = remove_column(&mut cols, "date").unwrap();
        assert_eq!(removed.id, "date");
        assert_eq!(cols.len(), 3);
        assert!(cols.iter().all(|c| c.id != "date"));
    }
}
