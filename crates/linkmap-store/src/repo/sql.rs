//! Statement generation from table declarations
//!
//! Identifiers are always double-quoted; `key` is an SQL keyword.

use linkmap_core::schema::TableDef;

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

fn quoted_list(idents: &[&str]) -> String {
    idents.iter().map(|i| quote(i)).collect::<Vec<_>>().join(", ")
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ")
}

/// Insert every column in declaration order; on a primary-key conflict
/// overwrite the non-key columns, or do nothing when there are none.
pub fn upsert(table: &TableDef) -> String {
    let columns = table.column_names();
    let values = table.value_columns();
    let conflict = if values.is_empty() {
        "DO NOTHING".to_string()
    } else {
        let assignments = values
            .iter()
            .map(|c| format!("{} = excluded.{}", quote(c), quote(c)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("DO UPDATE SET {}", assignments)
    };

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
        quote(table.name),
        quoted_list(&columns),
        placeholders(columns.len()),
        quoted_list(&table.primary_key()),
        conflict
    )
}

/// Select every column, filtered by one column and ordered by others
pub fn select_where(table: &TableDef, filter: &str, order_by: &[&str]) -> String {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        quoted_list(&table.column_names()),
        quote(table.name),
        quote(filter)
    );
    if !order_by.is_empty() {
        sql.push_str(&format!(" ORDER BY {}", quoted_list(order_by)));
    }
    sql
}

/// Delete by a single-column key
pub fn delete_where(table: &TableDef, filter: &str) -> String {
    format!("DELETE FROM {} WHERE {} = ?1", quote(table.name), quote(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkmap_core::schema::{ENTRIES, ENTRY_LINKS, PARENTS};

    #[test]
    fn test_upsert_key_only_table() {
        assert_eq!(
            upsert(&PARENTS),
            r#"INSERT INTO "parents" ("parent_pk") VALUES (?1) ON CONFLICT ("parent_pk") DO NOTHING"#
        );
    }

    #[test]
    fn test_upsert_composite_key() {
        assert_eq!(
            upsert(&ENTRY_LINKS),
            concat!(
                r#"INSERT INTO "entry_links" ("entry_pk", "key", "link") VALUES (?1, ?2, ?3) "#,
                r#"ON CONFLICT ("entry_pk", "key") DO UPDATE SET "link" = excluded."link""#
            )
        );
    }

    #[test]
    fn test_select_with_order() {
        assert_eq!(
            select_where(&ENTRIES, "parent_pk", &["entry_pk"]),
            r#"SELECT "entry_pk", "parent_pk" FROM "entries" WHERE "parent_pk" = ?1 ORDER BY "entry_pk""#
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            delete_where(&PARENTS, "parent_pk"),
            r#"DELETE FROM "parents" WHERE "parent_pk" = ?1"#
        );
    }
}
