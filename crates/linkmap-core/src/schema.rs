//! Static table and column declarations
//!
//! Each row type maps to one fixed table name. The names are explicit
//! overrides rather than anything derived from the Rust type names, so
//! renaming a row type never renames a table.

/// Maximum length of a link key (`entry_links.key VARCHAR(64)`)
pub const LINK_KEY_MAX_LEN: usize = 64;

/// Column storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// 64-bit signed integer
    Int8,
    /// Bounded character string
    Varchar(usize),
}

impl SqlType {
    /// SQL spelling of the type
    pub fn sql(&self) -> String {
        match self {
            SqlType::Int8 => "INT8".to_string(),
            SqlType::Varchar(len) => format!("VARCHAR({})", len),
        }
    }
}

/// Referential action on a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkAction {
    Cascade,
    SetNull,
}

impl FkAction {
    /// SQL spelling, as reported by `PRAGMA foreign_key_list`
    pub fn sql(&self) -> &'static str {
        match self {
            FkAction::Cascade => "CASCADE",
            FkAction::SetNull => "SET NULL",
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
}

/// One foreign key of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_update: FkAction,
    pub on_delete: FkAction,
}

/// A table: fixed name, ordered columns, foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub foreign_keys: &'static [ForeignKeyDef],
}

impl TableDef {
    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Primary key column names in declaration order
    pub fn primary_key(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name)
            .collect()
    }

    /// Columns outside the primary key
    pub fn value_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| !c.primary_key)
            .map(|c| c.name)
            .collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Binds a row type to its table declaration
pub trait Table {
    const TABLE: &'static TableDef;
}

pub const PARENTS: TableDef = TableDef {
    name: "parents",
    columns: &[ColumnDef {
        name: "parent_pk",
        sql_type: SqlType::Int8,
        primary_key: true,
    }],
    foreign_keys: &[],
};

pub const ENTRIES: TableDef = TableDef {
    name: "entries",
    columns: &[
        ColumnDef {
            name: "entry_pk",
            sql_type: SqlType::Int8,
            primary_key: true,
        },
        ColumnDef {
            name: "parent_pk",
            sql_type: SqlType::Int8,
            primary_key: false,
        },
    ],
    foreign_keys: &[ForeignKeyDef {
        column: "parent_pk",
        references_table: "parents",
        references_column: "parent_pk",
        on_update: FkAction::Cascade,
        on_delete: FkAction::SetNull,
    }],
};

pub const ENTRY_LINKS: TableDef = TableDef {
    name: "entry_links",
    columns: &[
        ColumnDef {
            name: "entry_pk",
            sql_type: SqlType::Int8,
            primary_key: true,
        },
        ColumnDef {
            name: "key",
            sql_type: SqlType::Varchar(LINK_KEY_MAX_LEN),
            primary_key: true,
        },
        ColumnDef {
            name: "link",
            sql_type: SqlType::Int8,
            primary_key: false,
        },
    ],
    foreign_keys: &[ForeignKeyDef {
        column: "entry_pk",
        references_table: "entries",
        references_column: "entry_pk",
        on_update: FkAction::Cascade,
        on_delete: FkAction::SetNull,
    }],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_table_composite_key() {
        assert_eq!(ENTRY_LINKS.primary_key(), vec!["entry_pk", "key"]);
        assert_eq!(ENTRY_LINKS.value_columns(), vec!["link"]);
    }

    #[test]
    fn test_foreign_keys_point_up_one_level() {
        assert_eq!(ENTRIES.foreign_keys[0].references_table, PARENTS.name);
        assert_eq!(ENTRY_LINKS.foreign_keys[0].references_table, ENTRIES.name);
        for fk in ENTRIES.foreign_keys.iter().chain(ENTRY_LINKS.foreign_keys) {
            assert_eq!(fk.on_update, FkAction::Cascade);
            assert_eq!(fk.on_delete, FkAction::SetNull);
        }
    }

    #[test]
    fn test_key_column_type() {
        let key = ENTRY_LINKS.column("key").unwrap();
        assert_eq!(key.sql_type.sql(), "VARCHAR(64)");
        assert!(ENTRY_LINKS.column("missing").is_none());
    }
}
