//! Table schema definition
//!
//! Every table has the same column layout regardless of what is stored in it:
//!
//! | Column | Type | Nullable | Primary key |
//! |--------|------|----------|-------------|
//! | `key` | `String(1024)` | no | yes |
//! | `types` | `Char(1)` | yes | no |
//! | `bool` | `Boolean` | yes | no |
//! | `num` | `Double` | yes | no |
//! | `txt` | `Text` | yes | no |
//! | `blob` | `Blob` | yes | no |
//!
//! Backends turn a [`Schema`] into whatever physical table they manage.

/// Default upper bound on key length
pub const DEFAULT_KEY_LENGTH: usize = 1024;

/// Logical column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Variable-length string with an upper bound
    String {
        /// Maximum length in characters
        length: usize,
    },
    /// Fixed-length string
    Char {
        /// Length in characters
        length: usize,
    },
    /// Boolean
    Boolean,
    /// 64-bit float
    Double,
    /// Unbounded text
    Text,
    /// Binary data
    Blob,
}

/// A single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: &'static str,
    /// Column type
    pub column_type: ColumnType,
    /// Whether NULL is allowed
    pub nullable: bool,
    /// Whether this column is the primary key
    pub primary_key: bool,
}

impl Column {
    const fn value(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
            primary_key: false,
        }
    }
}

/// Column layout bound to a table name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Table name
    pub table: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
}

impl Schema {
    /// The attribute layout for `table`
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_core::Schema;
    ///
    /// let schema = Schema::attribute("main");
    /// assert_eq!(schema.primary_key().name, "key");
    /// assert_eq!(schema.columns.len(), 6);
    /// ```
    pub fn attribute(table: impl Into<String>) -> Self {
        Self::attribute_with_key_length(table, DEFAULT_KEY_LENGTH)
    }

    /// The attribute layout with a custom key bound
    pub fn attribute_with_key_length(table: impl Into<String>, key_length: usize) -> Self {
        Self {
            table: table.into(),
            columns: vec![
                Column {
                    name: "key",
                    column_type: ColumnType::String { length: key_length },
                    nullable: false,
                    primary_key: true,
                },
                Column::value("types", ColumnType::Char { length: 1 }),
                Column::value("bool", ColumnType::Boolean),
                Column::value("num", ColumnType::Double),
                Column::value("txt", ColumnType::Text),
                Column::value("blob", ColumnType::Blob),
            ],
        }
    }

    /// The primary key column
    pub fn primary_key(&self) -> &Column {
        // attribute layouts always declare `key` first
        &self.columns[0]
    }

    /// Look a column up by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Maximum key length, if the key column is bounded
    pub fn key_length(&self) -> Option<usize> {
        match self.primary_key().column_type {
            ColumnType::String { length } | ColumnType::Char { length } => Some(length),
            _ => None,
        }
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}
