use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::value::Value;

/// Column definition in the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

/// A foreign-key declaration: values in `column` must exist in
/// `ref_table.ref_column` at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

/// Table-level constraints declared in `CREATE TABLE`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub primary_key: Option<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

/// One stored record: lowercased column name to value.
pub type Row = HashMap<String, Value>;

/// A secondary index over one column: canonical value text to the positions
/// of matching rows within the owning table.
///
/// Keys within one index are homogeneous because inserts are validated
/// against the declared column type, so the textual form is unambiguous.
#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: HashMap<String, Vec<usize>>,
}

impl Index {
    /// Records that the row at `position` holds `value` in the indexed
    /// column.
    pub fn insert(&mut self, value: &Value, position: usize) {
        self.entries.entry(value.to_string()).or_default().push(position);
    }

    /// Returns the positions of all rows holding `value`, in insertion
    /// order.
    pub fn lookup(&self, value: &Value) -> &[usize] {
        self.entries
            .get(&value.to_string())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A table: ordered column definitions, constraints, the row sequence and
/// any secondary indices. Indices are rebuilt from scratch on load and are
/// not part of the persisted mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Constraints,
    pub rows: Vec<Row>,
    #[serde(skip)]
    pub indices: HashMap<String, Index>,
}

impl Table {
    /// Creates an empty table, normalizing all column and constraint names
    /// to lowercase. Every later lookup relies on this normalization.
    pub fn new(name: String, mut columns: Vec<ColumnDef>, mut constraints: Constraints) -> Self {
        for column in &mut columns {
            column.name = column.name.to_lowercase();
        }
        if let Some(pk) = &mut constraints.primary_key {
            *pk = pk.to_lowercase();
        }
        for fk in &mut constraints.foreign_keys {
            fk.column = fk.column.to_lowercase();
            fk.ref_column = fk.ref_column.to_lowercase();
        }

        Self {
            name,
            columns,
            constraints,
            rows: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Looks up a column definition by its lowercased name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Appends a validated row and keeps existing indices current.
    pub fn append_row(&mut self, row: Row) {
        let position = self.rows.len();
        for (column, index) in &mut self.indices {
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            index.insert(&value, position);
        }
        self.rows.push(row);
    }

    /// Builds (or replaces) the index over `column` from the current rows.
    pub fn build_index(&mut self, column: &str) {
        let mut index = Index::default();
        for (position, row) in self.rows.iter().enumerate() {
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            index.insert(&value, position);
        }
        self.indices.insert(column.to_string(), index);
    }

    /// Rebuilds the indices over the given columns, skipping columns that
    /// are not indexed. Used after UPDATE changes indexed values in place.
    pub fn rebuild_indices_for(&mut self, columns: &[String]) {
        for column in columns {
            if self.indices.contains_key(column.as_str()) {
                self.build_index(column);
            }
        }
    }

    /// Rebuilds every index. Row positions shift on DELETE, which
    /// invalidates all of them at once.
    pub fn rebuild_all_indices(&mut self) {
        let columns: Vec<String> = self.indices.keys().cloned().collect();
        for column in columns {
            self.build_index(&column);
        }
    }
}
