use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A named collection of tables. Databases are created by
/// `CREATE DATABASE` and live for the whole process; there is no drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    /// A map of table names to their respective [Table] structures.
    pub tables: HashMap<String, Table>,
}

impl Database {
    /// Creates a new, empty database.
    pub fn new(name: String) -> Self {
        Self {
            name,
            tables: HashMap::new(),
        }
    }

    /// Retrieves a reference to a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Returns the names of all tables, sorted for stable listings.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }
}
