use serde::{Deserialize, Serialize};

/// Represents the supported data types in a table schema.
/// Declared in `CREATE TABLE` and validated against every value stored in
/// the column at insert/update time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A variable-length UTF-8 character string.
    Text,
    /// A boolean value (true or false).
    Bool,
}

impl DataType {
    /// Resolves a bare type identifier from a `CREATE TABLE` statement,
    /// case-insensitively. Returns `None` for unrecognized type names.
    pub fn from_identifier(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "INT" | "INTEGER" => Some(Self::Int),
            "TEXT" | "STRING" => Some(Self::Text),
            "BOOL" | "BOOLEAN" => Some(Self::Bool),
            _ => None,
        }
    }
}
