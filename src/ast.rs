use crate::table::{ColumnDef, Constraints};
use crate::value::Value;

/// One parsed statement. The parser produces exactly one of these per call.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateDatabase(String),
    UseDatabase(String),
    ShowDatabases,
    ShowTables,
    CreateTable(CreateTable),
    CreateIndex(CreateIndex),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
    /// An administrative dot-command (e.g. `exit`, `clear`), outside the
    /// query grammar.
    Meta(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Constraints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    /// Bound positionally to the target table's declared column order.
    pub values: Vec<Value>,
}

/// A possibly table-qualified column name (`col` or `table.col`).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: Option<String>, column: impl Into<String>) -> Self {
        Self {
            table,
            column: column.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnsSelect {
    Star,
    Columns(Vec<ColumnRef>),
}

/// The single inner equality join a SELECT may carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
}

/// The right-hand side of a WHERE comparison: a literal or another column.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Column(ColumnRef),
}

/// A single comparison; the grammar allows no boolean connectives and no
/// nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: ColumnRef,
    pub op: CompareOp,
    pub right: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: ColumnsSelect,
    pub table: String,
    pub join: Option<Join>,
    pub where_clause: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub where_clause: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub where_clause: Option<Condition>,
}
