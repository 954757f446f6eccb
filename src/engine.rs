use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;

use crate::ast::{ColumnsSelect, CompareOp, Condition, Join, Operand};
use crate::audit::AuditLog;
use crate::config::EngineConfig;
use crate::database::Database;
use crate::error::DbError;
use crate::table::{ColumnDef, Constraints, Row, Table};
use crate::value::Value;

/// Per-caller selection state. The engine holds no process-wide "current
/// database"; every call that needs one receives a session, so concurrent
/// logical callers never observe each other's selection.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The database this session currently operates on, if any.
    pub fn current_database(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// The result of a successful `SELECT`, `SHOW DATABASES` or `SHOW TABLES`.
///
/// Rows are records (lowercased column name to value); `columns` carries
/// the projection order, which the records themselves cannot.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// The storage engine: owns all relational state, executes validated
/// operations, mirrors every mutation to the persisted file and appends an
/// audit entry per action.
pub struct StorageEngine {
    databases: HashMap<String, Database>,
    config: EngineConfig,
    audit: AuditLog,
}

impl StorageEngine {
    /// Opens the engine, deserializing an existing data file into memory.
    /// A missing or corrupt file is tolerated: the engine starts empty and
    /// only logs the failure. Indices always start empty after a load.
    pub fn open(config: EngineConfig) -> Self {
        let databases = Self::load(&config);
        let audit = AuditLog::new(config.audit_file.clone());
        Self {
            databases,
            config,
            audit,
        }
    }

    fn load(config: &EngineConfig) -> HashMap<String, Database> {
        let content = match fs::read_to_string(&config.data_file) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!(
                    "no database file at {}, starting empty",
                    config.data_file.display()
                );
                return HashMap::new();
            }
            Err(err) => {
                log::warn!(
                    "cannot read database file {}, starting empty: {err}",
                    config.data_file.display()
                );
                return HashMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(databases) => databases,
            Err(err) => {
                log::warn!(
                    "corrupt database file {}, starting empty: {err}",
                    config.data_file.display()
                );
                HashMap::new()
            }
        }
    }

    /// Full-state write-through: serializes the entire database map after
    /// every mutation. A write failure is logged and does not fail the
    /// already-applied in-memory mutation.
    fn persist(&self) {
        let json = match serde_json::to_string_pretty(&self.databases) {
            Ok(json) => json,
            Err(err) => {
                log::error!("failed to serialize database state: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.config.data_file, json) {
            log::error!(
                "failed to write database file {}: {err}",
                self.config.data_file.display()
            );
        }
    }

    fn database(&self, session: &Session) -> Result<&Database, DbError> {
        let name = session.current.as_deref().ok_or(DbError::NoDatabaseSelected)?;
        self.databases
            .get(name)
            .ok_or_else(|| DbError::DatabaseNotFound(name.to_string()))
    }

    fn database_mut(&mut self, session: &Session) -> Result<&mut Database, DbError> {
        let name = session.current.as_deref().ok_or(DbError::NoDatabaseSelected)?;
        self.databases
            .get_mut(name)
            .ok_or_else(|| DbError::DatabaseNotFound(name.to_string()))
    }

    // --- Operations ---

    /// Registers a new, empty database.
    pub fn create_database(&mut self, name: &str) -> Result<(), DbError> {
        let result = self.create_database_inner(name);
        self.audit_outcome(&format!("create database '{name}'"), &result);
        result
    }

    fn create_database_inner(&mut self, name: &str) -> Result<(), DbError> {
        if self.databases.contains_key(name) {
            return Err(DbError::DatabaseExists(name.to_string()));
        }
        self.databases
            .insert(name.to_string(), Database::new(name.to_string()));
        self.persist();
        Ok(())
    }

    /// Points the session at an existing database.
    pub fn use_database(&self, session: &mut Session, name: &str) -> Result<(), DbError> {
        let result = if self.databases.contains_key(name) {
            session.current = Some(name.to_string());
            Ok(())
        } else {
            Err(DbError::DatabaseNotFound(name.to_string()))
        };
        self.audit_outcome(&format!("use database '{name}'"), &result);
        result
    }

    /// Lists all database names, sorted.
    pub fn show_databases(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.keys().cloned().collect();
        names.sort();
        self.audit.record("list databases");
        names
    }

    /// Lists the selected database's table names, sorted.
    pub fn show_tables(&self, session: &Session) -> Result<Vec<String>, DbError> {
        let result = self.database(session).map(Database::table_names);
        self.audit_outcome("list tables", &result);
        result
    }

    /// Creates a table in the selected database. An existing table of the
    /// same name is rejected, never overwritten.
    pub fn create_table(
        &mut self,
        session: &Session,
        name: &str,
        columns: Vec<ColumnDef>,
        constraints: Constraints,
    ) -> Result<(), DbError> {
        let result = self.create_table_inner(session, name, columns, constraints);
        self.audit_outcome(&format!("create table '{name}'"), &result);
        result
    }

    fn create_table_inner(
        &mut self,
        session: &Session,
        name: &str,
        columns: Vec<ColumnDef>,
        constraints: Constraints,
    ) -> Result<(), DbError> {
        let db = self.database_mut(session)?;
        if db.tables.contains_key(name) {
            return Err(DbError::TableExists(name.to_string()));
        }
        let table = Table::new(name.to_string(), columns, constraints);
        db.tables.insert(name.to_string(), table);
        self.persist();
        Ok(())
    }

    /// Inserts one row, binding `values` positionally to the declared
    /// column order. Validation runs column by column in declared order and
    /// fails on the first violation: declared-type check, primary-key
    /// uniqueness, then foreign-key existence in the referenced table.
    pub fn insert(
        &mut self,
        session: &Session,
        table: &str,
        values: Vec<Value>,
    ) -> Result<(), DbError> {
        let result = self.insert_inner(session, table, values);
        self.audit_outcome(&format!("insert into '{table}'"), &result);
        result
    }

    fn insert_inner(
        &mut self,
        session: &Session,
        table_name: &str,
        values: Vec<Value>,
    ) -> Result<(), DbError> {
        let db = self.database(session)?;
        let table = db
            .table(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;

        if values.len() != table.columns.len() {
            return Err(DbError::ArityMismatch {
                table: table_name.to_string(),
                expected: table.columns.len(),
                got: values.len(),
            });
        }

        let mut row = Row::new();
        for (def, value) in table.columns.iter().zip(values) {
            if value.data_type().is_some_and(|t| t != def.data_type) {
                return Err(DbError::TypeMismatch {
                    column: def.name.clone(),
                    expected: def.data_type,
                    value,
                });
            }

            if table.constraints.primary_key.as_deref() == Some(def.name.as_str()) {
                let duplicate = table
                    .rows
                    .iter()
                    .any(|existing| {
                        existing
                            .get(&def.name)
                            .is_some_and(|v| v.loosely_equals(&value))
                    });
                if duplicate {
                    return Err(DbError::PrimaryKeyViolation(value, def.name.clone()));
                }
            }

            for fk in table
                .constraints
                .foreign_keys
                .iter()
                .filter(|fk| fk.column == def.name)
            {
                let referenced = db
                    .table(&fk.ref_table)
                    .ok_or_else(|| DbError::TableNotFound(fk.ref_table.clone()))?;
                let exists = referenced.rows.iter().any(|r| {
                    r.get(&fk.ref_column)
                        .is_some_and(|v| v.loosely_equals(&value))
                });
                if !exists {
                    return Err(DbError::ForeignKeyViolation {
                        value,
                        table: fk.ref_table.clone(),
                        column: fk.ref_column.clone(),
                    });
                }
            }

            row.insert(def.name.clone(), value);
        }

        let db = self.database_mut(session)?;
        let table = db
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
        table.append_row(row);
        self.persist();
        Ok(())
    }

    /// Executes a `SELECT`: optional nested-loop inner join, optional
    /// single-comparison filter, then projection. Read-only.
    pub fn select(
        &self,
        session: &Session,
        table: &str,
        columns: &ColumnsSelect,
        join: Option<&Join>,
        where_clause: Option<&Condition>,
    ) -> Result<QueryResult, DbError> {
        let result = self.select_inner(session, table, columns, join, where_clause);
        match &result {
            Ok(query) => self
                .audit
                .record(&format!("select from '{table}': {} rows", query.rows.len())),
            Err(err) => self.audit.record(&format!("select from '{table}' failed: {err}")),
        }
        result
    }

    fn select_inner(
        &self,
        session: &Session,
        table_name: &str,
        columns: &ColumnsSelect,
        join: Option<&Join>,
        where_clause: Option<&Condition>,
    ) -> Result<QueryResult, DbError> {
        let db = self.database(session)?;
        let table = db
            .table(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;

        let mut all_columns: Vec<String> =
            table.columns.iter().map(|c| c.name.clone()).collect();

        let mut records: Vec<Row> = match join {
            Some(join) => {
                let right = db
                    .table(&join.table)
                    .ok_or_else(|| DbError::TableNotFound(join.table.clone()))?;
                for column in &right.columns {
                    if !all_columns.contains(&column.name) {
                        all_columns.push(column.name.clone());
                    }
                }
                nested_loop_join(table, right, join)
            }
            None => match where_clause.and_then(|cond| indexed_positions(table, cond)) {
                Some(positions) => positions.iter().map(|&i| table.rows[i].clone()).collect(),
                None => table.rows.clone(),
            },
        };

        if let Some(cond) = where_clause {
            records.retain(|record| row_matches(record, cond));
        }

        Ok(match columns {
            ColumnsSelect::Star => QueryResult {
                columns: all_columns,
                rows: records,
            },
            ColumnsSelect::Columns(refs) => {
                let names: Vec<String> =
                    refs.iter().map(|c| c.column.to_lowercase()).collect();
                let rows = records
                    .into_iter()
                    .map(|record| {
                        names
                            .iter()
                            .map(|name| {
                                let value =
                                    record.get(name).cloned().unwrap_or(Value::Null);
                                (name.clone(), value)
                            })
                            .collect::<Row>()
                    })
                    .collect();
                QueryResult {
                    columns: names,
                    rows,
                }
            }
        })
    }

    /// Applies every assignment to each matching row; an omitted WHERE
    /// matches every row. Returns the affected row count. Persists, audits
    /// and refreshes affected indices only when at least one row matched.
    pub fn update(
        &mut self,
        session: &Session,
        table: &str,
        assignments: Vec<(String, Value)>,
        where_clause: Option<&Condition>,
    ) -> Result<usize, DbError> {
        let result = self.update_inner(session, table, assignments, where_clause);
        match &result {
            Ok(0) => {}
            Ok(n) => self.audit.record(&format!("update '{table}': {n} rows")),
            Err(err) => self.audit.record(&format!("update '{table}' failed: {err}")),
        }
        result
    }

    fn update_inner(
        &mut self,
        session: &Session,
        table_name: &str,
        assignments: Vec<(String, Value)>,
        where_clause: Option<&Condition>,
    ) -> Result<usize, DbError> {
        let db = self.database(session)?;
        let table = db
            .table(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;

        let mut normalized: Vec<(String, Value)> = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            let name = column.to_lowercase();
            let def = table.column(&name).ok_or_else(|| {
                DbError::ColumnNotFound(name.clone(), table_name.to_string())
            })?;
            if value.data_type().is_some_and(|t| t != def.data_type) {
                return Err(DbError::TypeMismatch {
                    column: name,
                    expected: def.data_type,
                    value,
                });
            }
            normalized.push((name, value));
        }

        let affected = {
            let db = self.database_mut(session)?;
            let table = db
                .table_mut(table_name)
                .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;

            let mut affected = 0;
            for row in &mut table.rows {
                if where_clause.is_none_or(|cond| row_matches(row, cond)) {
                    for (column, value) in &normalized {
                        row.insert(column.clone(), value.clone());
                    }
                    affected += 1;
                }
            }

            if affected > 0 {
                let columns: Vec<String> =
                    normalized.iter().map(|(c, _)| c.clone()).collect();
                table.rebuild_indices_for(&columns);
            }
            affected
        };

        if affected > 0 {
            self.persist();
        }
        Ok(affected)
    }

    /// Deletes matching rows; an omitted WHERE deletes every row. Returns
    /// the removed row count. Persists, audits and rebuilds indices only
    /// when the row count shrank.
    pub fn delete(
        &mut self,
        session: &Session,
        table: &str,
        where_clause: Option<&Condition>,
    ) -> Result<usize, DbError> {
        let result = self.delete_inner(session, table, where_clause);
        match &result {
            Ok(0) => {}
            Ok(n) => self.audit.record(&format!("delete from '{table}': {n} rows")),
            Err(err) => self
                .audit
                .record(&format!("delete from '{table}' failed: {err}")),
        }
        result
    }

    fn delete_inner(
        &mut self,
        session: &Session,
        table_name: &str,
        where_clause: Option<&Condition>,
    ) -> Result<usize, DbError> {
        let removed = {
            let db = self.database_mut(session)?;
            let table = db
                .table_mut(table_name)
                .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;

            let before = table.rows.len();
            match where_clause {
                None => table.rows.clear(),
                Some(cond) => table.rows.retain(|row| !row_matches(row, cond)),
            }
            let removed = before - table.rows.len();

            // Row positions shifted; every index is stale at once.
            if removed > 0 {
                table.rebuild_all_indices();
            }
            removed
        };

        if removed > 0 {
            self.persist();
        }
        Ok(removed)
    }

    /// Builds the index over one column, replacing any prior index on it.
    /// The index is maintained by later writes and consulted by non-join
    /// equality filters.
    pub fn create_index(
        &mut self,
        session: &Session,
        table: &str,
        column: &str,
    ) -> Result<(), DbError> {
        let result = self.create_index_inner(session, table, column);
        self.audit_outcome(&format!("create index on '{table}({column})'"), &result);
        result
    }

    fn create_index_inner(
        &mut self,
        session: &Session,
        table_name: &str,
        column: &str,
    ) -> Result<(), DbError> {
        let name = column.to_lowercase();
        let db = self.database_mut(session)?;
        let table = db
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
        if table.column(&name).is_none() {
            return Err(DbError::ColumnNotFound(name, table_name.to_string()));
        }
        table.build_index(&name);
        self.persist();
        Ok(())
    }

    fn audit_outcome<T>(&self, action: &str, result: &Result<T, DbError>) {
        match result {
            Ok(_) => self.audit.record(action),
            Err(err) => self.audit.record(&format!("{action} failed: {err}")),
        }
    }
}

/// Evaluates the single WHERE comparison against one record. A column
/// missing from the record reads as `NULL`.
fn row_matches(row: &Row, cond: &Condition) -> bool {
    let left = resolve(row, &cond.left.column);
    let right = match &cond.right {
        Operand::Literal(value) => value.clone(),
        Operand::Column(column) => resolve(row, &column.column),
    };

    match cond.op {
        CompareOp::Eq => left.loosely_equals(&right),
        CompareOp::Lt => left.strict_cmp(&right) == Some(Ordering::Less),
        CompareOp::Gt => left.strict_cmp(&right) == Some(Ordering::Greater),
    }
}

fn resolve(row: &Row, column: &str) -> Value {
    row.get(&column.to_lowercase()).cloned().unwrap_or(Value::Null)
}

/// Pairs every left row with every right row and merges the matches into
/// combined records, right side winning key collisions. O(n·m).
fn nested_loop_join(left: &Table, right: &Table, join: &Join) -> Vec<Row> {
    let left_key = join.left.column.to_lowercase();
    let right_key = join.right.column.to_lowercase();

    let mut records = Vec::new();
    for left_row in &left.rows {
        let left_value = left_row.get(&left_key).cloned().unwrap_or(Value::Null);
        for right_row in &right.rows {
            let right_value = right_row.get(&right_key).cloned().unwrap_or(Value::Null);
            if left_value.loosely_equals(&right_value) {
                let mut combined = left_row.clone();
                combined.extend(right_row.iter().map(|(k, v)| (k.clone(), v.clone())));
                records.push(combined);
            }
        }
    }
    records
}

/// Returns candidate row positions when the filter is an equality against
/// an indexed column and the literal matches the declared column type;
/// otherwise the caller falls back to a full scan.
fn indexed_positions(table: &Table, cond: &Condition) -> Option<Vec<usize>> {
    if cond.op != CompareOp::Eq {
        return None;
    }
    let Operand::Literal(value) = &cond.right else {
        return None;
    };
    let column = cond.left.column.to_lowercase();
    let index = table.indices.get(&column)?;
    let declared = table.column(&column)?.data_type;
    if value.data_type() != Some(declared) {
        return None;
    }
    Some(index.lookup(value).to_vec())
}
