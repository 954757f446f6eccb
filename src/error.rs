use thiserror::Error;

use crate::data_type::DataType;
use crate::value::Value;

/// Grammar-level failures raised by the parser while consuming the token
/// stream. Positions are 1-based line/column of the offending token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("expected {expected}, got {got} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        got: String,
        line: usize,
        column: usize,
    },

    #[error("illegal character {0:?} at line {1}, column {2}")]
    IllegalCharacter(String, usize, usize),

    #[error("unknown statement starting with {0}")]
    UnknownStatement(String),

    #[error("unknown value {0}")]
    UnknownValue(String),

    #[error("unknown column type {0}")]
    UnknownType(String),

    #[error("duplicate PRIMARY KEY clause")]
    DuplicatePrimaryKey,

    #[error("empty statement")]
    EmptyStatement,
}

/// Everything the engine can fail with: wrapped syntax conditions, semantic
/// validation failures, and system-level persistence errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("no database selected")]
    NoDatabaseSelected,

    #[error("database '{0}' already exists")]
    DatabaseExists(String),

    #[error("database '{0}' does not exist")]
    DatabaseNotFound(String),

    #[error("table '{0}' already exists")]
    TableExists(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("column '{0}' does not exist in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("table '{table}' has {expected} columns but {got} values were supplied")]
    ArityMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    #[error("value {value} does not match declared type {expected:?} of column '{column}'")]
    TypeMismatch {
        column: String,
        expected: DataType,
        value: Value,
    },

    #[error("primary key violation: value {0} already exists in column '{1}'")]
    PrimaryKeyViolation(Value, String),

    #[error("foreign key violation: value {value} has no match in {table}({column})")]
    ForeignKeyViolation {
        value: Value,
        table: String,
        column: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_messages() {
        let err = SyntaxError::UnexpectedToken {
            expected: "';'".into(),
            got: "FROM".into(),
            line: 1,
            column: 8,
        };
        assert_eq!(err.to_string(), "expected ';', got FROM at line 1, column 8");
        assert_eq!(SyntaxError::EmptyStatement.to_string(), "empty statement");
    }

    #[test]
    fn test_violation_messages_name_the_value() {
        let pk = DbError::PrimaryKeyViolation(Value::Int(1), "id".into());
        assert_eq!(
            pk.to_string(),
            "primary key violation: value 1 already exists in column 'id'"
        );

        let fk = DbError::ForeignKeyViolation {
            value: Value::Int(2),
            table: "users".into(),
            column: "id".into(),
        };
        assert_eq!(
            fk.to_string(),
            "foreign key violation: value 2 has no match in users(id)"
        );
    }

    #[test]
    fn test_syntax_error_converts_to_db_error() {
        let err: DbError = SyntaxError::EmptyStatement.into();
        assert_eq!(err.to_string(), "empty statement");
    }
}
