use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

/// Represents a single data value stored in the database.
///
/// This enum wraps all supported types into a single tagged variant that can
/// be passed around the engine, including SQL `NULL`. Values serialize to
/// their natural JSON form (`null`, number, string, boolean) in the
/// persisted database file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Represents an empty or missing value.
    Null,
    /// A 64-bit signed integer value.
    Int(i64),
    /// A UTF-8 string value, wrapped in an [Arc] for cheap cloning when rows
    /// are copied into query results.
    Text(Arc<str>),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// Returns `true` if the value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the inner integer value if this is a [Value::Int].
    /// Otherwise, returns `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a
    /// [Value::Text]. Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Bool].
    /// Otherwise, returns `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value.
    ///
    /// Returns `None` for [Value::Null]: a standalone NULL is untyped and
    /// accepted by every column.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Int(_) => Some(DataType::Int),
            Self::Text(_) => Some(DataType::Text),
            Self::Bool(_) => Some(DataType::Bool),
        }
    }

    /// Loose, coercing equality used by the `=` filter operator.
    ///
    /// Values of the same type compare directly. Across types, text is
    /// coerced to a number where possible and booleans count as 1/0, so
    /// `1 = '1'` and `TRUE = 1` both hold. `NULL` equals only `NULL`.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(n), Value::Text(s)) | (Value::Text(s), Value::Int(n)) => {
                s.trim().parse::<i64>().is_ok_and(|parsed| parsed == *n)
            }
            (Value::Bool(b), Value::Int(n)) | (Value::Int(n), Value::Bool(b)) => {
                i64::from(*b) == *n
            }
            (Value::Bool(b), Value::Text(s)) | (Value::Text(s), Value::Bool(b)) => {
                s.trim().parse::<i64>().is_ok_and(|parsed| parsed == i64::from(*b))
            }
        }
    }

    /// Strict ordering used by the `<` and `>` filter operators.
    ///
    /// Only values of the same type are ordered: integers numerically, text
    /// lexicographically. Everything else, including any comparison against
    /// `NULL`, is unordered and filters to false.
    pub fn strict_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Bool(true) => write!(f, "TRUE"),
            Value::Bool(false) => write!(f, "FALSE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(1).is_null());
        assert!(!Value::Text("x".into()).is_null());
        assert!(!Value::Bool(true).is_null());
    }

    #[test]
    fn test_as_int() {
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Null.as_int(), None);
        assert_eq!(Value::Text("42".into()).as_int(), None);
        assert_eq!(Value::Bool(true).as_int(), None);
    }

    #[test]
    fn test_as_str() {
        let v = Value::Text("hello".into());

        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(Value::Null.as_str(), None);
        assert_eq!(Value::Int(1).as_str(), None);
    }

    #[test]
    fn test_as_bool() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert_eq!(Value::Null.as_bool(), None);
        assert_eq!(Value::Int(1).as_bool(), None);
    }

    #[test]
    fn test_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Int(1).data_type(), Some(DataType::Int));
        assert_eq!(Value::Text("x".into()).data_type(), Some(DataType::Text));
        assert_eq!(Value::Bool(true).data_type(), Some(DataType::Bool));
    }

    #[test]
    fn test_loose_equality_same_type() {
        assert!(Value::Int(10).loosely_equals(&Value::Int(10)));
        assert!(!Value::Int(10).loosely_equals(&Value::Int(20)));
        assert!(Value::Text("abc".into()).loosely_equals(&Value::Text("abc".into())));
        assert!(Value::Bool(true).loosely_equals(&Value::Bool(true)));
        assert!(Value::Null.loosely_equals(&Value::Null));
    }

    #[test]
    fn test_loose_equality_coercion() {
        assert!(Value::Int(1).loosely_equals(&Value::Text("1".into())));
        assert!(Value::Text(" 7 ".into()).loosely_equals(&Value::Int(7)));
        assert!(Value::Bool(true).loosely_equals(&Value::Int(1)));
        assert!(Value::Bool(false).loosely_equals(&Value::Int(0)));
        assert!(Value::Bool(true).loosely_equals(&Value::Text("1".into())));

        assert!(!Value::Int(1).loosely_equals(&Value::Text("one".into())));
        assert!(!Value::Bool(true).loosely_equals(&Value::Int(2)));
    }

    #[test]
    fn test_null_never_loosely_equals_values() {
        assert!(!Value::Null.loosely_equals(&Value::Int(0)));
        assert!(!Value::Text("".into()).loosely_equals(&Value::Null));
        assert!(!Value::Bool(false).loosely_equals(&Value::Null));
    }

    #[test]
    fn test_strict_cmp() {
        assert_eq!(
            Value::Int(1).strict_cmp(&Value::Int(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Text("b".into()).strict_cmp(&Value::Text("a".into())),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Int(1).strict_cmp(&Value::Text("2".into())), None);
        assert_eq!(Value::Null.strict_cmp(&Value::Int(1)), None);
        assert_eq!(Value::Bool(true).strict_cmp(&Value::Bool(false)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Text("abc".into()).to_string(), "abc");
        assert_eq!(Value::Bool(true).to_string(), "TRUE");
        assert_eq!(Value::Bool(false).to_string(), "FALSE");
    }

    #[test]
    fn test_json_round_trip() {
        let values = vec![
            Value::Null,
            Value::Int(42),
            Value::Text("hello".into()),
            Value::Bool(true),
        ];

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,42,"hello",true]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
