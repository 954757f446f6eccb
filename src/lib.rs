pub mod ast;
pub mod audit;
pub mod config;
pub mod data_type;
pub mod database;
pub mod engine;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use config::EngineConfig;
pub use data_type::DataType;
pub use engine::{QueryResult, Session, StorageEngine};
pub use error::{DbError, SyntaxError};
pub use interpreter::{Interpreter, Response};
pub use table::{ColumnDef, Constraints, ForeignKey, Row, Table};
pub use value::Value;
