use crate::ast::Statement;
use crate::config::EngineConfig;
use crate::engine::{QueryResult, Session, StorageEngine};
use crate::error::DbError;
use crate::parser::Parser;
use crate::tokenizer::Tokenizer;

/// What the dispatcher hands back to its host for one piece of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A result set from SELECT or SHOW.
    Rows(QueryResult),
    /// A confirmation or error message.
    Message(String),
    /// The host should stop reading input. The engine itself keeps running.
    Exit,
}

/// Front door of the engine: runs one statement text through the
/// tokenizer, the parser and the storage engine, and folds every error
/// into a printable message.
pub struct Interpreter {
    engine: StorageEngine,
}

impl Interpreter {
    pub fn open(config: EngineConfig) -> Self {
        Self {
            engine: StorageEngine::open(config),
        }
    }

    /// Executes one statement for the given session. Never fails: syntax
    /// and engine errors come back as `Response::Message` with an
    /// `Error: ` prefix.
    pub fn execute(&mut self, session: &mut Session, text: &str) -> Response {
        let tokens = Tokenizer::new(text).tokenize();
        let statement = match Parser::new(tokens).parse() {
            Ok(statement) => statement,
            Err(err) => return Response::Message(format!("Error: {err}")),
        };

        match self.dispatch(session, statement) {
            Ok(response) => response,
            Err(err) => Response::Message(format!("Error: {err}")),
        }
    }

    fn dispatch(
        &mut self,
        session: &mut Session,
        statement: Statement,
    ) -> Result<Response, DbError> {
        match statement {
            Statement::CreateDatabase(name) => {
                self.engine.create_database(&name)?;
                Ok(Response::Message(format!("Database '{name}' created")))
            }
            Statement::UseDatabase(name) => {
                self.engine.use_database(session, &name)?;
                Ok(Response::Message(format!("Using database '{name}'")))
            }
            Statement::ShowDatabases => {
                let names = self.engine.show_databases();
                Ok(Response::Rows(listing("database", names)))
            }
            Statement::ShowTables => {
                let names = self.engine.show_tables(session)?;
                Ok(Response::Rows(listing("table", names)))
            }
            Statement::CreateTable(create) => {
                self.engine.create_table(
                    session,
                    &create.name,
                    create.columns,
                    create.constraints,
                )?;
                Ok(Response::Message(format!("Table '{}' created", create.name)))
            }
            Statement::CreateIndex(create) => {
                self.engine
                    .create_index(session, &create.table, &create.column)?;
                Ok(Response::Message(format!(
                    "Index created on '{}({})'",
                    create.table, create.column
                )))
            }
            Statement::Insert(insert) => {
                self.engine.insert(session, &insert.table, insert.values)?;
                Ok(Response::Message(format!(
                    "1 row inserted into '{}'",
                    insert.table
                )))
            }
            Statement::Select(select) => {
                let result = self.engine.select(
                    session,
                    &select.table,
                    &select.columns,
                    select.join.as_ref(),
                    select.where_clause.as_ref(),
                )?;
                Ok(Response::Rows(result))
            }
            Statement::Update(update) => {
                let affected = self.engine.update(
                    session,
                    &update.table,
                    update.assignments,
                    update.where_clause.as_ref(),
                )?;
                Ok(Response::Message(format!("{affected} rows updated")))
            }
            Statement::Delete(delete) => {
                let removed = self.engine.delete(
                    session,
                    &delete.table,
                    delete.where_clause.as_ref(),
                )?;
                Ok(Response::Message(format!("{removed} rows deleted")))
            }
            Statement::Meta(command) => Ok(meta(&command)),
        }
    }
}

/// Wraps a name listing into a one-column result set.
fn listing(column: &str, names: Vec<String>) -> QueryResult {
    use crate::table::Row;
    use crate::value::Value;

    let rows = names
        .into_iter()
        .map(|name| {
            let mut row = Row::new();
            row.insert(column.to_string(), Value::Text(name.into()));
            row
        })
        .collect();
    QueryResult {
        columns: vec![column.to_string()],
        rows,
    }
}

/// Meta commands bypass the SQL pipeline entirely. Exit is a typed
/// response; the host decides what quitting means.
fn meta(command: &str) -> Response {
    match command {
        "exit" | "quit" => Response::Exit,
        "clear" => Response::Message("\x1b[2J\x1b[1;1H".to_string()),
        other => Response::Message(format!("Unknown command: .{other}")),
    }
}
