use crate::ast::*;
use crate::data_type::DataType;
use crate::error::SyntaxError;
use crate::table::{ColumnDef, Constraints, ForeignKey};
use crate::tokenizer::{Token, TokenKind};
use crate::value::Value;

/// Recursive-descent parser consuming one token sequence into exactly one
/// [Statement]. Any grammar mismatch fails with a [SyntaxError] carrying an
/// "expected X, got Y" message and the offending token's position.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(mut self) -> Result<Statement, SyntaxError> {
        let statement = match self.current().kind {
            TokenKind::Select => self.parse_select()?,
            TokenKind::Insert => self.parse_insert()?,
            TokenKind::Update => self.parse_update()?,
            TokenKind::Delete => self.parse_delete()?,
            TokenKind::Create => self.parse_create()?,
            TokenKind::Use => self.parse_use()?,
            TokenKind::Show => self.parse_show()?,
            // Dot-commands are complete on their own and take no semicolon.
            TokenKind::DotCommand => {
                let name = self.current().literal.clone();
                self.advance();
                return Ok(Statement::Meta(name));
            }
            TokenKind::Eof => return Err(SyntaxError::EmptyStatement),
            TokenKind::Illegal => {
                let token = self.current();
                return Err(SyntaxError::IllegalCharacter(
                    token.literal.clone(),
                    token.line,
                    token.column,
                ));
            }
            _ => return Err(SyntaxError::UnknownStatement(self.current().describe())),
        };

        self.expect(TokenKind::Semicolon, "';'")?;

        // One statement per call; trailing tokens are a grammar mismatch.
        if self.current().kind != TokenKind::Eof {
            return Err(self.unexpected("end of input"));
        }

        Ok(statement)
    }

    // --- Helpers ---

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        SyntaxError::UnexpectedToken {
            expected: expected.to_string(),
            got: token.describe(),
            line: token.line,
            column: token.column,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        if self.current().kind == kind {
            let token = self.current().clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn consume_ident(&mut self) -> Result<String, SyntaxError> {
        Ok(self.expect(TokenKind::Ident, "identifier")?.literal)
    }

    /// An identifier optionally carrying one `.` qualifier, producing a
    /// compound `table.column` name.
    fn consume_qualified(&mut self) -> Result<ColumnRef, SyntaxError> {
        let first = self.consume_ident()?;

        if self.current().kind == TokenKind::Dot {
            self.advance();
            let column = self.consume_ident()?;
            Ok(ColumnRef::new(Some(first), column))
        } else {
            Ok(ColumnRef::new(None, first))
        }
    }

    fn consume_literal(&mut self) -> Result<Value, SyntaxError> {
        let token = self.current().clone();
        let value = match token.kind {
            TokenKind::Int => token
                .literal
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| SyntaxError::UnknownValue(token.literal.clone()))?,
            TokenKind::Str => Value::Text(token.literal.as_str().into()),
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Null => Value::Null,
            _ => return Err(SyntaxError::UnknownValue(token.describe())),
        };
        self.advance();
        Ok(value)
    }

    fn at_literal(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Int | TokenKind::Str | TokenKind::True | TokenKind::False | TokenKind::Null
        )
    }

    // --- Statement routines ---

    fn parse_select(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Select, "SELECT")?;

        let columns = if self.current().kind == TokenKind::Star {
            self.advance();
            ColumnsSelect::Star
        } else {
            let mut names = vec![self.consume_qualified()?];
            while self.current().kind == TokenKind::Comma {
                self.advance();
                names.push(self.consume_qualified()?);
            }
            ColumnsSelect::Columns(names)
        };

        self.expect(TokenKind::From, "FROM")?;
        let table = self.consume_ident()?;

        let join = if self.current().kind == TokenKind::Join {
            self.advance();
            let join_table = self.consume_ident()?;
            self.expect(TokenKind::On, "ON")?;
            let left = self.consume_qualified()?;
            self.expect(TokenKind::Eq, "'='")?;
            let right = self.consume_qualified()?;
            Some(Join {
                table: join_table,
                left,
                right,
            })
        } else {
            None
        };

        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Select(Select {
            columns,
            table,
            join,
            where_clause,
        }))
    }

    fn parse_insert(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Insert, "INSERT")?;
        self.expect(TokenKind::Into, "INTO")?;
        let table = self.consume_ident()?;
        self.expect(TokenKind::Values, "VALUES")?;
        self.expect(TokenKind::LParen, "'('")?;

        let mut values = vec![self.consume_literal()?];
        while self.current().kind == TokenKind::Comma {
            self.advance();
            values.push(self.consume_literal()?);
        }
        self.expect(TokenKind::RParen, "')'")?;

        Ok(Statement::Insert(Insert { table, values }))
    }

    fn parse_update(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Update, "UPDATE")?;
        let table = self.consume_ident()?;
        self.expect(TokenKind::Set, "SET")?;

        let mut assignments = vec![self.parse_assignment()?];
        while self.current().kind == TokenKind::Comma {
            self.advance();
            assignments.push(self.parse_assignment()?);
        }

        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Update(Update {
            table,
            assignments,
            where_clause,
        }))
    }

    fn parse_assignment(&mut self) -> Result<(String, Value), SyntaxError> {
        let column = self.consume_ident()?;
        self.expect(TokenKind::Eq, "'='")?;
        let value = self.consume_literal()?;
        Ok((column, value))
    }

    fn parse_delete(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Delete, "DELETE")?;
        self.expect(TokenKind::From, "FROM")?;
        let table = self.consume_ident()?;
        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Delete(Delete {
            table,
            where_clause,
        }))
    }

    fn parse_create(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Create, "CREATE")?;

        match self.current().kind {
            TokenKind::Database => {
                self.advance();
                Ok(Statement::CreateDatabase(self.consume_ident()?))
            }
            TokenKind::Table => {
                self.advance();
                self.parse_create_table()
            }
            TokenKind::Index => {
                self.advance();
                self.expect(TokenKind::On, "ON")?;
                let table = self.consume_ident()?;
                self.expect(TokenKind::LParen, "'('")?;
                let column = self.consume_ident()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Statement::CreateIndex(CreateIndex { table, column }))
            }
            _ => Err(self.unexpected("DATABASE, TABLE or INDEX")),
        }
    }

    /// Column definitions interleaved, comma-delimited, with at most one
    /// PRIMARY KEY and any number of FOREIGN KEY declarations, up to the
    /// closing parenthesis.
    fn parse_create_table(&mut self) -> Result<Statement, SyntaxError> {
        let name = self.consume_ident()?;
        self.expect(TokenKind::LParen, "'('")?;

        let mut columns = Vec::new();
        let mut constraints = Constraints::default();

        loop {
            match self.current().kind {
                TokenKind::Primary => {
                    self.advance();
                    self.expect(TokenKind::Key, "KEY")?;
                    self.expect(TokenKind::LParen, "'('")?;
                    let column = self.consume_ident()?;
                    self.expect(TokenKind::RParen, "')'")?;

                    if constraints.primary_key.is_some() {
                        return Err(SyntaxError::DuplicatePrimaryKey);
                    }
                    constraints.primary_key = Some(column);
                }
                TokenKind::Foreign => {
                    self.advance();
                    self.expect(TokenKind::Key, "KEY")?;
                    self.expect(TokenKind::LParen, "'('")?;
                    let column = self.consume_ident()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    self.expect(TokenKind::References, "REFERENCES")?;
                    let ref_table = self.consume_ident()?;
                    self.expect(TokenKind::LParen, "'('")?;
                    let ref_column = self.consume_ident()?;
                    self.expect(TokenKind::RParen, "')'")?;

                    constraints.foreign_keys.push(ForeignKey {
                        column,
                        ref_table,
                        ref_column,
                    });
                }
                _ => columns.push(self.parse_column_def()?),
            }

            match self.current().kind {
                TokenKind::RParen => {
                    self.advance();
                    break;
                }
                TokenKind::Comma => {
                    self.advance();
                    continue;
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }

        Ok(Statement::CreateTable(CreateTable {
            name,
            columns,
            constraints,
        }))
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, SyntaxError> {
        let name = self.consume_ident()?;
        let type_name = self.expect(TokenKind::Ident, "column type")?.literal;
        let data_type = DataType::from_identifier(&type_name)
            .ok_or(SyntaxError::UnknownType(type_name))?;

        Ok(ColumnDef { name, data_type })
    }

    fn parse_use(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Use, "USE")?;
        Ok(Statement::UseDatabase(self.consume_ident()?))
    }

    fn parse_show(&mut self) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Show, "SHOW")?;

        match self.current().kind {
            TokenKind::Databases => {
                self.advance();
                Ok(Statement::ShowDatabases)
            }
            TokenKind::Tables => {
                self.advance();
                Ok(Statement::ShowTables)
            }
            _ => Err(self.unexpected("DATABASES or TABLES")),
        }
    }

    /// An optional single WHERE: one comparison between a qualifiable
    /// identifier and a literal or another qualifiable identifier.
    fn parse_optional_where(&mut self) -> Result<Option<Condition>, SyntaxError> {
        if self.current().kind != TokenKind::Where {
            return Ok(None);
        }
        self.advance();

        let left = self.consume_qualified()?;

        let op = match self.current().kind {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Gt => CompareOp::Gt,
            _ => return Err(self.unexpected("comparison operator '=', '<' or '>'")),
        };
        self.advance();

        let right = if self.at_literal() {
            Operand::Literal(self.consume_literal()?)
        } else if self.current().kind == TokenKind::Ident {
            Operand::Column(self.consume_qualified()?)
        } else {
            return Err(SyntaxError::UnknownValue(self.current().describe()));
        };

        Ok(Some(Condition { left, op, right }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn parse(input: &str) -> Result<Statement, SyntaxError> {
        Parser::new(Tokenizer::new(input).tokenize()).parse()
    }

    #[test]
    fn test_parse_create_database() {
        assert_eq!(
            parse("CREATE DATABASE shop;").unwrap(),
            Statement::CreateDatabase("shop".into())
        );
    }

    #[test]
    fn test_parse_use_and_show() {
        assert_eq!(
            parse("USE shop;").unwrap(),
            Statement::UseDatabase("shop".into())
        );
        assert_eq!(parse("SHOW DATABASES;").unwrap(), Statement::ShowDatabases);
        assert_eq!(parse("SHOW TABLES;").unwrap(), Statement::ShowTables);
    }

    #[test]
    fn test_parse_create_table() {
        let statement = parse("CREATE TABLE users (id INT, name TEXT);").unwrap();

        let Statement::CreateTable(ct) = statement else {
            panic!("expected CreateTable");
        };
        assert_eq!(ct.name, "users");
        assert_eq!(ct.columns.len(), 2);
        assert_eq!(ct.columns[0].name, "id");
        assert_eq!(ct.columns[0].data_type, DataType::Int);
        assert_eq!(ct.columns[1].name, "name");
        assert_eq!(ct.columns[1].data_type, DataType::Text);
        assert_eq!(ct.constraints, Constraints::default());
    }

    #[test]
    fn test_parse_create_table_with_constraints() {
        let statement = parse(
            "CREATE TABLE orders (id INT, user_id INT, label TEXT, \
             PRIMARY KEY (id), FOREIGN KEY (user_id) REFERENCES users(id));",
        )
        .unwrap();

        let Statement::CreateTable(ct) = statement else {
            panic!("expected CreateTable");
        };
        assert_eq!(ct.columns.len(), 3);
        assert_eq!(ct.constraints.primary_key.as_deref(), Some("id"));
        assert_eq!(
            ct.constraints.foreign_keys,
            vec![ForeignKey {
                column: "user_id".into(),
                ref_table: "users".into(),
                ref_column: "id".into(),
            }]
        );
    }

    #[test]
    fn test_duplicate_primary_key_is_rejected() {
        let result = parse("CREATE TABLE t (id INT, PRIMARY KEY (id), PRIMARY KEY (id));");
        assert_eq!(result, Err(SyntaxError::DuplicatePrimaryKey));
    }

    #[test]
    fn test_unknown_column_type_is_rejected() {
        let result = parse("CREATE TABLE t (x BLOB);");
        assert_eq!(result, Err(SyntaxError::UnknownType("BLOB".into())));
    }

    #[test]
    fn test_parse_create_index() {
        assert_eq!(
            parse("CREATE INDEX ON users (name);").unwrap(),
            Statement::CreateIndex(CreateIndex {
                table: "users".into(),
                column: "name".into(),
            })
        );
    }

    #[test]
    fn test_parse_insert() {
        let statement = parse("INSERT INTO t VALUES (1, 'a', TRUE, NULL);").unwrap();

        assert_eq!(
            statement,
            Statement::Insert(Insert {
                table: "t".into(),
                values: vec![
                    Value::Int(1),
                    Value::Text("a".into()),
                    Value::Bool(true),
                    Value::Null,
                ],
            })
        );
    }

    #[test]
    fn test_parse_select_star() {
        let statement = parse("SELECT * FROM users;").unwrap();

        assert_eq!(
            statement,
            Statement::Select(Select {
                columns: ColumnsSelect::Star,
                table: "users".into(),
                join: None,
                where_clause: None,
            })
        );
    }

    #[test]
    fn test_parse_select_columns_and_where() {
        let statement = parse("SELECT id, name FROM users WHERE age > 18;").unwrap();

        let Statement::Select(select) = statement else {
            panic!("expected Select");
        };
        assert_eq!(
            select.columns,
            ColumnsSelect::Columns(vec![
                ColumnRef::new(None, "id"),
                ColumnRef::new(None, "name"),
            ])
        );
        assert_eq!(
            select.where_clause,
            Some(Condition {
                left: ColumnRef::new(None, "age"),
                op: CompareOp::Gt,
                right: Operand::Literal(Value::Int(18)),
            })
        );
    }

    #[test]
    fn test_parse_select_join_with_qualified_columns() {
        let statement =
            parse("SELECT name FROM users JOIN orders ON users.id = orders.user_id;").unwrap();

        let Statement::Select(select) = statement else {
            panic!("expected Select");
        };
        assert_eq!(
            select.join,
            Some(Join {
                table: "orders".into(),
                left: ColumnRef::new(Some("users".into()), "id"),
                right: ColumnRef::new(Some("orders".into()), "user_id"),
            })
        );
    }

    #[test]
    fn test_parse_where_column_against_column() {
        let statement = parse("SELECT * FROM t WHERE a = b;").unwrap();

        let Statement::Select(select) = statement else {
            panic!("expected Select");
        };
        assert_eq!(
            select.where_clause,
            Some(Condition {
                left: ColumnRef::new(None, "a"),
                op: CompareOp::Eq,
                right: Operand::Column(ColumnRef::new(None, "b")),
            })
        );
    }

    #[test]
    fn test_parse_update() {
        let statement = parse("UPDATE t SET a = 1, b = 'x' WHERE id = 3;").unwrap();

        assert_eq!(
            statement,
            Statement::Update(Update {
                table: "t".into(),
                assignments: vec![
                    ("a".into(), Value::Int(1)),
                    ("b".into(), Value::Text("x".into())),
                ],
                where_clause: Some(Condition {
                    left: ColumnRef::new(None, "id"),
                    op: CompareOp::Eq,
                    right: Operand::Literal(Value::Int(3)),
                }),
            })
        );
    }

    #[test]
    fn test_parse_delete_without_where() {
        assert_eq!(
            parse("DELETE FROM t;").unwrap(),
            Statement::Delete(Delete {
                table: "t".into(),
                where_clause: None,
            })
        );
    }

    #[test]
    fn test_parse_dot_command_takes_no_semicolon() {
        assert_eq!(parse(".exit").unwrap(), Statement::Meta("exit".into()));
        assert_eq!(parse(".clear").unwrap(), Statement::Meta("clear".into()));
    }

    #[test]
    fn test_missing_semicolon_is_an_error() {
        let err = parse("USE shop").unwrap_err();
        assert!(err.to_string().contains("expected ';'"), "{err}");
    }

    #[test]
    fn test_empty_input_is_a_distinguished_error() {
        assert_eq!(parse(""), Err(SyntaxError::EmptyStatement));
        assert_eq!(parse("   \n "), Err(SyntaxError::EmptyStatement));
    }

    #[test]
    fn test_unknown_statement() {
        assert_eq!(
            parse("EXPLAIN t;"),
            Err(SyntaxError::UnknownStatement("EXPLAIN".into()))
        );
    }

    #[test]
    fn test_illegal_character_is_rejected_by_the_parser() {
        let err = parse("@").unwrap_err();
        assert_eq!(err, SyntaxError::IllegalCharacter("@".into(), 1, 1));

        // Mid-statement, the illegal token surfaces as a plain mismatch.
        let err = parse("SELECT @ FROM t;").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedToken {
                expected: "identifier".into(),
                got: "@".into(),
                line: 1,
                column: 8,
            }
        );
    }

    #[test]
    fn test_unexpected_token_message_carries_position() {
        let err = parse("SELECT FROM t;").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedToken {
                expected: "identifier".into(),
                got: "FROM".into(),
                line: 1,
                column: 8,
            }
        );
    }

    #[test]
    fn test_invalid_where_operator() {
        let err = parse("SELECT * FROM t WHERE a , 1;").unwrap_err();
        assert!(
            err.to_string().contains("comparison operator"),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn test_trailing_tokens_after_statement_are_rejected() {
        let err = parse("USE shop; extra").unwrap_err();
        assert!(err.to_string().contains("expected end of input"), "{err}");
    }
}
