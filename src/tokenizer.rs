/// The kind of a lexical token, the smallest meaningful unit of the query
/// language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // --- Keywords ---
    Create,
    Database,
    Databases,
    Table,
    Tables,
    Use,
    Show,
    Index,
    On,
    Insert,
    Into,
    Values,
    Select,
    From,
    Join,
    Where,
    Update,
    Set,
    Delete,
    Primary,
    Key,
    Foreign,
    References,
    True,
    False,
    Null,

    // --- Identifiers & Literals ---
    /// A name representing a database, table or column (e.g. `users`, `id`).
    Ident,
    /// An unsigned integer literal (e.g. `42`).
    Int,
    /// A string literal enclosed in single or double quotes.
    Str,
    /// An administrative dot-command (e.g. `.exit`); the literal carries the
    /// command name without the leading dot.
    DotCommand,

    // --- Symbols ---
    /// Left parenthesis `(`
    LParen,
    /// Right parenthesis `)`
    RParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Dot `.` separating a qualified `table.column` identifier
    Dot,
    /// Wildcard symbol `*`
    Star,
    /// Equal to
    Eq,
    /// Lower than
    Lt,
    /// Greater than
    Gt,

    // --- Special ---
    /// A character the scanner does not recognize. The tokenizer itself
    /// never fails; rejecting this is the parser's responsibility.
    Illegal,
    /// Represents the end of the input.
    Eof,
}

/// A single token with its source text and 1-based position, kept for
/// diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Canonical upper-case text for keywords, original text otherwise.
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }

    /// Human-readable form used in "expected X, got Y" diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".into(),
            TokenKind::Str => format!("'{}'", self.literal),
            TokenKind::DotCommand => format!(".{}", self.literal),
            _ => self.literal.clone(),
        }
    }
}

/// Maps a letter-led word onto the fixed keyword table, case-insensitively.
/// Returns the kind together with its canonical upper-case literal.
fn keyword(word: &str) -> Option<(TokenKind, &'static str)> {
    let entry = match word.to_uppercase().as_str() {
        "CREATE" => (TokenKind::Create, "CREATE"),
        "DATABASE" => (TokenKind::Database, "DATABASE"),
        "DATABASES" => (TokenKind::Databases, "DATABASES"),
        "TABLE" => (TokenKind::Table, "TABLE"),
        "TABLES" => (TokenKind::Tables, "TABLES"),
        "USE" => (TokenKind::Use, "USE"),
        "SHOW" => (TokenKind::Show, "SHOW"),
        "INDEX" => (TokenKind::Index, "INDEX"),
        "ON" => (TokenKind::On, "ON"),
        "INSERT" => (TokenKind::Insert, "INSERT"),
        "INTO" => (TokenKind::Into, "INTO"),
        "VALUES" => (TokenKind::Values, "VALUES"),
        "SELECT" => (TokenKind::Select, "SELECT"),
        "FROM" => (TokenKind::From, "FROM"),
        "JOIN" => (TokenKind::Join, "JOIN"),
        "WHERE" => (TokenKind::Where, "WHERE"),
        "UPDATE" => (TokenKind::Update, "UPDATE"),
        "SET" => (TokenKind::Set, "SET"),
        "DELETE" => (TokenKind::Delete, "DELETE"),
        "PRIMARY" => (TokenKind::Primary, "PRIMARY"),
        "KEY" => (TokenKind::Key, "KEY"),
        "FOREIGN" => (TokenKind::Foreign, "FOREIGN"),
        "REFERENCES" => (TokenKind::References, "REFERENCES"),
        "TRUE" => (TokenKind::True, "TRUE"),
        "FALSE" => (TokenKind::False, "FALSE"),
        "NULL" => (TokenKind::Null, "NULL"),
        _ => return None,
    };
    Some(entry)
}

/// A lexical scanner that converts a raw query string into a sequence of
/// [Token]s in a single eager pass.
///
/// The scan never fails: unknown characters are emitted as
/// [TokenKind::Illegal] tokens and left for the parser to reject. Each
/// invocation is independent; no state is shared across calls.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
    /// Current 1-based line, advanced on every `\n`.
    line: usize,
    /// Current 1-based column within the line.
    column: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Processes the entire input and returns the token sequence, always
    /// terminated by an [TokenKind::Eof] token.
    ///
    /// # Example
    /// ```
    /// # use relite::tokenizer::{Tokenizer, TokenKind};
    /// let tokens = Tokenizer::new("SELECT *").tokenize();
    /// assert_eq!(tokens[0].kind, TokenKind::Select);
    /// assert_eq!(tokens[1].kind, TokenKind::Star);
    /// assert_eq!(tokens[2].kind, TokenKind::Eof);
    /// ```
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token());
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
        tokens
    }

    /// Identifies the next token based on the character at the current
    /// position.
    fn next_token(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let ch = self.current_char();

        let symbol = |kind| Token::new(kind, ch, line, column);

        match ch {
            '(' => {
                self.advance();
                symbol(TokenKind::LParen)
            }
            ')' => {
                self.advance();
                symbol(TokenKind::RParen)
            }
            ',' => {
                self.advance();
                symbol(TokenKind::Comma)
            }
            ';' => {
                self.advance();
                symbol(TokenKind::Semicolon)
            }
            '*' => {
                self.advance();
                symbol(TokenKind::Star)
            }
            '=' => {
                self.advance();
                symbol(TokenKind::Eq)
            }
            '<' => {
                self.advance();
                symbol(TokenKind::Lt)
            }
            '>' => {
                self.advance();
                symbol(TokenKind::Gt)
            }
            '.' => self.read_dot(line, column),
            '\'' | '"' => self.read_string(ch, line, column),
            c if c.is_ascii_alphabetic() => self.read_word(line, column),
            c if c.is_ascii_digit() => self.read_number(line, column),
            other => {
                self.advance();
                Token::new(TokenKind::Illegal, other, line, column)
            }
        }
    }

    // --- Navigation helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Moves the cursor forward by one character, tracking line/column.
    fn advance(&mut self) {
        if self.current_char() == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes space, tab, CR and LF between tokens.
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    // --- Extraction logic ---

    /// Reads a run of letters/digits/underscores starting with a letter and
    /// determines whether it is a reserved keyword or a user identifier.
    ///
    /// Keywords are matched case-insensitively and emitted with their
    /// canonical upper-case literal; identifiers keep their original casing.
    fn read_word(&mut self, line: usize, column: usize) -> Token {
        let mut word = String::new();

        while !self.is_at_end()
            && (self.current_char().is_ascii_alphanumeric() || self.current_char() == '_')
        {
            word.push(self.current_char());
            self.advance();
        }

        match keyword(&word) {
            Some((kind, canonical)) => Token::new(kind, canonical, line, column),
            None => Token::new(TokenKind::Ident, word, line, column),
        }
    }

    /// Reads a run of digits as an integer literal. Signs and fractional
    /// parts are an explicit non-goal of the grammar.
    fn read_number(&mut self, line: usize, column: usize) -> Token {
        let mut number = String::new();

        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            number.push(self.current_char());
            self.advance();
        }

        Token::new(TokenKind::Int, number, line, column)
    }

    /// Reads a string literal enclosed in matching single or double quotes.
    /// No escape processing is performed.
    ///
    /// An unterminated quote scans to end-of-input and still yields a string
    /// token rather than failing. That is a latent quirk of the grammar,
    /// kept as-is and pinned by a test below.
    fn read_string(&mut self, quote: char, line: usize, column: usize) -> Token {
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        while !self.is_at_end() && self.current_char() != quote {
            string.push(self.current_char());
            self.advance();
        }

        if !self.is_at_end() {
            self.advance(); // Skip the closing quote
        }

        Token::new(TokenKind::Str, string, line, column)
    }

    /// Disambiguates a `.`: preceded by start-of-input or whitespace and
    /// followed by a letter it starts a dot-command (e.g. `.exit`);
    /// otherwise it is a standalone separator used for `table.column`
    /// qualification.
    fn read_dot(&mut self, line: usize, column: usize) -> Token {
        let at_word_boundary =
            self.position == 0 || self.input[self.position - 1].is_whitespace();
        let followed_by_letter = self
            .input
            .get(self.position + 1)
            .is_some_and(|c| c.is_ascii_alphabetic());

        self.advance(); // consume the dot

        if !(at_word_boundary && followed_by_letter) {
            return Token::new(TokenKind::Dot, '.', line, column);
        }

        let mut name = String::new();
        while !self.is_at_end() && self.current_char().is_ascii_alphabetic() {
            name.push(self.current_char());
            self.advance();
        }

        Token::new(TokenKind::DotCommand, name, line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let tokens = Tokenizer::new("CREATE TABLE users").tokenize();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Create);
        assert_eq!(tokens[1].kind, TokenKind::Table);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[2].literal, "users");
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_keywords_case_insensitive_with_canonical_literal() {
        let tokens = Tokenizer::new("select From wHeRe").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Select);
        assert_eq!(tokens[0].literal, "SELECT");
        assert_eq!(tokens[1].kind, TokenKind::From);
        assert_eq!(tokens[1].literal, "FROM");
        assert_eq!(tokens[2].kind, TokenKind::Where);
        assert_eq!(tokens[2].literal, "WHERE");
    }

    #[test]
    fn test_identifiers_preserve_casing() {
        let tokens = Tokenizer::new("MyTable user_id").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].literal, "MyTable");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].literal, "user_id");
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = Tokenizer::new("42, 123, 0").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].literal, "42");
        assert_eq!(tokens[2].literal, "123");
        assert_eq!(tokens[4].literal, "0");
    }

    #[test]
    fn test_tokenize_strings_both_quote_styles() {
        let tokens = Tokenizer::new("'Alice', \"Bob Dylan\"").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].literal, "Alice");
        assert_eq!(tokens[2].kind, TokenKind::Str);
        assert_eq!(tokens[2].literal, "Bob Dylan");
    }

    #[test]
    fn test_quote_styles_do_not_close_each_other() {
        let tokens = Tokenizer::new("\"it's fine\"").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].literal, "it's fine");
    }

    // Latent grammar quirk: an unterminated quote consumes the rest of the
    // input and still produces a string token. Pinned here so any future
    // change to this behavior is a conscious one.
    #[test]
    fn test_unterminated_string_scans_to_end_without_failing() {
        let tokens = Tokenizer::new("'hello").tokenize();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].literal, "hello");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("( ) , ; * = < >"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dot_command_at_start_of_input() {
        let tokens = Tokenizer::new(".exit").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::DotCommand);
        assert_eq!(tokens[0].literal, "exit");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_dot_command_after_whitespace() {
        let tokens = Tokenizer::new("  .clear").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::DotCommand);
        assert_eq!(tokens[0].literal, "clear");
    }

    #[test]
    fn test_qualified_identifier_dot_is_a_separator() {
        let tokens = Tokenizer::new("users.id").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].literal, "users");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[2].literal, "id");
    }

    #[test]
    fn test_dot_followed_by_digit_is_a_separator() {
        let tokens = Tokenizer::new(".5").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Dot);
        assert_eq!(tokens[1].kind, TokenKind::Int);
    }

    #[test]
    fn test_illegal_character_does_not_fail_the_scan() {
        let tokens = Tokenizer::new("id @ name").tokenize();

        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].literal, "@");
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = Tokenizer::new("SELECT *\nFROM users;").tokenize();

        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 8));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 1));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 6));
        assert_eq!((tokens[4].line, tokens[4].column), (2, 11));
    }

    #[test]
    fn test_tokenize_full_statement() {
        assert_eq!(
            kinds("INSERT INTO t VALUES (1, 'a', TRUE, NULL);"),
            vec![
                TokenKind::Insert,
                TokenKind::Into,
                TokenKind::Ident,
                TokenKind::Values,
                TokenKind::LParen,
                TokenKind::Int,
                TokenKind::Comma,
                TokenKind::Str,
                TokenKind::Comma,
                TokenKind::True,
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_only_eof() {
        let tokens = Tokenizer::new("   \t\r\n ").tokenize();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }
}
