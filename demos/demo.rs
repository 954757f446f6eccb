use relite::{EngineConfig, Interpreter, Response, Session};

fn main() {
    println!("Relational Engine Demo\n");

    let dir = tempfile::tempdir().expect("temp dir");
    let mut interpreter = Interpreter::open(EngineConfig::in_dir(dir.path()));
    let mut session = Session::new();

    let script = [
        "CREATE DATABASE shop;",
        "USE shop;",
        "CREATE TABLE users (id INT, name TEXT, age INT, PRIMARY KEY(id));",
        "CREATE TABLE orders (id INT, user_id INT, label TEXT, \
         PRIMARY KEY(id), FOREIGN KEY(user_id) REFERENCES users(id));",
        "INSERT INTO users VALUES (1, 'Alice', 30);",
        "INSERT INTO users VALUES (2, 'Bob', NULL);",
        "INSERT INTO users VALUES (3, 'Charlie', 25);",
        "INSERT INTO orders VALUES (10, 1, 'Keyboard');",
        "INSERT INTO orders VALUES (11, 1, 'Mouse');",
        "INSERT INTO orders VALUES (12, 3, 'Monitor');",
        // Rejected: user 9 does not exist.
        "INSERT INTO orders VALUES (13, 9, 'Ghost');",
        "SELECT * FROM users;",
        "SELECT name FROM users WHERE age > 26;",
        "SELECT users.name, orders.label FROM users \
         JOIN orders ON users.id = orders.user_id;",
        "UPDATE users SET age = 31 WHERE id = 1;",
        "DELETE FROM orders WHERE id = 11;",
        "SHOW TABLES;",
    ];

    for text in script {
        println!("db> {text}");
        match interpreter.execute(&mut session, text) {
            Response::Rows(result) => {
                println!("{}", result.columns.join(" | "));
                println!("{}", "-".repeat(25));
                for row in &result.rows {
                    let values: Vec<String> = result
                        .columns
                        .iter()
                        .map(|column| match row.get(column) {
                            Some(value) => value.to_string(),
                            None => "NULL".into(),
                        })
                        .collect();
                    println!("{}", values.join(" | "));
                }
            }
            Response::Message(message) => println!("{message}"),
            Response::Exit => break,
        }
        println!();
    }
}
