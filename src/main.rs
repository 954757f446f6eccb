use std::io::{self, BufRead, Write};

use relite::{EngineConfig, Interpreter, QueryResult, Response, Session};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut interpreter = Interpreter::open(EngineConfig::default());
    let mut session = Session::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("db> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match interpreter.execute(&mut session, line) {
            Response::Rows(result) => print_rows(&result),
            Response::Message(message) => println!("{message}"),
            Response::Exit => break,
        }
    }

    Ok(())
}

fn print_rows(result: &QueryResult) {
    println!("{}", result.columns.join(" | "));
    for row in &result.rows {
        let values: Vec<String> = result
            .columns
            .iter()
            .map(|column| match row.get(column) {
                Some(value) => value.to_string(),
                None => "NULL".to_string(),
            })
            .collect();
        println!("{}", values.join(" | "));
    }
    println!("({} rows)", result.rows.len());
}
