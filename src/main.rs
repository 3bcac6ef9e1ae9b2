use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, stdin, Write};
use std::process;

use minilang::{run, RunReport};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 {
        println!("Usage: minilang [script]");
    } else if args.len() == 2 {
        if let Err(error) = run_file(&args[1]) {
            eprintln!("Error reading file: {error}");
            process::exit(74);
        }
    } else {
        run_prompt();
    }
}

fn run_file(path: &str) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let report = run_and_report(&text);

    if report.had_static_error() {
        process::exit(65);
    }
    if report.runtime_error.is_some() {
        process::exit(70);
    }

    Ok(())
}

fn run_prompt() {
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if stdin().read_line(&mut input).unwrap_or(0) == 0 {
            break;
        }
        run_and_report(&input);
    }
}

fn run_and_report(source: &str) -> RunReport {
    let mut out = io::stdout();
    let report = run(source, &mut out);

    for error in &report.lex_errors {
        eprintln!("{error}");
    }
    for error in &report.parse_errors {
        eprintln!("{error}");
    }
    if let Some(error) = &report.runtime_error {
        eprintln!("Runtime error: {error}");
    }

    report
}
