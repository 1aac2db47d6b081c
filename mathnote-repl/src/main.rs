mod command;
mod error;

use command::{help, parse_command};
use env_logger::Env;
use mathnote_notation::operation::{Field, OperationError, Success};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, BufRead, IsTerminal};

/// Formats a field for the terminal.
fn fmt_field(field: &Field) -> String {
    match field {
        Field::One(s) => s.clone(),
        Field::Many(list) => list.join(", "),
    }
}

/// Formats a successful result: the answer, or the rendered input for operations that only render,
/// followed by the humanized form of large numbers.
fn fmt_success(success: &Success) -> String {
    let mut out = match (&success.answer, success.pretty.get("text")) {
        (Some(answer), _) => fmt_field(answer),
        (None, Some(text)) => fmt_field(text),
        (None, None) => String::new(),
    };
    if let Some(humanized) = success.pretty.get("humanized_res") {
        out.push_str(&format!(" ({})", fmt_field(humanized)));
    }
    out
}

/// Parses and runs a line of input.
fn run_line(input: &str) -> Result<Success, OperationError> {
    let command = parse_command(input)?;
    command.operation.run(&command.args)
}

/// Runs a line of input, printing the result or reporting the error.
fn execute(input: &str) {
    match input.trim() {
        "" => (),
        "help" => print!("{}", help()),
        input => match run_line(input) {
            Ok(success) => println!("{}", fmt_success(&success)),
            Err(err) => error::report_to_stderr(&err),
        },
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if !io::stdin().is_terminal() {
        // one command per line of stdin
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => execute(&line),
                Err(err) => {
                    eprintln!("{}", err);
                    break;
                },
            }
        }
        return;
    }

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{}", err);
            return;
        },
    };

    fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        execute(&input);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl) {
            match err {
                ReadlineError::Eof | ReadlineError::Interrupted => (),
                _ => eprintln!("{}", err),
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn answers() {
        assert_eq!(fmt_success(&run_line("2 + 2").unwrap()), "4");
        assert_eq!(fmt_success(&run_line("derive: x^2; x").unwrap()), "2x");
        assert_eq!(fmt_success(&run_line("solve: x^2 = 4; x; real").unwrap()), "-2, 2");
        assert_eq!(fmt_success(&run_line("display: 2xy").unwrap()), "2xy");
        assert_eq!(fmt_success(&run_line("factor: x^2 - 4").unwrap()), "(x+2)(x-2)");
        assert_eq!(fmt_success(&run_line("1234567").unwrap()), "1234567 (1.23 million)");
    }
}
