//! Parsing of REPL lines into operations.
//!
//! A line is either `operation: arg; arg; ...`, where the arguments are matched to the parameters
//! of the operation in order, or a bare expression, which is evaluated. Arguments of list
//! parameters are split on top-level commas, so `linsolve: x + y = 2, x - y = 0; x, y` solves a
//! system of two equations.

use mathnote_notation::operation::{Args, Field, Operation, OperationError};

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub operation: Operation,
    pub args: Args,
}

/// Splits `s` on `separator`, ignoring separators nested inside brackets.
fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            },
            _ => (),
        }
    }
    parts.push(s[start..].trim());
    parts
}

/// Parses a line of input.
pub fn parse_command(line: &str) -> Result<Command, OperationError> {
    let line = line.trim();
    let Some((name, rest)) = line.split_once(':') else {
        return Ok(Command {
            operation: Operation::Evaluate,
            args: Args::from([("expr".to_string(), Field::One(line.to_string()))]),
        });
    };

    let operation = name.trim().parse::<Operation>()?;
    let params = operation.params();
    let values = split_top_level(rest, ';');
    if values.len() > params.len() {
        return Err(OperationError::InvalidRequest(format!(
            "{} takes at most {} arguments, but {} were given",
            operation,
            params.len(),
            values.len(),
        )));
    }

    let args = params.iter()
        .zip(values)
        .filter(|(_, value)| !value.is_empty())
        .map(|(param, value)| {
            let field = if param.list {
                Field::Many(split_top_level(value, ',').into_iter().map(str::to_string).collect())
            } else {
                Field::One(value.to_string())
            };
            (param.name.to_string(), field)
        })
        .collect();
    Ok(Command { operation, args })
}

/// Describes the operations and their parameters.
pub fn help() -> String {
    let mut text = String::from("Type an expression to evaluate it, or `operation: arg; arg; ...`:\n");
    for op in Operation::ALL {
        let params = op.params()
            .iter()
            .map(|param| match (param.list, param.optional) {
                (true, _) => format!("{}, ...", param.name),
                (_, true) => format!("[{}]", param.name),
                _ => param.name.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        text.push_str(&format!("  {}: {}\n", op, params));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn one(s: &str) -> Field {
        Field::One(s.to_string())
    }

    #[test]
    fn bare_expressions_are_evaluated() {
        let command = parse_command("  2 + 2 ").unwrap();
        assert_eq!(command.operation, Operation::Evaluate);
        assert_eq!(command.args["expr"], one("2 + 2"));
    }

    #[test]
    fn positional_arguments() {
        let command = parse_command("limit: sin(x)/x; x; 0").unwrap();
        assert_eq!(command.operation, Operation::Limit);
        assert_eq!(command.args["expr"], one("sin(x)/x"));
        assert_eq!(command.args["val"], one("0"));
        assert!(!command.args.contains_key("dir"));

        let command = parse_command("integrate_definite_expression: x^2; x; 0; 3").unwrap();
        assert_eq!(command.operation, Operation::IntegrateDefinite);
        assert_eq!(command.args["ut"], one("3"));
    }

    #[test]
    fn list_arguments() {
        let command = parse_command("linsolve: x + y = 2, x - y = 0; x, y").unwrap();
        assert_eq!(command.args["eqs"], Field::Many(vec!["x + y = 2".to_string(), "x - y = 0".to_string()]));
        assert_eq!(command.args["vars"], Field::Many(vec!["x".to_string(), "y".to_string()]));

        let command = parse_command("derive: log(x, 2); x").unwrap();
        assert_eq!(command.args["expr"], one("log(x, 2)"));
        assert_eq!(command.args["var"], Field::Many(vec!["x".to_string()]));
    }

    #[test]
    fn bad_commands() {
        assert_eq!(parse_command("frobnicate: x").unwrap_err().kind(), "UnknownOperation");
        assert_eq!(
            parse_command("simplify: x; y").unwrap_err().message(),
            "simplify takes at most 1 arguments, but 2 were given",
        );
    }

    #[test]
    fn help_lists_every_operation() {
        let help = help();
        assert!(help.contains("  derive: expr; var, ...\n"));
        assert!(help.contains("  limit: expr; var; val; [dir]\n"));
        assert_eq!(help.lines().count(), Operation::ALL.len() + 1);
    }
}
