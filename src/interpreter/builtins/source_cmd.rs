//! . (dot) - execute commands from a file in the current shell
//!
//! Lines are parsed and executed independently, so multi-line constructs
//! cannot span lines in a sourced file. The first parse error aborts the
//! rest of the file.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::interpreter::errors::ExecResult;
use crate::interpreter::interpreter::Interpreter;
use crate::parser::Parser;

pub fn handle_source(interp: &mut Interpreter, args: &[String]) -> ExecResult {
    let path = match args.first() {
        Some(path) => path,
        None => {
            eprintln!("oxsh: .: filename argument required");
            return Ok(2);
        }
    };
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("oxsh: .: {path}: {e}");
            return Ok(1);
        }
    };

    let mut status = 0;
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("oxsh: .: {path}: {e}");
                return Ok(1);
            }
        };
        let mut parser = Parser::from_string(&line);
        while !parser.at_end() {
            match parser.parse_input() {
                Ok(None) => {}
                Ok(Some(node)) => {
                    status = interp.execute(&node)?;
                    interp.variables.set_status(status);
                }
                Err(e) => {
                    eprintln!("oxsh: {e}");
                    return Ok(2);
                }
            }
        }
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_source_runs_each_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.sh");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "a=1").unwrap();
        writeln!(file, "b=$a$a").unwrap();
        drop(file);

        let mut interp = Interpreter::new();
        let args = vec![path.to_str().unwrap().to_string()];
        assert_eq!(handle_source(&mut interp, &args), Ok(0));
        assert_eq!(interp.variables.get("a"), Some("1"));
        assert_eq!(interp.variables.get("b"), Some("11"));
    }

    #[test]
    fn test_source_aborts_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.sh");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "a=1").unwrap();
        writeln!(file, "if ; then").unwrap();
        writeln!(file, "b=2").unwrap();
        drop(file);

        let mut interp = Interpreter::new();
        let args = vec![path.to_str().unwrap().to_string()];
        assert_eq!(handle_source(&mut interp, &args), Ok(2));
        assert_eq!(interp.variables.get("a"), Some("1"));
        assert_eq!(interp.variables.get("b"), None);
    }

    #[test]
    fn test_source_missing_file() {
        let mut interp = Interpreter::new();
        let args = vec!["/no/such/file/oxsh.sh".to_string()];
        assert_eq!(handle_source(&mut interp, &args), Ok(1));
    }

    #[test]
    fn test_source_requires_argument() {
        let mut interp = Interpreter::new();
        assert_eq!(handle_source(&mut interp, &[]), Ok(2));
    }
}
