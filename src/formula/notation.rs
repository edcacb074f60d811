//! The bracket notation for CNF formulas, e.g. `[a b]-[.x .y z]-[p .q r s]`.
//!
//! Each `[...]` is a clause of whitespace-separated literals, clauses are
//! joined by `-`, and a leading `.` negates a literal. The empty string is
//! the empty formula.

use crate::formula::{Formula, FormulaBuilder, Literal, ParseError};
use std::fmt::{self, Display, Formatter};
use std::io::Read;
use std::str::FromStr;

pub fn parse<R: Read>(mut reader: R) -> Result<Formula, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_str(&text)
}

pub fn parse_str(text: &str) -> Result<Formula, ParseError> {
    let mut builder = FormulaBuilder::new();
    let mut rest = text.trim();
    if rest.is_empty() {
        return Ok(builder.build());
    }

    let mut clause_number = 1;
    loop {
        rest = rest
            .strip_prefix('[')
            .ok_or_else(|| format_error(clause_number, format!("expected '[' but found {:?}", rest)))?;
        let end = rest
            .find(|c: char| c == '[' || c == ']')
            .ok_or_else(|| format_error(clause_number, "unbalanced '['".into()))?;
        if rest[end..].starts_with('[') {
            return Err(format_error(clause_number, "nested '['".into()));
        }

        let mut literals = vec![];
        for token in rest[..end].split_whitespace() {
            literals.push(parse_literal(&mut builder, token).map_err(|msg| format_error(clause_number, msg))?);
        }
        builder.clause(literals);

        rest = rest[end + 1..].trim_start();
        if rest.is_empty() {
            break;
        }
        rest = rest
            .strip_prefix('-')
            .ok_or_else(|| format_error(clause_number, format!("expected '-' after clause but found {:?}", rest)))?
            .trim_start();
        clause_number += 1;
    }

    Ok(builder.build())
}

fn parse_literal(builder: &mut FormulaBuilder, token: &str) -> Result<Literal, String> {
    let (negated, name) = match token.strip_prefix('.') {
        Some(name) => (true, name),
        None => (false, token),
    };
    if name.is_empty() {
        return Err(format!("empty literal {:?}", token));
    }
    let v = builder.variable(name);
    if negated {
        Ok(Literal::Negative(v))
    } else {
        Ok(Literal::Positive(v))
    }
}

fn format_error(clause_number: usize, msg: String) -> ParseError {
    ParseError::Format(format!("clause {}: {}", clause_number, msg))
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}

// Prints the formula back in bracket notation.
impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, clause) in self.clauses().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            f.write_str("[")?;
            for (j, literal) in clause.literals().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                if !literal.is_positive() {
                    f.write_str(".")?;
                }
                f.write_str(self.name(*literal.variable()))?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{Value, Variable};
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_env_log::test;

    fn literals(f: &Formula, idx: usize) -> Vec<String> {
        let clause = f.clauses().nth(idx).unwrap();
        clause
            .literals()
            .map(|l| format!("{}{}", if l.is_positive() { "" } else { "." }, f.name(*l.variable())))
            .collect()
    }

    #[test]
    fn parse_basic() {
        let f = parse_str("[a b]-[.x .y z]-[p .q r s]").expect("failed to parse");
        assert_eq!(f.num_clauses(), 3);
        assert_eq!(f.num_variables(), 9);
        assert_eq!(literals(&f, 0), vec!["a", "b"]);
        assert_eq!(literals(&f, 1), vec![".x", ".y", "z"]);
        assert_eq!(literals(&f, 2), vec!["p", ".q", "r", "s"]);
        assert!(f.values().iter().all(|v| *v == Value::Unknown));
    }

    #[test]
    fn parse_shares_variables() {
        let f = parse_str("[a .b]-[b .a a]").unwrap();
        assert_eq!(f.num_variables(), 2);
        assert_eq!(f.variable("a"), Some(Variable(0)));
        assert_eq!(f.variable("b"), Some(Variable(1)));
        assert!(f.clauses().nth(1).unwrap().is_tautology());
    }

    #[test]
    fn parse_tolerates_whitespace() {
        let f = parse_str("  [ a  b ] -\n [.c]\t").unwrap();
        assert_eq!(f.num_clauses(), 2);
        assert_eq!(literals(&f, 0), vec!["a", "b"]);
        assert_eq!(literals(&f, 1), vec![".c"]);
    }

    #[test]
    fn parse_empty() {
        let f = parse_str("").unwrap();
        assert_eq!(f.num_clauses(), 0);
        assert_eq!(f.num_variables(), 0);
        assert_eq!(parse_str(" \n ").unwrap().num_clauses(), 0);
    }

    #[test]
    fn parse_empty_clause() {
        let f = parse_str("[a]-[]").unwrap();
        assert_eq!(f.num_clauses(), 2);
        assert!(f.clauses().nth(1).unwrap().is_empty());
    }

    #[test]
    fn names_may_contain_dashes() {
        let f = parse_str("[x-1 .y-2]-[x-1]").unwrap();
        assert_eq!(f.num_variables(), 2);
        assert_eq!(literals(&f, 0), vec!["x-1", ".y-2"]);
    }

    #[test]
    fn parse_errors() {
        for bad in &["[a b", "a b]", "[a]-", "[a][b]", "[a [b]]", "[a]-[.]", "[a] x", "-[a]", "[a]]"] {
            match parse_str(bad) {
                Err(ParseError::Format(_)) => {}
                other => panic!("{:?} should not parse, got {:?}", bad, other.map(|f| f.to_string())),
            }
        }
    }

    #[test]
    fn display_round_trips() {
        let text = "[a b]-[.x .y z]-[]-[p .q r s]";
        let f = parse_str(text).unwrap();
        assert_eq!(f.to_string(), text);
        let g: Formula = f.to_string().parse().unwrap();
        assert_eq!(g.to_string(), text);
    }

    #[test]
    fn parse_from_file() {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        writeln!(file, "[a]-[.a a]\n-[b .a .b]").unwrap();
        let f = parse(file.reopen().unwrap()).expect("failed to parse");
        assert_eq!(f.num_clauses(), 3);
        assert_eq!(f.num_variables(), 2);
    }
}
