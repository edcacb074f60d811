use crate::formula::{Formula, FormulaBuilder, Literal, ParseError};
use std::io::{BufRead, BufReader, Read};

/// Parses DIMACS CNF. Each variable is named by its number, so `-3` becomes
/// the negation of variable `"3"`.
///
/// After the `p cnf` header, clauses are read as one stream of literals, each
/// clause ending at a `0` wherever it falls: a line may hold several clauses
/// and a clause may span lines. The clause count and the largest variable
/// must agree with the header.
pub fn parse<R: Read>(reader: R) -> Result<Formula, ParseError> {
    let reader = BufReader::new(reader);

    let mut builder = FormulaBuilder::new();
    let mut header = None;
    let mut num_parsed = 0;
    let mut clause = vec![];

    for line in reader.lines() {
        let line = line?;
        let mut line = line.split_whitespace().peekable();

        match line.peek() {
            Some(&"c") | None => continue,
            // SATLIB files end with a '%' line
            Some(&"%") => break,
            Some(&"p") => {
                let _ = line.next();
                if header.is_some() {
                    return Err(ParseError::Format("duplicate 'p' line".into()));
                }

                if line.next() != Some("cnf") {
                    return Err(ParseError::Format("missing 'cnf'".into()));
                }

                let num_variables = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| ParseError::Format("invalid num_variables".into()))?;

                let num_clauses = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| ParseError::Format("invalid num_clauses".into()))?;

                if line.next().is_some() {
                    return Err(ParseError::Format("trailing text after 'p' line".into()));
                }
                header = Some((num_variables, num_clauses));
            }
            Some(_) => {
                let (num_variables, _) =
                    header.ok_or_else(|| ParseError::Format("missing 'p' line before clauses".into()))?;

                for x in line {
                    match parse_literal(&mut builder, x, num_variables)? {
                        Some(l) => clause.push(l),
                        None => {
                            builder.clause(clause.drain(..));
                            num_parsed += 1;
                        }
                    }
                }
            }
        }
    }

    let (_, num_clauses) = header.ok_or_else(|| ParseError::Format("missing 'p' line before clauses".into()))?;
    if !clause.is_empty() {
        return Err(ParseError::Format("last clause is not terminated by 0".into()));
    }
    if num_parsed != num_clauses {
        return Err(ParseError::Format(format!(
            "header declares {} clauses but found {}",
            num_clauses, num_parsed
        )));
    }

    Ok(builder.build())
}

fn parse_literal(builder: &mut FormulaBuilder, s: &str, num_variables: usize) -> Result<Option<Literal>, ParseError> {
    let l = s
        .parse::<isize>()
        .map_err(|_| ParseError::Format(format!("invalid literal {:?}", s)))?;
    if l == 0 {
        return Ok(None);
    }
    if l.unsigned_abs() > num_variables {
        return Err(ParseError::Format(format!(
            "literal {} is out of range for {} variables",
            l, num_variables
        )));
    }
    let v = builder.variable(&l.abs().to_string());
    if l > 0 {
        Ok(Some(Literal::Positive(v)))
    } else {
        Ok(Some(Literal::Negative(v)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{SatResult, Solver};

    use super::*;

    #[test]
    fn parse_cnf_basic() {
        let cnf = "c  simple_v3_c2.cnf
c
p cnf 3 2
1 -3 0
2 3 -1 0";
        let f = parse(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(f.num_clauses(), 2);
        assert_eq!(f.num_variables(), 3);
        assert_eq!(f.to_string(), "[1 .3]-[2 3 .1]");
    }

    #[test]
    fn parse_cnf_errors() {
        for bad in &[
            "1 2 0",
            "p dnf 1 1\n1 0",
            "p cnf x 1\n1 0",
            "p cnf 1 1\n1 a 0",
            "c only comments",
            "p cnf 2 1\np cnf 2 1\n1 0",
            "p cnf 2 1\n1 3 0",
            "p cnf 2 1\n1 2",
        ] {
            match parse(bad.as_bytes()) {
                Err(ParseError::Format(_)) => {}
                other => panic!("{:?} should not parse, got {:?}", bad, other.map(|f| f.to_string())),
            }
        }
    }

    #[test]
    fn several_clauses_on_one_line() {
        let f = parse("p cnf 3 2\n1 -2 0 3 0\n".as_bytes()).expect("failed to parse");
        assert_eq!(f.to_string(), "[1 .2]-[3]");
    }

    #[test]
    fn clause_spanning_lines() {
        let f = parse("p cnf 3 1\n1 -2\n3 0\n".as_bytes()).expect("failed to parse");
        assert_eq!(f.to_string(), "[1 .2 3]");
    }

    #[test]
    fn clause_count_must_match_header() {
        for bad in &["p cnf 2 2\n1 0\n", "p cnf 2 1\n1 0\n2 0\n"] {
            match parse(bad.as_bytes()) {
                Err(ParseError::Format(msg)) => assert!(msg.contains("clauses"), "{}", msg),
                other => panic!("{:?} should not parse, got {:?}", bad, other.map(|f| f.to_string())),
            }
        }
    }

    #[test]
    fn second_clause_on_line_is_kept() {
        // the second clause on the line is what makes this unsatisfiable
        let f = parse("p cnf 1 2\n1 0 -1 0\n".as_bytes()).expect("failed to parse");
        assert_eq!(f.num_clauses(), 2);
        assert_eq!(Solver::new(f).solve(), SatResult::Unsatisfiable);
    }

    #[test]
    fn empty_clause_and_trailer() {
        let f = parse("p cnf 1 2\n1 0\n0\n%\n0\n".as_bytes()).expect("failed to parse");
        assert_eq!(f.to_string(), "[1]-[]");
    }

    #[test]
    fn solve_cnf_quinn() {
        let cnf = "c  quinn.cnf
c
p cnf 16 18
  1    2  0
 -2   -4  0
  3    4  0
 -4   -5  0
  5   -6  0
  6   -7  0
  6    7  0
  7  -16  0
  8   -9  0
 -8  -14  0
  9   10  0
  9  -10  0
-10  -11  0
 10   12  0
 11   12  0
 13   14  0
 14  -15  0
 15   16  0
";

        let f = parse(cnf.as_bytes()).expect("failed to parse");

        let mut solver = Solver::new(f);
        let r = solver.solve();

        assert!(r.is_satisfiable());
        assert_ne!(r, SatResult::Unsatisfiable);
    }
}
