use crate::formula::{Formula, Value};

// Tries every total assignment; only for cross-checking the solver in tests
pub(crate) fn solve_brute_force(f: &Formula) -> bool {
    let num_variables = f.num_variables();
    assert!(num_variables <= 15); // just for safety

    (0..2u32.pow(num_variables as u32)).any(|assignment| {
        let values: Vec<Value> = (0..num_variables)
            .map(|x| Value::from(assignment & (1 << x) == 0))
            .collect();
        f.clauses().all(|clause| clause.evaluate(&values) == Value::True)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p, Clause};

    #[test]
    fn brute_force_sat() {
        let c1 = Clause::new(vec![p(0), p(1)]);
        let c2 = Clause::new(vec![n(0)]);
        let f = Formula::new(vec![c1, c2]);

        assert!(solve_brute_force(&f));
    }

    #[test]
    fn brute_force_unsat() {
        let c1 = Clause::new(vec![p(0), p(1)]);
        let c2 = Clause::new(vec![n(0)]);
        let c3 = Clause::new(vec![n(1)]);
        let f = Formula::new(vec![c1, c2, c3]);

        assert!(!solve_brute_force(&f));
    }

    #[test]
    fn brute_force_empty() {
        assert!(solve_brute_force(&Formula::new(vec![])));
        assert!(!solve_brute_force(&Formula::new(vec![Clause::new(vec![])])));
    }
}
