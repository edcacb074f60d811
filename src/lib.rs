pub mod formula;
mod solver;

#[cfg(test)]
mod brute_force;

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Model),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SatResult::Satisfiable(model) => Some(model),
            SatResult::Unsatisfiable => None,
        }
    }

    /// Splits into whether the formula is satisfiable and, if so, the
    /// assignment that satisfies it.
    pub fn into_parts(self) -> (bool, Option<Model>) {
        match self {
            SatResult::Satisfiable(model) => (true, Some(model)),
            SatResult::Unsatisfiable => (false, None),
        }
    }
}

pub use formula::{
    Clause, ClauseIdx, Formula, FormulaBuilder, Literal, Model, NoUnassignedVariable, ParseError, Value, Variable, Verdict,
};
pub use solver::{decide, Solver, Stats};
