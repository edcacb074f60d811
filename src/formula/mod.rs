pub mod dimacs;
pub mod notation;

use log::trace;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Value {
    True,
    False,
    Unknown,
}

impl Value {
    pub fn negated(self) -> Self {
        match self {
            Value::True => Value::False,
            Value::False => Value::True,
            Value::Unknown => Value::Unknown,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Value::True
        } else {
            Value::False
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Value::True => "true",
            Value::False => "false",
            Value::Unknown => "unknown",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Sat,
    Unsat,
    Unknown,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn idx(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }

    /// The value of this literal under `values`, indexed by variable. The
    /// variable must have a slot in `values`, i.e. belong to the formula
    /// `values` was taken from.
    pub fn evaluate(&self, values: &[Value]) -> Value {
        let value = values[self.idx()];
        if self.is_positive() {
            value
        } else {
            value.negated()
        }
    }
}

#[derive(Clone, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
    tautology: bool,
}

impl Clause {
    /// Duplicate literals collapse; the first occurrence keeps its position.
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        let mut literals: Vec<Literal> = vec![];
        for literal in disjuncts {
            if !literals.contains(&literal) {
                literals.push(literal);
            }
        }
        let tautology = literals.iter().any(|l| literals.contains(&l.negated()));
        Self { literals, tautology }
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether the clause holds both a literal and its negation.
    pub fn is_tautology(&self) -> bool {
        self.tautology
    }

    pub fn evaluate(&self, values: &[Value]) -> Value {
        if self.tautology {
            return Value::True;
        }
        let mut status = Value::False;
        for literal in &self.literals {
            match literal.evaluate(values) {
                Value::True => return Value::True,
                Value::Unknown => status = Value::Unknown,
                Value::False => {}
            }
        }
        status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClauseIdx(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoUnassignedVariable;

impl Display for NoUnassignedVariable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("every variable is already assigned")
    }
}

impl std::error::Error for NoUnassignedVariable {}

#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    Format(String),
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "io error: {}", e),
            ParseError::Format(msg) => write!(f, "format error: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Format(_) => None,
        }
    }
}

// Parts of a formula that no assignment changes. Shared by every branch.
struct Structure {
    names: Vec<String>,
    index: HashMap<String, Variable>,
    clauses: Vec<Clause>,
    occurrences: Vec<Vec<ClauseIdx>>,
}

/// A CNF formula together with a partial assignment and the status of every
/// clause under that assignment.
///
/// Cloning shares the clause structure and copies only the values and
/// statuses, so a clone and its source never see each other's assignments.
#[derive(Clone)]
pub struct Formula {
    structure: Rc<Structure>,
    values: Vec<Value>,
    statuses: Vec<Value>,
    falsified: usize,
    open: usize,
}

impl Formula {
    /// Builds a formula over densely indexed variables, each named by its index.
    pub fn new(conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = conjuncts.into_iter().collect();
        let num_variables = clauses
            .iter()
            .flat_map(|clause| clause.literals())
            .map(|literal| literal.idx() + 1)
            .max()
            .unwrap_or(0);
        let names = (0..num_variables).map(|i| i.to_string()).collect();
        Self::from_parts(names, clauses)
    }

    fn from_parts(names: Vec<String>, clauses: Vec<Clause>) -> Self {
        let mut occurrences = vec![vec![]; names.len()];
        for (idx, clause) in clauses.iter().enumerate() {
            for literal in clause.literals() {
                let list: &mut Vec<ClauseIdx> = &mut occurrences[literal.idx()];
                if list.last() != Some(&ClauseIdx(idx)) {
                    list.push(ClauseIdx(idx));
                }
            }
        }
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), Variable(i)))
            .collect();

        let values = vec![Value::Unknown; names.len()];
        let statuses: Vec<Value> = clauses.iter().map(|c| c.evaluate(&values)).collect();
        let falsified = statuses.iter().filter(|s| **s == Value::False).count();
        let open = statuses.iter().filter(|s| **s == Value::Unknown).count();

        Self {
            structure: Rc::new(Structure {
                names,
                index,
                clauses,
                occurrences,
            }),
            values,
            statuses,
            falsified,
            open,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn num_clauses(&self) -> usize {
        self.statuses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.structure.clauses.iter()
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        (0..self.values.len()).map(Variable)
    }

    pub fn name(&self, variable: Variable) -> &str {
        &self.structure.names[variable.0]
    }

    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.structure.index.get(name).copied()
    }

    pub fn value(&self, variable: Variable) -> Value {
        self.values[variable.0]
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn status(&self, clause: ClauseIdx) -> Value {
        self.statuses[clause.0]
    }

    pub fn verdict(&self) -> Verdict {
        if self.falsified > 0 {
            Verdict::Unsat
        } else if self.open == 0 {
            Verdict::Sat
        } else {
            Verdict::Unknown
        }
    }

    /// Sets each variable to its new value and refreshes the status of the
    /// clauses mentioning a variable whose value actually changed. Every
    /// other clause keeps its cached status.
    ///
    /// Every variable must belong to this formula.
    pub fn assign(&mut self, changes: impl IntoIterator<Item = (Variable, bool)>) {
        let mut touched = vec![];
        for (variable, value) in changes {
            assert!(
                variable.0 < self.values.len(),
                "variable {} does not belong to a formula of {} variables",
                variable.0,
                self.values.len()
            );
            let value = Value::from(value);
            if self.values[variable.0] == value {
                continue;
            }
            trace!("assign {} = {}", self.name(variable), value);
            self.values[variable.0] = value;
            touched.extend_from_slice(&self.structure.occurrences[variable.0]);
        }
        touched.sort_unstable();
        touched.dedup();
        for idx in touched {
            self.refresh(idx);
        }
    }

    fn refresh(&mut self, idx: ClauseIdx) {
        let status = self.structure.clauses[idx.0].evaluate(&self.values);
        let old = std::mem::replace(&mut self.statuses[idx.0], status);
        match old {
            Value::False => self.falsified -= 1,
            Value::Unknown => self.open -= 1,
            Value::True => {}
        }
        match status {
            Value::False => self.falsified += 1,
            Value::Unknown => self.open += 1,
            Value::True => {}
        }
    }

    /// The variable the next branch will fix: the first unassigned one in
    /// order of appearance.
    pub fn next_unassigned(&self) -> Option<Variable> {
        self.values
            .iter()
            .position(|v| *v == Value::Unknown)
            .map(Variable)
    }

    /// Returns an independent copy of this formula with one unassigned
    /// variable fixed to `value`.
    pub fn branch(&self, value: bool) -> Result<Formula, NoUnassignedVariable> {
        let variable = self.next_unassigned().ok_or(NoUnassignedVariable)?;
        let mut child = self.clone();
        child.assign(std::iter::once((variable, value)));
        Ok(child)
    }

    pub fn model(&self) -> Model {
        Model::new(
            self.variables()
                .map(|v| (self.name(v).to_string(), self.value(v)))
                .collect(),
        )
    }
}

impl Debug for Formula {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let mut first_clause = true;
        for clause in self.clauses() {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            if clause.len() != 1 {
                f.write_str("(")?;
            }
            let mut first_literal = true;
            for literal in &clause.literals {
                if first_literal {
                    first_literal = false;
                } else {
                    f.write_str(" | ")?;
                }
                if !literal.is_positive() {
                    f.write_str("!")?;
                }
                f.write_str(self.name(*literal.variable()))?;
            }
            if clause.len() != 1 {
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}

/// Interns variable names and collects clauses for a new formula.
#[derive(Default)]
pub struct FormulaBuilder {
    names: Vec<String>,
    index: HashMap<String, Variable>,
    clauses: Vec<Clause>,
}

impl FormulaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(&mut self, name: &str) -> Variable {
        if let Some(v) = self.index.get(name) {
            return *v;
        }
        let v = Variable(self.names.len());
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), v);
        v
    }

    pub fn clause(&mut self, disjuncts: impl IntoIterator<Item = Literal>) -> &mut Self {
        self.clauses.push(Clause::new(disjuncts));
        self
    }

    pub fn build(self) -> Formula {
        Formula::from_parts(self.names, self.clauses)
    }
}

/// Values of every variable of a formula, in order of appearance. A variable
/// left `Unknown` did not matter for satisfying the formula.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Model {
    assignment: Vec<(String, Value)>,
}

impl Model {
    pub fn new(assignment: Vec<(String, Value)>) -> Self {
        Self { assignment }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.assignment.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.assignment.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

// Random formulas over at most 7 variables, small enough to brute force.
#[cfg(test)]
pub(crate) fn formula_strategy() -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    (1..8usize).prop_flat_map(|num_vars| {
        let literal = (0..num_vars, any::<bool>()).prop_map(|(v, positive)| if positive { p(v) } else { n(v) });
        prop::collection::vec(prop::collection::vec(literal, 1..=3), 0..12)
            .prop_map(|clauses| Formula::new(clauses.into_iter().map(Clause::new)))
    })
}
