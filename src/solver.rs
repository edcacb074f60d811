use crate::formula::{Formula, Verdict};
use crate::SatResult;
use log::{debug, trace};
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Child formulas created by branching.
    pub branches: usize,
    /// Branches abandoned because a clause became false.
    pub backtracks: usize,
    pub max_depth: usize,
}

// A child yet to be explored: `parent` with its next unassigned variable
// fixed to `polarity`. Both children of a parent share it.
#[derive(Debug)]
struct PendingBranch {
    parent: Rc<Formula>,
    polarity: bool,
    depth: usize,
}

/// Exhaustive depth-first search over assignments.
///
/// Branches on one unassigned variable at a time, trying `true` before
/// `false`, and stops at the first formula whose every clause is true. No
/// propagation or learning is done; the only pruning is abandoning a branch
/// once some clause is false.
pub struct Solver {
    formula: Formula,
    stats: Stats,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        Self {
            formula,
            stats: Stats::default(),
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn solve(&mut self) -> SatResult {
        self.stats = Stats::default();

        let mut stack = vec![];
        match self.formula.verdict() {
            Verdict::Sat => return self.satisfied(&self.formula),
            Verdict::Unsat => return self.unsatisfied(),
            Verdict::Unknown => push_children(&mut stack, Rc::new(self.formula.clone()), 1),
        }

        while let Some(PendingBranch { parent, polarity, depth }) = stack.pop() {
            let child = parent
                .branch(polarity)
                .expect("a formula with an open clause has an unassigned variable");
            self.stats.branches += 1;
            self.stats.max_depth = self.stats.max_depth.max(depth);

            match child.verdict() {
                Verdict::Sat => return self.satisfied(&child),
                Verdict::Unsat => {
                    trace!("conflict at depth {}, backtracking", depth);
                    self.stats.backtracks += 1;
                }
                Verdict::Unknown => push_children(&mut stack, Rc::new(child), depth + 1),
            }
        }

        self.unsatisfied()
    }

    fn satisfied(&self, formula: &Formula) -> SatResult {
        debug!("satisfiable: {:?}", self.stats);
        SatResult::Satisfiable(formula.model())
    }

    fn unsatisfied(&self) -> SatResult {
        debug!("unsatisfiable: {:?}", self.stats);
        SatResult::Unsatisfiable
    }
}

// The true branch goes on top so it is explored first.
fn push_children(stack: &mut Vec<PendingBranch>, parent: Rc<Formula>, depth: usize) {
    stack.push(PendingBranch {
        parent: Rc::clone(&parent),
        polarity: false,
        depth,
    });
    stack.push(PendingBranch {
        parent,
        polarity: true,
        depth,
    });
}

/// Decides `formula` without modifying it.
pub fn decide(formula: &Formula) -> SatResult {
    Solver::new(formula.clone()).solve()
}
