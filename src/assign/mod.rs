//! Module `assign` implements var management, the trail, and Boolean
//! constraint propagation for the preprocessing engine.

/// decision var ordering
mod heap;
/// Boolean constraint propagation
mod propagate;
/// assignment management
mod stack;

pub use self::{heap::VarIdHeap, propagate::PropagateIF, stack::AssignStack};

use {
    crate::{cdb::ClauseRef, types::*},
    std::{fmt, ops::Range, slice::Iter},
};

/// Reasons of assignments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssignReason {
    /// Assigned by decision
    Decision(DecisionLevel),
    /// Assigned by a clause.
    Implication(ClauseRef),
    /// None of the above.
    None,
}

impl fmt::Display for AssignReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssignReason::Decision(0) => write!(f, "Asserted"),
            AssignReason::Decision(lvl) => write!(f, "Decided at level {lvl}"),
            AssignReason::Implication(cr) => write!(f, "Implied by {cr}"),
            AssignReason::None => write!(f, "Not assigned"),
        }
    }
}

/// Object representing a variable.
#[derive(Clone, Debug)]
pub struct Var {
    /// assignment
    pub(super) assign: Option<bool>,
    /// decision level at which this var was assigned
    pub(super) level: DecisionLevel,
    /// assign reason
    pub(super) reason: AssignReason,
    /// the `Flag`s (8 bits)
    pub(super) flags: FlagVar,
    /// a dynamic evaluation criterion for decision ordering.
    pub(super) activity: f64,
}

impl Default for Var {
    fn default() -> Var {
        Var {
            assign: None,
            level: 0,
            reason: AssignReason::None,
            flags: FlagVar::DECISION,
            activity: 0.0,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let st = |flag, mes| if self.is(flag) { mes } else { "" };
        write!(
            f,
            "V{{{}{}}}",
            st(FlagVar::ELIMINATED, "eliminated"),
            st(FlagVar::FROZEN, ", frozen"),
        )
    }
}

impl Var {
    /// return a new vector of $n$ `Var`s; index 0 is a sentinel.
    pub fn new_vars(n: usize) -> Vec<Var> {
        vec![Var::default(); n + 1]
    }
    pub fn activity(&self) -> f64 {
        self.activity
    }
}

impl FlagIF for Var {
    type FlagType = FlagVar;
    #[inline]
    fn is(&self, flag: Self::FlagType) -> bool {
        self.flags.contains(flag)
    }
    #[inline]
    fn set(&mut self, f: Self::FlagType, b: bool) {
        self.flags.set(f, b);
    }
    #[inline]
    fn turn_off(&mut self, flag: Self::FlagType) {
        self.flags.remove(flag);
    }
    #[inline]
    fn turn_on(&mut self, flag: Self::FlagType) {
        self.flags.insert(flag);
    }
}

/// API for assignment and var queries used by the other modules.
pub trait AssignIF {
    /// return the number of vars.
    fn num_vars(&self) -> usize;
    /// return a reference to a var.
    fn var(&self, vi: VarId) -> &Var;
    /// return a mutable reference to a var.
    fn var_mut(&mut self, vi: VarId) -> &mut Var;
    /// return the assignment of var `vi`.
    fn assign(&self, vi: VarId) -> Option<bool>;
    /// return the assigned value of lit `l`, from the view of `l`.
    fn assigned(&self, l: Lit) -> Option<bool>;
    /// return the decision level of var `vi`.
    fn level(&self, vi: VarId) -> DecisionLevel;
    /// return the assign reason of var `vi`.
    fn reason(&self, vi: VarId) -> AssignReason;
    /// return the current decision level.
    fn decision_level(&self) -> DecisionLevel;
    /// return the `i`-th element in the trail.
    fn stack(&self, i: usize) -> Lit;
    /// return a range of the trail.
    fn stack_range(&self, r: Range<usize>) -> &[Lit];
    /// return the length of the trail.
    fn stack_len(&self) -> usize;
    /// return an iterator over the trail.
    fn stack_iter(&self) -> Iter<'_, Lit>;
    /// return `true` if there are unpropagated assignments.
    fn remains(&self) -> bool;
    /// return the assignments of all vars as a vec indexed by `VarId`.
    fn assign_ref(&self) -> Vec<Option<bool>>;
    /// include or exclude a var from the decision heuristic.
    fn set_decision_var(&mut self, vi: VarId, b: bool);
    /// rebuild the decision-var heap from scratch.
    fn rebuild_order_heap(&mut self);
    /// pop the best decision var candidate, skipping assigned and eliminated ones.
    fn select_decision_var(&mut self) -> Option<VarId>;
}
